use askama::Template;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::KmlParseError;
use super::templates::CurrentViewTemplate;

pub const ALTITUDE_MODE: &str = "relativeToGround";

/// Where the globe viewer should place its camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LookAtDescriptor {
    pub longitude: f64,
    pub latitude: f64,
    /// Metres from the look-at point.
    pub range: f64,
    pub heading: f64,
    pub tilt: f64,
}

impl LookAtDescriptor {
    /// Initial view used before any viewport has been seen.
    pub fn home() -> Self {
        Self {
            longitude: 127.783809,
            latitude: 26.357896,
            range: 100.0,
            heading: 0.0,
            tilt: 0.0,
        }
    }

    pub fn to_kml(&self) -> Result<String, askama::Error> {
        CurrentViewTemplate {
            view: self,
            altitude_mode: ALTITUDE_MODE,
        }
        .render()
    }

    pub fn from_kml(document: &str) -> Result<Self, KmlParseError> {
        Ok(Self {
            longitude: number_field(document, "longitude")?,
            latitude: number_field(document, "latitude")?,
            range: number_field(document, "range")?,
            heading: number_field(document, "heading")?,
            tilt: number_field(document, "tilt")?,
        })
    }
}

impl Default for LookAtDescriptor {
    fn default() -> Self {
        Self::home()
    }
}

fn element_text<'a>(document: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = document.find(&open)? + open.len();
    let end = start + document[start..].find(&close)?;
    Some(document[start..end].trim())
}

fn number_field(document: &str, field: &'static str) -> Result<f64, KmlParseError> {
    let text = element_text(document, field).ok_or(KmlParseError::MissingField(field))?;
    text.parse().map_err(|_| KmlParseError::InvalidNumber {
        field,
        value: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_markup() {
        let kml = LookAtDescriptor::home().to_kml().unwrap();
        let expected = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
            <kml xmlns=\"http://www.opengis.net/kml/2.2\">\n\
            <NetworkLinkControl>\n\
            <LookAt>\n\
            <longitude>127.783809</longitude>\n\
            <latitude>26.357896</latitude>\n\
            <altitudeMode>relativeToGround</altitudeMode>\n\
            <heading>0</heading>\n\
            <tilt>0</tilt>\n\
            <range>100</range>\n\
            </LookAt>\n\
            </NetworkLinkControl>\n\
            </kml>";
        assert_eq!(kml, expected);
    }

    #[test]
    fn test_parse_back() {
        let view = LookAtDescriptor {
            longitude: 127.785,
            latitude: 26.36,
            range: 2110.47,
            heading: 315.0,
            tilt: 70.0,
        };
        assert_eq!(LookAtDescriptor::from_kml(&view.to_kml().unwrap()).unwrap(), view);
    }

    #[test]
    fn test_parse_negative_values() {
        let view = LookAtDescriptor {
            longitude: -122.41942,
            latitude: -33.86882,
            range: 0.01,
            heading: 359.5,
            tilt: 180.0,
        };
        assert_eq!(LookAtDescriptor::from_kml(&view.to_kml().unwrap()).unwrap(), view);
    }

    #[test]
    fn test_missing_field() {
        let doc = "<LookAt><longitude>1</longitude></LookAt>";
        assert_eq!(
            LookAtDescriptor::from_kml(doc).unwrap_err(),
            KmlParseError::MissingField("latitude")
        );
    }

    #[test]
    fn test_invalid_number() {
        let doc = LookAtDescriptor::home()
            .to_kml()
            .unwrap()
            .replace("<tilt>0</tilt>", "<tilt>steep</tilt>");
        assert!(matches!(
            LookAtDescriptor::from_kml(&doc),
            Err(KmlParseError::InvalidNumber { field: "tilt", .. })
        ));
    }
}
