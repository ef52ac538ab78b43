use askama::Template;
use std::time::Duration;

use super::templates::NetworkLinkTemplate;

pub const REFRESH_MODE: &str = "onInterval";

/// Stable pointer file the globe viewer opens once and then polls through.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDescriptor {
    pub folder_name: String,
    pub link_name: String,
    /// Live descriptor, relative to the link file.
    pub href: String,
    pub refresh_interval: Duration,
    pub fly_to_view: bool,
}

impl LinkDescriptor {
    pub fn to_kml(&self) -> Result<String, askama::Error> {
        NetworkLinkTemplate {
            link: self,
            refresh_mode: REFRESH_MODE,
            refresh_interval_s: self.refresh_interval.as_secs_f64(),
        }
        .render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> LinkDescriptor {
        LinkDescriptor {
            folder_name: "Map to Globe Sync".to_string(),
            link_name: "Map View".to_string(),
            href: "CurrentView.kml".to_string(),
            refresh_interval: Duration::from_millis(300),
            fly_to_view: true,
        }
    }

    #[test]
    fn test_link_markup() {
        let kml = link().to_kml().unwrap();
        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(kml.contains("<Folder>\n<open>1</open>\n<name>Map to Globe Sync</name>\n"));
        assert!(kml.contains("<NetworkLink>\n<name>Map View</name>\n<flyToView>1</flyToView>\n"));
        assert!(kml.contains("<href>CurrentView.kml</href>\n"));
        assert!(kml.contains("<refreshMode>onInterval</refreshMode>\n"));
        assert!(kml.contains("<refreshInterval>0.300000</refreshInterval>\n"));
        assert!(kml.ends_with("</Folder>\n</kml>"));
    }

    #[test]
    fn test_fly_to_view_disabled() {
        let mut l = link();
        l.fly_to_view = false;
        assert!(l.to_kml().unwrap().contains("<flyToView>0</flyToView>"));
    }

    #[test]
    fn test_names_are_escaped() {
        let mut l = link();
        l.link_name = "Roads & <Rivers>".to_string();
        assert!(l.to_kml().unwrap().contains("<name>Roads &amp; &lt;Rivers&gt;</name>"));
    }
}
