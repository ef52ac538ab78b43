use askama::Template;

use super::link::LinkDescriptor;
use super::look_at::LookAtDescriptor;

#[derive(Template)]
#[template(path = "current_view.kml", escape = "xml")]
pub struct CurrentViewTemplate<'a> {
    pub view: &'a LookAtDescriptor,
    pub altitude_mode: &'static str,
}

#[derive(Template)]
#[template(path = "network_link.kml", escape = "xml")]
pub struct NetworkLinkTemplate<'a> {
    pub link: &'a LinkDescriptor,
    pub refresh_mode: &'static str,
    /// Seconds; the viewer accepts sub-second intervals.
    pub refresh_interval_s: f64,
}
