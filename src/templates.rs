use askama::Template;

use crate::render::View;

/// Just the titled container panel; pushed to browsers over `/events`.
#[derive(Template)]
#[template(path = "panel.html")]
pub struct PanelTemplate<'a> {
    pub view: &'a View,
}

/// Full page wrapping the panel plus the live-update script.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub view: &'a View,
    pub reconnect_ms: u64,
}
