//! JSON renderer: the entry list as pretty-printed JSON.

use crate::model::InterfaceEntry;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, entries: &[InterfaceEntry]) -> String {
        let mut out = serde_json::to_string_pretty(entries).unwrap_or_else(|_| "[]".to_string());
        out.push('\n');
        out
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
