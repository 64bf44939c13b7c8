//! A single normalized vulnerability or open-port record

use crate::schema::SchemaAdapter;
use crate::xml::Element;
use nessview_core::{Result, Severity};
use serde::{Deserialize, Serialize};

/// One normalized finding extracted from a report item
///
/// Built in one step from a parsed element: all fields are gathered first
/// (with explicit defaults for optional ones), then the value is
/// constructed whole. A finding is never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Plugin id; 0 is the scanner's sentinel for an open-port record
    /// rather than a named vulnerability
    pub plugin_id: u32,
    /// Human-readable title, `"NO NAME"` when the plugin carries none
    pub name: String,
    /// Severity bucket
    pub severity: Severity,
    /// Free-text detail, synthesized per schema version
    pub output: String,
    /// Port string, empty when the item has none
    pub port: String,
}

impl Finding {
    /// Build a finding from a `ReportItem` element
    ///
    /// Fails when a schema-mandatory field (plugin id, severity) is
    /// absent or unparseable; the caller skips the item and keeps going.
    pub fn from_element(item: &Element, adapter: &dyn SchemaAdapter) -> Result<Self> {
        Ok(Self {
            plugin_id: adapter.plugin_id(item)?,
            name: adapter.plugin_name(item),
            severity: adapter.severity(item)?,
            output: adapter.output(item),
            port: adapter.port(item),
        })
    }

    /// Display label: the port for open-port records, otherwise
    /// `"<plugin_id> <name>"`
    pub fn label(&self) -> String {
        if self.plugin_id == 0 {
            format!("PORT: {}", self.port)
        } else {
            format!("{} {}", self.plugin_id, self.name)
        }
    }
}
