//! Schema version detection and per-version field extraction
//!
//! The two Nessus file generations locate the same logical fields in
//! different places: V1 keeps everything in child elements, V2 moves most
//! of it into attributes and `HostProperties` tags. `SchemaAdapter`
//! isolates every one of those differences so the model types never
//! branch on version themselves. The adapter is picked once, at document
//! load time, and threaded into the constructors.

use crate::xml::Element;
use nessview_core::{Error, Result, Severity};
use serde::{Deserialize, Serialize};

/// Default title when a plugin carries no name
pub const NO_NAME: &str = "NO NAME";

/// Schema generation of an input file, detected from its root tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaVersion {
    V1,
    V2,
}

impl SchemaVersion {
    /// Detect the schema version from the input's root tag name
    pub fn from_root_tag(tag: &str) -> Option<Self> {
        match tag {
            "NessusClientData" => Some(SchemaVersion::V1),
            "NessusClientData_v2" => Some(SchemaVersion::V2),
            _ => None,
        }
    }

    /// The field-extraction adapter for this version
    pub fn adapter(&self) -> &'static dyn SchemaAdapter {
        match self {
            SchemaVersion::V1 => &V1Adapter,
            SchemaVersion::V2 => &V2Adapter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1 => "v1",
            SchemaVersion::V2 => "v2",
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-version field extraction rules
///
/// Fields the schema declares required surface as errors when absent;
/// optional fields fall back to documented defaults.
pub trait SchemaAdapter: Sync {
    /// Plugin id of a report item (required)
    fn plugin_id(&self, item: &Element) -> Result<u32>;

    /// Plugin name of a report item, `"NO NAME"` when absent
    fn plugin_name(&self, item: &Element) -> String;

    /// Severity of a report item (required, 0..=3)
    fn severity(&self, item: &Element) -> Result<Severity>;

    /// Port string of a report item, empty when absent
    fn port(&self, item: &Element) -> String;

    /// Free-text detail of a report item, synthesized per version
    fn output(&self, item: &Element) -> String;

    /// Version-specific primary address of a report host
    fn host_address(&self, host: &Element) -> Option<String>;

    /// Version-specific DNS name of a report host, not yet normalized
    fn host_dns_name(&self, host: &Element) -> Option<String>;

    /// Name of a report (required; V1 may fall back to the first host)
    fn report_name(&self, report: &Element) -> Result<String>;
}

/// V1 (`NessusClientData`): fields live in child elements
pub struct V1Adapter;

/// V2 (`NessusClientData_v2`): fields live in attributes and property tags
pub struct V2Adapter;

impl SchemaAdapter for V1Adapter {
    fn plugin_id(&self, item: &Element) -> Result<u32> {
        let text = item
            .child("pluginID")
            .map(Element::text)
            .ok_or_else(|| missing("ReportItem", "pluginID"))?;
        parse_u32("pluginID", text)
    }

    fn plugin_name(&self, item: &Element) -> String {
        match item.child("pluginName") {
            Some(name) => name.text().to_string(),
            None => NO_NAME.to_string(),
        }
    }

    fn severity(&self, item: &Element) -> Result<Severity> {
        let text = item
            .child("severity")
            .map(Element::text)
            .ok_or_else(|| missing("ReportItem", "severity"))?;
        parse_severity(text)
    }

    fn port(&self, item: &Element) -> String {
        item.child("port")
            .map(|e| e.text().to_string())
            .unwrap_or_default()
    }

    fn output(&self, item: &Element) -> String {
        // V1 carries the whole detail blob verbatim in a single element.
        item.child("data")
            .map(|e| e.text().to_string())
            .unwrap_or_default()
    }

    fn host_address(&self, host: &Element) -> Option<String> {
        host.child("HostName")
            .map(|e| e.text().to_string())
            .filter(|s| !s.is_empty())
    }

    fn host_dns_name(&self, host: &Element) -> Option<String> {
        host.child("dns_name").map(|e| e.text().to_string())
    }

    fn report_name(&self, report: &Element) -> Result<String> {
        if let Some(name) = report.child("ReportName") {
            return Ok(name.text().to_string());
        }
        report
            .find("ReportHost/HostName")
            .map(|e| e.text().to_string())
            .ok_or_else(|| missing("Report", "ReportName"))
    }
}

impl SchemaAdapter for V2Adapter {
    fn plugin_id(&self, item: &Element) -> Result<u32> {
        let value = item
            .attr("pluginID")
            .ok_or_else(|| missing("ReportItem", "pluginID"))?;
        parse_u32("pluginID", value)
    }

    fn plugin_name(&self, item: &Element) -> String {
        match item.attr("pluginName") {
            Some(name) => name.to_string(),
            None => NO_NAME.to_string(),
        }
    }

    fn severity(&self, item: &Element) -> Result<Severity> {
        let value = item
            .attr("severity")
            .ok_or_else(|| missing("ReportItem", "severity"))?;
        parse_severity(value)
    }

    fn port(&self, item: &Element) -> String {
        item.attr("port").unwrap_or_default().to_string()
    }

    /// Synthesize the detail text from V2's scattered attributes and
    /// sub-elements. Ordering and labeling are fixed for compatibility
    /// with downstream text consumers; absent optional fields are
    /// skipped, never rendered as placeholders.
    fn output(&self, item: &Element) -> String {
        let mut out = String::new();

        let mut wrote_header = false;
        for key in ["port", "svc_name", "protocol"] {
            if let Some(value) = item.attr(key) {
                out.push_str(key);
                out.push_str(": ");
                out.push_str(value);
                out.push('\n');
                wrote_header = true;
            }
        }
        if wrote_header {
            out.push('\n');
        }

        for name in ["description", "plugin_output", "cvss_vector", "cvss_base_score"] {
            if let Some(child) = item.child(name) {
                out.push_str(&title_case(name));
                out.push_str(":\n");
                out.push_str(child.text());
                out.push_str("\n\n");
            }
        }

        for identifier in ["cve", "bid", "xref"] {
            for child in item.children(identifier) {
                out.push_str(&identifier.to_uppercase());
                out.push_str(": ");
                out.push_str(child.text());
                out.push('\n');
            }
        }

        out
    }

    fn host_address(&self, host: &Element) -> Option<String> {
        host_property(host, "host-ip")
    }

    fn host_dns_name(&self, host: &Element) -> Option<String> {
        host_property(host, "host-fqdn")
    }

    fn report_name(&self, report: &Element) -> Result<String> {
        report
            .attr("name")
            .map(str::to_string)
            .ok_or_else(|| missing("Report", "name"))
    }
}

fn host_property(host: &Element, name: &str) -> Option<String> {
    host.find_all("HostProperties/tag")
        .into_iter()
        .find(|tag| tag.attr("name") == Some(name))
        .map(|tag| tag.text().to_string())
}

fn missing(context: &str, field: &str) -> Error {
    Error::RequiredField {
        context: context.to_string(),
        field: field.to_string(),
    }
}

fn parse_u32(field: &str, value: &str) -> Result<u32> {
    value.parse().map_err(|_| Error::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_severity(value: &str) -> Result<Severity> {
    value
        .parse::<u8>()
        .ok()
        .and_then(Severity::from_number)
        .ok_or_else(|| Error::InvalidField {
            field: "severity".to_string(),
            value: value.to_string(),
        })
}

/// `"plugin_output"` -> `"Plugin Output"`
fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
