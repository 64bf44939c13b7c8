//! A scanned endpoint and its findings

use crate::document::LoadStats;
use crate::finding::Finding;
use crate::schema::SchemaAdapter;
use crate::xml::Element;
use nessview_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::net::Ipv4Addr;
use tracing::warn;

/// Parse an address as an IPv4 literal, yielding its numeric value
pub fn try_parse_ipv4(address: &str) -> Option<u32> {
    address.parse::<Ipv4Addr>().ok().map(u32::from)
}

/// IP-aware address comparison with string fallback
///
/// When both sides parse as IPv4 the comparison is numeric; otherwise the
/// raw strings are compared. Over a mix of parseable and unparseable
/// addresses this is not globally transitive (mixed pairs only compare as
/// strings) - an accepted limitation carried over from the scanner's own
/// ordering, preserved so that merge/sort output stays compatible.
pub fn compare_addresses(a: &str, b: &str) -> Ordering {
    match (try_parse_ipv4(a), try_parse_ipv4(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// One scanned host and the findings recorded against it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    /// Primary identity: an IPv4 literal when resolvable, otherwise an
    /// opaque name
    pub address: String,
    /// Normalized DNS name, empty when unavailable
    pub dns_name: String,
    /// Findings in document order
    pub findings: Vec<Finding>,
}

impl Host {
    /// Build a host from a `ReportHost` element
    ///
    /// Malformed findings are skipped with a warning and counted in the
    /// stats; a host with no resolvable address at all fails, which fails
    /// the containing report.
    pub(crate) fn from_element(
        element: &Element,
        adapter: &dyn SchemaAdapter,
        stats: &mut LoadStats,
    ) -> Result<Self> {
        let address = adapter
            .host_address(element)
            .or_else(|| element.attr("name").map(str::to_string))
            .ok_or_else(|| Error::RequiredField {
                context: "ReportHost".to_string(),
                field: "address".to_string(),
            })?;

        let dns_name = adapter
            .host_dns_name(element)
            .map(|raw| normalize_dns_name(&raw))
            .unwrap_or_default();

        let mut findings = Vec::new();
        for item in element.children("ReportItem") {
            stats.items_processed += 1;
            match Finding::from_element(item, adapter) {
                Ok(finding) => {
                    findings.push(finding);
                    stats.items_imported += 1;
                }
                Err(err) => {
                    warn!(host = %address, "skipping malformed finding: {err}");
                    stats.items_skipped += 1;
                }
            }
        }

        Ok(Self {
            address,
            dns_name,
            findings,
        })
    }

    /// Whether any finding on this host has the given plugin id
    pub fn has_finding(&self, plugin_id: u32) -> bool {
        self.findings.iter().any(|f| f.plugin_id == plugin_id)
    }

    /// Output of the first finding with the given plugin id, with
    /// escaped-newline sequences unescaped; empty string when no finding
    /// matches
    pub fn finding_output(&self, plugin_id: u32) -> String {
        self.findings
            .iter()
            .find(|f| f.plugin_id == plugin_id)
            .map(|f| f.output.replace("\\n", "\n"))
            .unwrap_or_default()
    }

    /// `"address (dns_name)"` when the two differ, else just the address
    pub fn display(&self) -> String {
        if self.address != self.dns_name {
            format!("{} ({})", self.address, self.dns_name)
        } else {
            self.address.clone()
        }
    }
}

impl std::fmt::Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        compare_addresses(&self.address, &other.address) == Ordering::Equal
    }
}

impl Eq for Host {}

impl PartialOrd for Host {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Host {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_addresses(&self.address, &other.address)
    }
}

/// Strip a trailing dot and map the scanner's `"(unknown)"` marker
fn normalize_dns_name(raw: &str) -> String {
    let name = raw.replace("(unknown)", "unknown");
    match name.strip_suffix('.') {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}
