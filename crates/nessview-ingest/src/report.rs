//! One scan run's full result set

use crate::document::LoadStats;
use crate::finding::Finding;
use crate::host::Host;
use crate::schema::SchemaVersion;
use crate::xml::Element;
use nessview_core::{Result, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Plugin id of the scanner's "Scan Information" plugin. Its output
/// describes the scan itself (engine version, policy, duration) rather
/// than a vulnerability, and is surfaced as the report's scan info.
pub const SCAN_INFO_PLUGIN_ID: u32 = 19506;

/// Sentinel scan info for reports without a scan-information finding
pub const NO_SCAN_INFO: &str = "NO SCAN INFO";

/// One scan run: its hosts, severity buckets, and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    version: SchemaVersion,
    name: String,
    hosts: Vec<Host>,
    findings_by_severity: BTreeMap<Severity, Vec<Finding>>,
    scan_info: String,
    policy: Option<String>,
}

impl Report {
    /// Build a report from a `Report` element
    ///
    /// Malformed individual findings are skipped (see `Host`); a missing
    /// report-level required field fails the whole report.
    pub(crate) fn from_element(
        element: &Element,
        version: SchemaVersion,
        stats: &mut LoadStats,
    ) -> Result<Self> {
        let adapter = version.adapter();
        let name = adapter.report_name(element)?;

        // Hosts are collected in document order first: the severity
        // buckets and the scan-info lookup both depend on that order.
        let mut hosts = Vec::new();
        for host_element in element.children("ReportHost") {
            hosts.push(Host::from_element(host_element, adapter, stats)?);
        }

        let mut findings_by_severity: BTreeMap<Severity, Vec<Finding>> = Severity::ALL
            .iter()
            .map(|severity| (*severity, Vec::new()))
            .collect();
        for host in &hosts {
            for finding in &host.findings {
                findings_by_severity
                    .entry(finding.severity)
                    .or_default()
                    .push(finding.clone());
            }
        }
        for bucket in findings_by_severity.values_mut() {
            // Stable sort: ties keep original document order.
            bucket.sort_by_key(|f| f.plugin_id);
        }

        let scan_info = hosts
            .iter()
            .flat_map(|host| &host.findings)
            .find(|f| f.plugin_id == SCAN_INFO_PLUGIN_ID)
            .map(|f| f.output.clone())
            .unwrap_or_else(|| NO_SCAN_INFO.to_string());

        let policy = resolve_policy(element);

        hosts.sort();

        Ok(Self {
            version,
            name,
            hosts,
            findings_by_severity,
            scan_info,
            policy,
        })
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hosts, sorted by the IP-aware address ordering
    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    /// Findings in the given severity bucket, ascending by plugin id
    pub fn findings_with_severity(&self, severity: Severity) -> &[Finding] {
        self.findings_by_severity
            .get(&severity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Output of the scan-information finding, or `"NO SCAN INFO"`
    pub fn scan_info(&self) -> &str {
        &self.scan_info
    }

    /// Policy name and comments joined by a blank line, when present
    pub fn policy(&self) -> Option<&str> {
        self.policy.as_deref()
    }

    /// Every host owning at least one finding with the given plugin id,
    /// in host order
    pub fn hosts_with_finding(&self, plugin_id: u32) -> Vec<&Host> {
        self.hosts
            .iter()
            .filter(|host| host.has_finding(plugin_id))
            .collect()
    }
}

/// Join policy name and comments with a blank line; absent when both are
/// missing or empty
fn resolve_policy(element: &Element) -> Option<String> {
    let name = element
        .find("Policy/policyName")
        .map(|e| e.text().to_string())
        .filter(|t| !t.is_empty());
    let comments = element
        .find("Policy/policyComments")
        .map(|e| e.text().to_string())
        .filter(|t| !t.is_empty());

    if name.is_none() && comments.is_none() {
        return None;
    }
    let parts: Vec<String> = name.into_iter().chain(comments).collect();
    Some(parts.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(xml: &str, version: SchemaVersion) -> Report {
        let element = Element::parse(xml).unwrap();
        Report::from_element(&element, version, &mut LoadStats::default()).unwrap()
    }

    #[test]
    fn test_bucket_membership_and_order() {
        let report = build(
            r#"<Report name="r">
                <ReportHost name="10.0.0.2">
                    <ReportItem pluginID="300" pluginName="c" severity="3"/>
                    <ReportItem pluginID="100" pluginName="a" severity="3"/>
                    <ReportItem pluginID="50" pluginName="z" severity="1"/>
                </ReportHost>
                <ReportHost name="10.0.0.1">
                    <ReportItem pluginID="200" pluginName="b" severity="3"/>
                </ReportHost>
            </Report>"#,
            SchemaVersion::V2,
        );

        let highs: Vec<u32> = report
            .findings_with_severity(Severity::High)
            .iter()
            .map(|f| f.plugin_id)
            .collect();
        assert_eq!(highs, vec![100, 200, 300]);
        assert_eq!(report.findings_with_severity(Severity::Low).len(), 1);
        assert_eq!(report.findings_with_severity(Severity::Medium).len(), 0);
        assert_eq!(report.findings_with_severity(Severity::Other).len(), 0);
    }

    #[test]
    fn test_tied_plugin_ids_keep_document_order() {
        let report = build(
            r#"<Report name="r">
                <ReportHost name="h1">
                    <ReportItem pluginID="10" pluginName="first" severity="2"/>
                </ReportHost>
                <ReportHost name="h2">
                    <ReportItem pluginID="10" pluginName="second" severity="2"/>
                </ReportHost>
            </Report>"#,
            SchemaVersion::V2,
        );

        let names: Vec<&str> = report
            .findings_with_severity(Severity::Medium)
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_hosts_sorted_numerically() {
        let report = build(
            r#"<Report name="r">
                <ReportHost name="10.0.0.10"/>
                <ReportHost name="9.0.0.1"/>
                <ReportHost name="10.0.0.2"/>
            </Report>"#,
            SchemaVersion::V2,
        );

        let addresses: Vec<&str> =
            report.hosts().iter().map(|h| h.address.as_str()).collect();
        assert_eq!(addresses, vec!["9.0.0.1", "10.0.0.2", "10.0.0.10"]);
    }

    #[test]
    fn test_scan_info_sentinel() {
        let with_info = build(
            r#"<Report name="r">
                <ReportHost name="h">
                    <ReportItem pluginID="19506" pluginName="Nessus Scan Information" severity="0">
                        <plugin_output>engine details</plugin_output>
                    </ReportItem>
                </ReportHost>
            </Report>"#,
            SchemaVersion::V2,
        );
        assert_eq!(with_info.scan_info(), "Plugin Output:\nengine details\n\n");

        let without = build(r#"<Report name="r"><ReportHost name="h"/></Report>"#, SchemaVersion::V2);
        assert_eq!(without.scan_info(), NO_SCAN_INFO);
    }

    #[test]
    fn test_policy_resolution() {
        let both = build(
            r#"<Report name="r">
                <Policy>
                    <policyName>Default</policyName>
                    <policyComments>weekly sweep</policyComments>
                </Policy>
            </Report>"#,
            SchemaVersion::V2,
        );
        assert_eq!(both.policy(), Some("Default\n\nweekly sweep"));

        let name_only = build(
            r#"<Report name="r"><Policy><policyName>Default</policyName></Policy></Report>"#,
            SchemaVersion::V2,
        );
        assert_eq!(name_only.policy(), Some("Default"));

        let neither = build(r#"<Report name="r"/>"#, SchemaVersion::V2);
        assert_eq!(neither.policy(), None);
    }

    #[test]
    fn test_malformed_finding_is_skipped_not_fatal() {
        let element = Element::parse(
            r#"<Report name="r">
                <ReportHost name="h">
                    <ReportItem pluginName="no id or severity"/>
                    <ReportItem pluginID="5" pluginName="ok" severity="1"/>
                </ReportHost>
            </Report>"#,
        )
        .unwrap();
        let mut stats = LoadStats::default();
        let report =
            Report::from_element(&element, SchemaVersion::V2, &mut stats).unwrap();

        assert_eq!(report.findings_with_severity(Severity::Low).len(), 1);
        assert_eq!(stats.items_processed, 2);
        assert_eq!(stats.items_imported, 1);
        assert_eq!(stats.items_skipped, 1);
    }

    #[test]
    fn test_missing_v2_name_fails_report() {
        let element = Element::parse("<Report><ReportHost name=\"h\"/></Report>").unwrap();
        let err = Report::from_element(&element, SchemaVersion::V2, &mut LoadStats::default())
            .unwrap_err();
        assert_eq!(err.code(), "REQUIRED_FIELD_MISSING");
    }

    #[test]
    fn test_v1_report() {
        let report = build(
            r#"<Report>
                <ReportName>nightly</ReportName>
                <ReportHost>
                    <HostName>10.0.0.1</HostName>
                    <ReportItem>
                        <pluginID>11</pluginID>
                        <pluginName>old style</pluginName>
                        <severity>2</severity>
                        <data>blob</data>
                    </ReportItem>
                </ReportHost>
            </Report>"#,
            SchemaVersion::V1,
        );

        assert_eq!(report.name(), "nightly");
        let bucket = report.findings_with_severity(Severity::Medium);
        assert_eq!(bucket.len(), 1);
        assert_eq!(bucket[0].output, "blob");
        assert_eq!(report.hosts()[0].address, "10.0.0.1");
    }
}
