//! Cross-document aggregation and query surface

use crate::document::Document;
use crate::finding::Finding;
use crate::host::Host;
use crate::report::Report;
use nessview_core::Severity;
use std::collections::BTreeMap;

/// Aggregation over every report of an ordered set of documents
///
/// Borrows from the documents rather than owning them; rebuild it
/// whenever the document set changes.
#[derive(Debug)]
pub struct MergedCollection<'a> {
    reports: Vec<&'a Report>,
    findings_by_severity: BTreeMap<Severity, Vec<&'a Finding>>,
    hosts: Vec<&'a Host>,
}

/// Merge every report of every document, in input order
pub fn merge(documents: &[Document]) -> MergedCollection<'_> {
    MergedCollection::new(documents)
}

impl<'a> MergedCollection<'a> {
    pub fn new(documents: &'a [Document]) -> Self {
        let reports: Vec<&Report> = documents
            .iter()
            .flat_map(|document| document.reports())
            .collect();

        // Buckets are concatenated in document/report input order, never
        // re-sorted globally: within-report plugin-id order is preserved,
        // cross-report order follows the input.
        let mut findings_by_severity: BTreeMap<Severity, Vec<&Finding>> = Severity::ALL
            .iter()
            .map(|severity| (*severity, Vec::new()))
            .collect();
        for report in &reports {
            for severity in Severity::ALL {
                findings_by_severity
                    .entry(severity)
                    .or_default()
                    .extend(report.findings_with_severity(severity));
            }
        }

        // The host union keeps duplicates: a host scanned in two reports
        // appears twice. One global sort by the address ordering.
        let mut hosts: Vec<&Host> = reports.iter().flat_map(|report| report.hosts()).collect();
        hosts.sort();

        Self {
            reports,
            findings_by_severity,
            hosts,
        }
    }

    /// Every report across the merged documents, in input order
    pub fn reports(&self) -> &[&'a Report] {
        &self.reports
    }

    /// Merged host union (duplicates retained), globally sorted
    pub fn hosts(&self) -> &[&'a Host] {
        &self.hosts
    }

    /// Concatenated severity bucket across all reports
    pub fn findings_with_severity(&self, severity: Severity) -> &[&'a Finding] {
        self.findings_by_severity
            .get(&severity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every merged host owning at least one finding with the given
    /// plugin id, in host order
    pub fn hosts_with_finding(&self, plugin_id: u32) -> Vec<&'a Host> {
        self.hosts
            .iter()
            .filter(|host| host.has_finding(plugin_id))
            .copied()
            .collect()
    }
}
