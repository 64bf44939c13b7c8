//! End-to-end merge behavior over multiple parsed documents

use nessview_ingest::{merge, Document, Element, Severity, NO_SCAN_INFO};

fn document(xml: &str, path: &str) -> Document {
    let root = Element::parse(xml).expect("fixture parses");
    Document::from_tree(&root, path).expect("fixture loads")
}

const DOC_A: &str = r#"<NessusClientData_v2>
  <Report name="perimeter-high">
    <ReportHost name="10.0.0.5">
      <ReportItem pluginID="1000" pluginName="Remote Code Execution" severity="3" port="443" svc_name="https" protocol="tcp">
        <description>Outdated service allows RCE</description>
        <cve>CVE-2024-0001</cve>
      </ReportItem>
    </ReportHost>
  </Report>
</NessusClientData_v2>"#;

const DOC_B: &str = r#"<NessusClientData_v2>
  <Report name="perimeter-medium">
    <ReportHost name="10.0.0.5">
      <ReportItem pluginID="2000" pluginName="Weak Cipher" severity="2" port="443" svc_name="https" protocol="tcp"/>
    </ReportHost>
  </Report>
</NessusClientData_v2>"#;

#[test]
fn merged_hosts_keep_duplicates_and_lookup_stays_precise() {
    let documents = vec![document(DOC_A, "a.nessus"), document(DOC_B, "b.nessus")];
    let merged = merge(&documents);

    // The same endpoint was scanned by both reports: both entries stay.
    assert_eq!(merged.hosts().len(), 2);
    assert!(merged.hosts().iter().all(|h| h.address == "10.0.0.5"));

    // Only docA's report owns plugin 1000.
    let with_rce = merged.hosts_with_finding(1000);
    assert_eq!(with_rce.len(), 1);
    assert!(with_rce[0].has_finding(1000));
    assert!(!with_rce[0].has_finding(2000));
}

#[test]
fn merged_buckets_follow_document_order() {
    let documents = vec![document(DOC_A, "a.nessus"), document(DOC_B, "b.nessus")];
    let merged = merge(&documents);

    let highs: Vec<u32> = merged
        .findings_with_severity(Severity::High)
        .iter()
        .map(|f| f.plugin_id)
        .collect();
    assert_eq!(highs, vec![1000]);

    let mediums: Vec<u32> = merged
        .findings_with_severity(Severity::Medium)
        .iter()
        .map(|f| f.plugin_id)
        .collect();
    assert_eq!(mediums, vec![2000]);

    assert!(merged.findings_with_severity(Severity::Low).is_empty());
    assert!(merged.findings_with_severity(Severity::Other).is_empty());
}

#[test]
fn reports_without_scan_information_use_the_sentinel() {
    let documents = vec![document(DOC_A, "a.nessus")];
    let merged = merge(&documents);

    assert_eq!(merged.reports().len(), 1);
    assert_eq!(merged.reports()[0].scan_info(), NO_SCAN_INFO);
}

#[test]
fn finding_output_round_trips_through_the_merge() {
    let documents = vec![document(DOC_A, "a.nessus")];
    let merged = merge(&documents);

    let host = merged.hosts_with_finding(1000)[0];
    let output = host.finding_output(1000);
    assert!(output.starts_with("port: 443\nsvc_name: https\nprotocol: tcp\n\n"));
    assert!(output.contains("Description:\nOutdated service allows RCE\n\n"));
    assert!(output.ends_with("CVE: CVE-2024-0001\n"));
}
