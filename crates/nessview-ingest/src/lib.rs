//! Nessview Ingest - Nessus report normalization and aggregation
//!
//! This crate ingests Nessus report files in both schema generations
//! (`NessusClientData` and `NessusClientData_v2`), normalizes them into a
//! single model of documents, reports, hosts, and findings, and merges
//! reports across files into one queryable collection.
//!
//! # Example
//!
//! ```no_run
//! use nessview_ingest::{load_documents, merge, SCAN_INFO_PLUGIN_ID};
//!
//! let outcome = load_documents(&["internal.nessus", "dmz.nessus"]);
//! for failure in &outcome.errors {
//!     eprintln!("{}: {}", failure.path.display(), failure.error);
//! }
//!
//! let merged = merge(&outcome.documents);
//! for host in merged.hosts_with_finding(SCAN_INFO_PLUGIN_ID) {
//!     println!("{}", host.display());
//! }
//! ```

pub mod document;
pub mod finding;
pub mod host;
pub mod merged;
pub mod report;
pub mod schema;
pub mod xml;

pub use document::{load_documents, Document, LoadError, LoadOutcome, LoadStats};
pub use finding::Finding;
pub use host::{compare_addresses, try_parse_ipv4, Host};
pub use merged::{merge, MergedCollection};
pub use report::{Report, NO_SCAN_INFO, SCAN_INFO_PLUGIN_ID};
pub use schema::{SchemaAdapter, SchemaVersion, V1Adapter, V2Adapter, NO_NAME};
pub use xml::Element;

pub use nessview_core::{Error, Result, Severity};
