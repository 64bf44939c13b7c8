//! Severity levels for scan findings

use serde::{Deserialize, Serialize};

/// Severity bucket for a finding
///
/// Nessus reports classify every item with an integer severity between 0
/// and 3. Anything outside that range is rejected at parse time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational or open-port record, no direct security impact
    #[default]
    Other,
    /// Low severity, minimal risk
    Low,
    /// Medium severity, moderate risk
    Medium,
    /// High severity, significant risk
    High,
}

impl Severity {
    /// All buckets, lowest first
    pub const ALL: [Severity; 4] = [
        Severity::Other,
        Severity::Low,
        Severity::Medium,
        Severity::High,
    ];

    /// Convert the scanner's numeric severity to a bucket
    pub fn from_number(value: u8) -> Option<Self> {
        match value {
            0 => Some(Severity::Other),
            1 => Some(Severity::Low),
            2 => Some(Severity::Medium),
            3 => Some(Severity::High),
            _ => None,
        }
    }

    /// Get numeric value for sorting/comparison
    pub fn as_number(&self) -> u8 {
        match self {
            Severity::Other => 0,
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }

    /// Get display string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Other => "Other",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_number() {
        assert_eq!(Severity::from_number(0), Some(Severity::Other));
        assert_eq!(Severity::from_number(3), Some(Severity::High));
        assert_eq!(Severity::from_number(4), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!(Severity::Low > Severity::Other);
    }

    #[test]
    fn test_roundtrip_number() {
        for severity in Severity::ALL {
            assert_eq!(Severity::from_number(severity.as_number()), Some(severity));
        }
    }
}
