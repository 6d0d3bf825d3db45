// 🔎 View Filter - status and severity selectors
// Computes the subset of records the reviewer is looking at.
// Filtering borrows from the store and never reorders or mutates it.

use crate::record::{Record, Severity, Status};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} filter '{value}' (expected one of: {expected})")]
pub struct FilterParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

// ============================================================================
// STATUS SELECTOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Pending,
    Inactive,
}

impl StatusFilter {
    /// Menu order
    pub const ALL: [StatusFilter; 4] = [
        StatusFilter::All,
        StatusFilter::Active,
        StatusFilter::Pending,
        StatusFilter::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Pending => "pending",
            StatusFilter::Inactive => "inactive",
        }
    }

    pub fn is_all(&self) -> bool {
        *self == StatusFilter::All
    }

    pub fn matches(&self, record: &Record) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => record.status == Status::Active,
            StatusFilter::Pending => record.status == Status::Pending,
            StatusFilter::Inactive => record.status == Status::Inactive,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Active,
            StatusFilter::Active => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Inactive,
            StatusFilter::Inactive => StatusFilter::All,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| FilterParseError {
                kind: "status",
                value: s.to_string(),
                expected: "all, active, pending, inactive",
            })
    }
}

// ============================================================================
// SEVERITY SELECTOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityFilter {
    #[default]
    All,
    Critical,
    Warning,
    Valid,
}

impl SeverityFilter {
    pub const ALL: [SeverityFilter; 4] = [
        SeverityFilter::All,
        SeverityFilter::Critical,
        SeverityFilter::Warning,
        SeverityFilter::Valid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityFilter::All => "all",
            SeverityFilter::Critical => "critical",
            SeverityFilter::Warning => "warning",
            SeverityFilter::Valid => "valid",
        }
    }

    pub fn is_all(&self) -> bool {
        *self == SeverityFilter::All
    }

    /// `Valid` means the record carries no critical or warning finding.
    /// Explicit `valid` entries are not required.
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Critical => record.has_severity(Severity::Critical),
            SeverityFilter::Warning => record.has_severity(Severity::Warning),
            SeverityFilter::Valid => !record.has_issues(),
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SeverityFilter::All => SeverityFilter::Critical,
            SeverityFilter::Critical => SeverityFilter::Warning,
            SeverityFilter::Warning => SeverityFilter::Valid,
            SeverityFilter::Valid => SeverityFilter::All,
        }
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeverityFilter {
    type Err = FilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SeverityFilter::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| FilterParseError {
                kind: "severity",
                value: s.to_string(),
                expected: "all, critical, warning, valid",
            })
    }
}

// ============================================================================
// FILTER
// ============================================================================

/// Records matching both selectors, in their original order
pub fn filter_records<'a>(
    records: &'a [Record],
    status: StatusFilter,
    severity: SeverityFilter,
) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|r| status.matches(r) && severity.matches(r))
        .collect()
}
