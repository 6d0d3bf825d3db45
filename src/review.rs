// 🧭 Review State - selectors and load status as explicit transitions
//
// The dashboard never edits these fields directly; it applies an Action and
// keeps the returned state.

use crate::export::{export_csv, CsvExport};
use crate::filter::{filter_records, SeverityFilter, StatusFilter};
use crate::record::{Field, Record, ValidationError};
use crate::store::RecordStore;
use anyhow::Result;
use chrono::NaiveDate;

pub const NO_ISSUES_MESSAGE: &str = "No validation errors found for this record.";

#[derive(Debug, Clone, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded(RecordStore),
    Failed(String),
}

#[derive(Debug, Clone)]
pub enum Action {
    SetStatusFilter(StatusFilter),
    SetSeverityFilter(SeverityFilter),
    ClearFilters,
    DataLoaded(RecordStore),
    LoadFailed(String),
}

#[derive(Debug, Clone, Default)]
pub struct ReviewState {
    pub status_filter: StatusFilter,
    pub severity_filter: SeverityFilter,
    pub load: LoadState,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(self, action: Action) -> Self {
        match action {
            Action::SetStatusFilter(status_filter) => ReviewState {
                status_filter,
                ..self
            },
            Action::SetSeverityFilter(severity_filter) => ReviewState {
                severity_filter,
                ..self
            },
            Action::ClearFilters => ReviewState {
                status_filter: StatusFilter::All,
                severity_filter: SeverityFilter::All,
                ..self
            },
            Action::DataLoaded(store) => match self.load {
                LoadState::Loading => ReviewState {
                    load: LoadState::Loaded(store),
                    ..self
                },
                _ => {
                    tracing::warn!("Ignoring load result that arrived after the first one");
                    self
                }
            },
            Action::LoadFailed(message) => match self.load {
                LoadState::Loading => ReviewState {
                    load: LoadState::Failed(message),
                    ..self
                },
                _ => {
                    tracing::warn!(%message, "Ignoring load failure that arrived after the first result");
                    self
                }
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading)
    }

    pub fn store(&self) -> Option<&RecordStore> {
        match &self.load {
            LoadState::Loaded(store) => Some(store),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.load {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// The filtered view; empty until data has loaded
    pub fn visible_records(&self) -> Vec<&Record> {
        match self.store() {
            Some(store) => filter_records(store.records(), self.status_filter, self.severity_filter),
            None => Vec::new(),
        }
    }

    /// Export the current view, or `None` when nothing is loaded
    pub fn export(&self, date: NaiveDate) -> Option<Result<CsvExport>> {
        self.store().map(|store| {
            export_csv(store.records(), self.status_filter, self.severity_filter, date)
        })
    }
}

// ============================================================================
// ERROR SUMMARY
// ============================================================================

/// Lines of the per-record error summary: one per critical or warning field,
/// or the single "no errors" message.
pub fn error_summary(record: &Record) -> Vec<String> {
    let lines: Vec<String> = record
        .issues()
        .map(|(field, error)| summary_line(field, error))
        .collect();

    if lines.is_empty() {
        vec![NO_ISSUES_MESSAGE.to_string()]
    } else {
        lines
    }
}

fn summary_line(field: Field, error: &ValidationError) -> String {
    format!("[{}] {}: {}", error.severity, field.label(), error.message)
}
