// 📤 CSV Exporter - serializes the filtered view for download
//
// Column order is fixed. A cell is quoted only when it needs to be;
// embedded quotes are doubled.

use crate::filter::{filter_records, SeverityFilter, StatusFilter};
use crate::record::{Field, Record};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use csv::{QuoteStyle, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};

pub const CSV_MIME: &str = "text/csv;charset=utf-8";

pub const CSV_HEADERS: [&str; 9] = [
    "ID",
    "Name",
    "Email",
    "Phone",
    "Street",
    "City",
    "Zipcode",
    "Status",
    "Validation Errors",
];

/// A rendered export, ready to be written or sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
    pub row_count: usize,
}

impl CsvExport {
    pub fn mime_type(&self) -> &'static str {
        CSV_MIME
    }

    /// Write the export into `dir` under its generated filename
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create export directory {:?}", dir))?;

        let path = dir.join(&self.filename);
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write export {:?}", path))?;

        tracing::info!(path = %path.display(), rows = self.row_count, "CSV export written");
        Ok(path)
    }
}

/// `data-review[-<status>][-<severity>]-<YYYY-MM-DD>.csv`
pub fn export_filename(status: StatusFilter, severity: SeverityFilter, date: NaiveDate) -> String {
    let mut name = String::from("data-review");
    if !status.is_all() {
        name.push('-');
        name.push_str(status.as_str());
    }
    if !severity.is_all() {
        name.push('-');
        name.push_str(severity.as_str());
    }
    format!("{}-{}.csv", name, date.format("%Y-%m-%d"))
}

/// `"<field>: <message>"` for each error entry, joined by `"; "`
pub fn validation_errors_cell(record: &Record) -> String {
    record
        .errors
        .iter()
        .map(|(field, error)| format!("{}: {}", field, error.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Serialize records as CSV text, header row first
pub fn to_csv(records: &[&Record]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADERS)?;

    for record in records {
        let mut row: Vec<String> = Field::ALL
            .iter()
            .map(|f| record.value(*f).to_string())
            .collect();
        row.push(validation_errors_cell(record));
        wtr.write_record(&row)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Filter `records` with the selectors and render the result
pub fn export_csv(
    records: &[Record],
    status: StatusFilter,
    severity: SeverityFilter,
    date: NaiveDate,
) -> Result<CsvExport> {
    let selected = filter_records(records, status, severity);
    let content = to_csv(&selected)?;

    Ok(CsvExport {
        filename: export_filename(status, severity, date),
        content,
        row_count: selected.len(),
    })
}

/// Same as [`export_csv`], dated with the local calendar day
pub fn export_csv_today(
    records: &[Record],
    status: StatusFilter,
    severity: SeverityFilter,
) -> Result<CsvExport> {
    export_csv(records, status, severity, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FieldErrors, Severity, Status, ValidationError};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn record(id: &str, name: &str, status: Status, errors: FieldErrors) -> Record {
        Record {
            id: id.to_string(),
            name: name.to_string(),
            email: "someone@example.com".to_string(),
            phone: "555-0100".to_string(),
            street: "1 Elm St".to_string(),
            city: "Springfield".to_string(),
            zipcode: "12345".to_string(),
            status,
            errors,
        }
    }

    fn email_critical() -> FieldErrors {
        [(Field::Email, ValidationError::new("Invalid format", Severity::Critical))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_filename_with_filters() {
        assert_eq!(
            export_filename(StatusFilter::Active, SeverityFilter::Critical, date()),
            "data-review-active-critical-2024-01-15.csv"
        );
        assert_eq!(
            export_filename(StatusFilter::All, SeverityFilter::All, date()),
            "data-review-2024-01-15.csv"
        );
        assert_eq!(
            export_filename(StatusFilter::All, SeverityFilter::Warning, date()),
            "data-review-warning-2024-01-15.csv"
        );
        assert_eq!(
            export_filename(StatusFilter::Pending, SeverityFilter::All, date()),
            "data-review-pending-2024-01-15.csv"
        );
    }

    #[test]
    fn test_header_row() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(
            csv,
            "ID,Name,Email,Phone,Street,City,Zipcode,Status,Validation Errors\n"
        );
    }

    #[test]
    fn test_quote_and_comma_escaping() {
        let r = record("7", "O\"Brien, Jr.", Status::Active, FieldErrors::new());
        let csv = to_csv(&[&r]).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert!(row.starts_with("7,\"O\"\"Brien, Jr.\",someone@example.com,"));
    }

    #[test]
    fn test_plain_cells_are_not_quoted() {
        let r = record("8", "Jane Roe", Status::Pending, FieldErrors::new());
        let csv = to_csv(&[&r]).unwrap();

        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "8,Jane Roe,someone@example.com,555-0100,1 Elm St,Springfield,12345,pending,"
        );
    }

    #[test]
    fn test_line_breaks_are_quoted() {
        let r = record("9", "line1\nline2", Status::Active, FieldErrors::new());
        let csv = to_csv(&[&r]).unwrap();

        assert!(csv.contains("9,\"line1\nline2\",someone@example.com,"));

        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let row = rdr.records().next().unwrap().unwrap();
        assert_eq!(&row[1], "line1\nline2");
    }

    #[test]
    fn test_other_special_characters_stay_unquoted() {
        let mut r = record("10", " lead", Status::Active, FieldErrors::new());
        r.email = "#hash".to_string();
        r.phone = "tab\there".to_string();
        r.street = "a;b".to_string();
        r.city = String::new();
        let csv = to_csv(&[&r]).unwrap();

        assert_eq!(
            csv.lines().nth(1).unwrap(),
            "10, lead,#hash,tab\there,a;b,,12345,active,"
        );
    }

    #[test]
    fn test_validation_errors_cell() {
        let errors: FieldErrors = [
            (Field::Zipcode, ValidationError::new("Too short", Severity::Warning)),
            (Field::Email, ValidationError::new("Invalid format", Severity::Critical)),
        ]
        .into_iter()
        .collect();
        let r = record("1", "A", Status::Active, errors);

        assert_eq!(
            validation_errors_cell(&r),
            "zipcode: Too short; email: Invalid format"
        );
    }

    #[test]
    fn test_round_trip_through_csv_reader() {
        let tricky = record("1", "O\"Brien, Jr.", Status::Active, email_critical());
        let plain = record("2", "Plain", Status::Inactive, FieldErrors::new());
        let csv = to_csv(&[&tricky, &plain]).unwrap();

        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADERS.to_vec());

        let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "O\"Brien, Jr.");
        assert_eq!(&rows[0][7], "active");
        assert_eq!(&rows[0][8], "email: Invalid format");
        assert_eq!(&rows[1][1], "Plain");
        assert_eq!(&rows[1][8], "");
    }

    #[test]
    fn test_export_applies_filters() {
        let records = vec![
            record("1", "A", Status::Active, email_critical()),
            record("2", "B", Status::Active, FieldErrors::new()),
            record("3", "C", Status::Pending, email_critical()),
        ];

        let export = export_csv(&records, StatusFilter::Active, SeverityFilter::Critical, date())
            .unwrap();

        assert_eq!(export.filename, "data-review-active-critical-2024-01-15.csv");
        assert_eq!(export.row_count, 1);
        assert_eq!(export.content.lines().count(), 2);
        assert!(export.content.lines().nth(1).unwrap().starts_with("1,A,"));
        assert_eq!(export.mime_type(), "text/csv;charset=utf-8");
    }

    #[test]
    fn test_save_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested");
        let records = vec![record("1", "A", Status::Active, FieldErrors::new())];

        let export = export_csv(&records, StatusFilter::All, SeverityFilter::All, date()).unwrap();
        let path = export.save_to(&target).unwrap();

        assert_eq!(path, target.join("data-review-2024-01-15.csv"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), export.content);
    }
}
