// 📇 Record Model - imported rows with per-field validation results
// Records are loaded once and never mutated afterwards.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// ENUMS
// ============================================================================

/// Review status of an imported record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pending,
    Active,
    Inactive,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Active, Status::Pending, Status::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical, // Blocks the record from being accepted
    Warning,  // Questionable but not blocking
    Valid,    // Checked and fine
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Valid => "valid",
        }
    }

    /// Critical and warning findings are the ones a reviewer has to look at
    pub fn is_issue(&self) -> bool {
        matches!(self, Severity::Critical | Severity::Warning)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of fields a validation result can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Id,
    Name,
    Email,
    Phone,
    Street,
    City,
    Zipcode,
    Status,
}

impl Field {
    /// Column order used by the table and the CSV export
    pub const ALL: [Field; 8] = [
        Field::Id,
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Street,
        Field::City,
        Field::Zipcode,
        Field::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Street => "street",
            Field::City => "city",
            Field::Zipcode => "zipcode",
            Field::Status => "status",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Id => "ID",
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Street => "Street",
            Field::City => "City",
            Field::Zipcode => "Zipcode",
            Field::Status => "Status",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub message: String,
    pub severity: Severity,
}

impl ValidationError {
    pub fn new(message: &str, severity: Severity) -> Self {
        ValidationError {
            message: message.to_string(),
            severity,
        }
    }
}

/// Per-field validation results of one record.
///
/// Serialized as a JSON object keyed by field name. Entries keep the order
/// they had in the source document; a repeated key overwrites the earlier
/// entry in its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(Field, ValidationError)>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors(Vec::new())
    }

    pub fn insert(&mut self, field: Field, error: ValidationError) {
        match self.0.iter_mut().find(|(f, _)| *f == field) {
            Some(entry) => entry.1 = error,
            None => self.0.push((field, error)),
        }
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, e)| e)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.0.iter().map(|(f, e)| (*f, e))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Field, ValidationError)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (Field, ValidationError)>>(iter: I) -> Self {
        let mut errors = FieldErrors::new();
        for (field, error) in iter {
            errors.insert(field, error);
        }
        errors
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, error) in &self.0 {
            map.serialize_entry(field, error)?;
        }
        map.end()
    }
}

struct FieldErrorsVisitor;

impl<'de> Visitor<'de> for FieldErrorsVisitor {
    type Value = FieldErrors;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of field names to validation errors")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<FieldErrors, A::Error> {
        let mut errors = FieldErrors::new();
        while let Some((field, error)) = access.next_entry::<Field, ValidationError>()? {
            errors.insert(field, error);
        }
        Ok(errors)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<FieldErrors, E> {
        Ok(FieldErrors::new())
    }
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FieldErrorsVisitor)
    }
}

// ============================================================================
// RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub zipcode: String,
    pub status: Status,
    #[serde(default)]
    pub errors: FieldErrors,
}

impl Record {
    /// Display value of a field
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Street => &self.street,
            Field::City => &self.city,
            Field::Zipcode => &self.zipcode,
            Field::Status => self.status.as_str(),
        }
    }

    pub fn error_for(&self, field: Field) -> Option<&ValidationError> {
        self.errors.get(field)
    }

    /// Severity shown for a field; no entry counts as valid
    pub fn severity_of(&self, field: Field) -> Severity {
        self.error_for(field)
            .map(|e| e.severity)
            .unwrap_or(Severity::Valid)
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        self.errors.iter().any(|(_, e)| e.severity == severity)
    }

    /// Critical and warning findings, in the order they were supplied
    pub fn issues(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.errors.iter().filter(|(_, e)| e.severity.is_issue())
    }

    pub fn has_issues(&self) -> bool {
        self.issues().next().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "id": "1",
        "name": "John Doe",
        "email": "john.doe@",
        "phone": "555-0100",
        "street": "123 Main St",
        "city": "Springfield",
        "zipcode": "12345",
        "status": "active",
        "errors": {
            "zipcode": { "message": "Zipcode has too few digits", "severity": "warning" },
            "email": { "message": "Invalid email format", "severity": "critical" }
        }
    }"#;

    #[test]
    fn test_deserialize_record() {
        let record: Record = serde_json::from_str(SAMPLE).unwrap();

        assert_eq!(record.id, "1");
        assert_eq!(record.status, Status::Active);
        assert_eq!(record.errors.len(), 2);
        assert_eq!(record.severity_of(Field::Email), Severity::Critical);
        assert_eq!(record.severity_of(Field::Name), Severity::Valid);
    }

    #[test]
    fn test_errors_keep_document_order() {
        let record: Record = serde_json::from_str(SAMPLE).unwrap();
        let fields: Vec<Field> = record.errors.iter().map(|(f, _)| f).collect();

        assert_eq!(fields, vec![Field::Zipcode, Field::Email]);
    }

    #[test]
    fn test_serialize_keeps_order() {
        let record: Record = serde_json::from_str(SAMPLE).unwrap();
        let json = serde_json::to_string(&record.errors).unwrap();

        let zip = json.find("zipcode").unwrap();
        let email = json.find("email").unwrap();
        assert!(zip < email);
    }

    #[test]
    fn test_missing_or_null_errors_is_empty() {
        let json = r#"{"id":"2","name":"A","email":"a@b.c","phone":"1","street":"s",
            "city":"c","zipcode":"z","status":"pending"}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.errors.is_empty());
        assert!(!record.has_issues());

        let json = r#"{"id":"3","name":"A","email":"a@b.c","phone":"1","street":"s",
            "city":"c","zipcode":"z","status":"pending","errors":null}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert!(record.errors.is_empty());
    }

    #[test]
    fn test_unknown_field_key_is_rejected() {
        let json = r#"{"id":"2","name":"A","email":"a@b.c","phone":"1","street":"s",
            "city":"c","zipcode":"z","status":"pending",
            "errors":{"fax":{"message":"?","severity":"warning"}}}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn test_repeated_key_replaces_in_place() {
        let errors: FieldErrors = serde_json::from_str(
            r#"{
                "name": {"message": "first", "severity": "warning"},
                "city": {"message": "city", "severity": "warning"},
                "name": {"message": "second", "severity": "critical"}
            }"#,
        )
        .unwrap();

        let entries: Vec<_> = errors.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, Field::Name);
        assert_eq!(entries[0].1.message, "second");
        assert_eq!(entries[1].0, Field::City);
    }

    #[test]
    fn test_issues_skip_valid_entries() {
        let mut record: Record = serde_json::from_str(SAMPLE).unwrap();
        record
            .errors
            .insert(Field::Phone, ValidationError::new("Looks fine", Severity::Valid));

        let issues: Vec<Field> = record.issues().map(|(f, _)| f).collect();
        assert_eq!(issues, vec![Field::Zipcode, Field::Email]);
        assert!(record.has_severity(Severity::Valid));
    }

    #[test]
    fn test_value_lookup() {
        let record: Record = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(record.value(Field::City), "Springfield");
        assert_eq!(record.value(Field::Status), "active");
        assert_eq!(Field::Zipcode.label(), "Zipcode");
    }
}
