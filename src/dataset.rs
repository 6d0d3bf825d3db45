// Built-in review batch, used when no other data source is configured

use crate::error::LoadError;
use crate::loader::parse_payload;
use crate::store::RecordStore;

const MOCK_RECORDS: &str = include_str!("../data/mock_records.json");

pub fn builtin() -> Result<RecordStore, LoadError> {
    parse_payload(MOCK_RECORDS)
}
