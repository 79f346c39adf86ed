use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;

use payplan_core::projection::project_with_metadata;
use payplan_core::timeline::{contract_timeline, CalendarQuery};
use payplan_core::ContractTerms;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_terms(input_json: &str) -> NapiResult<ContractTerms> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Full projection envelope for the contract preview and creation screens.
#[napi]
pub fn project_contract(input_json: String) -> NapiResult<String> {
    let terms = parse_terms(&input_json)?;
    let output = project_with_metadata(&terms);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

#[napi(js_name = "contractTimeline")]
pub fn contract_timeline_at(input_json: String, as_of: String) -> NapiResult<String> {
    let terms = parse_terms(&input_json)?;
    let as_of = NaiveDate::parse_from_str(&as_of, "%Y-%m-%d").map_err(to_napi_error)?;
    let timeline = contract_timeline(&terms, as_of);
    serde_json::to_string(&timeline).map_err(to_napi_error)
}

/// Party-tagged installments of all three schedules, sorted by date, as the
/// contract workflow persists them. The payload is the contract terms plus
/// optional `from` / `to` dates.
#[napi(js_name = "calendarRecords")]
pub fn calendar_records_for(input_json: String) -> NapiResult<String> {
    let query: CalendarQuery = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let records = query.records().map_err(to_napi_error)?;
    serde_json::to_string(&records).map_err(to_napi_error)
}
