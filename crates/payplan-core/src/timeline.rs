//! Views derived from a projection at a caller-supplied date: contract
//! progress, the renewal window, and party-tagged calendar records for
//! persistence and calendar screens.
//!
//! Nothing here reads the system clock; `as_of` is always an argument.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::days_between;
use crate::projection::{project, ProjectionResult};
use crate::schedule::investor::maturity_date;
use crate::schedule::{Installment, Party};
use crate::terms::{ContractTerms, ContractTermsInput};
use crate::types::{Money, Percent};
use crate::PayplanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Days before maturity from which a renewal may be requested.
pub const RENEWAL_WINDOW_DAYS: u32 = 65;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Where a contract stands relative to its term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractPhase {
    NotStarted,
    Running,
    Matured,
}

/// Progress of a contract at a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTimeline {
    pub as_of: NaiveDate,
    pub start_date: NaiveDate,
    pub maturity_date: NaiveDate,
    /// Calendar days from start to maturity
    pub total_days: u32,
    /// Calendar days elapsed, capped at `total_days`
    pub elapsed_days: u32,
    /// Calendar days until maturity, 0 once matured
    pub remaining_days: u32,
    /// Elapsed share of the term, 0-100
    pub progress_percent: Percent,
    pub phase: ContractPhase,
    /// Maturity is at most [`RENEWAL_WINDOW_DAYS`] away or has already
    /// passed
    pub renewal_window_open: bool,
    /// Investor dividends dated on or before `as_of`
    pub dividends_paid_to_date: Money,
    /// Investor dividends dated after `as_of`
    pub dividends_outstanding: Money,
    /// First investor installment dated after `as_of`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_investor_installment: Option<Installment>,
}

/// One installment tagged with the party it is owed to, as persisted by the
/// contract workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarRecord {
    pub party: Party,
    /// 1-based position within the party's schedule
    pub sequence: u32,
    #[serde(flatten)]
    pub installment: Installment,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Progress of the contract described by `terms` as of `as_of`.
pub fn contract_timeline(terms: &ContractTerms, as_of: NaiveDate) -> ContractTimeline {
    let projection = project(terms);
    timeline_from_projection(terms, &projection, as_of)
}

/// Same as [`contract_timeline`] for a projection the caller already holds.
pub fn timeline_from_projection(
    terms: &ContractTerms,
    projection: &ProjectionResult,
    as_of: NaiveDate,
) -> ContractTimeline {
    let start_date = terms.start_date();
    let maturity = maturity_date(start_date, terms.term_months());

    let total_days = days_between(start_date, maturity);
    let elapsed_days = days_between(start_date, as_of).min(total_days);
    let remaining_days = days_between(as_of, maturity);

    let progress_percent = if total_days == 0 {
        dec!(100)
    } else {
        Decimal::from(elapsed_days) / Decimal::from(total_days) * dec!(100)
    };

    let phase = if as_of < start_date {
        ContractPhase::NotStarted
    } else if as_of >= maturity {
        ContractPhase::Matured
    } else {
        ContractPhase::Running
    };

    let renewal_window_open = remaining_days <= RENEWAL_WINDOW_DAYS;

    let (paid, outstanding): (Vec<&Installment>, Vec<&Installment>) = projection
        .investor_schedule
        .iter()
        .filter(|i| i.is_dividend())
        .partition(|i| i.date <= as_of);

    let next_investor_installment = projection
        .investor_schedule
        .iter()
        .find(|i| i.date > as_of)
        .cloned();

    ContractTimeline {
        as_of,
        start_date,
        maturity_date: maturity,
        total_days,
        elapsed_days,
        remaining_days,
        progress_percent,
        phase,
        renewal_window_open,
        dividends_paid_to_date: paid.iter().map(|i| i.amount).sum(),
        dividends_outstanding: outstanding.iter().map(|i| i.amount).sum(),
        next_investor_installment,
    }
}

/// Flatten the three schedules into party-tagged records ordered by date.
/// Records on the same date keep investor, agent, leader order.
pub fn calendar_records(projection: &ProjectionResult) -> Vec<CalendarRecord> {
    let mut records: Vec<CalendarRecord> = [
        (Party::Investor, &projection.investor_schedule),
        (Party::Agent, &projection.agent_schedule),
        (Party::Leader, &projection.leader_schedule),
    ]
    .into_iter()
    .flat_map(|(party, schedule)| {
        schedule
            .iter()
            .enumerate()
            .map(move |(idx, installment)| CalendarRecord {
                party,
                sequence: idx as u32 + 1,
                installment: installment.clone(),
            })
    })
    .collect();

    records.sort_by_key(|r| r.installment.date);
    records
}

/// Records dated within `from..=to`. Either bound may be open.
pub fn records_between(
    records: &[CalendarRecord],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<CalendarRecord> {
    records
        .iter()
        .filter(|r| from.map_or(true, |f| r.installment.date >= f))
        .filter(|r| to.map_or(true, |t| r.installment.date <= t))
        .cloned()
        .collect()
}

/// Contract terms plus an optional date window, as sent by calendar screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarQuery {
    #[serde(flatten)]
    pub terms: ContractTermsInput,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl CalendarQuery {
    /// Validate the terms, project them, and keep the records in the window.
    pub fn records(&self) -> PayplanResult<Vec<CalendarRecord>> {
        let terms = ContractTerms::try_from(self.terms.clone())?;
        let records = calendar_records(&project(&terms));
        Ok(records_between(&records, self.from, self.to))
    }
}
