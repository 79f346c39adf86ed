//! Agent and leader commission schedules.
//!
//! Commissions follow the same opening / full-month / closing layout as the
//! investor schedule shifted one cycle later: accrual starts one month after
//! the contract start, payments land on the 1st of the month after each
//! investor cycle, and amounts are priced at the party's margin rate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{build_schedule, BuiltSchedule, Installment, Party, PaymentCalendar};
use crate::calendar::{add_months, first_of_month};
use crate::terms::ContractTerms;
use crate::types::Percent;

/// The two parties that earn a margin on a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommissionRole {
    Agent,
    Leader,
}

impl CommissionRole {
    pub fn margin_rate_percent(self, terms: &ContractTerms) -> Percent {
        match self {
            CommissionRole::Agent => terms.agent_margin_rate_percent(),
            CommissionRole::Leader => terms.leader_margin_rate_percent(),
        }
    }
}

impl From<CommissionRole> for Party {
    fn from(role: CommissionRole) -> Self {
        match role {
            CommissionRole::Agent => Party::Agent,
            CommissionRole::Leader => Party::Leader,
        }
    }
}

/// The investor calendar shifted one month: accrual starts a month after the
/// contract start, cycle k lands on the 1st of the month after investor
/// cycle k, and the term closes on the last cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionCalendar {
    accrual_start: NaiveDate,
    term_months: u32,
}

impl CommissionCalendar {
    pub fn new(terms: &ContractTerms) -> Self {
        CommissionCalendar {
            accrual_start: add_months(terms.start_date(), 1),
            term_months: terms.term_months(),
        }
    }
}

impl PaymentCalendar for CommissionCalendar {
    fn start_date(&self) -> NaiveDate {
        self.accrual_start
    }

    fn term_months(&self) -> u32 {
        self.term_months
    }

    fn cycle_date(&self, cycle: u32) -> NaiveDate {
        add_months(first_of_month(self.accrual_start), cycle as i32)
    }

    fn closing_date(&self) -> NaiveDate {
        self.cycle_date(self.term_months)
    }
}

/// Full build for one role, or `None` when its margin rate is zero.
pub fn build_commission(terms: &ContractTerms, role: CommissionRole) -> Option<BuiltSchedule> {
    let rate = role.margin_rate_percent(terms);
    if rate <= Decimal::ZERO {
        log::debug!("{:?} margin rate is zero; commission schedule omitted", role);
        return None;
    }
    Some(build_schedule(
        &CommissionCalendar::new(terms),
        terms.principal(),
        rate,
        role.into(),
    ))
}

/// Commission installments for one role; empty when its margin rate is zero.
pub fn commission_schedule(terms: &ContractTerms, role: CommissionRole) -> Vec<Installment> {
    build_commission(terms, role)
        .map(|built| built.installments)
        .unwrap_or_default()
}
