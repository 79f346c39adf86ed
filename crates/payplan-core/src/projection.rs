//! Contract projection: the investor schedule plus the agent and leader
//! commission schedules, computed from one set of terms, with a summary of
//! the figures a preview screen or contract record needs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::commercial_full_period_amount;
use crate::schedule::commission::{build_commission, CommissionRole};
use crate::schedule::investor::investor_schedule;
use crate::schedule::{BuiltSchedule, ClosingBranch, Installment};
use crate::terms::ContractTerms;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Headline figures of a projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectionSummary {
    /// Dividend for one full commercial month
    pub full_month_dividend_amount: Money,
    /// Sum of all dividend installments (full and pro-rata)
    pub total_dividend_amount: Money,
    /// Total dividends as a percentage of principal
    pub total_yield_percent: Percent,
    /// Date of the opening installment
    pub first_payment_date: NaiveDate,
    /// Last opening or interior dividend; the extra full month paid in the
    /// closing does not count
    pub last_regular_payment_date: NaiveDate,
    /// Contract end date; principal is returned here
    pub maturity_date: NaiveDate,
    /// Sum of the agent commission schedule
    pub total_agent_commission: Money,
    /// Sum of the leader commission schedule
    pub total_leader_commission: Money,
    /// Closing path taken by the investor schedule
    pub closing_branch: ClosingBranch,
}

/// Complete projection of a contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub summary: ProjectionSummary,
    /// Dividends then the principal return
    pub investor_schedule: Vec<Installment>,
    /// Empty when the agent margin rate is zero
    pub agent_schedule: Vec<Installment>,
    /// Empty when the leader margin rate is zero
    pub leader_schedule: Vec<Installment>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project the full payment plan for `terms`.
///
/// Pure and deterministic: the same terms always give the same result, and
/// nothing but `terms` is consulted.
pub fn project(terms: &ContractTerms) -> ProjectionResult {
    let investor = investor_schedule(terms);
    let agent = build_commission(terms, CommissionRole::Agent);
    let leader = build_commission(terms, CommissionRole::Leader);
    assemble(terms, investor, agent, leader)
}

/// [`project`] wrapped in the standard computation envelope, with warnings
/// for the irregular paths the schedules took.
pub fn project_with_metadata(terms: &ContractTerms) -> ComputationOutput<ProjectionResult> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let investor = investor_schedule(terms);
    let agent = build_commission(terms, CommissionRole::Agent);
    let leader = build_commission(terms, CommissionRole::Leader);

    match investor.closing {
        ClosingBranch::ExtraFullMonth { residual_days } => warnings.push(format!(
            "Opening fragment left 30+ commercial days: extra full-month dividend on {}, \
             {} residual days at maturity",
            investor.last_cycle_date, residual_days
        )),
        ClosingBranch::Exhausted => warnings.push(
            "Opening fragment covers the whole term: no closing dividend; \
             total dividends exceed rate x term"
                .into(),
        ),
        ClosingBranch::SinglePeriod | ClosingBranch::Fragment { .. } => {}
    }
    if investor.cycle_capped {
        warnings.push(format!(
            "Payment day {} falls after maturity in the final month: dividend moved to {}",
            terms.payment_day(),
            investor.last_cycle_date
        ));
    }
    if agent.is_none() {
        warnings.push("Agent margin rate is zero: agent schedule omitted".into());
    }
    if leader.is_none() {
        warnings.push("Leader margin rate is zero: leader schedule omitted".into());
    }

    let result = assemble(terms, investor, agent, leader);
    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Fixed-term dividend projection: 30-day commercial months, actual-day edge fragments; \
         commissions one cycle behind on the 1st of the month",
        terms,
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn assemble(
    terms: &ContractTerms,
    investor: BuiltSchedule,
    agent: Option<BuiltSchedule>,
    leader: Option<BuiltSchedule>,
) -> ProjectionResult {
    let principal = terms.principal();
    let total_dividend_amount: Money = investor
        .installments
        .iter()
        .filter(|i| i.is_dividend())
        .map(|i| i.amount)
        .sum();
    let total_yield_percent = total_dividend_amount / principal * dec!(100);

    let first_payment_date = investor
        .installments
        .first()
        .map(|i| i.date)
        .unwrap_or(investor.last_cycle_date);
    let maturity_date = investor
        .installments
        .last()
        .map(|i| i.date)
        .unwrap_or(investor.last_cycle_date);

    let agent_schedule = agent.map(|b| b.installments).unwrap_or_default();
    let leader_schedule = leader.map(|b| b.installments).unwrap_or_default();

    let summary = ProjectionSummary {
        full_month_dividend_amount: commercial_full_period_amount(
            principal,
            terms.monthly_rate_percent(),
        ),
        total_dividend_amount,
        total_yield_percent,
        first_payment_date,
        last_regular_payment_date: investor.last_regular_date,
        maturity_date,
        total_agent_commission: sum_amounts(&agent_schedule),
        total_leader_commission: sum_amounts(&leader_schedule),
        closing_branch: investor.closing,
    };

    ProjectionResult {
        summary,
        investor_schedule: investor.installments,
        agent_schedule,
        leader_schedule,
    }
}

fn sum_amounts(installments: &[Installment]) -> Money {
    installments
        .iter()
        .map(|i| i.amount)
        .fold(Decimal::ZERO, |acc, a| acc + a)
}
