//! Installment types and the schedule builder shared by the investor and
//! commission schedules.
//!
//! A schedule walks forward over `term_months` payment cycles:
//!
//! 1. an opening fragment from the contract start to the first cycle date,
//!    priced in actual days (or as a full month when it is exactly 30 days);
//! 2. full commercial months for cycles `2..term_months`;
//! 3. a closing fragment covering whatever remains of `term_months * 30`
//!    commercial days, preceded by one extra full month when the remainder
//!    is 30 days or more.
//!
//! Where each cycle lands is supplied by a [`PaymentCalendar`], so the three
//! schedules of a contract cannot drift out of structural sync.

pub mod commission;
pub mod investor;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{
    actual_day_fragment_amount, commercial_full_period_amount, days_between,
    COMMERCIAL_MONTH_DAYS,
};
use crate::types::{Money, Percent};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Classification of a scheduled installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentKind {
    /// Full commercial month of dividends
    Dividend,
    /// Dividend for a fragment priced in actual days
    ProRataDividend,
    /// Return of the invested principal at maturity
    PrincipalReturn,
    /// Agent or leader commission
    Commission,
}

/// A single scheduled payment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Installment {
    pub date: NaiveDate,
    pub amount: Money,
    pub kind: InstallmentKind,
    /// Human-readable label
    pub description: String,
    /// Days priced for a fragment; 0 for full-period entries
    pub pro_rata_days: u32,
}

impl Installment {
    pub fn is_dividend(&self) -> bool {
        matches!(
            self.kind,
            InstallmentKind::Dividend | InstallmentKind::ProRataDividend
        )
    }
}

/// Who receives a schedule's payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Party {
    Investor,
    Agent,
    Leader,
}

impl Party {
    fn full_period_label(self) -> &'static str {
        match self {
            Party::Investor => "Monthly dividend",
            Party::Agent => "Agent commission",
            Party::Leader => "Leader commission",
        }
    }

    fn fragment_label(self) -> &'static str {
        match self {
            Party::Investor => "Pro-rata dividend",
            Party::Agent => "Agent commission pro-rata",
            Party::Leader => "Leader commission pro-rata",
        }
    }

    fn full_period_kind(self) -> InstallmentKind {
        match self {
            Party::Investor => InstallmentKind::Dividend,
            Party::Agent | Party::Leader => InstallmentKind::Commission,
        }
    }

    fn fragment_kind(self) -> InstallmentKind {
        match self {
            Party::Investor => InstallmentKind::ProRataDividend,
            Party::Agent | Party::Leader => InstallmentKind::Commission,
        }
    }
}

/// Which closing path a schedule took once the interior months were laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "branch", rename_all = "snake_case")]
pub enum ClosingBranch {
    /// One-month term: the opening fragment is the whole schedule
    SinglePeriod,
    /// Remaining days below a month, paid as one fragment on the closing date
    Fragment { days: u32 },
    /// Remaining days of a month or more: one extra full month, then the
    /// residual (if any) on the closing date
    ExtraFullMonth { residual_days: u32 },
    /// The opening fragment already covered the whole term
    Exhausted,
}

/// Anchor-date rule for a schedule.
pub trait PaymentCalendar {
    /// Date accrual starts from.
    fn start_date(&self) -> NaiveDate;

    /// Number of payment cycles in the term.
    fn term_months(&self) -> u32;

    /// Date of the 1-based `cycle`.
    fn cycle_date(&self, cycle: u32) -> NaiveDate;

    /// Date the closing fragment settles on. No cycle is paid after it.
    fn closing_date(&self) -> NaiveDate;
}

/// Output of [`build_schedule`].
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltSchedule {
    pub installments: Vec<Installment>,
    pub closing: ClosingBranch,
    /// Date of the last opening or interior entry; the extra full month of
    /// the closing does not move it
    pub last_regular_date: NaiveDate,
    /// Date of the last entry paid on a cycle date, extra full month included
    pub last_cycle_date: NaiveDate,
    /// Whether a cycle date fell after the closing date and was pulled back
    pub cycle_capped: bool,
}

impl BuiltSchedule {
    pub fn total(&self) -> Money {
        self.installments.iter().map(|i| i.amount).sum()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Lay out the periodic payments of one party against `calendar`, priced at
/// `monthly_rate_percent` of `principal` per commercial month.
pub fn build_schedule<C: PaymentCalendar>(
    calendar: &C,
    principal: Money,
    monthly_rate_percent: Percent,
    party: Party,
) -> BuiltSchedule {
    let term = calendar.term_months();
    let closing_date = calendar.closing_date();
    let pricer = Pricer {
        principal,
        monthly_rate_percent,
        party,
    };
    let mut installments = Vec::with_capacity(term as usize + 2);
    let mut cycle_capped = false;

    // --- Opening fragment ---
    let scheduled_first = calendar.cycle_date(1);
    if scheduled_first > closing_date {
        cycle_capped = true;
    }
    let first_date = scheduled_first.min(closing_date);
    let opening_days = days_between(calendar.start_date(), first_date);
    installments.push(pricer.period(first_date, opening_days));

    let mut accrued_days = opening_days;
    let mut last_regular_date = first_date;

    // --- Interior full months ---
    for cycle in 2..term {
        let date = calendar.cycle_date(cycle);
        installments.push(pricer.full(date));
        accrued_days += COMMERCIAL_MONTH_DAYS;
        last_regular_date = date;
    }

    // --- Closing ---
    let mut last_cycle_date = last_regular_date;
    let closing = if term <= 1 {
        ClosingBranch::SinglePeriod
    } else {
        let remaining =
            i64::from(term) * i64::from(COMMERCIAL_MONTH_DAYS) - i64::from(accrued_days);
        if remaining >= i64::from(COMMERCIAL_MONTH_DAYS) {
            let scheduled = calendar.cycle_date(term);
            if scheduled > closing_date {
                cycle_capped = true;
            }
            let date = scheduled.min(closing_date);
            installments.push(pricer.full(date));
            last_cycle_date = date;

            let residual_days = clamp_days(remaining - i64::from(COMMERCIAL_MONTH_DAYS));
            if residual_days > 0 {
                installments.push(pricer.period(closing_date, residual_days));
            }
            ClosingBranch::ExtraFullMonth { residual_days }
        } else if remaining > 0 {
            let days = clamp_days(remaining);
            installments.push(pricer.period(closing_date, days));
            ClosingBranch::Fragment { days }
        } else {
            ClosingBranch::Exhausted
        }
    };

    log::debug!(
        "{:?} schedule: {} installments, opening {} days, closing {:?}",
        party,
        installments.len(),
        opening_days,
        closing
    );

    BuiltSchedule {
        installments,
        closing,
        last_regular_date,
        last_cycle_date,
        cycle_capped,
    }
}

fn clamp_days(days: i64) -> u32 {
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Prices and labels entries for one party.
struct Pricer {
    principal: Money,
    monthly_rate_percent: Percent,
    party: Party,
}

impl Pricer {
    fn full(&self, date: NaiveDate) -> Installment {
        let installment = Installment {
            date,
            amount: commercial_full_period_amount(self.principal, self.monthly_rate_percent),
            kind: self.party.full_period_kind(),
            description: self.party.full_period_label().to_string(),
            pro_rata_days: 0,
        };
        log::trace!("{} on {}: {}", installment.description, date, installment.amount);
        installment
    }

    /// A period measured in actual days; exactly 30 days is a full month.
    fn period(&self, date: NaiveDate, days: u32) -> Installment {
        if days == COMMERCIAL_MONTH_DAYS {
            return self.full(date);
        }
        let installment = Installment {
            date,
            amount: actual_day_fragment_amount(self.principal, self.monthly_rate_percent, days),
            kind: self.party.fragment_kind(),
            description: format!("{} ({} days)", self.party.fragment_label(), days),
            pro_rata_days: days,
        };
        log::trace!("{} on {}: {}", installment.description, date, installment.amount);
        installment
    }
}
