//! Investor dividend schedule: payments on the contract's payment day, the
//! closing fragment on the maturity date, and the return of principal.

use chrono::NaiveDate;

use super::{build_schedule, BuiltSchedule, Installment, InstallmentKind, Party, PaymentCalendar};
use crate::calendar::{add_months, first_of_month, on_day};
use crate::terms::ContractTerms;

/// Investor cycles land on `payment_day` of each month after the start; the
/// term closes on the maturity date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvestorCalendar {
    start_date: NaiveDate,
    term_months: u32,
    payment_day: u32,
}

impl InvestorCalendar {
    pub fn new(terms: &ContractTerms) -> Self {
        InvestorCalendar {
            start_date: terms.start_date(),
            term_months: terms.term_months(),
            payment_day: terms.payment_day(),
        }
    }
}

impl PaymentCalendar for InvestorCalendar {
    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn term_months(&self) -> u32 {
        self.term_months
    }

    fn cycle_date(&self, cycle: u32) -> NaiveDate {
        let month = add_months(first_of_month(self.start_date), cycle as i32);
        on_day(month, self.payment_day)
    }

    fn closing_date(&self) -> NaiveDate {
        maturity_date(self.start_date, self.term_months)
    }
}

/// `term_months` calendar months after `start_date`, on the start's
/// day-of-month (clamped to shorter months).
pub fn maturity_date(start_date: NaiveDate, term_months: u32) -> NaiveDate {
    add_months(start_date, term_months as i32)
}

/// Dividend schedule followed by the return of principal at maturity.
pub fn investor_schedule(terms: &ContractTerms) -> BuiltSchedule {
    let calendar = InvestorCalendar::new(terms);
    let mut built = build_schedule(
        &calendar,
        terms.principal(),
        terms.monthly_rate_percent(),
        Party::Investor,
    );

    built.installments.push(Installment {
        date: calendar.closing_date(),
        amount: terms.principal(),
        kind: InstallmentKind::PrincipalReturn,
        description: "Return of principal".to_string(),
        pro_rata_days: 0,
    });

    built
}
