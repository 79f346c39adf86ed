//! Contract terms accepted by the projection engine.
//!
//! `ContractTerms` can only be obtained through validation (the builder,
//! `TryFrom<ContractTermsInput>`, or deserialization), so the engine never
//! has to defend against non-positive amounts or out-of-range terms.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PayplanError;
use crate::types::{Money, Percent};
use crate::PayplanResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Day of month investor payments land on when none is given.
pub const DEFAULT_PAYMENT_DAY: u32 = 10;

/// Longest term accepted, in months.
pub const MAX_TERM_MONTHS: u32 = 600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Unvalidated contract terms as submitted by a caller.
///
/// camelCase aliases are accepted so payloads from the web front end
/// deserialize without remapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractTermsInput {
    /// Invested principal
    pub principal: Money,
    /// Monthly dividend rate in percent (1.85 = 1.85%/month)
    #[serde(alias = "monthlyRatePercent")]
    pub monthly_rate_percent: Percent,
    /// Contract start date
    #[serde(alias = "startDate")]
    pub start_date: NaiveDate,
    /// Term in calendar months
    #[serde(alias = "termMonths")]
    pub term_months: u32,
    /// Day of month investor payments land on (1-31)
    #[serde(default = "default_payment_day", alias = "paymentDay")]
    pub payment_day: u32,
    /// Selling-agent commission rate in percent per month
    #[serde(default, alias = "agentMarginRatePercent")]
    pub agent_margin_rate_percent: Percent,
    /// Referring-leader commission rate in percent per month
    #[serde(default, alias = "leaderMarginRatePercent")]
    pub leader_margin_rate_percent: Percent,
}

fn default_payment_day() -> u32 {
    DEFAULT_PAYMENT_DAY
}

/// Validated, immutable contract terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ContractTermsInput")]
pub struct ContractTerms {
    principal: Money,
    monthly_rate_percent: Percent,
    start_date: NaiveDate,
    term_months: u32,
    payment_day: u32,
    agent_margin_rate_percent: Percent,
    leader_margin_rate_percent: Percent,
}

impl ContractTerms {
    /// Start building terms from the four required fields. Payment day
    /// defaults to the 10th and both margin rates to zero.
    pub fn builder(
        principal: Money,
        monthly_rate_percent: Percent,
        start_date: NaiveDate,
        term_months: u32,
    ) -> ContractTermsBuilder {
        ContractTermsBuilder {
            input: ContractTermsInput {
                principal,
                monthly_rate_percent,
                start_date,
                term_months,
                payment_day: DEFAULT_PAYMENT_DAY,
                agent_margin_rate_percent: Decimal::ZERO,
                leader_margin_rate_percent: Decimal::ZERO,
            },
        }
    }

    pub fn principal(&self) -> Money {
        self.principal
    }

    pub fn monthly_rate_percent(&self) -> Percent {
        self.monthly_rate_percent
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }

    pub fn payment_day(&self) -> u32 {
        self.payment_day
    }

    pub fn agent_margin_rate_percent(&self) -> Percent {
        self.agent_margin_rate_percent
    }

    pub fn leader_margin_rate_percent(&self) -> Percent {
        self.leader_margin_rate_percent
    }
}

/// Builder for [`ContractTerms`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ContractTermsBuilder {
    input: ContractTermsInput,
}

impl ContractTermsBuilder {
    pub fn payment_day(mut self, day: u32) -> Self {
        self.input.payment_day = day;
        self
    }

    pub fn agent_margin_rate_percent(mut self, rate: Percent) -> Self {
        self.input.agent_margin_rate_percent = rate;
        self
    }

    pub fn leader_margin_rate_percent(mut self, rate: Percent) -> Self {
        self.input.leader_margin_rate_percent = rate;
        self
    }

    pub fn build(self) -> PayplanResult<ContractTerms> {
        ContractTerms::try_from(self.input)
    }
}

impl TryFrom<ContractTermsInput> for ContractTerms {
    type Error = PayplanError;

    fn try_from(input: ContractTermsInput) -> PayplanResult<Self> {
        validate_input(&input)?;
        Ok(ContractTerms {
            principal: input.principal,
            monthly_rate_percent: input.monthly_rate_percent,
            start_date: input.start_date,
            term_months: input.term_months,
            payment_day: input.payment_day,
            agent_margin_rate_percent: input.agent_margin_rate_percent,
            leader_margin_rate_percent: input.leader_margin_rate_percent,
        })
    }
}

impl From<&ContractTerms> for ContractTermsInput {
    fn from(terms: &ContractTerms) -> Self {
        ContractTermsInput {
            principal: terms.principal,
            monthly_rate_percent: terms.monthly_rate_percent,
            start_date: terms.start_date,
            term_months: terms.term_months,
            payment_day: terms.payment_day,
            agent_margin_rate_percent: terms.agent_margin_rate_percent,
            leader_margin_rate_percent: terms.leader_margin_rate_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &ContractTermsInput) -> PayplanResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(PayplanError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if input.monthly_rate_percent <= Decimal::ZERO {
        return Err(PayplanError::invalid(
            "monthly_rate_percent",
            "Monthly rate must be positive",
        ));
    }
    if input.agent_margin_rate_percent < Decimal::ZERO {
        return Err(PayplanError::invalid(
            "agent_margin_rate_percent",
            "Margin rate cannot be negative",
        ));
    }
    if input.leader_margin_rate_percent < Decimal::ZERO {
        return Err(PayplanError::invalid(
            "leader_margin_rate_percent",
            "Margin rate cannot be negative",
        ));
    }
    if input.term_months == 0 || input.term_months > MAX_TERM_MONTHS {
        return Err(PayplanError::invalid(
            "term_months",
            format!("Term must be between 1 and {MAX_TERM_MONTHS} months"),
        ));
    }
    if !(1..=31).contains(&input.payment_day) {
        return Err(PayplanError::invalid(
            "payment_day",
            "Payment day must be between 1 and 31",
        ));
    }
    // Commission calendars run one month past maturity.
    if input
        .start_date
        .checked_add_months(Months::new(input.term_months + 1))
        .is_none()
    {
        return Err(PayplanError::DateError(format!(
            "Start date {} cannot carry a {}-month term",
            input.start_date, input.term_months
        )));
    }
    Ok(())
}
