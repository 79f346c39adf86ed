use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use payplan_core::projection::project_with_metadata;
use payplan_core::schedule::commission::{commission_schedule, CommissionRole};
use payplan_core::schedule::investor::investor_schedule;
use payplan_core::terms::DEFAULT_PAYMENT_DAY;
use payplan_core::{ContractTerms, ContractTermsInput};

use crate::input;

/// Contract terms shared by every command
#[derive(Args)]
pub struct TermsArgs {
    /// Path to JSON or YAML terms file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Invested principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Monthly dividend rate in percent (e.g. 1.85)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Contract start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// Day of month investor payments land on
    #[arg(long, default_value_t = DEFAULT_PAYMENT_DAY)]
    pub payment_day: u32,

    /// Agent commission rate in percent per month
    #[arg(long, default_value = "0")]
    pub agent_margin: Decimal,

    /// Leader commission rate in percent per month
    #[arg(long, default_value = "0")]
    pub leader_margin: Decimal,
}

impl TermsArgs {
    /// Terms from `--input`, then individual flags, then piped stdin.
    pub fn resolve(&self) -> Result<ContractTerms, Box<dyn std::error::Error>> {
        let terms_input: ContractTermsInput = if let Some(ref path) = self.input {
            input::file::read_input(path)?
        } else if self.principal.is_some() {
            self.from_flags()?
        } else if let Some(data) = input::stdin::read_stdin()? {
            serde_json::from_value(data)?
        } else {
            return Err("--principal is required (or provide --input or stdin)".into());
        };
        Ok(ContractTerms::try_from(terms_input)?)
    }

    fn from_flags(&self) -> Result<ContractTermsInput, Box<dyn std::error::Error>> {
        let principal = self
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let rate = self.rate.ok_or("--rate is required (or provide --input)")?;
        let start = self.start.ok_or("--start is required (or provide --input)")?;
        let term = self.term.ok_or("--term is required (or provide --input)")?;

        Ok(ContractTermsInput {
            principal,
            monthly_rate_percent: rate,
            start_date: start,
            term_months: term,
            payment_day: self.payment_day,
            agent_margin_rate_percent: self.agent_margin,
            leader_margin_rate_percent: self.leader_margin,
        })
    }
}

/// Arguments for a full projection
#[derive(Args)]
pub struct ProjectArgs {
    #[command(flatten)]
    pub terms: TermsArgs,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.terms.resolve()?;
    let result = project_with_metadata(&terms);
    Ok(serde_json::to_value(result)?)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PartyArg {
    Investor,
    Agent,
    Leader,
}

/// Arguments for a single schedule
#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Whose schedule to print
    #[arg(long, value_enum, default_value = "investor")]
    pub party: PartyArg,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.terms.resolve()?;
    let schedule = match args.party {
        PartyArg::Investor => investor_schedule(&terms).installments,
        PartyArg::Agent => commission_schedule(&terms, CommissionRole::Agent),
        PartyArg::Leader => commission_schedule(&terms, CommissionRole::Leader),
    };
    Ok(serde_json::to_value(schedule)?)
}
