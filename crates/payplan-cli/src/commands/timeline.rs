use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use payplan_core::project;
use payplan_core::timeline::{calendar_records, contract_timeline, records_between};

use super::projection::TermsArgs;

/// Arguments for the party-tagged payment calendar
#[derive(Args)]
pub struct CalendarArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

pub fn run_calendar(args: CalendarArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            return Err(format!("--from {from} is after --to {to}").into());
        }
    }
    let terms = args.terms.resolve()?;
    let records = calendar_records(&project(&terms));
    let window = records_between(&records, args.from, args.to);
    log::debug!("{} of {} calendar records in window", window.len(), records.len());
    Ok(serde_json::to_value(window)?)
}

/// Arguments for the contract progress view
#[derive(Args)]
pub struct TimelineArgs {
    #[command(flatten)]
    pub terms: TermsArgs,

    /// Date to evaluate the contract at (YYYY-MM-DD)
    #[arg(long)]
    pub as_of: NaiveDate,
}

pub fn run_timeline(args: TimelineArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms = args.terms.resolve()?;
    let timeline = contract_timeline(&terms, args.as_of);
    Ok(serde_json::to_value(timeline)?)
}
