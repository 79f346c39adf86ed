#![cfg(feature = "timeline")]

use chrono::NaiveDate;
use payplan_core::timeline::{
    calendar_records, contract_timeline, records_between, timeline_from_projection, ContractPhase,
};
use payplan_core::{project, ContractTerms, InstallmentKind, Party};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn twelve_month_terms() -> ContractTerms {
    ContractTerms::builder(dec!(100000), dec!(1.5), date(2026, 2, 1), 12)
        .payment_day(10)
        .agent_margin_rate_percent(dec!(0.2))
        .build()
        .unwrap()
}

#[test]
fn test_timeline_matches_projection_maturity() {
    let terms = twelve_month_terms();
    let projection = project(&terms);
    let timeline = timeline_from_projection(&terms, &projection, date(2026, 8, 1));
    assert_eq!(timeline.maturity_date, projection.summary.maturity_date);
    assert_eq!(timeline.phase, ContractPhase::Running);
    assert_eq!(timeline, contract_timeline(&terms, date(2026, 8, 1)));
}

#[test]
fn test_paid_to_date_counts_dividends_on_as_of() {
    // Mar 10 opening (1,850) and Apr 10 full month (1,500) are both paid on Apr 10
    let timeline = contract_timeline(&twelve_month_terms(), date(2026, 4, 10));
    assert_eq!(timeline.dividends_paid_to_date, dec!(3350));
    assert_eq!(timeline.dividends_outstanding, dec!(18000) - dec!(3350));
    let next = timeline.next_investor_installment.unwrap();
    assert_eq!(next.date, date(2026, 5, 10));
    assert_eq!(next.kind, InstallmentKind::Dividend);
}

#[test]
fn test_progress_is_monotonic_over_term() {
    let terms = twelve_month_terms();
    let mut previous = Decimal::ZERO;
    let mut day = date(2026, 1, 1);
    while day <= date(2027, 3, 1) {
        let t = contract_timeline(&terms, day);
        assert!(t.progress_percent >= previous);
        assert!(t.progress_percent <= dec!(100));
        previous = t.progress_percent;
        day = day + chrono::Duration::days(7);
    }
    assert_eq!(previous, dec!(100));
}

#[test]
fn test_calendar_window_for_one_month() {
    let projection = project(&twelve_month_terms());
    let records = calendar_records(&projection);
    let may = records_between(&records, Some(date(2026, 5, 1)), Some(date(2026, 5, 31)));

    let tagged: Vec<(Party, NaiveDate)> = may
        .iter()
        .map(|r| (r.party, r.installment.date))
        .collect();
    assert_eq!(
        tagged,
        vec![
            (Party::Agent, date(2026, 5, 1)),
            (Party::Investor, date(2026, 5, 10)),
        ]
    );
}
