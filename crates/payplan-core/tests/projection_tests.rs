use chrono::NaiveDate;
use payplan_core::projection::project_with_metadata;
use payplan_core::schedule::ClosingBranch;
use payplan_core::{project, ContractTerms, InstallmentKind};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn reference_terms(agent: Decimal, leader: Decimal) -> ContractTerms {
    ContractTerms::builder(dec!(50000.00), dec!(1.85), date(2024, 1, 15), 6)
        .payment_day(10)
        .agent_margin_rate_percent(agent)
        .leader_margin_rate_percent(leader)
        .build()
        .unwrap()
}

fn assert_close(actual: Decimal, expected: Decimal) {
    assert!(
        (actual - expected).abs() < dec!(0.005),
        "Expected ~{}, got {}",
        expected,
        actual
    );
}

// ===========================================================================
// Investor schedule: 50,000 at 1.85% from 2024-01-15, 6 months, day 10
// ===========================================================================

#[test]
fn test_reference_investor_schedule() {
    let result = project(&reference_terms(Decimal::ZERO, Decimal::ZERO));
    let s = &result.investor_schedule;

    assert_eq!(s.len(), 8);

    // Opening fragment: 26 actual days
    assert_eq!(s[0].date, date(2024, 2, 10));
    assert_eq!(s[0].kind, InstallmentKind::ProRataDividend);
    assert_eq!(s[0].pro_rata_days, 26);
    assert_close(s[0].amount, dec!(801.67));

    // Four full months of exactly 925.00
    for (entry, month) in s[1..5].iter().zip(3..=6) {
        assert_eq!(entry.date, date(2024, month, 10));
        assert_eq!(entry.kind, InstallmentKind::Dividend);
        assert_eq!(entry.amount, dec!(925.00));
        assert_eq!(entry.pro_rata_days, 0);
    }

    // Residual-drift extra month
    assert_eq!(s[5].date, date(2024, 7, 10));
    assert_eq!(s[5].kind, InstallmentKind::Dividend);
    assert_eq!(s[5].amount, dec!(925.00));

    // Closing fragment: 4 days
    assert_eq!(s[6].date, date(2024, 7, 15));
    assert_eq!(s[6].kind, InstallmentKind::ProRataDividend);
    assert_eq!(s[6].pro_rata_days, 4);
    assert_close(s[6].amount, dec!(123.33));

    // Principal
    assert_eq!(s[7].date, date(2024, 7, 15));
    assert_eq!(s[7].kind, InstallmentKind::PrincipalReturn);
    assert_eq!(s[7].amount, dec!(50000.00));
}

#[test]
fn test_reference_total_dividend_is_exact() {
    let result = project(&reference_terms(Decimal::ZERO, Decimal::ZERO));
    let expected = dec!(50000) * dec!(0.0185) * dec!(6);
    assert_eq!(expected, dec!(5550.00));
    assert_eq!(result.summary.total_dividend_amount, expected);
    assert_eq!(result.summary.full_month_dividend_amount, dec!(925));
    assert_eq!(result.summary.maturity_date, date(2024, 7, 15));
    assert_eq!(result.summary.first_payment_date, date(2024, 2, 10));
    // The extra month on Jul 10 is not a regular cycle
    assert_eq!(result.summary.last_regular_payment_date, date(2024, 6, 10));
}

#[test]
fn test_conservation_of_dividends() {
    let result = project(&reference_terms(Decimal::ZERO, Decimal::ZERO));
    let sum: Decimal = result
        .investor_schedule
        .iter()
        .filter(|i| matches!(i.kind, InstallmentKind::Dividend | InstallmentKind::ProRataDividend))
        .map(|i| i.amount)
        .sum();
    assert_eq!(sum, result.summary.total_dividend_amount);
}

// ===========================================================================
// Commission schedules
// ===========================================================================

#[test]
fn test_agent_commission_reference() {
    let result = project(&reference_terms(dec!(0.15), Decimal::ZERO));
    let agent = &result.agent_schedule;

    assert!(!agent.is_empty());
    // One cycle behind: 1st of the month after the investor's Feb payment
    assert_eq!(agent[0].date, date(2024, 3, 1));
    assert!(agent.iter().all(|i| i.date.format("%d").to_string() == "01"));
    assert!(agent.iter().all(|i| i.kind == InstallmentKind::Commission));

    // Accrual from Feb 15: 15 days to Mar 1, five full months, 15 days
    assert_eq!(agent.len(), 7);
    assert_eq!(agent[0].pro_rata_days, 15);
    assert_eq!(agent[5].date, date(2024, 8, 1));
    assert_eq!(agent[6].date, date(2024, 8, 1));
    assert_eq!(agent[6].pro_rata_days, 15);

    let total: Decimal = agent.iter().map(|i| i.amount).sum();
    assert_eq!(total, dec!(50000) * dec!(0.0015) * dec!(6));
    assert_eq!(result.summary.total_agent_commission, total);
}

#[test]
fn test_first_of_month_start_commission_total() {
    let terms = ContractTerms::builder(dec!(50000.00), dec!(1.85), date(2024, 7, 1), 6)
        .payment_day(10)
        .agent_margin_rate_percent(dec!(0.15))
        .build()
        .unwrap();
    let agent = project(&terms).agent_schedule;

    // Aug 1 to Sep 1 is a 31-day opening; the closing gives back one day
    assert_eq!(agent.len(), 6);
    assert_eq!(agent[0].date, date(2024, 9, 1));
    assert_eq!(agent[0].pro_rata_days, 31);
    assert_eq!(agent[5].date, date(2025, 2, 1));
    assert_eq!(agent[5].pro_rata_days, 29);

    let total: Decimal = agent.iter().map(|i| i.amount).sum();
    assert_eq!(total, dec!(450));
}

#[test]
fn test_commission_mirrors_investor_shape() {
    let result = project(&reference_terms(dec!(0.15), dec!(0.10)));
    let agent = &result.agent_schedule;
    let leader = &result.leader_schedule;

    // fragment / full months / fragment
    assert!(agent.first().unwrap().pro_rata_days > 0);
    assert!(agent[1..agent.len() - 1].iter().all(|i| i.pro_rata_days == 0));
    assert!(agent.last().unwrap().pro_rata_days > 0);

    // Same calendar for both roles
    let agent_dates: Vec<NaiveDate> = agent.iter().map(|i| i.date).collect();
    let leader_dates: Vec<NaiveDate> = leader.iter().map(|i| i.date).collect();
    assert_eq!(agent_dates, leader_dates);
}

#[test]
fn test_zero_margin_suppresses_schedules() {
    let result = project(&reference_terms(Decimal::ZERO, Decimal::ZERO));
    assert!(result.agent_schedule.is_empty());
    assert!(result.leader_schedule.is_empty());
    assert_eq!(result.summary.total_agent_commission, Decimal::ZERO);

    let leader_only = project(&reference_terms(Decimal::ZERO, dec!(0.10)));
    assert!(leader_only.agent_schedule.is_empty());
    assert!(!leader_only.leader_schedule.is_empty());
}

// ===========================================================================
// Term edge cases
// ===========================================================================

#[test]
fn test_one_month_term_is_opening_plus_principal() {
    let terms = ContractTerms::builder(dec!(50000), dec!(1.85), date(2024, 1, 15), 1)
        .build()
        .unwrap();
    let result = project(&terms);
    let kinds: Vec<InstallmentKind> = result.investor_schedule.iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        vec![
            InstallmentKind::ProRataDividend,
            InstallmentKind::PrincipalReturn
        ]
    );
    assert_eq!(result.summary.closing_branch, ClosingBranch::SinglePeriod);
    // Single-period terms price only the opening fragment
    assert_close(result.summary.total_dividend_amount, dec!(801.67));
}

#[test]
fn test_twelve_month_term_payment_day_after_start_day() {
    let terms = ContractTerms::builder(dec!(100000), dec!(1.5), date(2026, 2, 1), 12)
        .payment_day(10)
        .build()
        .unwrap();
    let result = project(&terms);

    // Feb 1 -> Mar 10 is 37 days; 10 interior months; 23 days remain
    assert_eq!(result.investor_schedule[0].pro_rata_days, 37);
    assert_eq!(
        result.summary.closing_branch,
        ClosingBranch::Fragment { days: 23 }
    );
    assert_eq!(result.investor_schedule.len(), 13);
    assert_eq!(result.summary.maturity_date, date(2027, 2, 1));
    assert_eq!(result.summary.last_regular_payment_date, date(2027, 1, 10));
    assert_eq!(result.summary.total_dividend_amount, dec!(18000));
    assert_eq!(result.summary.total_yield_percent, dec!(18));
}

#[test]
fn test_end_of_month_start_clamps_maturity() {
    let terms = ContractTerms::builder(dec!(10000), dec!(2), date(2023, 8, 31), 6)
        .payment_day(31)
        .build()
        .unwrap();
    let result = project(&terms);
    assert_eq!(result.summary.maturity_date, date(2024, 2, 29));
    assert_eq!(result.investor_schedule[0].date, date(2023, 9, 30));
    assert!(result
        .investor_schedule
        .windows(2)
        .all(|w| w[0].date <= w[1].date));
}

#[test]
fn test_exhausted_opening_fragment() {
    // Dec 1 -> Jan 31 is 61 days, more than a two-month term holds
    let terms = ContractTerms::builder(dec!(3000), dec!(1), date(2023, 12, 1), 2)
        .payment_day(31)
        .build()
        .unwrap();
    let result = project(&terms);
    assert_eq!(result.summary.closing_branch, ClosingBranch::Exhausted);
    assert_eq!(result.investor_schedule.len(), 2);
    assert_eq!(result.summary.total_dividend_amount, dec!(61));
}

// ===========================================================================
// Determinism and envelope
// ===========================================================================

#[test]
fn test_repeated_calls_identical() {
    let terms = reference_terms(dec!(0.15), dec!(0.10));
    let a = project(&terms);
    let b = project(&terms);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_project_from_json_input() {
    let json = r#"{
        "principal": "50000.00",
        "monthly_rate_percent": "1.85",
        "start_date": "2024-01-15",
        "term_months": 6,
        "payment_day": 10,
        "agent_margin_rate_percent": "0.15"
    }"#;
    let terms: ContractTerms = serde_json::from_str(json).unwrap();
    assert_eq!(terms, reference_terms(dec!(0.15), Decimal::ZERO));

    let out = project_with_metadata(&terms);
    assert_eq!(out.result.summary.total_dividend_amount, dec!(5550));
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert!(!out.methodology.is_empty());
}
