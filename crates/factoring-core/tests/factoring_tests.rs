use factoring_core::factoring::batch::{resolve_batch_commission, CommissionMethod};
use factoring_core::factoring::disbursement::{compute_disbursement, OperationTerms};
use factoring_core::factoring::pricing::PricingSchedule;
use factoring_core::factoring::quote::{quote_operation, InvoiceProfile, QuoteInput};
use factoring_core::factoring::rate_search::{search_rate_for_target, CommissionBranch, RateSearchInput};
use factoring_core::{Currency, FactoringError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference_terms() -> OperationTerms {
    OperationTerms {
        term_days: 53,
        net_amount: dec!(8178.82),
        advance_rate: dec!(0.98),
        monthly_interest_rate: dec!(0.0125),
        structuring_commission_pct: dec!(0.005),
        minimum_commission: dec!(10),
        tax_rate: dec!(0.18),
        affiliation_commission: Decimal::ZERO,
        apply_affiliation: false,
    }
}

fn search_input_from(terms: &OperationTerms, target: Decimal) -> RateSearchInput {
    RateSearchInput {
        term_days: terms.term_days,
        net_amount: terms.net_amount,
        monthly_interest_rate: terms.monthly_interest_rate,
        structuring_commission_pct: terms.structuring_commission_pct,
        tax_rate: terms.tax_rate,
        target_amount: target,
        minimum_commission: terms.minimum_commission,
        affiliation_commission: terms.affiliation_commission,
        apply_affiliation: terms.apply_affiliation,
    }
}

// ===========================================================================
// Forward disbursement
// ===========================================================================

#[test]
fn test_reference_disbursement() {
    let out = compute_disbursement(&reference_terms()).unwrap().result;

    assert_eq!(out.capital, dec!(8015.24));
    assert_eq!(out.interest, dec!(178.93));
    assert_eq!(out.structuring_commission, dec!(40.08));
    assert_eq!(out.net_disbursement_theoretical, dec!(7756.81));
    assert_eq!(out.floored_disbursement, dec!(7756));
    assert_eq!(out.safety_margin, dec!(163.58));
}

#[test]
fn test_floor_bracket_holds_across_terms() {
    for term in [0, 1, 15, 30, 53, 90, 180] {
        let terms = OperationTerms {
            term_days: term,
            ..reference_terms()
        };
        let out = compute_disbursement(&terms).unwrap().result;
        assert!(out.floored_disbursement <= out.net_disbursement_theoretical);
        assert!(out.net_disbursement_theoretical < out.floored_disbursement + Decimal::ONE);
    }
}

#[test]
fn test_zero_term_only_commission_and_tax() {
    let terms = OperationTerms {
        term_days: 0,
        ..reference_terms()
    };
    let out = compute_disbursement(&terms).unwrap().result;

    assert_eq!(out.interest, Decimal::ZERO);
    // capital - commission * 1.18
    let expected = dec!(8015.2436) - dec!(8015.2436) * dec!(0.005) * dec!(1.18);
    assert_eq!(out.net_disbursement_theoretical, expected.round_dp(2));
}

#[test]
fn test_longer_term_pays_out_less() {
    let short = compute_disbursement(&reference_terms()).unwrap().result;
    let long = compute_disbursement(&OperationTerms {
        term_days: 90,
        ..reference_terms()
    })
    .unwrap()
    .result;
    assert!(long.net_disbursement_theoretical < short.net_disbursement_theoretical);
    assert_eq!(long.capital, short.capital);
}

// ===========================================================================
// Batch commission
// ===========================================================================

fn batch_invoice(net: Decimal) -> OperationTerms {
    OperationTerms {
        term_days: 30,
        net_amount: net,
        advance_rate: dec!(0.95),
        monthly_interest_rate: dec!(0.02),
        structuring_commission_pct: dec!(0.015),
        minimum_commission: dec!(66.67),
        tax_rate: dec!(0.18),
        affiliation_commission: Decimal::ZERO,
        apply_affiliation: false,
    }
}

#[test]
fn test_batch_percentage_scenario() {
    let batch = vec![
        batch_invoice(dec!(18795.09)),
        batch_invoice(dec!(7941.47)),
        OperationTerms {
            minimum_commission: dec!(66.66),
            ..batch_invoice(dec!(5507.67))
        },
    ];
    let out = resolve_batch_commission(&batch).unwrap().result;

    assert_eq!(out.commission_method, CommissionMethod::Percentage);
    assert_eq!(out.corrected_commission_total, dec!(459.48));
    let sum: Decimal = out.invoices.iter().map(|i| i.structuring_commission).sum();
    assert_eq!(sum, out.corrected_commission_total);
}

#[test]
fn test_batch_is_idempotent() {
    let batch = vec![batch_invoice(dec!(18795.09)), batch_invoice(dec!(7941.47))];
    let first = resolve_batch_commission(&batch).unwrap().result;
    let second = resolve_batch_commission(&batch).unwrap().result;

    assert_eq!(first.commission_method, second.commission_method);
    assert_eq!(first.corrected_commission_total, second.corrected_commission_total);
    let a: Vec<Decimal> = first.invoices.iter().map(|i| i.net_disbursement_theoretical).collect();
    let b: Vec<Decimal> = second.invoices.iter().map(|i| i.net_disbursement_theoretical).collect();
    assert_eq!(a, b);
}

#[test]
fn test_batch_prorated_total_is_sum_of_minimums() {
    let batch = vec![
        OperationTerms {
            structuring_commission_pct: dec!(0.01),
            advance_rate: dec!(0.9),
            ..batch_invoice(dec!(1000))
        },
        OperationTerms {
            structuring_commission_pct: dec!(0.01),
            advance_rate: dec!(0.9),
            ..batch_invoice(dec!(1000))
        },
        OperationTerms {
            structuring_commission_pct: dec!(0.01),
            advance_rate: dec!(0.9),
            minimum_commission: dec!(66.66),
            ..batch_invoice(dec!(1000))
        },
    ];
    let out = resolve_batch_commission(&batch).unwrap().result;

    assert_eq!(out.commission_method, CommissionMethod::Prorated);
    assert_eq!(out.corrected_commission_total, dec!(200.00));
}

#[test]
fn test_empty_batch_rejected() {
    assert!(matches!(
        resolve_batch_commission(&[]),
        Err(FactoringError::EmptyBatch)
    ));
}

// ===========================================================================
// Rate search
// ===========================================================================

#[test]
fn test_search_recovers_forward_rate() {
    let terms = reference_terms();
    let forward = compute_disbursement(&terms).unwrap().result;

    let out = search_rate_for_target(&search_input_from(&terms, forward.net_disbursement_theoretical))
        .unwrap()
        .result;

    assert_eq!(out.search.found_advance_rate, dec!(0.980000));
    assert_eq!(out.search.commission_branch, CommissionBranch::Percentage);
}

#[test]
fn test_search_with_affiliation() {
    let input = RateSearchInput {
        term_days: 56,
        net_amount: dec!(5669.90),
        monthly_interest_rate: dec!(0.0125),
        structuring_commission_pct: dec!(0.005),
        tax_rate: dec!(0.18),
        target_amount: dec!(5360),
        minimum_commission: dec!(10),
        affiliation_commission: dec!(200),
        apply_affiliation: true,
    };
    let out = search_rate_for_target(&input).unwrap().result;

    assert_eq!(out.calculation.capital, dec!(5791.47));
    assert_eq!(out.search.achieved_disbursement, dec!(5360.00));
    let breakdown = out.breakdown.unwrap();
    assert_eq!(breakdown.affiliation_commission.percentage, dec!(3.527));
}

#[test]
fn test_search_zero_net_amount() {
    let input = search_input_from(
        &OperationTerms {
            net_amount: Decimal::ZERO,
            ..reference_terms()
        },
        dec!(100),
    );
    assert!(matches!(
        search_rate_for_target(&input),
        Err(FactoringError::ZeroNetAmount)
    ));
}

// ===========================================================================
// Quote
// ===========================================================================

#[test]
fn test_quote_two_currencies() {
    let pen = InvoiceProfile {
        invoice_number: "F001-120".into(),
        issuer_name: None,
        acceptor_name: Some("Minera Andina SA".into()),
        currency: Currency::PEN,
        total_amount: dec!(23600),
        net_amount: dec!(20768),
        issue_date: "10-03-2025".into(),
        credit_days: 90,
        disbursement_date: "14-03-2025".into(),
        advance_rate: dec!(0.95),
        monthly_interest_rate: dec!(0.015),
        apply_affiliation: true,
    };
    let usd = InvoiceProfile {
        invoice_number: "F001-121".into(),
        currency: Currency::USD,
        total_amount: dec!(5900),
        net_amount: dec!(5192),
        apply_affiliation: false,
        ..pen.clone()
    };
    let input = QuoteInput {
        pricing: PricingSchedule::default(),
        invoices: vec![pen, usd],
    };
    let out = quote_operation(&input).unwrap().result;

    assert_eq!(out.quotes.len(), 2);
    assert_eq!(out.quotes[0].expected_payment_date, "08-06-2025");
    assert_eq!(out.quotes[0].operation_term_days, 86);
    assert_eq!(out.quotes[0].disbursement.affiliation_commission, dec!(200));
    assert_eq!(out.quotes[1].disbursement.affiliation_commission, Decimal::ZERO);
    // USD minimum of 50 beats 0.5% of 4932.40
    assert_eq!(out.quotes[1].disbursement.structuring_commission, dec!(50));
    for q in &out.quotes {
        assert_eq!(q.withholding_pct, dec!(12));
        assert!(q.target_amount <= q.disbursement.net_disbursement_theoretical);
        assert_eq!(q.rate_search.search.achieved_disbursement, q.target_amount);
    }
}

// ===========================================================================
// Round-trip property across the minimum-commission threshold
// ===========================================================================

proptest! {
    #[test]
    fn test_forward_then_search_round_trip(
        net_cents in 100_000i64..10_000_000i64,
        advance_permille in 500i64..=1000i64,
        term_days in 1i64..120i64,
        monthly_bp in 50i64..400i64,
        pct_bp in 50i64..200i64,
        threshold_pct in 50i64..150i64,
    ) {
        let net_amount = Decimal::new(net_cents, 2);
        let advance_rate = Decimal::new(advance_permille, 3);
        let pct = Decimal::new(pct_bp, 4);
        // Minimum placed between half and one and a half times the percentage commission
        let minimum = (net_amount * advance_rate * pct * Decimal::new(threshold_pct, 2)).round_dp(2);

        let terms = OperationTerms {
            term_days,
            net_amount,
            advance_rate,
            monthly_interest_rate: Decimal::new(monthly_bp, 4),
            structuring_commission_pct: pct,
            minimum_commission: minimum,
            tax_rate: dec!(0.18),
            affiliation_commission: Decimal::ZERO,
            apply_affiliation: false,
        };
        let forward = compute_disbursement(&terms).unwrap().result;
        prop_assume!(forward.net_disbursement_theoretical > Decimal::ZERO);

        let solved = search_rate_for_target(&search_input_from(&terms, forward.net_disbursement_theoretical))
            .unwrap()
            .result;

        let diff = (solved.search.found_advance_rate - advance_rate).abs();
        prop_assert!(diff < dec!(0.0001), "advance {} solved {}", advance_rate, solved.search.found_advance_rate);
        prop_assert!((solved.search.achieved_disbursement - forward.net_disbursement_theoretical).abs() <= dec!(0.01));
    }
}
