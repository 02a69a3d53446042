//! Property-based tests for aggregates, name folding and XML output.
//!
//! Run with: `cargo test --test proptest_tests`

#![cfg(feature = "pain008")]

use chrono::NaiveDate;
use lastschrift::core::*;
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn document() -> Document {
    DocumentBuilder::new(
        "ACME GmbH",
        "DE89370400440532013000",
        "COBADEFFXXX",
        "DE98ZZZ09999999999",
        SequenceType::Recurring,
    )
    .created_at(date(2024, 6, 1).and_hms_opt(8, 0, 0).unwrap())
    .collection_date(date(2024, 6, 10))
    .build_with(&mut SequenceIdGenerator::new("P-"))
    .unwrap()
}

/// Amounts with up to three fractional digits, cents mostly.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (1i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2)),
        (1i64..1_000_000).prop_map(|mils| Decimal::new(mils, 3)),
    ]
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-ZäöüÄÖÜß ]{1,30}"
}

fn tx(name: &str, amount: Decimal) -> DirectDebitTransactionInformation {
    TransactionBuilder::new(
        name,
        "DE02120300000000202051",
        "BYLADEM1001",
        "M-1",
        amount,
        date(2024, 1, 1),
    )
    .build()
}

proptest! {
    #[test]
    fn aggregates_match_transactions(amounts in prop::collection::vec(arb_amount(), 0..20)) {
        let mut doc = document();
        for amount in &amounts {
            doc.add_transaction(tx("Debtor", *amount));
        }
        let expected: Decimal = amounts.iter().copied().sum::<Decimal>()
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);

        let envelope = doc.envelope().unwrap();
        prop_assert_eq!(envelope.group_header.number_of_transactions, amounts.len() as u64);
        prop_assert_eq!(envelope.payment_information.number_of_transactions, amounts.len() as u64);
        prop_assert_eq!(envelope.group_header.control_sum, expected);
        prop_assert_eq!(envelope.payment_information.control_sum, expected);
    }

    #[test]
    fn control_sum_has_two_decimals(amounts in prop::collection::vec(arb_amount(), 1..10)) {
        let aggregates = compute_aggregates(
            &amounts.iter().map(|a| tx("Debtor", *a)).collect::<Vec<_>>(),
        ).unwrap();
        prop_assert!(aggregates.control_sum.scale() <= 2);
    }

    #[test]
    fn folded_names_have_no_umlauts(name in arb_name()) {
        let folded = fold_umlauts(&name);
        prop_assert!(!folded.contains(['ä', 'ö', 'ü', 'Ä', 'Ö', 'Ü', 'ß']));
        prop_assert!(folded.is_ascii());
        prop_assert_eq!(fold_umlauts(&folded), folded.clone());
    }

    #[test]
    fn serialized_count_matches(n in 0usize..15) {
        let mut doc = document();
        for i in 0..n {
            doc.add_transaction(tx(&format!("Debtor {i}"), Decimal::ONE));
        }
        let xml = doc.to_xml().unwrap();
        let nb = format!("<NbOfTxs>{n}</NbOfTxs>");
        prop_assert_eq!(xml.matches(&nb).count(), 2);
        prop_assert_eq!(xml.matches("<DrctDbtTxInf>").count(), n);
        prop_assert_eq!(doc.to_xml().unwrap(), xml);
    }

    #[test]
    fn debtor_names_render_folded(name in arb_name()) {
        let mut doc = document();
        doc.add_transaction(tx(&name, Decimal::ONE));
        let xml = doc.to_xml().unwrap();
        let start = xml.find("<Dbtr>").unwrap();
        let end = xml[start..].find("</Dbtr>").unwrap() + start;
        prop_assert!(xml[start..end].is_ascii());
    }
}
