use chrono::NaiveDate;
use lastschrift::core::*;
use rust_decimal_macros::dec;

fn main() {
    let signed = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();

    // ── 1. Build the batch ────────────────────────────────────────────
    println!("=== Build ===");
    let mut doc = DocumentBuilder::new(
        "Sportverein Grün-Weiß e.V.",
        "DE89370400440532013000",
        "COBADEFFXXX",
        "DE98ZZZ09999999999",
        SequenceType::Recurring,
    )
    .build_with(&mut SequenceIdGenerator::new("SV-2024-"))
    .expect("creditor identity is complete");

    doc.add_transaction(
        TransactionBuilder::new(
            "Jürgen Weiß",
            "DE02120300000000202051",
            "BYLADEM1001",
            "SV-MANDATE-0001",
            dec!(30.00),
            signed,
        )
        .end_to_end_id("SV-2024-Q1-0001")
        .remittance("Mitgliedsbeitrag Q1 2024")
        .build(),
    );
    doc.add_transaction(
        TransactionBuilder::new(
            "Änne Öztürk",
            "DE02500105170137075030",
            "INGDDEFFXXX",
            "SV-MANDATE-0002",
            dec!(15.50),
            signed,
        )
        .ultimate_debtor("Familie Öztürk")
        .amended_from(Some("Turnverein Alt e.V.".into()), None)
        .build(),
    );

    // ── 2. Validate ───────────────────────────────────────────────────
    println!("=== Validation ===");
    let findings = validate_document(&doc);
    if findings.is_empty() {
        println!("No findings.");
    }
    for finding in &findings {
        println!("  {finding}");
    }

    // ── 3. Render ─────────────────────────────────────────────────────
    println!("=== pain.008 ===");
    let aggregates = doc.refresh_aggregates().expect("control sum in range");
    println!(
        "Transactions: {}  Control sum: {}",
        aggregates.number_of_transactions, aggregates.control_sum
    );
    let xml = doc.to_xml().expect("rendering into memory succeeds");
    println!("{xml}");
}
