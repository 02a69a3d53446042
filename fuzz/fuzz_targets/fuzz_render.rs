#![no_main]

use chrono::NaiveDate;
use lastschrift::core::*;
use libfuzzer_sys::fuzz_target;
use rust_decimal::Decimal;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    // Arbitrary text in every free-form field must render without panicking,
    // byte-identical on a second pass. Control characters are refused.
    let mut fields = s.split('\n');
    let mut next = || fields.next().unwrap_or("x").to_string();
    let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let Ok(mut doc) = DocumentBuilder::new(next(), next(), next(), next(), SequenceType::OneOff)
        .created_at(day.and_hms_opt(0, 0, 0).unwrap())
        .collection_date(day)
        .message_id(next())
        .payment_information_id(next())
        .build()
    else {
        return;
    };

    let mut tx = TransactionBuilder::new(
        next(),
        next(),
        next(),
        next(),
        Decimal::new(s.len() as i64, 2),
        day,
    )
    .remittance(next())
    .ultimate_debtor(next())
    .build();
    tx.debtor_account_mut().id_mut().iban = Some(next());
    doc.add_transaction(tx);

    match doc.to_xml_bytes() {
        Ok(first) => assert_eq!(first, doc.to_xml_bytes().unwrap()),
        Err(LastschriftError::Xml(_)) => {}
        Err(e) => panic!("unexpected render error: {e}"),
    }
    let _ = validate_document(&doc);
});
