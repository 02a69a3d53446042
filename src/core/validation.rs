use rust_decimal::Decimal;
use tracing::warn;

use super::document::Document;
use super::error::{LastschriftError, ValidationError};
use super::transaction::DirectDebitTransactionInformation;

/// Check a document for content a bank would reject.
///
/// This layer is optional: the document model accepts anything, and
/// serialization never calls it. Returns all problems found (not just the
/// first).
pub fn validate_document(document: &Document) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let batch = &document.stored_envelope().payment_information;

    // DD-01: a batch needs at least one collection
    if batch.transactions().is_empty() {
        errors.push(ValidationError::with_rule(
            "transactions",
            "document must contain at least one transaction",
            "DD-01",
        ));
    }

    // DD-02: creditor account
    match batch
        .creditor_account()
        .and_then(|account| account.id())
        .and_then(|id| id.iban_value())
    {
        Some(iban) if !is_valid_iban(iban) => errors.push(ValidationError::with_rule(
            "creditor_account.iban",
            format!("IBAN '{iban}' has invalid check digits"),
            "DD-02",
        )),
        Some(_) => {}
        None => errors.push(ValidationError::with_rule(
            "creditor_account.iban",
            "creditor IBAN is missing",
            "DD-02",
        )),
    }

    // DD-09: creditor identifier under PrvtId/Othr/Id
    let creditor_id = batch
        .creditor_scheme_identification()
        .and_then(|scheme| scheme.id())
        .and_then(|id| id.private_identification())
        .and_then(|private| private.other())
        .and_then(|other| other.id.as_deref());
    if creditor_id.is_none_or(|id| id.trim().is_empty()) {
        errors.push(ValidationError::with_rule(
            "creditor_scheme_identification",
            "creditor scheme identifier is missing",
            "DD-09",
        ));
    }

    for (i, tx) in batch.transactions().iter().enumerate() {
        validate_transaction(tx, i, batch.requested_collection_date, &mut errors);
    }

    errors
}

/// Run [`validate_document`] and turn any findings into an error.
pub fn validate_document_strict(document: &Document) -> Result<(), LastschriftError> {
    let errors = validate_document(document);
    if errors.is_empty() {
        return Ok(());
    }
    warn!(
        message_id = %document.stored_envelope().group_header.message_id,
        count = errors.len(),
        "document failed validation"
    );
    Err(LastschriftError::Validation(errors))
}

fn validate_transaction(
    tx: &DirectDebitTransactionInformation,
    index: usize,
    collection_date: chrono::NaiveDate,
    errors: &mut Vec<ValidationError>,
) {
    let prefix = format!("transactions[{index}]");

    // DD-03 / DD-04: mandate reference and signature date
    let mandate = tx.mandate();
    if mandate
        .and_then(|m| m.mandate_id.as_deref())
        .is_none_or(|id| id.trim().is_empty())
    {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.mandate.mandate_id"),
            "mandate reference is missing",
            "DD-03",
        ));
    }
    match mandate.and_then(|m| m.date_of_signature) {
        None => errors.push(ValidationError::with_rule(
            format!("{prefix}.mandate.date_of_signature"),
            "mandate signature date is missing",
            "DD-04",
        )),
        Some(signed) if signed > collection_date => errors.push(ValidationError::with_rule(
            format!("{prefix}.mandate.date_of_signature"),
            format!("mandate signed on {signed}, after the collection date {collection_date}"),
            "DD-10",
        )),
        Some(_) => {}
    }

    // DD-05: amount
    if tx.amount() <= Decimal::ZERO {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.instructed_amount"),
            format!("amount must be positive, got {}", tx.amount()),
            "DD-05",
        ));
    }

    // DD-06: debtor name
    if tx
        .debtor()
        .and_then(|d| d.name())
        .is_none_or(|name| name.trim().is_empty())
    {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.debtor.name"),
            "debtor name is missing",
            "DD-06",
        ));
    }

    // DD-07: debtor IBAN
    match tx
        .debtor_account()
        .and_then(|account| account.id())
        .and_then(|id| id.iban_value())
    {
        Some(iban) if !is_valid_iban(iban) => errors.push(ValidationError::with_rule(
            format!("{prefix}.debtor_account.iban"),
            format!("IBAN '{iban}' has invalid check digits"),
            "DD-07",
        )),
        Some(_) => {}
        None => errors.push(ValidationError::with_rule(
            format!("{prefix}.debtor_account.iban"),
            "debtor IBAN is missing",
            "DD-07",
        )),
    }

    // DD-08: debtor BIC
    if tx
        .debtor_agent()
        .and_then(|agent| agent.financial_institution())
        .and_then(|fi| fi.bic.as_deref())
        .is_none_or(|bic| bic.trim().is_empty())
    {
        errors.push(ValidationError::with_rule(
            format!("{prefix}.debtor_agent.bic"),
            "debtor BIC is missing",
            "DD-08",
        ));
    }
}

/// Check an IBAN's ISO 7064 mod-97 check digits. Spaces are ignored.
pub fn is_valid_iban(iban: &str) -> bool {
    let compact: String = iban.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() < 5 || !compact.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    // Move country code and check digits to the end, letters become 10..35
    let (head, tail) = compact.split_at(4);
    let mut remainder: u32 = 0;
    for c in tail.chars().chain(head.chars()) {
        let value = match c.to_digit(36) {
            Some(v) => v,
            None => return false,
        };
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }
    remainder == 1
}
