use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::*;

/// DrctDbtTxInf: a single collection from one debtor.
///
/// Every sub-structure is created on first mutable access. Untouched
/// schema-mandatory parts are rendered from their defaults; an untouched
/// ultimate debtor or remittance block is left out of the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectDebitTransactionInformation {
    payment_identification: Option<PaymentIdentification>,
    instructed_amount: Option<InstructedAmount>,
    direct_debit_transaction: Option<DirectDebitTransaction>,
    debtor_agent: Option<DebtorAgent>,
    debtor: Option<Debtor>,
    debtor_account: Option<DebtorAccount>,
    ultimate_debtor: Option<UltimateDebtor>,
    remittance_information: Option<RemittanceInformation>,
}

impl DirectDebitTransactionInformation {
    lazy_field!(
        /// PmtId
        payment_identification,
        payment_identification_mut,
        set_payment_identification: PaymentIdentification
    );

    lazy_field!(
        /// InstdAmt
        instructed_amount, instructed_amount_mut, set_instructed_amount: InstructedAmount
    );

    lazy_field!(
        /// DrctDbtTx
        direct_debit_transaction,
        direct_debit_transaction_mut,
        set_direct_debit_transaction: DirectDebitTransaction
    );

    lazy_field!(
        /// DbtrAgt
        debtor_agent, debtor_agent_mut, set_debtor_agent: DebtorAgent
    );

    lazy_field!(
        /// Dbtr
        debtor, debtor_mut, set_debtor: Debtor
    );

    lazy_field!(
        /// DbtrAcct
        debtor_account, debtor_account_mut, set_debtor_account: DebtorAccount
    );

    lazy_field!(
        /// UltmtDbtr
        ultimate_debtor, ultimate_debtor_mut, set_ultimate_debtor: UltimateDebtor
    );

    lazy_field!(
        /// RmtInf
        remittance_information,
        remittance_information_mut,
        set_remittance_information: RemittanceInformation
    );

    /// Instructed amount value, zero when no amount was set.
    pub fn amount(&self) -> Decimal {
        self.instructed_amount
            .as_ref()
            .map_or(Decimal::ZERO, |amount| amount.value)
    }

    /// Shortcut to DrctDbtTx/MndtRltdInf, creating both on first use.
    pub fn mandate_mut(&mut self) -> &mut MandateRelatedInformation {
        self.direct_debit_transaction_mut()
            .mandate_related_information_mut()
    }

    pub fn mandate(&self) -> Option<&MandateRelatedInformation> {
        self.direct_debit_transaction
            .as_ref()
            .and_then(|tx| tx.mandate_related_information())
    }
}

/// Builder for a collection, taking the fields every SEPA debit needs.
///
/// ```
/// use chrono::NaiveDate;
/// use lastschrift::core::*;
/// use rust_decimal_macros::dec;
///
/// let tx = TransactionBuilder::new(
///     "Jürgen Müller",
///     "DE02120300000000202051",
///     "BYLADEM1001",
///     "MANDATE-0001",
///     dec!(49.90),
///     NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
/// )
/// .remittance("Mitgliedsbeitrag 2024")
/// .build();
///
/// assert_eq!(tx.debtor().unwrap().name(), Some("Juergen Mueller"));
/// assert_eq!(tx.amount(), dec!(49.90));
/// ```
pub struct TransactionBuilder {
    debtor_name: String,
    debtor_iban: String,
    debtor_bic: String,
    mandate_id: String,
    amount: Decimal,
    currency: Option<String>,
    date_of_signature: NaiveDate,
    end_to_end_id: Option<String>,
    ultimate_debtor: Option<String>,
    remittance: Option<String>,
    amendment: Option<OriginalCreditorSchemeIdentification>,
}

impl TransactionBuilder {
    pub fn new(
        debtor_name: impl Into<String>,
        debtor_iban: impl Into<String>,
        debtor_bic: impl Into<String>,
        mandate_id: impl Into<String>,
        amount: Decimal,
        date_of_signature: NaiveDate,
    ) -> Self {
        Self {
            debtor_name: debtor_name.into(),
            debtor_iban: debtor_iban.into(),
            debtor_bic: debtor_bic.into(),
            mandate_id: mandate_id.into(),
            amount,
            currency: None,
            date_of_signature,
            end_to_end_id: None,
            ultimate_debtor: None,
            remittance: None,
            amendment: None,
        }
    }

    pub fn end_to_end_id(mut self, id: impl Into<String>) -> Self {
        self.end_to_end_id = Some(id.into());
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = Some(code.into());
        self
    }

    pub fn ultimate_debtor(mut self, name: impl Into<String>) -> Self {
        self.ultimate_debtor = Some(name.into());
        self
    }

    pub fn remittance(mut self, text: impl Into<String>) -> Self {
        self.remittance = Some(text.into());
        self
    }

    /// Mark the mandate as amended, recording the creditor identity it was
    /// signed under.
    pub fn amended_from(
        mut self,
        original_name: Option<String>,
        original_creditor_id: Option<String>,
    ) -> Self {
        let mut original = OriginalCreditorSchemeIdentification::default();
        original.name = original_name;
        if let Some(id) = original_creditor_id {
            original.set_id(Some(Identification::private(id)));
        }
        self.amendment = Some(original);
        self
    }

    pub fn build(self) -> DirectDebitTransactionInformation {
        let mut tx = DirectDebitTransactionInformation::default();

        if let Some(id) = self.end_to_end_id {
            tx.payment_identification_mut().end_to_end_id = id;
        }

        let amount = tx.instructed_amount_mut();
        amount.value = self.amount;
        if let Some(currency) = self.currency {
            amount.currency = currency;
        }

        let mandate = tx.mandate_mut();
        mandate.mandate_id = Some(self.mandate_id);
        mandate.date_of_signature = Some(self.date_of_signature);
        if let Some(original) = self.amendment {
            mandate.amendment_indicator = true;
            if let Some(details) = mandate.amendment_details_mut() {
                details.set_original_creditor_scheme_id(Some(original));
            }
        }

        tx.set_debtor_agent(Some(Agent::with_bic(self.debtor_bic)));
        tx.set_debtor(Some(Debtor::new(self.debtor_name)));
        tx.set_debtor_account(Some(CashAccount::with_iban(self.debtor_iban)));

        if let Some(name) = self.ultimate_debtor {
            tx.ultimate_debtor_mut().name = Some(name);
        }
        if let Some(text) = self.remittance {
            tx.remittance_information_mut().unstructured = Some(text);
        }

        tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn builder() -> TransactionBuilder {
        TransactionBuilder::new(
            "Björn Weiß",
            "DE02120300000000202051",
            "BYLADEM1001",
            "M-42",
            dec!(12.50),
            date(2023, 11, 2),
        )
    }

    #[test]
    fn default_transaction_is_untouched() {
        let tx = DirectDebitTransactionInformation::default();
        assert!(tx.payment_identification().is_none());
        assert!(tx.ultimate_debtor().is_none());
        assert!(tx.remittance_information().is_none());
        assert!(tx.mandate().is_none());
        assert_eq!(tx.amount(), Decimal::ZERO);
    }

    #[test]
    fn builder_sets_mandatory_fields() {
        let tx = builder().build();
        assert_eq!(tx.debtor().unwrap().name(), Some("Bjoern Weiss"));
        assert_eq!(
            tx.debtor_account().unwrap().id().unwrap().iban.as_deref(),
            Some("DE02120300000000202051")
        );
        assert_eq!(
            tx.debtor_agent()
                .unwrap()
                .financial_institution()
                .unwrap()
                .bic
                .as_deref(),
            Some("BYLADEM1001")
        );
        let mandate = tx.mandate().unwrap();
        assert_eq!(mandate.mandate_id.as_deref(), Some("M-42"));
        assert_eq!(mandate.date_of_signature, Some(date(2023, 11, 2)));
        assert!(!mandate.amendment_indicator);
        assert!(tx.payment_identification().is_none());
        assert_eq!(tx.instructed_amount().unwrap().currency, "EUR");
    }

    #[test]
    fn builder_optional_fields() {
        let tx = builder()
            .end_to_end_id("E2E-1")
            .ultimate_debtor("Größe GmbH")
            .remittance("Rechnung 7")
            .currency("CHF")
            .build();
        assert_eq!(tx.payment_identification().unwrap().end_to_end_id, "E2E-1");
        // only the debtor name is folded
        assert_eq!(
            tx.ultimate_debtor().unwrap().name.as_deref(),
            Some("Größe GmbH")
        );
        assert_eq!(
            tx.remittance_information().unwrap().unstructured.as_deref(),
            Some("Rechnung 7")
        );
        assert_eq!(tx.instructed_amount().unwrap().currency, "CHF");
    }

    #[test]
    fn builder_amendment() {
        let tx = builder()
            .amended_from(Some("Vorgänger AG".into()), Some("DE11ZZZ00000000001".into()))
            .build();
        let mandate = tx.mandate().unwrap();
        assert!(mandate.amendment_indicator);
        let original = mandate
            .amendment_details()
            .unwrap()
            .original_creditor_scheme_id()
            .unwrap();
        assert_eq!(original.name.as_deref(), Some("Vorgänger AG"));
        let other = original
            .id()
            .unwrap()
            .private_identification()
            .unwrap()
            .other()
            .unwrap();
        assert_eq!(other.id.as_deref(), Some("DE11ZZZ00000000001"));
    }

    #[test]
    fn builder_amendment_name_only() {
        let tx = builder().amended_from(Some("Alt e.V.".into()), None).build();
        let original = tx
            .mandate()
            .unwrap()
            .amendment_details()
            .unwrap()
            .original_creditor_scheme_id()
            .unwrap();
        assert_eq!(original.name.as_deref(), Some("Alt e.V."));
        assert!(original.id().is_none());
    }
}
