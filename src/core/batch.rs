use chrono::{NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LastschriftError;
use super::transaction::DirectDebitTransactionInformation;
use super::types::*;

/// PmtMtd of a direct debit batch.
pub const PAYMENT_METHOD_DIRECT_DEBIT: &str = "DD";
/// ChrgBr: charges shared according to the service level.
pub const CHARGE_BEARER_SLEV: &str = "SLEV";

const CRE_DT_TM_BASE: &str = "%Y-%m-%dT%H:%M:%S";

/// GrpHdr: message-level identification and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupHeader {
    /// MsgId
    pub message_id: String,
    creation_date_time: NaiveDateTime,
    /// NbOfTxs, overwritten before every serialization.
    pub number_of_transactions: u64,
    /// CtrlSum, overwritten before every serialization.
    pub control_sum: Decimal,
    initiating_party: Option<InitiatingParty>,
}

impl GroupHeader {
    pub fn new(message_id: impl Into<String>, created: NaiveDateTime) -> Self {
        Self {
            message_id: message_id.into(),
            creation_date_time: truncate_to_ticks(created),
            number_of_transactions: 0,
            control_sum: Decimal::ZERO,
            initiating_party: None,
        }
    }

    /// Creation time, at the 100-ns resolution of CreDtTm.
    pub fn creation_date_time(&self) -> NaiveDateTime {
        self.creation_date_time
    }

    pub fn set_creation_date_time(&mut self, created: NaiveDateTime) {
        self.creation_date_time = truncate_to_ticks(created);
    }

    /// CreDtTm as emitted: `yyyy-MM-ddTHH:mm:ss.fffffffZ`.
    pub fn creation_date_time_string(&self) -> String {
        let ticks = (self.creation_date_time.nanosecond() % 1_000_000_000) / 100;
        format!(
            "{}.{:07}Z",
            self.creation_date_time.format(CRE_DT_TM_BASE),
            ticks
        )
    }

    /// Set the creation time from its textual form. The trailing `Z` and the
    /// fractional seconds are optional.
    pub fn set_creation_date_time_string(&mut self, value: &str) -> Result<(), LastschriftError> {
        let trimmed = value.trim();
        let body = trimmed.strip_suffix('Z').unwrap_or(trimmed);
        let parsed = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f").map_err(|e| {
            LastschriftError::Builder(format!("invalid creation timestamp '{value}': {e}"))
        })?;
        self.set_creation_date_time(parsed);
        Ok(())
    }

    lazy_field!(
        /// InitgPty
        initiating_party, initiating_party_mut, set_initiating_party: InitiatingParty
    );
}

fn truncate_to_ticks(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_nanosecond(value.nanosecond() / 100 * 100)
        .unwrap_or(value)
}

/// PmtInf: the single batch of collections in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInformation {
    /// PmtInfId
    pub payment_information_id: String,
    /// PmtMtd, always "DD" for direct debits.
    pub payment_method: String,
    /// BtchBookg
    pub batch_booking: bool,
    /// NbOfTxs, overwritten before every serialization.
    pub number_of_transactions: u64,
    /// CtrlSum, overwritten before every serialization.
    pub control_sum: Decimal,
    payment_type_information: Option<PaymentTypeInformation>,
    /// ReqdColltnDt
    pub requested_collection_date: NaiveDate,
    creditor: Option<Creditor>,
    creditor_account: Option<CreditorAccount>,
    creditor_agent: Option<CreditorAgent>,
    /// ChrgBr
    pub charge_bearer: String,
    creditor_scheme_identification: Option<CreditorSchemeIdentification>,
    transactions: Vec<DirectDebitTransactionInformation>,
}

impl PaymentInformation {
    pub fn new(payment_information_id: impl Into<String>, collection_date: NaiveDate) -> Self {
        Self {
            payment_information_id: payment_information_id.into(),
            payment_method: PAYMENT_METHOD_DIRECT_DEBIT.into(),
            batch_booking: false,
            number_of_transactions: 0,
            control_sum: Decimal::ZERO,
            payment_type_information: None,
            requested_collection_date: collection_date,
            creditor: None,
            creditor_account: None,
            creditor_agent: None,
            charge_bearer: CHARGE_BEARER_SLEV.into(),
            creditor_scheme_identification: None,
            transactions: Vec::new(),
        }
    }

    lazy_field!(
        /// PmtTpInf
        payment_type_information,
        payment_type_information_mut,
        set_payment_type_information: PaymentTypeInformation
    );

    lazy_field!(
        /// Cdtr
        creditor, creditor_mut, set_creditor: Creditor
    );

    lazy_field!(
        /// CdtrAcct
        creditor_account, creditor_account_mut, set_creditor_account: CreditorAccount
    );

    lazy_field!(
        /// CdtrAgt
        creditor_agent, creditor_agent_mut, set_creditor_agent: CreditorAgent
    );

    lazy_field!(
        /// CdtrSchmeId
        creditor_scheme_identification,
        creditor_scheme_identification_mut,
        set_creditor_scheme_identification: CreditorSchemeIdentification
    );

    /// DrctDbtTxInf entries in insertion order.
    pub fn transactions(&self) -> &[DirectDebitTransactionInformation] {
        &self.transactions
    }

    pub fn transactions_mut(&mut self) -> &mut Vec<DirectDebitTransactionInformation> {
        &mut self.transactions
    }

    pub fn push_transaction(&mut self, transaction: DirectDebitTransactionInformation) {
        self.transactions.push(transaction);
    }
}

/// CstmrDrctDbtInitn: group header plus the one payment batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDirectDebitInitiation {
    /// GrpHdr
    pub group_header: GroupHeader,
    /// PmtInf
    pub payment_information: PaymentInformation,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn created() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_nano_opt(9, 30, 5, 123_456_789)
            .unwrap()
    }

    #[test]
    fn creation_timestamp_has_seven_fraction_digits() {
        let header = GroupHeader::new("MSG-1", created());
        assert_eq!(
            header.creation_date_time_string(),
            "2024-06-15T09:30:05.1234567Z"
        );
    }

    #[test]
    fn creation_timestamp_zero_fraction() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        let header = GroupHeader::new("MSG-1", at);
        assert_eq!(
            header.creation_date_time_string(),
            "2024-01-02T03:04:05.0000000Z"
        );
    }

    #[test]
    fn creation_timestamp_string_roundtrip() {
        let mut header = GroupHeader::new("MSG-1", created());
        let text = header.creation_date_time_string();
        header
            .set_creation_date_time_string("2020-02-29T23:59:59.9999999Z")
            .unwrap();
        assert_eq!(
            header.creation_date_time_string(),
            "2020-02-29T23:59:59.9999999Z"
        );
        header.set_creation_date_time_string(&text).unwrap();
        assert_eq!(header.creation_date_time_string(), text);
        assert_eq!(header.creation_date_time().nanosecond(), 123_456_700);
    }

    #[test]
    fn creation_timestamp_without_fraction_or_zone() {
        let mut header = GroupHeader::new("MSG-1", created());
        header
            .set_creation_date_time_string("2024-06-15T10:00:00")
            .unwrap();
        assert_eq!(
            header.creation_date_time_string(),
            "2024-06-15T10:00:00.0000000Z"
        );
    }

    #[test]
    fn creation_timestamp_rejects_garbage() {
        let mut header = GroupHeader::new("MSG-1", created());
        let err = header.set_creation_date_time_string("yesterday").unwrap_err();
        assert!(matches!(err, LastschriftError::Builder(_)));
        assert_eq!(header.creation_date_time().nanosecond(), 123_456_700);
    }

    #[test]
    fn batch_defaults() {
        let batch = PaymentInformation::new("PMT-1", NaiveDate::from_ymd_opt(2024, 6, 22).unwrap());
        assert_eq!(batch.payment_method, "DD");
        assert_eq!(batch.charge_bearer, "SLEV");
        assert!(!batch.batch_booking);
        assert!(batch.transactions().is_empty());
        assert!(batch.creditor().is_none());
    }
}
