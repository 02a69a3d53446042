use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::batch::{CustomerDirectDebitInitiation, GroupHeader, PaymentInformation};
use super::error::LastschriftError;
use super::numbering::{FileTimeIdGenerator, IdGenerator};
use super::transaction::DirectDebitTransactionInformation;
use super::types::*;

/// ISO 20022 namespace of pain.008.001.02.
pub const PAIN_008_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02";
/// Default `xsi:schemaLocation` of the root element.
pub const PAIN_008_SCHEMA_LOCATION: &str =
    "urn:iso:std:iso:20022:tech:xsd:pain.008.001.02 pain.008.001.02.xsd";

/// Output and defaulting options of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Spaces per indentation level in the emitted XML.
    pub indent_size: usize,
    /// Days between today and the default requested collection date.
    pub collection_lead_days: u32,
    /// Value of the root `xsi:schemaLocation` attribute.
    pub schema_location: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            indent_size: 2,
            collection_lead_days: 7,
            schema_location: PAIN_008_SCHEMA_LOCATION.into(),
        }
    }
}

/// Transaction count and control sum of a transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregates {
    pub number_of_transactions: u64,
    pub control_sum: Decimal,
}

/// Count the transactions and sum their amounts.
///
/// The sum is rounded once, to 2 decimal places with midpoints going to the
/// even neighbour. Fails when the sum leaves the range of [`Decimal`].
pub fn compute_aggregates(
    transactions: &[DirectDebitTransactionInformation],
) -> Result<Aggregates, LastschriftError> {
    let total = transactions
        .iter()
        .enumerate()
        .try_fold(Decimal::ZERO, |sum, (i, tx)| {
            sum.checked_add(tx.amount()).ok_or_else(|| {
                LastschriftError::Arithmetic(format!(
                    "control sum overflows at transaction {i} (amount {})",
                    tx.amount()
                ))
            })
        })?;
    Ok(Aggregates {
        number_of_transactions: transactions.len() as u64,
        control_sum: total.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven),
    })
}

/// Builder for a [`Document`], fixing the creditor identity of the batch.
///
/// ```
/// use chrono::NaiveDate;
/// use lastschrift::core::*;
///
/// let created = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// let doc = DocumentBuilder::new(
///     "ACME GmbH",
///     "DE89370400440532013000",
///     "COBADEFFXXX",
///     "DE98ZZZ09999999999",
///     SequenceType::Recurring,
/// )
/// .created_at(created)
/// .collection_date(NaiveDate::from_ymd_opt(2024, 6, 20).unwrap())
/// .build_with(&mut SequenceIdGenerator::new("ACME-"))
/// .unwrap();
///
/// assert_eq!(doc.stored_envelope().group_header.message_id, "ACME-0001");
/// assert_eq!(doc.stored_envelope().payment_information.payment_information_id, "ACME-0002");
/// ```
pub struct DocumentBuilder {
    creditor_name: String,
    creditor_iban: String,
    creditor_bic: String,
    creditor_id: String,
    sequence_type: SequenceType,
    initiating_party: Option<String>,
    message_id: Option<String>,
    payment_information_id: Option<String>,
    created: Option<NaiveDateTime>,
    collection_date: Option<NaiveDate>,
    batch_booking: bool,
    config: DocumentConfig,
}

impl DocumentBuilder {
    pub fn new(
        creditor_name: impl Into<String>,
        creditor_iban: impl Into<String>,
        creditor_bic: impl Into<String>,
        creditor_id: impl Into<String>,
        sequence_type: SequenceType,
    ) -> Self {
        Self {
            creditor_name: creditor_name.into(),
            creditor_iban: creditor_iban.into(),
            creditor_bic: creditor_bic.into(),
            creditor_id: creditor_id.into(),
            sequence_type,
            initiating_party: None,
            message_id: None,
            payment_information_id: None,
            created: None,
            collection_date: None,
            batch_booking: false,
            config: DocumentConfig::default(),
        }
    }

    /// Initiating party name; defaults to the creditor name.
    pub fn initiating_party(mut self, name: impl Into<String>) -> Self {
        self.initiating_party = Some(name.into());
        self
    }

    /// Fixed MsgId instead of a generated one.
    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    /// Fixed PmtInfId instead of a generated one.
    pub fn payment_information_id(mut self, id: impl Into<String>) -> Self {
        self.payment_information_id = Some(id.into());
        self
    }

    /// Creation time; defaults to the local time at build.
    pub fn created_at(mut self, created: NaiveDateTime) -> Self {
        self.created = Some(created);
        self
    }

    /// Requested collection date; defaults to today plus the configured lead days.
    pub fn collection_date(mut self, date: NaiveDate) -> Self {
        self.collection_date = Some(date);
        self
    }

    pub fn batch_booking(mut self, enabled: bool) -> Self {
        self.batch_booking = enabled;
        self
    }

    pub fn config(mut self, config: DocumentConfig) -> Self {
        self.config = config;
        self
    }

    /// Build with time-derived identifiers.
    pub fn build(self) -> Result<Document, LastschriftError> {
        self.build_with(&mut FileTimeIdGenerator::new())
    }

    /// Build, drawing MsgId and PmtInfId from `ids` unless set explicitly.
    pub fn build_with(self, ids: &mut dyn IdGenerator) -> Result<Document, LastschriftError> {
        for (field, value) in [
            ("creditor name", &self.creditor_name),
            ("creditor IBAN", &self.creditor_iban),
            ("creditor BIC", &self.creditor_bic),
            ("creditor scheme id", &self.creditor_id),
        ] {
            if value.trim().is_empty() {
                return Err(LastschriftError::Builder(format!("{field} is required")));
            }
        }

        let message_id = self.message_id.unwrap_or_else(|| ids.next_id());
        let payment_information_id = self
            .payment_information_id
            .unwrap_or_else(|| ids.next_id());

        let created = self.created.unwrap_or_else(|| Local::now().naive_local());
        let collection_date = match self.collection_date {
            Some(date) => date,
            None => Local::now()
                .date_naive()
                .checked_add_days(Days::new(u64::from(self.config.collection_lead_days)))
                .ok_or_else(|| {
                    LastschriftError::Builder("collection date out of range".into())
                })?,
        };

        let mut group_header = GroupHeader::new(message_id, created);
        group_header.initiating_party_mut().name =
            Some(self.initiating_party.unwrap_or_else(|| self.creditor_name.clone()));

        let mut batch = PaymentInformation::new(payment_information_id, collection_date);
        batch.batch_booking = self.batch_booking;
        batch.payment_type_information_mut().sequence_type = self.sequence_type;
        batch.creditor_mut().name = Some(self.creditor_name);
        batch.creditor_account_mut().id_mut().iban = Some(self.creditor_iban);
        batch
            .creditor_agent_mut()
            .financial_institution_mut()
            .bic = Some(self.creditor_bic);
        batch.set_creditor_scheme_identification(Some(CreditorSchemeIdentification::new(
            self.creditor_id,
        )));

        Ok(Document {
            config: self.config,
            envelope: CustomerDirectDebitInitiation {
                group_header,
                payment_information: batch,
            },
        })
    }
}

/// Document: the root of a pain.008.001.02 message.
///
/// Totals in the group header and batch are derived data. They are recomputed
/// from the live transaction list by [`Document::refresh_aggregates`], which
/// every serialization path runs before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    config: DocumentConfig,
    envelope: CustomerDirectDebitInitiation,
}

impl Document {
    /// Create a document with time-derived identifiers and default dates.
    pub fn new(
        creditor_name: impl Into<String>,
        creditor_iban: impl Into<String>,
        creditor_bic: impl Into<String>,
        creditor_id: impl Into<String>,
        sequence_type: SequenceType,
    ) -> Result<Self, LastschriftError> {
        DocumentBuilder::new(
            creditor_name,
            creditor_iban,
            creditor_bic,
            creditor_id,
            sequence_type,
        )
        .build()
    }

    /// Append a collection. No deduplication or validation happens here.
    pub fn add_transaction(&mut self, transaction: DirectDebitTransactionInformation) {
        self.envelope.payment_information.push_transaction(transaction);
    }

    pub fn transactions(&self) -> &[DirectDebitTransactionInformation] {
        self.envelope.payment_information.transactions()
    }

    /// Recompute count and control sum at header and batch level.
    ///
    /// On overflow the stored totals are left as they were.
    pub fn refresh_aggregates(&mut self) -> Result<Aggregates, LastschriftError> {
        let aggregates = compute_aggregates(self.envelope.payment_information.transactions())?;

        let header = &mut self.envelope.group_header;
        header.number_of_transactions = aggregates.number_of_transactions;
        header.control_sum = aggregates.control_sum;

        let batch = &mut self.envelope.payment_information;
        batch.number_of_transactions = aggregates.number_of_transactions;
        batch.control_sum = aggregates.control_sum;

        debug!(
            message_id = %self.envelope.group_header.message_id,
            transactions = aggregates.number_of_transactions,
            control_sum = %aggregates.control_sum,
            "refreshed aggregates"
        );
        Ok(aggregates)
    }

    /// CstmrDrctDbtInitn with freshly computed totals.
    pub fn envelope(&mut self) -> Result<&CustomerDirectDebitInitiation, LastschriftError> {
        self.refresh_aggregates()?;
        Ok(&self.envelope)
    }

    /// CstmrDrctDbtInitn as stored; totals reflect the last refresh.
    pub fn stored_envelope(&self) -> &CustomerDirectDebitInitiation {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut CustomerDirectDebitInitiation {
        &mut self.envelope
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn schema_location(&self) -> &str {
        &self.config.schema_location
    }

    pub fn set_schema_location(&mut self, location: impl Into<String>) {
        self.config.schema_location = location.into();
    }
}
