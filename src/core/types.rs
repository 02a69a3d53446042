use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::normalize::fold_umlauts;

/// Service level code used for all SEPA direct debits (SvcLvl/Cd).
pub const SERVICE_LEVEL_SEPA: &str = "SEPA";
/// Local instrument code of the core scheme (LclInstrm/Cd).
pub const LOCAL_INSTRUMENT_CORE: &str = "CORE";
/// Proprietary scheme name of a SEPA creditor identifier (SchmeNm/Prtry).
pub const SCHEME_NAME_SEPA: &str = "SEPA";
/// Placeholder end-to-end reference when the creditor provides none.
pub const NOT_PROVIDED: &str = "NOTPROVIDED";
/// Default instructed currency.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// InitgPty: the party initiating the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiatingParty {
    /// Nm
    pub name: Option<String>,
}

/// Cdtr: the creditor collecting the debits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creditor {
    /// Nm
    pub name: Option<String>,
}

/// UltmtDbtr: the party ultimately owing the amount, if not the debtor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UltimateDebtor {
    /// Nm
    pub name: Option<String>,
}

/// Dbtr: the account holder being debited.
///
/// The name is folded through [`fold_umlauts`] on every write, including
/// deserialization, so a stored name never contains umlauts or ß.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debtor {
    #[serde(default, deserialize_with = "deserialize_folded")]
    name: Option<String>,
}

impl Debtor {
    pub fn new(name: impl AsRef<str>) -> Self {
        let mut debtor = Self::default();
        debtor.set_name(name);
        debtor
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl AsRef<str>) {
        self.name = Some(fold_umlauts(name.as_ref()));
    }

    pub fn clear_name(&mut self) {
        self.name = None;
    }
}

fn deserialize_folded<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.map(|name| fold_umlauts(&name)))
}

/// RmtInf: free-text remittance information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemittanceInformation {
    /// Ustrd
    pub unstructured: Option<String>,
}

/// SvcLvl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceLevel {
    /// Cd
    pub code: String,
}

impl Default for ServiceLevel {
    fn default() -> Self {
        Self {
            code: SERVICE_LEVEL_SEPA.into(),
        }
    }
}

/// LclInstrm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalInstrument {
    /// Cd
    pub code: String,
}

impl Default for LocalInstrument {
    fn default() -> Self {
        Self {
            code: LOCAL_INSTRUMENT_CORE.into(),
        }
    }
}

/// SeqTp: position of a collection within its mandate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceType {
    /// FRST: first collection of a recurring mandate.
    #[default]
    #[serde(rename = "FRST")]
    First,
    /// RCUR: follow-up collection.
    #[serde(rename = "RCUR")]
    Recurring,
    /// OOFF: one-off collection.
    #[serde(rename = "OOFF")]
    OneOff,
    /// FNAL: last collection, the mandate expires afterwards.
    #[serde(rename = "FNAL")]
    Final,
}

impl SequenceType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::First => "FRST",
            Self::Recurring => "RCUR",
            Self::OneOff => "OOFF",
            Self::Final => "FNAL",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FRST" => Some(Self::First),
            "RCUR" => Some(Self::Recurring),
            "OOFF" => Some(Self::OneOff),
            "FNAL" => Some(Self::Final),
            _ => None,
        }
    }
}

/// PmtTpInf: service level, local instrument and sequence type of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypeInformation {
    service_level: Option<ServiceLevel>,
    local_instrument: Option<LocalInstrument>,
    /// SeqTp
    pub sequence_type: SequenceType,
}

impl PaymentTypeInformation {
    pub fn new(sequence_type: SequenceType) -> Self {
        Self {
            sequence_type,
            ..Self::default()
        }
    }

    lazy_field!(
        /// SvcLvl
        service_level, service_level_mut, set_service_level: ServiceLevel
    );

    lazy_field!(
        /// LclInstrm
        local_instrument, local_instrument_mut, set_local_instrument: LocalInstrument
    );
}

/// SchmeNm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeName {
    /// Prtry
    pub proprietary: String,
}

impl Default for SchemeName {
    fn default() -> Self {
        Self {
            proprietary: SCHEME_NAME_SEPA.into(),
        }
    }
}

/// Othr: an identifier under a proprietary scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherIdentification {
    /// Id
    pub id: Option<String>,
    /// SchmeNm
    pub scheme_name: SchemeName,
}

/// PrvtId
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateIdentification {
    other: Option<OtherIdentification>,
}

impl PrivateIdentification {
    pub fn new(id: impl Into<String>) -> Self {
        let mut private = Self::default();
        private.other_mut().id = Some(id.into());
        private
    }

    lazy_field!(
        /// Othr
        other, other_mut, set_other: OtherIdentification
    );
}

/// Id: either an IBAN or a private identification, never both.
///
/// The private form is only visible while the IBAN is absent or blank. The
/// gate is evaluated on every read, so assigning an IBAN hides a previously
/// built private identification and clearing it again reveals the same
/// instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    /// IBAN
    pub iban: Option<String>,
    private_identification: Option<PrivateIdentification>,
}

impl Identification {
    /// Account identification by IBAN.
    pub fn iban(iban: impl Into<String>) -> Self {
        Self {
            iban: Some(iban.into()),
            private_identification: None,
        }
    }

    /// Party identification by an opaque id under the SEPA scheme.
    pub fn private(id: impl Into<String>) -> Self {
        Self {
            iban: None,
            private_identification: Some(PrivateIdentification::new(id)),
        }
    }

    /// True when a non-blank IBAN is set.
    pub fn has_iban(&self) -> bool {
        self.iban.as_deref().is_some_and(|iban| !iban.trim().is_empty())
    }

    /// The IBAN, if one is set and not blank.
    pub fn iban_value(&self) -> Option<&str> {
        self.iban.as_deref().filter(|iban| !iban.trim().is_empty())
    }

    /// PrvtId, visible only while no IBAN is set.
    pub fn private_identification(&self) -> Option<&PrivateIdentification> {
        if self.has_iban() {
            None
        } else {
            self.private_identification.as_ref()
        }
    }

    /// Mutable PrvtId, created on first use. `None` while an IBAN is set.
    pub fn private_identification_mut(&mut self) -> Option<&mut PrivateIdentification> {
        if self.has_iban() {
            None
        } else {
            Some(
                self.private_identification
                    .get_or_insert_with(PrivateIdentification::default),
            )
        }
    }

    pub fn set_private_identification(&mut self, value: Option<PrivateIdentification>) {
        self.private_identification = value;
    }
}

/// CdtrAcct / DbtrAcct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashAccount {
    id: Option<Identification>,
}

pub type CreditorAccount = CashAccount;
pub type DebtorAccount = CashAccount;

impl CashAccount {
    pub fn with_iban(iban: impl Into<String>) -> Self {
        Self {
            id: Some(Identification::iban(iban)),
        }
    }

    lazy_field!(
        /// Id
        id, id_mut, set_id: Identification
    );
}

/// FinInstnId
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialInstitutionIdentification {
    /// BIC
    pub bic: Option<String>,
}

/// CdtrAgt / DbtrAgt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    financial_institution: Option<FinancialInstitutionIdentification>,
}

pub type CreditorAgent = Agent;
pub type DebtorAgent = Agent;

impl Agent {
    pub fn with_bic(bic: impl Into<String>) -> Self {
        Self {
            financial_institution: Some(FinancialInstitutionIdentification {
                bic: Some(bic.into()),
            }),
        }
    }

    lazy_field!(
        /// FinInstnId
        financial_institution,
        financial_institution_mut,
        set_financial_institution: FinancialInstitutionIdentification
    );
}

/// CdtrSchmeId: the creditor identifier issued by the national bank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditorSchemeIdentification {
    id: Option<Identification>,
}

impl CreditorSchemeIdentification {
    /// Creditor identifier such as "DE98ZZZ09999999999".
    pub fn new(creditor_id: impl Into<String>) -> Self {
        Self {
            id: Some(Identification::private(creditor_id)),
        }
    }

    lazy_field!(
        /// Id
        id, id_mut, set_id: Identification
    );
}

/// PmtId
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIdentification {
    /// EndToEndId
    pub end_to_end_id: String,
}

impl Default for PaymentIdentification {
    fn default() -> Self {
        Self {
            end_to_end_id: NOT_PROVIDED.into(),
        }
    }
}

/// InstdAmt: amount with its currency attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructedAmount {
    /// Ccy attribute.
    pub currency: String,
    pub value: Decimal,
}

impl InstructedAmount {
    pub fn eur(value: Decimal) -> Self {
        Self {
            currency: DEFAULT_CURRENCY.into(),
            value,
        }
    }
}

impl Default for InstructedAmount {
    fn default() -> Self {
        Self::eur(Decimal::ZERO)
    }
}

/// OrgnlCdtrSchmeId: creditor identity before a mandate amendment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginalCreditorSchemeIdentification {
    /// Nm
    pub name: Option<String>,
    id: Option<Identification>,
}

impl OriginalCreditorSchemeIdentification {
    lazy_field!(
        /// Id
        id, id_mut, set_id: Identification
    );
}

/// AmdmntInfDtls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmendmentInformationDetails {
    original_creditor_scheme_id: Option<OriginalCreditorSchemeIdentification>,
}

impl AmendmentInformationDetails {
    lazy_field!(
        /// OrgnlCdtrSchmeId
        original_creditor_scheme_id,
        original_creditor_scheme_id_mut,
        set_original_creditor_scheme_id: OriginalCreditorSchemeIdentification
    );
}

/// MndtRltdInf: the mandate a collection is based on.
///
/// Amendment details are only visible while `amendment_indicator` is true.
/// Toggling the indicator off keeps stored details hidden rather than
/// discarding them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandateRelatedInformation {
    /// MndtId
    pub mandate_id: Option<String>,
    /// DtOfSgntr
    pub date_of_signature: Option<NaiveDate>,
    /// AmdmntInd
    pub amendment_indicator: bool,
    amendment_details: Option<AmendmentInformationDetails>,
}

impl MandateRelatedInformation {
    /// AmdmntInfDtls, visible only while the amendment indicator is set.
    pub fn amendment_details(&self) -> Option<&AmendmentInformationDetails> {
        if self.amendment_indicator {
            self.amendment_details.as_ref()
        } else {
            None
        }
    }

    /// Mutable AmdmntInfDtls, created on first use. `None` while the
    /// amendment indicator is false.
    pub fn amendment_details_mut(&mut self) -> Option<&mut AmendmentInformationDetails> {
        if self.amendment_indicator {
            Some(
                self.amendment_details
                    .get_or_insert_with(AmendmentInformationDetails::default),
            )
        } else {
            None
        }
    }

    pub fn set_amendment_details(&mut self, value: Option<AmendmentInformationDetails>) {
        self.amendment_details = value;
    }
}

/// DrctDbtTx
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectDebitTransaction {
    mandate_related_information: Option<MandateRelatedInformation>,
}

impl DirectDebitTransaction {
    lazy_field!(
        /// MndtRltdInf
        mandate_related_information,
        mandate_related_information_mut,
        set_mandate_related_information: MandateRelatedInformation
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containers_materialize_on_first_mutable_access() {
        let mut info = PaymentTypeInformation::default();
        assert!(info.service_level().is_none());
        assert_eq!(info.service_level_mut().code, "SEPA");
        assert!(info.service_level().is_some());
        assert_eq!(info.local_instrument_mut().code, "CORE");
    }

    #[test]
    fn setter_replaces_and_resets() {
        let mut agent = Agent::default();
        agent.financial_institution_mut().bic = Some("AAAADEFF".into());
        agent.set_financial_institution(None);
        assert!(agent.financial_institution().is_none());
        assert!(agent.financial_institution_mut().bic.is_none());
    }

    #[test]
    fn private_identification_gated_on_blank_iban() {
        let mut id = Identification::default();
        id.private_identification_mut()
            .unwrap()
            .other_mut()
            .id = Some("DE98ZZZ09999999999".into());
        assert!(id.private_identification().is_some());

        id.iban = Some("DE89370400440532013000".into());
        assert!(id.private_identification().is_none());
        assert!(id.private_identification_mut().is_none());

        id.iban = Some("   ".into());
        let private = id.private_identification().unwrap();
        assert_eq!(
            private.other().unwrap().id.as_deref(),
            Some("DE98ZZZ09999999999")
        );
    }

    #[test]
    fn amendment_details_retained_but_hidden() {
        let mut mandate = MandateRelatedInformation::default();
        assert!(mandate.amendment_details_mut().is_none());

        mandate.amendment_indicator = true;
        mandate
            .amendment_details_mut()
            .unwrap()
            .original_creditor_scheme_id_mut()
            .name = Some("Alte Firma".into());

        mandate.amendment_indicator = false;
        assert!(mandate.amendment_details().is_none());

        mandate.amendment_indicator = true;
        let details = mandate.amendment_details().unwrap();
        assert_eq!(
            details.original_creditor_scheme_id().unwrap().name.as_deref(),
            Some("Alte Firma")
        );
    }

    #[test]
    fn debtor_name_folded_on_set() {
        let mut debtor = Debtor::new("Müller Straße");
        assert_eq!(debtor.name(), Some("Mueller Strasse"));
        debtor.set_name("Jörg Übel");
        assert_eq!(debtor.name(), Some("Joerg UEbel"));
    }

    #[test]
    fn debtor_name_folded_on_deserialize() {
        let debtor: Debtor = serde_json::from_str(r#"{"name":"Bäcker"}"#).unwrap();
        assert_eq!(debtor.name(), Some("Baecker"));
        let empty: Debtor = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.name(), None);
    }

    #[test]
    fn sequence_type_codes() {
        for seq in [
            SequenceType::First,
            SequenceType::Recurring,
            SequenceType::OneOff,
            SequenceType::Final,
        ] {
            assert_eq!(SequenceType::from_code(seq.code()), Some(seq));
        }
        assert_eq!(SequenceType::from_code("XXXX"), None);
        assert_eq!(
            serde_json::to_string(&SequenceType::Recurring).unwrap(),
            "\"RCUR\""
        );
    }

    #[test]
    fn value_defaults() {
        assert_eq!(PaymentIdentification::default().end_to_end_id, "NOTPROVIDED");
        let amount = InstructedAmount::default();
        assert_eq!(amount.currency, "EUR");
        assert_eq!(amount.value, Decimal::ZERO);
        assert_eq!(OtherIdentification::default().scheme_name.proprietary, "SEPA");
    }
}
