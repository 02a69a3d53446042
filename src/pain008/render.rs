use std::borrow::Cow;
use std::io::Write;

use super::schema;
use super::xml_utils::{XmlWriter, format_decimal};
use crate::core::*;

type WriteResult = Result<(), LastschriftError>;

/// Read a lazily materialized container the way the serializer sees it:
/// untouched mandatory parts are written from their default value.
fn or_default<T: Clone + Default>(value: Option<&T>) -> Cow<'_, T> {
    value.map_or_else(|| Cow::Owned(T::default()), Cow::Borrowed)
}

/// Render a complete document into `sink`, returning the sink.
///
/// Aggregates are written as stored; callers refresh them first.
pub fn render<W: Write>(
    envelope: &CustomerDirectDebitInitiation,
    config: &DocumentConfig,
    sink: W,
) -> Result<W, LastschriftError> {
    let mut w = XmlWriter::new(sink, config.indent_size)?;

    w.start_element_with_attrs(
        schema::DOCUMENT,
        &[
            ("xmlns:xsi", schema::XSI_NAMESPACE),
            ("xsi:schemaLocation", config.schema_location.as_str()),
            ("xmlns", PAIN_008_NAMESPACE),
        ],
    )?;
    w.start_element(schema::CSTMR_DRCT_DBT_INITN)?;
    write_group_header(&mut w, &envelope.group_header)?;
    write_payment_information(&mut w, &envelope.payment_information)?;
    w.end_element(schema::CSTMR_DRCT_DBT_INITN)?;
    w.end_element(schema::DOCUMENT)?;

    Ok(w.into_inner())
}

fn write_group_header<W: Write>(w: &mut XmlWriter<W>, header: &GroupHeader) -> WriteResult {
    w.start_element("GrpHdr")?;
    w.text_element("MsgId", &header.message_id)?;
    w.text_element("CreDtTm", &header.creation_date_time_string())?;
    w.text_element("NbOfTxs", &header.number_of_transactions.to_string())?;
    w.text_element("CtrlSum", &format_decimal(header.control_sum))?;
    let party = or_default(header.initiating_party());
    write_named_party(w, "InitgPty", party.name.as_deref())?;
    w.end_element("GrpHdr")?;
    Ok(())
}

fn write_payment_information<W: Write>(
    w: &mut XmlWriter<W>,
    batch: &PaymentInformation,
) -> WriteResult {
    w.start_element("PmtInf")?;
    w.text_element("PmtInfId", &batch.payment_information_id)?;
    w.text_element("PmtMtd", &batch.payment_method)?;
    w.bool_element("BtchBookg", batch.batch_booking)?;
    w.text_element("NbOfTxs", &batch.number_of_transactions.to_string())?;
    w.text_element("CtrlSum", &format_decimal(batch.control_sum))?;

    write_payment_type(w, &or_default(batch.payment_type_information()))?;
    w.text_element("ReqdColltnDt", &batch.requested_collection_date.to_string())?;

    let creditor = or_default(batch.creditor());
    write_named_party(w, "Cdtr", creditor.name.as_deref())?;
    write_account(w, "CdtrAcct", &or_default(batch.creditor_account()))?;
    write_agent(w, "CdtrAgt", &or_default(batch.creditor_agent()))?;
    w.text_element("ChrgBr", &batch.charge_bearer)?;

    let scheme = or_default(batch.creditor_scheme_identification());
    w.start_element("CdtrSchmeId")?;
    write_identification(w, &or_default(scheme.id()))?;
    w.end_element("CdtrSchmeId")?;

    for tx in batch.transactions() {
        write_transaction(w, tx)?;
    }

    w.end_element("PmtInf")?;
    Ok(())
}

fn write_payment_type<W: Write>(w: &mut XmlWriter<W>, info: &PaymentTypeInformation) -> WriteResult {
    w.start_element("PmtTpInf")?;
    w.start_element("SvcLvl")?;
    w.text_element("Cd", &or_default(info.service_level()).code)?;
    w.end_element("SvcLvl")?;
    w.start_element("LclInstrm")?;
    w.text_element("Cd", &or_default(info.local_instrument()).code)?;
    w.end_element("LclInstrm")?;
    w.text_element("SeqTp", info.sequence_type.code())?;
    w.end_element("PmtTpInf")?;
    Ok(())
}

fn write_transaction<W: Write>(
    w: &mut XmlWriter<W>,
    tx: &DirectDebitTransactionInformation,
) -> WriteResult {
    w.start_element("DrctDbtTxInf")?;

    w.start_element("PmtId")?;
    w.text_element(
        "EndToEndId",
        &or_default(tx.payment_identification()).end_to_end_id,
    )?;
    w.end_element("PmtId")?;

    let amount = or_default(tx.instructed_amount());
    w.amount_element("InstdAmt", amount.value, &amount.currency)?;

    let debit = or_default(tx.direct_debit_transaction());
    w.start_element("DrctDbtTx")?;
    write_mandate(w, &or_default(debit.mandate_related_information()))?;
    w.end_element("DrctDbtTx")?;

    write_agent(w, "DbtrAgt", &or_default(tx.debtor_agent()))?;
    let debtor = or_default(tx.debtor());
    write_named_party(w, "Dbtr", debtor.name())?;
    write_account(w, "DbtrAcct", &or_default(tx.debtor_account()))?;

    if let Some(ultimate) = tx.ultimate_debtor() {
        write_named_party(w, "UltmtDbtr", ultimate.name.as_deref())?;
    }
    if let Some(remittance) = tx.remittance_information() {
        match remittance.unstructured.as_deref() {
            Some(text) => {
                w.start_element("RmtInf")?;
                w.text_element("Ustrd", text)?;
                w.end_element("RmtInf")?;
            }
            None => {
                w.empty_element("RmtInf")?;
            }
        }
    }

    w.end_element("DrctDbtTxInf")?;
    Ok(())
}

fn write_mandate<W: Write>(w: &mut XmlWriter<W>, mandate: &MandateRelatedInformation) -> WriteResult {
    w.start_element("MndtRltdInf")?;
    w.optional_text_element("MndtId", mandate.mandate_id.as_deref())?;
    if let Some(signed) = mandate.date_of_signature {
        w.text_element("DtOfSgntr", &signed.to_string())?;
    }
    w.bool_element("AmdmntInd", mandate.amendment_indicator)?;
    if mandate.amendment_indicator {
        let details = or_default(mandate.amendment_details());
        let original = or_default(details.original_creditor_scheme_id());
        w.start_element("AmdmntInfDtls")?;
        w.start_element("OrgnlCdtrSchmeId")?;
        w.optional_text_element("Nm", original.name.as_deref())?;
        write_identification(w, &or_default(original.id()))?;
        w.end_element("OrgnlCdtrSchmeId")?;
        w.end_element("AmdmntInfDtls")?;
    }
    w.end_element("MndtRltdInf")?;
    Ok(())
}

/// `<tag><Nm>..</Nm></tag>`, or `<tag/>` without a name.
fn write_named_party<W: Write>(w: &mut XmlWriter<W>, tag: &str, name: Option<&str>) -> WriteResult {
    match name {
        Some(name) => {
            w.start_element(tag)?;
            w.text_element("Nm", name)?;
            w.end_element(tag)?;
        }
        None => {
            w.empty_element(tag)?;
        }
    }
    Ok(())
}

fn write_account<W: Write>(w: &mut XmlWriter<W>, tag: &str, account: &CashAccount) -> WriteResult {
    w.start_element(tag)?;
    write_identification(w, &or_default(account.id()))?;
    w.end_element(tag)?;
    Ok(())
}

fn write_agent<W: Write>(w: &mut XmlWriter<W>, tag: &str, agent: &Agent) -> WriteResult {
    w.start_element(tag)?;
    let institution = or_default(agent.financial_institution());
    match institution.bic.as_deref() {
        Some(bic) => {
            w.start_element("FinInstnId")?;
            w.text_element("BIC", bic)?;
            w.end_element("FinInstnId")?;
        }
        None => {
            w.empty_element("FinInstnId")?;
        }
    }
    w.end_element(tag)?;
    Ok(())
}

/// `Id` holds the IBAN when one is set, otherwise the private identification.
fn write_identification<W: Write>(w: &mut XmlWriter<W>, id: &Identification) -> WriteResult {
    w.start_element("Id")?;
    if let Some(iban) = id.iban_value() {
        w.text_element("IBAN", iban)?;
    } else {
        let private = or_default(id.private_identification());
        let other = or_default(private.other());
        w.start_element("PrvtId")?;
        w.start_element("Othr")?;
        w.optional_text_element("Id", other.id.as_deref())?;
        w.start_element("SchmeNm")?;
        w.text_element("Prtry", &other.scheme_name.proprietary)?;
        w.end_element("SchmeNm")?;
        w.end_element("Othr")?;
        w.end_element("PrvtId")?;
    }
    w.end_element("Id")?;
    Ok(())
}
