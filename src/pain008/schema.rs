//! Element names and child order of pain.008.001.02.
//!
//! The renderer writes children in exactly the order listed here; the XSD
//! uses `xs:sequence` throughout, so any other order is schema-invalid.

pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

pub const DOCUMENT: &str = "Document";
pub const CSTMR_DRCT_DBT_INITN: &str = "CstmrDrctDbtInitn";

/// Children of `Document/CstmrDrctDbtInitn`.
pub const INITIATION_CHILDREN: &[&str] = &["GrpHdr", "PmtInf"];

/// Children of `GrpHdr`.
pub const GROUP_HEADER_CHILDREN: &[&str] = &["MsgId", "CreDtTm", "NbOfTxs", "CtrlSum", "InitgPty"];

/// Children of `PmtInf`; `DrctDbtTxInf` repeats once per transaction.
pub const PAYMENT_INFORMATION_CHILDREN: &[&str] = &[
    "PmtInfId",
    "PmtMtd",
    "BtchBookg",
    "NbOfTxs",
    "CtrlSum",
    "PmtTpInf",
    "ReqdColltnDt",
    "Cdtr",
    "CdtrAcct",
    "CdtrAgt",
    "ChrgBr",
    "CdtrSchmeId",
    "DrctDbtTxInf",
];

/// Children of `PmtTpInf`.
pub const PAYMENT_TYPE_CHILDREN: &[&str] = &["SvcLvl", "LclInstrm", "SeqTp"];

/// Children of `DrctDbtTxInf`; `UltmtDbtr` and `RmtInf` are optional.
pub const TRANSACTION_CHILDREN: &[&str] = &[
    "PmtId",
    "InstdAmt",
    "DrctDbtTx",
    "DbtrAgt",
    "Dbtr",
    "DbtrAcct",
    "UltmtDbtr",
    "RmtInf",
];

/// Children of `MndtRltdInf`; `AmdmntInfDtls` only with `AmdmntInd` true.
pub const MANDATE_CHILDREN: &[&str] = &["MndtId", "DtOfSgntr", "AmdmntInd", "AmdmntInfDtls"];
