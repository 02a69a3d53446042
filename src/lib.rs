//! # lastschrift
//!
//! SEPA direct debit initiation messages (ISO 20022 pain.008.001.02) for the
//! core scheme: a typed document model and its XML rendering.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! Transaction count and control sum are derived from the transaction list
//! every time a document is serialized.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lastschrift::core::*;
//! use rust_decimal_macros::dec;
//!
//! let mut doc = Document::new(
//!     "ACME GmbH",
//!     "DE89370400440532013000",
//!     "COBADEFFXXX",
//!     "DE98ZZZ09999999999",
//!     SequenceType::Recurring,
//! )
//! .unwrap();
//!
//! doc.add_transaction(
//!     TransactionBuilder::new(
//!         "Jürgen Weiß",
//!         "DE02120300000000202051",
//!         "BYLADEM1001",
//!         "MANDATE-0001",
//!         dec!(49.90),
//!         NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!     )
//!     .remittance("Mitgliedsbeitrag 2024")
//!     .build(),
//! );
//!
//! assert!(validate_document(&doc).is_empty());
//! assert_eq!(doc.refresh_aggregates().unwrap().control_sum, dec!(49.90));
//!
//! # #[cfg(feature = "pain008")]
//! # {
//! let xml = doc.to_xml().unwrap();
//! assert!(xml.contains("<Nm>Juergen Weiss</Nm>"));
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Document model, aggregates, validation, id generation |
//! | `pain008` (default) | pain.008.001.02 XML generation |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "pain008")]
pub mod pain008;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
