//! Core direct debit types, aggregates, validation, and identifier generation.
//!
//! This module holds the pain.008.001.02 entity graph. Optional parts of the
//! graph are materialized on first mutable access; rendering lives in
//! [`crate::pain008`].

#[macro_use]
mod lazy;

mod batch;
mod document;
mod error;
mod normalize;
mod numbering;
mod transaction;
mod types;
mod validation;

pub use batch::*;
pub use document::*;
pub use error::*;
pub use normalize::fold_umlauts;
pub use numbering::*;
pub use transaction::*;
pub use types::*;
pub use validation::*;
