//! pain.008.001.02 XML generation.
//!
//! Every entry point recomputes the document's aggregates before writing, so
//! NbOfTxs and CtrlSum always match the transactions at the time of output.
//!
//! # Example
//!
//! ```no_run
//! use lastschrift::core::*;
//!
//! let mut doc: Document = todo!(); // build via DocumentBuilder
//! let xml = doc.to_xml().unwrap();
//! doc.write_file("lastschrift.xml").unwrap();
//! ```

mod render;
pub mod schema;
pub(crate) mod xml_utils;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::core::{Document, LastschriftError};

pub use render::render;
pub use xml_utils::format_decimal;

impl Document {
    /// Refresh aggregates and write the XML into `sink`, returning it flushed.
    pub fn write_to<W: Write>(&mut self, sink: W) -> Result<W, LastschriftError> {
        let aggregates = self.refresh_aggregates()?;
        let mut sink = render(self.stored_envelope(), self.config(), sink)?;
        sink.flush()?;
        debug!(
            message_id = %self.stored_envelope().group_header.message_id,
            transactions = aggregates.number_of_transactions,
            "rendered pain.008 document"
        );
        Ok(sink)
    }

    /// Refresh aggregates and return the XML as UTF-8 bytes (no BOM).
    pub fn to_xml_bytes(&mut self) -> Result<Vec<u8>, LastschriftError> {
        let bytes = self.write_to(Vec::new())?;
        debug!(bytes = bytes.len(), "serialized document");
        Ok(bytes)
    }

    /// Refresh aggregates and return the XML as a string.
    pub fn to_xml(&mut self) -> Result<String, LastschriftError> {
        let bytes = self.to_xml_bytes()?;
        String::from_utf8(bytes).map_err(|e| LastschriftError::Xml(format!("UTF-8 error: {e}")))
    }

    /// Refresh aggregates and write the XML to a file, creating or truncating it.
    ///
    /// The file handle is released on every return path; the buffered
    /// contents are flushed before `Ok` is returned.
    pub fn write_file(&mut self, path: impl AsRef<Path>) -> Result<(), LastschriftError> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let writer = self.write_to(BufWriter::new(file))?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        debug!(path = %path.display(), "wrote document file");
        Ok(())
    }
}
