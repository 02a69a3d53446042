use chrono::{DateTime, Utc};

/// 100-ns intervals between 1601-01-01 and 1970-01-01 (UTC).
const FILETIME_UNIX_EPOCH: i64 = 116_444_736_000_000_000;

/// Source of message (MsgId) and batch (PmtInfId) identifiers.
///
/// A document asks its generator once per identifier at construction time;
/// the values are then fixed for the lifetime of the document.
pub trait IdGenerator {
    /// Produce the next identifier.
    fn next_id(&mut self) -> String;
}

impl<F> IdGenerator for F
where
    F: FnMut() -> String,
{
    fn next_id(&mut self) -> String {
        self()
    }
}

/// Time-derived identifiers: the current UTC time as a Windows file time
/// (100-ns ticks since 1601-01-01), e.g. "133529616000000000".
///
/// Identifiers are strictly increasing per generator, even when the clock
/// does not advance between calls.
#[derive(Debug, Clone, Default)]
pub struct FileTimeIdGenerator {
    last: i64,
}

impl FileTimeIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an identifier for the given instant.
    pub fn next_id_at(&mut self, now: DateTime<Utc>) -> String {
        let ticks = FILETIME_UNIX_EPOCH
            + now.timestamp() * 10_000_000
            + i64::from(now.timestamp_subsec_nanos() / 100);
        self.last = if ticks > self.last {
            ticks
        } else {
            self.last + 1
        };
        self.last.to_string()
    }
}

impl IdGenerator for FileTimeIdGenerator {
    fn next_id(&mut self) -> String {
        self.next_id_at(Utc::now())
    }
}

/// Deterministic identifiers in the format `{prefix}{sequential}`,
/// e.g. "LS-0001", "LS-0002".
#[derive(Debug, Clone)]
pub struct SequenceIdGenerator {
    prefix: String,
    next_number: u64,
    zero_pad: usize,
}

impl SequenceIdGenerator {
    /// Create a new sequence starting at 1.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    /// Create a sequence continuing from a given number.
    pub fn starting_at(prefix: impl Into<String>, next_number: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next_number,
            zero_pad: 4,
        }
    }

    /// Set zero-padding width (default: 4, so "0001").
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    /// Preview the next identifier without consuming it.
    pub fn peek(&self) -> String {
        format!(
            "{}{:0>width$}",
            self.prefix,
            self.next_number,
            width = self.zero_pad
        )
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&mut self) -> String {
        let id = self.peek();
        self.next_number += 1;
        id
    }
}
