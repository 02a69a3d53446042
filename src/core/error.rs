use std::fmt;

use thiserror::Error;

/// Errors raised while building or writing a direct debit document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LastschriftError {
    /// Strict validation found problems; all findings are kept.
    #[error("document failed validation: {}", join_findings(.0))]
    Validation(Vec<ValidationError>),

    /// Missing creditor identity or an unparsable input value.
    #[error("cannot build document: {0}")]
    Builder(String),

    /// Totals cannot be computed, e.g. the control sum overflows.
    #[error("arithmetic error: {0}")]
    Arithmetic(String),

    /// Text that XML cannot carry, or output that is not usable as text.
    #[error("XML error: {0}")]
    Xml(String),

    /// The output sink could not be opened, written or flushed.
    #[error("cannot write document: {0}")]
    Io(#[from] std::io::Error),
}

fn join_findings(findings: &[ValidationError]) -> String {
    findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// One finding of [`validate_document`](super::validate_document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path of the offending value, e.g. "transactions[2].debtor_account.iban".
    pub field: String,
    pub message: String,
    /// Rule id such as "DD-07".
    pub rule: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            rule: Some(rule.into()),
            ..Self::new(field, message)
        }
    }

    /// Index of the transaction this finding belongs to, if any.
    pub fn transaction_index(&self) -> Option<usize> {
        let rest = self.field.strip_prefix("transactions[")?;
        rest[..rest.find(']')?].parse().ok()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            Some(rule) => write!(f, "[{rule}] {}: {}", self.field, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_and_without_rule() {
        let plain = ValidationError::new("debtor.name", "missing");
        assert_eq!(plain.to_string(), "debtor.name: missing");
        let ruled = ValidationError::with_rule("debtor.name", "missing", "DD-06");
        assert_eq!(ruled.to_string(), "[DD-06] debtor.name: missing");
    }

    #[test]
    fn transaction_index_from_field_path() {
        let e = ValidationError::new("transactions[12].debtor.name", "missing");
        assert_eq!(e.transaction_index(), Some(12));
        assert_eq!(ValidationError::new("transactions", "empty").transaction_index(), None);
        assert_eq!(ValidationError::new("creditor_account.iban", "x").transaction_index(), None);
    }

    #[test]
    fn validation_error_lists_all_findings() {
        let err = LastschriftError::Validation(vec![
            ValidationError::with_rule("transactions", "empty", "DD-01"),
            ValidationError::with_rule("creditor_scheme_identification", "missing", "DD-09"),
        ]);
        assert_eq!(
            err.to_string(),
            "document failed validation: [DD-01] transactions: empty; \
             [DD-09] creditor_scheme_identification: missing"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: LastschriftError = std::io::Error::other("disk full").into();
        assert!(matches!(err, LastschriftError::Io(_)));
        assert_eq!(err.to_string(), "cannot write document: disk full");
    }
}
