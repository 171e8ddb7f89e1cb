//! Row transformation: one raw row + mapping definition -> one canonical record.
//!
//! The transformer owns the NULL policy and the dynamic-attribute packing. It performs no I/O
//! and has no side effects; per-file bookkeeping lives in [`crate::processor`].

use crate::error::{RowError, RowErrorKind};
use crate::mapping::MappingDefinition;
use crate::reader::RawRow;
use crate::types::{Attribute, CanonicalRecord, MAX_ATTRIBUTES};

/// The set of raw values recognized as NULL.
///
/// Matching is against the trimmed value, exact (case-sensitive). A matching value becomes NULL
/// for fixed fields and an omission for dynamic attributes.
#[derive(Debug, Clone)]
pub struct NullTokens {
    tokens: Vec<String>,
}

impl Default for NullTokens {
    fn default() -> Self {
        Self::new(["", "NULL", "null", "N/A", "n/a", "NA", "na"])
    }
}

impl NullTokens {
    /// Build a custom token set.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a trimmed raw value should be treated as NULL.
    pub fn is_null(&self, trimmed: &str) -> bool {
        self.tokens.iter().any(|t| t == trimmed)
    }
}

/// Converts raw rows into [`CanonicalRecord`]s under a given NULL policy.
#[derive(Debug, Clone, Default)]
pub struct RowTransformer {
    null_tokens: NullTokens,
}

impl RowTransformer {
    /// Transformer with the default NULL-token set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transformer with a caller-provided NULL-token set.
    pub fn with_null_tokens(null_tokens: NullTokens) -> Self {
        Self { null_tokens }
    }

    /// Transform one raw row.
    ///
    /// - Mapped columns present in the row are trimmed and assigned; absent columns leave the
    ///   canonical field NULL (not a row error; missing columns are logged once per file).
    /// - Attribute headers present with a non-NULL value append a `{Key, Value}` pair in the
    ///   mapping definition's order; absent or NULL values are omitted, keeping attributes sparse.
    /// - More than [`MAX_ATTRIBUTES`] emitted pairs rejects the row.
    ///
    /// `row_number` is only used for error reporting (1-based, header is row 1).
    pub fn transform(
        &self,
        row_number: usize,
        raw_row: &RawRow,
        mapping: &MappingDefinition,
        source_filename: &str,
    ) -> Result<CanonicalRecord, RowError> {
        let mut record = CanonicalRecord {
            data_source: Some(mapping.data_source.clone()),
            source_file: source_filename.to_string(),
            ..CanonicalRecord::default()
        };

        for (raw_header, field) in &mapping.columns {
            let Some(raw) = raw_row.get(raw_header) else {
                continue;
            };
            let trimmed = raw.trim();
            *record.slot_mut(*field) = if self.null_tokens.is_null(trimmed) {
                None
            } else {
                Some(trimmed.to_string())
            };
        }

        for (raw_header, key) in &mapping.attributes {
            let Some(raw) = raw_row.get(raw_header) else {
                continue;
            };
            let trimmed = raw.trim();
            if self.null_tokens.is_null(trimmed) {
                continue;
            }
            record.attributes.push(Attribute {
                key: key.clone(),
                value: trimmed.to_string(),
            });
        }

        if record.attributes.len() > MAX_ATTRIBUTES {
            return Err(RowError {
                row: row_number,
                kind: RowErrorKind::AttributeLimitExceeded,
                message: format!(
                    "{} attributes exceeds the limit of {MAX_ATTRIBUTES}",
                    record.attributes.len()
                ),
            });
        }

        Ok(record)
    }
}
