//! Core data model types.
//!
//! Every successfully transformed row becomes a [`CanonicalRecord`]: a fixed set of nullable
//! warehouse columns plus an ordered list of dynamic [`Attribute`] pairs. The serialized field
//! names are the exact warehouse column names.

use serde::{Deserialize, Serialize};

/// Target-schema cap on the number of dynamic attributes per record.
pub const MAX_ATTRIBUTES: usize = 1000;

/// One dynamic key/value pair carried alongside the fixed columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Canonical attribute key (from the mapping definition).
    #[serde(rename = "Key")]
    pub key: String,
    /// String-coerced value from the source row.
    #[serde(rename = "Value")]
    pub value: String,
}

/// The fixed fields of a [`CanonicalRecord`] that a mapping's `columns` may populate.
///
/// `SourceFile` and `BQInsertedDate` are deliberately not listed: the former is always set from
/// the processed filename, the latter is stamped by the warehouse sink at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixedField {
    Id,
    FirstName,
    LastName,
    Email,
    Mobile,
    PostCode,
    DataSource,
    SourceCreatedDate,
    SourceModifiedDate,
}

impl FixedField {
    /// Parse a canonical field name as written in a mapping file.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Id" => Some(Self::Id),
            "FirstName" => Some(Self::FirstName),
            "LastName" => Some(Self::LastName),
            "Email" => Some(Self::Email),
            "Mobile" => Some(Self::Mobile),
            "PostCode" => Some(Self::PostCode),
            "DataSource" => Some(Self::DataSource),
            "SourceCreatedDate" => Some(Self::SourceCreatedDate),
            "SourceModifiedDate" => Some(Self::SourceModifiedDate),
            _ => None,
        }
    }

    /// The warehouse column name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "Id",
            Self::FirstName => "FirstName",
            Self::LastName => "LastName",
            Self::Email => "Email",
            Self::Mobile => "Mobile",
            Self::PostCode => "PostCode",
            Self::DataSource => "DataSource",
            Self::SourceCreatedDate => "SourceCreatedDate",
            Self::SourceModifiedDate => "SourceModifiedDate",
        }
    }
}

/// The normalized row shape loaded into the warehouse.
///
/// All fixed fields are nullable strings except `source_file`, which is always set. The
/// `BQInsertedDate` column is absent here on purpose: it is stamped by the sink when a sealed
/// batch is loaded (see [`crate::sink::load_row`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    #[serde(rename = "Id")]
    pub id: Option<String>,
    #[serde(rename = "FirstName")]
    pub first_name: Option<String>,
    #[serde(rename = "LastName")]
    pub last_name: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Mobile")]
    pub mobile: Option<String>,
    #[serde(rename = "PostCode")]
    pub post_code: Option<String>,
    #[serde(rename = "DataSource")]
    pub data_source: Option<String>,
    #[serde(rename = "SourceCreatedDate")]
    pub source_created_date: Option<String>,
    #[serde(rename = "SourceModifiedDate")]
    pub source_modified_date: Option<String>,
    /// Name of the source file this record came from. Never null.
    #[serde(rename = "SourceFile")]
    pub source_file: String,
    /// Sparse, ordered dynamic attributes (insertion order follows the mapping definition).
    #[serde(rename = "Attributes")]
    pub attributes: Vec<Attribute>,
}

impl CanonicalRecord {
    /// Mutable access to the slot behind a [`FixedField`].
    pub fn slot_mut(&mut self, field: FixedField) -> &mut Option<String> {
        match field {
            FixedField::Id => &mut self.id,
            FixedField::FirstName => &mut self.first_name,
            FixedField::LastName => &mut self.last_name,
            FixedField::Email => &mut self.email,
            FixedField::Mobile => &mut self.mobile,
            FixedField::PostCode => &mut self.post_code,
            FixedField::DataSource => &mut self.data_source,
            FixedField::SourceCreatedDate => &mut self.source_created_date,
            FixedField::SourceModifiedDate => &mut self.source_modified_date,
        }
    }

    /// Read access to the slot behind a [`FixedField`].
    pub fn slot(&self, field: FixedField) -> Option<&str> {
        let slot = match field {
            FixedField::Id => &self.id,
            FixedField::FirstName => &self.first_name,
            FixedField::LastName => &self.last_name,
            FixedField::Email => &self.email,
            FixedField::Mobile => &self.mobile,
            FixedField::PostCode => &self.post_code,
            FixedField::DataSource => &self.data_source,
            FixedField::SourceCreatedDate => &self.source_created_date,
            FixedField::SourceModifiedDate => &self.source_modified_date,
        };
        slot.as_deref()
    }
}
