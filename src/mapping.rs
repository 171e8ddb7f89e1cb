//! Mapping configuration: per-file rules translating raw headers into canonical fields and
//! dynamic attributes.
//!
//! The registry is built once from a YAML or JSON mapping file (both parse to the identical
//! in-memory structure) and is immutable for the duration of a run, so concurrent lookups by
//! multiple file processors are safe. Lookup is by exact filename match (no globbing, no fuzzy
//! matching).

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::FixedField;

/// One entry of the mapping file, translated and validated.
#[derive(Debug, Clone)]
pub struct MappingDefinition {
    /// Raw header name -> fixed canonical field, in file order.
    pub columns: Vec<(String, FixedField)>,
    /// Raw header name -> canonical attribute key, in file order.
    ///
    /// The order here fixes the emission order of a record's dynamic attributes.
    pub attributes: Vec<(String, String)>,
    /// Fixed tag applied to every record produced from this file.
    pub data_source: String,
}

/// Immutable lookup from source filename to its [`MappingDefinition`].
#[derive(Debug, Clone, Default)]
pub struct MappingRegistry {
    definitions: HashMap<String, MappingDefinition>,
}

impl MappingRegistry {
    /// Load and validate a mapping file, selecting the parser by extension
    /// (`.yaml`/`.yml` or `.json`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let raw: HashMap<String, RawDefinition> = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            "json" => serde_json::from_str(&text)?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.display().to_string(),
                });
            }
        };

        Self::from_raw(raw)
    }

    /// Build a registry from already-validated definitions (useful in tests and embedders).
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = (String, MappingDefinition)>,
    ) -> Self {
        Self {
            definitions: definitions.into_iter().collect(),
        }
    }

    fn from_raw(raw: HashMap<String, RawDefinition>) -> Result<Self, ConfigError> {
        let mut definitions = HashMap::with_capacity(raw.len());
        for (file, def) in raw {
            let validated = def.validate(&file)?;
            definitions.insert(file, validated);
        }
        Ok(Self { definitions })
    }

    /// Exact-filename lookup (case-sensitive).
    ///
    /// `None` means the caller must treat the file as skipped, not as a zero-row success.
    pub fn lookup(&self, filename: &str) -> Option<&MappingDefinition> {
        self.definitions.get(filename)
    }

    /// Number of mapping definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the registry holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Mapping-file entry as written on disk, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawDefinition {
    #[serde(default, deserialize_with = "ordered_pairs")]
    columns: Vec<(String, String)>,
    #[serde(default, deserialize_with = "ordered_pairs")]
    attributes: Vec<(String, String)>,
    data_source: Option<String>,
}

impl RawDefinition {
    fn validate(self, file: &str) -> Result<MappingDefinition, ConfigError> {
        let mut columns = Vec::with_capacity(self.columns.len());
        let mut seen_targets: HashSet<FixedField> = HashSet::new();
        for (header, target) in self.columns {
            let field = FixedField::parse(&target).ok_or_else(|| ConfigError::UnknownTarget {
                file: file.to_string(),
                target: target.clone(),
            })?;
            if !seen_targets.insert(field) {
                return Err(ConfigError::DuplicateTarget {
                    file: file.to_string(),
                    target,
                });
            }
            columns.push((header, field));
        }

        let column_headers: HashSet<&str> = columns.iter().map(|(h, _)| h.as_str()).collect();
        for (header, _) in &self.attributes {
            if column_headers.contains(header.as_str()) {
                return Err(ConfigError::OverlappingHeader {
                    file: file.to_string(),
                    header: header.clone(),
                });
            }
        }

        Ok(MappingDefinition {
            columns,
            attributes: self.attributes,
            data_source: self.data_source.unwrap_or_else(|| "unknown".to_string()),
        })
    }
}

/// Deserialize a YAML/JSON object into pairs, preserving document order.
///
/// A plain `HashMap` would lose the order the attributes were written in, and that order fixes
/// the emission order of dynamic attributes.
fn ordered_pairs<'de, D>(de: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of raw header to canonical name")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, String>()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    de.deserialize_map(PairsVisitor)
}
