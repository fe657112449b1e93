use super::character::{self, CharacterParseError};
use super::notation::normalize_point_group_id;
use super::table::{CharacterTable, Correlation, Descent, Irrep};
use crate::core::models::operation::{OperationClass, OperationParseError, SymmetryOperation};
use crate::engine::error::AnalysisError;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

const EMBEDDED_TABLES: &str = include_str!("../../../data/character_tables.toml");

/// Tolerance used when validating the numeric content of character tables.
const VALIDATION_TOLERANCE: f64 = 1e-6;

static CATALOG: LazyLock<CharacterTableCatalog> = LazyLock::new(|| {
    CharacterTableCatalog::from_toml_str(EMBEDDED_TABLES)
        .expect("Embedded character tables must be valid")
});

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("TOML parsing error in character table data: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid operation in table {table}, class {class}: {source}")]
    Operation {
        table: String,
        class: String,
        source: OperationParseError,
    },

    #[error("Invalid character in table {table}, irrep {irrep}: {source}")]
    Character {
        table: String,
        irrep: String,
        source: CharacterParseError,
    },

    #[error("Unknown basis function '{function}' in table {table}, irrep {irrep}")]
    BasisFunction {
        table: String,
        irrep: String,
        function: String,
    },

    #[error("Duplicate character table '{0}'")]
    Duplicate(String),

    #[error("Invalid character table {table}: {reason}")]
    Invalid { table: String, reason: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCatalog {
    table: Vec<RawTable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    id: String,
    classes: Vec<RawClass>,
    irreps: Vec<RawIrrep>,
    descent: Option<RawDescent>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClass {
    label: String,
    #[serde(default)]
    ops: Vec<String>,
    #[serde(default)]
    continuous: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawIrrep {
    label: String,
    chars: String,
    #[serde(default)]
    linear: Vec<String>,
    #[serde(default)]
    quadratic: Vec<String>,
    pair: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescent {
    subgroup: String,
    correlation: Vec<RawCorrelation>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCorrelation {
    irrep: String,
    components: Vec<String>,
}

/// The set of supported point groups and their character tables.
///
/// The process-wide instance returned by [`catalog`] is parsed once from data embedded in
/// the binary and never mutated afterwards, so it can be shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct CharacterTableCatalog {
    tables: Vec<CharacterTable>,
    index: HashMap<String, usize>,
}

impl CharacterTableCatalog {
    /// Parses and validates a catalog from its TOML representation.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = toml::from_str(content)?;
        let mut catalog = Self::default();
        for raw_table in raw.table {
            let table = convert_table(raw_table)?;
            table.validate(VALIDATION_TOLERANCE)?;
            if catalog.index.contains_key(&table.id) {
                return Err(CatalogError::Duplicate(table.id));
            }
            catalog.index.insert(table.id.clone(), catalog.tables.len());
            catalog.tables.push(table);
        }
        for table in &catalog.tables {
            catalog.validate_descent(table)?;
        }
        debug!(tables = catalog.tables.len(), "Character table catalog loaded.");
        Ok(catalog)
    }

    /// Looks up a table by point-group identifier, after normalization (`c2v`, `Dinfh`).
    pub fn get(&self, point_group: &str) -> Option<&CharacterTable> {
        self.index
            .get(&normalize_point_group_id(point_group))
            .map(|&i| &self.tables[i])
    }

    /// Like [`get`](Self::get), failing with `UnsupportedPointGroup` for identifiers outside
    /// the catalog.
    pub fn lookup(&self, point_group: &str) -> Result<&CharacterTable, AnalysisError> {
        self.get(point_group)
            .ok_or_else(|| AnalysisError::UnsupportedPointGroup {
                id: point_group.to_string(),
            })
    }

    /// The descent subgroup table of a linear group, or the table itself for finite groups.
    pub fn reduction_table<'a>(&'a self, table: &'a CharacterTable) -> Option<&'a CharacterTable> {
        match &table.descent {
            Some(descent) => self.get(&descent.subgroup),
            None => Some(table),
        }
    }

    /// Supported point-group identifiers, in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.id.as_str())
    }

    pub fn tables(&self) -> &[CharacterTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn validate_descent(&self, table: &CharacterTable) -> Result<(), CatalogError> {
        let Some(descent) = &table.descent else {
            return Ok(());
        };
        let invalid = |reason: String| CatalogError::Invalid {
            table: table.id.clone(),
            reason,
        };
        let subgroup = self
            .get(&descent.subgroup)
            .filter(|s| !s.is_linear())
            .ok_or_else(|| invalid(format!("unknown descent subgroup {}", descent.subgroup)))?;

        for irrep in &table.irreps {
            let correlation = descent
                .correlation
                .iter()
                .find(|c| c.irrep == irrep.label)
                .ok_or_else(|| invalid(format!("irrep {} has no correlation", irrep.label)))?;
            let mut dimension = 0;
            for component in &correlation.components {
                let target = subgroup.irrep(component).ok_or_else(|| {
                    invalid(format!("unknown subgroup irrep {component} for {}", irrep.label))
                })?;
                dimension += target.dimension();
            }
            if dimension != irrep.dimension() {
                return Err(invalid(format!(
                    "correlation of {} has dimension {dimension}",
                    irrep.label
                )));
            }
        }
        Ok(())
    }
}

fn convert_table(raw: RawTable) -> Result<CharacterTable, CatalogError> {
    let id = raw.id;

    let classes = raw
        .classes
        .into_iter()
        .map(|class| -> Result<OperationClass, CatalogError> {
            if class.continuous {
                return Ok(OperationClass::continuous(&class.label));
            }
            let operations = class
                .ops
                .iter()
                .map(|op| op.parse::<SymmetryOperation>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| CatalogError::Operation {
                    table: id.clone(),
                    class: class.label.clone(),
                    source,
                })?;
            Ok(OperationClass::new(&class.label, operations))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let irreps = raw
        .irreps
        .into_iter()
        .map(|irrep| -> Result<Irrep, CatalogError> {
            let characters =
                character::parse_row(&irrep.chars).map_err(|source| CatalogError::Character {
                    table: id.clone(),
                    irrep: irrep.label.clone(),
                    source,
                })?;
            let linear = irrep
                .linear
                .iter()
                .map(|f| f.parse())
                .collect::<Result<Vec<_>, String>>()
                .map_err(|function| CatalogError::BasisFunction {
                    table: id.clone(),
                    irrep: irrep.label.clone(),
                    function,
                })?;
            Ok(Irrep {
                label: irrep.label,
                characters,
                linear,
                quadratic: irrep.quadratic,
                pair: irrep.pair,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let descent = raw.descent.map(|d| Descent {
        subgroup: d.subgroup,
        correlation: d
            .correlation
            .into_iter()
            .map(|c| Correlation {
                irrep: c.irrep,
                components: c.components,
            })
            .collect(),
    });

    Ok(CharacterTable {
        id,
        classes,
        irreps,
        descent,
    })
}

/// The process-wide catalog of supported point groups.
pub fn catalog() -> &'static CharacterTableCatalog {
    &CATALOG
}
