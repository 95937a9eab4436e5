// src/types.rs

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;

use crate::error::Tax2KronaError;

/// Bookkeeping labels: non-taxonomic keys used for accounting only.
///
/// `root` doubles as the scientific name of taxid 1, which is how the
/// bookkeeping merges find their target in a translated table.
pub const ROOT_LABEL: &str = "root";
pub const UNCLASSIFIED_LABEL: &str = "unclassified";
pub const UNMAPPED_LABEL: &str = "unmapped";

/// Aggregated counts keyed by translated lineage (or a bookkeeping label).
///
/// Insertion order is part of the output contract: the writer emits entries
/// in first-seen order so identical inputs always produce identical files.
pub type KronaTable = IndexMap<String, TableValue>;

/// A value cell in the aggregate table.
///
/// Contig mode counts occurrences itself, so it holds integers. Abundance
/// mode copies pre-aggregated fields through verbatim to preserve the
/// source precision of fractions (no reformatting, no rounding).
#[derive(Debug, Clone, PartialEq)]
pub enum TableValue {
    Count(u64),
    Verbatim(String),
}

impl fmt::Display for TableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableValue::Count(n) => write!(f, "{}", n),
            TableValue::Verbatim(s) => f.write_str(s),
        }
    }
}

/// Which value column of a RAT abundance table to report.
///
/// The mapping to 0-indexed columns is fixed by the upstream format:
/// `count` -> 1, `fraction` -> 2, `corrected_fraction` -> 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    Count,
    Fraction,
    CorrectedFraction,
}

impl ValueColumn {
    /// 0-indexed column in the abundance table.
    pub fn column_index(self) -> usize {
        match self {
            ValueColumn::Count => 1,
            ValueColumn::Fraction => 2,
            ValueColumn::CorrectedFraction => 4,
        }
    }

    /// Raw counts are integers; the fraction columns are floats. The
    /// root/unclassified merge picks its arithmetic based on this.
    pub fn is_integral(self) -> bool {
        matches!(self, ValueColumn::Count)
    }
}

impl FromStr for ValueColumn {
    type Err = Tax2KronaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(ValueColumn::Count),
            "fraction" => Ok(ValueColumn::Fraction),
            "corrected_fraction" => Ok(ValueColumn::CorrectedFraction),
            _ => Err(Tax2KronaError::InvalidColumnSelector(s.to_string())),
        }
    }
}
