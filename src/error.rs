// src/error.rs

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Tax2KronaError>;

/// All errors are deterministic parse failures on static input files, so
/// every variant is fatal: there is nothing a retry could change.
#[derive(Error, Debug)]
pub enum Tax2KronaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A names.dmp row with fewer than 4 pipe-delimited fields.
    #[error("malformed taxonomy dump line {line}: expected at least 4 pipe-delimited fields")]
    MalformedDump { line: usize },

    /// A lineage token with no entry in the name index. Translating around
    /// it would silently corrupt the counts, so this is a hard stop.
    #[error("no scientific name for taxid '{taxid}' in lineage '{lineage}'")]
    UnknownTaxid { lineage: String, taxid: String },

    /// A classification/abundance row with too few tab-delimited columns.
    #[error("malformed record on line {line}: expected at least {expected} tab-delimited fields")]
    MalformedRecord { line: usize, expected: usize },

    #[error("invalid count-value selector '{0}' (expected 'count', 'fraction' or 'corrected_fraction')")]
    InvalidColumnSelector(String),

    /// A bookkeeping value that should be numeric but is not. Only reachable
    /// during the root/unclassified merge, after line context is gone.
    #[error("bookkeeping value '{value}' for '{label}' is not numeric")]
    NonNumericValue { label: String, value: String },
}
