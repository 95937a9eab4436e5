// src/names.rs

use std::io::BufRead;
use std::path::Path;

use ahash::AHashMap;

use crate::error::{Result, Tax2KronaError};
use crate::input::open_maybe_gzip;

/// A `NameIndex` maps a taxid token to its scientific name.
///
/// Built once per run from an NCBI `names.dmp` and read-only afterwards.
/// Taxids are kept as string tokens: lineage strings are never parsed
/// numerically, only looked up.
pub type NameIndex = AHashMap<String, String>;

/// Parses a `names.dmp` taxonomy dump in the format:
/// ```text
/// <taxid> | <name> | <unique name> | <name class> |
/// ```
/// Fields are whitespace-trimmed. Only rows whose name class is exactly
/// `scientific name` are retained; a taxid may appear on many rows with
/// other name classes (synonyms, common names), all ignored. Last
/// occurrence wins on duplicates.
pub fn parse_scientific_names<P: AsRef<Path>>(path: P) -> Result<NameIndex> {
    let reader = open_maybe_gzip(path)?;

    let mut index: NameIndex = AHashMap::new();

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let fields: Vec<&str> = line.split('|').map(|f| f.trim()).collect();

        if fields.len() < 4 {
            return Err(Tax2KronaError::MalformedDump { line: line_no + 1 });
        }

        if fields[3] == "scientific name" {
            index.insert(fields[0].to_string(), fields[1].to_string());
        }
    }

    log::info!("Loaded {} scientific names", index.len());
    Ok(index)
}
