// src/lineage.rs

use crate::error::{Result, Tax2KronaError};
use crate::names::NameIndex;

/// Marker appended by CAT/RAT to ranks of a low-confidence ("suggestive")
/// classification, e.g. `1;131567;2*`.
pub const SUGGESTIVE_MARKER: char = '*';

/// True iff any token of the lineage carries the suggestive marker.
pub fn is_suggestive(lineage: &str) -> bool {
    lineage.contains(SUGGESTIVE_MARKER)
}

/// Translate a `;`-joined chain of numeric taxids into the matching chain
/// of scientific names.
///
/// Returns `Ok(None)` when the lineage is suggestive and `keep_suggestive`
/// is false: that is a policy skip, not an error, and the caller is
/// expected to log it and move on. With `keep_suggestive` set, the marker
/// is stripped from every token before lookup.
///
/// Token order is trusted as-is; ranks are never reordered or validated.
/// A token with no index entry is fatal: substituting a placeholder would
/// silently corrupt the aggregated counts.
pub fn translate_lineage(
    lineage: &str,
    index: &NameIndex,
    keep_suggestive: bool,
) -> Result<Option<String>> {
    let stripped;
    let lineage_str = if is_suggestive(lineage) {
        if !keep_suggestive {
            return Ok(None);
        }
        stripped = lineage.replace(SUGGESTIVE_MARKER, "");
        stripped.as_str()
    } else {
        lineage
    };

    let mut names = Vec::new();
    for taxid in lineage_str.split(';') {
        match index.get(taxid) {
            Some(name) => names.push(name.as_str()),
            None => {
                return Err(Tax2KronaError::UnknownTaxid {
                    lineage: lineage.to_string(),
                    taxid: taxid.to_string(),
                })
            }
        }
    }

    Ok(Some(names.join(";")))
}
