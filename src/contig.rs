// src/contig.rs
//
// Contig mode: CAT's <prefix>.contig2classification.txt, one row per
// contig. Rows are raw assignments, so this module does its own frequency
// counting before the bookkeeping merge.

use std::io::BufRead;
use std::path::Path;

use crate::error::{Result, Tax2KronaError};
use crate::input::open_maybe_gzip;
use crate::lineage::translate_lineage;
use crate::names::NameIndex;
use crate::types::{KronaTable, TableValue, ROOT_LABEL};

const STATUS_ASSIGNED: &str = "taxid assigned";
const STATUS_UNASSIGNED: &str = "no taxid assigned";

/// Stream a contig classification table, returning every assigned lineage
/// string (untranslated, in file order) and the count of unassigned
/// contigs. `#`-prefixed header/comment lines are skipped. Rows with a
/// status other than the two known values are ignored.
pub fn read_contig_classifications(
    reader: impl BufRead,
) -> Result<(Vec<String>, u64)> {
    let mut assigned = Vec::new();
    let mut unassigned: u64 = 0;

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(|f| f.trim()).collect();
        if fields.len() < 2 {
            return Err(Tax2KronaError::MalformedRecord {
                line: line_no + 1,
                expected: 2,
            });
        }

        match fields[1] {
            STATUS_ASSIGNED => {
                if fields.len() < 4 {
                    return Err(Tax2KronaError::MalformedRecord {
                        line: line_no + 1,
                        expected: 4,
                    });
                }
                assigned.push(fields[3].to_string());
            }
            STATUS_UNASSIGNED => unassigned += 1,
            _ => {}
        }
    }

    Ok((assigned, unassigned))
}

/// Translate a batch of lineage strings, dropping suggestive ones when
/// `keep_suggestive` is false. Drops are informational, not failures.
pub fn translate_classifications(
    lineages: &[String],
    index: &NameIndex,
    keep_suggestive: bool,
) -> Result<Vec<String>> {
    let mut translated = Vec::with_capacity(lineages.len());

    for lineage in lineages {
        match translate_lineage(lineage, index, keep_suggestive)? {
            Some(hr) => translated.push(hr),
            None => log::info!("Skipping suggestive lineage {}", lineage),
        }
    }

    Ok(translated)
}

/// Count occurrences of each distinct translated lineage, first-seen order.
pub fn frequency_table(translated: &[String]) -> KronaTable {
    let mut counts: indexmap::IndexMap<String, u64> = indexmap::IndexMap::new();
    for lineage in translated {
        *counts.entry(lineage.clone()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(lineage, n)| (lineage, TableValue::Count(n)))
        .collect()
}

/// Attribute unassigned contigs to the `root` entry: "no taxid" still
/// implies "some organism". When no `root` entry exists there is nothing
/// to attribute the count to and it is dropped; intended behavior, not
/// an accounting bug.
pub fn attribute_unassigned_to_root(table: &mut KronaTable, unassigned: u64) {
    match table.get_mut(ROOT_LABEL) {
        Some(TableValue::Count(n)) => *n += unassigned,
        Some(TableValue::Verbatim(_)) => {}
        None => {
            if unassigned > 0 {
                log::debug!(
                    "No root entry; dropping {} unassigned contig(s)",
                    unassigned
                );
            }
        }
    }
}

/// Full contig-mode pass: stream, translate, count, merge bookkeeping.
pub fn aggregate_contig_classifications(
    reader: impl BufRead,
    index: &NameIndex,
    keep_suggestive: bool,
) -> Result<KronaTable> {
    let (assigned, unassigned) = read_contig_classifications(reader)?;

    log::info!("Assigned: {}", assigned.len());
    log::info!("Unassigned: {}", unassigned);
    log::info!("Total: {}", assigned.len() as u64 + unassigned);

    let translated = translate_classifications(&assigned, index, keep_suggestive)?;
    let mut table = frequency_table(&translated);
    attribute_unassigned_to_root(&mut table, unassigned);

    Ok(table)
}

/// File-path front end for [`aggregate_contig_classifications`].
pub fn contig_file_to_table<P: AsRef<Path>>(
    path: P,
    index: &NameIndex,
    keep_suggestive: bool,
) -> Result<KronaTable> {
    let reader = open_maybe_gzip(path)?;
    aggregate_contig_classifications(reader, index, keep_suggestive)
}
