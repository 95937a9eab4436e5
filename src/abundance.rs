// src/abundance.rs
//
// Abundance mode: RAT's <prefix>.complete.abundance.txt. Rows arrive
// pre-aggregated with explicit value columns, so no frequency counting
// happens here; values are carried verbatim to preserve source precision.

use std::io::BufRead;
use std::path::Path;

use crate::error::{Result, Tax2KronaError};
use crate::input::open_maybe_gzip;
use crate::lineage::translate_lineage;
use crate::names::NameIndex;
use crate::types::{KronaTable, TableValue, ValueColumn, ROOT_LABEL, UNCLASSIFIED_LABEL, UNMAPPED_LABEL};

/// Stream an abundance table into a `KronaTable`, bookkeeping not yet
/// merged. `#`-prefixed header lines are skipped.
///
/// `unmapped` and `unclassified` rows always record the raw count column
/// (index 1), whatever column was selected. A literal `root` label is a
/// bookkeeping key and passes through untranslated; rows carrying taxid 1
/// reach the same `root` key via translation.
///
/// Suggestive rows follow the usual keep/skip policy, but note the default
/// differs from contig mode: abundance conversions retain them unless the
/// caller opts out.
pub fn read_abundance_table(
    reader: impl BufRead,
    index: &NameIndex,
    column: ValueColumn,
    keep_suggestive: bool,
) -> Result<KronaTable> {
    let col_index = column.column_index();
    let mut table = KronaTable::new();

    for (line_no, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(|f| f.trim()).collect();
        if fields.len() <= col_index {
            return Err(Tax2KronaError::MalformedRecord {
                line: line_no + 1,
                expected: col_index + 1,
            });
        }

        let lineage = fields[0];
        let value = fields[col_index];

        if lineage == UNMAPPED_LABEL || lineage == UNCLASSIFIED_LABEL {
            // Raw count semantics unconditionally for bookkeeping rows.
            table.insert(
                lineage.to_string(),
                TableValue::Verbatim(fields[1].to_string()),
            );
        } else if lineage == ROOT_LABEL {
            table.insert(
                ROOT_LABEL.to_string(),
                TableValue::Verbatim(value.to_string()),
            );
        } else {
            match translate_lineage(lineage, index, keep_suggestive)? {
                Some(hr) => {
                    table.insert(hr, TableValue::Verbatim(value.to_string()));
                }
                None => log::info!("Skipping suggestive lineage {}", lineage),
            }
        }
    }

    Ok(table)
}

/// Fold the captured `unclassified` value into `root` and drop the
/// standalone `unclassified` entry. Integer arithmetic when the selected
/// column is the raw count, floating otherwise. Without a `root` entry
/// nothing moves; `unmapped` is never merged.
pub fn merge_unclassified_into_root(
    table: &mut KronaTable,
    column: ValueColumn,
) -> Result<()> {
    if !table.contains_key(ROOT_LABEL) {
        return Ok(());
    }

    let unclassified = table
        .shift_remove(UNCLASSIFIED_LABEL)
        .map(|v| v.to_string());

    let root_text = table[ROOT_LABEL].to_string();

    let merged = if column.is_integral() {
        let root: u64 = parse_numeric(ROOT_LABEL, &root_text)?;
        let unc: u64 = match &unclassified {
            Some(v) => parse_numeric(UNCLASSIFIED_LABEL, v)?,
            None => 0,
        };
        TableValue::Verbatim((root + unc).to_string())
    } else {
        let root: f64 = parse_numeric(ROOT_LABEL, &root_text)?;
        let unc: f64 = match &unclassified {
            Some(v) => parse_numeric(UNCLASSIFIED_LABEL, v)?,
            None => 0.0,
        };
        TableValue::Verbatim((root + unc).to_string())
    };

    table[ROOT_LABEL] = merged;
    Ok(())
}

fn parse_numeric<T: std::str::FromStr>(label: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| Tax2KronaError::NonNumericValue {
        label: label.to_string(),
        value: value.to_string(),
    })
}

/// Full abundance-mode pass: stream, translate, merge bookkeeping.
pub fn aggregate_abundance_table(
    reader: impl BufRead,
    index: &NameIndex,
    column: ValueColumn,
    keep_suggestive: bool,
) -> Result<KronaTable> {
    let mut table = read_abundance_table(reader, index, column, keep_suggestive)?;
    merge_unclassified_into_root(&mut table, column)?;
    Ok(table)
}

/// File-path front end for [`aggregate_abundance_table`].
pub fn abundance_file_to_table<P: AsRef<Path>>(
    path: P,
    index: &NameIndex,
    column: ValueColumn,
    keep_suggestive: bool,
) -> Result<KronaTable> {
    let reader = open_maybe_gzip(path)?;
    aggregate_abundance_table(reader, index, column, keep_suggestive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ahash::AHashMap;

    fn index() -> NameIndex {
        let mut idx = AHashMap::new();
        idx.insert("1".to_string(), "root".to_string());
        idx.insert("2".to_string(), "Bacteria".to_string());
        idx.insert("131567".to_string(), "cellular organisms".to_string());
        idx
    }

    const INPUT: &str = "\
# lineage\tnumber of reads\tfraction of reads\tsomething\tcorrected fraction\n\
unmapped\t3\t0.03\t-\t0.03\n\
unclassified\t5\t0.05\t-\t0.05\n\
1\t10\t0.10\t-\t0.12\n\
1;131567;2\t82\t0.82\t-\t0.80\n";

    #[test]
    fn merges_unclassified_into_root_with_integer_counts() {
        let table = aggregate_abundance_table(
            INPUT.as_bytes(),
            &index(),
            ValueColumn::Count,
            true,
        )
        .unwrap();

        assert_eq!(table["root"], TableValue::Verbatim("15".to_string()));
        assert!(!table.contains_key("unclassified"));
        assert_eq!(table["unmapped"], TableValue::Verbatim("3".to_string()));
        assert_eq!(
            table["root;cellular organisms;Bacteria"],
            TableValue::Verbatim("82".to_string())
        );
    }

    #[test]
    fn fraction_merge_uses_floating_addition() {
        let table = aggregate_abundance_table(
            INPUT.as_bytes(),
            &index(),
            ValueColumn::Fraction,
            true,
        )
        .unwrap();

        // root fraction 0.10 plus the captured raw unclassified count (5):
        // bookkeeping rows always record column 1.
        assert_eq!(table["root"], TableValue::Verbatim("5.1".to_string()));
        assert_eq!(
            table["root;cellular organisms;Bacteria"],
            TableValue::Verbatim("0.82".to_string())
        );
    }

    #[test]
    fn corrected_fraction_selects_fifth_column() {
        let table = aggregate_abundance_table(
            INPUT.as_bytes(),
            &index(),
            ValueColumn::CorrectedFraction,
            true,
        )
        .unwrap();

        assert_eq!(
            table["root;cellular organisms;Bacteria"],
            TableValue::Verbatim("0.80".to_string())
        );
    }

    #[test]
    fn unmapped_survives_untouched_without_root() {
        let input = "unmapped\t3\t0.03\t-\t0.03\n1;2\t7\t0.07\t-\t0.07\n";
        let table = aggregate_abundance_table(
            input.as_bytes(),
            &index(),
            ValueColumn::Count,
            true,
        )
        .unwrap();

        assert_eq!(table["unmapped"], TableValue::Verbatim("3".to_string()));
        assert_eq!(table["root;Bacteria"], TableValue::Verbatim("7".to_string()));
    }

    #[test]
    fn unclassified_without_root_stays_standalone() {
        let input = "unclassified\t5\t0.05\t-\t0.05\n1;2\t7\t0.07\t-\t0.07\n";
        let table = aggregate_abundance_table(
            input.as_bytes(),
            &index(),
            ValueColumn::Count,
            true,
        )
        .unwrap();

        assert_eq!(table["unclassified"], TableValue::Verbatim("5".to_string()));
    }

    #[test]
    fn root_without_unclassified_is_unchanged() {
        let input = "1\t10\t0.10\t-\t0.12\n";
        let table = aggregate_abundance_table(
            input.as_bytes(),
            &index(),
            ValueColumn::Count,
            true,
        )
        .unwrap();

        assert_eq!(table["root"], TableValue::Verbatim("10".to_string()));
    }

    #[test]
    fn literal_root_label_is_bookkeeping_not_a_taxid() {
        let input = "root\t10\t0.10\t-\t0.12\nunclassified\t5\t0.05\t-\t0.05\n";
        let table = aggregate_abundance_table(
            input.as_bytes(),
            &index(),
            ValueColumn::Count,
            true,
        )
        .unwrap();

        assert_eq!(table["root"], TableValue::Verbatim("15".to_string()));
    }

    #[test]
    fn suggestive_rows_kept_by_default_policy() {
        let input = "1;2*\t7\t0.07\t-\t0.07\n";
        let table = aggregate_abundance_table(
            input.as_bytes(),
            &index(),
            ValueColumn::Count,
            true,
        )
        .unwrap();

        assert_eq!(table["root;Bacteria"], TableValue::Verbatim("7".to_string()));
    }

    #[test]
    fn suggestive_rows_skipped_on_opt_out() {
        let input = "1;2*\t7\t0.07\t-\t0.07\n1\t10\t0.10\t-\t0.12\n";
        let table = aggregate_abundance_table(
            input.as_bytes(),
            &index(),
            ValueColumn::Count,
            false,
        )
        .unwrap();

        assert_eq!(table.len(), 1);
        assert!(table.contains_key("root"));
    }

    #[test]
    fn short_row_is_malformed() {
        let input = "1;2\t7\n";
        let err = aggregate_abundance_table(
            input.as_bytes(),
            &index(),
            ValueColumn::CorrectedFraction,
            true,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Tax2KronaError::MalformedRecord { line: 1, expected: 5 }
        ));
    }

    #[test]
    fn non_numeric_root_fails_the_merge() {
        let input = "root\tn/a\t0.10\t-\t0.12\nunclassified\t5\t0.05\t-\t0.05\n";
        let err = aggregate_abundance_table(
            input.as_bytes(),
            &index(),
            ValueColumn::Count,
            true,
        )
        .unwrap_err();

        assert!(matches!(err, Tax2KronaError::NonNumericValue { .. }));
    }

    #[test]
    fn insertion_order_is_preserved() {
        let table = aggregate_abundance_table(
            INPUT.as_bytes(),
            &index(),
            ValueColumn::Count,
            true,
        )
        .unwrap();

        let keys: Vec<&str> = table.keys().map(|k| k.as_str()).collect();
        assert_eq!(
            keys,
            vec!["unmapped", "root", "root;cellular organisms;Bacteria"]
        );
    }
}
