// src/lib.rs
pub mod abundance;
pub mod benchmarks;
pub mod contig;
pub mod error;
pub mod input;
pub mod krona;
pub mod lineage;
pub mod names;
pub mod types;

use std::path::Path;

pub use crate::error::{Result, Tax2KronaError};
pub use crate::types::{KronaTable, TableValue, ValueColumn};

use crate::abundance::abundance_file_to_table;
use crate::contig::contig_file_to_table;
use crate::krona::write_krona_table;
use crate::names::parse_scientific_names;

/// Convert a CAT `contig2classification` file into a Krona text table.
///
/// Builds the name index once, streams the input in a single pass,
/// attributes unassigned contigs to `root` where possible and writes the
/// result. `keep_suggestive` defaults to `false` for this format in the
/// CLI; star-marked classifications are dropped unless asked for.
pub fn contig_to_krona<P, Q, R>(
    input: P,
    names_dmp: Q,
    output: R,
    keep_suggestive: bool,
) -> Result<KronaTable>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let index = parse_scientific_names(names_dmp)?;
    let table = contig_file_to_table(input, &index, keep_suggestive)?;
    write_krona_table(&table, output)?;
    Ok(table)
}

/// Convert a RAT `complete.abundance` file into a Krona text table.
///
/// Same single-pass shape as [`contig_to_krona`], with a caller-selected
/// value column. `keep_suggestive` defaults to `true` for this format in
/// the CLI; the policies intentionally differ between the two modes.
pub fn abundance_to_krona<P, Q, R>(
    input: P,
    names_dmp: Q,
    output: R,
    column: ValueColumn,
    keep_suggestive: bool,
) -> Result<KronaTable>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    R: AsRef<Path>,
{
    let index = parse_scientific_names(names_dmp)?;
    let table = abundance_file_to_table(input, &index, column, keep_suggestive)?;
    write_krona_table(&table, output)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES_DMP: &str = "\
1\t|\troot\t|\t\t|\tscientific name\t|\n\
131567\t|\tcellular organisms\t|\t\t|\tscientific name\t|\n\
2\t|\tBacteria\t|\tBacteria <bacteria>\t|\tscientific name\t|\n\
2\t|\teubacteria\t|\t\t|\tgenbank common name\t|\n";

    const CONTIG_INPUT: &str = "\
# contig\tclassification\treason\tlineage\tlineage scores\n\
contig_1\ttaxid assigned\tbased on 10/10 ORFs\t1;131567;2\t1.0;1.0;0.9\n\
contig_2\ttaxid assigned\tbased on 9/10 ORFs\t1;131567;2\t1.0;1.0;0.8\n\
contig_3\ttaxid assigned\tbased on 2/10 ORFs\t1\t1.0\n\
contig_4\tno taxid assigned\tno ORFs found\n";

    const ABUNDANCE_INPUT: &str = "\
# lineage\tnumber of reads\tfraction of reads\tlineage names\tcorrected fraction\n\
unmapped\t3\t0.03\t-\t0.03\n\
unclassified\t5\t0.05\t-\t0.05\n\
1\t10\t0.10\t-\t0.12\n\
1;131567;2\t82\t0.82\t-\t0.80\n";

    fn setup(input: &str) -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let names = dir.path().join("names.dmp");
        let table = dir.path().join("input.txt");
        std::fs::write(&names, NAMES_DMP).unwrap();
        std::fs::write(&table, input).unwrap();
        (dir, names, table)
    }

    #[test]
    fn contig_pipeline_end_to_end() {
        let (dir, names, input) = setup(CONTIG_INPUT);
        let output = dir.path().join("krona.tsv");

        contig_to_krona(&input, &names, &output, false).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            text,
            "2\troot\tcellular organisms\tBacteria\n\
             2\troot\n"
        );
    }

    #[test]
    fn abundance_pipeline_end_to_end() {
        let (dir, names, input) = setup(ABUNDANCE_INPUT);
        let output = dir.path().join("krona.tsv");

        abundance_to_krona(&input, &names, &output, ValueColumn::Count, true).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            text,
            "3\tunmapped\n\
             15\troot\n\
             82\troot\tcellular organisms\tBacteria\n"
        );
    }

    #[test]
    fn pipeline_is_idempotent() {
        let (dir, names, input) = setup(CONTIG_INPUT);
        let out1 = dir.path().join("run1.tsv");
        let out2 = dir.path().join("run2.tsv");

        contig_to_krona(&input, &names, &out1, false).unwrap();
        contig_to_krona(&input, &names, &out2, false).unwrap();

        assert_eq!(
            std::fs::read(&out1).unwrap(),
            std::fs::read(&out2).unwrap()
        );
    }

    #[test]
    fn unknown_taxid_aborts_the_run() {
        let (dir, names, _input) = setup(CONTIG_INPUT);
        let bad = dir.path().join("bad.txt");
        std::fs::write(&bad, "contig_1\ttaxid assigned\treason\t1;4242\t1.0\n").unwrap();
        let output = dir.path().join("krona.tsv");

        let err = contig_to_krona(&bad, &names, &output, false).unwrap_err();
        assert!(matches!(err, Tax2KronaError::UnknownTaxid { taxid, .. } if taxid == "4242"));
        // All-or-nothing: no partial output file is left behind.
        assert!(!output.exists());
    }
}
