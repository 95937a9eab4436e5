// src/krona.rs
//
// Krona text format, as consumed by ktImportText: one record per line,
// `<value>\t<rank1>\t<rank2>...`, no header. Every line independently
// encodes a full root-to-leaf path, so order is irrelevant to Krona.
// Insertion order is kept anyway so output files diff reproducibly.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::KronaTable;

/// Render the aggregate table as Krona text, `;` separators replaced by
/// tabs. Values keep their natural string form; nothing is rounded.
pub fn render_krona_table(table: &KronaTable) -> String {
    let mut output = String::new();
    for (lineage, value) in table {
        let ranks = lineage.replace(';', "\t");
        let _ = writeln!(output, "{}\t{}", value, ranks);
    }
    output
}

/// Buffered write of the rendered table to `path`.
pub fn write_krona_table<P: AsRef<Path>>(table: &KronaTable, path: P) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(render_krona_table(table).as_bytes())?;
    writer.flush()?;
    Ok(())
}
