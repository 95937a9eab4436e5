// src/benchmarks.rs
//
// Collects per-rule Snakemake benchmark TSVs into one master table. A
// report utility on the side of the conversion engine; it shares nothing
// with the taxonomy pipeline but ships in the same toolbox.
//
// File names encode their metadata: `<sample_id>.<rule>_<assembler>.tsv`,
// e.g. `sampleA.assembly_megahit.tsv` -> sample "sampleA", rule
// "assembly", assembler "megahit".

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::input::open_maybe_gzip;

/// Metric columns of a Snakemake benchmark file, in output order.
/// Missing metrics are emitted as `-` (the same NA marker Snakemake uses).
pub const METRIC_COLUMNS: [&str; 10] = [
    "s", "h:m:s", "max_rss", "max_vms", "max_uss", "max_pss", "io_in",
    "io_out", "mean_load", "cpu_time",
];

/// One data row of a benchmark file plus the metadata carried by its
/// file name.
#[derive(Debug, Clone)]
pub struct BenchmarkRow {
    pub sample_id: String,
    pub rule: String,
    pub assembler: String,
    /// Metric values aligned with [`METRIC_COLUMNS`].
    pub metrics: Vec<String>,
}

/// Split `<sample_id>.<rule>_<assembler>.<ext>` metadata out of a file
/// name. Returns `None` for names that do not follow the scheme.
pub fn parse_benchmark_filename(name: &str) -> Option<(String, String, String)> {
    let mut parts = name.split('.');
    let sample_id = parts.next()?;
    let rule_info = parts.next()?;

    let (rule, assembler) = rule_info.rsplit_once('_')?;
    Some((
        sample_id.to_string(),
        rule.to_string(),
        assembler.to_string(),
    ))
}

/// Parse one benchmark file. The first line is the header; metric values
/// are picked by header name so column order in the source is free.
pub fn parse_benchmark_file<P: AsRef<Path>>(
    path: P,
    sample_id: &str,
    rule: &str,
    assembler: &str,
) -> Result<Vec<BenchmarkRow>> {
    let reader = open_maybe_gzip(path)?;
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(h) => h?,
        None => return Ok(Vec::new()),
    };
    let header_fields: Vec<&str> = header.split('\t').map(|f| f.trim()).collect();

    let mut rows = Vec::new();
    for line_result in lines {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').map(|f| f.trim()).collect();

        let metrics = METRIC_COLUMNS
            .iter()
            .map(|col| {
                header_fields
                    .iter()
                    .position(|h| h == col)
                    .and_then(|i| fields.get(i))
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".to_string())
            })
            .collect();

        rows.push(BenchmarkRow {
            sample_id: sample_id.to_string(),
            rule: rule.to_string(),
            assembler: assembler.to_string(),
            metrics,
        });
    }

    Ok(rows)
}

/// Collect every benchmark file in `dir` into rows sorted by sample id.
/// Files whose names do not follow the metadata scheme are skipped with
/// a warning.
pub fn collect_benchmarks<P: AsRef<Path>>(dir: P) -> Result<Vec<BenchmarkRow>> {
    let mut rows = Vec::new();

    let mut entries: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    // Deterministic input order regardless of directory iteration order.
    entries.sort();

    for path in entries {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => continue,
        };
        match parse_benchmark_filename(name) {
            Some((sample_id, rule, assembler)) => {
                rows.extend(parse_benchmark_file(&path, &sample_id, &rule, &assembler)?);
            }
            None => log::warn!("Skipping benchmark file with unexpected name: {}", name),
        }
    }

    rows.sort_by(|a, b| a.sample_id.cmp(&b.sample_id));
    Ok(rows)
}

/// Render the master table, header included.
pub fn render_benchmark_table(rows: &[BenchmarkRow]) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "sample_id\trule\tassembler\t{}",
        METRIC_COLUMNS.join("\t")
    );
    for row in rows {
        let _ = writeln!(
            output,
            "{}\t{}\t{}\t{}",
            row.sample_id,
            row.rule,
            row.assembler,
            row.metrics.join("\t")
        );
    }
    output
}

/// Concatenate all benchmark files under `dir` into one TSV at `output`.
pub fn concatenate_benchmarks<P: AsRef<Path>, Q: AsRef<Path>>(
    dir: P,
    output: Q,
) -> Result<()> {
    let rows = collect_benchmarks(dir)?;
    log::info!("Collected {} benchmark row(s)", rows.len());

    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(render_benchmark_table(&rows).as_bytes())?;
    writer.flush()?;
    Ok(())
}
