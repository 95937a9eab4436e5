use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use tax2krona_rs::{abundance_to_krona, contig_to_krona, Result, ValueColumn};
use tax2krona_rs::benchmarks::concatenate_benchmarks;

#[derive(Parser)]
#[command(
    name = "tax2krona",
    version,
    about = "Translate CAT/RAT classifier output into ktImportText-compatible tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CAT <prefix>.contig2classification.txt file
    Contig(ContigArgs),

    /// Convert a RAT <prefix>.complete.abundance.txt file
    Abundance(AbundanceArgs),

    /// Collect Snakemake benchmark TSVs into one table
    Benchmarks(BenchmarksArgs),
}

#[derive(Args)]
struct ContigArgs {
    /// <prefix>.contig2classification.txt output from CAT contigs
    #[arg(short, long)]
    input: PathBuf,

    /// A ktImportText compatible file
    #[arg(short, long)]
    output: PathBuf,

    /// The names.dmp file from NCBI Taxonomy (shipped in the
    /// CAT_taxonomy.<timestamp> directory)
    #[arg(short, long)]
    names_dmp: PathBuf,

    /// Include suggestive classifications, marked with '*'
    #[arg(long, default_value_t = false)]
    include_stars: bool,
}

#[derive(Args)]
struct AbundanceArgs {
    /// Path to the complete.abundance.txt file produced by RAT
    #[arg(short, long)]
    input: PathBuf,

    /// A ktImportText compatible file
    #[arg(short, long)]
    output: PathBuf,

    /// The names.dmp file from NCBI Taxonomy
    #[arg(short, long)]
    names_dmp: PathBuf,

    /// Which value column to report: count, fraction or corrected_fraction
    #[arg(long, default_value = "count")]
    count_value: String,

    /// Drop suggestive classifications instead of keeping them
    #[arg(long, default_value_t = false)]
    exclude_stars: bool,
}

#[derive(Args)]
struct BenchmarksArgs {
    /// Path to the benchmarks directory
    #[arg(short, long)]
    input: PathBuf,

    /// Output table
    #[arg(short, long)]
    output: PathBuf,
}

fn spinner(msg: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(msg);
    bar
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Contig(args) => {
            let bar = spinner("Translating contig classifications...");
            let table = contig_to_krona(
                &args.input,
                &args.names_dmp,
                &args.output,
                args.include_stars,
            )?;
            bar.finish_with_message(format!(
                "Wrote {} lineage(s) to {}",
                table.len(),
                args.output.display()
            ));
        }
        Commands::Abundance(args) => {
            let column: ValueColumn = args.count_value.parse()?;
            let bar = spinner("Translating abundance table...");
            let table = abundance_to_krona(
                &args.input,
                &args.names_dmp,
                &args.output,
                column,
                !args.exclude_stars,
            )?;
            bar.finish_with_message(format!(
                "Wrote {} lineage(s) to {}",
                table.len(),
                args.output.display()
            ));
        }
        Commands::Benchmarks(args) => {
            let bar = spinner("Collecting benchmarks...");
            concatenate_benchmarks(&args.input, &args.output)?;
            bar.finish_with_message(format!("Wrote {}", args.output.display()));
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
