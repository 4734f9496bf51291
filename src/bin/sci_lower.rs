//! `sci-lower`: claim records to Science IR text.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};

use science_ir::cli::{fail, init_tracing, load_config, parse_args, read_input, write_output};
use science_ir::ir::digest;
use science_ir::lower::lower_document;
use science_ir::ScienceResult;

#[derive(Parser)]
#[command(name = "sci-lower", about = "Lower claim records (JSON) into Science IR text", version)]
struct Args {
    /// Claims JSON: an array of records or an object with `statements`
    input: PathBuf,

    /// Output IR text
    output: PathBuf,

    /// Also write the structured module as JSON
    #[arg(long)]
    json_module: Option<PathBuf>,

    /// Claim-resolution workers (overrides the config file)
    #[arg(long)]
    workers: Option<usize>,

    /// Pipeline config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: &Args) -> ScienceResult<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(workers) = args.workers {
        config.lowering.workers = workers;
        config.validate()?;
    }

    let claims = read_input(&args.input)?;
    info!(input = %args.input.display(), "processing claims");
    let lowered = lower_document(&claims, &config.lowering)?;
    let text = lowered.text();
    write_output(&args.output, &text)?;

    if let Some(path) = &args.json_module {
        write_output(path, &lowered.module.to_json_pretty()?)?;
    }

    let report = &lowered.report;
    for bad in &report.malformed {
        warn!(index = bad.index, "skipped malformed claim: {}", bad.message);
    }
    println!("✓ Generated IR: {}", args.output.display());
    println!("  Statements: {}", report.claims_seen);
    println!("  Operations: {}", report.operations);
    println!("  Declarations: {}", report.declarations);
    println!(
        "  Skipped: {} (incomplete {}, unsupported {}, malformed {})",
        report.skipped(),
        report.incomplete,
        report.unsupported,
        report.malformed.len()
    );
    println!("  Digest: {}", digest(&text));
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let args = match parse_args::<Args>() {
        Ok(args) => args,
        Err(code) => return code,
    };
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail("sci-lower", &err),
    }
}
