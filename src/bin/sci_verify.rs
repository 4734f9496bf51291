//! `sci-verify`: consistency report for Science IR text.
//!
//! Exits with 1 when any error-severity violation is found.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use science_ir::cli::{fail, init_tracing, load_config, parse_args, read_input, write_output};
use science_ir::verify::verify;
use science_ir::ScienceResult;

#[derive(Parser)]
#[command(name = "sci-verify", about = "Check Science IR for semantic consistency", version)]
struct Args {
    /// Input IR text
    input: PathBuf,

    /// Also write the report to this file
    report: Option<PathBuf>,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,

    /// Pipeline config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: &Args) -> ScienceResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let text = read_input(&args.input)?;

    let report = verify(&text, &config.verification);
    let rendered = if args.json {
        report.to_json_pretty()?
    } else {
        report.render_text()
    };
    print!("{rendered}");
    if args.json {
        println!();
    }
    if let Some(path) = &args.report {
        write_output(path, &rendered)?;
    }

    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn main() -> ExitCode {
    init_tracing();
    let args = match parse_args::<Args>() {
        Ok(args) => args,
        Err(code) => return code,
    };
    run(&args).unwrap_or_else(|err| fail("sci-verify", &err))
}
