//! `sci-simgen`: Science IR text to a Python ODE simulation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;

use science_ir::cli::{fail, init_tracing, load_config, parse_args, read_input, write_output};
use science_ir::simulation::simulate_text;
use science_ir::ScienceResult;

#[derive(Parser)]
#[command(name = "sci-simgen", about = "Generate a Python ODE simulation from Science IR", version)]
struct Args {
    /// Input IR text
    input: PathBuf,

    /// Output Python program
    output: PathBuf,

    /// Pipeline config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: &Args) -> ScienceResult<()> {
    let config = load_config(args.config.as_deref())?;
    let text = read_input(&args.input)?;

    let (model, program) = simulate_text(&text, &config.simulation)?;
    for diagnostic in model.diagnostics() {
        warn!(line = diagnostic.line, "{}", diagnostic.kind);
    }
    write_output(&args.output, &program.source)?;

    println!("✓ Generated: {}", args.output.display());
    println!("  Species: {}", program.species);
    println!("  Reactions: {}", program.reactions);
    if !model.diagnostics().is_empty() {
        println!("  Diagnostics: {}", model.diagnostics().len());
    }
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
        Err(err) => fail("sci-simgen", &err),
    }
}
