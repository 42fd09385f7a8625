// Idiomatic Rust CLI for gbpatch.
//
// Explicit subcommands and long-form options over the two in-memory cores:
// `diff`/`apply` for IPS patch generation and application, `patch` for the
// save-support injection, `records` for inspecting a patch file.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::io::{self, IoError};
use crate::ips::read_records;
use crate::rom::PatchError;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// IPS patch generator and Game Boy ROM save-patcher.
#[derive(Parser, Debug)]
#[command(
    name = "gbpatch",
    version,
    about = "IPS patch generator and Game Boy ROM save-patcher",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Patch even if the precondition checks fail.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json", global = true)]
    json_output: bool,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create an IPS patch from an original and a modified image.
    Diff(DiffArgs),
    /// Inject battery-backed high-score saving into a ROM image.
    Patch(PatchArgs),
    /// Apply an IPS patch to a base image.
    Apply(ApplyArgs),
    /// Print the records of an IPS patch file.
    Records(RecordsArgs),
}

#[derive(Args, Debug)]
struct DiffArgs {
    /// Original image path.
    #[arg(long, value_hint = ValueHint::FilePath)]
    orig: PathBuf,

    /// Modified image path.
    #[arg(long = "modified", short = 'm', value_hint = ValueHint::FilePath)]
    modified: PathBuf,

    /// Output IPS patch path.
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PatchArgs {
    /// Input ROM path (clean/original image).
    #[arg(long = "input", short = 'i', value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output ROM path.
    #[arg(long = "output", short = 'o', value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Base image path.
    #[arg(long, value_hint = ValueHint::FilePath)]
    orig: PathBuf,

    /// IPS patch path.
    #[arg(long = "patch", short = 'p', value_hint = ValueHint::FilePath)]
    patch: PathBuf,

    /// Output image path.
    #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct RecordsArgs {
    /// IPS patch file to inspect.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_diff(cli: &Cli, args: &DiffArgs) -> i32 {
    let stats = match io::diff_files(&args.orig, &args.modified, &args.out) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("gbpatch: diff: {e}");
            return 1;
        }
    };

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "gbpatch: diff: orig {} bytes, modified {} bytes, {} records, patch {} bytes",
            stats.orig_size, stats.modified_size, stats.records, stats.patch_size
        );
    }
    if !cli.quiet {
        eprintln!("gbpatch: wrote IPS patch: {}", args.out.display());
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "diff",
            "orig_size": stats.orig_size,
            "modified_size": stats.modified_size,
            "patch_size": stats.patch_size,
            "records": stats.records,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

fn cmd_patch(cli: &Cli, args: &PatchArgs) -> i32 {
    let stats = match io::patch_file(&args.input, &args.output, cli.force) {
        Ok(s) => s,
        Err(IoError::Patch(e @ PatchError::PreconditionsFailed { .. })) => {
            // The error lists every failed check, not just the first.
            eprintln!("gbpatch: {e}");
            return 1;
        }
        Err(e) => {
            eprintln!("gbpatch: patch: {e}");
            return 1;
        }
    };

    if !cli.quiet {
        eprintln!("gbpatch: patched ROM written to: {}", args.output.display());
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "patch",
            "input_size": stats.input_size,
            "output_size": stats.output_size,
            "forced": stats.forced,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

fn cmd_apply(cli: &Cli, args: &ApplyArgs) -> i32 {
    let stats = match io::apply_file(&args.orig, &args.patch, &args.out) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("gbpatch: apply: {e}");
            return 1;
        }
    };

    if cli.verbose > 0 && !cli.quiet {
        eprintln!(
            "gbpatch: apply: {} records, output {} bytes",
            stats.records, stats.output_size
        );
    }

    if cli.json_output {
        let json = serde_json::json!({
            "command": "apply",
            "base_size": stats.base_size,
            "output_size": stats.output_size,
            "records": stats.records,
        });
        eprintln!("{}", serde_json::to_string_pretty(&json).unwrap());
    }

    0
}

fn cmd_records(args: &RecordsArgs) -> i32 {
    let patch = match std::fs::read(&args.input) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("gbpatch: {}: {e}", args.input.display());
            return 1;
        }
    };

    let records = match read_records(&patch) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("gbpatch: invalid IPS patch: {e}");
            return 1;
        }
    };

    println!("  Offset  Length");
    for rec in &records {
        println!("  {:06X}  {:6}", rec.offset, rec.data.len());
    }
    println!("{} record(s)", records.len());

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let exit_code = match &cli.command {
        Cmd::Diff(args) => cmd_diff(&cli, args),
        Cmd::Patch(args) => cmd_patch(&cli, args),
        Cmd::Apply(args) => cmd_apply(&cli, args),
        Cmd::Records(args) => cmd_records(args),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
