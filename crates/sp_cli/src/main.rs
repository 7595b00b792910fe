//! `seatproj`: read a baseline table and a scenario, run the projection,
//! write the district table (and optionally the report and run record).
//!
//! Every artifact is rendered in memory first; nothing is written unless the
//! whole run succeeded.

mod args;

mod exitcodes {
    pub const OK: u8 = 0;
    /// Bad flags, schema or config errors.
    pub const VALIDATION: u8 = 2;
    /// Read/write/path failures.
    pub const IO: u8 = 4;
    /// The scenario cannot be computed (zero baseline, no eligible party, ...).
    pub const COMPUTE: u8 = 5;
}

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use args::{ensure_not_input, parse_and_validate as parse_cli, Args, CliError};
use sp_io::canonical_json::{to_canonical_bytes, write_all_atomic};
use sp_io::config::{load_scenario, ScenarioConfig};
use sp_io::IoError;
use sp_pipeline::PipelineError;
use sp_report::{build_model, render_json, render_text};

#[derive(Debug)]
enum MainError {
    Validation(String),
    Io(String),
    Compute(String),
    Render(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) => write!(f, "validation: {m}"),
            MainError::Io(m) => write!(f, "io: {m}"),
            MainError::Compute(m) => write!(f, "computation: {m}"),
            MainError::Render(m) => write!(f, "report: {m}"),
        }
    }
}

fn main() -> ExitCode {
    let args = match parse_cli() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("seatproj: error: {e}");
            let rc = match e {
                CliError::NotFound(_) => exitcodes::IO,
                _ => exitcodes::VALIDATION,
            };
            return ExitCode::from(rc);
        }
    };
    init_tracing(&args);

    let outcome = if args.validate_only { validate_only(&args) } else { run_once(&args) };
    let rc = match outcome {
        Ok(()) => exitcodes::OK,
        Err(e) => {
            eprintln!("seatproj: error: {e}");
            map_error(&e)
        }
    };
    ExitCode::from(rc)
}

/// stderr only; `--verbose`/`--quiet` win over `RUST_LOG`.
fn init_tracing(args: &Args) {
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else if args.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(args: &Args) -> Result<ScenarioConfig, MainError> {
    let mut cfg = load_scenario(&args.config).map_err(map_io_err)?;
    if let Some(seats) = args.total_seats {
        debug!(from = cfg.total_seats, to = seats, "total seats overridden on the command line");
        cfg.total_seats = seats;
    }
    Ok(cfg)
}

/// Load and validate both inputs; no computation, no output.
fn validate_only(args: &Args) -> Result<(), MainError> {
    let cfg = load_config(args)?;
    let bytes = fs::read(&args.table)
        .map_err(|e| MainError::Io(format!("{}: {e}", args.table.display())))?;
    let loaded = sp_pipeline::load::load(&bytes, &cfg).map_err(map_pipeline_err)?;
    if !args.quiet {
        eprintln!(
            "validate-only: inputs OK ({} districts, {} parties)",
            loaded.table.districts().len(),
            loaded.table.roster().len()
        );
    }
    Ok(())
}

fn run_once(args: &Args) -> Result<(), MainError> {
    let cfg = load_config(args)?;
    let out_path = args.out.clone().unwrap_or_else(|| PathBuf::from(&cfg.output_path));
    ensure_not_input(args, &out_path).map_err(|e| MainError::Validation(e.to_string()))?;

    let outs = sp_pipeline::run_from_path(&args.table, &cfg).map_err(map_pipeline_err)?;

    // Render everything before the first write.
    let result_json =
        serde_json::to_value(&outs.result).map_err(|e| MainError::Render(e.to_string()))?;
    let record_json =
        serde_json::to_value(&outs.run_record).map_err(|e| MainError::Render(e.to_string()))?;
    let model = build_model(&result_json, &record_json).map_err(|e| MainError::Render(e.to_string()))?;
    let report = match &args.report {
        Some(_) => Some(render_json(&model).map_err(|e| MainError::Render(e.to_string()))?),
        None => None,
    };
    let record = match &args.record {
        Some(_) => Some(to_canonical_bytes(&outs.run_record).map_err(map_io_err)?),
        None => None,
    };
    let summary = render_text(&model);

    let mut files: Vec<(&Path, &[u8])> = vec![(out_path.as_path(), outs.district_csv.as_slice())];
    if let (Some(path), Some(text)) = (&args.report, &report) {
        files.push((path.as_path(), text.as_bytes()));
    }
    if let (Some(path), Some(bytes)) = (&args.record, &record) {
        files.push((path.as_path(), bytes.as_slice()));
    }
    write_all_atomic(&files).map_err(map_io_err)?;

    info!(path = %out_path.display(), "district table written");
    if let Some(path) = &args.report {
        info!(path = %path.display(), "report written");
    }
    if let Some(path) = &args.record {
        info!(path = %path.display(), run_id = %outs.run_record.id, "run record written");
    }

    if !args.quiet {
        print!("{summary}");
    }
    Ok(())
}

fn map_error(e: &MainError) -> u8 {
    use exitcodes::*;
    match e {
        MainError::Validation(_) => VALIDATION,
        MainError::Io(_) => IO,
        MainError::Compute(_) => COMPUTE,
        MainError::Render(_) => IO,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Path(m) => MainError::Io(m),
        e @ (IoError::Csv(_) | IoError::Json { .. } | IoError::Schema(_) | IoError::Invalid(_)) => {
            MainError::Validation(e.to_string())
        }
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    match e {
        PipelineError::Io(io) => map_io_err(io),
        e @ (PipelineError::Project(_) | PipelineError::Allocate(_) | PipelineError::Build(_)) => {
            MainError::Compute(e.to_string())
        }
    }
}
