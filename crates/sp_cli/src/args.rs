//! CLI argument surface and pre-run checks.
//!
//! - Inputs: `--table` (CSV) and `--config` (scenario JSON), both required.
//! - Outputs: `--out` overrides the scenario's `outputPath`; `--report` and
//!   `--record` are optional extra artifacts.
//! - No networked paths: anything with a URI scheme is rejected.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "seatproj",
    version,
    disable_help_subcommand = true,
    about = "Project district results and apportion seats from national vote targets"
)]
pub struct Args {
    /// Baseline table CSV (district, population, one percentage column per party).
    #[arg(long)]
    pub table: PathBuf,

    /// Scenario JSON (national targets, turnout, tactical rules, ...).
    #[arg(long)]
    pub config: PathBuf,

    /// District table output path (overrides the scenario's outputPath).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Total seats (overrides the scenario's totalSeats).
    #[arg(long)]
    pub total_seats: Option<u32>,

    /// Write the JSON report here.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write the run record here.
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Load and validate inputs only; write nothing.
    #[arg(long)]
    pub validate_only: bool,

    /// No stdout summary; errors only on stderr.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Debug-level logs on stderr.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug)]
pub enum CliError {
    NonLocalPath(String),
    NotFound(String),
    SamePath(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            NonLocalPath(p) => write!(f, "path must be a local file (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            SamePath(p) => write!(f, "output would overwrite an input: {p}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Parse `std::env::args` and run the pre-run checks.
pub fn parse_and_validate() -> Result<Args, CliError> {
    let args = Args::parse();
    validate(&args)?;
    Ok(args)
}

pub fn validate(args: &Args) -> Result<(), CliError> {
    for p in iter_all_paths(args) {
        ensure_local_path(p)?;
    }
    ensure_exists(&args.table, "--table")?;
    ensure_exists(&args.config, "--config")?;

    for out in [args.out.as_deref(), args.report.as_deref(), args.record.as_deref()]
        .into_iter()
        .flatten()
    {
        ensure_not_input(args, out)?;
    }
    Ok(())
}

/// Also run on output paths resolved after parsing (the scenario's `outputPath`).
pub fn ensure_not_input(args: &Args, out: &Path) -> Result<(), CliError> {
    let inputs = [args.table.as_path(), args.config.as_path()];
    if inputs.iter().any(|i| same_file(i, out)) {
        return Err(CliError::SamePath(out.display().to_string()));
    }
    Ok(())
}

#[inline]
fn has_scheme(s: &str) -> bool {
    let lower = s.trim().to_ascii_lowercase();
    lower.contains("://") || lower.starts_with("http:") || lower.starts_with("https:") || lower.starts_with("file:")
}

fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if has_scheme(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn ensure_exists(p: &Path, label: &'static str) -> Result<(), CliError> {
    match fs::metadata(p) {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(CliError::NotFound(format!("{label} {}", p.display()))),
    }
}

fn iter_all_paths(args: &Args) -> impl Iterator<Item = &Path> {
    [
        Some(args.table.as_path()),
        Some(args.config.as_path()),
        args.out.as_deref(),
        args.report.as_deref(),
        args.record.as_deref(),
    ]
    .into_iter()
    .flatten()
}

/// Canonicalized comparison when both exist; plain comparison otherwise.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(v: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("seatproj").chain(v.iter().copied())).unwrap()
    }

    #[test]
    fn scheme_paths_are_rejected() {
        assert!(has_scheme("https://example.org/t.csv"));
        assert!(has_scheme("file:/tmp/x"));
        assert!(!has_scheme("data/tábla.csv"));
    }

    #[test]
    fn flags_parse() {
        let a = parse(&["--table", "t.csv", "--config", "c.json", "--total-seats", "10", "--quiet"]);
        assert_eq!(a.total_seats, Some(10));
        assert!(a.quiet && !a.verbose);
        assert!(a.out.is_none());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let r = Args::try_parse_from(["seatproj", "--table", "t", "--config", "c", "--quiet", "--verbose"]);
        assert!(r.is_err());
    }

    #[test]
    fn output_may_not_overwrite_input() {
        let dir = tempfile::tempdir().unwrap();
        let t = dir.path().join("t.csv");
        let c = dir.path().join("c.json");
        fs::write(&t, "x").unwrap();
        fs::write(&c, "{}").unwrap();
        let mut a = parse(&["--table", t.to_str().unwrap(), "--config", c.to_str().unwrap()]);
        assert!(validate(&a).is_ok());
        a.out = Some(t.clone());
        assert!(matches!(validate(&a), Err(CliError::SamePath(_))));
    }

    #[test]
    fn missing_inputs_are_reported() {
        let a = parse(&["--table", "/nonexistent/t.csv", "--config", "/nonexistent/c.json"]);
        assert!(matches!(validate(&a), Err(CliError::NotFound(m)) if m.starts_with("--table")));
    }
}
