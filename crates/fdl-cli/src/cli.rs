//! Command-line interface for `fdl`.
//!
//! Formats, checks and lints `.fdl` documents on disk (or stdin via `-`).

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use fdl_core::{
    ExportOptions, FormatConfig, LintDiagnostic, LintSeverity, ParseError, format_document, lint_document,
    parse_document,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// fdl - format, check and lint FDL UI documents
#[derive(Parser, Debug)]
#[command(name = "fdl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite documents in canonical form
    Fmt(FmtArgs),

    /// Parse documents and report syntax errors
    Check {
        /// Files to check (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Report structural problems in documents
    Lint {
        /// Files to lint (use - for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Also fail on informational findings
        #[arg(long)]
        strict: bool,
    },
}

#[derive(Args, Debug)]
pub struct FmtArgs {
    /// Files to format (use - for stdin)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Exit with an error if any file is not already formatted
    #[arg(long, conflicts_with = "write")]
    pub check: bool,

    /// Write the result back to each file instead of printing it
    #[arg(long)]
    pub write: bool,

    /// Leave out every `#id`
    #[arg(long)]
    pub no_ids: bool,

    /// Leave out ids the parser generated for anonymous nodes (`n_1`, ...)
    #[arg(long)]
    pub omit_generated_ids: bool,

    /// Keep nodes the root cannot reach instead of dropping them
    #[arg(long)]
    pub keep_unreachable: bool,
}

impl FmtArgs {
    pub fn config(&self) -> FormatConfig {
        FormatConfig {
            export: ExportOptions {
                include_ids: !self.no_ids,
                omit_generated_ids: self.omit_generated_ids,
            },
            prune_unreachable: !self.keep_unreachable,
        }
    }
}

/// Run a parsed command line. Returns `Ok(false)` when some input failed
/// (syntax error, unformatted file, lint warning) so `main` can exit with 1.
pub fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Fmt(args) => run_fmt(&args),
        Commands::Check { files } => run_check(&files),
        Commands::Lint { files, strict } => run_lint(&files, strict),
    }
}

fn run_fmt(args: &FmtArgs) -> Result<bool> {
    let config = args.config();
    let mut ok = true;
    for path in &args.files {
        if args.write && is_stdin(path) {
            bail!("--write cannot be used with stdin");
        }
        let source = read_source(path)?;
        let formatted = match format_document(&source, &config) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("{}", parse_error_line(path, &err));
                ok = false;
                continue;
            }
        };

        if args.check {
            if formatted != source {
                eprintln!("{}: not formatted", path.display());
                ok = false;
            }
        } else if args.write {
            if formatted != source {
                fs::write(path, &formatted).with_context(|| format!("failed to write {}", path.display()))?;
                log::info!("formatted {}", path.display());
            }
        } else {
            print!("{formatted}");
        }
    }
    Ok(ok)
}

fn run_check(files: &[PathBuf]) -> Result<bool> {
    let mut ok = true;
    for path in files {
        let source = read_source(path)?;
        match parse_document(&source) {
            Ok(doc) => log::debug!("{}: ok ({} nodes)", path.display(), doc.nodes.len()),
            Err(err) => {
                eprintln!("{}", parse_error_line(path, &err));
                ok = false;
            }
        }
    }
    Ok(ok)
}

fn run_lint(files: &[PathBuf], strict: bool) -> Result<bool> {
    let mut ok = true;
    for path in files {
        let source = read_source(path)?;
        let doc = match parse_document(&source) {
            Ok(doc) => doc,
            Err(err) => {
                eprintln!("{}", parse_error_line(path, &err));
                ok = false;
                continue;
            }
        };
        for diag in lint_document(&doc) {
            println!("{}", diagnostic_line(path, &diag));
            if strict || diag.severity == LintSeverity::Warning {
                ok = false;
            }
        }
    }
    Ok(ok)
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn read_source(path: &Path) -> Result<String> {
    if is_stdin(path) {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// `path:line: message`, or `path: message` when the error has no line.
fn parse_error_line(path: &Path, err: &ParseError) -> String {
    match err.line() {
        Some(line) => format!("{}:{line}: error: {err}", path.display()),
        None => format!("{}: error: {err}", path.display()),
    }
}

fn diagnostic_line(path: &Path, diag: &LintDiagnostic) -> String {
    let severity = match diag.severity {
        LintSeverity::Warning => "warning",
        LintSeverity::Info => "info",
    };
    match &diag.node_id {
        Some(id) => format!("{}: {severity}[{}] #{id}: {}", path.display(), diag.rule, diag.message),
        None => format!("{}: {severity}[{}]: {}", path.display(), diag.rule, diag.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fdl_core::NodeId;

    #[test]
    fn fmt_flags_map_to_config() {
        let cli = Cli::try_parse_from(["fdl", "fmt", "--no-ids", "--keep-unreachable", "a.fdl"]).unwrap();
        let Commands::Fmt(args) = cli.command else {
            panic!("expected fmt");
        };
        let config = args.config();
        assert!(!config.export.include_ids);
        assert!(!config.prune_unreachable);
        assert_eq!(args.files, vec![PathBuf::from("a.fdl")]);
    }

    #[test]
    fn fmt_check_conflicts_with_write() {
        assert!(Cli::try_parse_from(["fdl", "fmt", "--check", "--write", "a.fdl"]).is_err());
    }

    #[test]
    fn files_are_required() {
        assert!(Cli::try_parse_from(["fdl", "check"]).is_err());
        assert!(Cli::try_parse_from(["fdl", "lint"]).is_err());
    }

    #[test]
    fn verbosity_is_global() {
        let cli = Cli::try_parse_from(["fdl", "lint", "-vv", "x.fdl"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn parse_error_lines() {
        let path = Path::new("screens/login.fdl");
        let err = ParseError::UnknownNodeType {
            line: 7,
            keyword: "button".into(),
        };
        assert_eq!(
            parse_error_line(path, &err),
            "screens/login.fdl:7: error: line 7: unknown node type `button`"
        );
        assert_eq!(
            parse_error_line(path, &ParseError::Empty),
            "screens/login.fdl: error: empty document"
        );
    }

    #[test]
    fn diagnostic_lines() {
        let diag = LintDiagnostic {
            node_id: Some(NodeId::new("root")),
            message: "msg".into(),
            severity: LintSeverity::Warning,
            rule: "child-cycle",
        };
        assert_eq!(
            diagnostic_line(Path::new("a.fdl"), &diag),
            "a.fdl: warning[child-cycle] #root: msg"
        );
    }

    #[test]
    fn check_and_fmt_write_on_disk() {
        let dir = std::env::temp_dir().join(format!("fdl-cli-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.fdl");
        let bad = dir.join("bad.fdl");
        fs::write(&good, "dsl:1\nframe  Home\n    col#root - padding 8\n").unwrap();
        fs::write(&bad, "dsl:1\nframe Home\n  widget\n").unwrap();

        assert!(run_check(std::slice::from_ref(&good)).unwrap());
        assert!(!run_check(&[good.clone(), bad.clone()]).unwrap());

        let args = FmtArgs {
            files: vec![good.clone()],
            check: false,
            write: true,
            no_ids: false,
            omit_generated_ids: false,
            keep_unreachable: false,
        };
        assert!(run_fmt(&args).unwrap());
        assert_eq!(
            fs::read_to_string(&good).unwrap(),
            "dsl:1\nframe Home\n  column#root - pad 8\n"
        );
        let check = FmtArgs {
            check: true,
            write: false,
            ..args
        };
        assert!(run_fmt(&check).unwrap());

        fs::remove_dir_all(&dir).unwrap();
    }
}
