// ============================================================
// COMMAND LINE
// ============================================================
// Argument definitions for the scholar-import binary

use crate::domain::enrollment::UpdateMode;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const CONFIG_HELP: &str = "\
Configuration is read from scholar-import.toml (or $SCHOLAR_IMPORT_CONFIG)
and SCHOLAR_IMPORT_* environment variables. Log level follows RUST_LOG.";

#[derive(Debug, Parser)]
#[command(
    name = "scholar-import",
    version,
    about = "Normalize and validate partner-school enrollment CSV exports",
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// Config file to use instead of scholar-import.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Validate an enrollment CSV and print the report
    Validate(ValidateArgs),
    /// Write the example CSV template (stdout by default)
    Template(TemplateArgs),
    /// Validate, then send valid rows to the persistence API
    Upload(UploadArgs),
    /// Start the local HTTP API
    Serve,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[arg(value_name = "OUT")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    #[arg(value_name = "FILE")]
    pub path: PathBuf,
    /// merge (default) or replace; falls back to persistence.default_update_mode
    #[arg(long)]
    pub mode: Option<UpdateMode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clap_parses_validate_json() {
        let cli = Cli::parse_from(["scholar-import", "validate", "students.csv", "--json"]);
        match cli.command {
            CliCommand::Validate(args) => {
                assert_eq!(args.path, PathBuf::from("students.csv"));
                assert!(args.json);
            }
            _ => panic!("expected validate command"),
        }
    }

    #[test]
    fn clap_parses_upload_mode() {
        let cli = Cli::parse_from([
            "scholar-import",
            "upload",
            "students.csv",
            "--mode",
            "replace",
            "--config",
            "prod.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("prod.toml")));
        match cli.command {
            CliCommand::Upload(args) => assert_eq!(args.mode, Some(UpdateMode::Replace)),
            _ => panic!("expected upload command"),
        }
    }

    #[test]
    fn clap_parses_template_and_serve() {
        let cli = Cli::parse_from(["scholar-import", "template"]);
        assert!(matches!(cli.command, CliCommand::Template(TemplateArgs { output: None })));

        let cli = Cli::parse_from(["scholar-import", "serve"]);
        assert!(matches!(cli.command, CliCommand::Serve));
    }

    #[test]
    fn clap_rejects_bad_input() {
        assert!(Cli::try_parse_from(["scholar-import", "validate"]).is_err());
        assert!(Cli::try_parse_from(["scholar-import", "upload", "a.csv", "--mode", "append"]).is_err());
        assert!(Cli::try_parse_from(["scholar-import", "import", "a.csv"]).is_err());
    }
}
