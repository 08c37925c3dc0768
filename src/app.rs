use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::EnrollmentImportUseCase;
use crate::domain::enrollment::{UpdateMode, ValidationOutcome};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::HttpPersistenceClient;
use crate::interfaces::cli::{Cli, CliCommand, TemplateArgs, UploadArgs, ValidateArgs};
use crate::interfaces::http::{add_log, start_server};

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = AppConfig::load(cli.config.as_deref()).map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        err
    })?;
    let use_case = build_use_case(&config)?;

    match cli.command {
        CliCommand::Validate(ValidateArgs { path, json }) => {
            let outcome = use_case.import_file(&path).await?;
            print_outcome(&outcome, json)?;
            Ok(exit_code(&outcome))
        }
        CliCommand::Template(TemplateArgs { output }) => {
            let csv = use_case.template_csv()?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, csv).await?;
                    info!(path = %path.display(), "wrote import template");
                }
                None => print!("{}", csv),
            }
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Upload(UploadArgs { path, mode }) => {
            let mode = mode.unwrap_or_else(|| use_case.default_update_mode());
            upload(&use_case, &path, mode).await
        }
        CliCommand::Serve => {
            let logs = Arc::new(Mutex::new(Vec::new()));
            add_log(
                &logs,
                "INFO",
                "Server",
                &format!(
                    "Listening on {}:{}",
                    config.server.host, config.server.port
                ),
            );
            start_server(
                Arc::new(use_case),
                logs,
                &config.server.host,
                config.server.port,
            )?
            .await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn build_use_case(config: &AppConfig) -> Result<EnrollmentImportUseCase> {
    let mut use_case = EnrollmentImportUseCase::new(config.import.clone())
        .with_default_update_mode(config.persistence.default_update_mode);

    if config.persistence.base_url.is_some() {
        let client = HttpPersistenceClient::new(&config.persistence)?;
        info!(endpoint = %client.endpoint(), "persistence API configured");
        use_case = use_case.with_persistence(Arc::new(client));
    }

    Ok(use_case)
}

async fn upload(
    use_case: &EnrollmentImportUseCase,
    path: &Path,
    mode: UpdateMode,
) -> Result<ExitCode> {
    let outcome = use_case.import_file(path).await?;
    if !outcome.can_upload() {
        eprintln!("{}", outcome.summary());
        eprintln!("Nothing uploaded: fix the rows above and try again.");
        return Ok(ExitCode::FAILURE);
    }

    let receipt = use_case.upload(&outcome, mode).await?;
    let json = serde_json::to_string_pretty(&receipt)
        .map_err(|e| AppError::Internal(format!("Failed to serialize receipt: {}", e)))?;
    println!("{}", json);
    Ok(ExitCode::SUCCESS)
}

fn print_outcome(outcome: &ValidationOutcome, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(outcome)
            .map_err(|e| AppError::Internal(format!("Failed to serialize outcome: {}", e)))?;
        println!("{}", text);
    } else {
        println!("{}", outcome.summary());
    }
    Ok(())
}

fn exit_code(outcome: &ValidationOutcome) -> ExitCode {
    if outcome.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
