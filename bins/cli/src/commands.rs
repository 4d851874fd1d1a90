//! Command handlers.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use dutch_core::report::{render_chat_block, render_summary};
use dutch_core::settlement::{
    SettlementRequest, SettlementResult, SettlementService, ValidationIssue, ValidationReport,
};
use dutch_shared::{AppConfig, AppError, format_amount, parse_amount};
use tracing::{debug, info};

use crate::cli::{Cli, Command, OutputFormat};

/// Runs the parsed command, writing its output to `out`.
pub fn execute(cli: &Cli, out: &mut impl Write) -> Result<()> {
    match &cli.command {
        Command::ParseAmount { text } => {
            writeln!(out, "{}", parse_amount(text)).map_err(AppError::from)?;
        }
        Command::Check { input } => {
            let config = load_config(cli.config.as_deref())?;
            let mut request = parse_request(&read_input(input)?)?;

            let report = SettlementService::check(&mut request, &config.settlement);
            out.write_all(check_text(&report, config.report.max_listed_issues).as_bytes())
                .map_err(AppError::from)?;

            if !report.is_clean() {
                return Err(AppError::Validation(format!(
                    "{} issue(s) found",
                    report.issues.len()
                ))
                .into());
            }
        }
        Command::Settle { input, format } => {
            let config = load_config(cli.config.as_deref())?;
            let mut request = parse_request(&read_input(input)?)?;

            let result = SettlementService::run(&mut request, &config.settlement).map_err(
                |failure| {
                    AppError::Validation(checklist(
                        &failure.issues,
                        config.report.max_listed_issues,
                    ))
                },
            )?;
            info!(total = %total_line(&result), "Settlement rendered");
            writeln!(out, "{}", render(&result, &request, *format)?).map_err(AppError::from)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path)
            .map_err(AppError::from)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AppConfig::load().map_err(AppError::from)?,
    };
    debug!(policy = ?config.settlement, "Configuration loaded");
    Ok(config)
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(AppError::from)
            .context("reading request from stdin")?;
        return Ok(text);
    }

    let text = fs::read_to_string(path)
        .map_err(AppError::from)
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(text)
}

/// Parses a request document and fills in attendance left unspecified.
pub fn parse_request(text: &str) -> Result<SettlementRequest, AppError> {
    let mut request: SettlementRequest =
        serde_json::from_str(text).map_err(|e| AppError::InvalidInput(e.to_string()))?;
    request.select_missing_attendees();

    info!(
        participants = request.roster.len(),
        rounds = request.rounds.len(),
        "Request loaded"
    );
    Ok(request)
}

/// Blocking issues as a bullet list, cut off after `limit` entries.
pub fn checklist(issues: &[ValidationIssue], limit: usize) -> String {
    let mut lines = vec!["Needs attention:".to_string()];
    lines.extend(issues.iter().take(limit).map(|issue| format!("- {issue}")));
    if issues.len() > limit {
        lines.push("- …".to_string());
    }
    lines.join("\n")
}

fn check_text(report: &ValidationReport, limit: usize) -> String {
    let mut lines: Vec<String> = report
        .notices
        .iter()
        .map(|notice| format!("Note: {notice}"))
        .collect();
    if report.is_clean() {
        lines.push("Ready to settle.".to_string());
    } else {
        lines.push(checklist(&report.issues, limit));
    }
    lines.push(String::new());
    lines.join("\n")
}

/// Renders a settlement in the requested format.
pub fn render(
    result: &SettlementResult,
    request: &SettlementRequest,
    format: OutputFormat,
) -> Result<String, AppError> {
    match format {
        OutputFormat::Chat => Ok(render_chat_block(result)),
        OutputFormat::Summary => Ok(render_summary(result, &request.collection)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).map_err(|e| AppError::Internal(e.to_string()))
        }
    }
}

/// Grand total line used in logs.
fn total_line(result: &SettlementResult) -> String {
    format!(
        "{} across {} participant(s)",
        format_amount(result.total()),
        result.participants.len()
    )
}
