//! Request Contract Checker
//!
//! Validates a request payload from a file or stdin and prints either the
//! normalized request or every violation found.

use anyhow::{Context, Result};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command};
use log_query_contract::config::LoggingConfig;
use log_query_contract::{ContractError, Operation};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;
use tracing::{debug, warn};

fn main() -> Result<ExitCode> {
    let operations: Vec<&'static str> = Operation::ALL.iter().map(Operation::as_str).collect();

    let matches = Command::new("contract_check")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Validate a log query contract payload")
        .arg(
            Arg::new("operation")
                .value_name("OPERATION")
                .help("Request kind to validate")
                .required(true)
                .value_parser(PossibleValuesParser::new(operations)),
        )
        .arg(
            Arg::new("file")
                .value_name("FILE")
                .help("JSON payload file (reads stdin when omitted or '-')"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only set the exit status")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let operation: Operation = matches
        .get_one::<String>("operation")
        .context("operation is required")?
        .parse()?;
    let quiet = matches.get_flag("quiet");

    // stdout carries the JSON result only
    tracing_subscriber::fmt()
        .with_env_filter(LoggingConfig::default().env_filter())
        .with_writer(io::stderr)
        .init();

    let input = match matches.get_one::<String>("file").map(String::as_str) {
        None | Some("-") => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read payload from stdin")?;
            buffer
        }
        Some(path) => fs::read_to_string(path).map_err(|err| ContractError::io(path, err))?,
    };

    let raw: Value = serde_json::from_str(&input).map_err(ContractError::from)?;

    match operation.validate(&raw) {
        Ok(normalized) => {
            debug!("{} payload accepted", operation);
            if !quiet {
                println!("{}", serde_json::to_string_pretty(&normalized)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ContractError::Validation(errors)) => {
            warn!("{} request rejected with {} violation(s)", operation, errors.len());
            if !quiet {
                println!("{}", serde_json::to_string_pretty(&errors)?);
            }
            Ok(ExitCode::FAILURE)
        }
        Err(other) => Err(other.into()),
    }
}
