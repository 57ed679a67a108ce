// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod campaign_commands;
mod pix_commands;

use clap::{error::ErrorKind, ArgAction, Parser, Subcommand};
use doacao_core::{ExitCode, MachineError, ENV_DOACAO_LOG_LEVEL};
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::EnvFilter;

pub const CRATE_NAME: &str = "doacao-cli";

#[derive(Parser)]
#[command(name = "doacao")]
#[command(version)]
#[command(about = "Donation campaign operations CLI")]
#[command(
    after_help = "Environment:\n  DOACAO_LOG_LEVEL   Log filter override (e.g. debug, doacao_settlement=trace)"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build, verify and inspect instant-transfer codes.
    Pix {
        #[command(subcommand)]
        command: PixCommand,
    },
    /// Inspect the campaign catalog and visitor assignment.
    Campaign {
        #[arg(long, global = true)]
        catalog: Option<PathBuf>,
        #[command(subcommand)]
        command: CampaignCommand,
    },
    /// Print the crate version.
    Version,
}

#[derive(Subcommand)]
enum PixCommand {
    Build {
        #[arg(long)]
        key: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        description: String,
        /// 32 lowercase hex characters; generated when omitted.
        #[arg(long)]
        txid: Option<String>,
        /// Also emit the QR rendering as an SVG data URI.
        #[arg(long, default_value_t = false)]
        qr: bool,
    },
    Verify {
        code: String,
    },
    Inspect {
        code: String,
    },
    /// Follow a payment's countdown and settlement status until it is final.
    Watch {
        #[arg(long)]
        status_url: String,
        #[arg(long)]
        payment_id: String,
        /// RFC 3339 expiry of the instruction.
        #[arg(long)]
        expires_at: String,
        #[arg(long, default_value_t = 10_000)]
        poll_interval_ms: u64,
        #[arg(long, default_value_t = 1_000)]
        display_interval_ms: u64,
        #[arg(long, default_value_t = 5_000)]
        timeout_ms: u64,
    },
}

#[derive(Subcommand)]
enum CampaignCommand {
    List,
    Show { slug: String },
    Assign { identifier: String },
}

#[derive(Clone, Copy)]
pub(crate) struct OutputMode {
    pub json: bool,
}

impl OutputMode {
    pub(crate) fn emit(self, payload: &serde_json::Value, human: &str) -> Result<(), CliError> {
        if self.json {
            let text = serde_json::to_string(payload)
                .map_err(|e| CliError::internal(e.to_string()))?;
            println!("{text}");
        } else {
            println!("{human}");
        }
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    pub(crate) fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }

    pub(crate) fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message),
        }
    }
}

impl From<doacao_core::Error> for CliError {
    fn from(err: doacao_core::Error) -> Self {
        Self {
            exit_code: err.kind().exit_code(),
            machine: err.to_machine_error(),
        }
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_env(ENV_DOACAO_LOG_LEVEL)
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    init_logging(cli.verbose, cli.quiet);
    let output = OutputMode { json: cli.json };

    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;
    match command {
        Commands::Version => output.emit(
            &serde_json::json!({"name": "doacao", "version": env!("CARGO_PKG_VERSION")}),
            &format!("doacao {}", env!("CARGO_PKG_VERSION")),
        ),
        Commands::Pix { command } => match command {
            PixCommand::Build {
                key,
                name,
                city,
                amount,
                description,
                txid,
                qr,
            } => pix_commands::build(
                pix_commands::BuildArgs {
                    key,
                    name,
                    city,
                    amount,
                    description,
                    txid,
                    qr,
                },
                output,
            ),
            PixCommand::Verify { code } => pix_commands::verify(&code, output),
            PixCommand::Inspect { code } => pix_commands::inspect(&code, output),
            PixCommand::Watch {
                status_url,
                payment_id,
                expires_at,
                poll_interval_ms,
                display_interval_ms,
                timeout_ms,
            } => pix_commands::watch(
                pix_commands::WatchArgs {
                    status_url,
                    payment_id,
                    expires_at,
                    poll_interval_ms,
                    display_interval_ms,
                    timeout_ms,
                },
                output,
            ),
        },
        Commands::Campaign { catalog, command } => {
            let catalog = campaign_commands::load(catalog.as_deref())?;
            match command {
                CampaignCommand::List => campaign_commands::list(&catalog, output),
                CampaignCommand::Show { slug } => campaign_commands::show(&catalog, &slug, output),
                CampaignCommand::Assign { identifier } => {
                    campaign_commands::assign(&catalog, &identifier, output)
                }
            }
        }
    }
}
