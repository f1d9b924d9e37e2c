//! brgy: command-line client for residency verification on the barangay portal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use brgy_portal::{
    PortalConfig, PortalEvent, SessionError, ShutdownController, StatusPoller,
    VerificationSession,
};
use brgy_resident::ReceiptSubmission;
use brgy_types::{media, BeneficiaryId, ResidentId, UploadFile};
use clap::Parser;
use tokio::sync::broadcast;

#[derive(Parser)]
#[command(name = "brgy", about = "Barangay portal residency verification client")]
struct Cli {
    /// Resident account the session belongs to (keys the one-time flags).
    #[arg(long, env = "BRGY_RESIDENT")]
    resident: ResidentId,

    /// Portal API root, e.g. "https://portal.example.gov.ph/api".
    #[arg(long, env = "BRGY_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token issued by the portal's auth service.
    #[arg(long, env = "BRGY_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// File holding persisted flags.
    #[arg(long, env = "BRGY_FLAG_STORE")]
    flag_store: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "BRGY_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "BRGY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "BRGY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show the current verification record and step.
    Status,
    /// Poll until verification is approved or interrupted.
    Watch,
    /// Upload a residency document (JPEG, PNG or other image, up to 5 MB).
    Upload {
        #[arg(long)]
        file: PathBuf,
    },
    /// Confirm receipt of a benefit payout.
    ValidateReceipt {
        #[arg(long)]
        beneficiary: BeneficiaryId,
        #[arg(long)]
        receipt: String,
        #[arg(long)]
        comment: Option<String>,
        /// Photo or PDF of the signed receipt.
        #[arg(long)]
        proof: Option<PathBuf>,
    },
    /// List benefit enrollments and their tracking stage.
    Benefits,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = layered_config(&cli)?;

    brgy_utils::init_logging(config.log_format()?, &config.log_level)
        .context("failed to initialise logging")?;
    tracing::debug!(base_url = %config.base_url, "configuration loaded");

    let session = VerificationSession::from_config(&config, cli.resident.clone())?;

    match cli.command {
        Command::Status => {
            session.load([]).await.map_err(user_facing)?;
            print_status(&session).await?;
        }
        Command::Watch => watch(&session).await?,
        Command::Upload { file } => {
            let document = read_upload(&file).await?;
            session.load([]).await.map_err(user_facing)?;
            session.upload(&document).await.map_err(user_facing)?;
            print_status(&session).await?;
        }
        Command::ValidateReceipt {
            beneficiary,
            receipt,
            comment,
            proof,
        } => {
            let mut submission = ReceiptSubmission::new(receipt);
            if let Some(comment) = comment {
                submission = submission.with_comment(comment);
            }
            if let Some(proof) = proof {
                submission = submission.with_proof(read_upload(&proof).await?);
            }
            let tracking = session
                .validate_receipt(&beneficiary, &submission)
                .await
                .map_err(user_facing)?;
            println!("{}", serde_json::to_string_pretty(&tracking)?);
        }
        Command::Benefits => {
            let tracking = session.benefits().await.map_err(user_facing)?;
            println!("{}", serde_json::to_string_pretty(&tracking)?);
        }
    }

    Ok(())
}

/// File settings as the base, CLI flags and env vars on top.
fn layered_config(cli: &Cli) -> anyhow::Result<PortalConfig> {
    let mut config = match &cli.config {
        Some(path) => PortalConfig::from_toml_file(path)?,
        None => PortalConfig::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(token) = &cli.api_token {
        config.api_token = Some(token.clone());
    }
    if let Some(path) = &cli.flag_store {
        config.flag_store_path = path.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log_format = format.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

fn user_facing(e: SessionError) -> anyhow::Error {
    tracing::debug!(error = %e, "operation failed");
    anyhow::anyhow!(e.user_message())
}

async fn read_upload(path: &Path) -> anyhow::Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let media_type = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(media::from_extension)
        .unwrap_or(media::OCTET_STREAM);
    Ok(UploadFile::new(file_name, media_type, bytes))
}

async fn print_status(session: &VerificationSession) -> anyhow::Result<()> {
    let record = session.record().await;
    let step = session.step().await;
    let view = serde_json::json!({
        "record": record,
        "step": step.number(),
        "view": step.as_str(),
    });
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

async fn watch(session: &VerificationSession) -> anyhow::Result<()> {
    session.load([]).await.map_err(user_facing)?;
    print_status(session).await?;
    if session.next_poll_delay().await.is_none() {
        return Ok(());
    }

    let mut events = session.subscribe();
    let mut poller = StatusPoller::new(session.clone());
    poller.start();

    let shutdown = Arc::new(ShutdownController::new());
    let mut stop = shutdown.subscribe();
    let listener = shutdown.listen_for_signals();

    loop {
        tokio::select! {
            _ = stop.stopped() => {
                poller.stop().await;
                break;
            }
            event = events.recv() => match event {
                Ok(PortalEvent::RecordChanged { record, step }) => {
                    println!("status: {} (step {}: {})", record.status, step.number(), step.as_str());
                }
                Ok(PortalEvent::Approved { show_congratulations }) => {
                    if show_congratulations {
                        println!("Congratulations! Your residency has been verified.");
                    }
                    poller.join().await;
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event stream lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    listener.abort();
    Ok(())
}
