use std::path::PathBuf;

use clap::{Parser, Subcommand};
use report_assistant::config::{AppConfig, DEFAULT_MAX_PAYLOAD_BYTES};
use report_assistant::logging::init_logging;
use report_assistant::server::startup;
use report_assistant::submission::{AnalysisClient, Session, Submission, UploadFile};
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "report-assistant")]
#[command(about = "AI powered company report assistant: relay and chat-style client")]
struct CliArgs {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: log::LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the assistant page and the relay to the analysis backend
    Serve {
        /// Host address to bind the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port number to bind the server
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Analysis backend the relay forwards to
        #[arg(long, env = "API_URL")]
        api_url: Option<String>,

        /// Endpoint the page submits to (defaults to this server's /api/proxy)
        #[arg(long)]
        analysis_endpoint: Option<String>,

        /// Upstream request timeout in seconds (no timeout when unset)
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Largest request body accepted by the raw relay
        #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD_BYTES)]
        max_payload_bytes: usize,
    },
    /// Submit one report to a running relay and print the transcript
    Analyze {
        /// Relay endpoint to post to
        #[arg(long, default_value = "http://127.0.0.1:3000/api/proxy")]
        endpoint: String,

        /// Report PDF to upload
        #[arg(long)]
        report: Option<PathBuf>,

        /// Guidelines PDF to upload
        #[arg(long)]
        guidelines: Option<PathBuf>,

        /// Report text to send instead of a PDF
        #[arg(long, default_value = "")]
        text: String,

        /// Guidelines text to send instead of a PDF
        #[arg(long, default_value = "")]
        guidelines_text: String,
    },
}

async fn analyze(
    endpoint: String,
    report: Option<PathBuf>,
    guidelines: Option<PathBuf>,
    text: String,
    guidelines_text: String,
) -> anyhow::Result<()> {
    let report_file = match report {
        Some(path) => Some(UploadFile::from_path(&path).await?),
        None => None,
    };
    let guidelines_file = match guidelines {
        Some(path) => Some(UploadFile::from_path(&path).await?),
        None => None,
    };
    let submission = Submission {
        report_file,
        guidelines_file,
        text,
        guidelines_text,
    };

    let client = AnalysisClient::new(reqwest::Client::new(), endpoint);
    let mut session = Session::new();
    session.submit(&client, &submission).await;
    print!("{}", session.transcript);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_level);

    match args.command {
        Command::Serve {
            host,
            port,
            api_url,
            analysis_endpoint,
            timeout_secs,
            max_payload_bytes,
        } => {
            let config = AppConfig {
                host,
                port,
                api_url,
                analysis_endpoint,
                timeout_secs,
                max_payload_bytes,
            };
            actix_web::rt::System::new().block_on(async move {
                tokio::select! {
                    res = startup(config) => res,
                    _ = signal::ctrl_c() => {
                        log::info!("Received Ctrl+C, shutting down");
                        Ok(())
                    }
                }
            })
        }
        Command::Analyze {
            endpoint,
            report,
            guidelines,
            text,
            guidelines_text,
        } => actix_web::rt::System::new().block_on(analyze(
            endpoint,
            report,
            guidelines,
            text,
            guidelines_text,
        )),
    }
}
