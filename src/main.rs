use anyhow::Result;
use campaign_retry::commands::{self, RequestArgs, config::ConfigOverrides};
use clap::Parser;
use std::path::PathBuf;

/// campaign-retry - resubmit failed voice-campaign calls
///
/// Validates a retry request locally, then sends it to
/// `{api-base}/voice-campaigns/retry` with the current session token.
///
/// The token is read from CAMPAIGN_AUTH_TOKEN, or from the session file
/// (`{"authToken": "..."}`) when the variable is unset.
///
/// Examples:
///   campaign-retry retry 7f14b5e4-69ea-4803-9c62-a5946bc2cc9c --max-attempts 3
///   campaign-retry validate --input request.json
#[derive(Parser, Debug)]
#[command(author, version = env!("CAMPAIGN_RETRY_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API base URL (also via CAMPAIGN_API_BASE)
    #[arg(long = "api-base", value_name = "URL", global = true)]
    pub api_base: Option<String>,

    /// Request timeout in milliseconds (also via CAMPAIGN_TIMEOUT_MS; default 10000)
    #[arg(long = "timeout-ms", value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Session file holding the auth token (also via CAMPAIGN_SESSION_FILE)
    #[arg(long = "session-file", value_name = "PATH", global = true)]
    pub session_file: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Retry failed calls for the given campaigns
    Retry(RetryArgs),

    /// Check a retry request without sending it
    Validate(RequestFlags),
}

#[derive(clap::Args, Debug)]
pub struct RequestFlags {
    /// Campaign identifiers (UUIDs)
    #[arg(value_name = "CAMPAIGN_ID")]
    pub campaign_ids: Vec<String>,

    /// Maximum attempts per failed call (1-5, default 3)
    #[arg(long = "max-attempts", allow_negative_numbers = true)]
    pub max_attempts: Option<i64>,

    /// Delay between attempts in milliseconds (at least 1000, default 1000)
    #[arg(long = "delay-ms", allow_negative_numbers = true)]
    pub delay_ms: Option<i64>,

    /// Read the request object from a JSON file; flags override its fields
    #[arg(long = "input", short = 'i', value_name = "FILE")]
    pub input: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct RetryArgs {
    #[command(flatten)]
    pub request: RequestFlags,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl From<RequestFlags> for RequestArgs {
    fn from(flags: RequestFlags) -> Self {
        RequestArgs {
            campaign_ids: flags.campaign_ids,
            max_attempts: flags.max_attempts,
            delay_ms: flags.delay_ms,
            input: flags.input,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = campaign_retry::runtime::RealRuntime;

    let overrides = ConfigOverrides {
        api_base: cli.api_base,
        timeout_ms: cli.timeout_ms,
        session_file: cli.session_file,
    };

    match cli.command {
        Commands::Retry(args) => {
            commands::retry(runtime, overrides, args.request.into(), args.json).await?
        }
        Commands::Validate(flags) => commands::validate(runtime, flags.into())?,
    }
    Ok(())
}
