//! `sshclaude-console`: command-line console for the sshclaude provisioning API.
//!
//! Each subcommand mirrors one console screen: it issues a single request
//! through `console_core::Console` and prints either the result or the
//! error message as-is.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console_core::{
    config, ApiClient, Console, LoginEvent, LoginRecord, RequestConfig, UreqTransport,
    DEFAULT_SERVICE,
};
use tracing_subscriber::EnvFilter;

/// sshclaude console — login history, key rotation, and service removal.
#[derive(Parser)]
#[command(
    name = "sshclaude-console",
    version,
    about = "sshclaude console — inspect and manage a provisioned SSH service",
    long_about = None,
    after_help = "Environment variables:\n  \
        SSHCLAUDE_API_BASE    API base URL (e.g. https://api.sshclaude.dev)\n  \
        SSHCLAUDE_API_TOKEN   Bearer token sent as Authorization header\n  \
        RUST_LOG              Log filter (default: error)"
)]
struct Cli {
    /// API base URL prepended to every request path.
    #[arg(long, env = config::BASE_URL_VAR, default_value = "")]
    base: String,

    /// Bearer token.
    #[arg(long, env = config::TOKEN_VAR, hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show recorded logins for a service.
    History {
        #[arg(default_value = DEFAULT_SERVICE)]
        id: String,
    },
    /// Rotate the service's SSH host key.
    RotateKey {
        #[arg(default_value = DEFAULT_SERVICE)]
        id: String,
    },
    /// Delete a provisioned service.
    DeleteService {
        #[arg(default_value = DEFAULT_SERVICE)]
        id: String,
        /// Tunnel token proving ownership, if the server requires one.
        #[arg(long)]
        tunnel_token: Option<String>,
    },
    /// Show the Cloudflare resources behind a service.
    Provision {
        #[arg(default_value = DEFAULT_SERVICE)]
        id: String,
    },
    /// Record a login against a service.
    RecordLogin {
        #[arg(default_value = DEFAULT_SERVICE)]
        id: String,
        #[arg(long)]
        user: String,
        #[arg(long)]
        ip: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    tracing::debug!(base = %cli.base, token_set = cli.token.is_some(), "console starting");
    let console = Console::new(ApiClient::<_, UreqTransport>::new(RequestConfig::new(
        cli.base, cli.token,
    )));

    match cli.command {
        Commands::History { id } => {
            for record in &console.login_history(&id)? {
                println!("{}", format_login(record));
            }
        }
        Commands::RotateKey { id } => println!("{}", console.rotate_key(&id)?.status),
        Commands::DeleteService { id, tunnel_token } => {
            println!("{}", console.delete_service(&id, tunnel_token.as_deref())?.status);
        }
        Commands::Provision { id } => {
            let p = console.provision(&id)?;
            println!("tunnel_id      {}", p.tunnel_id);
            println!("dns_record_id  {}", p.dns_record_id);
            println!("access_app_id  {}", p.access_app_id);
        }
        Commands::RecordLogin { id, user, ip } => {
            let event = LoginEvent { user, ip };
            println!("{}", console.record_login(&id, &event)?.status);
        }
    }
    Ok(())
}

fn format_login(record: &LoginRecord) -> String {
    format!("{} from {} at {}", record.user, record.ip, record.timestamp)
}
