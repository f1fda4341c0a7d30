use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod cancel;
pub mod serve;
pub mod upcoming;

use crate::appointments::FormatContext;
use crate::backend::HttpBackend;
use crate::core::AppConfig;
use crate::dashboard::Dashboard;
use crate::session::{ReadOnlyCookies, SessionContext};

#[derive(Subcommand)]
enum Command {
    /// Run the API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// List upcoming appointments
    Upcoming {
        /// Number of appointments to fetch
        #[arg(long)]
        take: Option<usize>,
        /// Print the view models as JSON
        #[arg(long, action, default_value = "false")]
        json: bool,
    },
    /// Cancel an upcoming appointment
    Cancel {
        #[arg(long)]
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, action, default_value = "false")]
        yes: bool,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port).await?;
        }
        Some(Command::Upcoming { take, json }) => {
            upcoming::run(take, json).await?;
        }
        Some(Command::Cancel { id, yes }) => {
            cancel::run(id, yes).await?;
        }
        None => {}
    }

    Ok(())
}

/// A dashboard acting as the user whose cookies are in
/// `SALON_SESSION_COOKIE`
fn dashboard(config: &AppConfig) -> Result<Dashboard<HttpBackend<ReadOnlyCookies>>> {
    let cookies = config
        .session_cookies
        .as_deref()
        .map(ReadOnlyCookies::from_header)
        .unwrap_or_default();
    let session = SessionContext::new(config, cookies)?;
    if !session.has_auth_session() {
        tracing::warn!("No Supabase auth cookie in SALON_SESSION_COOKIE, requests are anonymous");
    }

    let backend = HttpBackend::new(reqwest::Client::new(), &config.api_base_url, session);
    let dashboard = Dashboard::builder(backend, FormatContext::local(config.locale))
        .take(config.upcoming_take)
        .build();
    Ok(dashboard)
}

fn init_cli_tracing() {
    crate::core::init_tracing(&format!("{}=info", env!("CARGO_CRATE_NAME")));
}
