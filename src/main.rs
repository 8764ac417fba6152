//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::helpers::date::{parse_timezone, ZonedTimer};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A small portfolio web server", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "8000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Load the content directory and list its groups
    Check {
        /// Print the whole content index as JSON
        #[arg(long)]
        dump: bool,
    },

    /// Fetch a remote image and report its format and size
    Probe {
        /// Image URL
        url: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let site = folio::Site::new(&base_dir)?;

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };
    let (tz, known_tz) = parse_timezone(&site.config.timezone);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(ZonedTimer::new(tz)))
        .init();

    if !known_tz {
        tracing::warn!("Unknown timezone {:?}, logging in UTC", site.config.timezone);
    }

    match cli.command {
        Commands::Server { port, ip } => {
            tracing::info!("Starting server for {:?}", site.base_dir);
            folio::server::start(&site, &ip, port).await?;
        }

        Commands::Check { dump } => {
            folio::commands::check::run(&site, dump)?;
        }

        Commands::Probe { url } => {
            folio::commands::probe::run(&site, &url).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
