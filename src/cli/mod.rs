use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod cache;
pub mod lunar;
pub mod month;
pub mod serve;

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
    /// Print a month grid with lunar dates, solar terms and holidays
    Month {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
    /// Convert a solar date (YYYY-MM-DD) to the Korean lunar calendar
    Lunar {
        #[arg(long)]
        date: String,
    },
    /// Remove cached upstream responses
    ClearCache {
        /// Only remove this key, e.g. `public:v1:2024-02`
        #[arg(long)]
        key: Option<String>,
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
        Some(Command::Month { year, month }) => {
            month::run(year, month).await?;
        }
        Some(Command::Lunar { date }) => {
            lunar::run(&date)?;
        }
        Some(Command::ClearCache { key }) => {
            cache::run(key).await;
        }
        None => {}
    }

    Ok(())
}
