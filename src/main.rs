mod errors;
mod measurements;
mod ookla;

use crate::errors::{format_error_for_display, SubmitError};
use crate::measurements::Measurement;
use crate::ookla::client::Client;
use crate::ookla::requests::save::{share_url, SaveResult};
use crate::ookla::signature::DEFAULT_API_KEY;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colored::Colorize;
use std::process;
use url::Url;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Download speed to report, in Mbps (capped at 9999)
    #[arg(long)]
    download: String,

    /// Upload speed to report, in Mbps (capped at 9999)
    #[arg(long)]
    upload: String,

    /// Idle latency to report, in milliseconds
    #[arg(long, default_value = "8")]
    idle_latency: String,

    /// Latency under download load, in milliseconds
    #[arg(long, default_value = "10")]
    download_latency: String,

    /// Latency under upload load, in milliseconds
    #[arg(long, default_value = "12")]
    upload_latency: String,

    /// Server the result claims to have run against
    #[arg(long, default_value_t = 27961)]
    server_id: i64,

    /// API key mixed into the submission signature
    #[arg(long, default_value = DEFAULT_API_KEY)]
    api_key: String,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    match run(&cli).await {
        Ok(url) => {
            println!(
                "{} {}",
                "Result link:".bold().white(),
                url.as_str().bright_cyan()
            );
        }
        Err(error) => {
            eprintln!("{}", format_error_for_display(&error).red());
            process::exit(error.exit_code());
        }
    }
}

async fn run(cli: &Cli) -> Result<Url, SubmitError> {
    let measurement = Measurement::new(
        &cli.upload,
        &cli.download,
        &cli.upload_latency,
        &cli.download_latency,
        &cli.idle_latency,
        cli.server_id,
        &cli.api_key,
    )?;

    let client = Client::new();
    let response = client.send(SaveResult::new(&measurement)).await?;
    let result_id = response.result_id()?;

    Ok(share_url(&result_id))
}
