use clap::{ArgAction, Parser, Subcommand, ValueHint};
use hotlist_dl::{BatchDownloader, Config, Error, FeedAggregator, FeedClient, Platform, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "hotlist-dl",
    version,
    about = "Fetch trending lists as JSON and batch-download resources"
)]
struct Cli {
    /// JSON configuration file; built-in defaults when absent
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(long, short = 'v', global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one platform's trending list
    Feed {
        /// Platform code
        #[arg(long, short = 'p', value_parser = parse_platform)]
        platform: Platform,

        /// Maximum number of items
        #[arg(long, short = 'l', value_name = "N")]
        limit: Option<usize>,

        /// Write the JSON here instead of stdout
        #[arg(long, short = 'o', value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long, action = ArgAction::SetTrue)]
        pretty: bool,
    },

    /// Download resource URLs into a directory
    Download {
        /// URLs to download, in order
        #[arg(value_name = "URL")]
        urls: Vec<String>,

        /// File with one URL per line; blank lines and `#` comments are skipped
        #[arg(long, value_hint = ValueHint::FilePath)]
        url_file: Option<PathBuf>,

        /// Output directory
        #[arg(long, short = 'd', value_hint = ValueHint::DirPath, default_value = "downloads")]
        dir: PathBuf,

        /// File name template with one index slot
        #[arg(long, short = 't', default_value = "file_{:03d}")]
        template: String,
    },
}

fn parse_platform(value: &str) -> std::result::Result<Platform, String> {
    Platform::from_code(value).ok_or_else(|| {
        format!(
            "unknown platform '{}', expected one of: {}",
            value,
            Platform::codes().collect::<Vec<_>>().join(", ")
        )
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "info,hotlist_dl=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Feed {
            platform,
            limit,
            output,
            pretty,
        } => {
            let limit = limit.unwrap_or(config.feed.default_limit);
            run_feed(&config, platform, limit, output.as_deref(), pretty).await
        }
        Command::Download {
            urls,
            url_file,
            dir,
            template,
        } => run_download(config, urls, url_file.as_deref(), &dir, &template).await,
    }
}

async fn run_feed(
    config: &Config,
    platform: Platform,
    limit: usize,
    output: Option<&Path>,
    pretty: bool,
) -> Result<ExitCode> {
    let client = FeedClient::new(&config.feed)?;
    let envelope = match FeedAggregator::fetch(&client, platform, limit).await {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::error!(platform = platform.code(), error = %e, "feed fetch failed");
            eprintln!("Error: {e}");
            return Ok(ExitCode::FAILURE);
        }
    };

    // An empty list must not replace earlier output
    if envelope.is_empty() {
        eprintln!("No items found for platform '{}'", platform);
        return Ok(ExitCode::FAILURE);
    }

    let json = if pretty {
        serde_json::to_string_pretty(&envelope)?
    } else {
        serde_json::to_string(&envelope)?
    };
    emit(&json, output).await?;
    Ok(ExitCode::SUCCESS)
}

async fn run_download(
    config: Config,
    mut urls: Vec<String>,
    url_file: Option<&Path>,
    dir: &Path,
    template: &str,
) -> Result<ExitCode> {
    if let Some(path) = url_file {
        urls.extend(read_url_file(path).await?);
    }

    let downloader = BatchDownloader::from_config(config.download)?;
    let report = downloader.download_all(&urls, dir, template).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.all_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

async fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| Error::File {
            operation: "read URL list",
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

async fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(path, format!("{json}\n"))
                .await
                .map_err(|e| Error::File {
                    operation: "write feed output",
                    path: path.to_path_buf(),
                    source: e,
                })?;
            tracing::info!(path = %path.display(), "feed written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
