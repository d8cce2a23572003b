use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, WrapErr};
use log::{info, warn};

mod cli;

use cli::{Cli, Command};
use ytsum::config::{Config, Settings};
use ytsum::pipeline::Pipeline;
use ytsum::summarize::Mode;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn load_config(cli: &Cli) -> Config {
    let path = cli.config.clone().unwrap_or_else(ytsum::config::config_path);
    if cli.verbose && path.exists() {
        eprintln!("Config: {}", path.display());
    }

    // A broken config file falls back to defaults rather than refusing to start
    Config::load_from(&path).unwrap_or_else(|e| {
        warn!("Ignoring config file {}: {e}", path.display());
        Config::default()
    })
}

async fn serve(settings: Settings, client: reqwest::Client, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| settings.bind.clone());
    let pipeline = Pipeline::new(settings.transcript_provider(client.clone()), settings.summarizer(client));
    let app = ytsum::web::router(pipeline);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .wrap_err_with(|| format!("failed to bind {bind}"))?;
    info!("Listening on http://{bind} (model {})", settings.model);
    eprintln!("Serving on http://{bind}");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn summarize(settings: Settings, client: reqwest::Client, url: &str, mode: Mode) -> Result<()> {
    let pipeline = Pipeline::new(settings.transcript_provider(client.clone()), settings.summarizer(client));
    let summary = pipeline.run(url, mode).await.into_result()?;
    println!("### {}\n\n{}", summary.mode.label(), summary.text);
    Ok(())
}

async fn transcript(config: Config, client: reqwest::Client, url: &str) -> Result<()> {
    let lang = config
        .language
        .unwrap_or_else(|| ytsum::config::DEFAULT_LANG.to_string());
    let mut provider = ytsum::youtube::YouTubeCaptions::new(client, lang);
    if let Some(base_url) = config.transcript_base_url {
        provider = provider.with_base_url(base_url);
    }

    let (_, text) = ytsum::youtube::fetch_transcript(&provider, url).await?;
    println!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let cli = Cli::parse();
    let config = load_config(&cli);
    let client = reqwest::Client::new();

    if let Some(Command::Transcript { url }) = &cli.command {
        return transcript(config, client, url).await;
    }

    // The credential is read once here; nothing else consults the environment
    let settings = Settings::from_env(config)?;
    if cli.verbose {
        eprintln!("Model: {}\nLanguage: {}", settings.model, settings.language);
    }

    match cli.command {
        Some(Command::Summarize { url, mode }) => summarize(settings, client, &url, mode).await,
        Some(Command::Serve { bind }) => serve(settings, client, bind).await,
        Some(Command::Transcript { .. }) | None => serve(settings, client, None).await,
    }
}
