use anyhow::Context;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use arascribe::cli::{Cli, Commands};
use arascribe::config::Config;
use arascribe::events::{PipelineProgress, PipelineStage};
use arascribe::output;
use arascribe::services::batch::BatchController;
use arascribe::services::download::YtDlpFetcher;
use arascribe::services::export;
use arascribe::services::pipeline::PipelineRunner;
use arascribe::services::transcription::WhisperClient;
use arascribe::services::translation::GptTranslator;
use arascribe::utils::{logger, tools};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init_logger();

    let cli = Cli::parse();
    match cli.command {
        Commands::Process {
            urls,
            input,
            export_dir,
            no_export,
            api_key,
        } => run_process(urls, input, export_dir, no_export, api_key).await,
        Commands::Check { api_key } => run_check(api_key).await,
    }
}

async fn run_process(
    urls: Vec<String>,
    input: Option<PathBuf>,
    export_dir: PathBuf,
    no_export: bool,
    api_key: String,
) -> anyhow::Result<()> {
    let urls = collect_urls(urls, input)?;

    tools::init_tools()?;
    let config = Config::new(api_key);

    let fetcher = Arc::new(YtDlpFetcher::from_tools()?);
    let recognizer = WhisperClient::shared(&config);
    let translator = GptTranslator::shared(&config);
    let runner = PipelineRunner::new(fetcher, recognizer, translator);
    let mut controller = BatchController::new(runner);

    // Forward pipeline progress onto a single bar; jobs run one at a time
    let (tx, mut rx) = mpsc::channel::<PipelineProgress>(32);
    let progress_bar = ProgressBar::new(100);
    progress_bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}").unwrap(),
    );
    let bar = progress_bar.clone();
    let monitor = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            bar.set_position(update.percent as u64);
            bar.set_message(update.status.clone());
            match update.stage {
                PipelineStage::Done => {
                    bar.println(format!("{} {}", style("✓").green().bold(), update.status));
                }
                PipelineStage::Failed => {
                    bar.println(format!("{} {}", style("✗").red().bold(), update.status));
                }
                _ => {}
            }
        }
    });

    let summary = controller.run(&urls, Some(tx)).await?;
    let _ = monitor.await;
    progress_bar.finish_and_clear();

    for failure in &summary.failures {
        eprintln!(
            "{} Video {} failed ({}): {}",
            style("✗").red().bold(),
            failure.index,
            failure.url,
            failure.message
        );
    }
    println!(
        "Processed {} video(s): {} completed, {} failed",
        summary.total,
        summary.completed,
        summary.failures.len()
    );

    output::print_results(controller.results());

    if !no_export && !controller.results().is_empty() {
        let bytes = export::package_results(controller.results())?;
        let archive_path = export_dir.join(export::ARCHIVE_FILE_NAME);
        std::fs::write(&archive_path, bytes)
            .with_context(|| format!("failed to write {}", archive_path.display()))?;
        println!("Transcript archive saved to {}", archive_path.display());
    }

    Ok(())
}

fn collect_urls(urls: Vec<String>, input: Option<PathBuf>) -> anyhow::Result<Vec<String>> {
    if !urls.is_empty() {
        return Ok(urls);
    }

    let raw = match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read URLs from stdin")?;
            buffer
        }
    };

    Ok(raw.lines().map(str::to_string).collect())
}

async fn run_check(api_key: String) -> anyhow::Result<()> {
    match tools::init_tools() {
        Ok(()) => {
            if let Some(path) = tools::get_tool_path("yt-dlp") {
                println!(
                    "{} yt-dlp found at {}",
                    style("✓").green().bold(),
                    path.display()
                );
            }
        }
        Err(e) => println!("{} {}", style("✗").red().bold(), e),
    }

    let config = Config::new(api_key);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new());

    let (youtube_ok, openai_ok) = futures::future::join(
        probe_site(&client, "https://www.youtube.com"),
        validate_api_key(&client, &config),
    )
    .await;

    report("YouTube reachable", youtube_ok);
    match openai_ok {
        Some(valid) => report("OpenAI API key valid", valid),
        None => println!(
            "{} OpenAI API key not provided (set OPENAI_API_KEY)",
            style("-").dim()
        ),
    }

    Ok(())
}

fn report(label: &str, ok: bool) {
    if ok {
        println!("{} {}", style("✓").green().bold(), label);
    } else {
        println!("{} {}", style("✗").red().bold(), label);
    }
}

async fn probe_site(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            status.is_success() || status.is_redirection()
        }
        Err(e) => {
            warn!("Request to {} failed: {}", url, e);
            false
        }
    }
}

async fn validate_api_key(client: &reqwest::Client, config: &Config) -> Option<bool> {
    if config.api_key.trim().is_empty() {
        return None;
    }

    match client
        .get(format!("{}/v1/models", config.api_base))
        .bearer_auth(&config.api_key)
        .send()
        .await
    {
        Ok(response) => Some(response.status().is_success()),
        Err(e) => {
            warn!("OpenAI API request failed: {}", e);
            Some(false)
        }
    }
}
