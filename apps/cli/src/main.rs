use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::Parser;
use console::{Term, style};
use indicatif::HumanBytes;
use tokio::fs;
use tracing_subscriber::EnvFilter;
use vidlens_core::{
    GeminiClient, Outcome, Settings, StagedVideo, UploadedVideo, Workflow, format_analysis,
    format_duration,
};

use crate::ui::{SpinnerReporter, print_error, print_warning};

mod ui;

#[derive(Parser)]
#[command(name = "vidlens")]
#[command(about = "Upload a video to Gemini and ask questions about it")]
struct Cli {
    /// Video file (mp4, mov or avi)
    video: PathBuf,

    /// What insights are you seeking from the video? Prompted for when omitted.
    #[arg(short, long)]
    query: Option<String>,

    /// Gemini model used for the analysis
    #[arg(short, long)]
    model: Option<String>,

    /// Seconds between processing status checks
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    poll_interval: Option<u64>,

    /// Give up if the video is still processing after this many seconds
    #[arg(long, value_name = "SECS")]
    max_wait: Option<u64>,

    /// Answer from the video alone, without web search
    #[arg(long)]
    no_web_search: bool,

    /// Also save the markdown result to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// More log output (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(model) = &self.model {
            settings.model = model.clone();
        }
        if let Some(secs) = self.poll_interval {
            settings.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.max_wait {
            settings.max_wait = Duration::from_secs(secs);
        }
        if self.no_web_search {
            settings.web_search = false;
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Ask for the query on the terminal. Non-interactive runs get an empty query.
fn prompt_query() -> Result<String> {
    let term = Term::stderr();
    if !term.is_term() {
        return Ok(String::new());
    }

    term.write_line(&format!(
        "{} {}",
        style("?").cyan().bold(),
        style("What insights are you seeking from the video?").bold()
    ))?;
    term.write_str(&format!("{} ", style("›").dim()))?;
    Ok(term.read_line()?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Fail before touching the video when the key is missing
    let mut settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    };
    cli.apply(&mut settings);

    println!(
        "\n{}  {}\n",
        style("vidlens").cyan().bold(),
        style("Video AI Summarizer").dim()
    );

    let video = match UploadedVideo::read(&cli.video).await {
        Ok(video) => video,
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    };
    let size = video.bytes.len() as u64;
    let staged = match StagedVideo::stage(&video) {
        Ok(staged) => staged,
        Err(e) => {
            print_error(&e);
            std::process::exit(1);
        }
    };
    drop(video);
    println!(
        "{} Staged: {} {}",
        style("✓").green().bold(),
        staged.file_name(),
        style(format!("({})", HumanBytes(size))).dim()
    );

    let query = match &cli.query {
        Some(query) => query.clone(),
        None => prompt_query()?,
    };

    let agent_config = Arc::new(settings.agent_config());
    let client = Arc::new(GeminiClient::from_settings(&settings, agent_config));
    let workflow = Workflow::new(Arc::clone(&client), client, settings.poll_policy());

    println!("{}", style("─".repeat(60)).dim());

    let reporter = SpinnerReporter::new();
    let total_start = Instant::now();

    let analysis = match workflow.analyze(staged, &query, &reporter).await {
        Ok(Outcome::Analyzed(analysis)) => analysis,
        Ok(Outcome::MissingQuery) => {
            print_warning("Please enter a question or insight to analyze the video.");
            return Ok(());
        }
        Err(e) => {
            reporter.fail();
            print_error(&e);
            std::process::exit(1);
        }
    };
    reporter.finish("Analysis complete");

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    let readable = format_analysis(&analysis);

    if let Some(path) = &cli.output {
        fs::write(path, &readable).await?;
        println!(
            "{} {}\n",
            style("Saved:").dim(),
            style(path.display()).cyan()
        );
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}", readable);

    Ok(())
}
