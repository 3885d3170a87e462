use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use vidlens_core::{ErrorKind, Progress, Reporter, VidlensError, config, format_duration};

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .expect("static spinner template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn elapsed(start: Instant) -> String {
    style(format!("[{}]", format_duration(start.elapsed())))
        .dim()
        .to_string()
}

/// Renders workflow progress as a sequence of spinners.
pub struct SpinnerReporter {
    current: Mutex<Option<(ProgressBar, Instant)>>,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    fn start(&self, msg: &str) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((pb, _)) = current.take() {
            pb.finish_and_clear();
        }
        *current = Some((create_spinner(msg), Instant::now()));
    }

    fn set_message(&self, msg: String) {
        let current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((pb, _)) = current.as_ref() {
            pb.set_message(msg);
        }
    }

    /// Finish the running spinner with a check mark.
    pub fn finish(&self, msg: &str) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((pb, started)) = current.take() {
            pb.finish_with_message(format!(
                "{} {} {}",
                style("✓").green().bold(),
                msg,
                elapsed(started)
            ));
        }
    }

    /// Stop the running spinner with a cross.
    pub fn fail(&self) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((pb, _)) = current.take() {
            let msg = pb.message();
            pb.abandon_with_message(format!("{} {}", style("✗").red().bold(), msg));
        }
    }
}

impl Default for SpinnerReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for SpinnerReporter {
    fn report(&self, progress: Progress) {
        match progress {
            Progress::Uploading { file_name } => {
                self.start(&format!("Uploading {} to Gemini...", file_name));
            }
            Progress::Uploaded { display_name } => {
                self.finish(&format!("Uploaded: {}", style(display_name).dim()));
                self.start("Processing video...");
            }
            Progress::Processing { attempt } => {
                self.set_message(format!(
                    "Processing video... {}",
                    style(format!("(check #{attempt})")).dim()
                ));
            }
            Progress::Ready => self.finish("Video processed"),
            Progress::Analyzing { model } => {
                self.start(&format!("Analyzing with {}...", model));
            }
        }
    }
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

pub fn print_error(err: &VidlensError) {
    eprintln!(
        "{} {}: {}",
        style("Error:").red().bold(),
        error_context(err.kind()),
        err
    );

    if let Some(hint) = error_hint(err) {
        eprintln!("  {}", style(hint).dim());
    }
}

fn error_context(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Configuration => "Invalid configuration",
        ErrorKind::Input | ErrorKind::LocalIo => "Could not read the video",
        ErrorKind::Upload | ErrorKind::Processing | ErrorKind::Analysis => {
            "An error occurred during analysis"
        }
    }
}

fn error_hint(err: &VidlensError) -> Option<String> {
    match err {
        VidlensError::MissingApiKey { env_var } => {
            let mut hint = format!("Set {env_var} in the environment or ./.env");
            if let Some(path) = config::user_env_path() {
                hint.push_str(&format!(" or {}", path.display()));
            }
            Some(hint)
        }
        VidlensError::InvalidSetting { key, .. } => Some(format!("Check the value of {key}")),
        VidlensError::UnsupportedFormat { .. } => {
            Some("Convert the video to mp4, mov or avi first.".to_string())
        }
        _ if err.kind() == ErrorKind::Processing => {
            Some("The video was not analyzed. Try again or use a shorter clip.".to_string())
        }
        _ => None,
    }
}
