use clap::Parser;
use std::path::PathBuf;

use t2s::config::Config;
use t2s::speechkit::{Emotion, Voice};

/// Values left unset fall back to the config file, then to built-in defaults.
#[derive(Parser)]
#[command(name = "t2s")]
#[command(author, version, about = "Convert text to speech with Yandex SpeechKit")]
pub struct Cli {
    /// SpeechKit API key
    #[arg(short, long)]
    pub key: Option<String>,

    /// Maximum simultaneous requests [default: 100]
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Per-request timeout in seconds [default: 120]
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Attempts per segment when the service does not answer in time [default: 5]
    #[arg(short, long)]
    pub attempts: Option<u32>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Input file (stdin if not specified)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Speaker voice [default: zahar]
    #[arg(short, long, value_enum)]
    pub speaker: Option<Voice>,

    /// Voice emotion [default: good]
    #[arg(short, long, value_enum)]
    pub emotion: Option<Emotion>,

    /// Stop at the first segment that cannot be synthesized
    #[arg(long)]
    pub fail_fast: bool,

    /// Synthesis endpoint URL
    #[arg(long)]
    pub url: Option<String>,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overlay command-line values on a loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(key) = &self.key {
            config.speechkit.key = Some(key.clone());
        }
        if let Some(url) = &self.url {
            config.speechkit.base_url = url.clone();
        }
        if let Some(voice) = self.speaker {
            config.speechkit.voice = voice;
        }
        if let Some(emotion) = self.emotion {
            config.speechkit.emotion = emotion;
        }
        if let Some(limit) = self.limit {
            config.dispatch.limit = limit;
        }
        if let Some(timeout) = self.timeout {
            config.dispatch.timeout_secs = timeout;
        }
        if let Some(attempts) = self.attempts {
            config.dispatch.attempts = attempts;
        }
        if self.fail_fast {
            config.dispatch.fail_fast = true;
        }
    }
}
