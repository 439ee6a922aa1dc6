mod cli;

use t2s::{
    config,
    dispatch::DispatchProgress,
    error::SetupError,
    processor::{Settings, TextToSpeech},
    speechkit::SpeechKitClient,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn read_input(path: Option<&Path>) -> Result<String, SetupError> {
    let mut raw = Vec::new();
    match path {
        Some(path) => {
            File::open(path)
                .and_then(|mut file| file.read_to_end(&mut raw))
                .map_err(|source| SetupError::Input {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        None => {
            io::stdin()
                .read_to_end(&mut raw)
                .map_err(|source| SetupError::Input {
                    path: "<stdin>".into(),
                    source,
                })?;
        }
    }

    match String::from_utf8(raw) {
        Ok(text) => Ok(text),
        Err(err) => {
            tracing::warn!(
                "Input is not valid UTF-8 at byte {}, invalid sequences replaced",
                err.utf8_error().valid_up_to()
            );
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}

/// Where the audio goes.
///
/// A file is opened up front so an unwritable path fails before any request,
/// but it is only truncated once there is audio to write. A file this run
/// created is removed again if the run fails.
enum Output {
    Stdout,
    File {
        path: PathBuf,
        file: File,
        created: bool,
    },
}

impl Output {
    fn open(path: Option<&Path>) -> Result<Self, SetupError> {
        let Some(path) = path else {
            return Ok(Output::Stdout);
        };

        let created = !path.exists();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .open(path)
            .map_err(|source| SetupError::Output {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Output::File {
            path: path.to_path_buf(),
            file,
            created,
        })
    }

    fn is_file(&self) -> bool {
        matches!(self, Output::File { .. })
    }

    fn commit(self, audio: &[u8]) -> Result<()> {
        match self {
            Output::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(audio)?;
                stdout.flush()?;
            }
            Output::File { path, file, .. } => {
                file.set_len(0)
                    .with_context(|| format!("Failed to truncate {:?}", path))?;
                let mut writer = BufWriter::new(file);
                writer
                    .write_all(audio)
                    .and_then(|()| writer.flush())
                    .with_context(|| format!("Failed to write audio to {:?}", path))?;
            }
        }
        Ok(())
    }

    fn discard(self) {
        if let Output::File {
            path,
            file,
            created: true,
        } = self
        {
            drop(file);
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::debug!("Failed to remove {:?}: {}", path, e);
            }
        }
    }
}

fn progress_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::new(0);
    let style = ProgressStyle::with_template(
        "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({eta})",
    )
    .context("Failed to create progress bar template")?
    .progress_chars("#>-");
    bar.set_style(style);
    Ok(bar)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag.
    // Logs go to stderr: stdout may be carrying the audio.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "t2s=debug,t2s_mp3=debug".to_string()
        } else {
            "t2s=warn,t2s_mp3=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(io::stderr)
        .init();

    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);
    config::validate_config(&config)?;

    let settings = Settings::from_config(&config)?;
    let text = read_input(cli.input.as_deref())?;
    let output = Output::open(cli.output.as_deref())?;

    let runtime = tokio::runtime::Runtime::new().map_err(SetupError::Runtime)?;

    let transport = Arc::new(SpeechKitClient::with_base_url(
        config.speechkit.base_url.clone(),
        config.dispatch.timeout(),
    ));
    let mut tts = TextToSpeech::new(transport, settings);

    // Only draw progress when stdout is free of audio
    let bar = if output.is_file() {
        Some(progress_bar()?)
    } else {
        None
    };
    if let Some(bar) = &bar {
        let bar = bar.clone();
        tts = tts.with_progress(DispatchProgress::new(move |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        }));
    }

    let result = runtime.block_on(tts.synthesize(&text));
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }
    let rendered = match result {
        Ok(rendered) => rendered,
        Err(e) => {
            output.discard();
            return Err(e.into());
        }
    };

    if !rendered.is_complete() {
        tracing::warn!(
            "{} of {} segments could not be synthesized and are missing from the output: {:?}",
            rendered.failed.len(),
            rendered.segments,
            rendered.failed
        );
    }

    output.commit(&rendered.audio)?;

    Ok(())
}
