//! Text in, one MP3 stream out.
//!
//! [`TextToSpeech`] chains the three stages: the text is cut into segments,
//! every segment is fetched through the dispatcher, and the returned audio
//! buffers are spliced into a single stream in segment order.

use std::sync::Arc;

use t2s_mp3::{concatenate, ConcatenationState};
use tracing::{debug, info};

use crate::chunker::{self, DEFAULT_MAX_SEGMENT_BYTES};
use crate::config::Config;
use crate::dispatch::{DispatchError, DispatchOptions, DispatchProgress, Dispatcher};
use crate::error::SetupError;
use crate::speechkit::{SpeechParams, SpeechTransport};

/// Everything a run needs besides the transport
#[derive(Debug, Clone)]
pub struct Settings {
    pub params: SpeechParams,
    pub max_segment_bytes: usize,
    pub dispatch: DispatchOptions,
}

impl Settings {
    pub fn new(params: SpeechParams) -> Self {
        Self {
            params,
            max_segment_bytes: DEFAULT_MAX_SEGMENT_BYTES,
            dispatch: DispatchOptions::default(),
        }
    }

    /// Build settings from a validated config.
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        Ok(Self {
            params: config.speechkit.speech_params()?,
            max_segment_bytes: config.dispatch.max_segment_bytes,
            dispatch: config.dispatch.options(),
        })
    }
}

/// Output of one run
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Spliced MP3 stream
    pub audio: Vec<u8>,
    pub state: ConcatenationState,
    /// Number of segments the text was cut into
    pub segments: usize,
    /// Indices of segments that contributed no audio
    pub failed: Vec<usize>,
}

impl Rendered {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct TextToSpeech {
    dispatcher: Dispatcher,
    params: SpeechParams,
    max_segment_bytes: usize,
}

impl std::fmt::Debug for TextToSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextToSpeech")
            .field("dispatcher", &self.dispatcher)
            .field("max_segment_bytes", &self.max_segment_bytes)
            .finish_non_exhaustive()
    }
}

impl TextToSpeech {
    pub fn new(transport: Arc<dyn SpeechTransport>, settings: Settings) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport, settings.dispatch),
            params: settings.params,
            max_segment_bytes: settings.max_segment_bytes.max(1),
        }
    }

    /// Builder: report fetch progress.
    pub fn with_progress(mut self, progress: DispatchProgress) -> Self {
        self.dispatcher = self.dispatcher.with_progress(progress);
        self
    }

    /// Synthesize `text` into a single MP3 stream.
    ///
    /// Fails only under [`FailurePolicy::AbortOnFirstFailure`]. Otherwise
    /// segments that failed are listed in [`Rendered::failed`] and are simply
    /// absent from the audio.
    ///
    /// [`FailurePolicy::AbortOnFirstFailure`]: crate::dispatch::FailurePolicy::AbortOnFirstFailure
    pub async fn synthesize(&self, text: &str) -> Result<Rendered, DispatchError> {
        let segments = chunker::chunk(text, self.max_segment_bytes);
        let count = segments.len();
        debug!(
            segments = count,
            bytes = text.len(),
            max_segment_bytes = self.max_segment_bytes,
            "Text segmented"
        );

        let results = self.dispatcher.dispatch(segments, &self.params).await?;

        let failed: Vec<usize> = results
            .iter()
            .filter(|r| r.is_failed())
            .map(|r| r.index)
            .collect();

        let concatenated = concatenate(results.iter().map(|r| &r.payload));

        info!(
            segments = count,
            failed = failed.len(),
            frames = concatenated.state.frames_written,
            bytes = concatenated.state.bytes_written,
            vbr = concatenated.state.variable_bitrate,
            "Synthesis finished"
        );

        Ok(Rendered {
            audio: concatenated.bytes,
            state: concatenated.state,
            segments: count,
            failed,
        })
    }
}
