//! Yandex SpeechKit Cloud synthesis endpoint.
//!
//! The endpoint takes one `GET` per utterance and answers with a complete MP3
//! file. [`SpeechTransport`] is the seam the dispatcher talks to;
//! [`SpeechKitClient`] is the real HTTP implementation.

mod client;
mod error;

pub use client::SpeechKitClient;
pub use error::FetchError;

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Default synthesis endpoint
pub const DEFAULT_BASE_URL: &str = "https://tts.voicetech.yandex.net/generate";
/// Requested audio container
pub const AUDIO_FORMAT: &str = "mp3";
/// Requested locale
pub const LANG: &str = "ru-RU";

/// Speaker voice
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Voice {
    Jane,
    Omazh,
    #[default]
    Zahar,
    Ermil,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::Jane => "jane",
            Voice::Omazh => "omazh",
            Voice::Zahar => "zahar",
            Voice::Ermil => "ermil",
        }
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotional colouring of the voice
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Good,
    Neutral,
    Evil,
    Mixed,
}

impl Emotion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Good => "good",
            Emotion::Neutral => "neutral",
            Emotion::Evil => "evil",
            Emotion::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API key for the synthesis endpoint. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Voice settings shared by every segment of one run
#[derive(Debug, Clone)]
pub struct SpeechParams {
    pub credential: Credential,
    pub voice: Voice,
    pub emotion: Emotion,
}

/// A single synthesis call
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    pub text: &'a str,
    pub params: &'a SpeechParams,
}

impl SynthesisRequest<'_> {
    /// Query parameters as sent on the wire
    pub fn query(&self) -> [(&'static str, &str); 6] {
        [
            ("text", self.text),
            ("format", AUDIO_FORMAT),
            ("lang", LANG),
            ("speaker", self.params.voice.as_str()),
            ("emotion", self.params.emotion.as_str()),
            ("key", self.params.credential.expose()),
        ]
    }
}

/// Performs one synthesis attempt.
///
/// Implementations enforce their own per-attempt deadline and must report a
/// deadline hit before the response head as [`FetchError::HeaderTimeout`].
#[async_trait]
pub trait SpeechTransport: Send + Sync {
    async fn synthesize(&self, request: SynthesisRequest<'_>) -> Result<Bytes, FetchError>;
}
