use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::chunker::DEFAULT_MAX_SEGMENT_BYTES;
use crate::dispatch::{
    DispatchOptions, FailurePolicy, DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS,
};
use crate::error::SetupError;
use crate::speechkit::{Credential, Emotion, SpeechParams, Voice, DEFAULT_BASE_URL};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub speechkit: SpeechKitConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechKitConfig {
    /// API key; usually supplied with `--key` instead
    #[serde(default)]
    pub key: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub voice: Voice,

    #[serde(default)]
    pub emotion: Emotion,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for SpeechKitConfig {
    fn default() -> Self {
        Self {
            key: None,
            base_url: default_base_url(),
            voice: Voice::default(),
            emotion: Emotion::default(),
        }
    }
}

impl SpeechKitConfig {
    /// Voice settings for a run. Fails when no usable key is configured.
    pub fn speech_params(&self) -> Result<SpeechParams, SetupError> {
        let credential = self
            .key
            .as_deref()
            .map(Credential::new)
            .filter(|c| !c.is_empty())
            .ok_or(SetupError::MissingCredential)?;

        Ok(SpeechParams {
            credential,
            voice: self.voice,
            emotion: self.emotion,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Maximum simultaneous requests
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Per-attempt deadline in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_attempts")]
    pub attempts: u32,

    /// Byte budget per text segment
    #[serde(default = "default_max_segment_bytes")]
    pub max_segment_bytes: usize,

    /// Abort the whole run on the first failed segment
    #[serde(default)]
    pub fail_fast: bool,
}

fn default_limit() -> usize {
    DEFAULT_CONCURRENCY
}
fn default_timeout_secs() -> u64 {
    120
}
fn default_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_max_segment_bytes() -> usize {
    DEFAULT_MAX_SEGMENT_BYTES
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            timeout_secs: default_timeout_secs(),
            attempts: default_attempts(),
            max_segment_bytes: default_max_segment_bytes(),
            fail_fast: false,
        }
    }
}

impl DispatchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::AbortOnFirstFailure
        } else {
            FailurePolicy::Resilient
        }
    }

    pub fn options(&self) -> DispatchOptions {
        DispatchOptions {
            concurrency: self.limit,
            max_attempts: self.attempts,
            failure_policy: self.failure_policy(),
        }
    }
}
