//! t2s - Text-to-speech through Yandex SpeechKit Cloud
//!
//! This library crate exposes the core functionality for integration testing.

pub mod chunker;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod processor;
pub mod speechkit;
