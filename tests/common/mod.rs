//! Shared fixtures for integration tests.
//!
//! Builds syntactically valid MPEG-1 Layer III frames so responses from the
//! fake synthesis endpoint look like what SpeechKit returns: one summary frame
//! followed by audio frames.

#![allow(dead_code)]

use t2s::speechkit::{Credential, Emotion, SpeechParams, Voice};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz, joint stereo
pub const HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x44];
pub const FRAME_LEN: usize = 417;

/// One audio frame whose payload is filled with `fill`.
pub fn audio_frame(fill: u8) -> Vec<u8> {
    let mut frame = vec![fill; FRAME_LEN];
    frame[..4].copy_from_slice(&HEADER);
    frame
}

/// A Xing summary frame as prepended by LAME-style encoders.
pub fn xing_frame() -> Vec<u8> {
    let mut frame = vec![0u8; FRAME_LEN];
    frame[..4].copy_from_slice(&HEADER);
    frame[36..40].copy_from_slice(b"Xing");
    frame
}

/// A full endpoint response: summary frame plus `frames` audio frames.
pub fn speech_response(fill: u8, frames: usize) -> Vec<u8> {
    let mut body = xing_frame();
    for _ in 0..frames {
        body.extend(audio_frame(fill));
    }
    body
}

/// What the concatenator should emit for [`speech_response`].
pub fn spliced(fill: u8, frames: usize) -> Vec<u8> {
    (0..frames).flat_map(|_| audio_frame(fill)).collect()
}

pub fn speech_params(key: &str) -> SpeechParams {
    SpeechParams {
        credential: Credential::new(key),
        voice: Voice::default(),
        emotion: Emotion::default(),
    }
}
