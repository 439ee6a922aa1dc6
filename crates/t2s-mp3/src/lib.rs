//! # t2s-mp3
//!
//! Pure Rust MPEG audio frame parsing and frame-level concatenation.
//!
//! Speech services return one self-contained MP3 file per request. Splicing
//! those files at the frame level yields a single continuous stream without
//! decoding or re-encoding anything.
//!
//! ## Features
//!
//! - Frame header decoding for MPEG-1, MPEG-2 and MPEG-2.5, Layers I-III
//! - ID3v1/ID3v2 tag skipping and resynchronisation over junk bytes
//! - Xing / Info / VBRI summary frame detection
//! - Byte-exact concatenation with bitrate bookkeeping
//!
//! ## Example
//!
//! ```no_run
//! let parts: Vec<Vec<u8>> = vec![
//!     std::fs::read("part-0.mp3").unwrap(),
//!     std::fs::read("part-1.mp3").unwrap(),
//! ];
//!
//! let out = t2s_mp3::concatenate(&parts);
//! println!(
//!     "{} frames, {} bytes, vbr: {}",
//!     out.state.frames_written, out.state.bytes_written, out.state.variable_bitrate
//! );
//! std::fs::write("joined.mp3", &out.bytes).unwrap();
//! ```

pub mod concat;
pub mod error;
pub mod header;
pub mod reader;
pub mod vbr;

pub use concat::{concatenate, Concatenated, ConcatenationState, Concatenator, SourceSummary};
pub use error::Mp3Error;
pub use header::{ChannelMode, FrameHeader, Layer, MpegVersion};
pub use reader::{Frame, FrameReader};
pub use vbr::FormatHeader;
