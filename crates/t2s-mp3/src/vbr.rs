//! Detection of encoder summary frames (Xing / Info / VBRI)
//!
//! Some encoders emit a first frame that holds a seek table and stream totals
//! instead of audio. It is a valid frame syntactically but carries no samples,
//! so it must not survive splicing into the middle of another stream.

use std::fmt;

use crate::header::Layer;
use crate::reader::Frame;

/// Fraunhofer VBRI tags always sit 32 bytes after the frame header
const VBRI_OFFSET: usize = 36;
const CRC_LEN: usize = 2;

/// Kind of summary frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHeader {
    /// LAME/Xing tag on a VBR stream
    Xing,
    /// Same layout as Xing, written for CBR streams
    Info,
    /// Fraunhofer VBRI tag
    Vbri,
}

impl fmt::Display for FormatHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatHeader::Xing => write!(f, "Xing"),
            FormatHeader::Info => write!(f, "Info"),
            FormatHeader::Vbri => write!(f, "VBRI"),
        }
    }
}

impl Frame<'_> {
    /// Identify the summary tag carried by this frame, if any.
    pub fn format_header(&self) -> Option<FormatHeader> {
        let header = self.header();
        if header.layer != Layer::III {
            return None;
        }

        let raw = self.raw_bytes();
        let crc = if header.crc_protected { CRC_LEN } else { 0 };
        let xing_offset = 4 + crc + header.side_info_len()?;

        match raw.get(xing_offset..xing_offset + 4) {
            Some(b"Xing") => return Some(FormatHeader::Xing),
            Some(b"Info") => return Some(FormatHeader::Info),
            _ => {}
        }

        match raw.get(VBRI_OFFSET..VBRI_OFFSET + 4) {
            Some(b"VBRI") => Some(FormatHeader::Vbri),
            _ => None,
        }
    }

    /// True when this frame is a summary frame rather than decodable audio.
    pub fn is_format_header(&self) -> bool {
        self.format_header().is_some()
    }
}
