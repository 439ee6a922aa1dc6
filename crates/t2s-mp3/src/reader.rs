//! Sequential frame iteration over an in-memory MPEG audio stream

use crate::error::Mp3Error;
use crate::header::{FrameHeader, HEADER_LEN};

const ID3V1_LEN: usize = 128;
const ID3V2_HEADER_LEN: usize = 10;
const ID3V2_FOOTER_LEN: usize = 10;

/// One compressed audio frame borrowed from its source buffer
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    header: FrameHeader,
    raw: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Decoded frame header
    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// The complete frame bytes, header included
    pub fn raw_bytes(&self) -> &'a [u8] {
        self.raw
    }

    /// Bitrate in kbps
    pub fn bitrate_kbps(&self) -> u32 {
        self.header.bitrate_kbps
    }
}

/// What sits at the current read position
enum Object {
    Frame(FrameHeader),
    Tag(usize),
}

/// Iterator over the frames of a byte buffer.
///
/// ID3v1 and ID3v2 tags are skipped, and bytes that do not form a valid frame
/// header are skipped one at a time until sync is found again. Iteration ends
/// at the end of the buffer or at the first frame or tag that would run past it.
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    data: &'a [u8],
    pos: usize,
    skipped: usize,
}

impl<'a> FrameReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            skipped: 0,
        }
    }

    /// Bytes discarded so far while resynchronising (tags not included)
    pub fn skipped_bytes(&self) -> usize {
        self.skipped
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.pos
    }
}

fn identify(rest: &[u8]) -> Result<Object, Mp3Error> {
    if rest.starts_with(b"TAG") {
        return Ok(Object::Tag(ID3V1_LEN));
    }
    if rest.starts_with(b"ID3") {
        return id3v2_len(rest).map(Object::Tag);
    }
    FrameHeader::parse(rest).map(Object::Frame)
}

impl<'a> Iterator for FrameReader<'a> {
    type Item = Frame<'a>;

    fn next(&mut self) -> Option<Frame<'a>> {
        let data = self.data;
        loop {
            let rest = &data[self.pos..];
            if rest.len() < HEADER_LEN {
                self.pos = self.data.len();
                return None;
            }

            match identify(rest) {
                Ok(Object::Tag(len)) => {
                    if len > rest.len() {
                        self.pos = self.data.len();
                        return None;
                    }
                    self.pos += len;
                }
                Ok(Object::Frame(header)) => {
                    let len = header.frame_len();
                    if len < HEADER_LEN || len > rest.len() {
                        self.pos = self.data.len();
                        return None;
                    }
                    self.pos += len;
                    return Some(Frame {
                        header,
                        raw: &rest[..len],
                    });
                }
                Err(Mp3Error::Truncated { .. }) => {
                    self.pos = self.data.len();
                    return None;
                }
                Err(_) => {
                    self.pos += 1;
                    self.skipped += 1;
                }
            }
        }
    }
}

/// Total length of an ID3v2 tag starting at `data[0]`.
fn id3v2_len(data: &[u8]) -> Result<usize, Mp3Error> {
    if data.len() < ID3V2_HEADER_LEN {
        return Err(Mp3Error::Truncated {
            needed: ID3V2_HEADER_LEN,
            available: data.len(),
        });
    }

    let flags = data[5];
    // Tag size is a 28-bit syncsafe integer: 7 significant bits per byte
    let size = data[6..10]
        .iter()
        .fold(0usize, |acc, b| (acc << 7) | usize::from(b & 0x7F));
    let footer = if flags & 0x10 != 0 { ID3V2_FOOTER_LEN } else { 0 };

    Ok(ID3V2_HEADER_LEN + size + footer)
}
