//! Whitespace-bounded text segmentation.
//!
//! The synthesis endpoint caps the length of a single request, so input text
//! is cut into segments no larger than a byte budget. Cuts only happen right
//! after a whitespace character, and the whitespace stays with the text before
//! it, so joining the segments in order gives back the input exactly.

/// Largest segment the SpeechKit endpoint reliably accepts, in bytes.
pub const DEFAULT_MAX_SEGMENT_BYTES: usize = 870;

/// One bounded piece of the input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Position in the original text, `0..n`
    pub index: usize,
    /// Segment content
    pub text: String,
    /// Length of `text` in bytes
    pub byte_len: usize,
}

impl Segment {
    fn new(index: usize, text: &str) -> Self {
        Self {
            index,
            text: text.to_string(),
            byte_len: text.len(),
        }
    }
}

/// Split `text` into segments of at most `max_bytes` bytes.
///
/// Tokens are greedily packed. A single token longer than `max_bytes` is
/// emitted on its own as an oversized segment rather than being cut inside a
/// word. Empty input yields no segments.
///
/// # Example
///
/// ```
/// use t2s::chunker::chunk;
///
/// let segments = chunk("one two three", 8);
/// let texts: Vec<_> = segments.iter().map(|s| s.text.as_str()).collect();
/// assert_eq!(texts, ["one two ", "three"]);
/// ```
pub fn chunk(text: &str, max_bytes: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut end = 0;

    for token in tokens(text) {
        if end > start && end - start + token.len() > max_bytes {
            segments.push(Segment::new(segments.len(), &text[start..end]));
            start = end;
        }
        end += token.len();
    }

    if end > start {
        segments.push(Segment::new(segments.len(), &text[start..end]));
    }

    segments
}

/// Iterate over `text` in pieces that each end just after a whitespace
/// character (the last piece may end without one).
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(char::is_whitespace)
}
