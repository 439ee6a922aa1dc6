//! Frame-level concatenation of independently encoded MPEG audio buffers

use tracing::debug;

use crate::reader::FrameReader;

/// Running totals for one concatenation pass.
///
/// Purely informational: nothing recorded here changes which bytes are
/// written. In particular a variable bitrate does not cause a new summary
/// frame to be synthesised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcatenationState {
    /// Frames appended to the output
    pub frames_written: u64,
    /// Bytes appended to the output
    pub bytes_written: u64,
    /// Bitrate of the first emitted frame
    pub first_bitrate_kbps: Option<u32>,
    /// Set once an emitted frame differs from `first_bitrate_kbps`
    pub variable_bitrate: bool,
    /// Source buffers consumed
    pub sources: usize,
    /// Leading summary frames discarded
    pub headers_dropped: usize,
}

/// What a single source buffer contributed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceSummary {
    pub frames: u64,
    pub bytes: u64,
    pub header_dropped: bool,
}

/// Output of a finished pass
#[derive(Debug, Clone, Default)]
pub struct Concatenated {
    pub bytes: Vec<u8>,
    pub state: ConcatenationState,
}

/// Accumulates frames from a sequence of source buffers into one stream.
///
/// Buffers must be pushed in playback order. For each buffer only the first
/// parsed frame is checked for a summary tag; every other frame is copied
/// verbatim.
#[derive(Debug, Default)]
pub struct Concatenator {
    output: Vec<u8>,
    state: ConcatenationState,
}

impl Concatenator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the output for roughly `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            output: Vec::with_capacity(capacity),
            state: ConcatenationState::default(),
        }
    }

    /// Append every frame of `buffer` to the output.
    ///
    /// Unparseable or truncated trailing data ends this buffer's contribution
    /// without affecting later buffers.
    pub fn push(&mut self, buffer: &[u8]) -> SourceSummary {
        let mut summary = SourceSummary::default();
        let mut reader = FrameReader::new(buffer);

        for (position, frame) in reader.by_ref().enumerate() {
            if position == 0 {
                if let Some(kind) = frame.format_header() {
                    debug!(
                        source = self.state.sources,
                        tag = %kind,
                        "Dropping leading summary frame"
                    );
                    summary.header_dropped = true;
                    self.state.headers_dropped += 1;
                    continue;
                }
            }

            let bitrate = frame.bitrate_kbps();
            match self.state.first_bitrate_kbps {
                None => self.state.first_bitrate_kbps = Some(bitrate),
                Some(first) if first != bitrate => self.state.variable_bitrate = true,
                Some(_) => {}
            }

            let raw = frame.raw_bytes();
            self.output.extend_from_slice(raw);
            summary.frames += 1;
            summary.bytes += raw.len() as u64;
        }

        self.state.frames_written += summary.frames;
        self.state.bytes_written += summary.bytes;

        debug!(
            source = self.state.sources,
            input_bytes = buffer.len(),
            frames = summary.frames,
            bytes = summary.bytes,
            skipped = reader.skipped_bytes(),
            "Appended source buffer"
        );

        self.state.sources += 1;
        summary
    }

    /// Totals so far
    pub fn state(&self) -> &ConcatenationState {
        &self.state
    }

    /// Finish the pass and hand back the output stream.
    pub fn finish(self) -> Concatenated {
        debug!(
            sources = self.state.sources,
            frames = self.state.frames_written,
            bytes = self.state.bytes_written,
            vbr = self.state.variable_bitrate,
            "Concatenation finished"
        );
        Concatenated {
            bytes: self.output,
            state: self.state,
        }
    }
}

/// Concatenate `buffers` in order into a single frame stream.
///
/// # Example
///
/// ```
/// let silence: Vec<Vec<u8>> = vec![Vec::new(), Vec::new()];
/// let out = t2s_mp3::concatenate(&silence);
/// assert!(out.bytes.is_empty());
/// assert_eq!(out.state.sources, 2);
/// ```
pub fn concatenate<I, B>(buffers: I) -> Concatenated
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let buffers: Vec<B> = buffers.into_iter().collect();
    let capacity = buffers.iter().map(|b| b.as_ref().len()).sum();

    let mut concatenator = Concatenator::with_capacity(capacity);
    for buffer in &buffers {
        concatenator.push(buffer.as_ref());
    }
    concatenator.finish()
}
