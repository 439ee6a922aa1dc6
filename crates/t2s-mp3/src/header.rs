//! MPEG audio frame header parsing

use std::fmt;

use crate::error::Mp3Error;

/// Size of the fixed frame header in bytes
pub const HEADER_LEN: usize = 4;

/// MPEG audio version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpegVersion {
    Mpeg1,
    Mpeg2,
    Mpeg25,
}

/// MPEG audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    I,
    II,
    III,
}

/// Channel mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualChannel,
    Mono,
}

// Bitrates in kbps, indexed by the 4-bit bitrate index. Index 0 (free format)
// and 15 (bad) are rejected before lookup.
const BITRATES_V1_L1: [u32; 15] = [
    0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448,
];
const BITRATES_V1_L2: [u32; 15] = [
    0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384,
];
const BITRATES_V1_L3: [u32; 15] = [
    0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320,
];
const BITRATES_V2_L1: [u32; 15] = [
    0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256,
];
const BITRATES_V2_L23: [u32; 15] = [
    0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160,
];

const SAMPLE_RATES_V1: [u32; 3] = [44100, 48000, 32000];
const SAMPLE_RATES_V2: [u32; 3] = [22050, 24000, 16000];
const SAMPLE_RATES_V25: [u32; 3] = [11025, 12000, 8000];

/// Decoded 4-byte MPEG audio frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// MPEG version
    pub version: MpegVersion,
    /// Layer
    pub layer: Layer,
    /// A 16-bit CRC follows the header
    pub crc_protected: bool,
    /// Bitrate in kbps
    pub bitrate_kbps: u32,
    /// Sample rate in Hz
    pub sample_rate_hz: u32,
    /// Frame carries one extra padding slot
    pub padded: bool,
    /// Channel mode
    pub channel_mode: ChannelMode,
}

impl FrameHeader {
    /// Parse a frame header from the start of `data`.
    ///
    /// Only the first four bytes are inspected; the caller is responsible for
    /// checking that the whole frame (see [`frame_len`](Self::frame_len)) fits.
    pub fn parse(data: &[u8]) -> Result<Self, Mp3Error> {
        if data.len() < HEADER_LEN {
            return Err(Mp3Error::Truncated {
                needed: HEADER_LEN,
                available: data.len(),
            });
        }

        let (b1, b2, b3) = (data[1], data[2], data[3]);

        // 11 sync bits: all of byte 0 and the top three bits of byte 1
        if data[0] != 0xFF || b1 & 0xE0 != 0xE0 {
            return Err(Mp3Error::NoSync);
        }

        let version = match (b1 >> 3) & 0b11 {
            0b00 => MpegVersion::Mpeg25,
            0b10 => MpegVersion::Mpeg2,
            0b11 => MpegVersion::Mpeg1,
            _ => return Err(Mp3Error::ReservedVersion),
        };

        let layer = match (b1 >> 1) & 0b11 {
            0b01 => Layer::III,
            0b10 => Layer::II,
            0b11 => Layer::I,
            _ => return Err(Mp3Error::ReservedLayer),
        };

        // Protection bit is inverted: 0 means a CRC follows
        let crc_protected = b1 & 0x01 == 0;

        let bitrate_index = b2 >> 4;
        if bitrate_index == 0 || bitrate_index == 0x0F {
            return Err(Mp3Error::UnsupportedBitrate(bitrate_index));
        }
        let table = match (version, layer) {
            (MpegVersion::Mpeg1, Layer::I) => &BITRATES_V1_L1,
            (MpegVersion::Mpeg1, Layer::II) => &BITRATES_V1_L2,
            (MpegVersion::Mpeg1, Layer::III) => &BITRATES_V1_L3,
            (_, Layer::I) => &BITRATES_V2_L1,
            (_, _) => &BITRATES_V2_L23,
        };
        let bitrate_kbps = table[bitrate_index as usize];

        let sample_rate_index = ((b2 >> 2) & 0b11) as usize;
        if sample_rate_index == 3 {
            return Err(Mp3Error::ReservedSampleRate);
        }
        let sample_rate_hz = match version {
            MpegVersion::Mpeg1 => SAMPLE_RATES_V1[sample_rate_index],
            MpegVersion::Mpeg2 => SAMPLE_RATES_V2[sample_rate_index],
            MpegVersion::Mpeg25 => SAMPLE_RATES_V25[sample_rate_index],
        };

        let padded = (b2 >> 1) & 0x01 == 1;

        let channel_mode = match b3 >> 6 {
            0b00 => ChannelMode::Stereo,
            0b01 => ChannelMode::JointStereo,
            0b10 => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        };

        Ok(Self {
            version,
            layer,
            crc_protected,
            bitrate_kbps,
            sample_rate_hz,
            padded,
            channel_mode,
        })
    }

    /// Number of PCM samples encoded per channel in one frame
    pub fn samples_per_frame(&self) -> u32 {
        match (self.layer, self.version) {
            (Layer::I, _) => 384,
            (Layer::II, _) => 1152,
            (Layer::III, MpegVersion::Mpeg1) => 1152,
            (Layer::III, _) => 576,
        }
    }

    /// Total frame length in bytes, header included
    pub fn frame_len(&self) -> usize {
        let bps = self.bitrate_kbps * 1000;
        let padding = u32::from(self.padded);
        let len = match self.layer {
            Layer::I => (12 * bps / self.sample_rate_hz + padding) * 4,
            _ => self.samples_per_frame() / 8 * bps / self.sample_rate_hz + padding,
        };
        len as usize
    }

    /// Length of the Layer III side information block.
    ///
    /// Returns `None` for Layers I and II, which have no side information.
    pub fn side_info_len(&self) -> Option<usize> {
        if self.layer != Layer::III {
            return None;
        }
        let mono = self.channel_mode == ChannelMode::Mono;
        Some(match (self.version, mono) {
            (MpegVersion::Mpeg1, true) => 17,
            (MpegVersion::Mpeg1, false) => 32,
            (_, true) => 9,
            (_, false) => 17,
        })
    }
}

impl fmt::Display for FrameHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = match self.version {
            MpegVersion::Mpeg1 => "MPEG-1",
            MpegVersion::Mpeg2 => "MPEG-2",
            MpegVersion::Mpeg25 => "MPEG-2.5",
        };
        let layer = match self.layer {
            Layer::I => "I",
            Layer::II => "II",
            Layer::III => "III",
        };
        write!(
            f,
            "{} Layer {} {}kbps {}Hz",
            version, layer, self.bitrate_kbps, self.sample_rate_hz
        )
    }
}
