//! Integration tests for t2s-mp3

use t2s_mp3::{concatenate, FrameReader};

/// MPEG-1 Layer III joint-stereo frame at the given bitrate index.
fn audio_frame(bitrate_index: u8, fill: u8) -> Vec<u8> {
    let header = [0xFF, 0xFB, bitrate_index << 4, 0x44];
    let len = t2s_mp3::FrameHeader::parse(&header).unwrap().frame_len();
    let mut frame = vec![fill; len];
    frame[..4].copy_from_slice(&header);
    frame
}

fn xing_frame() -> Vec<u8> {
    let mut frame = audio_frame(9, 0);
    frame[36..40].copy_from_slice(b"Xing");
    frame
}

#[test]
fn test_leading_header_dropped_and_frames_spliced() {
    let frame_a = audio_frame(9, 0xA1);
    let frame_b = audio_frame(9, 0xB2);

    let buffer_1 = [xing_frame(), frame_a.clone()].concat();
    let buffer_2 = frame_b.clone();

    let out = concatenate([buffer_1, buffer_2]);

    assert_eq!(out.bytes, [frame_a, frame_b].concat());
    assert_eq!(out.state.frames_written, 2);
    assert_eq!(out.state.headers_dropped, 1);
    assert_eq!(out.state.bytes_written, out.bytes.len() as u64);
}

#[test]
fn test_uniform_bitrate_is_not_vbr() {
    let buffers = [audio_frame(9, 1), audio_frame(9, 2), audio_frame(9, 3)];
    let out = concatenate(&buffers);

    assert!(!out.state.variable_bitrate);
    assert_eq!(out.state.first_bitrate_kbps, Some(128));
}

#[test]
fn test_mixed_bitrates_flag_vbr_without_changing_bytes() {
    let mixed = [audio_frame(9, 1), audio_frame(10, 2), audio_frame(5, 3)];
    let out = concatenate(&mixed);

    assert!(out.state.variable_bitrate);
    assert_eq!(out.state.first_bitrate_kbps, Some(128));
    assert_eq!(out.bytes, mixed.concat());
}

#[test]
fn test_empty_and_garbage_buffers_contribute_nothing() {
    let frame = audio_frame(9, 7);
    let buffers: Vec<Vec<u8>> = vec![
        Vec::new(),
        frame.clone(),
        b"service unavailable".to_vec(),
        Vec::new(),
    ];

    let out = concatenate(&buffers);
    assert_eq!(out.bytes, frame);
    assert_eq!(out.state.sources, 4);
}

#[test]
fn test_truncated_tail_does_not_leak_into_next_buffer() {
    let first = audio_frame(9, 1);
    let mut truncated = first.clone();
    truncated.extend(&audio_frame(9, 2)[..50]);
    let second = audio_frame(9, 3);

    let out = concatenate([truncated, second.clone()]);
    assert_eq!(out.bytes, [first, second].concat());
}

#[test]
fn test_output_reparses_to_same_frame_count() {
    let buffers = [
        [xing_frame(), audio_frame(9, 1), audio_frame(9, 2)].concat(),
        [xing_frame(), audio_frame(10, 3)].concat(),
    ];

    let out = concatenate(&buffers);
    let reparsed = FrameReader::new(&out.bytes).count() as u64;
    assert_eq!(reparsed, out.state.frames_written);
    assert_eq!(reparsed, 3);
}
