//! Sample codec: raw interleaved PCM bytes <-> normalized frames
//!
//! Every integer width from 1 to 8 bytes goes through one 64-bit code path.
//! Decoding sign-extends signed words with a shift pair and re-centers
//! unsigned words by their zero offset, then divides by `2^(bits - 1)`.
//! Encoding is the inverse and truncates; it never rounds or clamps, so
//! samples outside [-1, 1] wrap the way two's-complement truncation does.

use crate::audio::format::{SampleEncoding, MAX_BYTES_PER_SAMPLE};
use crate::audio::frame::Frame;
use crate::error::{PcmError, Result};

/// `2^(bits - 1)` as a float, the full-scale value of a sample width.
#[inline]
fn full_scale(bytes_per_sample: usize) -> f64 {
    2f64.powi((bytes_per_sample * 8 - 1) as i32)
}

/// Zero offset of an unsigned word. For 8-byte words this is `i64::MIN`,
/// which the wrapping arithmetic below relies on.
#[inline]
fn zero_offset(bytes_per_sample: usize) -> i64 {
    (1u64 << (bytes_per_sample * 8 - 1)) as i64
}

fn check_width(bytes_per_sample: usize) -> Result<()> {
    if bytes_per_sample == 0 || bytes_per_sample > MAX_BYTES_PER_SAMPLE as usize {
        return Err(PcmError::unsupported(format!(
            "Unsupported number of bytes per sample: {}", bytes_per_sample
        )));
    }
    Ok(())
}

fn check_encoding(encoding: SampleEncoding) -> Result<()> {
    if !encoding.is_integer_pcm() {
        return Err(PcmError::unsupported(format!("Unsupported encoding: {}", encoding.name())));
    }
    Ok(())
}

/// Read one sample word and return it centered around zero.
///
/// `word` must be 1..=8 bytes and `encoding` integer PCM; callers check both.
pub(crate) fn read_word(word: &[u8], encoding: SampleEncoding, big_endian: bool) -> i64 {
    let accumulate = |acc: u64, &byte: &u8| (acc << 8) | byte as u64;
    let raw = if big_endian {
        word.iter().fold(0u64, accumulate)
    } else {
        word.iter().rev().fold(0u64, accumulate)
    };

    match encoding {
        SampleEncoding::PcmSigned => {
            let shift = 64 - word.len() as u32 * 8;
            ((raw << shift) as i64) >> shift
        }
        _ => (raw as i64).wrapping_sub(zero_offset(word.len())),
    }
}

/// Write a zero-centered value into `word`, truncating to its width.
pub(crate) fn write_word(value: i64, word: &mut [u8], encoding: SampleEncoding, big_endian: bool) {
    let value = match encoding {
        SampleEncoding::PcmUnsigned => value.wrapping_add(zero_offset(word.len())),
        _ => value,
    };

    let be = (value as u64).to_be_bytes();
    word.copy_from_slice(&be[be.len() - word.len()..]);
    if !big_endian {
        word.reverse();
    }
}

/// Decode one frame's raw bytes into normalized samples.
pub fn decode_frame(raw: &[u8], channels: u32, encoding: SampleEncoding, big_endian: bool) -> Result<Frame> {
    let channels = channels as usize;
    if channels == 0 || raw.is_empty() || raw.len() % channels != 0 {
        return Err(PcmError::unsupported(format!(
            "Frame of {} bytes cannot hold {} channels", raw.len(), channels
        )));
    }

    let bytes_per_sample = raw.len() / channels;
    check_width(bytes_per_sample)?;
    check_encoding(encoding)?;

    let scale = full_scale(bytes_per_sample);
    let samples = raw
        .chunks_exact(bytes_per_sample)
        .map(|word| read_word(word, encoding, big_endian) as f64 / scale)
        .collect();

    Ok(Frame::new(samples))
}

/// Encode a frame into `bytes_per_sample * channels` raw bytes.
pub fn encode_frame(frame: &Frame, bytes_per_sample: u32, encoding: SampleEncoding, big_endian: bool) -> Result<Vec<u8>> {
    let bytes_per_sample = bytes_per_sample as usize;
    check_width(bytes_per_sample)?;
    check_encoding(encoding)?;

    let scale = full_scale(bytes_per_sample);
    let mut raw = vec![0u8; bytes_per_sample * frame.channel_count()];
    for (word, &sample) in raw.chunks_exact_mut(bytes_per_sample).zip(frame.samples()) {
        write_word((sample * scale) as i64, word, encoding, big_endian);
    }

    Ok(raw)
}
