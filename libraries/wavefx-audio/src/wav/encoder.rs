/// RIFF/WAVE encoding
///
/// Writes a RIFF header, a fmt chunk and a data chunk holding the interleaved
/// samples re-quantized to the buffer's stored bit depth.
use super::chunk::ChunkId;
use super::sample::PcmDepth;
use crate::error::{AudioError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;
use wavefx_core::{SampleBuffer, WavHeader};

/// Value of `cbSize` in an extensible fmt chunk
const EXTENSIBLE_EXTRA_SIZE: u16 = 22;

/// Encode `buffer` as a WAVE stream
///
/// Returns the header that was written.
///
/// # Errors
/// - `AudioError::InvalidBuffer` if the buffer is too large for a RIFF file
/// - `AudioError::UnsupportedFormat` if the stored bit depth cannot be encoded
/// - `AudioError::Io` if writing fails
pub fn encode_to<W: Write>(buffer: &SampleBuffer, mut writer: W) -> Result<WavHeader> {
    let depth = PcmDepth::from_bits(buffer.bits_per_sample())?;
    let header = WavHeader::for_buffer(buffer)?;

    write_header(&mut writer, &header)?;
    write_samples(&mut writer, buffer, depth)?;
    if header.data_size % 2 == 1 {
        writer.write_all(&[0])?;
    }
    writer.flush()?;

    Ok(header)
}

/// Encode `buffer` to a WAVE file, replacing any existing file
///
/// # Errors
/// `AudioError::Io` if the destination cannot be created or written, otherwise
/// as [`encode_to`].
pub fn encode(buffer: &SampleBuffer, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(AudioError::Io)?;
    let header = encode_to(buffer, BufWriter::new(file))?;
    debug!(
        "Encoded {} ({} bytes): {}",
        path.display(),
        header.file_size(),
        buffer
    );
    Ok(())
}

fn write_header<W: Write>(writer: &mut W, header: &WavHeader) -> Result<()> {
    writer.write_all(&ChunkId::RIFF.0)?;
    writer.write_all(&header.riff_size.to_le_bytes())?;
    writer.write_all(&ChunkId::WAVE.0)?;

    writer.write_all(&ChunkId::FMT.0)?;
    writer.write_all(&header.fmt_chunk_size().to_le_bytes())?;
    writer.write_all(&header.format_tag.as_u16().to_le_bytes())?;
    writer.write_all(&header.channels.to_le_bytes())?;
    writer.write_all(&header.sample_rate.to_le_bytes())?;
    writer.write_all(&header.byte_rate.to_le_bytes())?;
    writer.write_all(&header.block_align.to_le_bytes())?;
    writer.write_all(&header.bits_per_sample.to_le_bytes())?;

    if let Some(ext) = &header.extensible {
        writer.write_all(&EXTENSIBLE_EXTRA_SIZE.to_le_bytes())?;
        writer.write_all(&ext.valid_bits_per_sample.to_le_bytes())?;
        writer.write_all(&ext.channel_mask.to_le_bytes())?;
        writer.write_all(&ext.sub_format)?;
    }

    writer.write_all(&ChunkId::DATA.0)?;
    writer.write_all(&header.data_size.to_le_bytes())?;
    Ok(())
}

fn write_samples<W: Write>(writer: &mut W, buffer: &SampleBuffer, depth: PcmDepth) -> Result<()> {
    let sample_bytes = depth.bytes();
    let mut frame = vec![0u8; usize::from(buffer.channel_count()) * sample_bytes];
    let channels: Vec<&[f32]> = buffer.channels().collect();

    for index in 0..buffer.frame_count() {
        for (slot, channel) in frame.chunks_exact_mut(sample_bytes).zip(&channels) {
            depth.encode(channel[index], slot);
        }
        writer.write_all(&frame)?;
    }
    Ok(())
}
