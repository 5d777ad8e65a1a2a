/// RIFF/WAVE decoding
///
/// Chunks are processed in file order. Unknown chunks are skipped by their
/// declared size, so decoding depends neither on chunk order nor on an
/// exhaustive list of chunk types.
use super::chunk::{ChunkId, ChunkReader};
use super::sample::PcmDepth;
use crate::error::{AudioError, Result};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};
use wavefx_core::{AudioFormat, ExtensibleFormat, FormatTag, SampleBuffer, SampleRate, WavHeader};

/// Bytes of the fmt fields every WAVE file carries
const FMT_BASE_SIZE: u32 = 16;
/// Bytes of the fmt chunk once the extensible block is included
const FMT_EXTENSIBLE_SIZE: u32 = 40;

/// Whether the data chunk is decoded or only measured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    Samples,
    HeaderOnly,
}

/// Fields collected while walking the chunk list
#[derive(Debug, Default)]
struct ParseState {
    riff_size: Option<u32>,
    fmt: Option<FmtChunk>,
    data_size: Option<u32>,
    samples: Option<SampleBuffer>,
}

#[derive(Debug, Clone, Copy)]
struct FmtChunk {
    format_tag: FormatTag,
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
    extensible: Option<ExtensibleFormat>,
}

impl FmtChunk {
    fn header(&self, riff_size: u32, data_size: u32) -> WavHeader {
        WavHeader {
            file_name: None,
            riff_size,
            format_tag: self.format_tag,
            channels: self.channels,
            sample_rate: self.sample_rate,
            byte_rate: self.byte_rate,
            block_align: self.block_align,
            bits_per_sample: self.bits_per_sample,
            extensible: self.extensible,
            data_size,
        }
    }
}

/// Decode a WAVE stream into its header and samples
///
/// # Errors
/// - `AudioError::Format` if the stream is not RIFF/WAVE, a chunk is truncated,
///   or no fmt chunk precedes the data chunk
/// - `AudioError::UnsupportedFormat` for compressed/float encodings or bit
///   depths other than 8, 16 and 24
pub fn decode_from<R: Read>(reader: R) -> Result<(WavHeader, SampleBuffer)> {
    let state = parse(reader, ReadMode::Samples)?;
    let header = finish_header(&state)?;
    let samples = state
        .samples
        .ok_or_else(|| AudioError::format("missing data chunk"))?;
    Ok((header, samples))
}

/// Read only the header of a WAVE stream; the sample data is skipped
///
/// # Errors
/// Same structural errors as [`decode_from`]. The encoding is not checked, so
/// compressed files can be probed.
pub fn probe_from<R: Read>(reader: R) -> Result<WavHeader> {
    let state = parse(reader, ReadMode::HeaderOnly)?;
    finish_header(&state)
}

/// Decode a WAVE file into a `SampleBuffer`
///
/// # Errors
/// `AudioError::FileNotFound` or `AudioError::Io` if the file cannot be
/// opened, otherwise as [`decode_from`].
pub fn decode(path: &Path) -> Result<SampleBuffer> {
    decode_with_header(path).map(|(_, samples)| samples)
}

/// Decode a WAVE file and keep its header (with the file name filled in)
///
/// # Errors
/// As [`decode`].
pub fn decode_with_header(path: &Path) -> Result<(WavHeader, SampleBuffer)> {
    let (mut header, samples) = decode_from(open(path)?)?;
    header.file_name = file_name(path);
    debug!("Decoded {}: {}", path.display(), samples);
    Ok((header, samples))
}

/// Read the header of a WAVE file
///
/// # Errors
/// As [`probe_from`], plus open failures.
pub fn probe(path: &Path) -> Result<WavHeader> {
    let mut header = probe_from(open(path)?)?;
    header.file_name = file_name(path);
    Ok(header)
}

fn open(path: &Path) -> Result<BufReader<File>> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(AudioError::FileNotFound(path.display().to_string()))
        }
        Err(e) => Err(AudioError::Io(e)),
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

fn finish_header(state: &ParseState) -> Result<WavHeader> {
    let riff_size = state
        .riff_size
        .ok_or_else(|| AudioError::format("not a RIFF container (empty input)"))?;
    let fmt = state
        .fmt
        .ok_or_else(|| AudioError::format("missing fmt chunk"))?;
    let data_size = state
        .data_size
        .ok_or_else(|| AudioError::format("missing data chunk"))?;
    Ok(fmt.header(riff_size, data_size))
}

fn parse<R: Read>(reader: R, mode: ReadMode) -> Result<ParseState> {
    let mut chunks = ChunkReader::new(reader);
    let mut state = ParseState::default();

    while let Some(id) = chunks.next_id()? {
        if state.riff_size.is_none() && id != ChunkId::RIFF {
            return Err(AudioError::format(format!(
                "not a RIFF container (found '{}')",
                id
            )));
        }

        match id {
            ChunkId::RIFF => read_riff_header(&mut chunks, &mut state)?,
            ChunkId::FMT => read_fmt(&mut chunks, &mut state)?,
            ChunkId::DATA => read_data(&mut chunks, &mut state, mode)?,
            other => {
                let at = chunks.offset() - 4;
                let size = chunks.read_u32("chunk size")?;
                info!(
                    "Encountered unknown chunk, ID: '{}' ({:#010x}), {} bytes at byte {}",
                    other,
                    other.as_u32(),
                    size,
                    at
                );
                chunks.skip(u64::from(size), &format!("'{}' chunk", other))?;
                chunks.skip_padding(size)?;
            }
        }
    }

    Ok(state)
}

fn read_riff_header<R: Read>(chunks: &mut ChunkReader<R>, state: &mut ParseState) -> Result<()> {
    if state.riff_size.is_some() {
        return Err(AudioError::format("unexpected second RIFF header"));
    }

    let riff_size = chunks.read_u32("RIFF size")?;
    let form_type = chunks.read_id("RIFF form type")?;
    if form_type != ChunkId::WAVE {
        return Err(AudioError::format(format!(
            "not a WAVE file (RIFF form type '{}')",
            form_type
        )));
    }

    debug!("RIFF header, declared size {} bytes", riff_size);
    state.riff_size = Some(riff_size);
    Ok(())
}

fn read_fmt<R: Read>(chunks: &mut ChunkReader<R>, state: &mut ParseState) -> Result<()> {
    let size = chunks.read_u32("fmt chunk size")?;

    // The samples are already laid out by the first fmt; a later one cannot apply
    if state.data_size.is_some() {
        warn!("Skipping fmt chunk after data chunk ({} bytes)", size);
        chunks.skip(u64::from(size), "fmt chunk")?;
        return chunks.skip_padding(size);
    }

    if size < FMT_BASE_SIZE {
        return Err(AudioError::format(format!(
            "fmt chunk is {} bytes, expected at least {}",
            size, FMT_BASE_SIZE
        )));
    }

    let format_tag = FormatTag::from_u16(chunks.read_u16("format tag")?);
    let channels = chunks.read_u16("channel count")?;
    let sample_rate = chunks.read_u32("sample rate")?;
    let byte_rate = chunks.read_u32("byte rate")?;
    let block_align = chunks.read_u16("block align")?;
    let bits_per_sample = chunks.read_u16("bits per sample")?;
    let mut consumed = FMT_BASE_SIZE;

    let extensible = if format_tag == FormatTag::Extensible {
        if size < FMT_EXTENSIBLE_SIZE {
            return Err(AudioError::format(format!(
                "extensible fmt chunk is {} bytes, expected at least {}",
                size, FMT_EXTENSIBLE_SIZE
            )));
        }
        let _extra_params_size = chunks.read_u16("extra params size")?;
        let valid_bits_per_sample = chunks.read_u16("valid bits per sample")?;
        let channel_mask = chunks.read_u32("channel mask")?;
        let sub_format = chunks.read_array::<16>("sub-format GUID")?;
        consumed = FMT_EXTENSIBLE_SIZE;

        let ext = ExtensibleFormat {
            valid_bits_per_sample,
            channel_mask,
            sub_format,
        };
        if ext.is_pcm() {
            debug!("Sub-format is KSDATAFORMAT_SUBTYPE_PCM");
        }
        Some(ext)
    } else {
        None
    };

    chunks.skip(u64::from(size - consumed), "fmt chunk")?;
    chunks.skip_padding(size)?;

    if state.fmt.is_some() {
        warn!("Duplicate fmt chunk, later one wins");
    }

    debug!(
        "fmt: {} ({:#06x}), {} ch, {} Hz, {} bits",
        format_tag,
        format_tag.as_u16(),
        channels,
        sample_rate,
        bits_per_sample
    );

    state.fmt = Some(FmtChunk {
        format_tag,
        channels,
        sample_rate,
        byte_rate,
        block_align,
        bits_per_sample,
        extensible,
    });
    Ok(())
}

fn read_data<R: Read>(
    chunks: &mut ChunkReader<R>,
    state: &mut ParseState,
    mode: ReadMode,
) -> Result<()> {
    let size = chunks.read_u32("data chunk size")?;

    if state.data_size.is_some() {
        warn!("Skipping additional data chunk ({} bytes)", size);
        chunks.skip(u64::from(size), "data chunk")?;
        return chunks.skip_padding(size);
    }

    let fmt = state
        .fmt
        .ok_or_else(|| AudioError::format("data chunk appears before fmt chunk"))?;

    if fmt.channels == 0 {
        return Err(AudioError::format("fmt chunk declares zero channels"));
    }
    if fmt.sample_rate == 0 {
        return Err(AudioError::format("fmt chunk declares a zero sample rate"));
    }

    match mode {
        ReadMode::HeaderOnly => chunks.skip(u64::from(size), "data chunk")?,
        ReadMode::Samples => {
            let depth = check_supported(&fmt)?;
            let payload = chunks.read_payload(size, "data chunk")?;
            state.samples = Some(deinterleave(&fmt, depth, &payload)?);
        }
    }
    chunks.skip_padding(size)?;

    state.data_size = Some(size);
    Ok(())
}

/// Reject encodings this codec cannot turn into samples
fn check_supported(fmt: &FmtChunk) -> Result<PcmDepth> {
    match (fmt.format_tag, &fmt.extensible) {
        (FormatTag::Pcm, _) => {}
        (FormatTag::Extensible, Some(ext)) if ext.is_pcm() => {}
        (FormatTag::Extensible, Some(ext)) => {
            return Err(AudioError::unsupported(format!(
                "extensible sub-format {}",
                guid_hex(&ext.sub_format)
            )));
        }
        (tag, _) => {
            return Err(AudioError::unsupported(format!(
                "{} audio (format tag {:#06x})",
                tag,
                tag.as_u16()
            )));
        }
    }

    PcmDepth::from_bits(fmt.bits_per_sample)
}

fn guid_hex(guid: &[u8; 16]) -> String {
    guid.iter().map(|byte| format!("{:02x}", byte)).collect()
}

/// Split interleaved frames into per-channel sequences
fn deinterleave(fmt: &FmtChunk, depth: PcmDepth, payload: &[u8]) -> Result<SampleBuffer> {
    let channel_count = usize::from(fmt.channels);
    let frame_bytes = channel_count * depth.bytes();

    if usize::from(fmt.block_align) != frame_bytes {
        warn!(
            "Block align {} does not match {} channels of {} bits, using {}",
            fmt.block_align, fmt.channels, fmt.bits_per_sample, frame_bytes
        );
    }

    let frame_count = payload.len() / frame_bytes;
    let leftover = payload.len() % frame_bytes;
    if leftover != 0 {
        warn!("Ignoring {} bytes of trailing partial frame", leftover);
    }

    let mut channels: Vec<Vec<f32>> = (0..channel_count)
        .map(|_| Vec::with_capacity(frame_count))
        .collect();

    for frame in payload.chunks_exact(frame_bytes) {
        for (channel, sample) in channels.iter_mut().zip(frame.chunks_exact(depth.bytes())) {
            channel.push(depth.decode(sample));
        }
    }

    let format = AudioFormat::new(
        SampleRate::new(fmt.sample_rate),
        fmt.channels,
        fmt.bits_per_sample,
    );
    Ok(SampleBuffer::new(format, channels)?)
}
