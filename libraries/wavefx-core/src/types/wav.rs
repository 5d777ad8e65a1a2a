//! RIFF/WAVE container metadata
//!
//! Everything the codec reads or writes besides the samples themselves. None of
//! this is part of a `SampleBuffer`'s identity; it travels alongside it.

use super::audio::{AudioFormat, SampleRate};
use super::buffer::{format_runtime, SampleBuffer};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// `KSDATAFORMAT_SUBTYPE_PCM` as it is laid out on disk
pub const KSDATAFORMAT_SUBTYPE_PCM: [u8; 16] = [
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xaa, 0x00, 0x38, 0x9b, 0x71,
];

/// Speaker positions covered by the default channel mask
const MAX_MASKED_CHANNELS: u16 = 18;

/// `wFormatTag` values of the fmt chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormatTag {
    /// Linear PCM
    Pcm,
    /// IEEE 754 floating point
    IeeeFloat,
    /// ITU G.711 A-law
    ALaw,
    /// ITU G.711 mu-law
    MuLaw,
    /// IMA ADPCM
    ImaAdpcm,
    /// Yamaha ITU G.723 ADPCM
    YamahaItuG723Adpcm,
    /// GSM 6.10
    Gsm610,
    /// ITU G.721 ADPCM
    ItuG721Adpcm,
    /// MPEG
    Mpeg,
    /// `WAVE_FORMAT_EXTENSIBLE`; the real encoding is in the sub-format GUID
    Extensible,
    /// Any other tag
    Unknown(u16),
}

/// Recognized tags with their display names
const FORMAT_TAGS: [(u16, FormatTag, &str); 10] = [
    (0x0001, FormatTag::Pcm, "Linear PCM"),
    (0x0003, FormatTag::IeeeFloat, "IEEE Floating Point"),
    (0x0006, FormatTag::ALaw, "ALaw"),
    (0x0007, FormatTag::MuLaw, "MuLaw"),
    (0x0011, FormatTag::ImaAdpcm, "IMA ADPCM"),
    (0x0016, FormatTag::YamahaItuG723Adpcm, "Yamaha ITU G.723 ADPCM"),
    (0x0031, FormatTag::Gsm610, "GSM 6.10"),
    (0x0040, FormatTag::ItuG721Adpcm, "ITU G.721 ADPCM"),
    (0x0050, FormatTag::Mpeg, "MPEG"),
    (0xFFFE, FormatTag::Extensible, "Extensible"),
];

impl FormatTag {
    /// Look up a raw `wFormatTag` value
    pub fn from_u16(value: u16) -> Self {
        FORMAT_TAGS
            .iter()
            .find(|(raw, _, _)| *raw == value)
            .map_or(Self::Unknown(value), |(_, tag, _)| *tag)
    }

    /// Raw `wFormatTag` value
    pub fn as_u16(self) -> u16 {
        match self {
            Self::Unknown(value) => value,
            known => FORMAT_TAGS
                .iter()
                .find(|(_, tag, _)| *tag == known)
                .map_or(0, |(raw, _, _)| *raw),
        }
    }

    /// Display name
    pub fn name(self) -> &'static str {
        FORMAT_TAGS
            .iter()
            .find(|(_, tag, _)| *tag == self)
            .map_or("Unknown", |(_, _, name)| *name)
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extra fmt fields present when the tag is `Extensible`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensibleFormat {
    /// Bits of actual precision in each container sample
    pub valid_bits_per_sample: u16,
    /// Speaker position bit mask
    pub channel_mask: u32,
    /// Sub-format GUID bytes
    pub sub_format: [u8; 16],
}

impl ExtensibleFormat {
    /// Extensible block describing plain PCM for the given layout
    pub fn pcm(channels: u16, bits_per_sample: u16) -> Self {
        let channel_mask = if channels <= MAX_MASKED_CHANNELS {
            (1u32 << channels) - 1
        } else {
            0
        };
        Self {
            valid_bits_per_sample: bits_per_sample,
            channel_mask,
            sub_format: KSDATAFORMAT_SUBTYPE_PCM,
        }
    }

    /// Whether the sub-format GUID is `KSDATAFORMAT_SUBTYPE_PCM`
    pub fn is_pcm(&self) -> bool {
        self.sub_format == KSDATAFORMAT_SUBTYPE_PCM
    }
}

/// Header fields of a WAVE file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavHeader {
    /// File name the header was read from, if any
    pub file_name: Option<String>,
    /// Size declared by the RIFF chunk (file size - 8); informational only
    pub riff_size: u32,
    /// Format tag
    pub format_tag: FormatTag,
    /// Number of channels
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Average bytes per second
    pub byte_rate: u32,
    /// Bytes per interleaved frame
    pub block_align: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Present when `format_tag` is `Extensible`
    pub extensible: Option<ExtensibleFormat>,
    /// Size of the data chunk payload in bytes
    pub data_size: u32,
}

impl WavHeader {
    /// Whether a layout has to be written with `WAVE_FORMAT_EXTENSIBLE`
    pub fn requires_extensible(format: &AudioFormat) -> bool {
        format.channels > 2 || format.bits_per_sample > 16
    }

    /// Build the header an encoder writes for `buffer`
    ///
    /// # Errors
    /// Returns `CoreError::InvalidBuffer` if the sample data does not fit in a
    /// RIFF file (4 GiB limit) or the layout does not fit the fmt fields.
    pub fn for_buffer(buffer: &SampleBuffer) -> Result<Self> {
        let format = buffer.format();

        let block_align = u16::try_from(format.block_align()).map_err(|_| {
            CoreError::invalid_buffer(format!(
                "{} channels of {} bits exceed the maximum block size",
                format.channels, format.bits_per_sample
            ))
        })?;

        let byte_rate = format.byte_rate().ok_or_else(|| {
            CoreError::invalid_buffer(format!(
                "{} Hz with {}-byte frames exceeds the maximum byte rate",
                format.sample_rate.as_hz(),
                block_align
            ))
        })?;

        let data_size = u64::from(block_align)
            .checked_mul(buffer.frame_count() as u64)
            .and_then(|size| u32::try_from(size).ok())
            .ok_or_else(|| {
                CoreError::invalid_buffer(format!(
                    "{} frames exceed the 4 GiB RIFF size limit",
                    buffer.frame_count()
                ))
            })?;

        let (format_tag, extensible) = if Self::requires_extensible(&format) {
            (
                FormatTag::Extensible,
                Some(ExtensibleFormat::pcm(format.channels, format.bits_per_sample)),
            )
        } else {
            (FormatTag::Pcm, None)
        };

        let mut header = Self {
            file_name: None,
            riff_size: 0,
            format_tag,
            channels: format.channels,
            sample_rate: format.sample_rate.as_hz(),
            byte_rate,
            block_align,
            bits_per_sample: format.bits_per_sample,
            extensible,
            data_size,
        };

        header.riff_size = u32::try_from(header.file_size() - 8).map_err(|_| {
            CoreError::invalid_buffer("encoded file exceeds the 4 GiB RIFF size limit")
        })?;

        Ok(header)
    }

    /// Size of the fmt chunk payload this header serializes to
    pub fn fmt_chunk_size(&self) -> u32 {
        if self.extensible.is_some() {
            40
        } else {
            16
        }
    }

    /// Total file size when written with only fmt and data chunks
    pub fn file_size(&self) -> u64 {
        let data = u64::from(self.data_size) + u64::from(self.data_size % 2);
        12 + 8 + u64::from(self.fmt_chunk_size()) + 8 + data
    }

    /// Tag with `Extensible` resolved through its sub-format
    ///
    /// An extensible header carrying the PCM GUID is plain PCM.
    pub fn effective_tag(&self) -> FormatTag {
        match (self.format_tag, &self.extensible) {
            (FormatTag::Extensible, Some(ext)) if ext.is_pcm() => FormatTag::Pcm,
            (tag, _) => tag,
        }
    }

    /// Whether the samples are integer PCM
    pub fn is_pcm(&self) -> bool {
        self.effective_tag() == FormatTag::Pcm
    }

    /// Format information for a buffer decoded from this header
    pub fn audio_format(&self) -> AudioFormat {
        AudioFormat::new(
            SampleRate::new(self.sample_rate),
            self.channels,
            self.bits_per_sample,
        )
    }

    /// Samples per channel in the data chunk
    pub fn frame_count(&self) -> u64 {
        let bits_per_frame = u64::from(self.channels) * u64::from(self.bits_per_sample);
        if bits_per_frame == 0 {
            return 0;
        }
        u64::from(self.data_size) * 8 / bits_per_frame
    }

    /// Human-readable runtime, e.g. `2m 6s`
    pub fn runtime(&self) -> String {
        format_runtime(self.frame_count(), self.sample_rate)
    }
}

impl fmt::Display for WavHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-Wave File-")?;
        writeln!(f, "\tFileName: {}", self.file_name.as_deref().unwrap_or(""))?;
        writeln!(f, "\tSample Rate = {} Hz", self.sample_rate)?;
        writeln!(f, "\tAudio Format = {}", self.format_tag)?;
        writeln!(f, "\tNumber of Channels = {}", self.channels)?;
        writeln!(f, "\tByte Rate = {}", self.byte_rate)?;
        writeln!(f, "\tBlock Align = {}", self.block_align)?;
        writeln!(f, "\tBits per Sample = {}", self.bits_per_sample)?;
        writeln!(f, "\tNumber of Samples = {}", self.frame_count())?;
        writeln!(f, "\tRuntime = {}", self.runtime())
    }
}
