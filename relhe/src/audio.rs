use anyhow::{Context, Result};
use liblhe_audio::core::{f32_to_i16, scale_to_i16, OUTPUT_SAMPLE_RATE};
use liblhe_audio::LheError;
use std::io::{Cursor, Write};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// 16-bit PCM read from a WAV file
#[derive(Debug, Clone, PartialEq)]
pub struct PcmAudio {
    /// interleaved samples
    pub samples: Vec<i16>,
    pub channels: usize,
    pub sample_rate: u32,
    /// largest sample over all channels, 0 when empty
    pub max: i16,
    /// smallest sample over all channels, 0 when empty
    pub min: i16,
}

impl PcmAudio {
    pub fn new(samples: Vec<i16>, channels: usize, sample_rate: u32) -> Self {
        let max = samples.iter().copied().max().unwrap_or(0);
        let min = samples.iter().copied().min().unwrap_or(0);
        PcmAudio {
            samples,
            channels,
            sample_rate,
            max,
            min,
        }
    }

    /// samples per channel
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels
        }
    }
}

/// Read a WAV file as 16-bit PCM
pub fn read_wav(path: &Path) -> Result<PcmAudio> {
    let file = std::fs::File::open(path).context("Failed to open audio file")?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    read_from_source(mss, path.extension().and_then(|e| e.to_str()))
}

/// Read WAV from bytes (for cross-platform/WASM support)
pub fn read_wav_from_bytes(bytes: &[u8]) -> Result<PcmAudio> {
    let cursor = Cursor::new(bytes.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());
    read_from_source(mss, Some("wav"))
}

fn read_from_source(mss: MediaSourceStream, extension: Option<&str>) -> Result<PcmAudio> {
    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let mut format = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Unsupported audio format")?
        .format;

    // Find the first audio track
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found")?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Unknown sample rate")?;
    let channels = track
        .codec_params
        .channels
        .context("Unknown channel count")?
        .count();

    if channels == 0 || channels > 2 {
        return Err(LheError::audio_io(format!(
            "{} channels, only mono and stereo can be encoded",
            channels
        ))
        .into());
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create decoder")?;

    let mut samples = Vec::new();

    // Decode all packets
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break
            }
            Err(e) => return Err(e).context("Error reading packet"),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(e).context("Error decoding packet"),
        };

        append_samples(&decoded, &mut samples, channels)?;
    }

    debug!(
        channels,
        sample_rate,
        samples = samples.len(),
        "read wav"
    );

    Ok(PcmAudio::new(samples, channels, sample_rate))
}

/// Interleave a decoded buffer as 16-bit samples
///
/// 16-bit input is kept verbatim; other integer widths are shifted to 16 bits.
fn append_samples(buffer: &AudioBufferRef, samples: &mut Vec<i16>, channels: usize) -> Result<()> {
    fn push_frames<S: symphonia::core::sample::Sample>(
        buf: &symphonia::core::audio::AudioBuffer<S>,
        samples: &mut Vec<i16>,
        channels: usize,
        convert: impl Fn(S) -> i16,
    ) {
        for frame in 0..buf.frames() {
            for ch in 0..channels {
                samples.push(convert(buf.chan(ch)[frame]));
            }
        }
    }

    match buffer {
        AudioBufferRef::S16(buf) => push_frames(&**buf, samples, channels, |s| s),
        AudioBufferRef::S24(buf) => {
            push_frames(&**buf, samples, channels, |s| scale_to_i16(s.inner(), 24))
        }
        AudioBufferRef::S32(buf) => push_frames(&**buf, samples, channels, |s| scale_to_i16(s, 32)),
        AudioBufferRef::S8(buf) => {
            push_frames(&**buf, samples, channels, |s| scale_to_i16(s as i32, 8))
        }
        AudioBufferRef::U8(buf) => push_frames(&**buf, samples, channels, |s| {
            scale_to_i16(s as i32 - 128, 8)
        }),
        AudioBufferRef::F32(buf) => push_frames(&**buf, samples, channels, f32_to_i16),
        AudioBufferRef::F64(buf) => {
            push_frames(&**buf, samples, channels, |s| f32_to_i16(s as f32))
        }
        _ => {
            return Err(LheError::audio_io("unsupported PCM sample format").into());
        }
    }
    Ok(())
}

/// Write 16-bit samples to a WAV file
pub fn write_wav(path: &Path, samples: &[i16], channels: usize) -> Result<()> {
    let bytes = write_wav_to_bytes(samples, channels)?;
    std::fs::write(path, bytes).context("Failed to write WAV file")
}

/// Write 16-bit samples to WAV format in memory
///
/// The container keeps no sample rate, so output is always
/// `OUTPUT_SAMPLE_RATE`.
pub fn write_wav_to_bytes(samples: &[i16], channels: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    let sample_rate = OUTPUT_SAMPLE_RATE;
    let bytes_per_sample = 2;
    let data_size = samples.len() * bytes_per_sample;
    let file_size = 36 + data_size; // 44 byte header - 8 + data_size

    // RIFF header
    buffer.write_all(b"RIFF")?;
    buffer.write_all(&(file_size as u32).to_le_bytes())?;
    buffer.write_all(b"WAVE")?;

    // fmt chunk
    buffer.write_all(b"fmt ")?;
    buffer.write_all(&16u32.to_le_bytes())?; // chunk size
    buffer.write_all(&1u16.to_le_bytes())?; // format = PCM
    buffer.write_all(&(channels as u16).to_le_bytes())?;
    buffer.write_all(&sample_rate.to_le_bytes())?;
    let byte_rate = sample_rate * channels as u32 * bytes_per_sample as u32;
    buffer.write_all(&byte_rate.to_le_bytes())?;
    let block_align = channels as u16 * bytes_per_sample as u16;
    buffer.write_all(&block_align.to_le_bytes())?;
    buffer.write_all(&16u16.to_le_bytes())?; // bits per sample

    // data chunk
    buffer.write_all(b"data")?;
    buffer.write_all(&(data_size as u32).to_le_bytes())?;

    for &sample in samples {
        buffer.write_all(&sample.to_le_bytes())?;
    }

    Ok(buffer)
}
