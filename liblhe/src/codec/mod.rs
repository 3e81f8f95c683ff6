//! Whole-file encode/decode for lhe
//!
//! Encode: samples -> quantizer -> symbol codec -> Huffman -> container.
//! Decode runs the same chain backwards. Channels never share state, so the
//! two halves of a stereo file are processed independently (on separate
//! rayon tasks with the `parallel` feature).

pub mod decoder;
pub mod encoder;

pub use decoder::{DecodedAudio, Decoder};
pub use encoder::{ChannelReport, EncodeReport, Encoder};

/// Apply `f` to every channel, in parallel for stereo when enabled
fn map_channels<I, T, F>(inputs: &[I], f: F) -> Vec<T>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> T + Sync,
{
    #[cfg(feature = "parallel")]
    if let [left, right] = inputs {
        let (l, r) = rayon::join(|| f(left), || f(right));
        return vec![l, r];
    }

    inputs.iter().map(f).collect()
}

/// split interleaved samples into one vec per channel
pub fn deinterleave(samples: &[i16], channels: usize) -> Vec<Vec<i16>> {
    (0..channels)
        .map(|ch| samples.iter().skip(ch).step_by(channels).copied().collect())
        .collect()
}

/// interleave equally long channels
pub fn interleave(channels: &[Vec<i16>]) -> Vec<i16> {
    let len = channels.first().map(|c| c.len()).unwrap_or(0);
    let mut interleaved = Vec::with_capacity(len * channels.len());
    for i in 0..len {
        for ch in channels {
            interleaved.push(ch[i]);
        }
    }
    interleaved
}
