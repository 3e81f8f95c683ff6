//! common types for lhe codec

// constants

/// Format tag of basic LHE files (the only tag defined so far)
pub const TAG_BASIC: u8 = 0;

/// mono header size: tag + five i32 fields
pub const MONO_HEADER_SIZE: usize = 21;

/// stereo header size: tag + seven i32 fields
pub const STEREO_HEADER_SIZE: usize = 29;

/// Meta-symbol standing for a run of null-hop symbols
pub const META_SYMBOL: u8 = b'X';

/// Run threshold at the start of every symbol pass
pub const INITIAL_RUN_THRESHOLD: u32 = 8;

/// Threshold increase after each meta-symbol
pub const RUN_THRESHOLD_GROWTH: u32 = 2;

/// Value the threshold relaxes toward when a short run is interrupted
pub const RUN_THRESHOLD_RELAX_TARGET: u32 = 8;

// types

/// header layout, decided by channel count
///
/// | Layout | Size | Fields after the tag byte                                  |
/// |--------|------|------------------------------------------------------------|
/// | Mono   | 21   | symbols, first amp, samples, max, min                      |
/// | Stereo | 29   | symbols0, symbols1, first amp0, first amp1, samples, max, min |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLayout {
    Mono,
    Stereo,
}

impl HeaderLayout {
    /// byte size of this header layout
    pub fn size(self) -> usize {
        match self {
            HeaderLayout::Mono => MONO_HEADER_SIZE,
            HeaderLayout::Stereo => STEREO_HEADER_SIZE,
        }
    }

    pub fn channels(self) -> usize {
        match self {
            HeaderLayout::Mono => 1,
            HeaderLayout::Stereo => 2,
        }
    }

    pub fn from_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(HeaderLayout::Mono),
            2 => Some(HeaderLayout::Stereo),
            _ => None,
        }
    }
}

// data structures

/// per-channel header fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelHeader {
    /// symbols in this channel's stream, after run compression
    pub symbol_count: i32,
    /// seed amplitude for the reconstructor
    pub first_amplitude: i32,
}

/// lhe file header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub tag: u8,
    /// one entry for mono, two for stereo
    pub channels: Vec<ChannelHeader>,
    /// samples per channel
    pub sample_count: i32,
    pub max_sample: i32,
    pub min_sample: i32,
}

impl Header {
    pub fn layout(&self) -> HeaderLayout {
        if self.channels.len() == 2 {
            HeaderLayout::Stereo
        } else {
            HeaderLayout::Mono
        }
    }

    pub fn size(&self) -> usize {
        self.layout().size()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

/// complete parsed lhe file
#[derive(Debug, Clone)]
pub struct LheFile {
    pub header: Header,
    /// decoded symbol stream per channel
    pub symbols: Vec<Vec<u8>>,
    /// compressed payload size in bytes (all channels)
    pub payload_size: usize,
}
