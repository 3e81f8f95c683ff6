use tracing::debug;

use crate::core::{
    huffman, ChannelHeader, Header, HeaderLayout, LheError, LheFile, LheResult, TAG_BASIC,
};

/// binary reader for lhe format
pub struct Reader;

impl Reader {
    /// new reader
    pub fn new() -> Self {
        Reader
    }

    /// read and parse an lhe file, detecting mono or stereo
    ///
    /// The tag byte does not record the layout, so both are tried; a layout
    /// only fits when every stream's length matches its header field and the
    /// streams end exactly at the end of the file. Mono wins if both fit.
    /// When neither fits, the error carries both causes.
    pub fn read(&self, data: &[u8]) -> LheResult<LheFile> {
        let mono_err = match self.read_with_layout(data, HeaderLayout::Mono) {
            Ok(file) => return Ok(file),
            Err(e) => e,
        };
        match self.read_with_layout(data, HeaderLayout::Stereo) {
            Ok(file) => Ok(file),
            Err(stereo_err) => Err(LheError::container(format!(
                "not a mono file ({}) nor a stereo file ({})",
                mono_err, stereo_err
            ))),
        }
    }

    /// read and parse an lhe file of a known layout
    pub fn read_with_layout(&self, data: &[u8], layout: HeaderLayout) -> LheResult<LheFile> {
        let header = self.read_header(data, layout)?;
        let mut pos = header.size();
        let mut symbols = Vec::with_capacity(header.channel_count());

        for (ch, ch_header) in header.channels.iter().enumerate() {
            let (stream, consumed) = huffman::decode_prefix(&data[pos..])?;
            if stream.len() != ch_header.symbol_count as usize {
                return Err(LheError::container(format!(
                    "channel {} stream holds {} symbols, header says {}",
                    ch,
                    stream.len(),
                    ch_header.symbol_count
                )));
            }
            pos += consumed;
            symbols.push(stream);
        }

        if pos != data.len() {
            return Err(LheError::container(format!(
                "{} trailing bytes after the last stream",
                data.len() - pos
            )));
        }

        debug!(
            channels = header.channel_count(),
            samples = header.sample_count,
            payload_bytes = pos - header.size(),
            "read lhe container"
        );

        Ok(LheFile {
            payload_size: pos - header.size(),
            header,
            symbols,
        })
    }

    /// parse and validate the header alone
    pub fn read_header(&self, data: &[u8], layout: HeaderLayout) -> LheResult<Header> {
        if data.len() < layout.size() {
            return Err(LheError::container(format!(
                "file is {} bytes, a {:?} header needs {}",
                data.len(),
                layout,
                layout.size()
            )));
        }

        let mut cursor = Cursor::new(data);

        let tag = cursor.read_u8()?;
        if tag != TAG_BASIC {
            return Err(LheError::container(format!("unknown format tag {}", tag)));
        }

        let channels = layout.channels();
        let mut symbol_counts = Vec::with_capacity(channels);
        for _ in 0..channels {
            symbol_counts.push(cursor.read_i32_le()?);
        }
        let mut first_amplitudes = Vec::with_capacity(channels);
        for _ in 0..channels {
            first_amplitudes.push(cursor.read_i32_le()?);
        }

        let header = Header {
            tag,
            channels: symbol_counts
                .into_iter()
                .zip(first_amplitudes)
                .map(|(symbol_count, first_amplitude)| ChannelHeader {
                    symbol_count,
                    first_amplitude,
                })
                .collect(),
            sample_count: cursor.read_i32_le()?,
            max_sample: cursor.read_i32_le()?,
            min_sample: cursor.read_i32_le()?,
        };

        self.validate_header(&header)?;
        Ok(header)
    }

    fn validate_header(&self, header: &Header) -> LheResult<()> {
        let i16_range = i16::MIN as i32..=i16::MAX as i32;

        if header.sample_count < 0 {
            return Err(LheError::container("negative sample count"));
        }
        if !i16_range.contains(&header.min_sample) || !i16_range.contains(&header.max_sample) {
            return Err(LheError::container(
                "sample bounds outside the 16-bit range",
            ));
        }
        if header.min_sample > header.max_sample {
            return Err(LheError::container(format!(
                "minimum sample {} above maximum {}",
                header.min_sample, header.max_sample
            )));
        }
        for (ch, ch_header) in header.channels.iter().enumerate() {
            if ch_header.symbol_count < 0 {
                return Err(LheError::container(format!(
                    "negative symbol count in channel {}",
                    ch
                )));
            }
            if ch_header.symbol_count > header.sample_count {
                return Err(LheError::container(format!(
                    "channel {} has more symbols than samples",
                    ch
                )));
            }
            if !i16_range.contains(&ch_header.first_amplitude) {
                return Err(LheError::container(format!(
                    "first amplitude of channel {} outside the 16-bit range",
                    ch
                )));
            }
        }
        Ok(())
    }
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

// cursor helper

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Cursor { data, pos: 0 }
    }

    fn read_bytes(&mut self, count: usize) -> LheResult<&'a [u8]> {
        if self.pos + count > self.data.len() {
            return Err(LheError::container("unexpected end of file"));
        }
        let bytes = &self.data[self.pos..self.pos + count];
        self.pos += count;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> LheResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_i32_le(&mut self) -> LheResult<i32> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
