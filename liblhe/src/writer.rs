use crate::core::{huffman, Header, HeaderLayout, LheError, LheResult};

/// binary writer for lhe format
pub struct Writer {
    buffer: Vec<u8>,
}

impl Writer {
    /// new writer
    pub fn new() -> Self {
        Writer { buffer: Vec::new() }
    }

    /// write a complete lhe file
    ///
    /// Layout: header, then one Huffman stream per channel in channel order.
    pub fn write(mut self, header: &Header, symbols: &[Vec<u8>]) -> LheResult<Vec<u8>> {
        if HeaderLayout::from_channels(header.channel_count()).is_none() {
            return Err(LheError::container(format!(
                "{} channels cannot be stored, only mono or stereo",
                header.channel_count()
            )));
        }
        if symbols.len() != header.channel_count() {
            return Err(LheError::container(format!(
                "header describes {} channels but {} symbol streams were given",
                header.channel_count(),
                symbols.len()
            )));
        }
        for (ch, (stream, ch_header)) in symbols.iter().zip(&header.channels).enumerate() {
            if stream.len() != ch_header.symbol_count as usize {
                return Err(LheError::container(format!(
                    "channel {} holds {} symbols, header says {}",
                    ch,
                    stream.len(),
                    ch_header.symbol_count
                )));
            }
        }

        self.write_header(header);

        for stream in symbols {
            self.buffer.extend(huffman::encode(stream));
        }

        Ok(self.buffer)
    }

    /// header bytes only
    pub fn header_bytes(header: &Header) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_header(header);
        writer.buffer
    }

    fn write_header(&mut self, header: &Header) {
        self.buffer.reserve(header.size());
        self.buffer.push(header.tag);

        // per-channel fields are grouped by kind, not by channel
        for ch in &header.channels {
            self.write_i32(ch.symbol_count);
        }
        for ch in &header.channels {
            self.write_i32(ch.first_amplitude);
        }

        self.write_i32(header.sample_count);
        self.write_i32(header.max_sample);
        self.write_i32(header.min_sample);
    }

    fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}
