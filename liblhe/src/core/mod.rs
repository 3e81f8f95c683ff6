pub mod audio_constants;
pub mod bitio;
pub mod error;
pub mod huffman;
pub mod psnr;
pub mod types;

pub use audio_constants::*;
pub use bitio::{BitReader, BitWriter};
pub use error::{LheError, LheResult};
pub use huffman::HuffmanTable;
pub use psnr::{compute_psnr, ErrorStats, Psnr};
pub use types::*;
