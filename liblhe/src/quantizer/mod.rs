//! Logarithmic hop quantization for lhe
//!
//! Each sample becomes a hop index relative to a causal prediction. Hop
//! offsets grow geometrically away from the null hop, and the step size
//! shrinks through flat passages and snaps back on the first large hop.

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod predictor;

pub use config::{default_priority_table, LheConfig, PredictorMode};
pub use decoder::Reconstructor;
pub use encoder::{QuantizedChannel, Quantizer};
pub use predictor::{HopLadder, HopLevel, Predictor, PredictorState, SampleBounds};
