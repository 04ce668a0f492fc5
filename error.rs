//! Error types for dust-field configuration.

use thiserror::Error;

use crate::quality::Tier;

/// Errors raised when a [`Settings`](crate::Settings) value cannot be honoured.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A quality tier asks for more particles than the pool can hold.
    #[error("pool size {requested} for {tier:?} tier exceeds capacity {capacity}")]
    PoolTooLarge {
        tier: Tier,
        requested: usize,
        capacity: usize,
    },

    /// A tunable lies outside its accepted range.
    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    /// A min/max pair is the wrong way round.
    #[error("{name} range is inverted ({min} > {max})")]
    InvertedRange {
        name: &'static str,
        min: f32,
        max: f32,
    },

    /// A tier would never step the simulation.
    #[error("update stride for {0:?} tier must be at least 1")]
    ZeroStride(Tier),
}
