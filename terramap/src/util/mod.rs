//! Noise and math utilities.

pub mod noise;
pub mod math;

pub use noise::{FbmParams, DomainWarp};
pub use math::{smoothstep, band_blend};
