//! Greenhouse-gas accounting and ESG target tracking.
//!
//! Pure, synchronous calculations over immutable tables: scope 1/2/3
//! emissions from consumption data, intensity metrics, reduction target
//! pacing, offset selection under a budget, and industry benchmark deltas.

pub mod benchmark;
pub mod config;
pub mod consumption;
pub mod engine;
pub mod error;
pub mod factors;
pub mod import;
pub mod insight;
pub mod intensity;
pub mod models;
pub mod offsets;
pub mod scope;
pub mod targets;

pub use config::{EngineConfig, FlightMode};
pub use error::{EngineError, Result};
pub use factors::EmissionFactorRegistry;
pub use offsets::OffsetCatalog;

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(-2.345_1), -2.35);
        assert_eq!(round2(680.0), 680.0);
    }
}
