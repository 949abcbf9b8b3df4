use crate::error::{EngineError, Result};
use crate::models::{BenchmarkComparison, EsgScores};

pub const GENERAL_INDUSTRY: &str = "general";
const GENERAL_BENCHMARK: EsgScores = scores(55.0, 60.0, 65.0);

const BENCHMARKS: [(&str, EsgScores); 8] = [
    ("technology", scores(68.0, 62.0, 71.0)),
    ("manufacturing", scores(52.0, 58.0, 63.0)),
    ("retail", scores(55.0, 60.0, 62.0)),
    ("financial_services", scores(60.0, 64.0, 74.0)),
    ("healthcare", scores(58.0, 70.0, 68.0)),
    ("energy", scores(45.0, 55.0, 65.0)),
    ("construction", scores(48.0, 54.0, 58.0)),
    (GENERAL_INDUSTRY, GENERAL_BENCHMARK),
];

const fn scores(environmental: f64, social: f64, governance: f64) -> EsgScores {
    EsgScores {
        environmental,
        social,
        governance,
    }
}

/// Industry averages, 0..=100 per dimension.
pub fn industry_benchmark(industry: &str) -> Option<EsgScores> {
    let key = industry.trim().to_ascii_lowercase().replace([' ', '-'], "_");
    BENCHMARKS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, benchmark)| *benchmark)
}

/// Assessed minus benchmark per dimension. Negative deltas mean the company
/// trails its industry. Unknown industries are compared against `general`.
pub fn compare(assessed: &EsgScores, industry: &str) -> Result<BenchmarkComparison> {
    for (dimension, value) in [
        ("environmental", assessed.environmental),
        ("social", assessed.social),
        ("governance", assessed.governance),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(EngineError::InvalidScore { dimension, value });
        }
    }

    let (industry_name, benchmark, industry_fallback) = match industry_benchmark(industry) {
        Some(benchmark) => (industry.to_string(), benchmark, false),
        None => {
            tracing::warn!(industry, "no benchmark for industry, using general averages");
            (GENERAL_INDUSTRY.to_string(), GENERAL_BENCHMARK, true)
        }
    };

    Ok(BenchmarkComparison {
        industry: industry_name,
        industry_fallback,
        deltas: scores(
            assessed.environmental - benchmark.environmental,
            assessed.social - benchmark.social,
            assessed.governance - benchmark.governance,
        ),
        industry_benchmark: benchmark,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_plain_differences() {
        let comparison = compare(&scores(70.0, 50.0, 71.0), "technology").unwrap();
        assert_eq!(comparison.deltas, scores(2.0, -12.0, 0.0));
        assert_eq!(comparison.industry_benchmark, scores(68.0, 62.0, 71.0));
        assert!(!comparison.industry_fallback);
    }

    #[test]
    fn industry_keys_are_normalised() {
        assert_eq!(
            industry_benchmark("Financial Services"),
            industry_benchmark("financial_services")
        );
        assert!(industry_benchmark("financial-services").is_some());
    }

    #[test]
    fn unknown_industry_uses_general_table() {
        let comparison = compare(&scores(55.0, 60.0, 65.0), "space mining").unwrap();
        assert!(comparison.industry_fallback);
        assert_eq!(comparison.industry, GENERAL_INDUSTRY);
        assert_eq!(comparison.deltas, scores(0.0, 0.0, 0.0));
        assert_eq!(industry_benchmark(GENERAL_INDUSTRY), Some(comparison.industry_benchmark));
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let err = compare(&scores(101.0, 50.0, 50.0), "retail").unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidScore {
                dimension: "environmental",
                value: 101.0
            }
        );
        assert!(compare(&scores(50.0, f64::NAN, 50.0), "retail").is_err());
    }
}
