use chrono::{DateTime, Utc};

use crate::error::{EngineError, Result};
use crate::factors::FactorLookup;
use crate::models::{EmissionsReport, ScopeEmissions};
use crate::round2;

/// Fills per-employee and per-revenue metrics. Both divisors must be strictly
/// positive; zero, negative and NaN fail with `DivisionByZero`.
pub fn normalize(
    scopes: ScopeEmissions,
    lookup: &FactorLookup<'_>,
    employees: f64,
    revenue: f64,
    calculated_at: DateTime<Utc>,
) -> Result<EmissionsReport> {
    if !(employees > 0.0) {
        return Err(EngineError::DivisionByZero {
            quantity: "employees",
        });
    }
    if !(revenue > 0.0) {
        return Err(EngineError::DivisionByZero { quantity: "revenue" });
    }

    let total_kg = scopes.total_kg();

    Ok(EmissionsReport {
        total_emissions_kg: total_kg,
        total_emissions_tons: total_kg / 1000.0,
        per_employee: round2(total_kg / employees),
        per_million_revenue: round2(total_kg / (revenue / 1_000_000.0)),
        carbon_intensity: round2(total_kg / revenue * 1000.0),
        scope1: scopes.scope1,
        scope2: scopes.scope2,
        scope3: scopes.scope3,
        region: lookup.region,
        region_fallback: lookup.fell_back,
        calculated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::EmissionFactorRegistry;
    use crate::models::ScopeBreakdown;

    fn scopes(s1: f64, s2: f64, s3: f64) -> ScopeEmissions {
        let scope = |total| ScopeBreakdown {
            total,
            ..Default::default()
        };
        ScopeEmissions {
            scope1: scope(s1),
            scope2: scope(s2),
            scope3: scope(s3),
        }
    }

    #[test]
    fn derives_intensity_metrics() {
        let registry = EmissionFactorRegistry::default();
        let lookup = registry.factors_for("europe");
        let report = normalize(scopes(404.0, 276.0, 0.0), &lookup, 10.0, 1_000_000.0, Utc::now())
            .unwrap();

        assert_eq!(report.total_emissions_kg, 680.0);
        assert_eq!(report.total_emissions_tons, 0.68);
        assert_eq!(report.per_employee, 68.0);
        assert_eq!(report.per_million_revenue, 680.0);
        assert_eq!(report.carbon_intensity, 0.68);
        assert!(!report.region_fallback);
    }

    #[test]
    fn zero_employees_is_an_error() {
        let registry = EmissionFactorRegistry::default();
        let lookup = registry.factors_for("europe");
        let err = normalize(scopes(1.0, 0.0, 0.0), &lookup, 0.0, 1000.0, Utc::now()).unwrap_err();
        assert_eq!(err, EngineError::DivisionByZero { quantity: "employees" });
    }

    #[test]
    fn non_positive_revenue_is_an_error() {
        let registry = EmissionFactorRegistry::default();
        let lookup = registry.factors_for("europe");
        for revenue in [0.0, -5.0, f64::NAN] {
            let err = normalize(scopes(1.0, 0.0, 0.0), &lookup, 3.0, revenue, Utc::now()).unwrap_err();
            assert_eq!(err, EngineError::DivisionByZero { quantity: "revenue" });
        }
    }
}
