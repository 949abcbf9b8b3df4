//! End-to-end emissions calculation: normalise consumption, look up regional
//! factors, compute scopes, derive intensity metrics.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::factors::EmissionFactorRegistry;
use crate::models::{BatchFailure, BatchOutcome, EmissionsReport};
use crate::{consumption, intensity, scope};

/// One company's calculation input, as handed over by the request boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    #[serde(default)]
    pub company: Option<String>,
    pub region: String,
    #[serde(default)]
    pub consumption: serde_json::Value,
    pub employees: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyReport {
    pub company: String,
    pub report: EmissionsReport,
}

pub fn calculate_emissions(
    registry: &EmissionFactorRegistry,
    config: &EngineConfig,
    request: &CalculationRequest,
    now: DateTime<Utc>,
) -> Result<EmissionsReport> {
    let record = consumption::normalize(&request.consumption)?;
    let lookup = registry.factors_for(&request.region);
    let scopes = scope::compute(&record, lookup.factors, config.flight_mode);
    intensity::normalize(scopes, &lookup, request.employees, request.revenue, now)
}

/// Calculates every request independently. Failing requests are reported in
/// `failed` and never stop the rest of the batch.
pub fn calculate_batch(
    registry: &EmissionFactorRegistry,
    config: &EngineConfig,
    requests: &[CalculationRequest],
    now: DateTime<Utc>,
) -> BatchOutcome<CompanyReport> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("calculate_batch", %run_id, requests = requests.len());
    let _guard = span.enter();

    let results: Vec<std::result::Result<CompanyReport, BatchFailure>> = requests
        .par_iter()
        .enumerate()
        .map(|(index, request)| {
            let company = request
                .company
                .clone()
                .unwrap_or_else(|| format!("row-{}", index + 1));
            match calculate_emissions(registry, config, request, now) {
                Ok(report) => Ok(CompanyReport { company, report }),
                Err(err) => Err(BatchFailure {
                    key: company,
                    error: err.to_string(),
                }),
            }
        })
        .collect();

    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    for result in results {
        match result {
            Ok(report) => succeeded.push(report),
            Err(failure) => {
                tracing::warn!(%run_id, company = %failure.key, error = %failure.error, "skipping company");
                failed.push(failure);
            }
        }
    }

    tracing::info!(
        %run_id,
        succeeded = succeeded.len(),
        failed = failed.len(),
        "emissions batch finished"
    );

    BatchOutcome {
        run_id,
        succeeded,
        failed,
    }
}
