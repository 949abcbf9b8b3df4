//! Reduction target tracking.
//!
//! Expected progress follows one straight line from the reference epoch
//! (2020-01-01) to the target's deadline. The line ignores when the target was
//! created, so two targets sharing a deadline are paced identically even if one
//! was set years later.

use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use uuid::Uuid;

use crate::error::{EngineError, Result};
use crate::models::{BatchFailure, BatchOutcome, ReductionTarget, TargetProgress, TargetSummary};
use crate::round2;

pub const REFERENCE_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2020, 1, 1) {
    Some(date) => date,
    None => panic!("reference epoch is a valid date"),
};

/// Share of the expected progress a target must reach to count as on track.
pub const ON_TRACK_TOLERANCE: f64 = 0.9;

pub fn track(target: &ReductionTarget, now: NaiveDate) -> Result<TargetProgress> {
    let invalid = |reason: String| EngineError::InvalidTargetDefinition {
        name: target.name.clone(),
        reason,
    };

    for (label, value) in [
        ("baseline", target.baseline),
        ("target", target.target),
        ("current", target.current),
    ] {
        if !value.is_finite() {
            return Err(invalid(format!("{label} must be a finite number")));
        }
    }
    if target.baseline == target.target {
        return Err(invalid("baseline equals target, progress is undefined".to_string()));
    }

    let total_days = (target.deadline - REFERENCE_EPOCH).num_days();
    if total_days <= 0 {
        return Err(invalid(format!(
            "deadline {} is not after the 2020-01-01 reference epoch",
            target.deadline
        )));
    }
    let elapsed_days = (now - REFERENCE_EPOCH).num_days();

    let progress = ((target.baseline - target.current) / (target.baseline - target.target)
        * 100.0)
        .clamp(0.0, 100.0);
    // Not clamped: before the epoch it is negative, past the deadline above 100.
    let expected = elapsed_days as f64 / total_days as f64 * 100.0;

    let remaining = target.current - target.target;
    let years_remaining = (target.deadline.year() - now.year()).max(1);

    Ok(TargetProgress {
        target: target.clone(),
        progress_percent: round2(progress),
        expected_progress_percent: round2(expected),
        on_track: progress >= expected * ON_TRACK_TOLERANCE,
        remaining: round2(remaining),
        annual_reduction_needed: round2(remaining / f64::from(years_remaining)),
    })
}

pub fn summarize(progress: &[TargetProgress]) -> TargetSummary {
    let mut summary = TargetSummary {
        total: progress.len(),
        ..Default::default()
    };

    for item in progress {
        if item.on_track {
            summary.on_track += 1;
        } else if item.progress_percent > 0.0 {
            summary.at_risk += 1;
        }
        if item.progress_percent == 0.0 {
            summary.not_started += 1;
        }
    }

    summary
}

/// Tracks every target independently; invalid definitions are skipped and
/// reported rather than failing the run.
pub fn track_all(targets: &[ReductionTarget], now: NaiveDate) -> BatchOutcome<TargetProgress> {
    let run_id = Uuid::new_v4();
    let span = tracing::info_span!("track_all", %run_id, targets = targets.len());
    let _guard = span.enter();

    let results: Vec<Result<TargetProgress>> =
        targets.par_iter().map(|target| track(target, now)).collect();

    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    for (target, result) in targets.iter().zip(results) {
        match result {
            Ok(progress) => succeeded.push(progress),
            Err(err) => {
                tracing::warn!(%run_id, target = %target.name, error = %err, "skipping target");
                failed.push(BatchFailure {
                    key: target.name.clone(),
                    error: err.to_string(),
                });
            }
        }
    }

    let mut values = succeeded;
    values.sort_by(|a, b| {
        a.progress_percent
            .partial_cmp(&b.progress_percent)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    tracing::info!(%run_id, tracked = values.len(), failed = failed.len(), "target run finished");

    BatchOutcome {
        run_id,
        succeeded: values,
        failed,
    }
}
