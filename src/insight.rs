//! Seam for qualitative text produced outside the engine.
//!
//! The deterministic core only builds the structured context; whatever turns
//! that into prose is injected by the caller.

use serde::Serialize;

use crate::models::{EmissionsReport, TargetProgress};

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("insight provider unavailable: {0}")]
    Unavailable(String),

    #[error("insight provider failed: {0}")]
    Provider(String),

    #[error("could not encode insight context: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightContext<'a> {
    pub industry: &'a str,
    pub company: Option<&'a str>,
    pub emissions: Option<&'a EmissionsReport>,
    pub targets: &'a [TargetProgress],
}

impl InsightContext<'_> {
    pub fn to_json(&self) -> Result<String, InsightError> {
        Ok(serde_json::to_string(self)?)
    }
}

pub trait TextInsightProvider: Send + Sync {
    /// Returns free-form narrative text, or `None` if the provider has nothing
    /// to say for this context.
    fn narrative(&self, context: &InsightContext<'_>) -> Result<Option<String>, InsightError>;
}

/// Provider used when no text service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInsights;

impl TextInsightProvider for NoInsights {
    fn narrative(&self, _context: &InsightContext<'_>) -> Result<Option<String>, InsightError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    use crate::models::ReductionTarget;
    use crate::targets;

    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
    }

    impl TextInsightProvider for Recording {
        fn narrative(&self, context: &InsightContext<'_>) -> Result<Option<String>, InsightError> {
            let payload = context.to_json()?;
            self.seen
                .lock()
                .map_err(|err| InsightError::Provider(err.to_string()))?
                .push(payload);
            Ok(Some(format!("{} targets reviewed", context.targets.len())))
        }
    }

    fn progress() -> Vec<TargetProgress> {
        let target = ReductionTarget {
            name: "Electricity".to_string(),
            baseline: 100.0,
            target: 0.0,
            current: 60.0,
            deadline: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        };
        vec![targets::track(&target, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap()]
    }

    #[test]
    fn default_provider_returns_nothing() {
        let tracked = progress();
        let context = InsightContext {
            industry: "retail",
            company: None,
            emissions: None,
            targets: &tracked,
        };
        assert!(NoInsights.narrative(&context).unwrap().is_none());
    }

    #[test]
    fn provider_receives_structured_context() {
        let tracked = progress();
        let context = InsightContext {
            industry: "retail",
            company: Some("Acme"),
            emissions: None,
            targets: &tracked,
        };
        let provider = Recording::default();
        let text = provider.narrative(&context).unwrap();
        assert_eq!(text.as_deref(), Some("1 targets reviewed"));

        let seen = provider.seen.lock().unwrap();
        let payload: serde_json::Value = serde_json::from_str(&seen[0]).unwrap();
        assert_eq!(payload["company"], "Acme");
        assert_eq!(payload["targets"][0]["name"], "Electricity");
        assert_eq!(payload["targets"][0]["progressPercent"], 40.0);
    }
}
