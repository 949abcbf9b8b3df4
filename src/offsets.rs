use std::cmp::Ordering;

use crate::error::{EngineError, Result};
use crate::models::{MarketSummary, OffsetProvider, OffsetQuote, OffsetSelection, OffsetType};
use crate::round2;

/// Read-only list of offset providers, loaded once and shared.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetCatalog {
    providers: Vec<OffsetProvider>,
}

impl OffsetCatalog {
    pub fn new(providers: Vec<OffsetProvider>) -> Self {
        Self { providers }
    }

    pub fn builtin() -> Self {
        let provider = |id: &str,
                        name: &str,
                        price_per_ton: f64,
                        offset_type: OffsetType,
                        location: &str,
                        rating: f64,
                        capacity_tons: f64,
                        co_benefits: &[&str]| OffsetProvider {
            id: id.to_string(),
            name: name.to_string(),
            price_per_ton,
            offset_type,
            location: location.to_string(),
            rating,
            capacity_tons,
            co_benefits: co_benefits.iter().map(|b| b.to_string()).collect(),
        };

        Self::new(vec![
            provider(
                "gs-wind-in",
                "Gold Standard Wind Portfolio",
                12.0,
                OffsetType::RenewableEnergy,
                "India",
                4.5,
                50_000.0,
                &["clean energy access", "local employment"],
            ),
            provider(
                "amazon-reforest",
                "Amazon Reforestation Alliance",
                15.0,
                OffsetType::Forestry,
                "Brazil",
                4.8,
                20_000.0,
                &["biodiversity", "watershed protection"],
            ),
            provider(
                "landfill-methane-us",
                "Landfill Methane Capture",
                8.5,
                OffsetType::MethaneCapture,
                "United States",
                4.2,
                80_000.0,
                &["air quality"],
            ),
            provider(
                "kenya-community",
                "Kenya Community Forestry",
                10.0,
                OffsetType::CommunityForestry,
                "Kenya",
                4.6,
                15_000.0,
                &["community income", "biodiversity", "education"],
            ),
            provider(
                "soil-carbon-au",
                "Regenerative Soil Carbon",
                18.0,
                OffsetType::SoilCarbon,
                "Australia",
                4.0,
                10_000.0,
                &["soil health", "drought resilience"],
            ),
        ])
    }

    pub fn providers(&self) -> &[OffsetProvider] {
        &self.providers
    }
}

impl Default for OffsetCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Quotes every provider for `emissions_tons`, keeps those within `budget`,
/// and ranks them by rating (cheaper first on ties). When no provider fits the
/// budget, the full list is returned with `budget_infeasible` set.
pub fn select_offsets(
    catalog: &OffsetCatalog,
    emissions_tons: f64,
    budget: Option<f64>,
) -> Result<OffsetSelection> {
    if !emissions_tons.is_finite() || emissions_tons < 0.0 {
        return Err(EngineError::InvalidConsumption {
            field: "emissions_tons".to_string(),
            reason: format!("{emissions_tons} is not a non-negative quantity"),
        });
    }

    let quotes: Vec<OffsetQuote> = catalog
        .providers()
        .iter()
        .map(|provider| OffsetQuote {
            provider: provider.clone(),
            tons_available: provider.capacity_tons,
            total_cost: round2(provider.price_per_ton * emissions_tons),
            covers_full_volume: provider.capacity_tons >= emissions_tons,
        })
        .collect();

    let market = market_summary(&quotes);

    let (mut options, budget_infeasible) = match budget {
        Some(limit) => {
            let affordable: Vec<OffsetQuote> = quotes
                .iter()
                .filter(|quote| quote.total_cost <= limit)
                .cloned()
                .collect();
            if affordable.is_empty() && !quotes.is_empty() {
                tracing::warn!(budget = limit, emissions_tons, "no offset fits the budget, returning all options");
                (quotes, true)
            } else {
                (affordable, false)
            }
        }
        None => (quotes, false),
    };

    options.sort_by(|a, b| {
        b.provider
            .rating
            .partial_cmp(&a.provider.rating)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.total_cost.partial_cmp(&b.total_cost).unwrap_or(Ordering::Equal))
    });

    Ok(OffsetSelection {
        emissions_tons,
        recommended: options.first().cloned(),
        options,
        budget_infeasible,
        market,
    })
}

fn market_summary(quotes: &[OffsetQuote]) -> Option<MarketSummary> {
    if quotes.is_empty() {
        return None;
    }
    let costs = quotes.iter().map(|quote| quote.total_cost);
    let min_cost = costs.clone().fold(f64::INFINITY, f64::min);
    let max_cost = costs.clone().fold(f64::NEG_INFINITY, f64::max);
    let average_cost = round2(costs.sum::<f64>() / quotes.len() as f64);
    Some(MarketSummary {
        min_cost,
        max_cost,
        average_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(selection: &OffsetSelection) -> Vec<&str> {
        selection
            .options
            .iter()
            .map(|quote| quote.provider.id.as_str())
            .collect()
    }

    #[test]
    fn budget_keeps_only_affordable_providers() {
        let selection = select_offsets(&OffsetCatalog::builtin(), 100.0, Some(1300.0)).unwrap();

        assert!(!selection.budget_infeasible);
        assert_eq!(
            ids(&selection),
            vec!["kenya-community", "gs-wind-in", "landfill-methane-us"]
        );
        assert!(selection.options.iter().all(|q| q.total_cost <= 1300.0));
        let recommended = selection.recommended.unwrap();
        assert_eq!(recommended.provider.id, "kenya-community");
        assert_eq!(recommended.total_cost, 1000.0);
    }

    #[test]
    fn without_budget_all_providers_are_ranked_by_rating() {
        let selection = select_offsets(&OffsetCatalog::builtin(), 10.0, None).unwrap();
        assert_eq!(selection.options.len(), 5);
        assert_eq!(selection.options[0].provider.id, "amazon-reforest");
        let ratings: Vec<f64> = selection.options.iter().map(|q| q.provider.rating).collect();
        assert!(ratings.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn infeasible_budget_falls_back_to_full_list() {
        let selection = select_offsets(&OffsetCatalog::builtin(), 100.0, Some(10.0)).unwrap();
        assert!(selection.budget_infeasible);
        assert_eq!(selection.options.len(), 5);
        assert_eq!(selection.recommended.unwrap().provider.id, "amazon-reforest");
    }

    #[test]
    fn market_summary_spans_unfiltered_quotes() {
        let selection = select_offsets(&OffsetCatalog::builtin(), 100.0, Some(1300.0)).unwrap();
        let market = selection.market.unwrap();
        assert_eq!(market.min_cost, 850.0);
        assert_eq!(market.max_cost, 1800.0);
        assert_eq!(market.average_cost, 1270.0);
    }

    #[test]
    fn costs_round_to_cents_and_flag_capacity() {
        let selection = select_offsets(&OffsetCatalog::builtin(), 12_345.678, None).unwrap();
        let soil = selection
            .options
            .iter()
            .find(|q| q.provider.id == "soil-carbon-au")
            .unwrap();
        assert_eq!(soil.total_cost, 222_222.2);
        assert!(!soil.covers_full_volume);
        assert_eq!(soil.tons_available, 10_000.0);
    }

    #[test]
    fn quotes_carry_co_benefits_once() {
        let selection = select_offsets(&OffsetCatalog::builtin(), 1.0, None).unwrap();
        let kenya = selection
            .options
            .iter()
            .find(|q| q.provider.id == "kenya-community")
            .unwrap();
        let json = serde_json::to_value(kenya).unwrap();
        assert!(json.get("coBenefits").is_none());
        assert_eq!(json["provider"]["coBenefits"][2], "education");
    }

    #[test]
    fn ties_in_rating_prefer_cheaper_quotes() {
        let mut providers = OffsetCatalog::builtin().providers().to_vec();
        providers.truncate(2);
        providers[1].rating = providers[0].rating;
        providers[1].price_per_ton = 5.0;
        let selection = select_offsets(&OffsetCatalog::new(providers), 1.0, None).unwrap();
        assert_eq!(selection.options[0].provider.id, "amazon-reforest");
    }

    #[test]
    fn empty_catalog_has_no_recommendation() {
        let selection = select_offsets(&OffsetCatalog::new(Vec::new()), 5.0, Some(100.0)).unwrap();
        assert!(selection.options.is_empty());
        assert!(selection.recommended.is_none());
        assert!(selection.market.is_none());
        assert!(!selection.budget_infeasible);
    }

    #[test]
    fn negative_tonnage_is_rejected() {
        assert!(select_offsets(&OffsetCatalog::builtin(), -1.0, None).is_err());
    }
}
