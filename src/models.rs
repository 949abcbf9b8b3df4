use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Europe,
    NorthAmerica,
    Latam,
    Asia,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Europe,
        Region::NorthAmerica,
        Region::Latam,
        Region::Asia,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Europe => "europe",
            Region::NorthAmerica => "north_america",
            Region::Latam => "latam",
            Region::Asia => "asia",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = EngineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_lowercase();
        Region::ALL
            .into_iter()
            .find(|region| region.as_str() == key)
            .ok_or_else(|| EngineError::UnknownRegion(value.to_string()))
    }
}

/// kgCO2e per unit of activity for one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmissionFactorSet {
    pub electricity_kwh: f64,
    pub natural_gas_m3: f64,
    pub diesel_l: f64,
    pub gasoline_l: f64,
    pub flight_km_short: f64,
    pub flight_km_long: f64,
    pub train_km: f64,
    pub car_km: f64,
    pub waste_kg: f64,
    pub water_m3: f64,
    pub paper_kg: f64,
    pub plastic_kg: f64,
}

impl EmissionFactorSet {
    pub fn entries(&self) -> [(&'static str, f64); 12] {
        [
            ("electricity_kwh", self.electricity_kwh),
            ("natural_gas_m3", self.natural_gas_m3),
            ("diesel_l", self.diesel_l),
            ("gasoline_l", self.gasoline_l),
            ("flight_km_short", self.flight_km_short),
            ("flight_km_long", self.flight_km_long),
            ("train_km", self.train_km),
            ("car_km", self.car_km),
            ("waste_kg", self.waste_kg),
            ("water_m3", self.water_m3),
            ("paper_kg", self.paper_kg),
            ("plastic_kg", self.plastic_kg),
        ]
    }
}

/// Activity quantities in the units the factor table expects (kWh, m3, l, km,
/// kg, EUR). Absent activities are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumptionRecord {
    pub electricity_kwh: f64,
    pub heating_kwh: f64,
    pub cooling_kwh: f64,
    pub natural_gas_m3: f64,
    pub diesel_l: f64,
    pub gasoline_l: f64,
    pub company_vehicle_km: f64,
    pub flight_km: f64,
    pub flight_km_short: f64,
    pub flight_km_long: f64,
    pub train_km: f64,
    pub commute_km: f64,
    pub waste_kg: f64,
    pub water_m3: f64,
    pub paper_kg: f64,
    pub plastic_kg: f64,
    pub purchased_goods_eur: f64,
    pub upstream_transport_km: f64,
}

impl ConsumptionRecord {
    pub const FIELDS: [&'static str; 18] = [
        "electricity_kwh",
        "heating_kwh",
        "cooling_kwh",
        "natural_gas_m3",
        "diesel_l",
        "gasoline_l",
        "company_vehicle_km",
        "flight_km",
        "flight_km_short",
        "flight_km_long",
        "train_km",
        "commute_km",
        "waste_kg",
        "water_m3",
        "paper_kg",
        "plastic_kg",
        "purchased_goods_eur",
        "upstream_transport_km",
    ];

    pub fn field_mut(&mut self, key: &str) -> Option<&mut f64> {
        let slot = match key {
            "electricity_kwh" => &mut self.electricity_kwh,
            "heating_kwh" => &mut self.heating_kwh,
            "cooling_kwh" => &mut self.cooling_kwh,
            "natural_gas_m3" => &mut self.natural_gas_m3,
            "diesel_l" => &mut self.diesel_l,
            "gasoline_l" => &mut self.gasoline_l,
            "company_vehicle_km" => &mut self.company_vehicle_km,
            "flight_km" => &mut self.flight_km,
            "flight_km_short" => &mut self.flight_km_short,
            "flight_km_long" => &mut self.flight_km_long,
            "train_km" => &mut self.train_km,
            "commute_km" => &mut self.commute_km,
            "waste_kg" => &mut self.waste_kg,
            "water_m3" => &mut self.water_m3,
            "paper_kg" => &mut self.paper_kg,
            "plastic_kg" => &mut self.plastic_kg,
            "purchased_goods_eur" => &mut self.purchased_goods_eur,
            "upstream_transport_km" => &mut self.upstream_transport_km,
            _ => return None,
        };
        Some(slot)
    }
}

/// Line items for one scope, kgCO2e. `total` is the rounded sum of `items`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeBreakdown {
    pub items: BTreeMap<String, f64>,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeEmissions {
    pub scope1: ScopeBreakdown,
    pub scope2: ScopeBreakdown,
    pub scope3: ScopeBreakdown,
}

impl ScopeEmissions {
    pub fn total_kg(&self) -> f64 {
        self.scope1.total + self.scope2.total + self.scope3.total
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionsReport {
    pub scope1: ScopeBreakdown,
    pub scope2: ScopeBreakdown,
    pub scope3: ScopeBreakdown,
    pub total_emissions_kg: f64,
    pub total_emissions_tons: f64,
    pub per_employee: f64,
    pub per_million_revenue: f64,
    pub carbon_intensity: f64,
    pub region: Region,
    pub region_fallback: bool,
    pub calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionTarget {
    pub name: String,
    pub baseline: f64,
    pub target: f64,
    pub current: f64,
    pub deadline: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProgress {
    #[serde(flatten)]
    pub target: ReductionTarget,
    pub progress_percent: f64,
    pub expected_progress_percent: f64,
    pub on_track: bool,
    pub remaining: f64,
    pub annual_reduction_needed: f64,
}

/// Independent counts: a target with no progress that is still inside its
/// tolerance band is counted both on-track and not-started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSummary {
    pub total: usize,
    pub on_track: usize,
    pub at_risk: usize,
    pub not_started: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetType {
    RenewableEnergy,
    Forestry,
    MethaneCapture,
    CommunityForestry,
    SoilCarbon,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetProvider {
    pub id: String,
    pub name: String,
    pub price_per_ton: f64,
    pub offset_type: OffsetType,
    pub location: String,
    pub rating: f64,
    pub capacity_tons: f64,
    pub co_benefits: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetQuote {
    pub provider: OffsetProvider,
    pub tons_available: f64,
    pub total_cost: f64,
    pub covers_full_volume: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSummary {
    pub min_cost: f64,
    pub max_cost: f64,
    pub average_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetSelection {
    pub emissions_tons: f64,
    pub options: Vec<OffsetQuote>,
    pub recommended: Option<OffsetQuote>,
    pub budget_infeasible: bool,
    pub market: Option<MarketSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EsgScores {
    pub environmental: f64,
    pub social: f64,
    pub governance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub industry: String,
    pub industry_fallback: bool,
    pub deltas: EsgScores,
    pub industry_benchmark: EsgScores,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub key: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome<T> {
    pub run_id: Uuid,
    pub succeeded: Vec<T>,
    pub failed: Vec<BatchFailure>,
}
