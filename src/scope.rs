//! GHG Protocol scope calculation.
//!
//! Line items and scope totals are rounded to cents of a kilogram; the grand
//! total is the plain sum of the three rounded scope totals.

use std::collections::BTreeMap;

use crate::config::FlightMode;
use crate::models::{ConsumptionRecord, EmissionFactorSet, ScopeBreakdown, ScopeEmissions};
use crate::round2;

/// kgCO2e per EUR of purchased goods (spend-based approximation).
pub const PURCHASED_GOODS_KG_PER_EUR: f64 = 0.0002;
/// kgCO2e per km of upstream freight.
pub const UPSTREAM_TRANSPORT_KG_PER_KM: f64 = 0.1;
/// District heating as a share of grid electricity intensity.
pub const HEATING_GRID_SHARE: f64 = 0.8;
/// Cooling as a multiple of grid electricity intensity.
pub const COOLING_GRID_SHARE: f64 = 1.2;
/// Commuting is charged at half the car factor (shared rides, transit mix).
pub const COMMUTE_CAR_SHARE: f64 = 0.5;

pub fn compute(
    consumption: &ConsumptionRecord,
    factors: &EmissionFactorSet,
    flight_mode: FlightMode,
) -> ScopeEmissions {
    let c = consumption;
    let f = factors;

    let scope1 = breakdown([
        ("natural_gas", c.natural_gas_m3 * f.natural_gas_m3),
        ("diesel", c.diesel_l * f.diesel_l),
        ("gasoline", c.gasoline_l * f.gasoline_l),
        ("company_vehicles", c.company_vehicle_km * f.car_km),
    ]);

    let scope2 = breakdown([
        ("electricity", c.electricity_kwh * f.electricity_kwh),
        ("heating", c.heating_kwh * f.electricity_kwh * HEATING_GRID_SHARE),
        ("cooling", c.cooling_kwh * f.electricity_kwh * COOLING_GRID_SHARE),
    ]);

    let scope3 = breakdown([
        ("business_flights", flight_emissions(c, f, flight_mode)),
        ("business_train", c.train_km * f.train_km),
        ("employee_commute", c.commute_km * f.car_km * COMMUTE_CAR_SHARE),
        ("waste", c.waste_kg * f.waste_kg),
        ("water", c.water_m3 * f.water_m3),
        ("paper", c.paper_kg * f.paper_kg),
        ("plastic", c.plastic_kg * f.plastic_kg),
        ("purchased_goods", c.purchased_goods_eur * PURCHASED_GOODS_KG_PER_EUR),
        ("upstream_transport", c.upstream_transport_km * UPSTREAM_TRANSPORT_KG_PER_KM),
    ]);

    ScopeEmissions {
        scope1,
        scope2,
        scope3,
    }
}

fn flight_emissions(c: &ConsumptionRecord, f: &EmissionFactorSet, mode: FlightMode) -> f64 {
    match mode {
        // Historical reports charge all distance long-haul; kept for comparability.
        FlightMode::Legacy => (c.flight_km + c.flight_km_short + c.flight_km_long) * f.flight_km_long,
        FlightMode::Split => {
            (c.flight_km + c.flight_km_long) * f.flight_km_long + c.flight_km_short * f.flight_km_short
        }
    }
}

fn breakdown<const N: usize>(lines: [(&str, f64); N]) -> ScopeBreakdown {
    let items: BTreeMap<String, f64> = lines
        .into_iter()
        .map(|(name, kg)| (name.to_string(), round2(kg)))
        .collect();
    let total = round2(items.values().sum());
    ScopeBreakdown { items, total }
}
