use std::collections::BTreeMap;
use std::io::Read;

use crate::error::{EngineError, Result};
use crate::models::{EmissionFactorSet, Region};

const EUROPE: EmissionFactorSet = EmissionFactorSet {
    electricity_kwh: 0.276,
    natural_gas_m3: 2.02,
    diesel_l: 2.68,
    gasoline_l: 2.31,
    flight_km_short: 0.255,
    flight_km_long: 0.195,
    train_km: 0.041,
    car_km: 0.171,
    waste_kg: 0.587,
    water_m3: 0.344,
    paper_kg: 0.919,
    plastic_kg: 3.1,
};

const NORTH_AMERICA: EmissionFactorSet = EmissionFactorSet {
    electricity_kwh: 0.417,
    natural_gas_m3: 1.93,
    diesel_l: 2.68,
    gasoline_l: 2.35,
    flight_km_short: 0.255,
    flight_km_long: 0.195,
    train_km: 0.089,
    car_km: 0.192,
    waste_kg: 0.62,
    water_m3: 0.376,
    paper_kg: 0.95,
    plastic_kg: 3.1,
};

const LATAM: EmissionFactorSet = EmissionFactorSet {
    electricity_kwh: 0.295,
    natural_gas_m3: 2.0,
    diesel_l: 2.7,
    gasoline_l: 2.28,
    flight_km_short: 0.26,
    flight_km_long: 0.2,
    train_km: 0.065,
    car_km: 0.18,
    waste_kg: 0.7,
    water_m3: 0.29,
    paper_kg: 1.0,
    plastic_kg: 3.2,
};

const ASIA: EmissionFactorSet = EmissionFactorSet {
    electricity_kwh: 0.555,
    natural_gas_m3: 2.05,
    diesel_l: 2.7,
    gasoline_l: 2.3,
    flight_km_short: 0.26,
    flight_km_long: 0.2,
    train_km: 0.054,
    car_km: 0.185,
    waste_kg: 0.75,
    water_m3: 0.41,
    paper_kg: 1.1,
    plastic_kg: 3.3,
};

/// Result of a lenient lookup. `fell_back` is set when the requested key was
/// not registered and the default region's factors were returned instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorLookup<'a> {
    pub region: Region,
    pub factors: &'a EmissionFactorSet,
    pub fell_back: bool,
}

/// Immutable region -> factor set table, built once and shared by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionFactorRegistry {
    sets: BTreeMap<Region, EmissionFactorSet>,
    default_region: Region,
}

impl EmissionFactorRegistry {
    pub fn builtin(default_region: Region) -> Self {
        let sets = BTreeMap::from([
            (Region::Europe, EUROPE),
            (Region::NorthAmerica, NORTH_AMERICA),
            (Region::Latam, LATAM),
            (Region::Asia, ASIA),
        ]);
        Self {
            sets,
            default_region,
        }
    }

    /// Loads a `{ "<region>": { "<activity>": factor, ... } }` table.
    pub fn from_json_reader<R: Read>(reader: R, default_region: Region) -> Result<Self> {
        let raw: BTreeMap<String, EmissionFactorSet> = serde_json::from_reader(reader)
            .map_err(|err| EngineError::FactorTable(err.to_string()))?;

        let mut sets = BTreeMap::new();
        for (key, factors) in raw {
            let region: Region = key
                .parse()
                .map_err(|_| EngineError::FactorTable(format!("unknown region `{key}`")))?;
            for (activity, value) in factors.entries() {
                if !value.is_finite() || value < 0.0 {
                    return Err(EngineError::FactorTable(format!(
                        "{region}.{activity} must be a non-negative number, got {value}"
                    )));
                }
            }
            sets.insert(region, factors);
        }

        if !sets.contains_key(&default_region) {
            return Err(EngineError::FactorTable(format!(
                "default region `{default_region}` has no factors"
            )));
        }

        Ok(Self {
            sets,
            default_region,
        })
    }

    pub fn default_region(&self) -> Region {
        self.default_region
    }

    pub fn regions(&self) -> impl Iterator<Item = Region> + '_ {
        self.sets.keys().copied()
    }

    pub fn get(&self, region: Region) -> Option<&EmissionFactorSet> {
        self.sets.get(&region)
    }

    pub fn try_factors_for(&self, region: &str) -> Result<(Region, &EmissionFactorSet)> {
        let parsed: Region = region.parse()?;
        self.get(parsed)
            .map(|factors| (parsed, factors))
            .ok_or_else(|| EngineError::UnknownRegion(region.to_string()))
    }

    pub fn factors_for(&self, region: &str) -> FactorLookup<'_> {
        match self.try_factors_for(region) {
            Ok((region, factors)) => FactorLookup {
                region,
                factors,
                fell_back: false,
            },
            Err(_) => {
                tracing::warn!(
                    requested = region,
                    fallback = %self.default_region,
                    "unknown region, using default emission factors"
                );
                FactorLookup {
                    region: self.default_region,
                    factors: &self.sets[&self.default_region],
                    fell_back: true,
                }
            }
        }
    }
}

impl Default for EmissionFactorRegistry {
    fn default() -> Self {
        Self::builtin(Region::Europe)
    }
}
