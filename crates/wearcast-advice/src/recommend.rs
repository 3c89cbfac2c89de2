//! Threshold-based "do you need X" decisions.
//!
//! `evaluate` is a pure function of a reading and the active thresholds. NaN
//! inputs make the affected comparisons false, so an item degrades to "not
//! needed" instead of failing.

use serde::Serialize;
use wearcast_core::ThresholdConfig;
use wearcast_weather::WeatherReading;

/// Lowest condition code treated as wet weather. Everything from drizzle up
/// counts, including the snow codes above it.
pub const UMBRELLA_MIN_CODE: i32 = 51;

/// Items in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Item {
    Umbrella,
    Jacket,
    Gloves,
    Scarf,
}

impl Item {
    pub const ALL: [Item; 4] = [Item::Umbrella, Item::Jacket, Item::Gloves, Item::Scarf];

    pub fn title(&self) -> &'static str {
        match self {
            Item::Umbrella => "Umbrella",
            Item::Jacket => "Jacket",
            Item::Gloves => "Gloves",
            Item::Scarf => "Scarf",
        }
    }

    fn is_needed(&self, reading: &WeatherReading, config: &ThresholdConfig) -> bool {
        match self {
            Item::Umbrella => reading.condition_code >= UMBRELLA_MIN_CODE,
            Item::Jacket => {
                reading.temperature_celsius <= config.jacket_temperature_ceiling_c
                    || reading.wind_speed_kmh >= config.jacket_wind_floor_kmh
            }
            Item::Gloves => reading.temperature_celsius <= config.gloves_temperature_ceiling_c,
            Item::Scarf => reading.temperature_celsius <= config.scarf_temperature_ceiling_c(),
        }
    }

    fn note(&self, needed: bool) -> &'static str {
        match (self, needed) {
            (Item::Umbrella, true) => "Bring it, rain is possible",
            (Item::Umbrella, false) => "Not needed, no rain expected",
            (Item::Jacket, true) => "Yes, bring it, it's chilly",
            (Item::Jacket, false) => "Not needed, mild weather",
            (Item::Gloves, true) => "Yes, it's cold",
            (Item::Gloves, false) => "Not needed",
            (Item::Scarf, true) => "Yes, it's freezing",
            (Item::Scarf, false) => "Not needed",
        }
    }
}

/// One item's decision plus a short explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub item: Item,
    pub needed: bool,
    pub note: &'static str,
}

/// Decide every item for `reading` under `config`, in [`Item::ALL`] order.
pub fn evaluate(reading: &WeatherReading, config: &ThresholdConfig) -> Vec<Recommendation> {
    Item::ALL
        .iter()
        .map(|item| {
            let needed = item.is_needed(reading, config);
            Recommendation {
                item: *item,
                needed,
                note: item.note(needed),
            }
        })
        .collect()
}

/// Find the decision for `item` in an evaluation result.
pub fn find(recommendations: &[Recommendation], item: Item) -> Option<&Recommendation> {
    recommendations.iter().find(|r| r.item == item)
}
