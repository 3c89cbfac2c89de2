//! Terminal output for search results and thresholds.

use anyhow::Result;
use serde::Serialize;
use wearcast_advice::{Controller, Recommendation, SearchState, Snapshot};
use wearcast_core::ThresholdConfig;
use wearcast_weather::WeatherSource;

const IDLE_PROMPT: &str = "Enter a city and press Search to see what you need today.";

#[derive(Serialize)]
struct SearchOutput<'a> {
    #[serde(flatten)]
    snapshot: &'a Snapshot,
    description: &'static str,
    recommendations: Vec<Recommendation>,
}

pub fn search_result<S: WeatherSource>(controller: &Controller<S>, json: bool) -> Result<()> {
    let (SearchState::Success(snapshot), Some(recommendations), Some(description)) = (
        controller.state(),
        controller.recommendations(),
        controller.description(),
    ) else {
        anyhow::bail!("No weather result to show");
    };

    if json {
        let output = SearchOutput {
            snapshot,
            description,
            recommendations,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let reading = &snapshot.reading;
    println!("Now in {}", snapshot.place);
    println!(
        "  {:.0}°  {}  |  wind {:.0} km/h",
        reading.temperature_celsius, description, reading.wind_speed_kmh
    );
    if let Some(humidity) = reading.humidity_percent {
        println!("  humidity {:.0}%", humidity);
    }

    println!();
    println!("What you need today");
    for rec in &recommendations {
        println!("{}", recommendation_line(rec));
    }
    Ok(())
}

fn recommendation_line(rec: &Recommendation) -> String {
    let pill = if rec.needed { "REQUIRED" } else { "OPTIONAL" };
    let mark = if rec.needed { "✔" } else { " " };
    format!("  {} {:<9}{:<9} {}", mark, rec.item.title(), pill, rec.note)
}

/// Prompt shown while no search has been made.
fn idle_prompt(json: bool) -> String {
    if json {
        serde_json::json!({ "state": "idle", "message": IDLE_PROMPT }).to_string()
    } else {
        IDLE_PROMPT.to_string()
    }
}

pub fn idle(json: bool) -> Result<()> {
    println!("{}", idle_prompt(json));
    Ok(())
}

pub fn error(message: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::json!({ "error": message }));
    } else {
        eprintln!("{message}");
    }
    Ok(())
}

pub fn thresholds(config: &ThresholdConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }

    println!(
        "Jacket: at or below {} °C, or wind at or above {} km/h",
        config.jacket_temperature_ceiling_c, config.jacket_wind_floor_kmh
    );
    println!("Gloves: at or below {} °C", config.gloves_temperature_ceiling_c);
    println!(
        "Scarf:  at or below {} °C ({} below gloves)",
        config.scarf_temperature_ceiling_c(),
        config.scarf_offset_c
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wearcast_advice::Item;

    #[test]
    fn test_recommendation_line_marks_required() {
        let line = recommendation_line(&Recommendation {
            item: Item::Gloves,
            needed: true,
            note: "Yes, it's cold",
        });
        assert!(line.contains("Gloves"));
        assert!(line.contains("REQUIRED"));
        assert!(line.contains("✔"));
    }

    #[test]
    fn test_recommendation_line_marks_optional() {
        let line = recommendation_line(&Recommendation {
            item: Item::Umbrella,
            needed: false,
            note: "Not needed",
        });
        assert!(line.contains("OPTIONAL"));
        assert!(!line.contains("✔"));
    }

    #[test]
    fn test_idle_prompt_text() {
        assert_eq!(
            idle_prompt(false),
            "Enter a city and press Search to see what you need today."
        );
    }

    #[test]
    fn test_idle_prompt_json() {
        let value: serde_json::Value = serde_json::from_str(&idle_prompt(true)).unwrap();
        assert_eq!(value["state"], "idle");
        assert_eq!(value["message"], IDLE_PROMPT);
    }
}
