//! Weather-to-care rule table.
//!
//! Rules are evaluated in a fixed order (temperature, humidity,
//! precipitation, wind, condition, season) and the result is sorted by
//! descending priority. The sort is stable, so rule order breaks ties.

use chrono::{Datelike, Utc};
use greenmate_core::models::{CareCategory, CareRecommendation, Priority, WeatherObservation};

use crate::season::Season;

const HOT_ABOVE_C: f64 = 30.0;
const COLD_BELOW_C: f64 = 10.0;
const HUMID_ABOVE_PCT: f64 = 80.0;
const DRY_BELOW_PCT: f64 = 30.0;
const HEAVY_PRECIPITATION_MM: f64 = 5.0;
const WINDY_ABOVE_MS: f64 = 10.0;

/// Recommendations for the current UTC month.
///
/// `plant_types` is accepted for API compatibility and does not influence
/// the result yet.
pub fn generate_care_recommendations(
    weather: &WeatherObservation,
    plant_types: Option<&[String]>,
) -> Vec<CareRecommendation> {
    generate_care_recommendations_for_month(weather, plant_types, Utc::now().month())
}

/// Recommendations for an explicit calendar month (1 = January).
pub fn generate_care_recommendations_for_month(
    weather: &WeatherObservation,
    _plant_types: Option<&[String]>,
    month: u32,
) -> Vec<CareRecommendation> {
    let mut recs = Vec::new();

    temperature_rules(weather.temperature, &mut recs);
    humidity_rules(weather.humidity, &mut recs);
    precipitation_rules(weather.precipitation, &mut recs);
    wind_rules(weather.wind_speed, &mut recs);
    condition_rules(&weather.description, &mut recs);
    season_rules(Season::from_month(month), &mut recs);

    recs.sort_by(|a, b| b.priority.cmp(&a.priority));
    recs
}

fn temperature_rules(temperature: f64, recs: &mut Vec<CareRecommendation>) {
    if temperature > HOT_ABOVE_C {
        recs.push(CareRecommendation::new(
            CareCategory::Watering,
            Priority::High,
            "Increase watering frequency",
            format!(
                "High temperature ({:.1}°C) dries soil out quickly",
                temperature
            ),
        ));
        recs.push(CareRecommendation::new(
            CareCategory::Light,
            Priority::Medium,
            "Provide shade during the hottest hours",
            "Strong midday sun can scorch leaves in this heat",
        ));
    } else if temperature < COLD_BELOW_C {
        recs.push(CareRecommendation::new(
            CareCategory::Watering,
            Priority::Low,
            "Reduce watering",
            format!(
                "Plants take up less water at low temperatures ({:.1}°C)",
                temperature
            ),
        ));
        recs.push(CareRecommendation::new(
            CareCategory::Temperature,
            Priority::High,
            "Move sensitive plants indoors",
            "Protect plants from cold and possible frost damage",
        ));
    }
}

fn humidity_rules(humidity: f64, recs: &mut Vec<CareRecommendation>) {
    if humidity > HUMID_ABOVE_PCT {
        recs.push(CareRecommendation::new(
            CareCategory::General,
            Priority::Medium,
            "Improve air circulation around plants",
            format!("High humidity ({:.0}%) encourages mould", humidity),
        ));
        recs.push(CareRecommendation::new(
            CareCategory::General,
            Priority::Medium,
            "Check leaves for signs of fungal disease",
            "Damp air favours fungal growth",
        ));
    } else if humidity < DRY_BELOW_PCT {
        recs.push(CareRecommendation::new(
            CareCategory::Humidity,
            Priority::High,
            "Increase humidity around plants",
            format!("Low humidity ({:.0}%) dries out foliage", humidity),
        ));
        recs.push(CareRecommendation::new(
            CareCategory::Humidity,
            Priority::Medium,
            "Mist leaves in the morning",
            "Misting offsets dry air for humidity-loving plants",
        ));
    }
}

fn precipitation_rules(precipitation: f64, recs: &mut Vec<CareRecommendation>) {
    if precipitation > HEAVY_PRECIPITATION_MM {
        recs.push(CareRecommendation::new(
            CareCategory::Watering,
            Priority::Low,
            "Skip watering today",
            format!(
                "{:.1} mm of precipitation provides enough moisture",
                precipitation
            ),
        ));
        recs.push(CareRecommendation::new(
            CareCategory::General,
            Priority::Medium,
            "Check drainage for potted plants",
            "Heavy rain can waterlog roots",
        ));
    }
}

fn wind_rules(wind_speed: f64, recs: &mut Vec<CareRecommendation>) {
    if wind_speed > WINDY_ABOVE_MS {
        recs.push(CareRecommendation::new(
            CareCategory::General,
            Priority::Medium,
            "Secure tall and potted plants",
            format!("Strong wind ({:.1} m/s) can break stems", wind_speed),
        ));
        recs.push(CareRecommendation::new(
            CareCategory::Watering,
            Priority::Medium,
            "Check soil moisture more often",
            "Wind dries out soil faster than usual",
        ));
    }
}

fn condition_rules(description: &str, recs: &mut Vec<CareRecommendation>) {
    let condition = description.to_lowercase();
    if condition.contains("rain") {
        recs.push(CareRecommendation::new(
            CareCategory::Watering,
            Priority::Low,
            "Let the rain water outdoor plants",
            "Rainfall provides natural watering",
        ));
    } else if condition.contains("sun") || condition.contains("clear") {
        recs.push(CareRecommendation::new(
            CareCategory::Light,
            Priority::Low,
            "Give plants time in the light",
            "Clear skies are ideal for photosynthesis",
        ));
    }
}

fn season_rules(season: Season, recs: &mut Vec<CareRecommendation>) {
    let rec = match season {
        Season::Spring => CareRecommendation::new(
            CareCategory::Fertilizing,
            Priority::Medium,
            "Start regular fertilizing",
            "Spring is the start of the growing season",
        ),
        Season::Summer => CareRecommendation::new(
            CareCategory::Watering,
            Priority::Medium,
            "Monitor watering closely",
            "Summer heat increases water demand",
        ),
        Season::Fall => CareRecommendation::new(
            CareCategory::Fertilizing,
            Priority::Low,
            "Reduce fertilizing",
            "Growth slows down in fall",
        ),
        Season::Winter => CareRecommendation::new(
            CareCategory::Watering,
            Priority::Low,
            "Water sparingly",
            "Most plants are dormant in winter",
        ),
    };
    recs.push(rec);
}
