//! GreenMate Care Library
//!
//! Turns a weather snapshot and the calendar month into a ranked list of
//! plant-care recommendations, and wraps that engine with location
//! resolution and a weather provider.

pub mod error;
pub mod location;
pub mod recommendations;
pub mod season;
pub mod service;
pub mod weather;

pub use error::CareError;
pub use location::resolve_location;
pub use recommendations::{
    generate_care_recommendations, generate_care_recommendations_for_month,
};
pub use season::Season;
pub use service::{build_forecast, CareService};
pub use weather::{parse_current_weather, OpenWeatherMapClient, WeatherProvider};
