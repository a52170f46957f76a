//! Image and weather fixtures.

use greenmate_core::models::WeatherObservation;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    });
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("encode fixture image");
    buffer
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    image_bytes(width, height, ImageFormat::Jpeg)
}

pub fn hot_clear_day() -> WeatherObservation {
    WeatherObservation {
        temperature: 35.0,
        humidity: 50.0,
        pressure: 1012.0,
        description: "clear sky".to_string(),
        wind_speed: 3.0,
        precipitation: 0.0,
    }
}
