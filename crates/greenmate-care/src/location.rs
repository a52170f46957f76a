use greenmate_core::models::{LocationQuery, ResolvedLocation};

use crate::error::CareError;

/// Pick the usable part of a location query.
///
/// A complete `lat`/`lon` pair wins over a city; a blank city counts as absent.
pub fn resolve_location(query: &LocationQuery) -> Result<ResolvedLocation, CareError> {
    if let (Some(lat), Some(lon)) = (query.lat, query.lon) {
        return Ok(ResolvedLocation::Coordinates { lat, lon });
    }

    let city = query
        .city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(CareError::LocationRequired)?;

    let country = query
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from);

    Ok(ResolvedLocation::City {
        city: city.to_string(),
        country,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_take_precedence() {
        let query = LocationQuery {
            lat: Some(51.5),
            lon: Some(-0.12),
            city: Some("Paris".to_string()),
            country: None,
        };
        assert_eq!(
            resolve_location(&query).unwrap(),
            ResolvedLocation::Coordinates {
                lat: 51.5,
                lon: -0.12
            }
        );
    }

    #[test]
    fn test_city_with_country() {
        let query = LocationQuery {
            city: Some(" Lyon ".to_string()),
            country: Some("FR".to_string()),
            ..Default::default()
        };
        assert_eq!(
            resolve_location(&query).unwrap(),
            ResolvedLocation::City {
                city: "Lyon".to_string(),
                country: Some("FR".to_string())
            }
        );
    }

    #[test]
    fn test_half_coordinates_fall_back_to_city() {
        let query = LocationQuery {
            lat: Some(10.0),
            city: Some("Oslo".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_location(&query).unwrap(),
            ResolvedLocation::City { .. }
        ));
    }

    #[test]
    fn test_nothing_usable_is_location_required() {
        let query = LocationQuery {
            lat: Some(10.0),
            city: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_location(&query),
            Err(CareError::LocationRequired)
        ));
        assert!(matches!(
            resolve_location(&LocationQuery::default()),
            Err(CareError::LocationRequired)
        ));
    }
}
