//! Geometría del mapa: coordenadas y bounding boxes

use serde::{Deserialize, Serialize};

use crate::models::vehicle::Location;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl TryFrom<&Location> for LatLng {
    type Error = validator::ValidationError;

    fn try_from(location: &Location) -> Result<Self, Self::Error> {
        location.validate()?;
        Ok(LatLng::new(location.lat, location.lng))
    }
}

/// Bounding box rectangular (suroeste / noreste)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// `None` si no hay puntos
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = LatLngBounds {
            south_west: first,
            north_east: first,
        };
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Ampliar cada lado en `ratio` veces el alto/ancho del box
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lng_buffer = (self.north_east.lng - self.south_west.lng).abs() * ratio;
        LatLngBounds {
            south_west: LatLng::new(
                self.south_west.lat - lat_buffer,
                self.south_west.lng - lng_buffer,
            ),
            north_east: LatLng::new(
                self.north_east.lat + lat_buffer,
                self.north_east.lng + lng_buffer,
            ),
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_bounds_from_points() {
        assert!(LatLngBounds::from_points(Vec::<LatLng>::new()).is_none());

        let bounds = LatLngBounds::from_points(vec![
            LatLng::new(40.5, -73.5),
            LatLng::new(40.0, -74.0),
            LatLng::new(41.0, -73.0),
        ])
        .unwrap();
        assert_eq!(bounds.south_west, LatLng::new(40.0, -74.0));
        assert_eq!(bounds.north_east, LatLng::new(41.0, -73.0));
        assert_eq!(bounds.center(), LatLng::new(40.5, -73.5));
    }

    #[test]
    fn test_pad_ten_percent() {
        let bounds = LatLngBounds {
            south_west: LatLng::new(40.0, -74.0),
            north_east: LatLng::new(41.0, -72.0),
        };
        let padded = bounds.pad(0.1);
        assert!(close(padded.south_west.lat, 39.9));
        assert!(close(padded.south_west.lng, -74.2));
        assert!(close(padded.north_east.lat, 41.1));
        assert!(close(padded.north_east.lng, -71.8));
        assert!(padded.contains(LatLng::new(40.0, -74.0)));
    }

    #[test]
    fn test_location_conversion_rejects_non_finite() {
        let ok = Location::new(40.0, -74.0, "ok");
        assert!(LatLng::try_from(&ok).is_ok());
        let bad = Location::new(f64::NAN, -74.0, "bad");
        assert!(LatLng::try_from(&bad).is_err());
    }
}
