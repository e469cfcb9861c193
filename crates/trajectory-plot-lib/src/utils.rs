//! Utility functions for coordinate conversions and geodesic measurements

use crate::{Crs, PlotError, Result};
use geo::Point;

/// Web Mercator bounds in meters (EPSG:3857)
pub const EARTH_MERCATOR_MAX: f64 = 20037508.34;
pub const EARTH_MERCATOR_MIN: f64 = -20037508.34;

/// Maximum latitude that can be represented in Web Mercator
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6371000.0;

/// Precomputed constant: EARTH_MERCATOR_MAX / 180.0
const LON_TO_X_FACTOR: f64 = EARTH_MERCATOR_MAX / 180.0;

/// Precomputed constant: EARTH_MERCATOR_MAX / PI
const Y_FACTOR: f64 = EARTH_MERCATOR_MAX / std::f64::consts::PI;

/// Precomputed constant: 180.0 / EARTH_MERCATOR_MAX
const X_TO_LON_FACTOR: f64 = 180.0 / EARTH_MERCATOR_MAX;

/// Precomputed constant: PI / EARTH_MERCATOR_MAX
const Y_TO_LAT_FACTOR: f64 = std::f64::consts::PI / EARTH_MERCATOR_MAX;

/// Convert WGS84 (lat, lon) to Web Mercator (x, y) in meters
///
/// Latitude is clamped to the range Web Mercator can represent.
#[inline(always)]
pub fn wgs84_to_mercator(lat: f64, lon: f64) -> Point<f64> {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = lon * LON_TO_X_FACTOR;
    let lat_rad = lat.to_radians();
    let y = (lat_rad.tan() + (1.0 / lat_rad.cos())).ln() * Y_FACTOR;
    Point::new(x, y)
}

/// Convert Web Mercator (x, y) in meters to WGS84, returned as (lat, lon)
#[inline(always)]
pub fn mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = x * X_TO_LON_FACTOR;
    let lat =
        (std::f64::consts::PI / 2.0 - 2.0 * ((-y * Y_TO_LAT_FACTOR).exp()).atan()).to_degrees();
    (lat, lon)
}

/// Check if a point is within Web Mercator bounds
#[inline(always)]
pub fn is_valid_mercator(point: &Point<f64>) -> bool {
    let x = point.x();
    let y = point.y();
    x >= EARTH_MERCATOR_MIN
        && x <= EARTH_MERCATOR_MAX
        && y >= EARTH_MERCATOR_MIN
        && y <= EARTH_MERCATOR_MAX
}

/// Haversine distance in meters between two lon/lat points
#[inline]
pub fn haversine_distance(p1: Point<f64>, p2: Point<f64>) -> f64 {
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let delta_lat = (p2.y() - p1.y()).to_radians();
    let delta_lon = (p2.x() - p1.x()).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial great-circle bearing from `p1` to `p2` in degrees, `[0, 360)`, clockwise from north
#[inline]
pub fn initial_bearing(p1: Point<f64>, p2: Point<f64>) -> f64 {
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let delta_lon = (p2.x() - p1.x()).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Planar heading from `p1` to `p2` in degrees, `[0, 360)`, clockwise from the +y axis
#[inline]
pub fn planar_bearing(p1: Point<f64>, p2: Point<f64>) -> f64 {
    (p2.x() - p1.x())
        .atan2(p2.y() - p1.y())
        .to_degrees()
        .rem_euclid(360.0)
}

/// Reproject a point between coordinate reference systems
///
/// Only WGS84 and Web Mercator are supported. Points are `(x, y)`, i.e. `(lon, lat)` for WGS84.
pub fn reproject(point: Point<f64>, from: Crs, to: Crs) -> Result<Point<f64>> {
    match (from, to) {
        (from, to) if from == to => Ok(point),
        (Crs::Wgs84, Crs::WebMercator) => Ok(wgs84_to_mercator(point.y(), point.x())),
        (Crs::WebMercator, Crs::Wgs84) => {
            if !is_valid_mercator(&point) {
                return Err(PlotError::CoordinateConversion(format!(
                    "point ({}, {}) is outside Web Mercator bounds",
                    point.x(),
                    point.y()
                )));
            }
            let (lat, lon) = mercator_to_wgs84(point.x(), point.y());
            Ok(Point::new(lon, lat))
        }
        (from, to) => Err(PlotError::CoordinateConversion(format!(
            "unsupported reprojection from EPSG:{} to EPSG:{}",
            from.epsg(),
            to.epsg()
        ))),
    }
}
