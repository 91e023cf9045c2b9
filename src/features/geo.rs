//! Great-circle distance to known city centres.

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Known city-centre coordinates, keyed by lowercase city name.
///
/// A record's city field matches a centre when the key is a case-insensitive
/// substring of the field (so `"Navi Mumbai"` matches `mumbai`).
pub const CITY_CENTERS: [(&str, f64, f64); 7] = [
    ("bangalore", 12.9716, 77.5946),
    ("mumbai", 19.0760, 72.8777),
    ("delhi", 28.6139, 77.2090),
    ("chennai", 13.0827, 80.2707),
    ("hyderabad", 17.3850, 78.4867),
    ("kolkata", 22.5726, 88.3639),
    ("lucknow", 26.8467, 80.9462),
];

/// Haversine great-circle distance between two coordinates, in km.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance from a listing to its city's centre, if the city is known.
///
/// Returns `None` when no centre's name is a substring of the (lowercased)
/// city field; the caller back-fills missing distances with the batch median.
pub fn dist_to_city_center(city: &str, lat: f64, lon: f64) -> Option<f64> {
    let city = city.to_lowercase();
    for (name, clat, clon) in CITY_CENTERS {
        if city.contains(name) {
            return Some(haversine_km(lat, lon, clat, clon));
        }
    }
    None
}
