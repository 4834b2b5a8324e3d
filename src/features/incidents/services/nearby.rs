use crate::features::incidents::models::{Incident, IncidentStatus};
use crate::shared::constants::{EARTH_RADIUS_M, NEARBY_RESULT_LIMIT};

/// An incident paired with its distance from the query point
#[derive(Debug)]
pub struct NearbyIncident {
    pub incident: Incident,
    pub distance_meters: f64,
}

/// Great-circle distance by the spherical law of cosines. The dot product is
/// clamped before `acos` so identical points cannot produce NaN.
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let cos_angle = phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta_lambda.cos();
    EARTH_RADIUS_M * cos_angle.clamp(-1.0, 1.0).acos()
}

/// Rank incidents around a point. Resolved incidents and incidents without
/// coordinates never appear; inclusion is strictly inside the radius, closest
/// first, capped at ten results.
pub fn rank(incidents: Vec<Incident>, latitude: f64, longitude: f64, radius: f64) -> Vec<NearbyIncident> {
    let mut ranked: Vec<NearbyIncident> = incidents
        .into_iter()
        .filter(|incident| incident.status != IncidentStatus::Resolved)
        .filter_map(|incident| {
            let (lat, lng) = incident.coordinates()?;
            let distance = distance_meters(latitude, longitude, lat, lng);
            (distance < radius).then_some(NearbyIncident {
                incident,
                distance_meters: distance,
            })
        })
        .collect();

    ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    ranked.truncate(NEARBY_RESULT_LIMIT);
    ranked
}
