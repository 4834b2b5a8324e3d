/// Earth radius in meters. The client-side haversine display uses the same
/// constant; the two must not drift apart.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Default radius for nearby-incident queries, in meters
pub const DEFAULT_NEARBY_RADIUS_M: f64 = 5_000.0;

/// Maximum number of incidents a nearby query returns
pub const NEARBY_RESULT_LIMIT: usize = 10;

/// Maximum excerpt length taken from the reporter's free-text description
/// when building a fallback photo analysis
pub const DESCRIPTION_EXCERPT_MAX: usize = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - can update incident status, view analytics and heatmaps
pub const ROLE_ADMIN: &str = "admin";

/// User role - can submit incidents and track their own reports
pub const ROLE_USER: &str = "user";
