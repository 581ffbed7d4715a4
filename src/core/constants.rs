//! Deployment constants and detector defaults

/// Default position of access point 1 on the warehouse grid
pub const DEFAULT_AP1_LOCATION: (f64, f64) = (5.0, 8.0);
/// Default position of access point 2 on the warehouse grid
pub const DEFAULT_AP2_LOCATION: (f64, f64) = (4.0, 12.0);
/// Default position of access point 3 on the warehouse grid
pub const DEFAULT_AP3_LOCATION: (f64, f64) = (10.0, 6.0);

/// Anchor names as they appear in the ping records
pub const DEFAULT_ANCHOR_IDS: [&str; 3] = ["AP1", "AP2", "AP3"];

/// Minimum change between consecutive step distances that counts as abrupt motion
pub const ACCEL_THRESHOLD: f64 = 2.0;

/// Maximum separation (grid units) at which two vehicles are considered to have collided
pub const COLLISION_DISTANCE: f64 = 1.0;

/// Maximum timestamp difference (seconds) for two pings to be compared for proximity
pub const TIME_TOLERANCE: i64 = 5;

/// Below this magnitude a basis component is treated as zero
pub const GEOMETRY_EPSILON: f64 = 1e-9;
