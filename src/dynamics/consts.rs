//! Tuning constants of the rigid-body simulation.

use crate::math::{Real, Vector};

/// The smallest mass a dynamic body can have.
pub const MIN_MASS: Real = 1.0e-3;
/// The largest time step integrated in one call. Longer frames must be sub-stepped by the caller.
pub const MAX_DELTA_TIME: Real = 1.0 / 30.0;
/// The largest rotation angle (in radians) integrated in one step.
pub const MAX_ROTATION_PER_FRAME: Real = core::f32::consts::FRAC_PI_4;
/// How long (in seconds) a body must stay still before falling asleep.
pub const SLEEP_TIME_THRESHOLD: Real = 0.5;
/// The kinetic energy (in joules) under which a body is considered still.
pub const DEFAULT_SLEEP_THRESHOLD: Real = 0.01;
/// The largest normal impulse applied by a single contact resolution.
pub const MAX_IMPULSE: Real = 50.0;
/// The penetration depth tolerated without positional correction.
pub const CORRECTION_SLOP: Real = 0.01;
/// The fraction of the penetration removed by each positional correction.
pub const CORRECTION_PERCENT: Real = 0.8;
/// The default gravity acceleration.
pub const GRAVITY: Vector<Real> = Vector::new(0.0, -9.8, 0.0);
