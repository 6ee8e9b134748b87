//! Random sampling for simulated paths

use rand::Rng;
use std::f64::consts::TAU;

/// Draw one standard normal deviate with the Box–Muller transform
///
/// `u1` is taken from `(0, 1]` so the logarithm stays finite.
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = 1.0 - rng.gen::<f64>();
    let u2 = rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}

/// Seed for one path, derived from the run seed and the path index
///
/// Paths draw from independent generators, so a path's values do not depend on
/// which thread ran it or in what order.
pub fn path_seed(seed: u64, path_index: u64) -> u64 {
    splitmix64(seed ^ splitmix64(path_index))
}

fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
