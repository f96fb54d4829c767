//! Random payment files for exercising the runner.

use std::io::Write;
use std::ops::RangeInclusive;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::errors::RunnerResult;

pub const NAME_WORDS: [&str; 23] = [
    "Chairman", "Bao", "Sightglass", "Coffee", "Creme", "Brulee", "Cart", "Everyman", "Espresso",
    "Motek", "Butter", "Lane", "Hello", "Bicycle", "Humble", "House", "Foods", "Fravic", "Square",
    "Employee", "Golden", "Gate", "Bridge",
];

pub const CATEGORIES: [&str; 8] = [
    "food-truck",
    "bank",
    "coffee-shop",
    "startup",
    "vehicles",
    "mall",
    "restaurant",
    "tea-stand",
];

/// Latitude span of San Francisco.
pub const LAT_RANGE: RangeInclusive<f64> = 37.7034..=37.8120;
/// Longitude span of San Francisco.
pub const LNG_RANGE: RangeInclusive<f64> = -122.5270..=-122.3482;

/// Writes `rows` random payment lines to `out`.
///
/// The same `seed` always produces the same file; without one the generator
/// is seeded from the OS.
pub fn generate_payments<W: Write>(
    rows: usize,
    seed: Option<u64>,
    out: &mut W,
) -> RunnerResult<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for i in 1..=rows {
        let first = NAME_WORDS.choose(&mut rng).copied().unwrap_or_default();
        let last = NAME_WORDS.choose(&mut rng).copied().unwrap_or_default();
        let category = CATEGORIES.choose(&mut rng).copied().unwrap_or_default();
        let lat = rng.gen_range(LAT_RANGE);
        let lng = rng.gen_range(LNG_RANGE);
        writeln!(out, "{} {} (#{}), {}, {}, {}", first, last, i, category, lat, lng)?;
    }
    out.flush()?;

    log::info!("Generated {} payments", rows);
    Ok(())
}
