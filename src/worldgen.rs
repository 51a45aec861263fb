//! World generation: populates the tile grid either by uniform weighted
//! selection or by a smoothed-noise field that biases biome choice.
//!
//! Both strategies take their biome tables as explicit configuration values
//! and are fully deterministic for a given seed and table order.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::coordinate::Coordinate;
use crate::noise::NoiseField;
use crate::registry::ObjectManager;
use crate::resources::{ResourceKind, ResourceMap};
use crate::tile::{Tile, TileKind};

/// Integer-weighted biome table for uniform random generation.
#[derive(Debug, Clone)]
pub struct WeightedTable {
    entries: Vec<(u32, TileKind)>,
}

impl WeightedTable {
    pub fn new(entries: Vec<(u32, TileKind)>) -> Self {
        Self { entries }
    }

    /// The classic rarity table: Forest 10, Grassland 10, Mountain 2.
    pub fn classic() -> Self {
        Self::new(vec![
            (10, TileKind::Forest),
            (10, TileKind::Grassland),
            (2, TileKind::Mountain),
        ])
    }

    fn total_weight(&self) -> u32 {
        self.entries.iter().map(|(w, _)| w).sum()
    }

    fn pick(&self, mut roll: i64) -> TileKind {
        loop {
            for (weight, kind) in &self.entries {
                roll -= i64::from(*weight);
                if roll < 0 {
                    return *kind;
                }
            }
        }
    }
}

/// Noise-value bands for biased generation. A cell's biome is picked
/// uniformly among every band containing its noise value; bands may overlap
/// (overlaps are how lakes pepper forests and grasslands).
#[derive(Debug, Clone)]
pub struct NoiseBands {
    entries: Vec<(f64, f64, TileKind)>,
}

impl NoiseBands {
    pub fn new(entries: Vec<(f64, f64, TileKind)>) -> Self {
        Self { entries }
    }

    /// The band layout the game ships with: deep water at the low end,
    /// mountains at the high end, lakes sprinkled into the middle.
    pub fn classic() -> Self {
        Self::new(vec![
            (0.0, 0.2, TileKind::Ocean),
            (0.2, 0.6, TileKind::Forest),
            (0.4, 0.41, TileKind::Lake),
            (0.5, 0.51, TileKind::Lake),
            (0.5, 0.8, TileKind::Grassland),
            (0.8, 1.0, TileKind::Mountain),
        ])
    }

    /// All bands containing `value` (bounds inclusive), falling back to the
    /// first registered band when none match.
    pub fn matches(&self, value: f64) -> Vec<TileKind> {
        let hits: Vec<TileKind> = self
            .entries
            .iter()
            .filter(|(min, max, _)| *min <= value && value <= *max)
            .map(|(_, _, kind)| *kind)
            .collect();
        if hits.is_empty() {
            vec![self.entries[0].2]
        } else {
            hits
        }
    }
}

/// Fills the registry with one tile per grid cell by weighted random draw.
pub fn generate_weighted(
    registry: &mut ObjectManager,
    table: &WeightedTable,
    width: u32,
    height: u32,
    seed: u64,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let total = table.total_weight();
    for x in 0..width {
        for y in 0..height {
            let roll = rng.gen_range(0..total) as i64;
            let kind = table.pick(roll);
            let coordinate = Coordinate::new(x as i32, y as i32);
            registry.add_tile(|id| Tile::new(id, kind, coordinate));
        }
    }
}

/// Fills the registry with one tile per grid cell, biasing biome selection
/// by a normalized noise field. Forest and Grassland cells produced this way
/// use the leaner game-layer production profiles instead of their defaults.
pub fn generate_noise(
    registry: &mut ObjectManager,
    bands: &NoiseBands,
    width: u32,
    height: u32,
    seed: u64,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = NoiseField::from_rng(width as usize, height as usize, &mut rng);

    for x in 0..width {
        for y in 0..height {
            let value = noise.value(x as usize, y as usize);
            let candidates = bands.matches(value);
            let kind = candidates[rng.gen_range(0..candidates.len())];
            let coordinate = Coordinate::new(x as i32, y as i32);
            registry.add_tile(|id| match noise_profile(kind) {
                Some((max_build, max_work, production)) => {
                    Tile::with_profile(id, kind, coordinate, max_build, max_work, production)
                }
                None => Tile::new(id, kind, coordinate),
            });
        }
    }
}

/// Biome overrides applied by the noise generator regardless of which band
/// matched.
fn noise_profile(kind: TileKind) -> Option<(u32, u32, ResourceMap)> {
    match kind {
        TileKind::Forest => Some((
            2,
            3,
            ResourceMap::from([(ResourceKind::Money, 2), (ResourceKind::Wood, 5)]),
        )),
        TileKind::Grassland => Some((
            2,
            3,
            ResourceMap::from([(ResourceKind::Money, 2), (ResourceKind::Food, 5)]),
        )),
        _ => None,
    }
}
