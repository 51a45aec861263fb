//! Smoothed value-noise field used to bias biome selection.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const OCTAVES: u32 = 5;
/// Per-octave amplitude divisor; each octave weighs half the previous one.
const BIAS: f64 = 2.0;
/// Box-filter radii applied in order after octave accumulation.
const SMOOTHING_PASSES: [i64; 4] = [4, 3, 2, 1];

/// A `width * height` grid of noise values rescaled to span exactly [0, 1].
///
/// Built from independent uniform seed values, accumulated over five
/// bilinear octaves, box-smoothed, then min/max-normalized. Fully
/// deterministic for a given RNG state.
#[derive(Debug, Clone)]
pub struct NoiseField {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl NoiseField {
    /// Field seeded from its own ChaCha stream.
    pub fn new(width: usize, height: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::from_rng(width, height, &mut rng)
    }

    /// Field drawing its seed grid from the caller's RNG, so world
    /// generation can share one seeded stream across all of its draws.
    pub fn from_rng(width: usize, height: usize, rng: &mut impl Rng) -> Self {
        let seeds: Vec<f64> = (0..width * height).map(|_| rng.gen::<f64>()).collect();
        let mut field = Self {
            width,
            height,
            values: vec![0.0; width * height],
        };
        field.accumulate_octaves(&seeds);
        for radius in SMOOTHING_PASSES {
            field.smooth(radius);
        }
        field.normalize();
        field
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn value(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    fn accumulate_octaves(&mut self, seeds: &[f64]) {
        let width = self.width;
        let height = self.height;
        for x in 0..width {
            for y in 0..height {
                let mut noise = 0.0;
                let mut scale = 1.0;
                let mut scale_acc = 0.0;

                for octave in 0..OCTAVES {
                    // Sub-cell pitches would divide by zero on very narrow
                    // maps; one column is the finest sampling that exists.
                    let pitch = (width >> octave).max(1);
                    let sample_x1 = (x / pitch) * pitch;
                    let sample_y1 = (y / pitch) * pitch;
                    let sample_x2 = (sample_x1 + pitch) % width;
                    let sample_y2 = (sample_y1 + pitch) % height;

                    let blend_x = (x - sample_x1) as f64 / pitch as f64;
                    let blend_y = (y - sample_y1) as f64 / pitch as f64;

                    let sample_t = (1.0 - blend_x) * seeds[sample_y1 * width + sample_x1]
                        + blend_x * seeds[sample_y1 * width + sample_x2];
                    let sample_b = (1.0 - blend_x) * seeds[sample_y2 * width + sample_x1]
                        + blend_x * seeds[sample_y2 * width + sample_x2];

                    noise += (blend_y * (sample_b - sample_t) + sample_t) * scale;
                    scale_acc += scale;
                    scale /= BIAS;
                }

                self.values[y * width + x] = noise / scale_acc;
            }
        }
    }

    /// One box-filter pass. Indices that fall outside the linear buffer are
    /// clamped to the center cell itself, not wrapped.
    fn smooth(&mut self, radius: i64) {
        let len = self.values.len() as i64;
        let width = self.width as i64;
        let mut smoothed = Vec::with_capacity(self.values.len());

        for i in 0..len {
            let mut sum = self.values[i as usize];
            for dx in -radius..=radius {
                for dy in -radius..=radius {
                    let mut index = i + dx + dy * width;
                    if index < 0 || index > len - 1 {
                        index = i;
                    }
                    sum += self.values[index as usize];
                }
            }
            let samples = (2 * radius + 1) * (2 * radius + 1);
            smoothed.push(sum / samples as f64);
        }

        self.values = smoothed;
    }

    /// Linear rescale so the field spans exactly [0, 1].
    fn normalize(&mut self) {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        for v in &self.values {
            min = min.min(*v);
            max = max.max(*v);
        }
        let span = max - min;
        if span == 0.0 {
            for v in &mut self.values {
                *v = 0.0;
            }
            return;
        }
        for v in &mut self.values {
            *v = (*v - min) / span;
        }
    }
}
