//! # Simplex Noise Height Fields
//!
//! Deterministic 2D noise used to derive terrain height from world
//! coordinates.
//!
//! ## Determinism Guarantee
//!
//! Given the same [`WorldSeed`] and [`NoiseParams`], a [`NoiseField`]
//! produces **exactly** the same value for the same coordinate, on any
//! platform, any time. Chunk regeneration and neighbor lookups depend on
//! this.

use serde::Deserialize;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g. tree placement).
    ///
    /// Hash-mixes the purpose into the seed to create independent streams.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xB1A5_7ED0_0C0B_A171)
    }
}

/// Fractal noise profile, fixed at construction.
///
/// These are config-time constants: a field samples with the same profile
/// for its entire lifetime.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseParams {
    /// Base frequency of the first octave.
    pub frequency: f64,
    /// Amplitude of the first octave.
    pub amplitude: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            frequency: 0.005,
            amplitude: 1.0,
            lacunarity: 2.0,
            persistence: 0.5,
        }
    }
}

/// Pre-computed permutation table, built once from the seed.
struct PermutationTable {
    /// 256 entries, doubled so lookups never wrap mid-index.
    perm: [u8; 512],
    /// Gradient set for 2D simplex.
    grad: [[i8; 2]; 12],
}

impl PermutationTable {
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];

        for (i, p) in perm.iter_mut().take(256).enumerate() {
            *p = i as u8;
        }

        // Fisher-Yates shuffle driven by a xorshift64 stream off the seed.
        let mut state = seed.value();
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;

            let j = (state as usize) % (i + 1);
            perm.swap(i, j);
        }

        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        let grad = [
            [1, 0],
            [1, 1],
            [0, 1],
            [-1, 1],
            [-1, 0],
            [-1, -1],
            [0, -1],
            [1, -1],
            [1, 0],
            [0, 1],
            [-1, 0],
            [0, -1],
        ];

        Self { perm, grad }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(&self, hash: u8) -> [i8; 2] {
        self.grad[(hash % 12) as usize]
    }
}

/// Deterministic 2D fractal noise field.
///
/// The frequency/amplitude/lacunarity/persistence profile is fixed at
/// construction; only the octave count varies per call. Sampling is a pure
/// function of the inputs - no interior mutation.
///
/// # Example
///
/// ```rust,ignore
/// let field = NoiseField::new(WorldSeed::new(42), NoiseParams::default());
/// let height = field.fractal(100.0, 200.0, 8);
/// assert!((-1.0..=1.0).contains(&height));
/// ```
pub struct NoiseField {
    perm_table: PermutationTable,
    params: NoiseParams,
}

impl NoiseField {
    /// Skewing factor for the 2D simplex grid.
    const F2: f64 = 0.366_025_403_784_439; // (sqrt(3) - 1) / 2
    /// Unskewing factor for the 2D simplex grid.
    const G2: f64 = 0.211_324_865_405_187; // (3 - sqrt(3)) / 6

    /// Creates a noise field from a seed and a fixed fractal profile.
    #[must_use]
    pub fn new(seed: WorldSeed, params: NoiseParams) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
            params,
        }
    }

    /// Returns the fractal profile this field was built with.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> NoiseParams {
        self.params
    }

    /// Samples raw (single-octave, unscaled) simplex noise.
    ///
    /// # Returns
    ///
    /// A value in [-1, 1].
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        // Skew input coordinates onto the simplex grid.
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        // Unskew back to get the first simplex corner.
        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Upper or lower triangle of the simplex cell.
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::G2;
        let y1 = y0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;

        let gi0 = self.perm_table.get(ii + self.perm_table.get(jj) as usize);
        let gi1 = self
            .perm_table
            .get(ii + i1 as usize + self.perm_table.get(jj + j1 as usize) as usize);
        let gi2 = self.perm_table.get(ii + 1 + self.perm_table.get(jj + 1) as usize);

        let n0 = self.corner(x0, y0, gi0);
        let n1 = self.corner(x1, y1, gi1);
        let n2 = self.corner(x2, y2, gi2);

        // 70.0 scales the summed contributions back into [-1, 1].
        70.0 * (n0 + n1 + n2)
    }

    /// Contribution from one simplex corner.
    #[inline]
    fn corner(&self, x: f64, y: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = self.perm_table.gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }

    /// Samples fractal (multi-octave) noise with the fixed profile.
    ///
    /// Sums `octaves` layers starting at the profile's base frequency and
    /// amplitude, then normalizes by the total amplitude.
    ///
    /// # Returns
    ///
    /// A value in [-1, 1].
    #[must_use]
    pub fn fractal(&self, x: f64, y: f64, octaves: u32) -> f64 {
        let mut total = 0.0;
        let mut denom = 0.0;
        let mut frequency = self.params.frequency;
        let mut amplitude = self.params.amplitude;

        for _ in 0..octaves {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            denom += amplitude;
            frequency *= self.params.lacunarity;
            amplitude *= self.params.persistence;
        }

        total / denom
    }
}

/// Floor cast that beats `f64::floor` for this workload.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) {
        xi - 1
    } else {
        xi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let seed = WorldSeed::new(12345);
        let field1 = NoiseField::new(seed, NoiseParams::default());
        let field2 = NoiseField::new(seed, NoiseParams::default());

        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let y = f64::from(i) * 0.17;
            assert_eq!(
                field1.fractal(x, y, 8),
                field2.fractal(x, y, 8),
                "noise must be deterministic"
            );
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let field1 = NoiseField::new(WorldSeed::new(1), NoiseParams::default());
        let field2 = NoiseField::new(WorldSeed::new(2), NoiseParams::default());

        assert_ne!(
            field1.sample(100.0, 100.0),
            field2.sample(100.0, 100.0),
            "different seeds should diverge"
        );
    }

    #[test]
    fn test_sample_range() {
        let field = NoiseField::new(WorldSeed::new(42), NoiseParams::default());

        for i in 0..10_000 {
            let x = (f64::from(i) * 0.1) - 500.0;
            let y = (f64::from(i) * 0.13) - 650.0;
            let value = field.sample(x, y);

            assert!(
                (-1.0..=1.0).contains(&value),
                "value {value} out of range at ({x}, {y})"
            );
        }
    }

    #[test]
    fn test_fractal_range() {
        let field = NoiseField::new(WorldSeed::new(42), NoiseParams::default());

        for i in 0..1_000 {
            let x = f64::from(i) * 3.7;
            let y = f64::from(i) * 5.1;
            let value = field.fractal(x, y, 8);

            assert!(
                (-1.0..=1.0).contains(&value),
                "normalized fractal {value} out of range"
            );
        }
    }

    #[test]
    fn test_continuity() {
        let field = NoiseField::new(WorldSeed::new(42), NoiseParams::default());

        let x = 100.0;
        let y = 100.0;
        let delta = 0.001;

        let v1 = field.sample(x, y);
        let v2 = field.sample(x + delta, y);
        let v3 = field.sample(x, y + delta);

        assert!((v1 - v2).abs() < 0.01, "noise should be continuous");
        assert!((v1 - v3).abs() < 0.01, "noise should be continuous");
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        let derived1 = base.derive(1);
        let derived2 = base.derive(2);
        let derived1_again = base.derive(1);

        assert_ne!(derived1, derived2);
        assert_eq!(derived1, derived1_again);
        assert_ne!(derived1, base);
    }
}
