use legacy_rand::LegacyRand;
use xoroshiro128::Xoroshiro;

pub mod legacy_rand;
pub mod xoroshiro128;

pub trait RandomImpl {
    fn set_seed(&mut self, seed: u64);

    fn next_i32(&mut self) -> i32;

    /// Uniform in `0..bound`. `bound` must be positive.
    fn next_bounded_i32(&mut self, bound: i32) -> i32;

    /// Uniform in `min..=max`.
    fn next_inbetween_i32(&mut self, min: i32, max: i32) -> i32 {
        self.next_bounded_i32(max - min + 1) + min
    }

    fn next_i64(&mut self) -> i64;

    /// Reseeds for a chunk the same way cave carvers and structure starts do, so
    /// every chunk of a world gets its own independent but reproducible stream.
    fn set_carver_seed(&mut self, world_seed: u64, chunk_x: i32, chunk_z: i32) {
        self.set_seed(world_seed);
        let l = self.next_i64();
        let m = self.next_i64();
        let seed =
            (chunk_x as i64).wrapping_mul(l) ^ (chunk_z as i64).wrapping_mul(m) ^ world_seed as i64;
        self.set_seed(seed as u64);
    }
}

pub enum RandomGenerator {
    Xoroshiro(Xoroshiro),
    Legacy(LegacyRand),
}

impl RandomGenerator {
    /// Picks the implementation the world settings ask for.
    pub fn from_seed(seed: u64, legacy: bool) -> Self {
        if legacy {
            Self::Legacy(LegacyRand::from_seed(seed))
        } else {
            Self::Xoroshiro(Xoroshiro::from_seed(seed))
        }
    }
}

impl RandomImpl for RandomGenerator {
    #[inline]
    fn set_seed(&mut self, seed: u64) {
        match self {
            Self::Xoroshiro(rand) => rand.set_seed(seed),
            Self::Legacy(rand) => rand.set_seed(seed),
        }
    }

    #[inline]
    fn next_i32(&mut self) -> i32 {
        match self {
            Self::Xoroshiro(rand) => rand.next_i32(),
            Self::Legacy(rand) => rand.next_i32(),
        }
    }

    #[inline]
    fn next_bounded_i32(&mut self, bound: i32) -> i32 {
        match self {
            Self::Xoroshiro(rand) => rand.next_bounded_i32(bound),
            Self::Legacy(rand) => rand.next_bounded_i32(bound),
        }
    }

    #[inline]
    fn next_i64(&mut self) -> i64 {
        match self {
            Self::Xoroshiro(rand) => rand.next_i64(),
            Self::Legacy(rand) => rand.next_i64(),
        }
    }
}
