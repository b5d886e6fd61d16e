use super::RandomImpl;

const GOLDEN_RATIO_64: u64 = 0x9E37_79B9_7F4A_7C15;
const SILVER_RATIO_64: u64 = 0x6A09_E667_F3BC_C909;

/// Xoroshiro128++, the default random source for modern worlds.
pub struct Xoroshiro {
    lo: u64,
    hi: u64,
}

fn mix_stafford_13(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl Xoroshiro {
    pub fn from_seed(seed: u64) -> Self {
        let lo = seed ^ SILVER_RATIO_64;
        let hi = lo.wrapping_add(GOLDEN_RATIO_64);
        Self::new(mix_stafford_13(lo), mix_stafford_13(hi))
    }

    pub fn new(lo: u64, hi: u64) -> Self {
        if (lo | hi) == 0 {
            return Self {
                lo: GOLDEN_RATIO_64,
                hi: SILVER_RATIO_64,
            };
        }
        Self { lo, hi }
    }

    fn next_random(&mut self) -> u64 {
        let l = self.lo;
        let mut m = self.hi;
        let n = l.wrapping_add(m).rotate_left(17).wrapping_add(l);
        m ^= l;
        self.lo = l.rotate_left(49) ^ m ^ (m << 21);
        self.hi = m.rotate_left(28);
        n
    }
}

impl RandomImpl for Xoroshiro {
    fn set_seed(&mut self, seed: u64) {
        *self = Self::from_seed(seed);
    }

    fn next_i32(&mut self) -> i32 {
        self.next_random() as i32
    }

    fn next_bounded_i32(&mut self, bound: i32) -> i32 {
        let bound = bound as u64;
        let mut l = self.next_i32() as u32 as u64;
        let mut m = l.wrapping_mul(bound);
        let mut n = m & 0xFFFF_FFFF;
        if n < bound {
            let threshold = ((!(bound as u32)).wrapping_add(1) % bound as u32) as u64;
            while n < threshold {
                l = self.next_i32() as u32 as u64;
                m = l.wrapping_mul(bound);
                n = m & 0xFFFF_FFFF;
            }
        }
        (m >> 32) as i32
    }

    fn next_i64(&mut self) -> i64 {
        self.next_random() as i64
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zero_state_is_replaced() {
        let mut random = Xoroshiro::new(0, 0);
        assert_ne!(random.next_i64(), 0);
    }

    #[test]
    fn bounded_stays_in_range() {
        let mut random = Xoroshiro::from_seed(1);
        for bound in [1, 2, 3, 7, 100, i32::MAX] {
            for _ in 0..200 {
                let value = random.next_bounded_i32(bound);
                assert!((0..bound).contains(&value), "{value} not below {bound}");
            }
        }
    }

    #[test]
    fn same_seed_same_stream() {
        let mut a = Xoroshiro::from_seed(8080);
        let mut b = Xoroshiro::from_seed(8080);
        for _ in 0..16 {
            assert_eq!(a.next_i64(), b.next_i64());
        }
    }
}
