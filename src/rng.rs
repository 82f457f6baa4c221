//! Order-independent seed stream.
//!
//! Every draw is keyed by `(seed, cell_id, tag)` and seeds its own one-shot
//! generator, so the value for a cell never depends on how many other cells
//! were drawn before it or on which thread drew them.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::DEFAULT_SEED;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Named sub-streams drawn per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamTag {
    Type,
    Fertility,
    Habitability,
    Minerals,
    Energy,
    UrbanShare,
}

impl StreamTag {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamTag::Type => "type",
            StreamTag::Fertility => "fertility",
            StreamTag::Habitability => "habitability",
            StreamTag::Minerals => "minerals",
            StreamTag::Energy => "energy",
            StreamTag::UrbanShare => "urban_share",
        }
    }
}

/// Maps an arbitrary caller seed onto the seed actually hashed.
pub fn normalize_seed(seed: &str) -> &str {
    if seed.trim().is_empty() {
        DEFAULT_SEED
    } else {
        seed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedStream {
    seed_hash: u64,
}

impl SeedStream {
    pub fn new(seed: &str) -> Self {
        Self {
            seed_hash: fnv1a(normalize_seed(seed).as_bytes()),
        }
    }

    pub fn draw(&self, cell_id: u32, tag: StreamTag) -> f64 {
        self.draw_tagged(cell_id, tag.as_str())
    }

    /// Uniform value in `[0, 1)` for an arbitrary tag.
    pub fn draw_tagged(&self, cell_id: u32, tag: &str) -> f64 {
        let mut rng = ChaCha8Rng::seed_from_u64(self.derive_key(cell_id, tag));
        rng.gen::<f64>()
    }

    /// Affine map of a draw into `[min, max]`.
    pub fn draw_range(&self, cell_id: u32, tag: StreamTag, min: f64, max: f64) -> f64 {
        min + (max - min) * self.draw(cell_id, tag)
    }

    fn derive_key(&self, cell_id: u32, tag: &str) -> u64 {
        let tag_hash = fnv1a(tag.as_bytes());
        let mut key = splitmix64(self.seed_hash);
        key ^= splitmix64(u64::from(cell_id).wrapping_add(0x9e37_79b9_7f4a_7c15));
        key = splitmix64(key);
        key ^= tag_hash;
        splitmix64(key)
    }
}

/// `draw(seed, cell_id, tag)` without holding on to a stream.
pub fn draw(seed: &str, cell_id: u32, tag: &str) -> f64 {
    SeedStream::new(seed).draw_tagged(cell_id, tag)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}
