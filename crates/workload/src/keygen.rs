//! Deterministic key and value generation
//!
//! Keys are a pure function of their inputs so that a read benchmark can
//! find exactly the keys an earlier fill wrote. Values are random unless
//! compressible data is requested.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::config::KeyDistribution;

/// Prefixes rotated by `fillprefixed` and scanned by `iterprefix`
pub const KEY_PREFIXES: [&str; 5] = ["user_", "order_", "product_", "session_", "config_"];

/// Repeating pattern for compressible values
pub const COMPRESSIBLE_PATTERN: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Multiplier of the index scrambler used by random-access read benchmarks
const LCG_MULTIPLIER: u64 = 1_103_515_245;
/// Increment of the index scrambler
const LCG_INCREMENT: u64 = 12_345;

/// Build a key of exactly `size` bytes for operation `index`
///
/// The distribution-derived suffix follows the optional prefix. Longer
/// results are truncated; shorter ones are padded with `j % 256` filler.
pub fn generate_key(
    index: u64,
    size: usize,
    distribution: KeyDistribution,
    prefix: Option<&str>,
) -> Vec<u8> {
    let mut key = Vec::with_capacity(size.max(24));
    if let Some(prefix) = prefix {
        key.extend_from_slice(prefix.as_bytes());
    }
    match distribution {
        KeyDistribution::Sequential => key.extend_from_slice(format!("{:016}", index).as_bytes()),
        KeyDistribution::Random => key.extend_from_slice(&index.to_le_bytes()),
        KeyDistribution::Zipfian => {
            let skewed = index % (index / 10 + 1);
            key.extend_from_slice(format!("{:016}", skewed).as_bytes());
        }
    }

    if key.len() > size {
        key.truncate(size);
    } else {
        let fill = key.len();
        key.extend((fill..size).map(|j| (j % 256) as u8));
    }
    key
}

/// Build a value of exactly `size` bytes
pub fn generate_value(size: usize, compressible: bool) -> Vec<u8> {
    if compressible {
        return COMPRESSIBLE_PATTERN.iter().copied().cycle().take(size).collect();
    }
    let mut value = vec![0u8; size];
    if rand::thread_rng().try_fill_bytes(&mut value).is_err() {
        for (j, b) in value.iter_mut().enumerate() {
            *b = (j % 256) as u8;
        }
    }
    value
}

/// Scatter operation `i` over `existing` keys
pub fn scrambled_index(i: u64, existing: u64) -> u64 {
    i.wrapping_mul(LCG_MULTIPLIER).wrapping_add(LCG_INCREMENT) % existing.max(1)
}

/// Prefix used for operation `i` by the prefixed benchmarks
pub fn prefix_for(i: u64) -> &'static str {
    KEY_PREFIXES[(i % KEY_PREFIXES.len() as u64) as usize]
}

/// Fisher–Yates permutation of `0..n`, fixed for a given `seed`
pub fn shuffled_indices(n: u64, seed: u64) -> Vec<u64> {
    let mut indices: Vec<u64> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    for i in (1..indices.len()).rev() {
        let j = rng.gen_range(0..=i);
        indices.swap(i, j);
    }
    indices
}
