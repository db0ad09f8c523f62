use murmur3::murmur3_x64_128;
use sha2::{Digest, Sha256};
use std::io::Cursor;

/// SHA-256 digest of the item, big-endian.
pub(crate) fn hash_sha256(key: &[u8]) -> [u8; 32] {
    Sha256::digest(key).into()
}

pub(crate) fn hash_murmur128(key: &[u8]) -> u128 {
    let mut cursor = Cursor::new(key);
    murmur3_x64_128(&mut cursor, 0).expect("Failed to compute Murmur3 hash")
}

/// Reduces a big-endian unsigned integer of any width modulo `modulus`.
pub(crate) fn reduce_be(bytes: &[u8], modulus: u64) -> u64 {
    let m = modulus as u128;
    bytes
        .iter()
        .fold(0u128, |acc, &b| ((acc << 8) | b as u128) % m) as u64
}

/// Iterator over the probe positions of one item.
///
/// Yields `(h1 + i * h2) mod size` for `i` in `0..num_hashes`, where `h1` is
/// the SHA-256 digest read as a 256-bit integer and `h2` the 128-bit
/// MurmurHash3 digest. Both are reduced modulo `size` up front, so the
/// sequence equals the formula evaluated on unbounded integers.
#[derive(Debug, Clone)]
pub struct ProbePositions {
    next: u64,
    step: u64,
    size: u64,
    remaining: usize,
}

impl Iterator for ProbePositions {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let position = self.next;
        self.next = ((position as u128 + self.step as u128)
            % self.size as u128) as u64;
        Some(position as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbePositions {}

/// Derives `num_hashes` probe positions in `[0, size)` from two digests
/// using double hashing. Yields nothing when either argument is zero.
pub fn probe_positions(
    item: &[u8],
    num_hashes: usize,
    size: usize,
) -> ProbePositions {
    if num_hashes == 0 || size == 0 {
        return ProbePositions {
            next: 0,
            step: 0,
            size: 1,
            remaining: 0,
        };
    }

    let size = size as u64;
    let h1 = reduce_be(&hash_sha256(item), size);
    let h2 = (hash_murmur128(item) % size as u128) as u64;

    ProbePositions {
        next: h1,
        step: h2,
        size,
        remaining: num_hashes,
    }
}

/// Bit array size for `n` expected items at false-positive rate `fpr`,
/// rounded up.
pub fn optimal_bit_vector_size(n: usize, fpr: f64) -> usize {
    let ln2 = std::f64::consts::LN_2;
    (-(n as f64 * fpr.ln()) / (ln2 * ln2)).ceil() as usize
}

/// Probe count for `n` items in `m` bits, rounded down. Zero when
/// `m / n < 1 / ln 2`, i.e. for any rate above one half.
pub fn optimal_num_hashes(n: usize, m: usize) -> usize {
    ((m as f64 / n as f64) * std::f64::consts::LN_2).floor() as usize
}
