//! Bloom filter membership testing with an optional HTTP front end.
//!
//! HowTo:
//!    * Sizing: for `n` expected items and target rate `p` the bit array has
//!      `m = ceil(-n * ln(p) / ln(2)^2)` positions and every item is probed at
//!      `k = floor(m / n * ln(2))` of them.
//!    * Hashing: two digests are taken per item (SHA-256 and MurmurHash3
//!      x64/128) and combined by double hashing, `pos_i = (h1 + i * h2) mod m`.
//!
//! Insertion:
//!     * Set the bit at every probe position of the item.
//! Query:
//!     * The item may be present only if every probe position is set; a single
//!       clear bit proves it was never inserted.
//!
//! Obvious problems:
//!     * Inserting more than `n` items silently raises the real false positive
//!       rate above `p`.
//!     * Any `p > 0.5` yields `k = 0`, and then every query matches.
//!     * Items cannot be removed; start over with a new filter instead.

#[cfg(feature = "server")]
pub mod api;
pub mod common;
mod error;
mod filter;
mod hash;
#[cfg(feature = "server")]
pub mod types;

pub use error::{FilterError, Result};
pub use filter::{
    FilterConfig, FilterConfigBuilder, FilterConfigBuilderError, FilterParams,
    FilterStats, MAX_FILTER_BITS, MembershipFilter,
};
pub use hash::{
    ProbePositions, optimal_bit_vector_size, optimal_num_hashes,
    probe_positions,
};
#[cfg(feature = "server")]
pub use types::{
    AppState, ServerConfig, ServerConfigBuilder, ServerConfigBuilderError,
};
