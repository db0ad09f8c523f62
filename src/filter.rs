use crate::error::{FilterError, Result};
use crate::hash::{
    ProbePositions, optimal_bit_vector_size, optimal_num_hashes, probe_positions,
};
use bitvec::{bitvec, order::Lsb0, slice::BitSlice, vec::BitVec};
use derive_builder::Builder;
use tracing::{debug, warn};

/// Largest bit array a filter can address.
pub const MAX_FILTER_BITS: usize = BitSlice::<usize, Lsb0>::MAX_BITS;

/// Construction parameters of a membership filter
#[derive(Clone, Debug, Builder, PartialEq)]
#[builder(pattern = "owned")]
pub struct FilterConfig {
    /// Number of items the filter is sized for
    #[builder(default = "10_000")]
    pub expected_items: usize,

    /// Target false positive rate, strictly between 0 and 1
    #[builder(default = "0.01")]
    pub false_positive_rate: f64,
}

impl FilterConfig {
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Self {
        Self {
            expected_items,
            false_positive_rate,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.expected_items == 0 {
            return Err(FilterError::InvalidExpectedItems { value: 0 });
        }
        // NaN fails both comparisons and lands here too
        if !(self.false_positive_rate > 0.0 && self.false_positive_rate < 1.0) {
            return Err(FilterError::InvalidFalsePositiveRate {
                rate: self.false_positive_rate,
            });
        }
        Ok(())
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(10_000, 0.01)
    }
}

/// Derived parameters calculated from FilterConfig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterParams {
    pub size: usize,
    pub hash_count: usize,
}

impl From<&FilterConfig> for FilterParams {
    fn from(config: &FilterConfig) -> Self {
        let size = optimal_bit_vector_size(
            config.expected_items,
            config.false_positive_rate,
        );
        let hash_count = optimal_num_hashes(config.expected_items, size);

        Self { size, hash_count }
    }
}

/// Point-in-time view of a filter's configuration and load
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStats {
    pub size: usize,
    pub hash_count: usize,
    pub bits_set: usize,
    pub expected_items: usize,
    pub false_positive_rate: f64,
}

/// Fixed-size Bloom filter over byte-string items.
///
/// Size and hash count are derived once from [`FilterConfig`] and never
/// change; a different configuration means a new filter. Bits are only ever
/// set, so an item passed to [`insert`](Self::insert) is reported by
/// [`contains`](Self::contains) for the lifetime of the value.
pub struct MembershipFilter {
    config: FilterConfig,
    params: FilterParams,
    bits: BitVec<usize, Lsb0>,
    bits_set: usize,
}

impl MembershipFilter {
    pub fn new(config: FilterConfig) -> Result<Self> {
        config.validate()?;

        let params = FilterParams::from(&config);
        if params.size > MAX_FILTER_BITS {
            return Err(FilterError::FilterTooLarge {
                size: params.size,
                max: MAX_FILTER_BITS,
            });
        }
        if params.hash_count == 0 {
            warn!(
                expected_items = config.expected_items,
                false_positive_rate = config.false_positive_rate,
                "hash count is zero, every membership check will match"
            );
        }
        debug!(
            size = params.size,
            hash_count = params.hash_count,
            "creating membership filter"
        );

        Ok(Self {
            config,
            params,
            bits: bitvec![usize, Lsb0; 0; params.size],
            bits_set: 0,
        })
    }

    /// Shorthand for `new(FilterConfig::new(expected_items, false_positive_rate))`.
    pub fn with_params(
        expected_items: usize,
        false_positive_rate: f64,
    ) -> Result<Self> {
        Self::new(FilterConfig::new(expected_items, false_positive_rate))
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn params(&self) -> FilterParams {
        self.params
    }

    pub fn size(&self) -> usize {
        self.params.size
    }

    pub fn hash_count(&self) -> usize {
        self.params.hash_count
    }

    pub fn bits_set(&self) -> usize {
        self.bits_set
    }

    /// Positions this filter probes for `item`.
    pub fn probe_positions(&self, item: &[u8]) -> ProbePositions {
        probe_positions(item, self.params.hash_count, self.params.size)
    }

    pub fn insert(&mut self, item: &[u8]) {
        for idx in probe_positions(item, self.params.hash_count, self.params.size)
        {
            if !self.bits.replace(idx, true) {
                self.bits_set += 1;
            }
        }
    }

    pub fn contains(&self, item: &[u8]) -> bool {
        self.probe_positions(item).all(|idx| self.bits[idx])
    }

    pub fn stats(&self) -> FilterStats {
        FilterStats {
            size: self.params.size,
            hash_count: self.params.hash_count,
            bits_set: self.bits_set,
            expected_items: self.config.expected_items,
            false_positive_rate: self.config.false_positive_rate,
        }
    }
}

impl std::fmt::Debug for MembershipFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MembershipFilter {{ size: {}, hash_count: {}, bits_set: {}, expected_items: {}, false_positive_rate: {} }}",
            self.params.size,
            self.params.hash_count,
            self.bits_set,
            self.config.expected_items,
            self.config.false_positive_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = FilterConfigBuilder::default().build().unwrap();
        assert_eq!(config, FilterConfig::default());
        assert_eq!(config.expected_items, 10_000);
        assert_eq!(config.false_positive_rate, 0.01);
    }

    #[test]
    fn test_params_from_config() {
        let params = FilterParams::from(&FilterConfig::new(10_000, 0.01));
        assert_eq!(
            params,
            FilterParams {
                size: 95_851,
                hash_count: 6
            }
        );
    }

    #[test]
    fn test_validate_rejects_bad_inputs() {
        assert_eq!(
            FilterConfig::new(0, 0.01).validate(),
            Err(FilterError::InvalidExpectedItems { value: 0 })
        );
        assert!(matches!(
            FilterConfig::new(1_000, 1.0).validate(),
            Err(FilterError::InvalidFalsePositiveRate { .. })
        ));
        assert!(matches!(
            FilterConfig::new(1_000, 0.0).validate(),
            Err(FilterError::InvalidFalsePositiveRate { .. })
        ));
        assert!(matches!(
            FilterConfig::new(1_000, f64::NAN).validate(),
            Err(FilterError::InvalidFalsePositiveRate { .. })
        ));
        assert!(FilterConfig::new(1_000, 0.05).validate().is_ok());
    }

    #[test]
    fn test_new_filter_is_empty() {
        let filter = MembershipFilter::with_params(1_000, 0.05).unwrap();
        assert_eq!(filter.bits_set(), 0);
        assert_eq!(filter.bits.len(), filter.size());
        assert!(filter.bits.not_any());
    }

    #[test]
    fn test_bits_set_tracks_bitvec() {
        let mut filter = MembershipFilter::with_params(100, 0.01).unwrap();
        for i in 0..250 {
            filter.insert(format!("item-{i}").as_bytes());
            assert_eq!(filter.bits_set(), filter.bits.count_ones());
        }
        assert!(filter.bits_set() <= filter.size());
    }

    #[test]
    fn test_zero_hash_count_matches_everything() {
        let filter = MembershipFilter::with_params(1_000, 0.6).unwrap();
        assert_eq!(filter.hash_count(), 0);
        assert!(filter.contains(b"anything"));
        assert_eq!(filter.probe_positions(b"anything").count(), 0);
    }

    #[test]
    fn test_debug_omits_bits() {
        let filter = MembershipFilter::with_params(1_000, 0.05).unwrap();
        let rendered = format!("{filter:?}");
        assert!(rendered.contains("size: 6236"));
        assert!(rendered.contains("hash_count: 4"));
    }
}
