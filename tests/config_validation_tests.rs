use membership_filter::{
    FilterConfig, FilterConfigBuilder, FilterError, MAX_FILTER_BITS,
    MembershipFilter,
};

#[cfg(test)]
mod expected_items_validation_tests {
    use super::*;

    #[test]
    fn test_zero_expected_items_fails() {
        let config = FilterConfigBuilder::default()
            .expected_items(0)
            .false_positive_rate(0.01)
            .build()
            .unwrap();

        match config.validate().unwrap_err() {
            FilterError::InvalidExpectedItems { value } => assert_eq!(value, 0),
            other => panic!("Expected InvalidExpectedItems, got {other:?}"),
        }
    }

    #[test]
    fn test_construction_fails_before_allocating() {
        let err = MembershipFilter::with_params(0, 0.01).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_minimum_valid_expected_items() {
        let config = FilterConfigBuilder::default()
            .expected_items(1)
            .false_positive_rate(0.01)
            .build()
            .unwrap();

        assert!(config.validate().is_ok());
    }
}

#[cfg(test)]
mod size_limit_validation_tests {
    use super::*;

    #[test]
    fn test_oversized_filter_is_rejected_not_panicking() {
        let err = MembershipFilter::with_params(1usize << 62, 0.01).unwrap_err();
        match &err {
            FilterError::FilterTooLarge { size, max } => {
                assert_eq!(*max, MAX_FILTER_BITS);
                assert!(*size > MAX_FILTER_BITS);
            }
            other => panic!("Expected FilterTooLarge, got {other:?}"),
        }
        assert!(err.is_validation());
    }

    #[test]
    fn test_saturated_size_is_rejected() {
        let err = MembershipFilter::with_params(usize::MAX, 1e-300).unwrap_err();
        assert_eq!(
            err,
            FilterError::FilterTooLarge {
                size: usize::MAX,
                max: MAX_FILTER_BITS
            }
        );
    }
}

#[cfg(test)]
mod false_positive_rate_validation_tests {
    use super::*;

    #[test]
    fn test_rate_bounds_are_exclusive() {
        for rate in [0.0, 1.0] {
            let err = MembershipFilter::with_params(1000, rate).unwrap_err();
            assert_eq!(err, FilterError::InvalidFalsePositiveRate { rate });
        }
    }

    #[test]
    fn test_out_of_range_rates_fail() {
        for rate in [-0.1, 1.1, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                FilterConfig::new(1000, rate).validate().is_err(),
                "rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn test_nan_rate_fails() {
        let err = FilterConfig::new(1000, f64::NAN).validate().unwrap_err();
        assert!(matches!(err, FilterError::InvalidFalsePositiveRate { .. }));
    }

    #[test]
    fn test_valid_rates_succeed() {
        for rate in [0.000_001, 0.01, 0.05, 0.5, 0.999] {
            assert!(
                MembershipFilter::with_params(1000, rate).is_ok(),
                "rate {rate} should be accepted"
            );
        }
    }
}

#[cfg(test)]
mod error_classification_tests {
    use super::*;

    #[test]
    fn test_validation_variants() {
        assert!(FilterError::InvalidExpectedItems { value: -1 }.is_validation());
        assert!(FilterError::InvalidFalsePositiveRate { rate: 2.0 }.is_validation());
        assert!(FilterError::FilterTooLarge { size: 10, max: 1 }.is_validation());
        assert!(!FilterError::NotInitialized.is_validation());
        assert!(!FilterError::TaskFailed("cancelled".into()).is_validation());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            FilterError::InvalidExpectedItems { value: -1 }.to_string(),
            "Expected items must be greater than 0, got -1"
        );
        assert_eq!(
            FilterError::NotInitialized.to_string(),
            "Filter has not been initialized"
        );
    }
}
