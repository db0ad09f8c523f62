use crate::error::{FilterError, Result};
use crate::filter::{FilterConfig, FilterParams, FilterStats, MembershipFilter};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InitRequest {
    /// Expected number of items
    pub expected_items: i64,
    /// Desired false positive rate
    pub false_positive_rate: f64,
}

impl TryFrom<InitRequest> for FilterConfig {
    type Error = FilterError;

    fn try_from(request: InitRequest) -> Result<Self> {
        let expected_items = usize::try_from(request.expected_items)
            .ok()
            .filter(|&n| n > 0)
            .ok_or(FilterError::InvalidExpectedItems {
                value: request.expected_items,
            })?;

        let config =
            FilterConfig::new(expected_items, request.false_positive_rate);
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemRequest {
    /// Item to add or check
    pub item: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckResponse {
    pub item: String,
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub size: usize,
    pub hash_count: usize,
    pub bits_set: usize,
    pub expected_items: usize,
    pub false_positive_rate: f64,
}

impl From<FilterStats> for StatsResponse {
    fn from(stats: FilterStats) -> Self {
        Self {
            size: stats.size,
            hash_count: stats.hash_count,
            bits_set: stats.bits_set,
            expected_items: stats.expected_items,
            false_positive_rate: stats.false_positive_rate,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

/// Owner of the single current filter.
///
/// The slot starts empty unless built through [`AppState::from_config`] with
/// startup initialization enabled. Replacement happens under the write lock,
/// so no operation ever observes a half-installed filter.
pub struct AppState {
    filter: RwLock<Option<MembershipFilter>>,
    max_filter_bits: usize,
}

impl AppState {
    pub fn new(max_filter_bits: usize) -> Self {
        Self {
            filter: RwLock::new(None),
            max_filter_bits,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let max_filter_bits =
            usize::try_from(config.max_filter_bits).unwrap_or(usize::MAX);
        let filter = if config.init_on_startup {
            Some(Self::build_filter(config.filter_config(), max_filter_bits)?)
        } else {
            None
        };

        Ok(Self {
            filter: RwLock::new(filter),
            max_filter_bits,
        })
    }

    fn build_filter(
        config: FilterConfig,
        max_filter_bits: usize,
    ) -> Result<MembershipFilter> {
        config.validate()?;
        let params = FilterParams::from(&config);
        if params.size > max_filter_bits {
            return Err(FilterError::FilterTooLarge {
                size: params.size,
                max: max_filter_bits,
            });
        }
        MembershipFilter::new(config)
    }

    /// Replaces the current filter with a fresh one built from `config`.
    ///
    /// The bit array is allocated on the blocking pool; the lock is only
    /// taken for the swap.
    pub async fn init(&self, config: FilterConfig) -> Result<FilterStats> {
        let max_filter_bits = self.max_filter_bits;
        let filter = tokio::task::spawn_blocking(move || {
            Self::build_filter(config, max_filter_bits)
        })
        .await
        .map_err(|e| FilterError::TaskFailed(e.to_string()))??;
        let stats = filter.stats();

        *self.filter.write().await = Some(filter);
        info!(
            size = stats.size,
            hash_count = stats.hash_count,
            expected_items = stats.expected_items,
            false_positive_rate = stats.false_positive_rate,
            "filter initialized"
        );
        Ok(stats)
    }

    pub async fn add(&self, item: &[u8]) -> Result<()> {
        let mut guard = self.filter.write().await;
        let filter = guard.as_mut().ok_or(FilterError::NotInitialized)?;
        filter.insert(item);
        Ok(())
    }

    pub async fn check(&self, item: &[u8]) -> Result<bool> {
        let guard = self.filter.read().await;
        let filter = guard.as_ref().ok_or(FilterError::NotInitialized)?;
        Ok(filter.contains(item))
    }

    pub async fn stats(&self) -> Result<FilterStats> {
        let guard = self.filter.read().await;
        let filter = guard.as_ref().ok_or(FilterError::NotInitialized)?;
        Ok(filter.stats())
    }

    pub async fn is_initialized(&self) -> bool {
        self.filter.read().await.is_some()
    }

    pub fn max_filter_bits(&self) -> usize {
        self.max_filter_bits
    }
}

#[derive(Builder, Clone, Debug)]
#[builder(pattern = "owned")]
pub struct ServerConfig {
    #[builder(default = "\"0.0.0.0\".to_string()")]
    pub server_host: String,
    #[builder(default = "8000")]
    pub server_port: u16,
    #[builder(default = "10000")]
    pub bloom_expected_items: usize,
    #[builder(default = "0.01")]
    pub bloom_false_positive_rate: f64,
    #[builder(default = "1 << 32")]
    pub max_filter_bits: u64,
    #[builder(default = "true")]
    pub init_on_startup: bool,
}

fn env_or<T, F>(lookup: &F, var_name: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(var_name).unwrap_or_else(|| default.to_string());
    value.parse().map_err(|e: T::Err| FilterError::EnvParseError {
        var_name: var_name.to_string(),
        value: value.clone(),
        error: e.to_string(),
    })
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server_host: env_or(&lookup, "SERVER_HOST", "0.0.0.0")?,
            server_port: env_or(&lookup, "SERVER_PORT", "8000")?,
            bloom_expected_items: env_or(
                &lookup,
                "BLOOM_FILTER_EXPECTED_ITEMS",
                "10000",
            )?,
            bloom_false_positive_rate: env_or(
                &lookup,
                "BLOOM_FILTER_FALSE_POSITIVE_RATE",
                "0.01",
            )?,
            max_filter_bits: env_or(
                &lookup,
                "BLOOM_FILTER_MAX_BITS",
                "4294967296",
            )?,
            init_on_startup: env_or(
                &lookup,
                "BLOOM_FILTER_INIT_ON_STARTUP",
                "true",
            )?,
        })
    }

    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig::new(
            self.bloom_expected_items,
            self.bloom_false_positive_rate,
        )
    }
}
