use serde::Deserialize;

/// Root engine configuration. Loaded from environment variables with the
/// prefix `ADS_ENGINE__`, e.g. `ADS_ENGINE__HISTORY__SORT=descending`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub conversions: ConversionsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Which filter reduces the raw interaction log on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryFilterKind {
    /// One canonical viewed/clicked/dismissed record per ad impression.
    #[default]
    Confirmation,
    None,
}

/// Ordering applied to a collection before it is handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
    /// Keep input order.
    None,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryConfig {
    #[serde(default)]
    pub filter: HistoryFilterKind,
    #[serde(default = "default_history_sort")]
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversionsConfig {
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_supported_version")]
    pub supported_version: u32,
}

// Default functions
fn default_history_sort() -> SortOrder {
    SortOrder::Descending
}
fn default_supported_version() -> u32 {
    1
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            filter: HistoryFilterKind::default(),
            sort: default_history_sort(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            supported_version: default_supported_version(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_prefix("ADS_ENGINE")
    }

    pub fn load_with_prefix(prefix: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix(prefix)
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
