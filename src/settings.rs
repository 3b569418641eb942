use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

const DEFAULT_API_BASE: &str = "https://connect.craft.do/links/pEuFum8B8X/api/v1";
const DEFAULT_COLLECTION_ID: &str = "98E866EA-AE41-4560-9F38-D22495346770";
const DEFAULT_CACHE_PATH: &str = "data/portfolio.sqlite";
const DEFAULT_CACHE_TTL_HOURS: i64 = 24;

/// Runtime settings, overridable with `PORTFOLIO_*` environment variables
/// (e.g. `PORTFOLIO_CACHE_TTL_HOURS=1`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_base: String,
    pub collection_id: String,
    pub cache_path: String,
    pub cache_ttl_hours: i64,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_config(Config::builder().add_source(Environment::with_prefix("PORTFOLIO")))
    }

    fn from_config(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .set_default("api_base", DEFAULT_API_BASE)?
            .set_default("collection_id", DEFAULT_COLLECTION_ID)?
            .set_default("cache_path", DEFAULT_CACHE_PATH)?
            .set_default("cache_ttl_hours", DEFAULT_CACHE_TTL_HOURS)?
            .build()
            .context("Failed to build settings")?
            .try_deserialize::<Settings>()
            .context("Failed to parse settings")
            .and_then(|settings| {
                settings.cache_ttl()?;
                Ok(settings)
            })
    }

    pub fn items_url(&self) -> String {
        format!(
            "{}/collections/{}/items",
            self.api_base.trim_end_matches('/'),
            self.collection_id
        )
    }

    pub fn cache_ttl(&self) -> Result<chrono::Duration> {
        chrono::Duration::try_hours(self.cache_ttl_hours)
            .with_context(|| format!("cache_ttl_hours out of range: {}", self.cache_ttl_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let s = Settings::from_config(Config::builder()).unwrap();
        assert_eq!(s.cache_path, DEFAULT_CACHE_PATH);
        assert_eq!(s.cache_ttl().unwrap(), chrono::Duration::hours(24));
        assert_eq!(
            s.items_url(),
            "https://connect.craft.do/links/pEuFum8B8X/api/v1/collections/98E866EA-AE41-4560-9F38-D22495346770/items"
        );
    }

    #[test]
    fn overrides_win() {
        let builder = Config::builder()
            .set_override("api_base", "http://localhost:8080/api/")
            .unwrap()
            .set_override("cache_ttl_hours", 2)
            .unwrap();
        let s = Settings::from_config(builder).unwrap();
        assert_eq!(s.cache_ttl_hours, 2);
        assert!(s.items_url().starts_with("http://localhost:8080/api/collections/"));
    }

    #[test]
    fn oversized_ttl_is_rejected() {
        let builder = Config::builder()
            .set_override("cache_ttl_hours", i64::MAX)
            .unwrap();
        let err = Settings::from_config(builder).unwrap_err();
        assert!(err.to_string().contains("cache_ttl_hours out of range"));
    }
}
