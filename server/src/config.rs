use anyhow::{Context, Result};
use platform_db::DatabaseSettings;
use products_hr::drafting::DraftingConfig;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cors_allowed_origins: Vec<String>,
    /// Seed the rosters on `serve` when the employee table is empty.
    pub seed_on_start: bool,
    pub database: DatabaseSettings,
    pub drafting: DraftingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.into()),
        );
        let seed_on_start = std::env::var("SEED_ON_START")
            .ok()
            .map(|val| parse_flag(&val))
            .unwrap_or(true);
        let database = DatabaseSettings::from_env().context("invalid database settings")?;
        let drafting = DraftingConfig::from_env().context("invalid AI drafting settings")?;

        Ok(Self {
            cors_allowed_origins,
            seed_on_start,
            database,
            drafting,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" http://a.test ,, http://b.test "),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn flags_accept_common_truthy_values() {
        assert!(parse_flag("YES"));
        assert!(parse_flag(" 1 "));
        assert!(!parse_flag("off"));
    }
}
