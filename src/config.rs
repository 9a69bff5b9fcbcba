//! Run settings.
//!
//! Resolution order: `.env` file, then process environment, then CLI flags.
//! The resolved `Settings` value is passed explicitly into every operation.

use std::path::PathBuf;

use crate::cli::GlobalArgs;

pub const ENV_DB: &str = "TRENDS_DB";
pub const ENV_OUT_DIR: &str = "TRENDS_OUT_DIR";
pub const ENV_GEO: &str = "TRENDS_GEO";
pub const ENV_HL: &str = "TRENDS_HL";
pub const ENV_TZ: &str = "TRENDS_TZ";

const DEFAULT_GEO: &str = "VN";
const DEFAULT_HL: &str = "en-US";
const DEFAULT_TZ: i32 = 420;

/// Fixed query parameters sent with every provider request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Country code.
    pub geo: String,
    /// Host language.
    pub hl: String,
    /// Timezone offset in minutes.
    pub tz: i32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            geo: DEFAULT_GEO.to_string(),
            hl: DEFAULT_HL.to_string(),
            tz: DEFAULT_TZ,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// SQLite database file. `None` means "ask at startup".
    pub db_path: Option<PathBuf>,
    /// Directory receiving all exports.
    pub out_dir: PathBuf,
    pub provider: ProviderSettings,
}

impl Settings {
    /// Load `.env`, read the environment, and apply CLI overrides.
    pub fn resolve(args: &GlobalArgs) -> Self {
        dotenvy::dotenv().ok();
        let mut settings = Self::from_lookup(|key| std::env::var(key).ok());
        if let Some(db) = &args.db {
            settings.db_path = Some(db.clone());
        }
        if let Some(dir) = &args.out_dir {
            settings.out_dir = dir.clone();
        }
        settings
    }

    /// Build settings from an arbitrary key lookup (the environment, in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut provider = ProviderSettings::default();
        if let Some(geo) = non_empty(ENV_GEO) {
            provider.geo = geo;
        }
        if let Some(hl) = non_empty(ENV_HL) {
            provider.hl = hl;
        }
        if let Some(tz) = non_empty(ENV_TZ) {
            match tz.parse::<i32>() {
                Ok(v) => provider.tz = v,
                Err(_) => log::warn!("Ignoring invalid {ENV_TZ}='{tz}', using {DEFAULT_TZ}"),
            }
        }

        Self {
            db_path: non_empty(ENV_DB).map(PathBuf::from),
            out_dir: non_empty(ENV_OUT_DIR).map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
            provider,
        }
    }

    /// Path of an export file inside the output directory.
    pub fn out_path(&self, file_name: &str) -> PathBuf {
        self.out_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_when_environment_is_empty() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.db_path, None);
        assert_eq!(settings.out_dir, PathBuf::from("."));
        assert_eq!(settings.provider, ProviderSettings::default());
        assert_eq!(settings.provider.geo, "VN");
        assert_eq!(settings.provider.tz, 420);
    }

    #[test]
    fn environment_overrides_and_bad_tz_falls_back() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DB, "trends.db"),
            (ENV_OUT_DIR, "reports"),
            (ENV_GEO, "US"),
            (ENV_TZ, "not-a-number"),
            (ENV_HL, "  "),
        ]);
        let settings = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(settings.db_path, Some(PathBuf::from("trends.db")));
        assert_eq!(settings.out_path("a.csv"), PathBuf::from("reports").join("a.csv"));
        assert_eq!(settings.provider.geo, "US");
        assert_eq!(settings.provider.hl, "en-US");
        assert_eq!(settings.provider.tz, 420);
    }
}
