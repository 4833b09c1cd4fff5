//! Configuration loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "FINWISE_";

const PROJECT_FILES: [&str; 2] = ["finwise.toml", ".finwise.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./finwise.toml` or `./.finwise.toml`
    /// 3. Global config: `$XDG_CONFIG_HOME/finwise/config.toml`
    /// 4. `FINWISE_*` environment variables (`FINWISE_PROVIDER__DEFAULT=gemini`)
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path, true).extract().map_err(Box::new)
    }

    /// Defaults plus environment only (for --no-config)
    pub fn load_without_files() -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(None, false).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&Path>, include_files: bool) -> Figment {
        let mut figment = Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        if !include_files {
            return figment;
        }

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        // Explicit config path (highest priority)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("finwise").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<7}] Explicit: {}", mark, path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND  ] Project:  {}", path.display()),
            None => println!("  [       ] Project:  ./finwise.toml or ./.finwise.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            println!("  [{:<7}] Global:   {}", mark, path.display());
        }

        let env_count = std::env::vars()
            .filter(|(k, _)| k.starts_with(ENV_PREFIX))
            .count();
        let mark = if env_count > 0 { "FOUND" } else { "" };
        println!("  [{:<7}] Env:      {}* ({} set)", mark, ENV_PREFIX, env_count);

        println!("  [       ] Default:  built-in defaults");
    }
}
