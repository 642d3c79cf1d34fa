//! Process-wide settings.
//!
//! Currently this only selects the CRC preset used by [`CrcEngine::default`]
//! and [`Checksummed::with_default_crc`](crate::stream::Checksummed::with_default_crc).
//! Values come from the built-in default, then the `BITCRC_CRC_PRESET`
//! environment variable, then `./bitcrc.toml` and `./bitcrc_config.toml`
//! (later sources win).
//!
//! [`CrcEngine::default`]: crate::crc::CrcEngine

use lazy_static::lazy_static;
use parking_lot::RwLock;
use std::env;
use std::fs;
use std::path::Path;

use crate::crc::CrcPreset;

lazy_static! {
    static ref CONFIG: RwLock<Config> = RwLock::new(Config::new());
}

/// Environment variable naming the default CRC preset
pub const CRC_PRESET_ENV: &str = "BITCRC_CRC_PRESET";

/// Configuration files consulted, in order
pub const CONFIG_PATHS: [&str; 2] = ["./bitcrc.toml", "./bitcrc_config.toml"];

const DEFAULT_CRC_PRESET: CrcPreset = CrcPreset::Crc32Iso;

/// Crate settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Preset used when no CRC parameters are given explicitly
    pub crc_preset: CrcPreset,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            crc_preset: DEFAULT_CRC_PRESET,
        }
    }
}

impl Config {
    fn new() -> Self {
        let env_value = env::var(CRC_PRESET_ENV).ok();
        Self::load_from(env_value.as_deref(), &CONFIG_PATHS)
    }

    /// Builds a configuration from an optional environment value and a list of
    /// candidate files. Missing files are skipped; unparsable values are
    /// logged and ignored.
    pub fn load_from<P: AsRef<Path>>(env_value: Option<&str>, paths: &[P]) -> Self {
        let mut config = Config::default();

        if let Some(value) = env_value {
            config.apply_preset(value, CRC_PRESET_ENV);
        }

        for path in paths {
            let path = path.as_ref();
            let Ok(content) = fs::read_to_string(path) else {
                continue;
            };
            if let Some(line) = content
                .lines()
                .map(str::trim)
                .find(|line| line.starts_with("crc_preset"))
            {
                if let Some(value) = line.split('=').nth(1) {
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if !value.is_empty() {
                        config.apply_preset(value, &path.display().to_string());
                    }
                }
            }
        }

        log::debug!("loaded config: crc_preset={}", config.crc_preset);
        config
    }

    fn apply_preset(&mut self, value: &str, source: &str) {
        match value.parse::<CrcPreset>() {
            Ok(preset) => self.crc_preset = preset,
            Err(e) => log::warn!("ignoring crc preset from {}: {}", source, e),
        }
    }

    /// Re-reads the environment and configuration files.
    pub fn reload() {
        *CONFIG.write() = Config::new();
    }

    /// Snapshot of the current settings
    pub fn current() -> Config {
        CONFIG.read().clone()
    }
}

/// Returns the configured default CRC preset
pub fn get_crc_preset() -> CrcPreset {
    CONFIG.read().crc_preset
}

/// Overrides the default CRC preset for the rest of the process
pub fn set_crc_preset(preset: CrcPreset) {
    CONFIG.write().crc_preset = preset;
}

/// Creates a default config template file if it doesn't exist
pub fn create_default_config_template<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
    if !path.as_ref().exists() {
        let template = r#"# bitcrc configuration
# This is a template. Replace the values with your actual configuration.

# Default CRC preset: crc8-smbus, crc16-ccitt, crc16-x25, crc32-iso, crc32-mpeg2, crc64-xz
crc_preset = "crc32-iso"
"#;
        fs::write(path, template)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::CrcEngine;
    use crate::stream::Checksummed;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn scratch_file(name: &str) -> PathBuf {
        env::temp_dir().join(format!("bitcrc-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = Config::load_from::<&str>(None, &[]);
        assert_eq!(config, Config::default());
        assert_eq!(config.crc_preset, CrcPreset::Crc32Iso);
    }

    #[test]
    fn test_env_value_applies() {
        let config = Config::load_from::<&str>(Some("crc16-x25"), &[]);
        assert_eq!(config.crc_preset, CrcPreset::Crc16X25);

        let config = Config::load_from::<&str>(Some("not-a-crc"), &[]);
        assert_eq!(config.crc_preset, CrcPreset::Crc32Iso);
    }

    #[test]
    fn test_file_overrides_env() {
        let path = scratch_file("override.toml");
        fs::write(&path, "# comment\ncrc_preset = 'crc64-xz'\n").unwrap();
        let missing = scratch_file("missing.toml");

        let config = Config::load_from(Some("crc16-ccitt"), &[missing, path.clone()]);
        assert_eq!(config.crc_preset, CrcPreset::Crc64Xz);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_template_is_loadable() {
        let path = scratch_file("template.toml");
        let _ = fs::remove_file(&path);
        create_default_config_template(&path).unwrap();
        let config = Config::load_from::<&Path>(None, &[path.as_path()]);
        assert_eq!(config.crc_preset, CrcPreset::Crc32Iso);

        // an existing file is left alone
        fs::write(&path, "crc_preset = \"crc8-smbus\"\n").unwrap();
        create_default_config_template(&path).unwrap();

        let config = Config::load_from::<&Path>(None, &[path.as_path()]);
        assert_eq!(config.crc_preset, CrcPreset::Crc8Smbus);

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_set_and_get_preset() {
        let previous = get_crc_preset();
        set_crc_preset(CrcPreset::Crc16Ccitt);
        assert_eq!(get_crc_preset(), CrcPreset::Crc16Ccitt);
        assert_eq!(Config::current().crc_preset, CrcPreset::Crc16Ccitt);

        // engines built without explicit parameters follow the configured preset
        assert_eq!(CrcEngine::default().params(), &CrcPreset::Crc16Ccitt.params());
        let channel = Checksummed::with_default_crc(Vec::<u8>::new());
        assert_eq!(channel.crc().params(), &CrcPreset::Crc16Ccitt.params());

        set_crc_preset(CrcPreset::Crc64Xz);
        let mut crc = CrcEngine::default();
        crc.update(b"123456789");
        assert_eq!(crc.get(), CrcPreset::Crc64Xz.check());

        set_crc_preset(previous);
    }
}
