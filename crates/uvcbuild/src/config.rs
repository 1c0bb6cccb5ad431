//! Configuration file support for uvcbuild.
//!
//! A `uvcbuild.toml` file lets a checkout pin its build settings instead of
//! repeating CLI flags.
//!
//! ## Configuration File Location
//!
//! Unless `--config` names a file explicitly, the file is searched for in:
//! 1. Current working directory (`./uvcbuild.toml`)
//! 2. Parent directories (up to the repository root or filesystem root)
//!
//! Relative paths inside the file are resolved against the directory that
//! contains it, so a file found in a parent directory still points at the
//! same locations.
//!
//! ## Example Configuration
//!
//! ```toml
//! [build]
//! arch = ["arm64-v8a", "x86"]
//! install = "build"
//! output = "build"
//! build_type = "Debug"
//! vuforia_header_dir = "../../build/include"
//! uvc_external_dir = "UVCCamera/libuvccamera/src/main/jni"
//! toolchain_dir = "cmake"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The default configuration file name.
pub const CONFIG_FILE_NAME: &str = "uvcbuild.toml";

/// Root configuration structure for `uvcbuild.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UvcBuildConfig {
    /// Build settings. Every key is optional; CLI flags override them.
    pub build: BuildSection,
}

/// `[build]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// Architectures to build. An empty list selects every supported ABI.
    pub arch: Option<Vec<String>>,

    /// Install directory (`CMAKE_INSTALL_PREFIX`).
    pub install: Option<PathBuf>,

    /// Location of generated build files.
    pub output: Option<PathBuf>,

    /// `Release` or `Debug`.
    pub build_type: Option<String>,

    /// Directory that contains `Vuforia/Driver/Driver.h`.
    pub vuforia_header_dir: Option<PathBuf>,

    /// Directory containing libusb, libuvc and libjpeg-turbo build files.
    pub uvc_external_dir: Option<PathBuf>,

    /// Directory with the `android.toolchain.<abi>.cmake` files.
    pub toolchain_dir: Option<PathBuf>,

    /// CMake source root.
    pub source_dir: Option<PathBuf>,
}

impl UvcBuildConfig {
    /// Loads configuration from the specified file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: UvcBuildConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Attempts to find and load configuration starting from the current
    /// directory.
    pub fn discover() -> Result<Option<(Self, PathBuf)>> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&cwd)
    }

    /// Attempts to find and load configuration starting from the specified
    /// directory and walking up.
    ///
    /// # Returns
    ///
    /// * `Ok(Some((config, path)))` - Found and loaded configuration with its path
    /// * `Ok(None)` - No configuration file found
    /// * `Err` - If a config file was found but couldn't be parsed
    pub fn discover_from(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.is_file() {
                let config = Self::load_from_file(&config_path)?;
                return Ok(Some((config, config_path)));
            }

            // Stop at repository root or filesystem root
            if current.join(".git").exists() || !current.pop() {
                break;
            }
        }

        Ok(None)
    }
}

/// Configuration resolver that merges config file values with CLI arguments.
///
/// CLI arguments always take precedence over config file values.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    /// Loaded configuration, if any.
    pub config: Option<UvcBuildConfig>,

    /// Path to the loaded config file, if any.
    pub config_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Creates a resolver by discovering configuration from the current
    /// directory upwards.
    pub fn new() -> Result<Self> {
        Ok(match UvcBuildConfig::discover()? {
            Some((config, path)) => Self {
                config: Some(config),
                config_path: Some(path),
            },
            None => Self::default(),
        })
    }

    /// Creates a resolver from an explicitly named config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let config = UvcBuildConfig::load_from_file(path)?;
        Ok(Self {
            config: Some(config),
            config_path: Some(path.to_path_buf()),
        })
    }

    fn build(&self) -> Option<&BuildSection> {
        self.config.as_ref().map(|c| &c.build)
    }

    /// Architecture list from config, joined with commas.
    pub fn arch(&self) -> Option<String> {
        self.build()
            .and_then(|b| b.arch.as_ref())
            .map(|archs| archs.join(","))
    }

    pub fn build_type(&self) -> Option<&str> {
        self.build().and_then(|b| b.build_type.as_deref())
    }

    pub fn install(&self) -> Option<PathBuf> {
        self.path(|b| b.install.as_deref())
    }

    pub fn output(&self) -> Option<PathBuf> {
        self.path(|b| b.output.as_deref())
    }

    pub fn vuforia_header_dir(&self) -> Option<PathBuf> {
        self.path(|b| b.vuforia_header_dir.as_deref())
    }

    pub fn uvc_external_dir(&self) -> Option<PathBuf> {
        self.path(|b| b.uvc_external_dir.as_deref())
    }

    pub fn toolchain_dir(&self) -> Option<PathBuf> {
        self.path(|b| b.toolchain_dir.as_deref())
    }

    pub fn source_dir(&self) -> Option<PathBuf> {
        self.path(|b| b.source_dir.as_deref())
    }

    /// Reads a path from config, anchoring relative values at the config
    /// file's directory.
    fn path<F>(&self, getter: F) -> Option<PathBuf>
    where
        F: FnOnce(&BuildSection) -> Option<&Path>,
    {
        let value = self.build().and_then(getter)?;
        let base = self.config_path.as_deref().and_then(Path::parent);
        Some(match base {
            Some(dir) => dir.join(value),
            None => value.to_path_buf(),
        })
    }

    /// Resolves a CLI value, using config as fallback.
    ///
    /// The resolved value prefers CLI over config over `default`.
    pub fn resolve<T, F>(&self, cli_value: Option<T>, config_getter: F, default: T) -> T
    where
        F: FnOnce(&Self) -> Option<T>,
    {
        cli_value
            .or_else(|| config_getter(self))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = UvcBuildConfig::default();
        assert_eq!(config.build, BuildSection::default());
        assert!(config.build.arch.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);

        let toml_content = r#"
[build]
arch = ["arm64-v8a", "x86"]
install = "/opt/uvc"
build_type = "Debug"
uvc_external_dir = "third_party/jni"
"#;
        std::fs::write(&config_path, toml_content).unwrap();

        let config = UvcBuildConfig::load_from_file(&config_path).unwrap();
        assert_eq!(
            config.build.arch,
            Some(vec!["arm64-v8a".to_string(), "x86".to_string()])
        );
        assert_eq!(config.build.install, Some(PathBuf::from("/opt/uvc")));
        assert_eq!(config.build.build_type.as_deref(), Some("Debug"));
        assert!(config.build.output.is_none());
    }

    #[test]
    fn test_load_rejects_unknown_types() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[build]\narch = \"x86\"\n").unwrap();

        let err = UvcBuildConfig::load_from_file(&config_path).unwrap_err();
        assert!(format!("{}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_discover_config() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[build]\nbuild_type = \"Debug\"\n",
        )
        .unwrap();
        let nested = temp_dir.path().join("samples").join("UVCDriver");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = UvcBuildConfig::discover_from(&nested).unwrap().unwrap();
        assert_eq!(config.build.build_type.as_deref(), Some("Debug"));
        assert_eq!(path, temp_dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_discover_no_config() {
        let temp_dir = TempDir::new().unwrap();
        // Create a .git directory to stop the search
        std::fs::create_dir(temp_dir.path().join(".git")).unwrap();

        let result = UvcBuildConfig::discover_from(temp_dir.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_config_resolver_precedence() {
        let resolver = ConfigResolver {
            config: Some(UvcBuildConfig {
                build: BuildSection {
                    arch: Some(vec!["x86".to_string()]),
                    build_type: Some("Debug".to_string()),
                    ..BuildSection::default()
                },
            }),
            config_path: None,
        };

        // CLI value takes precedence
        let arch = resolver.resolve(Some("arm64-v8a".to_string()), |r| r.arch(), String::new());
        assert_eq!(arch, "arm64-v8a");

        // Config value used when CLI is None
        let arch = resolver.resolve(None, |r| r.arch(), String::new());
        assert_eq!(arch, "x86");

        // Default used when neither is set
        let output = resolver.resolve(None, |r| r.output(), PathBuf::from("build"));
        assert_eq!(output, PathBuf::from("build"));
    }

    #[test]
    fn test_empty_arch_list_joins_to_empty_string() {
        let resolver = ConfigResolver {
            config: Some(UvcBuildConfig {
                build: BuildSection {
                    arch: Some(Vec::new()),
                    ..BuildSection::default()
                },
            }),
            config_path: None,
        };
        assert_eq!(resolver.arch().as_deref(), Some(""));
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_paths_anchor_at_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            "[build]\noutput = \"out\"\ninstall = \"/abs/prefix\"\n",
        )
        .unwrap();

        let resolver = ConfigResolver::from_path(&config_path).unwrap();
        assert_eq!(resolver.output(), Some(temp_dir.path().join("out")));
        assert_eq!(resolver.install(), Some(PathBuf::from("/abs/prefix")));
        assert!(resolver.toolchain_dir().is_none());
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = ConfigResolver::from_path(Path::new("/nonexistent/uvcbuild.toml")).unwrap_err();
        assert!(format!("{}", err).contains("Failed to read config file"));
    }
}
