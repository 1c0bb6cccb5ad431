//! Turns raw user options into a [`BuildConfiguration`].
//!
//! Resolution is pure apart from reading the working directory in
//! [`ConfigurationResolver::from_env`] and printing the default-architecture
//! notice. Nothing here touches the filesystem or spawns processes, so an
//! invalid architecture is always reported before any build work starts.

use std::path::{Path, PathBuf};

use crate::paths::{PathStyle, absolute_from, normalize_separators};
use crate::types::{Architecture, BuildConfiguration, BuildError, BuildType};

/// Default comma-separated architecture list.
pub const DEFAULT_ARCHITECTURES: &str = "armeabi-v7a,arm64-v8a,x86";
/// Default install directory, relative to the working directory.
pub const DEFAULT_INSTALL_DIR: &str = "build";
/// Default build-files directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "build";
/// Default directory containing `Vuforia/Driver/Driver.h`.
pub const DEFAULT_HEADER_DIR: &str = "../../build/include";
/// Default location of the libusb/libuvc/libjpeg-turbo build files, following
/// the UVCCamera repository layout.
pub const DEFAULT_EXTERNAL_DIR: &str = "UVCCamera/libuvccamera/src/main/jni";
/// Default toolchain directory, relative to the working directory.
pub const DEFAULT_TOOLCHAIN_DIR: &str = "cmake";

/// Raw, unresolved build options as supplied by the user.
///
/// Paths may be relative. `architectures` is the comma-separated list exactly
/// as typed; an empty string selects every supported ABI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub architectures: String,
    pub install_dir: PathBuf,
    pub output_dir: PathBuf,
    pub build_type: BuildType,
    pub header_dir: PathBuf,
    pub external_dir: PathBuf,
    pub toolchain_dir: PathBuf,
    /// CMake source root. `None` means the working directory.
    pub source_dir: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            architectures: DEFAULT_ARCHITECTURES.to_string(),
            install_dir: PathBuf::from(DEFAULT_INSTALL_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            build_type: BuildType::Release,
            header_dir: PathBuf::from(DEFAULT_HEADER_DIR),
            external_dir: PathBuf::from(DEFAULT_EXTERNAL_DIR),
            toolchain_dir: PathBuf::from(DEFAULT_TOOLCHAIN_DIR),
            source_dir: None,
        }
    }
}

/// Result of parsing an architecture list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchitectureSelection {
    pub architectures: Vec<Architecture>,
    /// True when the input was empty and the default set was substituted.
    pub defaulted: bool,
}

/// Parses a comma-separated architecture list.
///
/// Order and duplicates are preserved. Entries are not trimmed, so
/// `"x86, arm64-v8a"` fails on `" arm64-v8a"`. The first unknown entry is
/// returned as [`BuildError::InvalidArchitecture`].
pub fn parse_architectures(raw: &str) -> Result<ArchitectureSelection, BuildError> {
    if raw.is_empty() {
        return Ok(ArchitectureSelection {
            architectures: Architecture::ALL.to_vec(),
            defaulted: true,
        });
    }

    let architectures = raw
        .split(',')
        .map(str::parse::<Architecture>)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ArchitectureSelection {
        architectures,
        defaulted: false,
    })
}

/// Resolves [`BuildOptions`] against a working directory and path style.
#[derive(Debug, Clone)]
pub struct ConfigurationResolver {
    cwd: PathBuf,
    path_style: PathStyle,
}

impl ConfigurationResolver {
    /// Creates a resolver for an explicit working directory and path style.
    pub fn new(cwd: impl Into<PathBuf>, path_style: PathStyle) -> Self {
        Self {
            cwd: cwd.into(),
            path_style,
        }
    }

    /// Creates a resolver for the process working directory and host style.
    pub fn from_env() -> Result<Self, BuildError> {
        let cwd = std::env::current_dir()?;
        Ok(Self::new(cwd, PathStyle::host()))
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn path_style(&self) -> PathStyle {
        self.path_style
    }

    /// Produces the immutable [`BuildConfiguration`].
    ///
    /// Prints a notice when the default architecture set is substituted.
    pub fn resolve(&self, options: &BuildOptions) -> Result<BuildConfiguration, BuildError> {
        let selection = parse_architectures(&options.architectures)?;
        if selection.defaulted {
            println!(
                "No architectures selected. Using defaults: {}",
                join_architectures(&selection.architectures)
            );
        }

        let install_dir = self.absolute(&options.install_dir)?;
        let output_dir = self.absolute(&options.output_dir)?;
        let header_dir = self.absolute(&options.header_dir)?;
        let external_dir = self.absolute(&options.external_dir)?;
        let toolchain_dir = self.absolute(&options.toolchain_dir)?;
        let source_dir = match &options.source_dir {
            Some(dir) => self.absolute(dir)?,
            None => self.cwd.clone(),
        };

        // Output and toolchain directories keep their native separators.
        let config = BuildConfiguration {
            architectures: selection.architectures,
            install_dir: normalize_separators(self.path_style, &install_dir),
            output_dir,
            build_type: options.build_type,
            header_dir: normalize_separators(self.path_style, &header_dir),
            external_dir: normalize_separators(self.path_style, &external_dir),
            toolchain_dir,
            source_dir,
        };

        log::debug!("resolved build configuration: {:?}", config);
        Ok(config)
    }

    fn absolute(&self, path: &Path) -> Result<PathBuf, BuildError> {
        absolute_from(&self.cwd, path)
    }
}

/// Formats architectures as `a, b, c`.
pub fn join_architectures(architectures: &[Architecture]) -> String {
    architectures
        .iter()
        .map(Architecture::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
