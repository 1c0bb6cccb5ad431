//! Core types for uvcbuild-sdk.
//!
//! - [`BuildError`] - Error types for configuration and build operations
//! - [`Architecture`] - Android ABI selection
//! - [`BuildType`] - CMake build type
//! - [`BuildConfiguration`] - Fully resolved, immutable build settings
//! - [`BuildPhase`] / [`BuildStepResult`] - Outcome of one external invocation

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Error types for uvcbuild-sdk operations.
///
/// Every variant is fatal: the orchestrator never retries and never recovers
/// locally, so all of them map to the same process exit status.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A requested architecture is not one of the supported ABIs.
    #[error("Invalid architecture: {0}")]
    InvalidArchitecture(String),

    /// The CMake generate step exited with a non-zero status.
    #[error("Project generation with cmake failed. (arch {arch}, exit status {code})")]
    Generate { arch: Architecture, code: i32 },

    /// The CMake build+install step exited with a non-zero status.
    #[error("Project build with cmake failed. (arch {arch}, exit status {code})")]
    Build { arch: Architecture, code: i32 },

    /// An external tool could not be started at all.
    #[error("Failed to start {program}: {source}. Ensure it is installed and available on PATH")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error occurred, typically while creating build directories.
    #[error("I/O error: {0}. Check file paths and permissions")]
    Io(#[from] std::io::Error),

    /// Invalid or unusable configuration other than an unknown architecture.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BuildError {
    /// Process exit status to report for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// Target Android ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    ArmeabiV7a,
    Arm64V8a,
    X86,
}

impl Architecture {
    /// Every supported ABI, in the default build order.
    pub const ALL: [Architecture; 3] = [
        Architecture::ArmeabiV7a,
        Architecture::Arm64V8a,
        Architecture::X86,
    ];

    /// Returns the ABI name as used by the NDK and the toolchain file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::ArmeabiV7a => "armeabi-v7a",
            Architecture::Arm64V8a => "arm64-v8a",
            Architecture::X86 => "x86",
        }
    }

    /// Name of the CMake toolchain description file for this ABI.
    pub fn toolchain_file_name(&self) -> String {
        format!("android.toolchain.{}.cmake", self.as_str())
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Architecture {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Architecture::ALL
            .into_iter()
            .find(|arch| arch.as_str() == s)
            .ok_or_else(|| BuildError::InvalidArchitecture(s.to_string()))
    }
}

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildType {
    #[default]
    Release,
    Debug,
}

impl BuildType {
    /// Returns the value passed as `CMAKE_BUILD_TYPE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Release => "Release",
            BuildType::Debug => "Debug",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Release" => Ok(BuildType::Release),
            "Debug" => Ok(BuildType::Debug),
            other => Err(BuildError::Config(format!(
                "invalid build type '{}'. Expected Release or Debug",
                other
            ))),
        }
    }
}

/// Fully resolved build settings.
///
/// Produced once by [`crate::resolve::ConfigurationResolver`] and only ever
/// read afterwards. All paths are absolute. The install, header and external
/// directories have already been through separator normalization; the output
/// and toolchain directories have not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    /// Architectures to build, in order. Duplicates are kept.
    pub architectures: Vec<Architecture>,
    /// `CMAKE_INSTALL_PREFIX`.
    pub install_dir: PathBuf,
    /// Root under which per-architecture build trees are generated.
    pub output_dir: PathBuf,
    pub build_type: BuildType,
    /// Directory containing `Vuforia/Driver/Driver.h`.
    pub header_dir: PathBuf,
    /// Directory containing the libusb, libuvc and libjpeg-turbo build files.
    pub external_dir: PathBuf,
    /// Directory holding `android.toolchain.<arch>.cmake` files.
    pub toolchain_dir: PathBuf,
    /// CMake source root passed to the generate step.
    pub source_dir: PathBuf,
}

/// Platform component of the per-architecture build directory.
pub const PLATFORM: &str = "android";

impl BuildConfiguration {
    /// Build directory for one architecture: `<output>/android/<arch>`.
    pub fn arch_output_dir(&self, arch: Architecture) -> PathBuf {
        self.output_dir.join(PLATFORM).join(arch.as_str())
    }

    /// Toolchain description file for one architecture.
    pub fn toolchain_file(&self, arch: Architecture) -> PathBuf {
        self.toolchain_dir.join(arch.toolchain_file_name())
    }
}

/// Which external step an invocation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    Generate,
    Build,
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildPhase::Generate => f.write_str("generate"),
            BuildPhase::Build => f.write_str("build"),
        }
    }
}

/// Outcome of a single external invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildStepResult {
    pub phase: BuildPhase,
    pub exit_code: i32,
}

impl BuildStepResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Converts a failed step into the matching [`BuildError`].
    pub fn into_result(self, arch: Architecture) -> Result<(), BuildError> {
        if self.success() {
            return Ok(());
        }
        Err(match self.phase {
            BuildPhase::Generate => BuildError::Generate {
                arch,
                code: self.exit_code,
            },
            BuildPhase::Build => BuildError::Build {
                arch,
                code: self.exit_code,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_round_trip_names() {
        assert_eq!("armeabi-v7a".parse::<Architecture>().unwrap(), Architecture::ArmeabiV7a);
        assert_eq!("arm64-v8a".parse::<Architecture>().unwrap(), Architecture::Arm64V8a);
        assert_eq!("x86".parse::<Architecture>().unwrap(), Architecture::X86);
    }

    #[test]
    fn test_architecture_rejects_unknown() {
        for name in ["x86_64", "ARM64-V8A", "", " x86", "mips"] {
            let err = name.parse::<Architecture>().unwrap_err();
            assert!(matches!(err, BuildError::InvalidArchitecture(ref n) if n == name));
        }
    }

    #[test]
    fn test_toolchain_file_name() {
        assert_eq!(
            Architecture::Arm64V8a.toolchain_file_name(),
            "android.toolchain.arm64-v8a.cmake"
        );
    }

    #[test]
    fn test_build_type_parse() {
        assert_eq!("Debug".parse::<BuildType>().unwrap(), BuildType::Debug);
        assert_eq!(BuildType::default(), BuildType::Release);
        assert!("release".parse::<BuildType>().is_err());
    }

    #[test]
    fn test_step_result_maps_phase_to_error() {
        let ok = BuildStepResult { phase: BuildPhase::Build, exit_code: 0 };
        assert!(ok.into_result(Architecture::X86).is_ok());

        let failed = BuildStepResult { phase: BuildPhase::Generate, exit_code: 2 };
        let err = failed.into_result(Architecture::X86).unwrap_err();
        assert!(matches!(err, BuildError::Generate { arch: Architecture::X86, code: 2 }));
        assert!(err.to_string().starts_with("Project generation with cmake failed."));

        let failed = BuildStepResult { phase: BuildPhase::Build, exit_code: 1 };
        let err = failed.into_result(Architecture::Arm64V8a).unwrap_err();
        assert!(err.to_string().starts_with("Project build with cmake failed."));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_arch_paths() {
        let config = BuildConfiguration {
            architectures: vec![Architecture::X86],
            install_dir: PathBuf::from("/work/build"),
            output_dir: PathBuf::from("/work/out"),
            build_type: BuildType::Release,
            header_dir: PathBuf::from("/build/include"),
            external_dir: PathBuf::from("/work/jni"),
            toolchain_dir: PathBuf::from("/work/cmake"),
            source_dir: PathBuf::from("/work"),
        };
        assert_eq!(
            config.arch_output_dir(Architecture::X86),
            PathBuf::from("/work/out/android/x86")
        );
        assert_eq!(
            config.toolchain_file(Architecture::X86),
            PathBuf::from("/work/cmake/android.toolchain.x86.cmake")
        );
    }
}
