//! # uvcbuild-sdk
//!
//! Library behind the `uvcbuild` CLI. It builds the UVC sample driver for
//! every requested Android ABI by running CMake twice per ABI, once to
//! generate a Ninja build tree and once to build and install it.
//!
//! ## Modules
//!
//! - [`types`] - Architectures, build types, the resolved configuration and errors
//! - [`resolve`] - Turns raw options into a validated [`BuildConfiguration`]
//! - [`paths`] - Absolute path resolution and separator normalization
//! - [`provision`] - Creation of the per-ABI build directories
//! - [`builders`] - The per-ABI CMake runner
//!
//! ## Output Layout
//!
//! ```text
//! <output>/
//! └── android/
//!     ├── armeabi-v7a/   # Ninja build tree
//!     ├── arm64-v8a/
//!     └── x86/
//! ```

pub mod builders;
pub mod paths;
pub mod provision;
pub mod resolve;
pub mod types;

// Re-export key types for convenience
pub use builders::{BuildReport, CMakeBuilder, CommandRunner, Invocation};
pub use paths::PathStyle;
pub use resolve::{BuildOptions, ConfigurationResolver, parse_architectures};
pub use types::{
    Architecture, BuildConfiguration, BuildError, BuildPhase, BuildStepResult, BuildType,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
