//! Build automation for the native driver.
//!
//! ## Overview
//!
//! [`CMakeBuilder`] runs two CMake steps per Android ABI:
//!
//! 1. **Generate** - `cmake -G Ninja ...` in `<output>/android/<abi>` with the
//!    ABI's toolchain file, install prefix and dependency directories
//! 2. **Build** - `cmake --build . --target install` in the same directory
//!
//! The first failing step aborts the whole run.
//!
//! ## Common Utilities
//!
//! The `common` module provides the [`CommandRunner`] seam used to execute
//! [`Invocation`]s, with a process-spawning [`SystemRunner`] and a printing
//! [`DryRunRunner`].
//!
//! ## Example
//!
//! ```ignore
//! use uvcbuild_sdk::builders::CMakeBuilder;
//! use uvcbuild_sdk::{BuildOptions, ConfigurationResolver};
//!
//! let config = ConfigurationResolver::from_env()?.resolve(&BuildOptions::default())?;
//! CMakeBuilder::new(&config).verbose(true).build()?;
//! # Ok::<(), uvcbuild_sdk::BuildError>(())
//! ```

pub mod cmake;
pub mod common;

// Re-export builders
pub use cmake::{BuildReport, BuildState, CMakeBuilder};
pub use common::{CommandRunner, DryRunRunner, Invocation, SystemRunner};
