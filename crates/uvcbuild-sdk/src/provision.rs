//! Build directory provisioning.
//!
//! The output root is created once before the first architecture; each
//! `android/<arch>` directory is created right before that architecture is
//! generated, so an aborted run leaves no directories for the architectures
//! it never reached.

use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Architecture, BuildError, PLATFORM};

/// Ensures the output root exists, creating it and any missing parents.
pub fn provision_output_root(output_root: &Path) -> Result<(), BuildError> {
    ensure_dir(output_root)
}

/// Ensures `<output_root>/android/<arch>` exists and returns it.
pub fn provision_arch_dir(output_root: &Path, arch: Architecture) -> Result<PathBuf, BuildError> {
    let dir = output_root.join(PLATFORM).join(arch.as_str());
    ensure_dir(&dir)?;
    Ok(dir)
}

fn ensure_dir(dir: &Path) -> Result<(), BuildError> {
    if dir.is_dir() {
        return Ok(());
    }
    log::debug!("creating directory {}", dir.display());
    fs::create_dir_all(dir)?;
    Ok(())
}
