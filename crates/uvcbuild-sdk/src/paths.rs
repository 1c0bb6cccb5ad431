//! Path resolution helpers.
//!
//! CMake mis-parses install prefixes that contain backslashes, so on hosts
//! with Windows-style separators some of the paths handed to it are rewritten
//! to use forward slashes. The rewrite is gated on an explicit [`PathStyle`]
//! instead of the compile target so it can be exercised on any host.

use std::path::{Path, PathBuf};

use path_absolutize::Absolutize;

use crate::types::BuildError;

/// Path-separator convention of the host the build runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// `/` separators; paths are passed through untouched.
    Posix,
    /// `\` separators; selected paths get rewritten to `/`.
    Windows,
}

impl PathStyle {
    /// Returns the style of the host this binary was compiled for.
    pub fn host() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }
}

/// Rewrites `\` to `/` when `style` is [`PathStyle::Windows`].
pub fn normalize_separators(style: PathStyle, path: &Path) -> PathBuf {
    match style {
        PathStyle::Posix => path.to_path_buf(),
        PathStyle::Windows => PathBuf::from(path.to_string_lossy().replace('\\', "/")),
    }
}

/// Resolves `path` against `cwd` lexically.
///
/// Absolute inputs are returned with `.` and `..` collapsed; relative inputs
/// are joined onto `cwd` first. The filesystem is never consulted, so the
/// target does not need to exist.
pub fn absolute_from(cwd: &Path, path: &Path) -> Result<PathBuf, BuildError> {
    let resolved = path.absolutize_from(cwd).map_err(|e| {
        BuildError::Config(format!(
            "could not resolve {} against {}: {}",
            path.display(),
            cwd.display(),
            e
        ))
    })?;
    Ok(resolved.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posix_style_is_identity() {
        let path = Path::new("C:\\work\\build");
        assert_eq!(normalize_separators(PathStyle::Posix, path), path);
    }

    #[test]
    fn test_windows_style_rewrites_backslashes() {
        let path = Path::new("C:\\work\\build\\include");
        assert_eq!(
            normalize_separators(PathStyle::Windows, path),
            PathBuf::from("C:/work/build/include")
        );
    }

    #[test]
    fn test_windows_style_leaves_forward_slashes() {
        let path = Path::new("C:/already/fine");
        assert_eq!(normalize_separators(PathStyle::Windows, path), path);
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_from_relative() {
        let cwd = Path::new("/work/samples/UVCDriver");
        assert_eq!(
            absolute_from(cwd, Path::new("build")).unwrap(),
            PathBuf::from("/work/samples/UVCDriver/build")
        );
        assert_eq!(
            absolute_from(cwd, Path::new("../../build/include")).unwrap(),
            PathBuf::from("/work/build/include")
        );
        assert_eq!(
            absolute_from(cwd, Path::new("./UVCCamera/./jni")).unwrap(),
            PathBuf::from("/work/samples/UVCDriver/UVCCamera/jni")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_from_absolute_input() {
        let cwd = Path::new("/work");
        assert_eq!(
            absolute_from(cwd, Path::new("/opt/install/../prefix")).unwrap(),
            PathBuf::from("/opt/prefix")
        );
    }
}
