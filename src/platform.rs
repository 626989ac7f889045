//! Host-dependent behaviour: what counts as executable, which extension a
//! wrapper gets and how its permission bits are set.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::environment::EnvironmentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformFamily {
    Posix,
    Windows,
}

impl fmt::Display for PlatformFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFamily::Posix => f.write_str("posix"),
            PlatformFamily::Windows => f.write_str("windows"),
        }
    }
}

pub trait Platform {
    fn family(&self) -> PlatformFamily;

    /// Regular file that this platform would run directly.
    fn is_executable(&self, path: &Path) -> bool;

    fn wrapper_extension(&self) -> &'static str;

    /// Name the wrapper for `path` is written under, without extension.
    /// `None` when the name is empty or not valid UTF-8.
    fn base_name(&self, path: &Path) -> Option<String>;

    /// Whether two wrapper names land on the same file.
    fn same_name(&self, a: &str, b: &str) -> bool;

    fn mark_executable(&self, path: &Path) -> io::Result<()>;

    fn supports(&self, kind: EnvironmentKind) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Posix;

#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

#[cfg(not(windows))]
pub type Native = Posix;
#[cfg(windows)]
pub type Native = Windows;

const WINDOWS_EXECUTABLE_EXTENSIONS: [&str; 4] = ["exe", "bat", "cmd", "com"];

impl Platform for Posix {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::Posix
    }

    #[cfg(unix)]
    fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path)
            .map(|meta| meta.is_file() && meta.permissions().mode() & 0o100 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_executable(&self, _path: &Path) -> bool {
        false
    }

    fn wrapper_extension(&self) -> &'static str {
        ""
    }

    fn base_name(&self, path: &Path) -> Option<String> {
        path.file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    }

    // macOS volumes are case-insensitive by default.
    fn same_name(&self, a: &str, b: &str) -> bool {
        if cfg!(target_os = "macos") {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }

    #[cfg(unix)]
    fn mark_executable(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o755))
    }

    #[cfg(not(unix))]
    fn mark_executable(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn supports(&self, _kind: EnvironmentKind) -> bool {
        true
    }
}

impl Platform for Windows {
    fn family(&self) -> PlatformFamily {
        PlatformFamily::Windows
    }

    fn is_executable(&self, path: &Path) -> bool {
        let has_exec_ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .map(|ext| WINDOWS_EXECUTABLE_EXTENSIONS.contains(&ext.as_str()))
            .unwrap_or(false);
        has_exec_ext && fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
    }

    fn wrapper_extension(&self) -> &'static str {
        ".bat"
    }

    fn base_name(&self, path: &Path) -> Option<String> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
    }

    fn same_name(&self, a: &str, b: &str) -> bool {
        a.eq_ignore_ascii_case(b)
    }

    fn mark_executable(&self, _path: &Path) -> io::Result<()> {
        // The .bat extension is what makes it runnable.
        Ok(())
    }

    fn supports(&self, kind: EnvironmentKind) -> bool {
        kind != EnvironmentKind::Schroot
    }
}
