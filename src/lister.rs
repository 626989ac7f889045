use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WrapperError};
use crate::platform::Platform;

/// Executable regular files directly inside `dir`, as absolute paths sorted
/// ascending. Subdirectories are not visited.
pub fn list_executable_files(dir: &Path, platform: &impl Platform) -> Result<Vec<PathBuf>> {
    let dir = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        env::current_dir()
            .map_err(|err| WrapperError::fs("resolve current directory for", dir, err))?
            .join(dir)
    };
    let entries = fs::read_dir(&dir).map_err(|err| WrapperError::fs("read directory", &dir, err))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| WrapperError::fs("read directory", &dir, err))?;
        let path = entry.path();
        if platform.is_executable(&path) {
            files.push(path);
        }
    }
    files.sort();
    log::debug!("found {} executables in {}", files.len(), dir.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Windows;
    use tempfile::tempdir;

    #[cfg(unix)]
    fn create_executable(path: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "").unwrap();
        let mode = fs::metadata(path).unwrap().permissions().mode();
        fs::set_permissions(path, fs::Permissions::from_mode(mode | 0o100)).unwrap();
        path.to_path_buf()
    }

    #[cfg(unix)]
    #[test]
    fn only_executables_are_listed() {
        use crate::platform::Posix;
        let dir = tempdir().unwrap();
        let executable = create_executable(&dir.path().join("executable_filename"));
        fs::write(dir.path().join("non_executable"), "").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        create_executable(&dir.path().join("subdir").join("nested"));

        let files = list_executable_files(dir.path(), &Posix).unwrap();
        assert_eq!(files, vec![executable]);
    }

    #[cfg(unix)]
    #[test]
    fn listing_is_sorted() {
        use crate::platform::Posix;
        let dir = tempdir().unwrap();
        let third = create_executable(&dir.path().join("z_executable"));
        let first = create_executable(&dir.path().join("1_executable"));
        let second = create_executable(&dir.path().join("j_executable"));

        let files = list_executable_files(dir.path(), &Posix).unwrap();
        assert_eq!(files, vec![first, second, third]);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlinks_are_skipped() {
        use crate::platform::Posix;
        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("link")).unwrap();
        let python = create_executable(&dir.path().join("python"));

        let files = list_executable_files(dir.path(), &Posix).unwrap();
        assert_eq!(files, vec![python]);
    }

    #[test]
    fn windows_policy_lists_by_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("python.exe"), "").unwrap();
        fs::write(dir.path().join("gcc.bat"), "").unwrap();
        fs::write(dir.path().join("readme.txt"), "").unwrap();

        let files = list_executable_files(dir.path(), &Windows).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("gcc.bat"), dir.path().join("python.exe")]
        );
    }

    #[test]
    fn missing_directory_is_a_filesystem_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("bin");
        let err = list_executable_files(&missing, &Windows).unwrap_err();
        assert!(matches!(err, WrapperError::Filesystem { action: "read directory", .. }));
    }
}
