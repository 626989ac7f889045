use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Result, WrapperError};
use crate::platform::Platform;

/// Writes rendered wrappers into one destination directory.
#[derive(Debug)]
pub struct WrapperWriter<'a, P: Platform> {
    dest_dir: PathBuf,
    platform: &'a P,
}

impl<'a, P: Platform> WrapperWriter<'a, P> {
    /// Creates `dest_dir` (and parents) if it does not exist yet.
    pub fn create(dest_dir: &Path, platform: &'a P) -> Result<Self> {
        fs::create_dir_all(dest_dir)
            .map_err(|err| WrapperError::fs("create destination directory", dest_dir, err))?;
        Ok(Self {
            dest_dir: dest_dir.to_path_buf(),
            platform,
        })
    }

    pub fn dest_dir(&self) -> &Path {
        &self.dest_dir
    }

    fn target_path(&self, base_name: &str) -> PathBuf {
        self.dest_dir
            .join(format!("{}{}", base_name, self.platform.wrapper_extension()))
    }

    /// Replaces `<dest>/<base_name><ext>` with `content` and marks it executable.
    pub fn write(&self, base_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.target_path(base_name);
        let tmp_path = self.dest_dir.join(format!(
            ".{}.tmp.{}.{}",
            base_name,
            std::process::id(),
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));

        fs::write(&tmp_path, content)
            .map_err(|err| WrapperError::fs("write wrapper", &tmp_path, err))?;
        if let Err(err) = self.platform.mark_executable(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(WrapperError::fs("set permissions on", &path, err));
        }
        if let Err(err) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(WrapperError::fs("write wrapper", &path, err));
        }
        log::debug!("wrote {}", path.display());
        Ok(path)
    }
}
