use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::environment::EnvironmentKind;
use crate::error::{Result, WrapperError};
use crate::platform::{Platform, PlatformFamily};

pub const TEMPLATES_DIR_ENV: &str = "CREATE_WRAPPERS_TEMPLATES_DIR";

const CONDA_RUN_IN: &str = include_str!("../templates/conda/run-in");
const CONDA_WRAPPER: &str = include_str!("../templates/conda/wrapper");
const CONDA_RUN_IN_BAT: &str = include_str!("../templates/conda/run-in.bat");
const CONDA_WRAPPER_BAT: &str = include_str!("../templates/conda/wrapper.bat");
const SCHROOT_RUN_IN: &str = include_str!("../templates/schroot/run-in");
const SCHROOT_WRAPPER: &str = include_str!("../templates/schroot/wrapper");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateRole {
    /// Generic `run-in` script: activate, then exec whatever was passed.
    Launcher,
    /// Per-program script: activate, then exec one fixed executable.
    Program,
}

impl TemplateRole {
    pub fn file_stem(self) -> &'static str {
        match self {
            TemplateRole::Launcher => "run-in",
            TemplateRole::Program => "wrapper",
        }
    }
}

impl fmt::Display for TemplateRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateRole::Launcher => f.write_str("launcher"),
            TemplateRole::Program => f.write_str("program-wrapper"),
        }
    }
}

/// Where wrapper templates come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateStore {
    /// Copies of `templates/` compiled into the binary.
    #[default]
    Bundled,
    /// `<dir>/<kind>/<run-in|wrapper><extension>` read at call time.
    Directory(PathBuf),
}

impl TemplateStore {
    /// `--templates-dir`, then `CREATE_WRAPPERS_TEMPLATES_DIR`, then bundled.
    pub fn resolve(override_dir: Option<&PathBuf>) -> Self {
        if let Some(dir) = override_dir {
            return TemplateStore::Directory(dir.clone());
        }
        match std::env::var_os(TEMPLATES_DIR_ENV) {
            Some(dir) if !dir.is_empty() => TemplateStore::Directory(PathBuf::from(dir)),
            _ => TemplateStore::Bundled,
        }
    }

    fn template_path(
        dir: &Path,
        kind: EnvironmentKind,
        role: TemplateRole,
        platform: &impl Platform,
    ) -> PathBuf {
        dir.join(kind.as_str())
            .join(format!("{}{}", role.file_stem(), platform.wrapper_extension()))
    }

    pub fn load(
        &self,
        kind: EnvironmentKind,
        role: TemplateRole,
        platform: &impl Platform,
    ) -> Result<String> {
        match self {
            TemplateStore::Bundled => bundled(kind, role, platform.family())
                .map(str::to_string)
                .ok_or_else(|| WrapperError::TemplateMissing {
                    kind,
                    role,
                    path: Self::template_path(Path::new("<bundled>"), kind, role, platform),
                }),
            TemplateStore::Directory(dir) => {
                let path = Self::template_path(dir, kind, role, platform);
                match fs::read_to_string(&path) {
                    Ok(text) => Ok(text),
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {
                        Err(WrapperError::TemplateMissing { kind, role, path })
                    }
                    Err(err) => Err(WrapperError::fs("read template", path, err)),
                }
            }
        }
    }
}

fn bundled(
    kind: EnvironmentKind,
    role: TemplateRole,
    family: PlatformFamily,
) -> Option<&'static str> {
    use EnvironmentKind::*;
    use PlatformFamily::*;
    use TemplateRole::*;
    match (kind, role, family) {
        (Conda, Launcher, Posix) => Some(CONDA_RUN_IN),
        (Conda, Program, Posix) => Some(CONDA_WRAPPER),
        (Conda, Launcher, Windows) => Some(CONDA_RUN_IN_BAT),
        (Conda, Program, Windows) => Some(CONDA_WRAPPER_BAT),
        (Schroot, Launcher, Posix) => Some(SCHROOT_RUN_IN),
        (Schroot, Program, Posix) => Some(SCHROOT_WRAPPER),
        (Schroot, _, Windows) => None,
    }
}
