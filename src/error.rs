use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::environment::EnvironmentKind;
use crate::platform::PlatformFamily;
use crate::templates::TemplateRole;

#[derive(Debug, Error)]
pub enum WrapperError {
    #[error("invalid wrapper type '{0}' (expected one of: conda, schroot)")]
    InvalidWrapperType(String),
    #[error("{flag} is required for {kind} wrappers")]
    MissingEnvironmentIdentifier {
        kind: EnvironmentKind,
        flag: &'static str,
    },
    #[error("exactly one of --bin-dir or --files-to-wrap must be given")]
    AmbiguousFileSource,
    #[error("{kind} wrappers are not supported on {family} platforms")]
    UnsupportedEnvironmentKind {
        kind: EnvironmentKind,
        family: PlatformFamily,
    },
    #[error("no {role} template for {kind} wrappers at {path}")]
    TemplateMissing {
        kind: EnvironmentKind,
        role: TemplateRole,
        path: PathBuf,
    },
    #[error("cannot derive a wrapper name from '{0}'")]
    InvalidFileToWrap(PathBuf),
    #[error("failed to {action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WrapperError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        WrapperError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    /// Usage problems exit with 2, everything that touched the disk with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            WrapperError::InvalidWrapperType(_)
            | WrapperError::MissingEnvironmentIdentifier { .. }
            | WrapperError::AmbiguousFileSource
            | WrapperError::UnsupportedEnvironmentKind { .. }
            | WrapperError::InvalidFileToWrap(_) => 2,
            WrapperError::TemplateMissing { .. }
            | WrapperError::Filesystem { .. }
            | WrapperError::Json(_) => 1,
        }
    }
}

pub type Result<T, E = WrapperError> = std::result::Result<T, E>;
