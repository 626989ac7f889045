use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::WrapperError;
use crate::render::{Substitutions, CONDA_ENV_DIR, SCHROOT_NAME, SCHROOT_OPTIONS};

/// Activation mechanism family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentKind {
    Conda,
    Schroot,
}

impl EnvironmentKind {
    pub const ALL: [EnvironmentKind; 2] = [EnvironmentKind::Conda, EnvironmentKind::Schroot];

    pub fn as_str(self) -> &'static str {
        match self {
            EnvironmentKind::Conda => "conda",
            EnvironmentKind::Schroot => "schroot",
        }
    }

    /// Flag carrying the environment identifier on the command line.
    pub fn identifier_flag(self) -> &'static str {
        match self {
            EnvironmentKind::Conda => "--conda-env-dir",
            EnvironmentKind::Schroot => "--schroot-name",
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentKind {
    type Err = WrapperError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EnvironmentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| WrapperError::InvalidWrapperType(value.to_string()))
    }
}

/// A concrete environment to activate before running a wrapped program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Conda {
        env_dir: String,
    },
    Schroot {
        name: String,
        /// Extra `schroot` arguments, inserted verbatim.
        options: String,
    },
}

impl Environment {
    pub fn conda(env_dir: impl Into<String>) -> Self {
        Environment::Conda {
            env_dir: env_dir.into(),
        }
    }

    pub fn schroot(name: impl Into<String>) -> Self {
        Environment::Schroot {
            name: name.into(),
            options: String::new(),
        }
    }

    pub fn kind(&self) -> EnvironmentKind {
        match self {
            Environment::Conda { .. } => EnvironmentKind::Conda,
            Environment::Schroot { .. } => EnvironmentKind::Schroot,
        }
    }

    pub fn identifier(&self) -> &str {
        match self {
            Environment::Conda { env_dir } => env_dir,
            Environment::Schroot { name, .. } => name,
        }
    }

    pub(crate) fn substitutions(&self) -> Substitutions {
        let mut subs = Substitutions::new();
        match self {
            Environment::Conda { env_dir } => {
                subs.insert(CONDA_ENV_DIR, env_dir.clone());
            }
            Environment::Schroot { name, options } => {
                subs.insert(SCHROOT_NAME, name.clone());
                subs.insert(SCHROOT_OPTIONS, options.clone());
            }
        }
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_kinds() {
        assert_eq!("conda".parse::<EnvironmentKind>().unwrap(), EnvironmentKind::Conda);
        assert_eq!(
            "schroot".parse::<EnvironmentKind>().unwrap(),
            EnvironmentKind::Schroot
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let err = "virtualenv".parse::<EnvironmentKind>().unwrap_err();
        assert!(matches!(err, WrapperError::InvalidWrapperType(ref v) if v == "virtualenv"));
    }

    #[test]
    fn schroot_substitutions_include_options() {
        let env = Environment::Schroot {
            name: "ubuntu-14.04".to_string(),
            options: "-p".to_string(),
        };
        let subs = env.substitutions();
        assert_eq!(subs.get(SCHROOT_NAME), Some("ubuntu-14.04"));
        assert_eq!(subs.get(SCHROOT_OPTIONS), Some("-p"));
        assert_eq!(subs.get(CONDA_ENV_DIR), None);
    }
}
