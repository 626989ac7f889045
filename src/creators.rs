use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::environment::Environment;
use crate::error::{Result, WrapperError};
use crate::platform::Platform;
use crate::render::{render, EXECUTABLE};
use crate::templates::{TemplateRole, TemplateStore};
use crate::writer::WrapperWriter;

/// Reserved name of the generic launcher wrapper.
pub const LAUNCHER_NAME: &str = "run-in";

/// What a program wrapper execs once the environment is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecTarget {
    /// The base name, looked up on the activated `PATH`.
    #[default]
    BaseName,
    /// The path exactly as it was handed in.
    OriginalPath,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrapperSet {
    pub dest_dir: PathBuf,
    /// `None` when a wrapped program is itself called `run-in`.
    pub launcher: Option<PathBuf>,
    pub wrappers: Vec<PathBuf>,
}

impl WrapperSet {
    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.launcher.iter().chain(self.wrappers.iter())
    }
}

#[derive(Debug)]
pub struct WrapperCreator<P: Platform> {
    templates: TemplateStore,
    platform: P,
    exec_target: ExecTarget,
}

impl<P: Platform> WrapperCreator<P> {
    pub fn new(templates: TemplateStore, platform: P) -> Self {
        Self {
            templates,
            platform,
            exec_target: ExecTarget::default(),
        }
    }

    pub fn with_exec_target(mut self, exec_target: ExecTarget) -> Self {
        self.exec_target = exec_target;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn create_conda_wrappers(
        &self,
        files_to_wrap: &[PathBuf],
        conda_env_dir: &str,
        dest_dir: &Path,
    ) -> Result<WrapperSet> {
        self.create(files_to_wrap, &Environment::conda(conda_env_dir), dest_dir)
    }

    pub fn create_schroot_wrappers(
        &self,
        files_to_wrap: &[PathBuf],
        schroot_name: &str,
        dest_dir: &Path,
    ) -> Result<WrapperSet> {
        self.create(files_to_wrap, &Environment::schroot(schroot_name), dest_dir)
    }

    /// Wrapper name and the command it execs for one input file.
    fn program_names(&self, file: &Path) -> Result<(String, String)> {
        let invalid = || WrapperError::InvalidFileToWrap(file.to_path_buf());
        let name = self.platform.base_name(file).ok_or_else(invalid)?;
        let executable = match self.exec_target {
            ExecTarget::BaseName => name.clone(),
            ExecTarget::OriginalPath => file.to_str().ok_or_else(invalid)?.to_string(),
        };
        Ok((name, executable))
    }

    /// Writes the `run-in` launcher plus one wrapper per file, in input order.
    /// The first failure aborts; wrappers already written are left in place.
    pub fn create(
        &self,
        files_to_wrap: &[PathBuf],
        environment: &Environment,
        dest_dir: &Path,
    ) -> Result<WrapperSet> {
        let kind = environment.kind();
        if !self.platform.supports(kind) {
            return Err(WrapperError::UnsupportedEnvironmentKind {
                kind,
                family: self.platform.family(),
            });
        }

        let programs = files_to_wrap
            .iter()
            .map(|file| self.program_names(file))
            .collect::<Result<Vec<_>>>()?;

        let launcher_template = self.templates.load(kind, TemplateRole::Launcher, &self.platform)?;
        let program_template = self.templates.load(kind, TemplateRole::Program, &self.platform)?;
        let subs = environment.substitutions();
        let writer = WrapperWriter::create(dest_dir, &self.platform)?;

        let launcher = if programs
            .iter()
            .any(|(name, _)| self.platform.same_name(name, LAUNCHER_NAME))
        {
            log::warn!(
                "a wrapped program is named {LAUNCHER_NAME}; not writing the {LAUNCHER_NAME} launcher"
            );
            None
        } else {
            Some(writer.write(LAUNCHER_NAME, &render(&launcher_template, &subs))?)
        };

        let mut written: Vec<(String, PathBuf)> = Vec::with_capacity(programs.len());
        for (name, executable) in programs {
            let text = render(&program_template, &subs.clone().with(EXECUTABLE, executable));
            let path = writer.write(&name, &text)?;
            match written
                .iter_mut()
                .find(|(seen, _)| self.platform.same_name(seen, &name))
            {
                Some(entry) => *entry = (name, path),
                None => written.push((name, path)),
            }
        }
        let wrappers: Vec<PathBuf> = written.into_iter().map(|(_, path)| path).collect();

        log::info!(
            "wrote {} {kind} wrappers for '{}' into {}",
            wrappers.len() + usize::from(launcher.is_some()),
            environment.identifier(),
            writer.dest_dir().display()
        );
        Ok(WrapperSet {
            dest_dir: writer.dest_dir().to_path_buf(),
            launcher,
            wrappers,
        })
    }
}
