//! Generates wrapper scripts that activate a conda environment or enter a
//! schroot before delegating to an original executable.

pub mod creators;
pub mod environment;
pub mod error;
pub mod lister;
pub mod platform;
pub mod render;
pub mod templates;
pub mod writer;

pub use creators::{ExecTarget, WrapperCreator, WrapperSet};
pub use environment::{Environment, EnvironmentKind};
pub use error::WrapperError;
pub use lister::list_executable_files;
pub use platform::Native;
pub use templates::TemplateStore;
