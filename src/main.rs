use clap::Parser;
use serde::Serialize;
use std::env;
use std::path::PathBuf;

use exec_wrappers::{
    list_executable_files, Environment, EnvironmentKind, ExecTarget, Native, TemplateStore,
    WrapperCreator, WrapperError, WrapperSet,
};

const LOG_ENV: &str = "CREATE_WRAPPERS_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "create-wrappers",
    version,
    about = "Create wrappers that run executables inside a conda environment or schroot"
)]
struct Cli {
    /// Wrapper type: conda or schroot.
    #[arg(short = 't', long = "type")]
    wrapper_type: String,
    #[arg(long)]
    conda_env_dir: Option<String>,
    #[arg(long)]
    schroot_name: Option<String>,
    /// Extra arguments passed to schroot, inserted verbatim.
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    schroot_options: String,
    /// Wrap every executable found directly in this directory.
    #[arg(long)]
    bin_dir: Option<PathBuf>,
    /// Path-list of files to wrap (`a:b:c`).
    #[arg(long)]
    files_to_wrap: Option<String>,
    #[arg(long)]
    dest_dir: PathBuf,
    /// Exec the original path instead of looking the name up on PATH.
    #[arg(long)]
    use_original_path: bool,
    #[arg(long)]
    templates_dir: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Debug)]
enum FileSource {
    BinDir(PathBuf),
    Explicit(Vec<PathBuf>),
}

#[derive(Debug)]
struct Request {
    environment: Environment,
    source: FileSource,
    dest_dir: PathBuf,
    exec_target: ExecTarget,
    templates: TemplateStore,
}

#[derive(Debug, Serialize)]
struct JsonResult<T: Serialize> {
    ok: bool,
    result: Option<T>,
    error: Option<String>,
}

fn main() -> Result<(), WrapperError> {
    env_logger::init_from_env(env_logger::Env::default().filter_or(LOG_ENV, "warn"));
    let cli = Cli::parse();

    let result = build_request(&cli).and_then(|request| create(&request));
    match result {
        Ok(set) => output(&set, cli.json),
        Err(err) => {
            if cli.json {
                let payload = JsonResult::<serde_json::Value> {
                    ok: false,
                    result: None,
                    error: Some(err.to_string()),
                };
                print_json(&payload)?;
            } else {
                eprintln!("{err}");
            }
            std::process::exit(err.exit_code());
        }
    }
}

fn build_request(cli: &Cli) -> Result<Request, WrapperError> {
    let kind: EnvironmentKind = cli.wrapper_type.parse()?;
    let environment = match kind {
        EnvironmentKind::Conda => {
            if cli.schroot_name.is_some() {
                log::warn!("--schroot-name is ignored for conda wrappers");
            }
            Environment::Conda {
                env_dir: required_identifier(kind, cli.conda_env_dir.as_deref())?,
            }
        }
        EnvironmentKind::Schroot => {
            if cli.conda_env_dir.is_some() {
                log::warn!("--conda-env-dir is ignored for schroot wrappers");
            }
            Environment::Schroot {
                name: required_identifier(kind, cli.schroot_name.as_deref())?,
                options: cli.schroot_options.clone(),
            }
        }
    };

    let source = match (&cli.bin_dir, &cli.files_to_wrap) {
        (Some(dir), None) => FileSource::BinDir(dir.clone()),
        (None, Some(list)) => FileSource::Explicit(split_file_list(list)),
        _ => return Err(WrapperError::AmbiguousFileSource),
    };

    let exec_target = if cli.use_original_path {
        ExecTarget::OriginalPath
    } else {
        ExecTarget::BaseName
    };

    Ok(Request {
        environment,
        source,
        dest_dir: cli.dest_dir.clone(),
        exec_target,
        templates: TemplateStore::resolve(cli.templates_dir.as_ref()),
    })
}

fn required_identifier(kind: EnvironmentKind, value: Option<&str>) -> Result<String, WrapperError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(WrapperError::MissingEnvironmentIdentifier {
            kind,
            flag: kind.identifier_flag(),
        }),
    }
}

fn split_file_list(list: &str) -> Vec<PathBuf> {
    env::split_paths(list)
        .filter(|path| !path.as_os_str().is_empty())
        .collect()
}

fn create(request: &Request) -> Result<WrapperSet, WrapperError> {
    let creator = WrapperCreator::new(request.templates.clone(), Native::default())
        .with_exec_target(request.exec_target);
    let files = match &request.source {
        FileSource::BinDir(dir) => list_executable_files(dir, creator.platform())?,
        FileSource::Explicit(files) => files.clone(),
    };
    creator.create(&files, &request.environment, &request.dest_dir)
}

fn output(set: &WrapperSet, json: bool) -> Result<(), WrapperError> {
    if json {
        let payload = JsonResult {
            ok: true,
            result: Some(set),
            error: None,
        };
        print_json(&payload)?;
    } else {
        for path in set.paths() {
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(payload: &T) -> Result<(), WrapperError> {
    let text = serde_json::to_string_pretty(payload)?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("create-wrappers").chain(args.iter().copied()))
            .expect("cli")
    }

    #[test]
    fn conda_request_from_bin_dir() {
        let cli = parse(&[
            "-t",
            "conda",
            "--conda-env-dir",
            "miniconda/envs/test",
            "--bin-dir",
            "bin",
            "--dest-dir",
            "wrappers",
        ]);
        let request = build_request(&cli).unwrap();
        assert_eq!(request.environment, Environment::conda("miniconda/envs/test"));
        assert!(matches!(request.source, FileSource::BinDir(ref dir) if dir == &PathBuf::from("bin")));
        assert_eq!(request.exec_target, ExecTarget::BaseName);
    }

    #[test]
    fn schroot_request_keeps_options() {
        let cli = parse(&[
            "-t",
            "schroot",
            "--schroot-name",
            "ubuntu-14.04",
            "--schroot-options",
            "-p",
            "--files-to-wrap",
            "python",
            "--dest-dir",
            "wrappers",
            "--use-original-path",
        ]);
        let request = build_request(&cli).unwrap();
        assert_eq!(
            request.environment,
            Environment::Schroot {
                name: "ubuntu-14.04".to_string(),
                options: "-p".to_string(),
            }
        );
        assert_eq!(request.exec_target, ExecTarget::OriginalPath);
    }

    #[test]
    fn identifiers_are_passed_through_verbatim() {
        let cli = parse(&[
            "-t",
            "conda",
            "--conda-env-dir",
            " envs/my env ",
            "--files-to-wrap",
            "python",
            "--dest-dir",
            "w",
        ]);
        let request = build_request(&cli).unwrap();
        assert_eq!(request.environment, Environment::conda(" envs/my env "));

        let blank = parse(&[
            "-t",
            "conda",
            "--conda-env-dir",
            "  ",
            "--files-to-wrap",
            "python",
            "--dest-dir",
            "w",
        ]);
        assert!(matches!(
            build_request(&blank).unwrap_err(),
            WrapperError::MissingEnvironmentIdentifier { .. }
        ));

        let padded_type = parse(&["-t", "conda ", "--files-to-wrap", "python", "--dest-dir", "w"]);
        assert!(matches!(
            build_request(&padded_type).unwrap_err(),
            WrapperError::InvalidWrapperType(_)
        ));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let cli = parse(&["-t", "docker", "--bin-dir", "bin", "--dest-dir", "w"]);
        let err = build_request(&cli).unwrap_err();
        assert!(matches!(err, WrapperError::InvalidWrapperType(_)));
    }

    #[test]
    fn missing_identifier_is_rejected() {
        let cli = parse(&["-t", "schroot", "--bin-dir", "bin", "--dest-dir", "w"]);
        let err = build_request(&cli).unwrap_err();
        assert!(err.to_string().contains("--schroot-name"));
    }

    #[test]
    fn file_source_must_be_exactly_one() {
        let both = parse(&[
            "-t",
            "conda",
            "--conda-env-dir",
            "env",
            "--bin-dir",
            "bin",
            "--files-to-wrap",
            "python",
            "--dest-dir",
            "w",
        ]);
        assert!(matches!(
            build_request(&both).unwrap_err(),
            WrapperError::AmbiguousFileSource
        ));
        let neither = parse(&["-t", "conda", "--conda-env-dir", "env", "--dest-dir", "w"]);
        assert!(matches!(
            build_request(&neither).unwrap_err(),
            WrapperError::AmbiguousFileSource
        ));
    }

    #[cfg(unix)]
    #[test]
    fn file_list_splits_on_colon_and_drops_empty_entries() {
        assert_eq!(
            split_file_list("python::/usr/bin/gcc:"),
            vec![PathBuf::from("python"), PathBuf::from("/usr/bin/gcc")]
        );
    }
}
