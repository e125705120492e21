use anyhow::Context;
use base64::Engine;
use clap::{Parser, Subcommand};
use rootguard::{config::Config, logging, root, ExecutableRoot, FilesystemService, FsResult, FunctionTimer};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "rootguard", version, about = "File utilities rooted at the executable's directory")]
struct Cli {
    /// TOML or JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Locate the executable root from this path instead of argv[0].
    #[arg(long, global = true)]
    invocation: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the localized form of a path.
    Localize {
        path: String,
        /// Print the required buffer length instead.
        #[arg(long)]
        query: bool,
    },
    /// Check a path against the executable root.
    Allowed { path: String },
    Exists { path: String },
    Size { path: String },
    Mtime { path: String },
    /// Create a folder and its missing parents.
    Mkdir { path: String },
    IsEmpty { path: String },
    /// Delete a folder tree, keeping anything that is not empty.
    Rmdir { path: String },
    /// Delete a file or an empty folder.
    Rm { path: String },
    /// Print a file, base64-encoded unless --text.
    Read {
        path: String,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        text: bool,
    },
    /// Replace a file's contents.
    Write {
        path: String,
        #[arg(long, conflicts_with = "b64")]
        content: Option<String>,
        #[arg(long = "base64")]
        b64: Option<String>,
    },
}

impl Command {
    fn label(&self) -> &'static str {
        match self {
            Command::Localize { .. } => "localize",
            Command::Allowed { .. } => "allowed",
            Command::Exists { .. } => "exists",
            Command::Size { .. } => "size",
            Command::Mtime { .. } => "mtime",
            Command::Mkdir { .. } => "mkdir",
            Command::IsEmpty { .. } => "is_empty",
            Command::Rmdir { .. } => "rmdir",
            Command::Rm { .. } => "rm",
            Command::Read { .. } => "read",
            Command::Write { .. } => "write",
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("rootguard: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => Config::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    cfg.validate().context("validating config")?;
    logging::init(cfg.logging.format);

    let invocation = match cli.invocation {
        Some(path) => path,
        None => root::invocation_path(std::env::args_os().next().as_deref()),
    };
    let resolved = ExecutableRoot::resolve(&invocation, cfg.root.canonicalize).context("resolving executable root")?;
    root::install_root(resolved).context("initializing executable root")?;
    let service = FilesystemService::from_config(&cfg)?;

    info!(root = service.root().as_str(), policy = ?service.policy(), command = cli.command.label(), "rootguard ready");

    let mut timer = FunctionTimer::new();
    let label = cli.command.label();
    let outcome = timer.time(label, || execute(&service, cli.command));

    if cfg.timer.enabled {
        timer
            .write_report(&service, &cfg.timer.report_path)
            .context("writing function timer report")?;
    }
    outcome
}

fn execute(service: &FilesystemService, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Localize { path, query } => {
            if query {
                let mut len = 0;
                service.localize_into(&path, None, &mut len)?;
                println!("{len}");
            } else {
                println!("{}", service.localize(&path)?);
            }
            Ok(true)
        }
        Command::Allowed { path } => {
            let localized = service.localize(&path)?;
            let allowed = service.is_allowed(localized.as_str());
            println!("{allowed}");
            Ok(allowed)
        }
        Command::Exists { path } => {
            let exists = service.exists(&path);
            println!("{exists}");
            Ok(exists)
        }
        Command::Size { path } => {
            println!("{}", service.size(&path));
            Ok(true)
        }
        Command::Mtime { path } => {
            println!("{}", service.modified_time(&path));
            Ok(true)
        }
        Command::Mkdir { path } => outcome(service.create_folder(&path)),
        Command::IsEmpty { path } => {
            let empty = service.is_directory_empty(&path);
            println!("{empty}");
            Ok(true)
        }
        Command::Rmdir { path } => outcome(service.delete_folder(&path)),
        Command::Rm { path } => outcome(service.delete_file(&path)),
        Command::Read { path, limit, text } => {
            if text {
                println!("{}", service.read_text(&path, limit)?);
            } else {
                let data = service.read_binary(&path, limit)?;
                println!("{}", base64::engine::general_purpose::STANDARD.encode(data));
            }
            Ok(true)
        }
        Command::Write { path, content, b64 } => {
            let bytes = match (content, b64) {
                (Some(content), _) => content.into_bytes(),
                (None, Some(b64)) => base64::engine::general_purpose::STANDARD
                    .decode(b64)
                    .context("invalid base64")?,
                (None, None) => anyhow::bail!("either --content or --base64 is required"),
            };
            let written = service.write_binary(&path, &bytes)?;
            println!("{written}");
            Ok(true)
        }
    }
}

// fatal errors propagate, recoverable ones become a failing exit code
fn outcome(result: FsResult<()>) -> anyhow::Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(err) if err.is_fatal() => Err(err.into()),
        Err(err) => {
            eprintln!("rootguard: {err}");
            Ok(false)
        }
    }
}
