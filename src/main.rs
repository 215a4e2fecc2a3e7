use clap::{Parser, Subcommand};
use gnit::commands::*;
use gnit::core::{
    error::{GnitError, Result},
    print_error, print_error_with_structured_usage, ClientConfig, GnokeyEvaluator,
};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gnit")]
#[command(about = "A git-like client for file repositories hosted in Gno realms")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind the current directory to a realm
    Init {
        /// Realm path (defaults to the module in gnomod.toml)
        #[arg(long)]
        realm: Option<String>,
    },
    /// Clone a repository from a realm path
    Clone {
        /// Realm path, e.g. gno.land/r/demo/myrepo
        realm: String,
    },
    /// Stage files or directories for commit
    Add {
        /// Files or directories to stage
        paths: Vec<PathBuf>,
    },
    /// Show the working tree status
    Status {
        /// One line per file
        #[arg(short, long)]
        short: bool,
    },
    /// Fetch file(s) from the repository
    Pull {
        /// Also pull the realm's own source files
        #[arg(short, long)]
        source: bool,
        /// Single file to pull
        file: Option<String>,
    },
    /// Commit staged changes with a message
    Commit {
        /// Commit message
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Restore working tree files or unstage files
    Restore {
        /// Unstage instead of restoring file content
        #[arg(short, long)]
        staged: bool,
        /// Files to restore (all when omitted)
        paths: Vec<PathBuf>,
    },
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(command: Commands) -> Result<()> {
    let root = env::current_dir()?;

    // init and add never talk to the realm
    let command = match command {
        Commands::Init { realm } => return execute_init(&root, realm).map(|_| ()),
        Commands::Add { paths } => return execute_add(&root, &paths).map(|_| ()),
        other => other,
    };

    let config = ClientConfig::load()?;
    let evaluator = GnokeyEvaluator::new(config.clone());

    match command {
        Commands::Clone { realm } => execute_clone(&root, &realm, &evaluator, &config).map(|_| ()),
        Commands::Status { short } => {
            execute_status(&root, &evaluator, &config, short).map(|_| ())
        }
        Commands::Pull { source, file } => {
            execute_pull(&root, &evaluator, &config, file.as_deref(), source).map(|_| ())
        }
        Commands::Commit { message } => {
            let message = message.join(" ");
            execute_commit(&root, &evaluator, &config, message.trim_matches('"')).map(|_| ())
        }
        Commands::Restore { staged, paths } => {
            execute_restore(&root, &evaluator, &config, staged, &paths).map(|_| ())
        }
        Commands::Init { .. } | Commands::Add { .. } => Ok(()),
    }
}

fn report(error: &GnitError) {
    match error {
        GnitError::NotARepository { .. } => print_error_with_structured_usage(
            &error.to_string(),
            &["gnit init --realm <realm-path>", "gnit clone <realm-path>"],
            &[],
        ),
        GnitError::NoPathsGiven => print_error_with_structured_usage(
            &error.to_string(),
            &["gnit add <file|directory>..."],
            &[("-h, --help", "Show this help message")],
        ),
        _ => print_error(&error.to_string()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli.command) {
        log::debug!("Command failed: {e:?}");
        report(&e);
        std::process::exit(1);
    }
}
