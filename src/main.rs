use clap::Parser;
use local_todo::cli::{Cli, Commands, ConfigCommand};
use local_todo::config::{ConfigError, ConfigManager};
use local_todo::models::TodoError;
use local_todo::storage::JsonStorage;
use local_todo::todo_store::TodoStore;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::CreateTodo { title, extra } => with_store(&cli, "Error creating todo", |store| {
            ignore_extra(extra);
            store.create(title)?;
            println!("Todo created successfully");
            Ok(())
        }),
        Commands::ListTodos => with_store(&cli, "Error listing todos", |store| {
            let todos = store.list()?;
            println!("Todos:");
            for todo in todos {
                println!("{todo}");
            }
            Ok(())
        }),
        Commands::UpdateTodos {
            id,
            title,
            completed,
            extra,
        } => with_store(&cli, "Error updating todo", |store| {
            ignore_extra(extra);
            store.update(id, title, completed)?;
            Ok(())
        }),
        Commands::ClearTodos => with_store(&cli, "Error clearing todos", |store| store.clear()),
        Commands::Config { command } => run_config(&cli, command),
    }
}

fn init_tracing(verbose: u8) {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    if verbose > 0 {
        if let Ok(directive) = "local_todo=debug".parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn ignore_extra(extra: &[String]) {
    if !extra.is_empty() {
        debug!(?extra, "ignoring extra arguments");
    }
}

fn resolve_storage_path(cli: &Cli) -> Result<PathBuf, ConfigError> {
    if let Some(db) = &cli.db {
        return Ok(db.clone());
    }
    Ok(ConfigManager::new(cli.config_file.as_deref())?.storage_path())
}

/// Opens the data file and runs one todo operation against it.
fn with_store<F>(cli: &Cli, context: &str, op: F) -> ExitCode
where
    F: FnOnce(&TodoStore) -> Result<(), TodoError>,
{
    let path = match resolve_storage_path(cli) {
        Ok(path) => path,
        Err(e) => {
            error!("Failed to read config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let storage = match JsonStorage::open(&path) {
        Ok(storage) => storage,
        Err(e) => {
            error!("Failed to open file: {e}");
            return ExitCode::FAILURE;
        }
    };

    match op(&TodoStore::new(&storage)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{context}: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_config(cli: &Cli, command: &ConfigCommand) -> ExitCode {
    let result = ConfigManager::new(cli.config_file.as_deref()).and_then(|mut manager| {
        match command {
            ConfigCommand::Get { key } => match manager.get(key)? {
                Some(value) => println!("{value}"),
                None => println!("(not set)"),
            },
            ConfigCommand::Set { key, value } => manager.set(key, value)?,
            ConfigCommand::Unset { key } => manager.unset(key)?,
            ConfigCommand::List => {
                for (key, value, is_default) in manager.list() {
                    if is_default {
                        println!("{key} = {value} (default)");
                    } else {
                        println!("{key} = {value}");
                    }
                }
            }
        }
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Config error: {e}");
            ExitCode::FAILURE
        }
    }
}
