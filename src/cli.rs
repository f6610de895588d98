use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "local_todo", version, about = "A todo list kept in a local JSON file")]
pub struct Cli {
    /// Data file to use instead of the configured one
    #[arg(long, global = true, env = "LOCALTODO_DB")]
    pub db: Option<PathBuf>,

    /// Config file to use instead of ~/.config/localtodo/config.json
    #[arg(long = "config", global = true, env = "LOCALTODO_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a todo
    #[command(name = "createTodo")]
    CreateTodo {
        #[arg(allow_hyphen_values = true)]
        title: String,
        /// Ignored
        #[arg(hide = true, num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Print every todo
    #[command(name = "listTodos")]
    ListTodos,
    /// Change a todo's title and/or completed flag; pass "" to leave a field as is
    #[command(name = "updateTodos")]
    UpdateTodos {
        id: String,
        #[arg(default_value = "", allow_hyphen_values = true)]
        title: String,
        #[arg(default_value = "")]
        completed: String,
        /// Ignored
        #[arg(hide = true, num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Remove all todos
    #[command(name = "clearTodos")]
    ClearTodos,
    /// Read or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    Get { key: String },
    Set { key: String, value: String },
    Unset { key: String },
    List,
}
