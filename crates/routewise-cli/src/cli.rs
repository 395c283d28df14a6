use clap::{Parser, Subcommand};
use routewise_core::{Priority, TaskCategory};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "routewise")]
#[command(about = "Cost, latency, and quality aware model router", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Config file (defaults to ~/.routewise/config.toml)"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Route a prompt to the best model and print the response")]
    Route {
        #[arg(help = "Prompt text")]
        input: String,

        #[arg(short, long, value_parser = parse_priority, help = "cost, balanced, or performance")]
        priority: Option<Priority>,

        #[arg(long = "prefer", help = "Restrict selection to these model ids")]
        preferred: Vec<String>,

        #[arg(long = "avoid", help = "Never select these model ids")]
        avoided: Vec<String>,

        #[arg(long, help = "Print the response body as JSON")]
        json: bool,
    },

    #[command(about = "List catalog models")]
    Models {
        #[arg(long, value_parser = parse_category, help = "Only models supporting this category")]
        category: Option<TaskCategory>,
    },

    #[command(about = "Show the category a prompt is classified as")]
    Classify {
        #[arg(help = "Prompt text")]
        input: String,
    },
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    value.parse().map_err(|error| format!("{error}"))
}

fn parse_category(value: &str) -> Result<TaskCategory, String> {
    value.parse().map_err(|error| format!("{error}"))
}
