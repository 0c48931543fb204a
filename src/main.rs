use clap::{Parser, Subcommand};
use groupforge::config;
use std::process;
use tracing::error;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Field delimiter for input and output files.
    #[arg(global = true, short, long, default_value = "\t")]
    delimiter: String,

    /// Treat the first row as a header.
    #[arg(global = true, long, default_value_t = false)]
    headers: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a participant list into balanced groups.
    Split(cmd::split::SplitArgs),
    /// Score an existing grouping (last column = group id).
    Score(cmd::score::ScoreArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let delimiter = config::delimiter_byte(&cli.delimiter).unwrap_or_else(|e| {
        error!("{}", e);
        process::exit(1);
    });

    let outcome = match cli.command {
        Commands::Split(args) => cmd::split::run(args, delimiter, cli.headers),
        Commands::Score(args) => cmd::score::run(args, delimiter, cli.headers),
    };

    if let Err(e) = outcome {
        error!("{}", e);
        process::exit(1);
    }
}
