//! CLI for prngscope: generate LCG and Mersenne Twister bit streams, run them
//! through the SP 800-22 battery, and look at them.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

use commands::InputArgs;

#[derive(Parser)]
#[command(name = "prngscope")]
#[command(about = "prngscope: an LCG and the Mersenne Twister under the SP 800-22 battery")]
#[command(version = prngscope_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the battery report for both generators, then open the heat map
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Abort on the first test that errors instead of recording it as FAILED
        #[arg(long)]
        fail_fast: bool,

        /// Skip the interactive heat map
        #[arg(long)]
        no_heatmap: bool,
    },

    /// Print the battery report only
    Report {
        #[command(flatten)]
        input: InputArgs,

        /// Also write the report as JSON to this path
        #[arg(long)]
        output: Option<String>,

        /// Abort on the first test that errors instead of recording it as FAILED
        #[arg(long)]
        fail_fast: bool,
    },

    /// Print each generated sequence with its bit length and bit string
    Generate {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show both bit streams as square heat maps (q or Esc to quit)
    Heatmap {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List the test catalog with minimum stream lengths
    Catalog,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            fail_fast,
            no_heatmap,
        } => {
            let streams = commands::generate_or_exit(&input);
            commands::report::print(&streams, fail_fast);
            if !no_heatmap {
                commands::heatmap::show(&streams);
            }
        }
        Commands::Report {
            input,
            output,
            fail_fast,
        } => commands::report::run(&input, output.as_deref(), fail_fast),
        Commands::Generate { input } => commands::generate::run(&input),
        Commands::Heatmap { input } => commands::heatmap::run(&input),
        Commands::Catalog => commands::catalog::run(),
    }
}
