pub mod catalog;
pub mod generate;
pub mod heatmap;
pub mod report;

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use prngscope_core::{
    Error, GeneratedStream, ResolvedConfig, Result, RunConfig, generate_default_streams,
    parse_integer,
};

/// Seed and size inputs shared by every generating subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Generator seed (prompted for when missing)
    #[arg(long, allow_hyphen_values = true)]
    pub seed: Option<i64>,

    /// Number of values per generator (prompted for when missing)
    #[arg(long, allow_hyphen_values = true)]
    pub size: Option<i64>,

    /// JSON file with `seed`, `size` and optional `lcg` parameters
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl InputArgs {
    fn overrides(&self) -> RunConfig {
        RunConfig {
            seed: self.seed,
            size: self.size,
            lcg: None,
        }
    }
}

/// Print `Error: <message>` and exit with status 1.
pub fn fail(err: impl Display) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(1);
}

/// Resolve inputs: flags win over the config file; anything still missing is
/// asked for through `prompt`.
pub fn resolve_input<F>(args: &InputArgs, mut prompt: F) -> Result<ResolvedConfig>
where
    F: FnMut(&str) -> Result<String>,
{
    let file = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    let mut config = file.merge(args.overrides());
    if config.seed.is_none() {
        config.seed = Some(parse_integer("seed", &prompt("Seed")?)?);
    }
    if config.size.is_none() {
        config.size = Some(parse_integer("size", &prompt("Size")?)?);
    }
    config.resolve()
}

/// Ask on stdout, read one line from stdin.
pub fn stdin_prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(Error::InvalidInput(format!(
            "{} was not provided",
            label.to_lowercase()
        )));
    }
    Ok(line)
}

/// Resolve inputs and generate both streams, exiting on any error.
pub fn generate_or_exit(args: &InputArgs) -> Vec<GeneratedStream> {
    let config = resolve_input(args, stdin_prompt).unwrap_or_else(|e| fail(e));
    log::debug!("resolved config: {config:?}");
    generate_default_streams(&config).unwrap_or_else(|e| fail(e))
}
