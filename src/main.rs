mod commands;
mod core;
mod manifest;
mod patch;
mod publish;
mod reconcile;
mod registry;

use clap::{Parser, Subcommand};
use core::error::{MirrorError, print_error};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mirror upstream package releases into a pinned repository
#[derive(Parser)]
#[command(name = "pin-mirror")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Run as if started in <DIR>
  #[arg(short = 'C', long = "directory", global = true, value_name = "DIR")]
  directory: Option<PathBuf>,

  /// Config file (default: mirror.toml, .mirror.toml or .config/mirror.toml)
  #[arg(long, global = true, value_name = "PATH")]
  config: Option<PathBuf>,

  /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
  #[arg(short, long, global = true, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Reconcile the pin with the registry and publish (default)
  Run,

  /// Show what a run would do without changing anything
  Plan {
    /// Output plan in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: u8) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
    0 => EnvFilter::new("info"),
    1 => EnvFilter::new("debug"),
    _ => EnvFilter::new("trace"),
  });
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let root = match cli.directory {
    Some(dir) => dir,
    None => match std::env::current_dir() {
      Ok(dir) => dir,
      Err(e) => {
        eprintln!("Error: Failed to get current directory: {}", e);
        std::process::exit(1);
      }
    },
  };
  let config = cli.config.as_deref();

  let result = match cli.command.unwrap_or(Commands::Run) {
    Commands::Run => commands::run_mirror(&root, config),
    Commands::Plan { json } => commands::run_plan(&root, config, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: MirrorError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
