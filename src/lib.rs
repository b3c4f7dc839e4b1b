//! webnotes - one markdown note per web page, kept in step with the index

pub mod cli;
pub mod domain;
pub mod index;
pub mod infra;
pub mod reconcile;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use cli::{
    Cli, Command,
    config::Config,
    handlers::{handle_check, handle_list, handle_open},
};
use reconcile::Reconciler;

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let config = Config::load()?;
    let notes_dir = config.notes_dir(cli.dir.as_ref());
    let settings = config.settings(&notes_dir, cli.index_dir.as_ref());

    match &cli.command {
        Command::Open(args) => {
            let reconciler = Reconciler::new(settings, config.tracker());
            handle_open(args, &reconciler)
        }
        Command::List(args) => handle_list(args, &settings),
        Command::Check(args) => handle_check(args, &settings),
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "webnotes",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays clean for the printed note path.
fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Error);
    } else if cli.verbose > 1 {
        builder.filter_level(log::LevelFilter::Debug);
    } else if cli.verbose == 1 {
        builder.filter_level(log::LevelFilter::Info);
    }
    builder.target(env_logger::Target::Stderr).init();
}
