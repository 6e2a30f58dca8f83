use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tally_cli::commands::{bill, control, history, preset, rate, station, status};
use tally_cli::{AddKind, Cli, Commands, Config, PresetAction, Session};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let Some(command) = cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut session = Session::open(&config)?;
    let currency = config.currency_symbol.as_str();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::Add { kind } => match kind {
            AddKind::Timer { name, seconds } => {
                station::add_timer(&mut out, &mut session.ledger, name, seconds)?;
            }
            AddKind::Stopwatch { name } => {
                station::add_stopwatch(&mut out, &mut session.ledger, name)?;
            }
        },
        Commands::Start { target } => control::start(&mut out, &mut session.ledger, &target)?,
        Commands::Pause { target } => control::pause(&mut out, &mut session.ledger, &target)?,
        Commands::Reset { target } => {
            control::reset(&mut out, &mut session.ledger, currency, &target)?;
        }
        Commands::Lap { target } => control::lap(&mut out, &mut session.ledger, &target)?,
        Commands::Rename { target, name } => {
            station::rename(&mut out, &mut session.ledger, &target, &name)?;
        }
        Commands::SetDuration { target, seconds } => {
            station::set_duration(&mut out, &mut session.ledger, &target, seconds)?;
        }
        Commands::Assign {
            target,
            preset,
            clear: _,
        } => {
            station::assign(&mut out, &mut session.ledger, &target, preset.as_deref())?;
        }
        Commands::Rm { target } => {
            station::remove(&mut out, &mut session.ledger, currency, &target)?;
        }
        Commands::Status { json } => status::run(&mut out, &session.ledger, currency, json)?,
        Commands::Bill => {
            let now = session.now();
            bill::run(&mut out, &mut session.ledger, currency, now)?;
        }
        Commands::History { clear, yes: _ } => {
            history::run(&mut out, &mut session.ledger, currency, clear)?;
        }
        Commands::Preset { action } => match action {
            PresetAction::List => preset::list(&mut out, &session.ledger, currency)?,
            PresetAction::Add {
                name,
                cost,
                minutes,
            } => preset::add(&mut out, &mut session.ledger, name, cost, minutes)?,
            PresetAction::Update {
                target,
                name,
                cost,
                minutes,
            } => preset::update(&mut out, &mut session.ledger, &target, name, cost, minutes)?,
            PresetAction::Rm { target } => preset::remove(&mut out, &mut session.ledger, &target)?,
        },
        Commands::Rate { cost, minutes } => {
            rate::run(&mut out, &mut session.ledger, currency, cost, minutes)?;
        }
    }

    // Persist the post-command state along with the catch-up timestamp.
    // Best-effort by design: a failed write warns and the command still
    // counts as done.
    session.save();

    Ok(())
}
