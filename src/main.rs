mod cli;

use std::error::Error;
use std::time::{Duration, Instant};

use candy_exchange::config::create_standard_presets;
use candy_exchange::events::{Event, EventLogger, EventType};
use candy_exchange::{GameConfig, GameSession};
use cli::{CliArgs, Command};
use log::LevelFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let args = cli::parse_args()?;
    init_logging(&args);

    if args.command == Command::Presets {
        let mut presets: Vec<_> = create_standard_presets().into_values().collect();
        presets.sort_by(|a, b| a.name.cmp(&b.name));
        for preset in presets {
            println!("{}\n", preset);
        }
        return Ok(());
    }

    let config = load_config(&args)?;
    if let Some(path) = &args.save_config {
        config.save_to_file(path)?;
        println!("Config written to {}", path.display());
        return Ok(());
    }

    let mut session = GameSession::setup(config)?;
    let players = args.players.unwrap_or(session.config().max_players);
    session.generate_default_players(players)?;
    for name in &args.manual_players {
        session.add_random_player(name)?;
    }

    match args.command {
        Command::Live => candy_exchange::ui::run_live(session)?,
        _ => run_headless(session, &args)?,
    }
    Ok(())
}

fn init_logging(args: &CliArgs) {
    let level = if args.debug {
        LevelFilter::Debug
    } else if args.verbose {
        LevelFilter::Info
    } else if args.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_config(args: &CliArgs) -> Result<GameConfig, Box<dyn Error>> {
    let mut config = match &args.config_file {
        Some(path) => GameConfig::load_from_file(path)?,
        None => create_standard_presets()
            .remove(&args.preset)
            .ok_or_else(|| format!("unknown preset: {}", args.preset))?,
    };
    cli::apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn run_headless(mut session: GameSession, args: &CliArgs) -> Result<(), Box<dyn Error>> {
    let logger = EventLogger::shared();
    session.subscribe(EventLogger::observer(&logger));

    if !args.quiet {
        println!("{}\n", session.config());
        let verbose = args.verbose;
        session.subscribe(move |event: &Event| match &event.event_type {
            EventType::TradeCommitted { .. } | EventType::GroupCompleted { .. } => {
                println!("{}", event)
            }
            EventType::ClockTicked { .. } if verbose => println!("{}", event),
            EventType::GameStarted { .. } => println!("{}", event),
            _ => {}
        });
    }

    session.start()?;
    if args.realtime {
        run_realtime(&mut session);
    } else {
        session.run_until_ended();
    }

    if let Some(summary) = session.summary() {
        println!("\n{}", summary);
    }

    if let Some(path) = &args.output_file {
        let path = path.to_string_lossy();
        logger.borrow().save_to_file(&path)?;
        if !args.quiet {
            println!("\nEvents written to {}", path);
        }
    }
    Ok(())
}

/// Drive the session from the wall clock until it ends.
fn run_realtime(session: &mut GameSession) {
    let started = Instant::now();
    while let Some(due) = session.next_deadline() {
        let now = started.elapsed();
        if due > now {
            std::thread::sleep(due - now);
        }
        let behind = started.elapsed().saturating_sub(session.elapsed());
        session.advance(behind.max(Duration::from_millis(1)));
    }
}
