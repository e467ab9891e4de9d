//! Command-line interface for the candy exchange simulation.

use candy_exchange::GameConfig;
use candy_exchange::types::CandyKind;
use lexopt::prelude::*;
use std::path::PathBuf;

/// Command-line arguments for the simulation.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub command: Command,
    pub preset: String,
    pub config_file: Option<PathBuf>,
    pub save_config: Option<PathBuf>,
    pub players: Option<usize>,
    pub manual_players: Vec<String>,
    pub group_size: Option<usize>,
    pub candies_per_player: Option<usize>,
    pub quota: Vec<(CandyKind, u32)>,
    pub time_limit: Option<u32>,
    pub tick_ms: Option<u64>,
    pub random_seed: Option<u64>,
    pub realtime: bool,
    pub debug: bool,
    pub verbose: bool,
    pub quiet: bool,
    pub output_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    Live,
    Presets,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            command: Command::Run,
            preset: "classic".to_string(),
            config_file: None,
            save_config: None,
            players: None,
            manual_players: Vec::new(),
            group_size: None,
            candies_per_player: None,
            quota: Vec::new(),
            time_limit: None,
            tick_ms: None,
            random_seed: None,
            realtime: false,
            debug: false,
            verbose: false,
            quiet: false,
            output_file: None,
        }
    }
}

pub fn parse_args() -> Result<CliArgs, lexopt::Error> {
    parse_from(lexopt::Parser::from_env())
}

fn parse_from(mut args: lexopt::Parser) -> Result<CliArgs, lexopt::Error> {
    let mut cli_args = CliArgs::default();
    let mut subcommand = None;

    while let Some(arg) = args.next()? {
        match arg {
            Value(val) if subcommand.is_none() => subcommand = Some(val.string()?),
            Long("preset") => cli_args.preset = args.value()?.string()?,
            Long("config") | Short('c') => {
                cli_args.config_file = Some(PathBuf::from(args.value()?.string()?));
            }
            Long("save-config") => {
                cli_args.save_config = Some(PathBuf::from(args.value()?.string()?));
            }
            Long("players") | Short('n') => cli_args.players = Some(args.value()?.parse()?),
            Long("player") | Short('p') => {
                cli_args.manual_players.push(args.value()?.string()?);
            }
            Long("group-size") => cli_args.group_size = Some(args.value()?.parse()?),
            Long("candies") => cli_args.candies_per_player = Some(args.value()?.parse()?),
            Long("quota") => {
                let value = args.value()?.string()?;
                cli_args.quota.push(parse_quota(&value)?);
            }
            Long("time-limit") | Short('t') => cli_args.time_limit = Some(args.value()?.parse()?),
            Long("tick-ms") => cli_args.tick_ms = Some(args.value()?.parse()?),
            Long("seed") => cli_args.random_seed = Some(args.value()?.parse()?),
            Long("realtime") => cli_args.realtime = true,
            Long("debug") => cli_args.debug = true,
            Long("verbose") | Short('v') => cli_args.verbose = true,
            Long("quiet") | Short('q') => cli_args.quiet = true,
            Long("output") | Short('o') => {
                cli_args.output_file = Some(PathBuf::from(args.value()?.string()?));
            }
            Long("help") | Short('h') => {
                print_help();
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    cli_args.command = match subcommand.as_deref() {
        Some("run") | None => Command::Run,
        Some("live") => Command::Live,
        Some("presets") => Command::Presets,
        Some(cmd) => return Err(lexopt::Error::from(format!("unknown command: {}", cmd))),
    };

    Ok(cli_args)
}

/// Parse `kind=count`, e.g. `lemon=2`.
fn parse_quota(arg: &str) -> Result<(CandyKind, u32), lexopt::Error> {
    let (kind, count) = arg
        .split_once('=')
        .ok_or_else(|| lexopt::Error::from(format!("quota must look like kind=count: {}", arg)))?;
    let kind = CandyKind::from_str(kind.trim())
        .ok_or_else(|| lexopt::Error::from(format!("unknown candy kind: {}", kind)))?;
    let count = count
        .trim()
        .parse()
        .map_err(|_| lexopt::Error::from(format!("invalid quota count: {}", count)))?;
    Ok((kind, count))
}

/// Apply CLI overrides on top of a preset or config file.
pub fn apply_overrides(config: &mut GameConfig, args: &CliArgs) {
    if let Some(size) = args.group_size {
        config.group_size = size;
    }
    if let Some(candies) = args.candies_per_player {
        config.candies_per_player = candies;
    }
    if !args.quota.is_empty() {
        config.quota = candy_exchange::inventory::Quota::new(args.quota.iter().copied());
    }
    if let Some(secs) = args.time_limit {
        config.time_limit_secs = secs;
    }
    if let Some(ms) = args.tick_ms {
        config.exchange_period_ms = ms;
    }
    if let Some(seed) = args.random_seed {
        config.random_seed = Some(seed);
    }
    if let Some(players) = args.players {
        config.max_players = config.max_players.max(players);
    }
}

fn print_help() {
    println!("\nCandy Exchange Simulation\n");
    println!("USAGE:");
    println!("    candy-exchange-sim [COMMAND] [OPTIONS]\n");

    println!("COMMANDS:");
    println!("    run              Play one game and print the results (default)");
    println!("    live             Play in a terminal view in real time");
    println!("    presets          List built-in presets\n");

    println!("GAME OPTIONS:");
    println!("    --preset <NAME>            Built-in preset (default: classic)");
    println!("    -c, --config <FILE>        Load config from JSON or YAML");
    println!("    --save-config <FILE>       Write the effective config and exit");
    println!("    -n, --players <N>          Number of generated players");
    println!("    -p, --player <NAME>        Add a player with random candies (repeatable)");
    println!("    --group-size <N>           Players per group");
    println!("    --candies <N>              Candies per player");
    println!("    --quota <KIND=N>           Group quota, e.g. --quota lemon=2 (repeatable)");
    println!("    -t, --time-limit <SECS>    Game clock in seconds");
    println!("    --tick-ms <MS>             Exchange period in milliseconds");
    println!("    --seed <N>                 Random seed for reproducible runs\n");

    println!("OUTPUT OPTIONS:");
    println!("    --realtime                 Run on the wall clock instead of fast-forwarding");
    println!("    -o, --output <FILE>        Write all events to a JSON file");
    println!("    --debug                    Enable debug output");
    println!("    -v, --verbose              Enable verbose output");
    println!("    -q, --quiet                Suppress non-essential output");
    println!("    -h, --help                 Print help information\n");

    println!("LIVE CONTROLS:");
    println!("    S                Start");
    println!("    X                Stop");
    println!("    G                Generate players");
    println!("    R                Reset");
    println!("    Q                Quit\n");

    println!("EXAMPLES:");
    println!("    candy-exchange-sim run --seed 42 -o events.json");
    println!("    candy-exchange-sim live --preset quick");
}
