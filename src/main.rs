//! Connect Four terminal host
//!
//! Play against the engine on stdin/stdout, or watch it play itself.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::trace;

use connect_four::{EngineConfig, GameSession, Player, COLUMNS};

#[derive(Parser, Debug)]
#[command(author, version, about = "Connect Four (7x7) against a search engine", long_about = None)]
struct Args {
    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search depth hint, clamped to the configured range
    #[arg(short, long, default_value_t = 9)]
    depth: i32,

    /// Let the engine move first
    #[arg(long)]
    engine_first: bool,

    /// Engine plays both sides
    #[arg(long)]
    self_play: bool,

    /// Print a default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    if args.print_config {
        print!("{}", EngineConfig::default_toml());
        return Ok(());
    }

    anyhow::ensure!(args.depth > 0, "--depth must be positive");

    let config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let engine_player = if args.engine_first {
        Player::One
    } else {
        Player::Two
    };
    let mut session = GameSession::new(config).with_engine_player(engine_player);
    run(&mut session, &args)
}

fn run(session: &mut GameSession, args: &Args) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{}\n", session.board());
    while !session.is_over() {
        let mover = session.to_move();

        if args.self_play || mover == session.engine_player() {
            session.set_engine_player(mover);
            let reply = session
                .choose_move_with_progress(args.depth, &mut |col| trace!("searching column {col}"))?;
            let r = &reply.result;
            println!(
                "{} plays column {} ({:?}, score {}, depth {}, {} nodes, {} ms)",
                symbol(mover),
                r.column,
                r.kind,
                r.score,
                r.depth,
                r.nodes,
                r.time_ms
            );
            if reply.win_is_forced {
                println!("{} has a forced win", symbol(mover));
            } else if reply.loss_unavoidable {
                println!("{} cannot avoid losing", symbol(mover));
            }
        } else {
            print!("{} to move, column 0-{} (q to quit): ", symbol(mover), COLUMNS - 1);
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                return Ok(());
            };
            let line = line?;
            let input = line.trim();
            if input == "q" {
                return Ok(());
            }
            let column = match input.parse::<usize>() {
                Ok(c) if c < COLUMNS => c,
                _ => {
                    println!("enter a column between 0 and {}", COLUMNS - 1);
                    continue;
                }
            };
            if session.submit_move(mover, column).placement.is_none() {
                println!("column {column} is full");
                continue;
            }
        }

        println!("{}\n", session.board());
    }

    match session.board().winner() {
        Some(winner) => {
            let cells = session
                .board()
                .winning_cells()
                .map(|cells| {
                    cells
                        .iter()
                        .map(|c| format!("({},{})", c.column, c.row))
                        .collect::<Vec<_>>()
                        .join(" ")
                })
                .unwrap_or_default();
            println!("{} wins: {cells}", symbol(winner));
        }
        None => println!("draw"),
    }
    Ok(())
}

fn symbol(player: Player) -> char {
    match player {
        Player::One => 'X',
        Player::Two => 'O',
    }
}
