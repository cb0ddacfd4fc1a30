//! Checkers-MCTS command-line front end.
//!
//! ## Usage
//!
//! - `checkers-mcts move --board <cells> --color b` - Print the engine's move
//! - `checkers-mcts selfplay` - Let two agents play a full game
//!
//! Set `RUST_LOG=debug` to see search statistics.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use log::info;

use checkers_mcts::board::{Board, Color};
use checkers_mcts::checkers::{Checkers, GameState, Outcome};
use checkers_mcts::constants::{
    DEFAULT_AMAF_BIAS, DEFAULT_BOARD_SIZE, DEFAULT_EXPLORATION, DEFAULT_KING_BONUS,
    DEFAULT_ROLLOUT_EPSILON, DEFAULT_SIM_TIME,
};
use checkers_mcts::mcts::{MonteCarloAgent, SearchConfig};

/// Checkers-MCTS: a checkers engine driven by Monte Carlo Tree Search
#[derive(Parser)]
#[command(name = "checkers-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a move for the given position
    Move {
        /// Board cells in row-major order (`_`, `b`, `B`, `w`, `W`; whitespace ignored)
        #[arg(long)]
        board: String,
        /// Side to move (`b` or `w`)
        #[arg(long, default_value = "b")]
        color: String,
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,
        /// Consecutive non-capturing moves already played
        #[arg(long, default_value_t = 0)]
        shift_count: u32,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play a game between two agents from the starting position
    Selfplay {
        #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,
        /// Stop after this many plies
        #[arg(long, default_value_t = 200)]
        max_plies: usize,
        #[command(flatten)]
        search: SearchArgs,
    },
}

#[derive(Args, Clone)]
struct SearchArgs {
    /// Search time per move, in seconds
    #[arg(long, default_value_t = DEFAULT_SIM_TIME)]
    sim_time: f64,
    /// UCB exploration constant
    #[arg(long, default_value_t = DEFAULT_EXPLORATION)]
    exploration: f64,
    /// AMAF bias constant
    #[arg(long, default_value_t = DEFAULT_AMAF_BIAS)]
    amaf_bias: f64,
    /// King value used by the rollout evaluator
    #[arg(long, default_value_t = DEFAULT_KING_BONUS)]
    king_bonus: i32,
    /// Probability of a greedy rollout move
    #[arg(long, default_value_t = DEFAULT_ROLLOUT_EPSILON)]
    epsilon: f64,
    /// Select with plain UCB1, ignoring AMAF statistics
    #[arg(long)]
    no_amaf: bool,
    /// Seed for the search RNG
    #[arg(long)]
    seed: Option<u64>,
}

impl SearchArgs {
    fn to_config(&self) -> Result<SearchConfig> {
        if !self.sim_time.is_finite() || self.sim_time < 0.0 {
            bail!("--sim-time must be a non-negative number of seconds");
        }
        let mut config = SearchConfig::default()
            .with_sim_time(Duration::from_secs_f64(self.sim_time))
            .with_exploration(self.exploration)
            .with_amaf_bias(self.amaf_bias)
            .with_king_bonus(self.king_bonus)
            .with_rollout_epsilon(self.epsilon)
            .with_amaf(!self.no_amaf);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Move {
            board,
            color,
            size,
            shift_count,
            search,
        }) => run_move(&board, &color, size, shift_count, &search),
        Some(Commands::Selfplay {
            size,
            max_plies,
            search,
        }) => run_selfplay(size, max_plies, &search),
        None => run_selfplay(DEFAULT_BOARD_SIZE, 200, &demo_args()),
    }
}

fn demo_args() -> SearchArgs {
    SearchArgs {
        sim_time: 0.5,
        exploration: DEFAULT_EXPLORATION,
        amaf_bias: DEFAULT_AMAF_BIAS,
        king_bonus: DEFAULT_KING_BONUS,
        epsilon: DEFAULT_ROLLOUT_EPSILON,
        no_amaf: false,
        seed: None,
    }
}

fn run_move(board: &str, color: &str, size: usize, shift_count: u32, search: &SearchArgs) -> Result<()> {
    let board = Board::parse(size, board).context("invalid --board")?;
    let color = Color::parse(color).context("invalid --color")?;
    let state = GameState::new(board, color);

    let mut agent = MonteCarloAgent::new(
        color,
        Checkers::with_shift_count(shift_count),
        search.to_config()?,
    );
    let mv = agent.play(&state).context("cannot choose a move")?;
    println!("{mv}");
    Ok(())
}

fn run_selfplay(size: usize, max_plies: usize, search: &SearchArgs) -> Result<()> {
    let config = search.to_config()?;
    let mut state = GameState::new(Board::initial(size)?, Color::Black);
    let mut agents = [
        MonteCarloAgent::new(Color::Black, Checkers::new(), config.clone()),
        MonteCarloAgent::new(Color::White, Checkers::new(), config),
    ];

    println!("{}", state.board);
    for ply in 1..=max_plies {
        if let Some(outcome) = agents[state.to_move.index()].checkers().end_game(&state) {
            report(outcome, ply - 1);
            return Ok(());
        }

        let mover = state.to_move.index();
        let mv = agents[mover].play(&state)?;
        // Keep the other agent's shift counter in step with the real game.
        agents[1 - mover].checkers_mut().update_shift_count(&mv);

        info!("ply {ply}: {} plays {mv}", state.to_move);
        println!("{ply}. {} {mv}", state.to_move);
        state.apply(&mv);
        println!("{}", state.board);
    }

    println!("No result after {max_plies} plies");
    Ok(())
}

fn report(outcome: Outcome, plies: usize) {
    match outcome {
        Outcome::Winner(color) => println!("{color} wins after {plies} plies"),
        Outcome::Draw => println!("Draw after {plies} plies"),
    }
    info!("game over: {outcome:?}");
}
