//! Wizard Extreme 自我對局工具
//!
//! 平行跑多場三局比賽，輸出 JSON 統計；可選擇把每一步寫成
//! length-delimited protobuf `Transition` 供訓練使用。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use dashmap::DashMap;
use prost::Message;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use wizard_env::driver::{run_match, DriverError, MatchResult, Seats};
use wizard_env::game::NUM_PLAYERS;
use wizard_env::policy::{GreedyPolicy, Policy, RandomPolicy};
use wizard_env::proto::Transition;
use wizard_env::service::env_spec;

#[derive(Parser)]
#[command(name = "wizard-env")]
#[command(about = "Self-play runner for the Wizard Extreme environment")]
struct Args {
    /// Number of matches to play
    #[arg(short, long, default_value = "100")]
    matches: u32,

    /// Base seed; match i uses seed + i
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Policy for all seats
    #[arg(long, conflicts_with_all = ["seat0", "seat1", "seat2"])]
    seats: Option<PolicyKind>,

    /// Policy for seat 0
    #[arg(long, default_value = "greedy")]
    seat0: PolicyKind,

    /// Policy for seat 1
    #[arg(long, default_value = "random")]
    seat1: PolicyKind,

    /// Policy for seat 2
    #[arg(long, default_value = "random")]
    seat2: PolicyKind,

    /// Write every transition as length-delimited protobuf
    #[arg(long)]
    trajectory: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum PolicyKind {
    Random,
    Greedy,
}

impl PolicyKind {
    fn build(self, seed: u64) -> Box<dyn Policy> {
        match self {
            PolicyKind::Random => Box::new(RandomPolicy::new(seed)),
            PolicyKind::Greedy => Box::new(GreedyPolicy),
        }
    }
}

#[derive(Debug, Default)]
struct SeatTally {
    wins: u32,
    total_score: i64,
}

#[derive(Serialize)]
struct SeatSummary {
    seat: usize,
    policy: PolicyKind,
    wins: u32,
    total_score: i64,
    mean_score: f64,
}

#[derive(Serialize)]
struct Summary {
    matches: u32,
    seed: u64,
    observation_size: i32,
    action_space: i32,
    encoding_version: u32,
    transitions: usize,
    seats: Vec<SeatSummary>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG 優先，否則預設只顯示 warn
    let level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let kinds: [PolicyKind; NUM_PLAYERS] = match args.seats {
        Some(kind) => [kind; NUM_PLAYERS],
        None => [args.seat0, args.seat1, args.seat2],
    };
    info!(matches = args.matches, seed = args.seed, ?kinds, "starting self-play");

    let tallies: DashMap<usize, SeatTally> = DashMap::new();
    let record = args.trajectory.is_some();

    let outcomes: Vec<(MatchResult, Vec<Transition>)> = (0..args.matches)
        .into_par_iter()
        .map(|i| -> Result<(MatchResult, Vec<Transition>), DriverError> {
            let seed = args.seed.wrapping_add(i as u64);
            let mut seats: Seats = std::array::from_fn(|seat| {
                kinds[seat].build(seed.wrapping_mul(NUM_PLAYERS as u64).wrapping_add(seat as u64))
            });

            let mut transitions = Vec::new();
            let result = run_match(seed, &mut seats, record.then_some(&mut transitions))?;
            info!(seed, winner = result.winner, totals = ?result.totals, "match finished");

            for seat in 0..NUM_PLAYERS {
                let mut tally = tallies.entry(seat).or_default();
                tally.total_score += result.totals[seat] as i64;
                if result.winner == seat {
                    tally.wins += 1;
                }
            }
            Ok((result, transitions))
        })
        .collect::<Result<_, DriverError>>()?;

    let mut written = 0;
    if let Some(path) = &args.trajectory {
        let mut writer = BufWriter::new(File::create(path)?);
        for transition in outcomes.iter().flat_map(|(_, t)| t) {
            writer.write_all(&transition.encode_length_delimited_to_vec())?;
            written += 1;
        }
        writer.flush()?;
        info!(path = %path.display(), written, "trajectory written");
    }

    let spec = env_spec();
    let matches = args.matches.max(1) as f64;
    let seats = (0..NUM_PLAYERS)
        .map(|seat| {
            let (wins, total_score) = tallies
                .get(&seat)
                .map(|t| (t.wins, t.total_score))
                .unwrap_or_default();
            SeatSummary {
                seat,
                policy: kinds[seat],
                wins,
                total_score,
                mean_score: total_score as f64 / matches,
            }
        })
        .collect();

    let summary = Summary {
        matches: args.matches,
        seed: args.seed,
        observation_size: spec
            .observation
            .as_ref()
            .and_then(|o| o.shape.first().copied())
            .unwrap_or_default(),
        action_space: spec.action_space,
        encoding_version: spec.version,
        transitions: written,
        seats,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
