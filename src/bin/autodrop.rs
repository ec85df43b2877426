use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::Serialize;

use autodrop_engine::{GeneratorKind, SimConfig};
use autodrop_eval::Weights;
use autodrop_search::ExhaustiveSearch;
use autodrop_sim::{run_batch, seed_range, BatchReport, RunOutcome, Simulation};

/// Pieces between progress bar updates.
const PROGRESS_EVERY: u64 = 4096;

#[derive(Debug, Parser)]
#[command(name = "autodrop", about = "Self-playing falling-block simulation")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Play one game and report pieces placed and lines cleared
    Verify {
        #[command(flatten)]
        game: GameArgs,
        /// Piece generator seed (default 12345)
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many pieces (default 1000000)
        #[arg(long)]
        limit: Option<u64>,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
        /// Suppress the progress bar and timing line
        #[arg(long)]
        quiet: bool,
    },
    /// Play several seeds in parallel
    Batch {
        #[command(flatten)]
        game: GameArgs,
        /// Number of runs
        #[arg(long)]
        seeds: usize,
        /// Seed of the first run; run i uses base_seed + i
        #[arg(long)]
        base_seed: Option<u64>,
        /// Per-run piece budget
        #[arg(long)]
        limit: Option<u64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play some pieces, then show how the next landing is chosen
    Explain {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long)]
        seed: Option<u64>,
        /// Pieces to play before explaining
        #[arg(long, default_value_t = 10)]
        pieces: u64,
        /// Candidates to list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

#[derive(Debug, Args)]
struct GameArgs {
    /// JSON run configuration; the flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,
    /// Board width in cells
    #[arg(long)]
    width: Option<usize>,
    /// Board height in cells
    #[arg(long)]
    height: Option<usize>,
    /// Draw pieces from a shuffled 7-bag instead of the plain LCG
    #[arg(long)]
    bag: bool,
    /// Six comma-separated evaluator weights
    #[arg(long, allow_hyphen_values = true, conflicts_with = "weights_file")]
    weights: Option<Weights>,
    /// JSON file holding a six-element weight array
    #[arg(long)]
    weights_file: Option<PathBuf>,
}

impl GameArgs {
    fn sim_config(&self, seed: Option<u64>, limit: Option<u64>) -> Result<SimConfig> {
        let mut cfg = match &self.config {
            Some(path) => read_json(path)?,
            None => SimConfig::reference(),
        };
        if let Some(width) = self.width {
            cfg.width = width;
        }
        if let Some(height) = self.height {
            cfg.height = height;
        }
        if let Some(seed) = seed {
            cfg.seed = seed;
        }
        if let Some(limit) = limit {
            cfg.piece_limit = limit;
        }
        if self.bag {
            cfg.generator = GeneratorKind::SevenBag;
        }
        cfg.validate().context("invalid board configuration")?;
        Ok(cfg)
    }

    fn weights(&self) -> Result<Weights> {
        match (&self.weights, &self.weights_file) {
            (Some(weights), _) => Ok(*weights),
            (None, Some(path)) => read_json(path),
            (None, None) => Ok(Weights::REFERENCE),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

#[derive(Serialize)]
struct VerifyReport<'a> {
    config: &'a SimConfig,
    weights: Weights,
    outcome: RunOutcome,
    elapsed_secs: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Verify {
            game,
            seed,
            limit,
            json,
            quiet,
        } => verify(&game, seed, limit, json, quiet),
        Cmd::Batch {
            game,
            seeds,
            base_seed,
            limit,
            json,
        } => batch(&game, seeds, base_seed, limit, json),
        Cmd::Explain {
            game,
            seed,
            pieces,
            top,
        } => explain(&game, seed, pieces, top),
    }
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{bar:40.cyan/blue} {pos:>9}/{len:<9}  {percent:>3}%  {elapsed_precise}  {msg}",
        )?
        .progress_chars("=>-"),
    );
    Ok(pb)
}

fn verify(
    game: &GameArgs,
    seed: Option<u64>,
    limit: Option<u64>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let cfg = game.sim_config(seed, limit)?;
    let weights = game.weights()?;
    let mut sim = Simulation::from_config(&cfg, &weights)?;

    let pb = if quiet || json {
        None
    } else {
        Some(progress_bar(cfg.piece_limit)?)
    };

    let start = Instant::now();
    let mut pending = 0u64;
    let outcome = sim.run_observed(cfg.piece_limit, |_| {
        pending += 1;
        if pending == PROGRESS_EVERY {
            if let Some(pb) = &pb {
                pb.inc(pending);
            }
            pending = 0;
        }
    });
    let elapsed = start.elapsed();
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if json {
        let report = VerifyReport {
            config: &cfg,
            weights,
            outcome,
            elapsed_secs: elapsed.as_secs_f64(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if let Some(spawned) = outcome.game_over_after() {
        println!("Game over after {} pieces", spawned);
    }
    println!(
        "Total pieces: {}, Total lines cleared: {}",
        outcome.pieces, outcome.lines_cleared
    );
    if !quiet {
        let secs = elapsed.as_secs_f64().max(1e-6);
        println!(
            "Time: {:.3}s ({:.0} pieces/sec)",
            secs,
            outcome.pieces as f64 / secs
        );
    }
    Ok(())
}

fn batch(
    game: &GameArgs,
    seeds: usize,
    base_seed: Option<u64>,
    limit: Option<u64>,
    json: bool,
) -> Result<()> {
    let base = game.sim_config(base_seed, limit)?;
    let weights = game.weights()?;
    let specs = seed_range(&base, base.seed, seeds);

    let spinner = if json {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::with_template("{spinner} {elapsed_precise} | {msg}")?);
        pb.set_message(format!("{} runs of {} pieces", specs.len(), base.piece_limit));
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let start = Instant::now();
    let outcomes = run_batch(&specs, &weights)?;
    let elapsed = start.elapsed();
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let report = BatchReport::new(&specs, &outcomes);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for (seed, outcome) in &report.runs {
        let end = if outcome.topped_out() { "  (top-out)" } else { "" };
        println!(
            "seed {:>10}: pieces {:>9}  lines {:>9}{}",
            seed, outcome.pieces, outcome.lines_cleared, end
        );
    }
    println!(
        "Mean lines cleared: {:.1} over {} runs, {} top-outs, {:.3}s",
        report.mean_lines,
        report.runs.len(),
        report.top_outs,
        elapsed.as_secs_f64()
    );
    Ok(())
}

fn explain(game: &GameArgs, seed: Option<u64>, pieces: u64, top: usize) -> Result<()> {
    let cfg = game.sim_config(seed, None)?;
    let weights = game.weights()?;
    let mut sim = Simulation::from_config(&cfg, &weights)?;
    let played = sim.run(pieces);

    if let Some(spawned) = played.game_over_after() {
        println!("Game over after {} pieces", spawned);
        println!("{}", sim.board());
        return Ok(());
    }

    println!(
        "After {} pieces ({} lines cleared), placing {} (next {}):",
        played.pieces,
        played.lines_cleared,
        sim.current_kind(),
        sim.next_kind()
    );
    println!("{}", sim.board());

    let search = ExhaustiveSearch::new(&weights);
    for (rank, c) in search
        .find_top_placements(sim.board(), sim.current_kind(), top)
        .iter()
        .enumerate()
    {
        let (p, f) = (&c.placement, &c.features);
        println!(
            "{:>2}. rot {} x {:>2} y {:>2}  score {:>10.3} | landing {:>4.1} lines {} \
             row-tr {:>3} col-tr {:>3} holes {:>3} wells {:>3}",
            rank + 1,
            p.rotation,
            p.x,
            p.y,
            p.score,
            f.landing_height,
            f.melted,
            f.row_transitions,
            f.column_transitions,
            f.holes,
            f.well_sums
        );
    }
    Ok(())
}
