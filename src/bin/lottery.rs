//! Lottery Binary
//!
//! Win chances of the buckets lottery: single values, sweep tables, SVG
//! charts and Monte Carlo checks.

use std::iter::once;
use std::path::PathBuf;

use anyhow::Context;
use bucket_lottery::print::PrintExt;
use bucket_lottery::render::Renderer;
use bucket_lottery::{Approx, BoundaryPolicy, Count, Lottery, SweepConfig};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true, help = "Log sweep details")]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Win chance at one separator rank, or averaged over all ranks",
        alias = "c"
    )]
    Chance {
        #[command(flatten)]
        lottery: LotteryArgs,
        #[arg(short = 'm', long)]
        position: Option<Count>,
    },
    #[command(
        about = "Average win chance and derived series over the adversary sweep",
        alias = "t"
    )]
    Table {
        #[arg(short = 'n', long, default_value_t = 100)]
        total: Count,
        #[arg(long, help = "Print the fixed separator rank curves instead")]
        fixed: bool,
        #[command(flatten)]
        sweep: SweepArgs,
    },
    #[command(about = "Render the sweep charts as SVG files", alias = "p")]
    Plot {
        #[arg(short = 'n', long = "total", default_values_t = [100, 1000])]
        totals: Vec<Count>,
        #[arg(short, long, default_value = "plots")]
        out: PathBuf,
        #[command(flatten)]
        sweep: SweepArgs,
    },
    #[command(
        about = "Monte Carlo estimate of the win chance next to the formula",
        alias = "s"
    )]
    Simulate {
        #[command(flatten)]
        lottery: LotteryArgs,
        #[arg(short = 'm', long)]
        position: Option<Count>,
        #[arg(long)]
        samples: Option<u32>,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct LotteryArgs {
    #[arg(short = 'n', long)]
    total: Count,
    #[arg(short = 'k', long)]
    adversaries: Count,
    #[arg(long, default_value_t = BoundaryPolicy::default())]
    policy: BoundaryPolicy,
}

#[derive(Args)]
struct SweepArgs {
    #[arg(long)]
    max_ratio: Option<f64>,
    #[arg(long, value_delimiter = ',')]
    positions: Option<Vec<f64>>,
    #[arg(long, value_delimiter = ',')]
    highlights: Option<Vec<Count>>,
    #[arg(long)]
    plot_limit: Option<Count>,
    #[arg(long, default_value_t = BoundaryPolicy::default())]
    policy: BoundaryPolicy,
}

impl LotteryArgs {
    fn lottery(&self) -> anyhow::Result<Lottery> {
        let lottery = Lottery::new(self.total, self.adversaries)
            .with_context(|| format!("N={} k={}", self.total, self.adversaries))?;
        Ok(lottery.with_policy(self.policy))
    }
}

impl SweepArgs {
    fn config(self) -> SweepConfig {
        SweepConfig::builder()
            .maybe_max_adversary_ratio(self.max_ratio)
            .maybe_position_fractions(self.positions)
            .maybe_highlights(self.highlights)
            .maybe_plot_limit(self.plot_limit)
            .policy(self.policy)
            .build()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    bucket_lottery::log(cli.verbose)?;
    match cli.command {
        Command::Chance { lottery, position } => chance(&lottery.lottery()?, position),
        Command::Table {
            total,
            fixed,
            sweep,
        } => table(total, fixed, sweep.config()),
        Command::Plot { totals, out, sweep } => plot(&totals, out, sweep.config()),
        Command::Simulate {
            lottery,
            position,
            samples,
            seed,
        } => simulate(&lottery.lottery()?, position, samples, seed),
    }
}

fn chance(lottery: &Lottery, position: Option<Count>) -> anyhow::Result<()> {
    let (n, k, policy) = (lottery.total(), lottery.adversaries(), lottery.policy());
    match position {
        Some(m) => {
            let p = lottery.win_chance(m)?;
            println!("N={n} k={k} m={m} ({policy}): {p:.9}");
        }
        None => {
            let p = lottery.average_win_chance();
            println!("N={n} k={k} average ({policy}): {p:.9}");
        }
    }
    Ok(())
}

fn table(total: Count, fixed: bool, config: SweepConfig) -> anyhow::Result<()> {
    let curves = if fixed {
        config.fixed_position_curves(total)?
    } else {
        let average = config.average_curve(total)?;
        let derived = [
            average.loss_win_ratio(),
            average.win_per_adversary(),
            average.increments(),
        ];
        once(average).chain(derived).collect()
    };
    curves.print_table();
    Ok(())
}

fn plot(totals: &[Count], out: PathBuf, config: SweepConfig) -> anyhow::Result<()> {
    let renderer = Renderer::new(out, config);
    for &total in totals {
        log::info!("{:<32}{}", "rendering charts", total);
        let paths = renderer
            .render(total)
            .with_context(|| format!("rendering N={total}"))?;
        log::info!(
            "{:<32}{} files in {}",
            "rendered",
            paths.len(),
            renderer.out_dir().display()
        );
    }
    Ok(())
}

fn simulate(
    lottery: &Lottery,
    position: Option<Count>,
    samples: Option<u32>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut approx = Approx::builder().maybe_sample_size(samples).build(rng);
    let (estimate, formula) = match position {
        Some(m) => (approx.win_chance(lottery, m)?, lottery.win_chance(m)?),
        None => (
            approx.average_win_chance(lottery),
            lottery.average_win_chance(),
        ),
    };
    println!(
        "N={} k={} samples={}: estimate {estimate:.6} formula {formula:.6} diff {:.2e}",
        lottery.total(),
        lottery.adversaries(),
        approx.sample_size(),
        (estimate - formula).abs()
    );
    Ok(())
}
