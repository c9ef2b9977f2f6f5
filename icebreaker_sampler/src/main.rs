use clap::{Args, Parser, Subcommand};
use icebreaker_sampler::{
    create, next, pick_index, sample_n, SamplerConfig, SamplerResult, Seed, ShuffleStrategy,
};
use tracing_subscriber::EnvFilter;

/// Reproducible picks over a list of items.
///
/// Omitting `--seed` (or passing something non-numeric) uses a random seed,
/// which is printed so the run can be replayed.
#[derive(Debug, Parser)]
#[command(name = "icebreaker-sampler", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Pick one item.
    Pick(ItemArgs),
    /// Print the items in shuffled order.
    Shuffle {
        #[command(flatten)]
        items: ItemArgs,
        /// Use the unbiased Fisher-Yates shuffle instead of the legacy one.
        #[arg(long)]
        fisher_yates: bool,
    },
    /// Shuffle and keep the first N items.
    Sample {
        #[command(flatten)]
        items: ItemArgs,
        /// Defaults to MAX_EXAMPLES_PER_STYLE (3).
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Print raw draws in [0, 1).
    Floats {
        #[arg(long)]
        seed: Option<String>,
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,
    },
}

#[derive(Debug, Args)]
struct ItemArgs {
    #[arg(long)]
    seed: Option<String>,
    items: Vec<String>,
}

fn run(command: Command, config: &SamplerConfig) -> SamplerResult<Vec<String>> {
    match command {
        Command::Pick(args) => {
            let seed = Seed::resolve(args.seed.as_deref());
            let (index, _) = pick_index(create(seed.value()), args.items.len())?;
            Ok(vec![format!("seed {}", seed), args.items[index].clone()])
        }
        Command::Shuffle { items, fisher_yates } => {
            let seed = Seed::resolve(items.seed.as_deref());
            let strategy = if fisher_yates {
                ShuffleStrategy::FisherYates
            } else {
                config.shuffle_strategy
            };
            let (shuffled, _) = strategy.apply(create(seed.value()), &items.items);
            Ok(with_seed_line(seed, shuffled))
        }
        Command::Sample { items, count } => {
            let seed = Seed::resolve(items.seed.as_deref());
            let count = count.unwrap_or(config.max_examples_per_style);
            let (sampled, _) = sample_n(
                create(seed.value()),
                &items.items,
                count,
                config.shuffle_strategy,
            );
            Ok(with_seed_line(seed, sampled))
        }
        Command::Floats { seed, count } => {
            let seed = Seed::resolve(seed.as_deref());
            let mut state = create(seed.value());
            let mut lines = vec![format!("seed {}", seed)];
            for _ in 0..count {
                let (draw, next_state) = next(state);
                state = next_state;
                lines.push(draw.to_string());
            }
            Ok(lines)
        }
    }
}

fn with_seed_line(seed: Seed, items: Vec<String>) -> Vec<String> {
    std::iter::once(format!("seed {}", seed)).chain(items).collect()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = SamplerConfig::from_env();

    match run(cli.command, &config) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    }
}
