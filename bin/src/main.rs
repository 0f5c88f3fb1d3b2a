use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use gr_core::data;
use gr_core::{
    compare_str, Coordinator, EngineConfig, HintsN, RoundOutcome, Session, Target, Variant,
    VariantConfig, VariantRegistry, Vocabulary, WeightSource,
};
use guess_rank_core as gr_core;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(version, about = "Ranks guesses for Wordle-style games by expected information")]
struct Cli {
    /// Game variant
    #[arg(short, long, global = true, default_value_t = Variant::Engwordle)]
    variant: Variant,

    /// Worker threads for large vocabularies (default: all cores)
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Vocabularies larger than this are refreshed in parallel
    #[arg(long, global = true, default_value_t = EngineConfig::default().parallel_threshold)]
    parallel_threshold: usize,

    /// Abort a distribution pass taking longer than this many seconds
    #[arg(long, global = true)]
    deadline_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute information for a word list and save it as a table
    Build {
        /// `Word,Points` csv or a plain list of words
        #[arg(long)]
        input: PathBuf,
        /// Defaults to `<variant>.csv`
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the best guesses of a table
    Rank {
        #[arg(long)]
        table: Option<PathBuf>,
        #[arg(short, default_value_t = 10)]
        k: usize,
    },
    /// Narrow a table down with rounds already played, e.g. `crane=00120`
    Assist {
        #[arg(long)]
        table: Option<PathBuf>,
        #[arg(short, default_value_t = 10)]
        k: usize,
        rounds: Vec<String>,
    },
    /// Let the engine play against a hidden word
    Solve {
        #[arg(long)]
        table: Option<PathBuf>,
        /// Drawn at random by weight when omitted
        #[arg(long)]
        target: Option<String>,
    },
    /// Print the feedback pattern of a guess against a solution
    Feedback { guess: String, solution: String },
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            parallel_threshold: self.parallel_threshold,
            workers: self.workers,
            deadline: self.deadline_secs.map(Duration::from_secs),
            ..EngineConfig::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let registry = VariantRegistry::builtin();
    let variant = registry
        .get(cli.variant)
        .ok_or_else(|| anyhow!("variant {} is not registered", cli.variant))?;
    let config = cli.engine_config();

    match variant.length {
        5 => run::<5>(&cli.command, variant, &config),
        8 => run::<8>(&cli.command, variant, &config),
        n => bail!("words of length {n} are not supported"),
    }
}

fn run<const N: usize>(command: &Command, variant: &VariantConfig, config: &EngineConfig) -> Result<()> {
    let table_path = |table: &Option<PathBuf>| {
        table
            .clone()
            .unwrap_or_else(|| PathBuf::from(variant.table_file()))
    };

    match command {
        Command::Build { input, output } => {
            let mut rows = data::load_words(input)
                .with_context(|| format!("reading {}", input.display()))?;
            if variant.weight_source == WeightSource::Uniform {
                rows.iter_mut().for_each(|row| row.points = 1.);
            }

            let mut vocabulary = Vocabulary::<N>::from_rows(variant.alphabet()?, rows)?;
            refresh_with_progress(&mut vocabulary, config)?;

            let output = table_path(output);
            data::save_table(&output, &vocabulary.rows())?;
            info!("Saved {} words to {}", vocabulary.len(), output.display());
        }
        Command::Rank { table, k } => {
            let vocabulary = load::<N>(&table_path(table), variant)?;
            print!("{}", vocabulary.summary(*k));
        }
        Command::Assist { table, k, rounds } => {
            let vocabulary = load::<N>(&table_path(table), variant)?;
            let mut session = Session::new(vocabulary, variant.tryouts, Target::None);

            for round in rounds {
                let (guess, hints) = round
                    .split_once('=')
                    .ok_or_else(|| anyhow!("round \"{round}\" is not of the form word=pattern"))?;
                let guess = session.vocabulary().alphabet().parse::<N>(guess)?;
                let hints = HintsN::<N>::from_str(hints)?;

                match session.play_round(guess, hints, config)? {
                    RoundOutcome::Solved { turns } => {
                        println!("Solved in {turns} turns");
                        return Ok(());
                    }
                    RoundOutcome::OutOfTries => {
                        println!("No tries left");
                        return Ok(());
                    }
                    RoundOutcome::Continue { .. } => {}
                }
            }
            print!("{}", session.vocabulary().summary(*k));
        }
        Command::Solve { table, target } => {
            let vocabulary = load::<N>(&table_path(table), variant)?;
            let target = match target {
                Some(target) => vocabulary.alphabet().parse::<N>(target)?,
                None => {
                    let weights = WeightedIndex::new(vocabulary.records().iter().map(|r| r.weight()))?;
                    *vocabulary.records()[weights.sample(&mut thread_rng())].word()
                }
            };
            let mut session = Session::new(vocabulary, variant.tryouts, Target::Known(target));

            loop {
                let guess = *session
                    .suggestion()
                    .ok_or_else(|| anyhow!("no candidates left"))?
                    .word();
                let hints = session.feedback_for(&guess)?;
                println!("{guess} {hints}");

                match session.play_round(guess, hints, config)? {
                    RoundOutcome::Solved { turns } => {
                        println!("Solved in {turns} turns");
                        break;
                    }
                    RoundOutcome::OutOfTries => {
                        println!("Out of tries, the word was {target}");
                        break;
                    }
                    RoundOutcome::Continue { remaining } => {
                        println!("{remaining} candidates left");
                    }
                }
            }
        }
        Command::Feedback { guess, solution } => {
            let hints = compare_str::<N>(guess, solution)?;
            println!(
                "{hints} {} code {}{}",
                hints.to_digits(),
                hints.to_ind(),
                if hints.is_solved() { " solved" } else { "" }
            );
        }
    }

    Ok(())
}

fn load<const N: usize>(path: &Path, variant: &VariantConfig) -> Result<Vocabulary<N>> {
    let rows = data::load_table(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Vocabulary::from_rows(variant.alphabet()?, rows)?)
}

fn refresh_with_progress<const N: usize>(
    vocabulary: &mut Vocabulary<N>,
    config: &EngineConfig,
) -> Result<()> {
    let bar = ProgressBar::new(vocabulary.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        "{bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]",
    )?);
    let mut monitor = |done: usize, _total: usize| bar.set_position(done as u64);

    let coordinator = Coordinator::from_config(config);
    vocabulary.refresh_with(config, &coordinator, Some(&mut monitor))?;
    bar.finish_and_clear();
    Ok(())
}
