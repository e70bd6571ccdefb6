//! Main CLI application structure

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{optimize, plan};
use crate::search::{Algorithm, CapacityScheme, SharingPolicy};
use crate::storage::{Config, ProblemFile};

#[derive(Parser)]
#[command(name = "dayplan")]
#[command(author, version, about = "Day-by-day scheduling of dependent tasks under daily capacity")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured format, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the default locations
    #[arg(long, global = true, env = "DAYPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// How the channels of a query are set up
#[derive(Args, Debug, Clone, Default)]
pub struct CapacityArgs {
    /// Number of channels (overrides the file's N line)
    #[arg(long, short = 'n')]
    pub channels: Option<usize>,

    /// Daily capacity of every channel (overrides the file's K line)
    #[arg(long, short = 'k', conflicts_with_all = ["even_capacity", "odd_capacity"])]
    pub capacity: Option<u32>,

    /// Capacity of the channel for even-numbered tasks
    #[arg(long, requires = "odd_capacity", conflicts_with = "channels")]
    pub even_capacity: Option<u32>,

    /// Capacity of the channel for odd-numbered tasks
    #[arg(long, requires = "even_capacity")]
    pub odd_capacity: Option<u32>,

    /// Most tasks started per day across all channels
    #[arg(long)]
    pub tasks_per_day: Option<u32>,
}

impl CapacityArgs {
    /// Builds the scheme, falling back to the problem file's N and K lines
    pub fn scheme(&self, problem: &ProblemFile) -> Result<CapacityScheme> {
        let scheme = match (self.even_capacity, self.odd_capacity) {
            (Some(even), Some(odd)) => CapacityScheme::per_class(even, odd),
            _ => {
                let channels = self.channels.or(problem.channels).unwrap_or(1);
                let Some(capacity) = self.capacity.or(problem.capacity) else {
                    bail!(
                        "No capacity given: pass --capacity or add a 'K' line to the problem file"
                    );
                };
                CapacityScheme::uniform(channels, capacity)?
            }
        };
        Ok(scheme.with_tasks_per_day(self.tasks_per_day)?)
    }
}

/// Search behaviour, defaulting to the configuration
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// When other channels see finished work
    #[arg(long, short = 's')]
    pub sharing: Option<SharingPolicy>,

    /// Search strategy
    #[arg(long, short = 'a')]
    pub algorithm: Option<Algorithm>,
}

impl SearchArgs {
    pub fn sharing(&self, config: &Config) -> SharingPolicy {
        self.sharing.unwrap_or(config.search.sharing)
    }

    pub fn algorithm(&self, config: &Config) -> Algorithm {
        self.algorithm.unwrap_or(config.search.algorithm)
    }
}

/// Strategy for listing every schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EnumerationStrategy {
    #[default]
    Bfs,
    Dfs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List every valid schedule within a number of days
    Enumerate {
        /// Problem file
        file: PathBuf,

        /// Last day a task may be done on
        #[arg(long, short = 'd')]
        days: u32,

        #[command(flatten)]
        capacity: CapacityArgs,

        /// When other channels see finished work
        #[arg(long, short = 's')]
        sharing: Option<SharingPolicy>,

        /// Traversal order
        #[arg(long, value_enum, default_value_t = EnumerationStrategy::Bfs)]
        strategy: EnumerationStrategy,

        /// Also list schedules that leave capacity unused
        #[arg(long)]
        idle: bool,

        /// Stop after this many schedules
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Find the earliest day every task can be done
    Earliest {
        /// Problem file
        file: PathBuf,

        #[command(flatten)]
        capacity: CapacityArgs,

        #[command(flatten)]
        search: SearchArgs,

        /// Give up after this day (defaults to the task count)
        #[arg(long)]
        max_day: Option<u32>,
    },

    /// Run every strategy on the same query
    Compare {
        /// Problem file
        file: PathBuf,

        #[command(flatten)]
        capacity: CapacityArgs,

        /// When other channels see finished work
        #[arg(long, short = 's')]
        sharing: Option<SharingPolicy>,

        /// Give up after this day (defaults to the task count)
        #[arg(long)]
        max_day: Option<u32>,
    },

    /// Find the smallest per-channel capacity that meets a deadline
    MinCapacity {
        /// Problem file
        file: PathBuf,

        /// Deadline in days
        #[arg(long, short = 'd')]
        days: u32,

        /// Number of channels (overrides the file's N line)
        #[arg(long, short = 'n')]
        channels: Option<usize>,

        /// Most tasks started per day across all channels
        #[arg(long)]
        tasks_per_day: Option<u32>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Find the cheapest even/odd capacity pair that meets a deadline
    MinCost {
        /// Problem file
        file: PathBuf,

        /// Deadline in days
        #[arg(long, short = 'd')]
        days: u32,

        /// Price of one unit of even-channel capacity
        #[arg(long)]
        even_cost: u32,

        /// Price of one unit of odd-channel capacity
        #[arg(long)]
        odd_cost: u32,

        /// Most tasks started per day across all channels
        #[arg(long)]
        tasks_per_day: Option<u32>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default = if verbose { "dayplan=debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

fn positive(value: u32, flag: &str) -> Result<u32> {
    if value == 0 {
        bail!("{} must be at least 1", flag);
    }
    Ok(value)
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    let format = cli.format.unwrap_or(config.output.format);
    let output = Output::new(format, cli.verbose);

    if let Some(source) = &config.source {
        output.verbose_ctx("config", &format!("Using configuration from {}", source.display()));
    }

    match cli.command {
        Commands::Enumerate {
            file,
            days,
            capacity,
            sharing,
            strategy,
            idle,
            limit,
        } => {
            let problem = ProblemFile::load(&file)?;
            let scheme = capacity.scheme(&problem)?;
            let options = plan::EnumerateRequest {
                days: positive(days, "--days")?,
                sharing: sharing.unwrap_or(config.search.sharing),
                strategy,
                idle,
                limit: limit.or(config.search.max_schedules),
            };
            plan::enumerate(&output, &problem, &scheme, &options)?
        }

        Commands::Earliest {
            file,
            capacity,
            search,
            max_day,
        } => {
            let problem = ProblemFile::load(&file)?;
            let scheme = capacity.scheme(&problem)?;
            let max_day = max_day
                .or(config.search.max_day)
                .map(|d| positive(d, "--max-day"))
                .transpose()?;
            plan::earliest(
                &output,
                &problem,
                &scheme,
                search.sharing(&config),
                search.algorithm(&config),
                max_day,
            )?
        }

        Commands::Compare {
            file,
            capacity,
            sharing,
            max_day,
        } => {
            let problem = ProblemFile::load(&file)?;
            let scheme = capacity.scheme(&problem)?;
            let max_day = max_day
                .or(config.search.max_day)
                .map(|d| positive(d, "--max-day"))
                .transpose()?;
            plan::compare(
                &output,
                &problem,
                &scheme,
                sharing.unwrap_or(config.search.sharing),
                max_day,
            )?
        }

        Commands::MinCapacity {
            file,
            days,
            channels,
            tasks_per_day,
            search,
        } => {
            let problem = ProblemFile::load(&file)?;
            let query = crate::search::capacity::CapacityQuery {
                channels: channels.or(problem.channels).unwrap_or(1),
                deadline: positive(days, "--days")?,
                policy: search.sharing(&config),
                algorithm: search.algorithm(&config),
                tasks_per_day,
            };
            optimize::min_capacity(&output, &problem, &query)?
        }

        Commands::MinCost {
            file,
            days,
            even_cost,
            odd_cost,
            tasks_per_day,
            search,
        } => {
            let problem = ProblemFile::load(&file)?;
            let query = crate::search::capacity::CostQuery {
                deadline: positive(days, "--days")?,
                even_unit_cost: even_cost,
                odd_unit_cost: odd_cost,
                policy: search.sharing(&config),
                algorithm: search.algorithm(&config),
                tasks_per_day,
            };
            optimize::min_cost(&output, &problem, &query)?
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::parse;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_earliest_with_overrides() {
        let cli = Cli::try_parse_from([
            "dayplan",
            "--format",
            "json",
            "earliest",
            "p.txt",
            "--channels",
            "2",
            "--capacity",
            "3",
            "--sharing",
            "delayed",
            "--algorithm",
            "dfbb",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Earliest { capacity, search, .. } => {
                assert_eq!(capacity.channels, Some(2));
                assert_eq!(capacity.capacity, Some(3));
                assert_eq!(search.sharing, Some(SharingPolicy::Delayed));
                assert_eq!(search.algorithm, Some(Algorithm::Dfbb));
            }
            _ => panic!("expected earliest"),
        }
    }

    #[test]
    fn capacity_flags_conflict() {
        let result = Cli::try_parse_from([
            "dayplan",
            "earliest",
            "p.txt",
            "--capacity",
            "3",
            "--even-capacity",
            "2",
            "--odd-capacity",
            "2",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["dayplan", "earliest", "p.txt", "--even-capacity", "2"]);
        assert!(result.is_err());
    }

    #[test]
    fn scheme_falls_back_to_problem_file() {
        let problem = parse("N 3\nK 4\nA 1 1 0\n").unwrap();

        let scheme = CapacityArgs::default().scheme(&problem).unwrap();
        assert_eq!(scheme.len(), 3);
        assert_eq!(scheme.capacity(0), 4);

        let args = CapacityArgs {
            capacity: Some(6),
            ..CapacityArgs::default()
        };
        assert_eq!(args.scheme(&problem).unwrap().capacity(2), 6);

        let args = CapacityArgs {
            even_capacity: Some(1),
            odd_capacity: Some(2),
            ..CapacityArgs::default()
        };
        let scheme = args.scheme(&problem).unwrap();
        assert_eq!(scheme.len(), 2);
        assert_eq!(scheme.capacity(1), 2);
    }

    #[test]
    fn scheme_needs_a_capacity() {
        let problem = parse("A 1 1 0\n").unwrap();
        let err = CapacityArgs::default().scheme(&problem).unwrap_err();
        assert!(err.to_string().contains("No capacity given"));
    }

    #[test]
    fn search_args_fall_back_to_config() {
        let config =
            Config::parse("[search]\nsharing = \"delayed\"\nalgorithm = \"bfs\"\n").unwrap();
        let args = SearchArgs::default();
        assert_eq!(args.sharing(&config), SharingPolicy::Delayed);
        assert_eq!(args.algorithm(&config), Algorithm::Bfs);

        let args = SearchArgs {
            sharing: Some(SharingPolicy::Instant),
            algorithm: None,
        };
        assert_eq!(args.sharing(&config), SharingPolicy::Instant);
    }

    #[test]
    fn tracing_init_tolerates_an_existing_subscriber() {
        init_tracing(false);
        init_tracing(true);
    }
}
