pub mod add_result;
mod table;
mod views;

use std::io::{self, Write};
use std::process::ExitCode;

use chrono::Local;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use crate::services::{
    ClientConfig, ConfigOverrides, EurogamesClient, Fetcher, StatsDeriver, DEFAULT_PLAYS_LIMIT,
};
use crate::types::Result;
use add_result::AddResultArgs;
use table::Table;

/// Eurogames play log: games, results and win statistics
#[derive(Parser)]
#[command(name = "eurogames")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// API base URL
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Bearer token for the API
    #[arg(long, global = true, value_name = "KEY")]
    api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List games, optionally filtered by status
    Games {
        /// Status filter (e.g., Playing, Inbox, Evaluating)
        #[arg(long)]
        status: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one game with its metadata
    Game {
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show every recorded play of one game
    History {
        id: u64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the play log
    Results {
        /// Maximum number of plays
        #[arg(long, default_value_t = DEFAULT_PLAYS_LIMIT)]
        limit: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the most recent plays
    Recent {
        /// Maximum number of plays
        #[arg(long, default_value_t = DEFAULT_PLAYS_LIMIT)]
        limit: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show when each game was last played
    LastPlayed {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-game wins and win ratios
    Winners {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show overall totals
    Totals {
        /// Aggregate from per-game stats instead of the totals endpoint
        #[arg(long)]
        local: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a play result
    AddResult(AddResultArgs),
}

impl Cli {
    pub fn run(self) -> anyhow::Result<ExitCode> {
        init_logging(self.verbose);

        let overrides = ConfigOverrides {
            api_url: self.api_url,
            api_key: self.api_key,
            timeout_secs: self.timeout,
        };
        let config = ClientConfig::load(&overrides)?;
        debug!(?config, "resolved configuration");

        let client = EurogamesClient::from_config(&config)?;
        let mut out = io::stdout().lock();
        self.command.execute(&client, &mut out)
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("eurogames=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

impl Commands {
    fn page(&self) -> &'static str {
        match self {
            Commands::Games { .. } => "games",
            Commands::Game { .. } => "game",
            Commands::History { .. } => "history",
            Commands::Results { .. } => "results",
            Commands::Recent { .. } => "recent plays",
            Commands::LastPlayed { .. } => "last played",
            Commands::Winners { .. } => "winners",
            Commands::Totals { .. } => "totals",
            Commands::AddResult(_) => "add result",
        }
    }

    fn execute<F: Fetcher, W: Write>(
        self,
        client: &EurogamesClient<F>,
        out: &mut W,
    ) -> anyhow::Result<ExitCode> {
        let page = self.page();
        macro_rules! load {
            ($call:expr) => {
                match loaded(page, $call) {
                    Some(value) => value,
                    None => return Ok(ExitCode::FAILURE),
                }
            };
        }

        match self {
            Commands::Games { status, json } => {
                let games = load!(client.list_games(status.as_deref()));
                emit(out, json, &games, views::games(&games))
            }
            Commands::Game { id, json } => match load!(client.game_detail(id)) {
                Some(detail) if json => emit_json(out, &detail),
                Some(detail) => {
                    write!(out, "{}", views::detail(&detail))?;
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    if json {
                        writeln!(out, "null")?;
                    } else {
                        eprintln!("Game {} not found.", id);
                    }
                    Ok(ExitCode::SUCCESS)
                }
            },
            Commands::History { id, json } => {
                let plays = load!(client.game_history(id));
                emit(out, json, &plays, views::history(&plays))
            }
            Commands::Results { limit, json } => {
                let plays = load!(client.play_results(limit));
                emit(out, json, &plays, views::plays(&plays))
            }
            Commands::Recent { limit, json } => {
                let plays = load!(client.recent_plays(limit));
                emit(out, json, &plays, views::plays(&plays))
            }
            Commands::LastPlayed { json } => {
                let mut rows = load!(client.last_played());
                StatsDeriver::fill_recency(&mut rows, Local::now().date_naive());
                emit(out, json, &rows, views::last_played(&rows))
            }
            Commands::Winners { json } => {
                let stats = load!(client.winner_stats());
                emit(out, json, &stats, views::winners(&stats))
            }
            Commands::Totals { local, json } => {
                let totals = if local {
                    StatsDeriver::aggregate(&load!(client.winner_stats()))
                } else {
                    load!(client.totals())
                };
                emit(out, json, &totals, views::totals(&totals))
            }
            Commands::AddResult(args) => {
                let record = args.to_record();
                let accepted = load!(client.add_result(&record));
                if args.json {
                    emit_json(
                        out,
                        &serde_json::json!({ "success": accepted, "record": record }),
                    )?;
                } else if accepted {
                    writeln!(out, "Result recorded")?;
                } else {
                    writeln!(out, "Result rejected")?;
                }
                Ok(if accepted {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                })
            }
        }
    }
}

/// Failures stop at the page: reported on stderr, never propagated
fn loaded<T>(page: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!(page, transport = e.is_transport(), "{}", e);
            eprintln!("Error loading {}: {}", page, e);
            None
        }
    }
}

fn emit<T, W>(out: &mut W, json: bool, value: &T, table: Table) -> anyhow::Result<ExitCode>
where
    T: Serialize + ?Sized,
    W: Write,
{
    if json {
        return emit_json(out, value);
    }
    if table.is_empty() {
        warn!("no data to show");
        eprintln!("No data.");
    } else {
        debug!(rows = table.len(), "rendering table");
        write!(out, "{}", table)?;
    }
    Ok(ExitCode::SUCCESS)
}

fn emit_json<T: Serialize + ?Sized, W: Write>(out: &mut W, value: &T) -> anyhow::Result<ExitCode> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(ExitCode::SUCCESS)
}
