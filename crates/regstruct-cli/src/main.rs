mod display;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use regstruct_core::{ActorType, OrdinalOrder};
use regstruct_nlp::RuleBasedNlp;
use regstruct_parse::{ParseConfig, Parser as RegulationParser};
use regstruct_store::KnowledgeStore;
use tracing_subscriber::EnvFilter;

/// regstruct - turn regulation text into a queryable knowledge store.
#[derive(Parser)]
#[command(name = "regstruct")]
#[command(version, about, long_about = None)]
struct Cli {
    /// DuckDB database file.
    #[arg(long, env = "REGSTRUCT_DB", default_value = "regstruct.duckdb", global = true)]
    db: PathBuf,

    /// JSON file overriding the default parser keywords.
    #[arg(long, env = "REGSTRUCT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Ordering of article, paragraph and point numbers in read results.
    #[arg(long, env = "REGSTRUCT_ORDER", value_enum, default_value_t = OrderArg::Lexicographic, global = true)]
    order: OrderArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a regulation text file into a fresh database.
    Parse {
        /// UTF-8 text of the regulation.
        file: PathBuf,

        /// Replace the database file if it already exists.
        #[arg(long)]
        overwrite: bool,
    },
    /// Show one article with its paragraphs, requirements and references.
    Article {
        number: String,

        /// Print JSON instead of a card.
        #[arg(long)]
        json: bool,
    },
    /// Case-insensitive keyword search over articles.
    Search { keyword: String },
    /// Requirements that concern a role (e.g. controller, data_subject).
    Role { role: String },
    /// Export the whole store as JSON.
    Export {
        /// Output file (default: stdout).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the privacy-policy Markdown skeleton.
    Policy,
    /// Run a SQL query and pretty-print the result.
    Sql { query: String },
    /// Row counts per table.
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Lexicographic,
    Natural,
}

impl From<OrderArg> for OrdinalOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Lexicographic => OrdinalOrder::Lexicographic,
            OrderArg::Natural => OrdinalOrder::Natural,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    tracing::debug!("regstruct v{}", env!("CARGO_PKG_VERSION"));

    match &cli.command {
        Commands::Parse { file, overwrite } => cmd_parse(&cli, file, *overwrite),
        Commands::Article { number, json } => {
            let store = open_store(&cli)?;
            let Some(article) = store.get_article_by_number(number)? else {
                display::print_article_not_found(number);
                return Ok(());
            };
            if *json {
                println!("{}", serde_json::to_string_pretty(&article)?);
            } else {
                display::print_article(&article);
            }
            Ok(())
        }
        Commands::Search { keyword } => {
            let hits = open_store(&cli)?.search_by_keyword(keyword)?;
            display::print_search_hits(keyword, &hits);
            Ok(())
        }
        Commands::Role { role } => {
            let Ok(actor) = ActorType::from_str(role) else {
                tracing::debug!(role, "not a known actor type");
                display::print_unknown_role(role);
                return Ok(());
            };
            let requirements = open_store(&cli)?.requirements_for_role(actor.as_str())?;
            display::print_role_requirements(actor, &requirements);
            Ok(())
        }
        Commands::Export { out } => {
            let store = open_store(&cli)?;
            match out {
                Some(path) => {
                    store
                        .export_to_file(path)
                        .with_context(|| format!("writing {}", path.display()))?;
                    eprintln!("Exported to {}", path.display());
                }
                None => {
                    store.export_json(std::io::stdout().lock())?;
                    println!();
                }
            }
            Ok(())
        }
        Commands::Policy => {
            print!("{}", open_store(&cli)?.policy_template()?);
            Ok(())
        }
        Commands::Sql { query } => {
            let batches = open_store(&cli)?.query_arrow(query)?;
            arrow::util::pretty::print_batches(&batches)?;
            Ok(())
        }
        Commands::Stats => {
            let counts = open_store(&cli)?.table_counts()?;
            display::print_table_counts(&counts);
            Ok(())
        }
    }
}

fn cmd_parse(cli: &Cli, file: &Path, overwrite: bool) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => ParseConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ParseConfig::default(),
    };

    let parser = RegulationParser::new(config, RuleBasedNlp::new());
    let document = parser
        .parse_file(file)
        .with_context(|| format!("parsing {}", file.display()))?;

    if overwrite && cli.db.exists() {
        std::fs::remove_file(&cli.db)
            .with_context(|| format!("removing {}", cli.db.display()))?;
    }
    let mut store = KnowledgeStore::create_persistent(&cli.db)
        .with_context(|| format!("creating {} (use --overwrite to replace it)", cli.db.display()))?;
    let stats = store.populate(&document).context("populating store")?;

    display::print_populate_stats(&cli.db, &stats);
    Ok(())
}

fn open_store(cli: &Cli) -> anyhow::Result<KnowledgeStore> {
    if !cli.db.exists() {
        bail!(
            "no database at {}; run `regstruct parse <file>` first",
            cli.db.display()
        );
    }
    let store = KnowledgeStore::open_persistent(&cli.db)
        .with_context(|| format!("opening {}", cli.db.display()))?;
    Ok(store.with_order(cli.order.into()))
}
