//! pgliteral: inspect PostgreSQL literals
//!
//! # Usage
//!
//! ```bash
//! # Parse an array
//! pgliteral array '{{1,2},{3,NULL}}'
//!
//! # Parse a range with typed bounds
//! pgliteral range '[3,7)' --type int4range
//!
//! # Canonical literal and constructor call
//! pgliteral canonical '[1,5]' --type int4range --sql
//! ```

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use pgliteral::prelude::*;

#[derive(Parser)]
#[command(name = "pgliteral")]
#[command(version)]
#[command(
    about = "Parse and re-encode PostgreSQL array, composite and range literals",
    long_about = None
)]
#[command(after_help = "EXAMPLES:
    pgliteral array '{a,\"b,c\",NULL}'
    pgliteral composite '(10.0,USD)'
    pgliteral multirange '{[1,3),[5,7)}' --type int4multirange
    pgliteral canonical '(1,5]' --type int4range --sql")]
struct Cli {
    /// Configuration file (defaults to ./pgliteral.toml)
    #[arg(long, global = true, env = "PGLITERAL_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse an array literal
    Array {
        text: String,
        /// Element delimiter
        #[arg(short, long)]
        delimiter: Option<char>,
    },
    /// Parse a composite (row) literal
    Composite { text: String },
    /// Parse a range literal
    Range {
        text: String,
        /// Range type, e.g. daterange. Bounds stay text without one.
        #[arg(short = 't', long = "type")]
        db_type: Option<String>,
    },
    /// Parse a multirange literal
    Multirange {
        text: String,
        /// Multirange type, e.g. int4multirange
        #[arg(short = 't', long = "type")]
        db_type: Option<String>,
    },
    /// Re-encode a range or multirange literal in canonical form
    Canonical {
        text: String,
        /// Range or multirange type
        #[arg(short = 't', long = "type")]
        db_type: String,
        /// Also show the constructor call and its bindings
        #[arg(long)]
        sql: bool,
    },
    /// List the supported range types
    Types,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pgliteral=debug" } else { "pgliteral=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load {}", path.display())),
        None => Config::discover().context("failed to load configuration"),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_ref())?;

    match &cli.command {
        Commands::Array { text, delimiter } => {
            let parser = match delimiter {
                Some(d) => config.array_parser().with_delimiter(*d),
                None => config.array_parser(),
            };
            let items = parser.parse(Some(text.as_str()))?.unwrap_or_default();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
                OutputFormat::Table => print_elements(&items, 0),
            }
        }
        Commands::Composite { text } => {
            let Some(fields) = CompositeParser::new().parse(text)? else {
                bail!("'{}' is not a composite literal", text);
            };
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fields)?),
                OutputFormat::Table => {
                    for (i, field) in fields.iter().enumerate() {
                        let shown = match field {
                            Some(f) => f.white(),
                            None => "NULL".dimmed(),
                        };
                        println!("{:>4} │ {}", i.to_string().cyan(), shown);
                    }
                }
            }
        }
        Commands::Range { text, db_type } => {
            let parser = match db_type {
                Some(name) => RangeParser::from_db_type(name)?
                    .with_native_int64(config.range.native_int64),
                None => config.range_parser(),
            };
            let bounds = parser.parse(Some(text.as_str()))?;
            print_ranges(bounds.as_slice(), cli.format)?;
        }
        Commands::Multirange { text, db_type } => {
            let parser = match db_type {
                Some(name) => MultiRangeParser::from_db_type(name)?
                    .with_native_int64(config.range.native_int64),
                None => config.multirange_parser(),
            };
            let ranges = parser.parse(Some(text.as_str()))?.unwrap_or_default();
            print_ranges(&ranges, cli.format)?;
        }
        Commands::Canonical { text, db_type, sql } => {
            canonical(&config, text, db_type, *sql, cli.format)?
        }
        Commands::Types => show_types(),
    }

    Ok(())
}

fn canonical(
    config: &Config,
    text: &str,
    db_type: &str,
    show_sql: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let factory = config.column_factory();
    let column: Box<dyn ColumnType> = if let Some(kind) = RangeKind::from_range_type(db_type) {
        Box::new(RangeColumn::from_kind(kind, &factory))
    } else if let Some(kind) = RangeKind::from_multirange_type(db_type) {
        Box::new(MultiRangeColumn::from_kind(kind, &factory))
    } else {
        bail!("'{}' is not a range or multirange type", db_type);
    };

    let decoded = column.typecast(Some(text))?;
    let literal = match column.db_typecast(decoded.clone())? {
        Value::Text(literal) => literal,
        _ => "empty".to_string(),
    };

    let mut params = config.params();
    let constructor = match decoded.as_expr() {
        Some(expr) if show_sql => Some(config.query_builder().build_expression(expr, &mut params)?),
        None if show_sql => Some(format!("'empty'::{}", column.db_type())),
        _ => None,
    };

    match format {
        OutputFormat::Json => {
            let mut out = serde_json::json!({ "literal": literal });
            if let Some(sql) = &constructor {
                let bindings: serde_json::Map<String, serde_json::Value> = params
                    .iter()
                    .map(|(name, value)| Ok((name.to_string(), value.to_json()?)))
                    .collect::<Result<_, LiteralError>>()?;
                out["sql"] = serde_json::Value::String(sql.clone());
                out["params"] = serde_json::Value::Object(bindings);
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Table => {
            println!("{}", literal.green().bold());
            if let Some(sql) = constructor {
                println!();
                println!("{}", "Constructor:".cyan());
                println!("  {}", sql.white());
                if !params.is_empty() {
                    println!("{}", "Bindings:".cyan());
                    for (name, value) in params.iter() {
                        println!("  {} = {}", name, value.to_string().yellow());
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_elements(items: &[Element], depth: usize) {
    if items.is_empty() && depth == 0 {
        println!("{}", "(empty array)".dimmed());
        return;
    }
    let indent = "  ".repeat(depth);
    for (i, item) in items.iter().enumerate() {
        let index = format!("[{}]", i).cyan();
        match item {
            Element::Null => println!("{}{} {}", indent, index, "NULL".dimmed()),
            Element::Text(s) => println!("{}{} {}", indent, index, s.white()),
            Element::Array(nested) => {
                println!("{}{}", indent, index);
                print_elements(nested, depth + 1);
            }
        }
    }
}

fn print_ranges(ranges: &[RangeBounds], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = ranges
                .iter()
                .map(|r| Ok(serde_json::json!([r.lower.to_json()?, r.upper.to_json()?])))
                .collect::<Result<Vec<_>, LiteralError>>()?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Table => {
            if ranges.is_empty() {
                println!("{}", "(empty)".dimmed());
                return Ok(());
            }
            println!("{:20} │ {}", "Lower".white().bold(), "Upper".white().bold());
            println!("{}", "─".repeat(43).dimmed());
            for range in ranges {
                println!("{:20} │ {}", show_bound(&range.lower), show_bound(&range.upper));
            }
        }
    }
    Ok(())
}

fn show_bound(value: &Value) -> ColoredString {
    match value {
        Value::Null => "(unbounded)".dimmed(),
        other => other.to_string().yellow(),
    }
}

fn show_types() {
    println!(
        "{:12} {:16} {:12} {}",
        "Range".white().bold(),
        "Multirange".white().bold(),
        "Subtype".white().bold(),
        "Canonical".white().bold()
    );
    println!("{}", "─".repeat(54).dimmed());

    for kind in RangeKind::ALL {
        let canonical = if kind.is_discrete() { "[)" } else { "as given" };
        println!(
            "{:12} {:16} {:12} {}",
            kind.range_type().cyan(),
            kind.multirange_type().yellow(),
            kind.subtype().white(),
            canonical.dimmed()
        );
    }
}
