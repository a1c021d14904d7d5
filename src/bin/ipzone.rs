//! ipzone: CLI for importing zone files and resolving IPv4 countries.

use clap::{Parser, Subcommand};
use ipzone::{parse_range, Config, Locator, ZoneStore};
use serde::Serialize;
use std::path::PathBuf;

/// Database used when neither `--db` nor the config file names one.
const DEFAULT_DB_PATH: &str = "ip_country.db";

#[derive(Parser)]
#[command(name = "ipzone")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Resolve IPv4 addresses to countries from imported zone files", long_about = None)]
struct Cli {
    /// Database file
    #[arg(short, long, global = true)]
    db: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolution cache size (overrides the config file)
    #[arg(long, global = true)]
    cache_size: Option<usize>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a zone file or every zone file in a directory
    Import {
        /// Zone file or directory
        path: PathBuf,
    },

    /// Resolve the country of one or more IPv4 addresses
    Lookup {
        /// IPv4 addresses
        #[arg(required = true)]
        ips: Vec<String>,
    },

    /// List the ranges stored for a country
    Ranges {
        /// Country code, e.g. FR
        country: String,
    },

    /// Insert or replace a single range
    Upsert {
        /// Range as `start-end` or CIDR
        range: String,

        /// Country code
        country: String,
    },

    /// Check that the numeric index is in ascending order
    Verify,

    /// Print the numeric bounds of a range
    Parse {
        /// Range as `start-end` or CIDR
        range: String,
    },
}

#[derive(Serialize)]
struct Lookup<'a> {
    ip: &'a str,
    country: Option<String>,
    error: Option<String>,
}

#[derive(Serialize)]
struct Bounds<'a> {
    range: &'a str,
    start: u32,
    end: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(size) = cli.cache_size {
        config.locator.cache_capacity = size;
    }
    let db_path = cli
        .db
        .clone()
        .or_else(|| config.database.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

    match cli.command {
        Commands::Parse { ref range } => {
            let (start, end) = parse_range(range)?;
            if cli.json {
                print_json(&Bounds { range, start, end })?;
            } else {
                println!("{} -> {} {}", range, start, end);
            }
            Ok(())
        }
        Commands::Import { ref path } => {
            let store = ZoneStore::open_with_config(&db_path, false, config.store.clone())?;
            let result = if path.is_dir() {
                store.import_directory(path)
            } else {
                store.import_file(path)
            };
            store.close()?;
            let stats = result?;

            if cli.json {
                print_json(&stats)?;
            } else {
                println!(
                    "Imported {:?}: {} ranges processed, {} updated",
                    path, stats.processed, stats.updated
                );
            }
            Ok(())
        }
        Commands::Lookup { ref ips } => {
            let store = ZoneStore::open_with_config(&db_path, true, config.store.clone())?;
            let mut failed = false;
            {
                let locator = Locator::with_config(&store, &config.locator);
                for ip in ips {
                    let result = locator.resolve(ip);
                    failed |= result.is_err();
                    print_lookup(ip, result, cli.json)?;
                }
            }
            store.close()?;

            if failed {
                return Err("one or more lookups failed".into());
            }
            Ok(())
        }
        Commands::Ranges { ref country } => {
            let store = ZoneStore::open_with_config(&db_path, true, config.store.clone())?;
            let result = Locator::new(&store, 0).ranges(country);
            store.close()?;
            let ranges = result?;

            if cli.json {
                print_json(&ranges)?;
            } else {
                for range in &ranges {
                    println!("{}", range);
                }
            }
            Ok(())
        }
        Commands::Upsert {
            ref range,
            ref country,
        } => {
            let (start, end) = parse_range(range)?;
            let store = ZoneStore::open_with_config(&db_path, false, config.store.clone())?;
            let result = store.upsert_range(range, start, end, country);
            store.close()?;
            result?;

            println!("{} -> {}", range, country);
            Ok(())
        }
        Commands::Verify => {
            let store = ZoneStore::open_with_config(&db_path, true, config.store.clone())?;
            let result = store.verify_numeric_order();
            store.close()?;
            let audit = result?;

            if cli.json {
                print_json(&audit)?;
            } else {
                println!(
                    "{} numeric ranges, {} out of order",
                    audit.entries, audit.out_of_order
                );
            }
            Ok(())
        }
    }
}

fn print_lookup(
    ip: &str,
    result: ipzone::Result<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let (country, error) = match result {
            Ok(country) => (Some(country), None),
            Err(e) => (None, Some(e.to_string())),
        };
        print_json(&Lookup { ip, country, error })?;
    } else {
        match result {
            Ok(country) => println!("{} {}", ip, country),
            Err(e) => eprintln!("{} {}", ip, e),
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
