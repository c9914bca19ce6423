//! Contract Router
//!
//! Command-line front end for the route matching engine.
//!
//! ```text
//!   contract-router bench [--routes N]... [--requests M] [--seed S] [--json]
//!       → generate a seeded corpus per route count
//!       → register into linear + trie, issue identical requests
//!       → print latency table / JSON report, exit 1 on disagreement
//!
//!   contract-router match --route "GET /users/{id}"... [--registry K] [--compare] GET /users/42
//!       → register the routes into the configured registry (or both with --compare)
//!       → print each winner as JSON
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use contract_router::config::{load_config, validate_config, ConfigError, LogFormat};
use contract_router::harness::{run_scaling, EquivalenceReport};
use contract_router::observability::logging::init_logging;
use contract_router::routing::{
    HttpMethod, RegistryKind, Route, RouteMatch, RouteMatcher, Router,
};
use contract_router::RouterConfig;

#[derive(Parser)]
#[command(name = "contract-router")]
#[command(about = "Route matching engine for contract-driven mock APIs", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,

    /// Emit JSON (logs and command output)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the linear and trie registries on a synthetic corpus
    Bench {
        /// Route counts to run (repeatable)
        #[arg(long = "routes")]
        routes: Vec<usize>,

        /// Requests issued per run
        #[arg(long)]
        requests: Option<usize>,

        /// Corpus seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Resolve one request against a set of routes
    Match {
        /// Route as "METHOD /path" (repeatable)
        #[arg(short, long = "route", required = true)]
        routes: Vec<String>,

        /// Registry to use instead of the configured one
        #[arg(long)]
        registry: Option<RegistryKind>,

        /// Run both registries side by side
        #[arg(long)]
        compare: bool,

        method: String,

        path: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if cli.json {
        config.observability.log_format = LogFormat::Json;
    }
    init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        registry = %config.registry,
        "Starting contract-router"
    );

    match cli.command {
        Commands::Bench {
            routes,
            requests,
            seed,
        } => {
            if !routes.is_empty() {
                config.harness.route_counts = routes;
            }
            if let Some(requests) = requests {
                config.harness.request_count = requests;
            }
            if let Some(seed) = seed {
                config.corpus.seed = seed;
            }
            validate_config(&config).map_err(ConfigError::Validation)?;

            let reports = run_scaling(&config)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print_table(&reports);
            }

            if reports.iter().all(EquivalenceReport::is_equivalent) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Match {
            routes,
            registry,
            compare,
            method,
            path,
        } => {
            let routes = routes
                .iter()
                .map(String::as_str)
                .map(parse_route)
                .collect::<Result<Vec<_>, _>>()?;

            let mut results = serde_json::Map::new();
            let selected = registry.unwrap_or(config.registry);
            for kind in registries_to_run(selected, compare) {
                let mut router = Router::new(kind);
                router.register_many(routes.iter().cloned());
                let found = router.match_str(&method, &path);
                results.insert(kind.to_string(), describe(found.as_ref()));
            }

            let output = json!({
                "method": method,
                "path": path,
                "results": results,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn registries_to_run(selected: RegistryKind, compare: bool) -> Vec<RegistryKind> {
    if compare {
        vec![RegistryKind::Linear, RegistryKind::Trie]
    } else {
        vec![selected]
    }
}

fn parse_route(definition: &str) -> Result<Arc<Route>, Box<dyn std::error::Error>> {
    let (method, path) = definition
        .trim()
        .split_once(char::is_whitespace)
        .ok_or_else(|| format!("expected \"METHOD /path\", got {:?}", definition))?;
    let method: HttpMethod = method.parse()?;
    Ok(Arc::new(Route::new(method, path.trim())))
}

fn describe(found: Option<&RouteMatch<Route>>) -> Value {
    match found {
        Some(m) => json!({
            "route": format!("{} {}", m.route.method, m.route.path),
            "match_type": m.match_type,
            "score": m.match_score,
            "params": m.path_params,
        }),
        None => Value::Null,
    }
}

fn print_table(reports: &[EquivalenceReport]) {
    println!(
        "{:>8} {:>9} {:>9} {:>14} {:>14} {:>9} {:>11}",
        "routes", "requests", "matched", "linear ns/op", "trie ns/op", "speedup", "mismatches"
    );
    for r in reports {
        println!(
            "{:>8} {:>9} {:>9} {:>14.0} {:>14.0} {:>8.2}x {:>11}",
            r.route_count,
            r.request_count,
            r.trie.matched,
            r.linear.avg_match_ns,
            r.trie.avg_match_ns,
            r.speedup,
            r.mismatch_count,
        );
        for m in &r.mismatches {
            println!(
                "    {} {}: linear={} trie={}",
                m.method,
                m.path,
                m.linear.as_deref().unwrap_or("-"),
                m.trie.as_deref().unwrap_or("-"),
            );
        }
    }
}
