//! oxide-routes CLI
//!
//! Inspects a JSON route definition file: lists the table, resolves
//! requests and builds reverse routes.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use oxide_routing::{
    Dispatch, Endpoint, FsLocator, RouteCollection, Router, RoutesFile, Uri, Verb,
};

/// Route table inspection.
#[derive(Parser)]
#[command(name = "oxide-routes")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route definition file.
    #[arg(short, long, default_value = "routes.json")]
    routes: PathBuf,

    /// Host of the simulated request (enables hostname and subdomain routes).
    #[arg(long)]
    host: Option<String>,

    /// Environment used for `environment` blocks.
    #[arg(short, long, env = "OXIDE_ENV")]
    environment: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered routes.
    List {
        /// Only show routes visible to this verb.
        #[arg(long)]
        verb: Option<Verb>,
    },

    /// Resolve a request path.
    Resolve {
        /// Request verb (`get`, `post`, `cli`, ...).
        verb: Verb,

        /// Request path.
        path: String,

        /// Controller directory probed by auto-routing.
        #[arg(long)]
        controllers: Option<PathBuf>,
    },

    /// Build the path for a route name or target.
    Reverse {
        /// Route name, pattern or target prefix (`Photos::show`).
        name: String,

        /// Positional parameters.
        params: Vec<String>,

        /// Resolve the path against this base URL.
        #[arg(long)]
        base: Option<String>,
    },

    /// Resolve a URI reference against a base URI.
    ResolveUrl {
        /// Base URI.
        base: String,

        /// Reference to resolve.
        reference: String,
    },
}

fn load(cli: &Cli) -> anyhow::Result<RouteCollection> {
    let mut file = RoutesFile::load(&cli.routes)
        .with_context(|| format!("reading {}", cli.routes.display()))?;

    if let Some(host) = &cli.host {
        file.config.host = Some(host.clone());
    }
    if let Some(environment) = &cli.environment {
        file.config.environment.clone_from(environment);
    }

    let routes = file.into_collection()?;
    debug!(count = routes.len(), "route table built");
    Ok(routes)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match &cli.command {
        Commands::List { verb } => {
            let routes = load(&cli)?;
            let entries: Vec<_> = match verb {
                Some(verb) => routes.routes(*verb),
                None => routes.iter().collect(),
            };

            if entries.is_empty() {
                println!("No routes registered.");
                return Ok(());
            }

            println!("{:<8} {:<40} {}", "VERB", "PATTERN", "TARGET");
            println!("{:-<80}", "");
            for entry in entries {
                let mut line = format!("{:<8} {:<40} {}", entry.verb, entry.from, entry.target);
                if entry.name != entry.from {
                    line.push_str(&format!("  (as {})", entry.name));
                }
                if let Some(status) = entry.redirect() {
                    line.push_str(&format!("  [{status}]"));
                }
                if let Some(filter) = entry.options.filter.as_deref() {
                    line.push_str(&format!("  filter={filter}"));
                }
                println!("{line}");
            }
        }

        Commands::Resolve {
            verb,
            path,
            controllers,
        } => {
            let routes = load(&cli)?;
            let fs_locator = controllers.as_ref().map(FsLocator::new);
            let mut router = Router::new(&routes, *verb);
            if let Some(locator) = &fs_locator {
                router = router.with_locator(locator);
            }

            match router.handle(Some(path))? {
                Dispatch::Matched(m) => {
                    match &m.endpoint {
                        Endpoint::Controller { controller, method } => {
                            println!("{controller}::{method}({})", m.params.join(", "));
                        }
                        Endpoint::Closure(_) => {
                            println!("(closure)({})", m.params.join(", "));
                        }
                    }
                    if let Some(key) = &m.route_key {
                        println!("  route:  {key}");
                    }
                    if let Some(locale) = &m.locale {
                        println!("  locale: {locale}");
                    }
                    if let Some(filter) = &m.filter {
                        println!("  filter: {filter}");
                    }
                }
                Dispatch::Redirect(redirect) => {
                    println!("redirect {} -> {}", redirect.status, redirect.target);
                }
                Dispatch::NotFound => match router.override_404() {
                    Some(Endpoint::Controller { controller, method }) => {
                        println!("not found (override: {controller}::{method})");
                    }
                    Some(Endpoint::Closure(_)) => println!("not found (override: closure)"),
                    None => println!("not found"),
                },
            }
        }

        Commands::Reverse { name, params, base } => {
            let routes = load(&cli)?;
            let params: Vec<&str> = params.iter().map(String::as_str).collect();

            let resolved = match base {
                Some(base) => routes
                    .url_to(&Uri::parse(base)?, name, &params)?
                    .map(|uri| uri.to_string()),
                None => routes.reverse_route(name, &params)?,
            };

            match resolved {
                Some(path) => println!("{path}"),
                None => anyhow::bail!("no route matches '{name}'"),
            }
        }

        Commands::ResolveUrl { base, reference } => {
            let base = Uri::parse(base)?;
            println!("{}", base.join(reference)?);
        }
    }

    Ok(())
}
