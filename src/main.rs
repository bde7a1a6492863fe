//! browser-search CLI - build search URLs and open them in a browser.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use browser_search::{
    browser::launch_plan, launch_all, Config, EngineTarget, KeywordInput, PortValue,
    QuerySelector, Search, SearchOptions, SystemLauncher,
};

/// browser-search - open search engines, routes and websites from the terminal
#[derive(Parser)]
#[command(name = "browser-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to $BROWSER_SEARCH_CONFIG or the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build URLs from keywords and open them
    Search(SearchArgs),

    /// List configured search engines
    Engines,

    /// List configured browsers
    Browsers,
}

#[derive(Parser)]
struct SearchArgs {
    /// Search keywords or website URLs
    keywords: Vec<String>,

    /// Engine name, alias or base URL (repeatable)
    #[arg(short, long)]
    engine: Vec<String>,

    /// Route name or path segment (repeatable)
    #[arg(short, long)]
    route: Vec<String>,

    /// Port override (repeatable)
    #[arg(short, long)]
    port: Vec<String>,

    /// Engine query mode or literal query prefix (repeatable)
    #[arg(short, long)]
    mode: Vec<String>,

    /// Browser to open URLs in (repeatable)
    #[arg(short, long)]
    browser: Vec<String>,

    /// Browser profile name or directory (repeatable)
    #[arg(short = 'P', long)]
    profile: Vec<String>,

    /// Open in private browsing mode
    #[arg(short, long)]
    incognito: bool,

    /// One URL per keyword
    #[arg(short, long)]
    split: bool,

    /// Use http:// instead of https://
    #[arg(long)]
    http: bool,

    /// Print URLs instead of opening them
    #[arg(long)]
    print: bool,

    /// Output format for --print
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One URL per line
    Text,
    /// JSON array
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::discover()?,
    };

    match cli.command {
        Commands::Search(args) => run_search(&config, args).await,
        Commands::Engines => list_engines(&config),
        Commands::Browsers => list_browsers(&config),
    }
}

fn list_engines(config: &Config) -> Result<()> {
    println!("Configured search engines:\n");
    for (name, entry) in &config.engines {
        let marker = if config.default_engine.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("  {:<12} {}{}", name, entry.url, marker);
        if !entry.alias.is_empty() {
            println!("  {:<12} aliases: {}", "", entry.alias.join(", "));
        }
        if !entry.routes.is_empty() {
            let routes: Vec<&str> = entry.routes.iter().map(|(route, _)| route.as_str()).collect();
            println!("  {:<12} routes: {}", "", routes.join(", "));
        }
    }
    println!();
    println!("Usage: browser-search search \"query\" -e github -r prs");
    Ok(())
}

fn list_browsers(config: &Config) -> Result<()> {
    if config.browsers.is_empty() {
        println!("No browsers configured; URLs open in the system default browser.");
        return Ok(());
    }

    println!("Configured browsers:\n");
    for (name, entry) in &config.browsers {
        let marker = if config.default_browser.as_deref() == Some(name.as_str()) {
            " (default)"
        } else {
            ""
        };
        println!("  {}{}", name, marker);
        for (alias, directory) in &entry.profiles {
            let marker = if entry.default_profile.as_deref() == Some(alias.as_str()) {
                " (default)"
            } else {
                ""
            };
            println!("    {:<10} {}{}", alias, directory, marker);
        }
    }
    Ok(())
}

async fn run_search(config: &Config, args: SearchArgs) -> Result<()> {
    let engines = args
        .engine
        .iter()
        .map(|name| config.resolve_engine(name))
        .collect::<browser_search::Result<Vec<EngineTarget>>>()?;

    let mut options = SearchOptions::new()
        .with_keywords(args.keywords.iter().map(String::as_str).collect::<KeywordInput>())
        .with_engines(engines)
        .with_routes(args.route)
        .with_ports(args.port.iter().map(|p| PortValue::from(p.as_str())))
        .with_incognito(args.incognito)
        .with_split(args.split)
        .with_http(args.http);

    if let Some(engine) = config.default_engine()? {
        options = options.with_default_engine(engine);
    }

    options = match args.mode.len() {
        0 => options,
        1 => options.with_query(QuerySelector::Literal(args.mode[0].clone())),
        _ => options.with_query(QuerySelector::List(args.mode.clone())),
    };

    let request = options.normalize();
    let urls = Search::default().urls(&request)?;

    if args.print {
        match args.format {
            OutputFormat::Text => {
                for url in &urls {
                    println!("{}", url);
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&urls)?),
        }
        return Ok(());
    }

    let mut browser_names = args.browser;
    if browser_names.is_empty() {
        browser_names.extend(config.default_browser.iter().cloned());
    }
    let browsers: Vec<_> = browser_names
        .iter()
        .map(|name| config.browser(name, &args.profile))
        .collect();

    let targets = launch_plan(&urls, &browsers, request.incognito());
    if targets.is_empty() {
        anyhow::bail!("Nothing to open: give keywords, an engine or a browser");
    }

    let report = launch_all(&SystemLauncher::new(), &targets).await;
    if !report.is_success() {
        for (label, error) in &report.failures {
            eprintln!("Warning: could not open {}: {}", label, error);
        }
        if report.opened == 0 {
            anyhow::bail!("Failed to open any of {} target(s)", targets.len());
        }
    }

    Ok(())
}
