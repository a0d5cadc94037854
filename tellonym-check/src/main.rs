//! Tellonym Check CLI Application
//!
//! Checks whether Tellonym usernames or emails are registered, optionally
//! rotating through a proxy list, and prints each result as it arrives.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{ArgGroup, Parser};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::num::NonZeroU32;
use std::process;
use tellonym_check_lib::{
    load_env_config, load_identifiers, load_proxies, ClientConfig, EnvConfig, IdentifierKind,
    LogFile, ProxyPool, RotationPolicy, Scheduler, TellonymClient, DEFAULT_ROTATE_EVERY,
};
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for tellonym-check
#[derive(Parser, Debug)]
#[command(name = "tellonym-check")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tellonym username/email OSINT checker with proxy rotation")]
#[command(
    long_about = "Tellonym username/email OSINT checker with proxy rotation.\n\nQueries the public account-check endpoint one identifier at a time, with a short pause between checks."
)]
#[command(styles = STYLES)]
#[command(group(ArgGroup::new("mode").required(true).args(["email", "username"])))]
pub struct Args {
    /// Check email availability
    #[arg(long = "email", help_heading = "Mode")]
    pub email: bool,

    /// Check username availability
    #[arg(long = "username", help_heading = "Mode")]
    pub username: bool,

    /// File with usernames/emails (one per line)
    #[arg(
        long = "input",
        value_name = "FILE",
        conflicts_with = "value",
        help_heading = "Input"
    )]
    pub input: Option<String>,

    /// Single username/email to check
    #[arg(long = "value", value_name = "IDENTIFIER", help_heading = "Input")]
    pub value: Option<String>,

    /// Append results to this log file [env: TC_LOG]
    #[arg(long = "log", value_name = "FILE", help_heading = "Output")]
    pub log: Option<String>,

    /// File with proxies (http://IP:PORT, socks5://IP:PORT, ...) [env: TC_PROXYFILE]
    #[arg(long = "proxyfile", value_name = "FILE", help_heading = "Proxies")]
    pub proxyfile: Option<String>,

    /// Rotate proxy after N checks [default: 5] [env: TC_ROTATE]
    #[arg(
        long = "rotate",
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..),
        help_heading = "Proxies"
    )]
    pub rotate: Option<u32>,

    /// Show debug logging on stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    fn kind(&self) -> IdentifierKind {
        if self.email {
            IdentifierKind::Email
        } else {
            IdentifierKind::Username
        }
    }
}

/// Everything a run needs, after merging flags with `TC_*` variables.
///
/// Precedence: CLI flag > environment variable > default.
#[derive(Debug)]
struct RunSettings {
    kind: IdentifierKind,
    log: Option<String>,
    proxyfile: Option<String>,
    rotate: NonZeroU32,
    endpoint: Option<String>,
}

impl RunSettings {
    fn resolve(args: &Args, env: EnvConfig) -> Self {
        let rotate = args
            .rotate
            .and_then(NonZeroU32::new)
            .or(env.rotate)
            .or_else(|| NonZeroU32::new(DEFAULT_ROTATE_EVERY))
            .unwrap_or(NonZeroU32::MIN);

        Self {
            kind: args.kind(),
            log: args.log.clone().or(env.log),
            proxyfile: args.proxyfile.clone().or(env.proxyfile),
            rotate,
            endpoint: env.endpoint,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(args.verbose);

    if let Err(e) = validate_args(&args) {
        ui::print_usage_error(&e);
        process::exit(1);
    }

    if let Err(e) = run_check(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Route `tracing` output to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "tellonym_check=debug,tellonym_check_lib=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Checks clap's declarative rules can't express.
fn validate_args(args: &Args) -> Result<(), String> {
    if args.input.is_none() && args.value.is_none() {
        return Err("Provide either --input or --value".to_string());
    }
    Ok(())
}

/// Main checking logic
async fn run_check(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = RunSettings::resolve(&args, load_env_config()?);
    tracing::debug!(?settings, "resolved settings");

    let identifiers = get_identifiers(&args)?;

    let pool = match &settings.proxyfile {
        Some(path) => {
            let pool = ProxyPool::new(load_proxies(path)?);
            if pool.is_none() {
                tracing::warn!(path = %path, "proxy file is empty, checking without proxies");
            }
            pool
        }
        None => None,
    };

    let mut client_config = ClientConfig::default();
    if let Some(endpoint) = &settings.endpoint {
        client_config = client_config.with_endpoint(endpoint.clone());
    }
    let client = TellonymClient::with_config(client_config)?;

    ui::print_banner(settings.kind);

    let mut reporter = ui::TerminalReporter::new(settings.log.as_ref().map(LogFile::new));
    let mut scheduler = Scheduler::new(
        RotationPolicy::new(settings.rotate),
        pool,
        StdRng::from_entropy(),
    );

    let start_time = std::time::Instant::now();
    reporter.begin(identifiers.len());
    let summary = scheduler
        .run(&identifiers, settings.kind, &client, &mut reporter)
        .await;
    reporter.finish();

    if identifiers.len() > 1 {
        ui::print_summary(&summary, start_time.elapsed());
    }

    Ok(())
}

/// Identifiers from `--input` or `--value`, trimmed, blanks dropped.
fn get_identifiers(args: &Args) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    if let Some(path) = &args.input {
        return Ok(load_identifiers(path)?);
    }

    Ok(args
        .value
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect())
}
