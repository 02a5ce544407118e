//! signed-url -- sign and verify time-limited URLs from the command line.
//!
//! Default credentials come from a YAML configuration file; `verify` can
//! override each of them so URLs issued under other keys can be checked.

use anyhow::Context;
use chrono::{DateTime, TimeZone, Utc};
use clap::{Args, Parser, Subcommand};
use std::io::ErrorKind;
use std::process::ExitCode;
use tracing::{info, warn};

use signed_url::config::{load_config, parse_config, Config, LogFormat, LoggingConfig};
use signed_url::{validate_at, Expires, Generator, SigningConfig, ValidationRequest};

/// Config path used when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "signed-url.example.yaml";

/// Command-line arguments for the signed-url tool.
#[derive(Parser, Debug)]
#[command(
    name = "signed-url",
    version,
    about = "Generate and validate HMAC-SHA256 signed URLs"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a signed URL for a path using the configured credentials
    Sign {
        /// Resource path appended to the configured host.
        #[arg(long)]
        path: String,

        #[command(flatten)]
        expiry: ExpiryArgs,
    },
    /// Check a presented URL; exits non-zero when it is invalid
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ExpiryArgs {
    /// Absolute expiry in epoch seconds.
    #[arg(long, allow_negative_numbers = true)]
    expires: Option<i64>,

    /// Expiry relative to now, in seconds.
    #[arg(long)]
    ttl: Option<i64>,
}

impl ExpiryArgs {
    /// `--expires` wins; otherwise `--ttl` counts from `now`.
    fn resolve(&self, now: DateTime<Utc>) -> anyhow::Result<Expires> {
        if let Some(expires) = self.expires {
            return Ok(Expires::from_secs(expires));
        }
        let ttl = self.ttl.context("one of --expires or --ttl is required")?;
        Ok(Expires::after(now, ttl))
    }
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Resource path the URL was signed for.
    #[arg(long)]
    path: String,

    /// Expiry (epoch seconds) the URL was signed with.
    #[arg(long, allow_negative_numbers = true)]
    expires: i64,

    /// The URL to check.
    #[arg(long)]
    url: String,

    /// Evaluate as of this epoch second instead of the current time.
    #[arg(long, allow_negative_numbers = true)]
    now: Option<i64>,

    /// Override the configured host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured key id.
    #[arg(long)]
    key_id: Option<String>,

    /// Override the configured secret.
    #[arg(long, env = "SIGNED_URL_SECRET", hide_env_values = true)]
    secret: Option<String>,
}

impl VerifyArgs {
    /// Credentials to check against: each flag replaces the configured value.
    fn credentials(&self, configured: SigningConfig) -> SigningConfig {
        SigningConfig {
            host: self.host.clone().unwrap_or(configured.host),
            key_id: self.key_id.clone().unwrap_or(configured.key_id),
            secret: self.secret.clone().unwrap_or(configured.secret),
        }
    }

    fn evaluated_at(&self) -> anyhow::Result<DateTime<Utc>> {
        match self.now {
            Some(secs) => Utc
                .timestamp_opt(secs, 0)
                .single()
                .context("--now is out of range"),
            None => Ok(Utc::now()),
        }
    }

    /// True when `--url` is a valid, unexpired URL for these inputs.
    fn check(&self, configured: SigningConfig) -> anyhow::Result<bool> {
        let credentials = self.credentials(configured);
        let request = ValidationRequest {
            key_id: credentials.key_id,
            secret: credentials.secret,
            path: self.path.clone(),
            host: credentials.host,
            expires: Expires::from_secs(self.expires),
            request_url: self.url.clone(),
        };
        Ok(validate_at(&request, self.evaluated_at()?))
    }
}

/// Read the configuration for `verify`, where every credential may come
/// from flags.
///
/// Only a missing file at the default path is tolerated (`Ok(None)`); any
/// other read or parse failure is an error.
fn load_verify_config(path: &str) -> anyhow::Result<Option<Config>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let config = parse_config(&contents)
                .with_context(|| format!("loading configuration from {path}"))?;
            Ok(Some(config))
        }
        Err(e) if e.kind() == ErrorKind::NotFound && path == DEFAULT_CONFIG_PATH => Ok(None),
        Err(e) => Err(e).with_context(|| format!("loading configuration from {path}")),
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sign { path, expiry } => {
            let config = load_config(&cli.config)
                .with_context(|| format!("loading configuration from {}", cli.config))?;
            init_logging(&config.logging);
            info!("Loaded configuration from {}", cli.config);

            let generator = Generator::with_config(config.signing)?;
            let url = generator.generate(&path, expiry.resolve(Utc::now())?)?;
            println!("{url}");
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify(args) => {
            let loaded = load_verify_config(&cli.config)?;
            let config = match loaded {
                Some(config) => {
                    init_logging(&config.logging);
                    config
                }
                None => {
                    init_logging(&LoggingConfig::default());
                    warn!(
                        "{} not found; using credentials from flags only",
                        cli.config
                    );
                    Config::default()
                }
            };

            if args.check(config.signing)? {
                println!("valid");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("invalid");
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

// -- Tests --------------------------------------------------------------------
