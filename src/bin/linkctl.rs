//! CLI tool for the link engine.
//!
//! Lets operators inspect the deterministic pipeline without a running
//! service: canonicalize a URL, derive the code it would get, run an
//! in-memory end-to-end smoke check, or validate environment configuration.
//!
//! # Usage
//!
//! ```bash
//! # Show the canonical form of a URL
//! cargo run --bin linkctl -- canon "HTTP://Example.com:80/path?z=1&a=2#s"
//!
//! # Derive the code a URL gets in tenant 42
//! cargo run --bin linkctl -- derive 42 "https://example.com"
//!
//! # Derive the collision-retry candidate at salt 3, length 12
//! cargo run --bin linkctl -- derive 42 "https://example.com" --salt 3 --length 12
//!
//! # End-to-end smoke check against an in-memory store
//! cargo run --bin linkctl -- smoke 42 "https://example.com"
//!
//! # Validate environment configuration
//! cargo run --bin linkctl -- config
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use link_engine::application::services::{ResolverService, ShortenerService};
use link_engine::config::Config;
use link_engine::infrastructure::cache::MemoryCache;
use link_engine::infrastructure::persistence::MemoryLinkStore;
use link_engine::utils::code_deriver::{derive_code, DEFAULT_CODE_LENGTH};
use link_engine::utils::url_canonicalizer::canonicalize_url;

/// CLI tool for the deterministic link engine.
#[derive(Parser)]
#[command(name = "linkctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of a URL
    Canon {
        /// Raw URL to canonicalize
        url: String,
    },

    /// Derive the short code for a URL within a tenant
    Derive {
        /// Tenant id scoping the code
        tenant: String,

        /// Raw URL (canonicalized before derivation)
        url: String,

        /// Collision retry salt
        #[arg(short, long, default_value_t = 0)]
        salt: u32,

        /// Target code length
        #[arg(short, long, default_value_t = DEFAULT_CODE_LENGTH)]
        length: usize,
    },

    /// Run get-or-create and resolve against an in-memory store
    Smoke {
        /// Tenant id
        tenant: String,

        /// Raw URL
        url: String,
    },

    /// Load and validate configuration from the environment
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Canon { url } => canon(&url),
        Commands::Derive {
            tenant,
            url,
            salt,
            length,
        } => derive(&tenant, &url, salt, length),
        Commands::Smoke { tenant, url } => smoke(&tenant, &url).await,
        Commands::Config => check_config(),
    }
}

fn canon(url: &str) -> Result<()> {
    let canonical = canonicalize_url(url).context("canonicalization failed")?;
    println!("{}", canonical.green());
    Ok(())
}

fn derive(tenant: &str, url: &str, salt: u32, length: usize) -> Result<()> {
    let canonical = canonicalize_url(url).context("canonicalization failed")?;
    let code = derive_code(&canonical, tenant, salt, length).context("derivation failed")?;

    println!("{} {}", "canonical:".dimmed(), canonical);
    println!("{} {}", "code:     ".dimmed(), code.green().bold());
    Ok(())
}

async fn smoke(tenant: &str, url: &str) -> Result<()> {
    let store = Arc::new(MemoryLinkStore::new());
    let cache = Arc::new(MemoryCache::new(1024, 60));

    let shortener = ShortenerService::new(Arc::clone(&store));
    let resolver = ResolverService::new(Arc::clone(&store), cache, 60);

    let first = shortener.get_or_create(tenant, url).await?;
    let second = shortener.get_or_create(tenant, url).await?;

    if first.code != second.code || store.record_count() != 1 {
        anyhow::bail!("get-or-create is not idempotent: {} vs {}", first.code, second.code);
    }

    let resolved = resolver.resolve(tenant, &first.code).await?;

    println!("{} {}", "canonical:".dimmed(), resolved.canonical_url);
    println!("{} {}", "code:     ".dimmed(), resolved.code.green().bold());
    println!("{}", "✓ idempotent creation, resolution OK".green());
    Ok(())
}

fn check_config() -> Result<()> {
    let config = Config::from_env()?;

    println!("{}", "Configuration OK".green().bold());
    println!("  code length:        {}", config.code_length);
    println!("  collision attempts: {}", config.max_collision_attempts);
    println!("  cache TTL:          {}s", config.cache_ttl_seconds);
    println!(
        "  cache backend:      {}",
        if config.is_cache_enabled() {
            "redis"
        } else {
            "disabled"
        }
    );
    Ok(())
}
