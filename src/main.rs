mod api;
mod app;
mod cache;
mod commands;
mod config;
mod event;
mod favorites;
mod query;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::api::CachedClient;
use crate::cache::{MemoryStore, SqliteStore, Store};
use crate::favorites::Favorites;

#[derive(Parser, Debug)]
#[command(name = "rotom")]
#[command(about = "A terminal Pokédex, inspired by k9s")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/rotom/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Open a Pokémon's detail view directly, by id or name
  #[arg(short, long)]
  pokemon: Option<String>,

  /// Keep the response cache in memory only (nothing persists)
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  // The terminal owns stderr; logs go to a file.
  let _log_guard = init_tracing();

  let store: Arc<dyn Store> = if config.cache.enabled && !args.no_cache {
    match &config.cache.dir {
      Some(dir) => Arc::new(SqliteStore::open_at(&dir.join("cache.db"))?),
      None => Arc::new(SqliteStore::open()?),
    }
  } else {
    Arc::new(MemoryStore::new())
  };

  let client = CachedClient::new(Arc::clone(&store));
  let favorites = Favorites::new(store);

  // Initialize and run the app
  let mut app = app::App::new(config, client, favorites, args.pokemon);
  app.run().await?;

  Ok(())
}

fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
  use tracing_subscriber::EnvFilter;

  let log_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .map(|p| p.join("rotom"))?;

  std::fs::create_dir_all(&log_dir).ok()?;

  let appender = tracing_appender::rolling::never(log_dir, "rotom.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(writer)
    .with_ansi(false)
    .init();

  Some(guard)
}
