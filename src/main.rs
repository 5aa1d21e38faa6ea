use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use avatar_resolver::domain::ports::KeyValueStorePort;
use avatar_resolver::infrastructure::{
    AppConfig, CliArgs, HttpCheckConfig, HttpExistenceCheck, JsonFileStore, MemoryStore,
    StorageManager, SystemClock,
};
use avatar_resolver::{AvatarRequest, AvatarResolver};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new().unwrap_or_else(|_| {
        StorageManager::with_dir(std::env::temp_dir().join(avatar_resolver::NAME))
    });
    let mut config = storage
        .load_config(args.config.as_deref())
        .wrap_err("Failed to load configuration")?;
    config.merge_with_args(args);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = avatar_resolver::VERSION, "Starting avatar-resolver");

    let file_store = if config.storage.ephemeral {
        None
    } else {
        let path = config.effective_cache_path();
        let store = JsonFileStore::open(&path)
            .await
            .wrap_err_with(|| format!("Failed to open cache at {}", path.display()))?;
        Some(Arc::new(store))
    };
    let store: Arc<dyn KeyValueStorePort> = match &file_store {
        Some(store) => store.clone(),
        None => Arc::new(MemoryStore::new()),
    };

    let checker = Arc::new(
        HttpExistenceCheck::new(&HttpCheckConfig::default())
            .wrap_err("Failed to create HTTP client")?,
    );
    let resolver = AvatarResolver::new(
        checker,
        store,
        Arc::new(SystemClock),
        config.resolver.to_resolver_config(),
    );

    if args.clear_cache {
        resolver.cache().clear().await;
        info!("Cleared provider cache");
    }

    let request = AvatarRequest::new(
        args.identity.as_str(),
        args.label.as_str(),
        args.size.unwrap_or(config.resolver.default_size),
        config.resolver.overlay && !args.no_overlay,
    );
    let avatar = resolver.resolve(&request).await;
    info!(player = %request.player_id, source = %avatar.source, "Avatar resolved");

    println!("{}", avatar.url());

    resolver.shutdown();
    if let Some(store) = file_store
        && let Err(e) = store.close().await
    {
        warn!(error = %e, "Failed to close cache store");
    }

    Ok(())
}
