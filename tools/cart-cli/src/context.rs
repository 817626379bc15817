//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use turbo_cache::FileStorage;
use turbo_cart::api::StorefrontApi;
use turbo_cart::config::CartConfig;
use turbo_cart::notify::RecordingNotifier;
use turbo_cart::CartStore;

use crate::output::Output;

/// Config file names, in lookup order.
pub const CONFIG_NAMES: [&str; 3] = ["cart.toml", ".cart.toml", "cart.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Cart configuration.
    pub config: CartConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

/// A store opened for one command, with the notices it raises.
pub struct Session {
    pub store: CartStore,
    pub notices: Arc<RecordingNotifier>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            let path = PathBuf::from(path);
            (CartConfig::load(&path)?, Some(path))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CartConfig::default(), None),
            }
        };

        if let Some(ref path) = config_path {
            output.debug(&format!("Using config {}", path.display()));
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(CartConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    match CartConfig::load(&config_path) {
                        Ok(config) => return Some((config, config_path)),
                        Err(e) => tracing::warn!(error = %e, "skipping unreadable config"),
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Path of the storage file.
    pub fn storage_path(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.path)
    }

    /// Open the cart store described by the configuration.
    pub fn open_store(&self) -> Result<Session> {
        let api = Arc::new(
            StorefrontApi::from_config(&self.config.api)
                .context("Failed to create storefront client")?,
        );
        let storage_path = self.storage_path();
        let storage = FileStorage::open(&storage_path)
            .with_context(|| format!("Failed to open storage: {}", storage_path.display()))?;
        let notices = Arc::new(RecordingNotifier::new());

        self.output.debug(&format!(
            "Cart {} in {}",
            self.config.storage.key,
            storage_path.display()
        ));

        let store = CartStore::builder(api.clone(), api, storage)
            .notifier(notices.clone())
            .key(self.config.storage.key.clone())
            .build();

        Ok(Session { store, notices })
    }
}
