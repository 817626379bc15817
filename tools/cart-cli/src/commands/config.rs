//! Configuration management commands.

use anyhow::{bail, Result};
use turbo_cart::config::CartConfig;

use super::{ConfigArgs, ConfigCommand};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    // API section
    ctx.output.info("[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output.kv("timeout_ms", &ctx.config.api.timeout_ms.to_string());
    ctx.output
        .kv("max_retries", &ctx.config.api.max_retries.to_string());

    // Storage section
    ctx.output.info("[storage]");
    ctx.output.kv("key", &ctx.config.storage.key);
    ctx.output
        .kv("path", &ctx.config.storage.path.display().to_string());

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = get_config_value(&ctx.config, key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("cart.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    CartConfig::default().save(&config_path)?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn get_config_value(config: &CartConfig, key: &str) -> Result<serde_json::Value> {
    let parts: Vec<&str> = key.split('.').collect();

    let value = match parts.as_slice() {
        ["api", "base_url"] => config.api.base_url.clone().into(),
        ["api", "timeout_ms"] => config.api.timeout_ms.into(),
        ["api", "max_retries"] => config.api.max_retries.into(),
        ["storage", "key"] => config.storage.key.clone().into(),
        ["storage", "path"] => config.storage.path.display().to_string().into(),
        _ => bail!("Unknown config key: {}", key),
    };

    Ok(value)
}
