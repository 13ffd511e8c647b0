//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, CatalogConfig, GateConfig};
use crate::domain::error::ConfigError;
use crate::domain::timing::{Backoff, Duration};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let config = store.load().await?;
    presenter.output(lookup_value(&config, key).as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, lookup_value(&config, key).as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_valid_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "gate.retry_interval" => {
            config.gate.get_or_insert_with(GateConfig::default).retry_interval = Some(value.to_string())
        }
        "gate.retry_deadline" => {
            config.gate.get_or_insert_with(GateConfig::default).retry_deadline = Some(value.to_string())
        }
        "gate.backoff" => {
            config.gate.get_or_insert_with(GateConfig::default).backoff = Some(value.to_lowercase())
        }
        "catalog.max_name_len" => {
            config.catalog.get_or_insert_with(CatalogConfig::default).max_name_len =
                Some(parse_name_len(key, value)?)
        }
        _ => {
            return Err(ConfigError::ValidationError {
                key: key.to_string(),
                message: "Key cannot be set".to_string(),
            })
        }
    }
    Ok(())
}

fn lookup_value(config: &AppConfig, key: &str) -> Option<String> {
    let gate = config.gate.as_ref();
    match key {
        "gate.retry_interval" => gate.and_then(|g| g.retry_interval.clone()),
        "gate.retry_deadline" => gate.and_then(|g| g.retry_deadline.clone()),
        "gate.backoff" => gate.and_then(|g| g.backoff.clone()),
        "catalog.max_name_len" => config
            .catalog
            .as_ref()
            .and_then(|c| c.max_name_len)
            .map(|len| len.to_string()),
        _ => None,
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "gate.retry_interval" | "gate.retry_deadline" => {
            value.parse::<Duration>().map_err(|e| invalid(e.to_string()))?;
        }
        "gate.backoff" => {
            value.parse::<Backoff>().map_err(|e| invalid(e.to_string()))?;
        }
        "catalog.max_name_len" => {
            parse_name_len(key, value)?;
        }
        _ => {}
    }
    Ok(())
}

fn parse_name_len(key: &str, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(len) if len > 0 => Ok(len),
        _ => Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be a positive integer".to_string(),
        }),
    }
}
