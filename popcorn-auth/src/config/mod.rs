mod settings;

pub use settings::Settings;

use crate::error::AuthError;

/// Load and validate settings, printing setup hints on failure
pub fn load_settings(config_path: Option<&str>) -> Result<Settings, AuthError> {
    let settings = match config_path {
        Some(path) => Settings::from_path(path),
        None => Settings::new(),
    }
    .map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("\nA config.toml file may contain the following keys:");
        eprintln!("\napi_base_url = \"http://localhost:8080/api\"");
        eprintln!("app_url = \"http://localhost:3000/\"");
        eprintln!("provider = \"google\"");
        eprintln!("request_timeout_secs = 10");
        AuthError::Configuration(e.to_string())
    })?;

    settings.validate().map_err(|e| {
        eprintln!("Configuration validation failed: {}", e);
        AuthError::Configuration(e)
    })?;

    Ok(settings)
}
