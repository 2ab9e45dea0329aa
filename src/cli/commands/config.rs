//! Config command implementation.

use crate::cli::ConfigAction;
use crate::config::Settings;
use crate::error::{Result, SvarError};

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| SvarError::Config(format!("Failed to serialize config: {}", e)))?;
            println!("{}", toml_str);
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}
