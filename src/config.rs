// ⚙️ Configuration - optional JSON file, every field defaulted
//
// {
//   "initial_balance": 100.0,
//   "pin": "1234",
//   "log_file": "atm.log",
//   "log_level": "debug"
// }

use crate::account::Account;
use crate::pin::is_valid_pin;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtmConfig {
    /// Opening balance of the simulated account
    pub initial_balance: f64,

    /// Fixed starting PIN; a random one is generated when absent
    pub pin: Option<String>,

    /// Where log output goes
    pub log_file: Option<PathBuf>,

    /// tracing filter directive, overridden by RUST_LOG
    pub log_level: String,
}

impl Default for AtmConfig {
    fn default() -> Self {
        AtmConfig {
            initial_balance: 0.0,
            pin: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl AtmConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AtmConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.initial_balance.is_finite() || self.initial_balance < 0.0 {
            bail!(
                "initial_balance must be a finite, non-negative amount (got {})",
                self.initial_balance
            );
        }

        if let Some(pin) = &self.pin {
            if !is_valid_pin(pin) {
                bail!("pin must be exactly 4 digits");
            }
        }

        Ok(())
    }

    /// Open the simulated account described by this config
    pub fn open_account(&self) -> Result<Account> {
        self.validate()?;

        let account = match &self.pin {
            Some(pin) => Account::with_pin(self.initial_balance, pin.clone())?,
            None => Account::new(self.initial_balance)?,
        };

        Ok(account)
    }
}
