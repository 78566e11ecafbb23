// ATM Simulator - Core Library
// Exposes the account and teller logic for the TUI, console mode, and tests

pub mod account;
pub mod config;
pub mod console;
pub mod error;
pub mod input;
pub mod pin;
pub mod session;

// Re-export commonly used types
pub use account::Account;
pub use config::AtmConfig;
pub use console::{run_console, Command};
pub use error::{AtmError, AtmResult};
pub use input::{parse_amount, parse_new_pin, AmountValidator, DigitsOnly};
pub use pin::{generate_pin, is_valid_pin, mask, PIN_LENGTH};
pub use session::{Status, Teller};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
