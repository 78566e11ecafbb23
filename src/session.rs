// 🏧 Teller Session - form state + the four customer actions
//
// Front-ends write into `pin_input` / `amount_input`, call an action, and
// show `status()`. Nothing here knows about terminals.

use crate::account::Account;
use crate::error::AtmResult;
use crate::input::{parse_new_pin, AmountValidator, DigitsOnly};
use chrono::{DateTime, Local};

// ============================================================================
// STATUS LINE
// ============================================================================

#[derive(Debug, Clone)]
pub struct Status {
    pub message: String,
    pub success: bool,
    /// Failed because the PIN was wrong
    pub auth_failure: bool,
    pub at: DateTime<Local>,
}

impl Status {
    fn from_result(result: AtmResult<String>) -> Self {
        let (message, success, auth_failure) = match result {
            Ok(message) => (message, true, false),
            Err(err) => (err.to_string(), false, err.is_auth_failure()),
        };

        Status {
            message,
            success,
            auth_failure,
            at: Local::now(),
        }
    }
}

// ============================================================================
// TELLER
// ============================================================================

pub struct Teller {
    account: Account,
    validator: Box<dyn AmountValidator>,
    status: Status,

    /// PIN field; also the old PIN for a PIN change
    pub pin_input: String,

    /// Amount field for deposit/withdraw
    pub amount_input: String,
}

impl Teller {
    pub fn new(account: Account) -> Self {
        let status = Status {
            message: format!("Your initial PIN is: {}", account.pin()),
            success: true,
            auth_failure: false,
            at: Local::now(),
        };

        Teller {
            account,
            validator: Box::new(DigitsOnly),
            status,
            pin_input: String::new(),
            amount_input: String::new(),
        }
    }

    /// Swap the amount parsing rule
    pub fn with_validator(mut self, validator: impl AmountValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn clear_inputs(&mut self) {
        self.pin_input.clear();
        self.amount_input.clear();
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    pub fn deposit_action(&mut self) -> &Status {
        let result = self.parse_amount().and_then(|amount| {
            let balance = self.account.deposit(amount, &self.pin_input)?;
            Ok(format!("Deposited {:.2}. New balance: {:.2}", amount, balance))
        });
        self.set_status(result)
    }

    pub fn withdraw_action(&mut self) -> &Status {
        let result = self.parse_amount().and_then(|amount| {
            let balance = self.account.withdraw(amount, &self.pin_input)?;
            Ok(format!("Withdrew {:.2}. New balance: {:.2}", amount, balance))
        });
        self.set_status(result)
    }

    pub fn check_balance_action(&mut self) -> &Status {
        let result = self
            .account
            .check_balance(&self.pin_input)
            .map(|balance| format!("Your current balance is: {:.2}", balance));
        self.set_status(result)
    }

    /// New PIN format is checked before the old PIN is
    pub fn change_pin_action(&mut self, new_pin: &str) -> &Status {
        let result = parse_new_pin(new_pin).and_then(|new_pin| {
            self.account.change_pin(&self.pin_input, new_pin)?;
            Ok("PIN changed successfully.".to_string())
        });
        self.set_status(result)
    }

    fn parse_amount(&self) -> AtmResult<f64> {
        self.validator.validate_amount(&self.amount_input)
    }

    fn set_status(&mut self, result: AtmResult<String>) -> &Status {
        self.status = Status::from_result(result);
        &self.status
    }
}
