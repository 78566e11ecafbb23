// ⚠️ ATM Errors - every failure is a value with a human-readable message
//
// The Display text of each variant IS the message shown to the customer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AtmError {
    // ========================================================================
    // ACCOUNT OPERATIONS
    // ========================================================================
    #[error("Invalid PIN.")]
    InvalidPin,

    #[error("Invalid deposit amount.")]
    InvalidDepositAmount,

    #[error("Insufficient funds or invalid withdrawal amount.")]
    InvalidWithdrawal,

    #[error("Incorrect old PIN.")]
    IncorrectOldPin,

    #[error("Opening balance must be a finite, non-negative amount (got {0})")]
    InvalidOpeningBalance(f64),

    // ========================================================================
    // FRONT-END INPUT
    // ========================================================================
    #[error("Please enter a valid amount.")]
    InvalidAmountInput,

    #[error("Please enter a valid 4-digit PIN.")]
    InvalidNewPin,
}

impl AtmError {
    /// True for failures caused by a wrong PIN (as opposed to a bad amount)
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, AtmError::InvalidPin | AtmError::IncorrectOldPin)
    }
}

pub type AtmResult<T> = Result<T, AtmError>;
