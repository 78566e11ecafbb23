// 💳 Account Entity - one balance, one PIN, four gated operations
//
// Every operation re-authenticates with the PIN it is given. A wrong PIN is
// reported before any amount check and never changes state.

use crate::error::{AtmError, AtmResult};
use crate::pin::generate_pin;
use std::fmt;
use tracing::{debug, warn};

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

/// Single-user ATM account
///
/// Invariant: `balance` is finite and never negative.
#[derive(Clone)]
pub struct Account {
    /// Current balance, mutated only by successful deposit/withdraw
    balance: f64,

    /// Stored PIN, mutated only by a successful PIN change
    pin: String,
}

impl Account {
    /// Open an account with a freshly generated random PIN
    pub fn new(initial_balance: f64) -> AtmResult<Self> {
        let pin = generate_pin(&mut rand::thread_rng());
        Self::with_pin(initial_balance, pin)
    }

    /// Open an account with a known PIN
    pub fn with_pin(initial_balance: f64, pin: impl Into<String>) -> AtmResult<Self> {
        if !initial_balance.is_finite() || initial_balance < 0.0 {
            return Err(AtmError::InvalidOpeningBalance(initial_balance));
        }

        Ok(Account {
            balance: initial_balance,
            pin: pin.into(),
        })
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Exact string comparison against the stored PIN
    pub fn authenticate(&self, candidate: &str) -> bool {
        candidate == self.pin
    }

    /// Deposit `amount` and return the new balance
    pub fn deposit(&mut self, amount: f64, pin: &str) -> AtmResult<f64> {
        self.require_pin(pin, AtmError::InvalidPin)?;

        if !is_positive_amount(amount) {
            return Err(AtmError::InvalidDepositAmount);
        }

        let new_balance = self.balance + amount;
        if !new_balance.is_finite() {
            return Err(AtmError::InvalidDepositAmount);
        }

        self.balance = new_balance;
        debug!(amount, balance = self.balance, "deposit accepted");
        Ok(self.balance)
    }

    /// Withdraw `amount` and return the new balance
    pub fn withdraw(&mut self, amount: f64, pin: &str) -> AtmResult<f64> {
        self.require_pin(pin, AtmError::InvalidPin)?;

        if !is_positive_amount(amount) || amount > self.balance {
            return Err(AtmError::InvalidWithdrawal);
        }

        self.balance -= amount;
        debug!(amount, balance = self.balance, "withdrawal accepted");
        Ok(self.balance)
    }

    /// Current balance, after authentication
    pub fn check_balance(&self, pin: &str) -> AtmResult<f64> {
        self.require_pin(pin, AtmError::InvalidPin)?;
        debug!(balance = self.balance, "balance inquiry");
        Ok(self.balance)
    }

    /// Replace the PIN after authenticating with the old one.
    ///
    /// The new PIN is stored as given; format checks belong to the caller.
    pub fn change_pin(&mut self, old_pin: &str, new_pin: &str) -> AtmResult<()> {
        self.require_pin(old_pin, AtmError::IncorrectOldPin)?;
        self.pin = new_pin.to_string();
        debug!("pin changed");
        Ok(())
    }

    fn require_pin(&self, candidate: &str, on_failure: AtmError) -> AtmResult<()> {
        if self.authenticate(candidate) {
            Ok(())
        } else {
            warn!("authentication failed");
            Err(on_failure)
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("balance", &self.balance)
            .field("pin", &"****")
            .finish()
    }
}

fn is_positive_amount(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::is_valid_pin;
    use proptest::prelude::*;
    use rstest::rstest;

    fn account(balance: f64) -> Account {
        Account::with_pin(balance, "1234").unwrap()
    }

    #[test]
    fn test_new_account_gets_valid_random_pin() {
        let account = Account::new(0.0).unwrap();
        assert!(is_valid_pin(account.pin()));
        assert_eq!(account.balance(), 0.0);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_rejects_bad_opening_balance(#[case] balance: f64) {
        assert!(matches!(
            Account::with_pin(balance, "1234"),
            Err(AtmError::InvalidOpeningBalance(_))
        ));
    }

    #[test]
    fn test_authenticate_is_exact_match() {
        let account = account(0.0);
        assert!(account.authenticate("1234"));
        assert!(!account.authenticate("1234 "));
        assert!(!account.authenticate("4321"));
        assert!(!account.authenticate(""));
    }

    #[test]
    fn test_withdraw_over_balance_then_deposit() {
        let mut account = account(100.0);

        let err = account.withdraw(150.0, "1234").unwrap_err();
        assert_eq!(err.to_string(), "Insufficient funds or invalid withdrawal amount.");
        assert_eq!(account.balance(), 100.0);

        assert_eq!(account.deposit(50.0, "1234").unwrap(), 150.0);
        assert_eq!(account.balance(), 150.0);
    }

    #[test]
    fn test_deposit_rejected_when_balance_would_overflow() {
        let mut account = account(0.0);

        assert_eq!(account.deposit(f64::MAX, "1234"), Ok(f64::MAX));
        assert_eq!(account.deposit(f64::MAX, "1234"), Err(AtmError::InvalidDepositAmount));
        assert_eq!(account.balance(), f64::MAX);
        assert!(account.balance().is_finite());
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = account(100.0);
        assert_eq!(account.withdraw(100.0, "1234").unwrap(), 0.0);
        assert_eq!(account.balance(), 0.0);
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_non_positive_amounts_rejected(#[case] amount: f64) {
        let mut account = account(100.0);
        assert_eq!(account.deposit(amount, "1234"), Err(AtmError::InvalidDepositAmount));
        assert_eq!(account.withdraw(amount, "1234"), Err(AtmError::InvalidWithdrawal));
        assert_eq!(account.balance(), 100.0);
    }

    #[test]
    fn test_wrong_pin_checked_before_amount() {
        let mut account = account(100.0);
        assert_eq!(account.deposit(-5.0, "0000"), Err(AtmError::InvalidPin));
        assert_eq!(account.withdraw(500.0, "0000"), Err(AtmError::InvalidPin));
    }

    #[test]
    fn test_check_balance() {
        let account = account(42.5);
        assert_eq!(account.check_balance("1234"), Ok(42.5));
        assert_eq!(account.check_balance("9999"), Err(AtmError::InvalidPin));
    }

    #[test]
    fn test_change_pin() {
        let mut account = account(0.0);

        account.change_pin("1234", "5678").unwrap();
        assert!(account.authenticate("5678"));
        assert!(!account.authenticate("1234"));
        assert_eq!(account.check_balance("1234"), Err(AtmError::InvalidPin));
        assert_eq!(account.check_balance("5678"), Ok(0.0));
    }

    #[test]
    fn test_change_pin_with_wrong_old_pin() {
        let mut account = account(0.0);
        assert_eq!(account.change_pin("0000", "5678"), Err(AtmError::IncorrectOldPin));
        assert!(account.authenticate("1234"));
    }

    #[test]
    fn test_change_pin_stores_unvalidated_value() {
        let mut account = account(0.0);
        account.change_pin("1234", "abc").unwrap();
        assert_eq!(account.pin(), "abc");
    }

    #[test]
    fn test_debug_hides_pin() {
        let rendered = format!("{:?}", account(10.0));
        assert!(!rendered.contains("1234"));
    }

    proptest! {
        #[test]
        fn prop_deposit_adds_amount(balance in 0.0f64..1e9, amount in 0.01f64..1e9) {
            let mut account = account(balance);
            let new_balance = account.deposit(amount, "1234").unwrap();
            prop_assert_eq!(new_balance, balance + amount);
            prop_assert_eq!(account.balance(), balance + amount);
        }

        #[test]
        fn prop_withdraw_within_balance_succeeds(balance in 1.0f64..1e9, fraction in 0.001f64..=1.0) {
            let mut account = account(balance);
            let amount = balance * fraction;
            let new_balance = account.withdraw(amount, "1234").unwrap();
            prop_assert!(new_balance >= 0.0);
            prop_assert_eq!(account.balance(), new_balance);
        }

        #[test]
        fn prop_withdraw_over_balance_leaves_state(balance in 0.0f64..1e9, extra in 0.01f64..1e9) {
            let mut account = account(balance);
            prop_assert_eq!(account.withdraw(balance + extra, "1234"), Err(AtmError::InvalidWithdrawal));
            prop_assert_eq!(account.balance(), balance);
        }

        #[test]
        fn prop_wrong_pin_never_mutates(balance in 0.0f64..1e9, amount in 0.01f64..1e9, pin in "[0-9]{4}") {
            prop_assume!(pin != "1234");
            let mut account = account(balance);
            prop_assert_eq!(account.deposit(amount, &pin), Err(AtmError::InvalidPin));
            prop_assert_eq!(account.withdraw(amount, &pin), Err(AtmError::InvalidPin));
            prop_assert_eq!(account.check_balance(&pin), Err(AtmError::InvalidPin));
            prop_assert_eq!(account.change_pin(&pin, "0000"), Err(AtmError::IncorrectOldPin));
            prop_assert_eq!(account.balance(), balance);
            prop_assert!(account.authenticate("1234"));
        }
    }
}
