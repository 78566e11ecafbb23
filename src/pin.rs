// 🔢 PIN helpers - generation, format check, on-screen masking
//
// PINs are plain 4-digit strings. Generation uses a non-cryptographic RNG.

use rand::Rng;

/// Number of digits in a PIN
pub const PIN_LENGTH: usize = 4;

/// Generate a random PIN of `PIN_LENGTH` ASCII digits (leading zeros allowed)
pub fn generate_pin<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..PIN_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Exactly `PIN_LENGTH` ASCII digits
pub fn is_valid_pin(text: &str) -> bool {
    text.len() == PIN_LENGTH && text.bytes().all(|b| b.is_ascii_digit())
}

/// One '*' per character
pub fn mask(text: &str) -> String {
    "*".repeat(text.chars().count())
}
