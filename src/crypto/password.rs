//! Random password generation.

use rand::Rng;

const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Generate a password of `length` characters drawn uniformly from
/// letters and digits, plus symbols when `include_symbols` is set.
///
/// Uses the thread-local CSPRNG, which is reseeded from the OS.
pub fn generate_password(length: usize, include_symbols: bool) -> String {
    let mut alphabet = ALPHANUMERIC.to_vec();
    if include_symbols {
        alphabet.extend_from_slice(SYMBOLS);
    }

    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(alphabet[rng.random_range(0..alphabet.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_length() {
        assert_eq!(generate_password(16, true).len(), 16);
        assert_eq!(generate_password(64, false).len(), 64);
        assert!(generate_password(0, true).is_empty());
    }

    #[test]
    fn without_symbols_is_alphanumeric() {
        let pw = generate_password(500, false);
        assert!(pw.bytes().all(|b| b.is_ascii_alphanumeric()));
    }

    #[test]
    fn with_symbols_stays_in_alphabet() {
        let pw = generate_password(500, true);
        assert!(pw
            .bytes()
            .all(|b| ALPHANUMERIC.contains(&b) || SYMBOLS.contains(&b)));
    }

    #[test]
    fn successive_passwords_differ() {
        assert_ne!(generate_password(32, true), generate_password(32, true));
    }
}
