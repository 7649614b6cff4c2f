//! Strong password generation.
//!
//! Passwords are the sole safeguard on a protected file and are never
//! recorded, so they come from the OS-backed CSPRNG, not a general-purpose
//! PRNG.

use ring::rand::{SecureRandom, SystemRandom};

use crate::error::{Error, Result};

/// Characters a generated password may contain: uppercase and lowercase
/// letters, digits, and a fixed symbol set.
pub const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";

/// Default length of generated passwords.
pub const DEFAULT_PASSWORD_LENGTH: usize = 20;

// Largest multiple of the charset size that fits in a byte; bytes at or
// above it are rejected to keep the character distribution uniform.
const REJECTION_LIMIT: usize = 256 - 256 % PASSWORD_CHARSET.len();

/// Generates a uniformly random password of `length` characters drawn from
/// [`PASSWORD_CHARSET`].
pub fn generate(length: usize) -> Result<String> {
    let rng = SystemRandom::new();
    let mut password = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while password.len() < length {
        rng.fill(&mut buf)
            .map_err(|_| Error::Crypto("OS random source failed".into()))?;
        for &byte in buf.iter() {
            if (byte as usize) < REJECTION_LIMIT {
                password.push(PASSWORD_CHARSET[byte as usize % PASSWORD_CHARSET.len()] as char);
                if password.len() == length {
                    break;
                }
            }
        }
    }

    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_length_matches_request() {
        for length in [1, 8, 20, 64, 100] {
            assert_eq!(generate(length).unwrap().len(), length);
        }
    }

    #[test]
    fn characters_come_from_the_declared_set() {
        let password = generate(500).unwrap();
        for c in password.bytes() {
            assert!(
                PASSWORD_CHARSET.contains(&c),
                "unexpected character {:?}",
                c as char
            );
        }
    }

    #[test]
    fn passwords_are_pairwise_distinct() {
        // Statistical distinctness: 200 twenty-character passwords over an
        // 89-character alphabet collide with negligible probability.
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            assert!(seen.insert(generate(DEFAULT_PASSWORD_LENGTH).unwrap()));
        }
    }
}
