//! Password verification and policy.
//!
//! Hashes are produced by the user repository at provisioning time
//! (Argon2id, PHC string format). Verification accepts any Argon2
//! variant the PHC string names.

use std::borrow::Cow;

use argon2::{Argon2, PasswordVerifier};

use crate::error::AuthError;

fn peppered<'a>(password: &'a str, pepper: Option<&str>) -> Cow<'a, str> {
    match pepper {
        Some(p) => Cow::Owned(format!("{p}{password}")),
        None => Cow::Borrowed(password),
    }
}

/// Verify a plaintext password against a stored PHC hash.
///
/// `pepper` must match the one used when the hash was created.
/// `Ok(false)` means a mismatch; `Err` means the stored hash is unusable.
pub fn verify_password(
    password: &str,
    hash: &str,
    pepper: Option<&str>,
) -> Result<bool, AuthError> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| AuthError::Crypto(format!("invalid hash format: {e}")))?;

    let input = peppered(password, pepper);
    match Argon2::default().verify_password(input.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Crypto(format!("verify error: {e}"))),
    }
}

/// Enforce the minimum length policy on a new password.
pub fn check_policy(password: &str, min_length: usize) -> Result<(), AuthError> {
    if password.chars().count() < min_length {
        return Err(AuthError::WeakPassword { min_length });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::PasswordHasher;
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;

    fn hash(password: &str, pepper: Option<&str>) -> String {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(peppered(password, pepper).as_bytes(), &salt)
            .expect("hashing failed")
            .to_string()
    }

    #[test]
    fn matching_password_verifies() {
        let stored = hash("password123", None);
        assert!(verify_password("password123", &stored, None).unwrap());
        assert!(!verify_password("password124", &stored, None).unwrap());
    }

    #[test]
    fn pepper_must_match() {
        let stored = hash("password123", Some("kitchen-secret"));
        assert!(verify_password("password123", &stored, Some("kitchen-secret")).unwrap());
        assert!(!verify_password("password123", &stored, None).unwrap());
        assert!(!verify_password("password123", &stored, Some("other")).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify_password("pw", "plaintext", None),
            Err(AuthError::Crypto(_))
        ));
    }

    #[test]
    fn policy_counts_characters() {
        assert!(check_policy("password123", 8).is_ok());
        assert!(matches!(
            check_policy("short", 8),
            Err(AuthError::WeakPassword { min_length: 8 })
        ));
        // Eight multi-byte characters satisfy an eight-character minimum.
        assert!(check_policy("दालमखनीदाल", 8).is_ok());
    }
}
