//! Password utilities

use argon2::Argon2;
use argon2::password_hash::Error;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;

/// Generate a new random secret
pub fn generate() -> String {
    SaltString::generate(&mut OsRng).to_string()
}

/// Hash a given password
pub fn hash(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    let hashed_password = Argon2::default().hash_password(password.as_bytes(), &salt)?;

    Ok(hashed_password.to_string())
}

/// Verify a given password against a given hash
///
/// An unparsable hash never matches
pub fn verify(hashed_password: &str, password: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hashed_password) else {
        tracing::error!("Stored password hash can not be parsed");

        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed_password = hash("verysecret").unwrap();

        assert!(verify(&hashed_password, "verysecret"));
        assert!(!verify(&hashed_password, "notsosecret"));
    }

    #[test]
    fn test_invalid_hash() {
        assert!(!verify("not-a-hash", "verysecret"));
    }

    #[test]
    fn test_generate_is_random() {
        assert_ne!(generate(), generate());
    }
}
