use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with Argon2id and a fresh random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// A malformed stored hash verifies as false.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is not a valid PHC string: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_and_verifiable() {
        let first = hash_password("x").unwrap();
        let second = hash_password("x").unwrap();

        assert_ne!(first, "x");
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(verify_password("x", &first));
        assert!(verify_password("x", &second));
        assert!(!verify_password("y", &first));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("x", "plaintext"));
    }
}
