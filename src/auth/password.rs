use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Stand-in hash with the same Argon2 parameters as `Argon2::default()`.
/// Logins for unknown emails verify against it so they cost as much as a
/// wrong password.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$hlhMZg1NsIZE5s9tnfchpw$tAHZSIGeFq9eb0Q5Ey0T8WxhUwn48p05ZqvFr4kox4c";

/// Salted Argon2id hash in PHC string form.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Checks `plain` against the stored hash of a user, if there is one.
/// Without a user the dummy hash is verified and the result discarded, so
/// both outcomes do the same amount of work.
pub fn verify_credentials(plain: &str, stored: Option<&str>) -> anyhow::Result<bool> {
    match stored {
        Some(hash) => verify_password(plain, hash),
        None => {
            verify_password(plain, DUMMY_HASH)?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_hash_is_not_the_plaintext() {
        let hash = hash_password("pw123").expect("hashing should succeed");
        assert_ne!(hash, "pw123");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("pw123", &hash).expect("verify should succeed"));
    }

    #[test]
    fn registration_password_does_not_match_another() {
        let hash = hash_password("pw123").expect("hashing should succeed");
        assert!(!verify_password("pw124", &hash).expect("verify should not error"));
    }

    #[test]
    fn two_users_with_one_password_get_different_hashes() {
        let alice = hash_password("hunter2").unwrap();
        let bob = hash_password("hunter2").unwrap();
        assert_ne!(alice, bob);
    }

    #[test]
    fn corrupted_stored_hash_is_an_error() {
        assert!(verify_password("pw123", "not-a-valid-hash").is_err());
        assert!(verify_credentials("pw123", Some("not-a-valid-hash")).is_err());
    }

    #[test]
    fn dummy_hash_uses_default_parameters() {
        let parsed = PasswordHash::new(DUMMY_HASH).expect("dummy hash parses");
        let real = hash_password("pw123").unwrap();
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(parsed.algorithm, real.algorithm);
        assert_eq!(parsed.params, real.params);
    }

    #[test]
    fn unknown_user_never_verifies() {
        assert!(!verify_credentials("pw123", None).expect("dummy verify runs"));
        assert!(!verify_credentials("", None).expect("dummy verify runs"));
    }

    #[test]
    fn known_user_verifies_against_their_hash() {
        let hash = hash_password("pw123").unwrap();
        assert!(verify_credentials("pw123", Some(&hash)).unwrap());
        assert!(!verify_credentials("nope", Some(&hash)).unwrap());
    }
}
