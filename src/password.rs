use bcrypt::DEFAULT_COST;

use crate::error::AppError;

/// Salted one-way hash. bcrypt generates a fresh random salt per call, so
/// hashing the same input twice yields different strings.
pub fn hash(plain: &str) -> Result<String, AppError> {
    bcrypt::hash(plain, DEFAULT_COST).map_err(|e| AppError::Internal(e.to_string()))
}

/// Returns false on mismatch or on a malformed stored hash, never errors.
pub fn verify(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrips() {
        let hashed = hash("hunter2!").unwrap();
        assert!(verify("hunter2!", &hashed));
        assert!(!verify("hunter3!", &hashed));
    }

    #[test]
    fn hashing_twice_salts_differently() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();
        assert_ne!(a, b);
        assert!(verify("same-password", &a));
        assert!(verify("same-password", &b));
    }

    #[test]
    fn malformed_hash_is_just_a_mismatch() {
        assert!(!verify("anything", "not-a-bcrypt-hash"));
    }
}
