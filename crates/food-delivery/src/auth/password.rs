//! bcrypt runs on the blocking pool so hashing never stalls an executor thread.

use crate::error::ApiError;

pub async fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(format!("hashing task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("hashing failed: {}", e)))
}

/// `false` for a wrong password; an error only if the stored hash is unusable.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("verification task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("stored hash is invalid: {}", e)))
}
