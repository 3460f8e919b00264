use sha2::{Digest, Sha256};

/// 32 random bytes, hex encoded. Only ever sent to the user, never stored.
pub fn generate() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// The form a reset token is stored and looked up in.
pub fn hash(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
