use blake3::Hasher;

/// 32-byte BLAKE3 digest of a session token, used as the session cache key.
#[inline]
pub fn hash_token(token: &str) -> [u8; 32] {
    *blake3::hash(token.as_bytes()).as_bytes()
}

/// Fresh random salt (hex, 32 chars).
pub fn new_salt() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Hex-encoded BLAKE3 digest of `salt` and `password`.
#[inline]
pub fn hash_password(salt: &str, password: &str) -> String {
    digest(salt, password).to_hex().to_string()
}

/// Checks `password` against a stored salt and hex digest.
///
/// Malformed stored digests never verify. The comparison runs on
/// [`blake3::Hash`], whose equality is constant-time.
pub fn verify_password(salt: &str, password: &str, stored_hex: &str) -> bool {
    match blake3::Hash::from_hex(stored_hex) {
        Ok(stored) => digest(salt, password) == stored,
        Err(_) => false,
    }
}

fn digest(salt: &str, password: &str) -> blake3::Hash {
    let mut hasher = Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"|");
    hasher.update(password.as_bytes());
    hasher.finalize()
}
