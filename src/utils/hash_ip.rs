use sha2::{Digest, Sha256};

/// Hash a client address so scans can be deduplicated without storing it.
pub fn hash_ip(ip: &str, salt: &str) -> String {
    let salted_ip = format!("{}{}", ip, salt);

    let mut hasher = Sha256::new();
    hasher.update(salted_ip.as_bytes());
    let result = hasher.finalize();

    format!("{:x}", result)
}
