use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::config::ApiKeyConfig;

/// An entry in the API key lookup table.
#[derive(Debug, Clone)]
pub struct ApiKeyEntry {
    /// Display name for the key, used in logs.
    pub name: String,
}

/// Build an in-memory lookup from `sha256_hex(raw_key) -> ApiKeyEntry`.
///
/// The config stores pre-computed SHA-256 hashes of the raw keys.
pub fn build_api_key_table(configs: &[ApiKeyConfig]) -> HashMap<String, ApiKeyEntry> {
    let mut map = HashMap::new();
    for cfg in configs {
        map.insert(
            cfg.key_hash.to_lowercase(),
            ApiKeyEntry {
                name: cfg.name.clone(),
            },
        );
    }
    map
}

/// Hash a raw API key to the lookup format (lowercase hex SHA-256).
pub fn hash_api_key(raw_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Look up an API key and return its entry if the key is accepted.
#[allow(clippy::implicit_hasher)]
pub fn authenticate_api_key<'a>(
    raw_key: &str,
    table: &'a HashMap<String, ApiKeyEntry>,
) -> Option<&'a ApiKeyEntry> {
    let hash = hash_api_key(raw_key);
    table.get(&hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(raw_key: &str) -> HashMap<String, ApiKeyEntry> {
        build_api_key_table(&[ApiKeyConfig {
            name: "test-key".into(),
            key_hash: hash_api_key(raw_key),
        }])
    }

    #[test]
    fn accepts_the_right_key() {
        let table = table_with("s3cret");
        let entry = authenticate_api_key("s3cret", &table).expect("key should authenticate");
        assert_eq!(entry.name, "test-key");
    }

    #[test]
    fn rejects_everything_else() {
        let table = table_with("s3cret");
        assert!(authenticate_api_key("S3cret", &table).is_none());
        assert!(authenticate_api_key("", &table).is_none());
        // The hash itself is not a valid key.
        assert!(authenticate_api_key(&hash_api_key("s3cret"), &table).is_none());
    }

    #[test]
    fn hash_is_stable_lowercase_hex() {
        assert_eq!(
            hash_api_key("hello"),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
