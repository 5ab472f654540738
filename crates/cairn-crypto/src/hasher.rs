use cairn_types::ObjectId;

/// Domain-separated BLAKE3 content hasher.
///
/// The domain tag (e.g. `"cairn-blob-v1"`) is fed to the hasher before the
/// payload, followed by a `:` separator.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for file contents.
    pub const BLOB: Self = Self::new("cairn-blob-v1");
    /// Hasher for flat path listings.
    pub const TREE: Self = Self::new("cairn-tree-v1");
    /// Hasher for commit objects (including stash index/working commits).
    pub const COMMIT: Self = Self::new("cairn-commit-v1");
    /// Hasher for stash log records.
    pub const STASH: Self = Self::new("cairn-stash-v1");

    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    pub fn hash(&self, data: &[u8]) -> ObjectId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }

    /// Verify that data produces the expected object ID.
    pub fn verify(&self, data: &[u8], expected: &ObjectId) -> bool {
        self.hash(data) == *expected
    }

    pub fn domain(&self) -> &str {
        self.domain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let data = b"t1-111";
        assert_eq!(ContentHasher::BLOB.hash(data), ContentHasher::BLOB.hash(data));
    }

    #[test]
    fn domains_separate_hashes() {
        let data = b"same content";
        let ids = [
            ContentHasher::BLOB.hash(data),
            ContentHasher::TREE.hash(data),
            ContentHasher::COMMIT.hash(data),
            ContentHasher::STASH.hash(data),
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn domain_hash_differs_from_raw_hash() {
        assert_ne!(ContentHasher::BLOB.hash(b"x"), ObjectId::from_bytes(b"x"));
    }

    #[test]
    fn verify_detects_tampering() {
        let id = ContentHasher::BLOB.hash(b"original");
        assert!(ContentHasher::BLOB.verify(b"original", &id));
        assert!(!ContentHasher::BLOB.verify(b"tampered", &id));
    }

    #[test]
    fn domain_accessor() {
        assert_eq!(ContentHasher::STASH.domain(), "cairn-stash-v1");
    }
}
