//! Deduplicated collection of signatures stored in one bucket.

/// Growable set of signatures in insertion order.
///
/// Every value, including zero, is an ordinary signature.
/// Buckets hold few signatures, so a linear scan is used for deduplication.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureSet {
    signatures: Vec<u64>,
}

impl SignatureSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self { signatures: vec![] }
    }

    /// Inserts a signature, returning `false` if it is already present.
    pub fn insert(&mut self, signature: u64) -> bool {
        if self.contains(signature) {
            return false;
        }
        self.signatures.push(signature);
        true
    }

    /// Checks if a signature is present.
    pub fn contains(&self, signature: u64) -> bool {
        self.signatures.contains(&signature)
    }

    /// Iterates the signatures in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.signatures.iter().copied()
    }

    /// Gets the number of signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Checks if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Gets the memory usage in bytes.
    pub fn memory_in_bytes(&self) -> usize {
        self.signatures.capacity() * std::mem::size_of::<u64>()
    }
}
