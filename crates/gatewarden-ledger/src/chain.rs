//! SHA-256 hash chain over the append stream.

use sha2::{Digest, Sha256};

const ZERO_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// One link per appended event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLink {
    /// Ledger sequence this link covers.
    pub seq: u64,
    /// Hash of the event's canonical serialization.
    pub event_hash: String,
    /// Link hash of the previous entry (all zeros for the first).
    pub prev_hash: String,
    /// This link's hash over (seq, event_hash, prev_hash).
    pub link_hash: String,
}

impl ChainLink {
    fn build(seq: u64, event_data: &[u8], prev_hash: String) -> Self {
        let event_hash = hash_hex(event_data);
        let link_hash = link_hash(seq, &event_hash, &prev_hash);
        Self {
            seq,
            event_hash,
            prev_hash,
            link_hash,
        }
    }

    /// Recompute and check this link's own hash.
    pub fn verify(&self) -> bool {
        link_hash(self.seq, &self.event_hash, &self.prev_hash) == self.link_hash
    }

    /// Check continuity against the preceding link.
    pub fn follows(&self, previous: &ChainLink) -> bool {
        self.prev_hash == previous.link_hash && self.seq == previous.seq + 1
    }
}

fn hash_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

fn link_hash(seq: u64, event_hash: &str, prev_hash: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seq.to_le_bytes());
    hasher.update(event_hash.as_bytes());
    hasher.update(prev_hash.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Where the chain verification failed.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// A link's own hash does not match its contents.
    #[error("invalid link at sequence {seq}")]
    InvalidLink {
        /// Sequence of the bad link.
        seq: u64,
    },
    /// A link does not continue from its predecessor.
    #[error("chain broken at sequence {seq}")]
    Broken {
        /// Sequence where continuity failed.
        seq: u64,
    },
    /// An event's current content no longer matches its recorded hash.
    #[error("event content mismatch at sequence {seq}")]
    ContentMismatch {
        /// Sequence of the tampered event.
        seq: u64,
    },
}

/// In-order collection of chain links. Starts empty; the first appended
/// event links back to an all-zero hash.
#[derive(Debug, Default)]
pub struct HashChain {
    links: Vec<ChainLink>,
}

impl HashChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the chain with the next event's canonical bytes.
    pub fn extend(&mut self, event_data: &[u8]) -> &ChainLink {
        let (seq, prev_hash) = match self.links.last() {
            Some(head) => (head.seq + 1, head.link_hash.clone()),
            None => (0, ZERO_HASH.to_string()),
        };
        self.links.push(ChainLink::build(seq, event_data, prev_hash));
        self.links.last().expect("just pushed")
    }

    /// The most recent link, if any.
    pub fn head(&self) -> Option<&ChainLink> {
        self.links.last()
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the chain holds no links.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// The link covering a ledger sequence.
    pub fn get(&self, seq: u64) -> Option<&ChainLink> {
        self.links.get(seq as usize)
    }

    /// Verify every link hash and the continuity between links.
    pub fn verify(&self) -> Result<(), ChainError> {
        for (i, link) in self.links.iter().enumerate() {
            if !link.verify() {
                return Err(ChainError::InvalidLink { seq: link.seq });
            }
            if i > 0 && !link.follows(&self.links[i - 1]) {
                return Err(ChainError::Broken { seq: link.seq });
            }
        }
        Ok(())
    }

    /// Verify that `event_data` is still the content recorded for `seq`.
    pub fn verify_content(&self, seq: u64, event_data: &[u8]) -> Result<(), ChainError> {
        let link = self
            .get(seq)
            .ok_or(ChainError::ContentMismatch { seq })?;
        if hash_hex(event_data) != link.event_hash {
            return Err(ChainError::ContentMismatch { seq });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chain_verifies() {
        assert!(HashChain::new().verify().is_ok());
    }

    #[test]
    fn test_first_link_anchors_to_zero() {
        let mut chain = HashChain::new();
        let link = chain.extend(b"event 0");
        assert_eq!(link.seq, 0);
        assert_eq!(link.prev_hash, ZERO_HASH);
        assert!(link.verify());
    }

    #[test]
    fn test_extend_links_continuously() {
        let mut chain = HashChain::new();
        chain.extend(b"event 0");
        chain.extend(b"event 1");
        chain.extend(b"event 2");
        assert_eq!(chain.len(), 3);
        assert!(chain.verify().is_ok());
        assert_eq!(chain.head().unwrap().seq, 2);
    }

    #[test]
    fn test_tampered_link_detected() {
        let mut chain = HashChain::new();
        chain.extend(b"event 0");
        chain.extend(b"event 1");
        chain.links[1].prev_hash = "f".repeat(64);
        assert!(matches!(
            chain.verify(),
            Err(ChainError::InvalidLink { seq: 1 })
        ));
    }

    #[test]
    fn test_content_mismatch_detected() {
        let mut chain = HashChain::new();
        chain.extend(b"original");
        assert!(chain.verify_content(0, b"original").is_ok());
        assert!(matches!(
            chain.verify_content(0, b"rewritten"),
            Err(ChainError::ContentMismatch { seq: 0 })
        ));
    }
}
