//! # Hash-Mod Algorithm
//!
//! Keccak256-based sharding: hash the partitioning value's canonical bytes
//! and take the result modulo the shard count. Range predicates carry no
//! locality under a hash, so they degrade to a full scan of the node set.

use sha3::{Digest, Keccak256};

use super::{RangeBuckets, ShardingAlgorithm};
use crate::domain::{BucketKey, ColumnValue, RoutingError};

/// Hash-mod sharding over `shard_count` buckets numbered `0..shard_count`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashModAlgorithm {
    shard_count: u32,
}

impl HashModAlgorithm {
    /// Create an algorithm over `shard_count` buckets.
    pub fn new(shard_count: u32) -> Result<Self, RoutingError> {
        if shard_count == 0 {
            return Err(RoutingError::Configuration(
                "hash-mod shard count must be at least 1".to_string(),
            ));
        }
        Ok(Self { shard_count })
    }

    /// Number of buckets.
    pub fn shard_count(&self) -> u32 {
        self.shard_count
    }
}

impl ShardingAlgorithm for HashModAlgorithm {
    fn bucket(&self, value: &ColumnValue) -> Result<BucketKey, RoutingError> {
        let digest = Keccak256::digest(value.canonical_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&digest[..8]);
        Ok(u64::from_be_bytes(prefix) % self.shard_count as u64)
    }

    fn bucket_range(
        &self,
        _start: &ColumnValue,
        _end: &ColumnValue,
    ) -> Result<RangeBuckets, RoutingError> {
        Ok(RangeBuckets::FullScan)
    }

    fn domain(&self) -> Vec<BucketKey> {
        (0..self.shard_count as BucketKey).collect()
    }
}
