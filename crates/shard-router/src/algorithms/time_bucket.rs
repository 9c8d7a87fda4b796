//! # Time-Bucket Algorithm
//!
//! Monthly time-bucketed sharding: a timestamp routes to the bucket
//! `year * 100 + month`, matching physical tables suffixed `_YYYYMM` (or
//! `_YYYY_MM`; separators are not part of the bucket key).
//!
//! The mapping is total, deterministic, and order-preserving on the
//! configured year range, so an inclusive time range touches exactly the
//! months it spans and nothing else.

use chrono::Datelike;

use super::{RangeBuckets, ShardingAlgorithm};
use crate::domain::{BucketKey, ColumnValue, RoutingError};

/// Months per bucket cycle.
const MONTHS_PER_YEAR: u32 = 12;

/// Monthly time-bucket sharding over a bounded, inclusive year range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeBucketAlgorithm {
    min_year: i32,
    max_year: i32,
}

impl TimeBucketAlgorithm {
    /// Create an algorithm supporting years `min_year..=max_year`.
    pub fn new(min_year: i32, max_year: i32) -> Result<Self, RoutingError> {
        if min_year > max_year {
            return Err(RoutingError::Configuration(format!(
                "time-bucket year range {min_year}..{max_year} is descending"
            )));
        }
        // Four-digit years keep bucket keys aligned with table suffixes.
        if !(1000..=9999).contains(&min_year) || !(1000..=9999).contains(&max_year) {
            return Err(RoutingError::Configuration(format!(
                "time-bucket years must be four-digit, got {min_year}..{max_year}"
            )));
        }
        Ok(Self { min_year, max_year })
    }

    /// First supported year, inclusive.
    pub fn min_year(&self) -> i32 {
        self.min_year
    }

    /// Last supported year, inclusive.
    pub fn max_year(&self) -> i32 {
        self.max_year
    }

    fn year_month(&self, value: &ColumnValue) -> Result<(i32, u32), RoutingError> {
        let ts = match value {
            ColumnValue::Timestamp(ts) => ts,
            other => {
                return Err(RoutingError::UnroutableValue(format!(
                    "time-bucket routing needs a timestamp, got {other:?}"
                )))
            }
        };
        let year = ts.year();
        if year < self.min_year || year > self.max_year {
            return Err(RoutingError::UnroutableValue(format!(
                "timestamp year {year} outside supported range {}..{}",
                self.min_year, self.max_year
            )));
        }
        Ok((year, ts.month()))
    }
}

fn key_of(year: i32, month: u32) -> BucketKey {
    year as BucketKey * 100 + month as BucketKey
}

impl ShardingAlgorithm for TimeBucketAlgorithm {
    fn bucket(&self, value: &ColumnValue) -> Result<BucketKey, RoutingError> {
        let (year, month) = self.year_month(value)?;
        Ok(key_of(year, month))
    }

    fn bucket_range(
        &self,
        start: &ColumnValue,
        end: &ColumnValue,
    ) -> Result<RangeBuckets, RoutingError> {
        let (start_year, start_month) = self.year_month(start)?;
        let (end_year, end_month) = self.year_month(end)?;
        if (start_year, start_month) > (end_year, end_month) {
            return Err(RoutingError::UnroutableValue(format!(
                "descending time range {start_year}-{start_month:02} to {end_year}-{end_month:02}"
            )));
        }
        let mut buckets = Vec::new();
        let (mut year, mut month) = (start_year, start_month);
        while (year, month) <= (end_year, end_month) {
            buckets.push(key_of(year, month));
            month += 1;
            if month > MONTHS_PER_YEAR {
                month = 1;
                year += 1;
            }
        }
        Ok(RangeBuckets::Buckets(buckets))
    }

    fn domain(&self) -> Vec<BucketKey> {
        let mut buckets =
            Vec::with_capacity((self.max_year - self.min_year + 1) as usize * 12);
        for year in self.min_year..=self.max_year {
            for month in 1..=MONTHS_PER_YEAR {
                buckets.push(key_of(year, month));
            }
        }
        buckets
    }
}
