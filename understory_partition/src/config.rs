// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning knobs for incremental maintenance versus full rebuilds.

use crate::error::PartitionError;

/// Tuning parameters shared by the partitioning backends.
///
/// The thresholds are fractions of the current element count. When an incremental
/// removal would touch more nodes than `threshold * len`, the KD-tree stops and
/// rebuilds from scratch instead. The values are empirical; retune them freely.
///
/// ```rust
/// use understory_partition::PartitionConfig;
///
/// let config = PartitionConfig::default()
///     .with_remove_rebuild_threshold(0.5)
///     .with_small_collection_threshold(8);
/// assert_eq!(config.remove_rebuild_threshold(), 0.5);
///
/// assert!(PartitionConfig::new(1.5, 0.85, 20).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PartitionConfig {
    remove_rebuild_threshold: f64,
    update_rebuild_threshold: f64,
    small_collection_threshold: usize,
}

impl PartitionConfig {
    /// Default budget for [`remove_elements`](crate::BoundingBoxPartitioning::remove_elements).
    pub const DEFAULT_REMOVE_REBUILD_THRESHOLD: f64 = 0.80;
    /// Default budget for the removal half of an update.
    pub const DEFAULT_UPDATE_REBUILD_THRESHOLD: f64 = 0.85;
    /// Default size up to which key batches are scanned instead of hashed.
    pub const DEFAULT_SMALL_COLLECTION_THRESHOLD: usize = 20;

    /// Create a validated configuration.
    pub fn new(
        remove_rebuild_threshold: f64,
        update_rebuild_threshold: f64,
        small_collection_threshold: usize,
    ) -> Result<Self, PartitionError> {
        check_fraction("remove_rebuild_threshold", remove_rebuild_threshold)?;
        check_fraction("update_rebuild_threshold", update_rebuild_threshold)?;
        Ok(Self {
            remove_rebuild_threshold,
            update_rebuild_threshold,
            small_collection_threshold,
        })
    }

    /// Set the removal threshold. Out-of-range values are clamped into `(0, 1]`.
    #[must_use]
    pub fn with_remove_rebuild_threshold(mut self, t: f64) -> Self {
        self.remove_rebuild_threshold = clamp_fraction(t, Self::DEFAULT_REMOVE_REBUILD_THRESHOLD);
        self
    }

    /// Set the update threshold. Out-of-range values are clamped into `(0, 1]`.
    #[must_use]
    pub fn with_update_rebuild_threshold(mut self, t: f64) -> Self {
        self.update_rebuild_threshold = clamp_fraction(t, Self::DEFAULT_UPDATE_REBUILD_THRESHOLD);
        self
    }

    /// Set the small-collection crossover size.
    #[must_use]
    pub fn with_small_collection_threshold(mut self, n: usize) -> Self {
        self.small_collection_threshold = n;
        self
    }

    /// Fraction of nodes a removal may touch before falling back to a rebuild.
    pub fn remove_rebuild_threshold(&self) -> f64 {
        self.remove_rebuild_threshold
    }

    /// Fraction of nodes the removal half of an update may touch.
    pub fn update_rebuild_threshold(&self) -> f64 {
        self.update_rebuild_threshold
    }

    /// Key batches up to this size are scanned linearly rather than hashed.
    pub fn small_collection_threshold(&self) -> usize {
        self.small_collection_threshold
    }

    /// Number of affected nodes allowed for a tree of `len` nodes at threshold `t`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Thresholds are validated fractions, so the product is in 0..=len."
    )]
    pub(crate) fn budget(t: f64, len: usize) -> usize {
        (len as f64 * t) as usize
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            remove_rebuild_threshold: Self::DEFAULT_REMOVE_REBUILD_THRESHOLD,
            update_rebuild_threshold: Self::DEFAULT_UPDATE_REBUILD_THRESHOLD,
            small_collection_threshold: Self::DEFAULT_SMALL_COLLECTION_THRESHOLD,
        }
    }
}

fn check_fraction(name: &'static str, value: f64) -> Result<(), PartitionError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(PartitionError::InvalidThreshold { name, value })
    }
}

fn clamp_fraction(t: f64, fallback: f64) -> f64 {
    if t.is_nan() {
        fallback
    } else {
        t.clamp(f64::MIN_POSITIVE, 1.0)
    }
}
