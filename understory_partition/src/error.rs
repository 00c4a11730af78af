// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for fallible conversions and configuration.
//!
//! Partitioning operations themselves do not fail: bad input is either a no-op
//! (empty slices, unknown keys) or a bug in this crate, which panics.

use thiserror::Error;

/// Errors reported by this crate.
#[derive(Copy, Clone, Debug, Error, PartialEq)]
pub enum PartitionError {
    /// A raw value did not name one of the four splitting axes.
    #[error("invalid splitting axis value: {0} (expected 0..=3)")]
    InvalidAxis(u8),
    /// A rebuild threshold was not a finite fraction in `(0, 1]`.
    #[error("invalid {name}: {value} (expected a fraction in (0, 1])")]
    InvalidThreshold {
        /// Which threshold was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}
