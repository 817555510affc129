// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

// PARAMETERS ERROR
// ================================================================================================

/// Defines errors which can occur when instantiating a Poseidon2 permutation or handing it a
/// state of the wrong shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// The permutation state (or one of the states in a flat buffer) does not have the expected
    /// number of elements.
    #[error("expected a state of {expected} field elements, but was {actual}")]
    InvalidStateWidth { expected: usize, actual: usize },

    /// The round constant table does not have one row per round.
    #[error("expected {expected} rows of round constants, but was {actual}")]
    InvalidRoundCount { expected: usize, actual: usize },

    /// A row of the round constant table does not have one constant per state element.
    #[error("round constant row {row} must contain {expected} values, but was {actual}")]
    InvalidRowWidth { row: usize, expected: usize, actual: usize },

    /// A round constant is not a canonical field element.
    #[error("round constant [{row}][{column}] = {value} is not smaller than the field modulus")]
    NonCanonicalConstant { row: usize, column: usize, value: u64 },

    /// The requested round split is not supported by this permutation.
    #[error(
        "unsupported round split: {external} external and {internal} internal rounds; \
        expected 8 external and 13 internal rounds"
    )]
    InvalidRoundSplit { external: usize, internal: usize },
}
