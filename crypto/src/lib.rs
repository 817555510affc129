// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! This crate contains an implementation of the Poseidon2 permutation over the 31-bit BabyBear
//! field with a state of 16 elements.
//!
//! The permutation is a fixed, keyless, invertible mixing function; it is intended to be used as
//! a building block of hash functions and sponges inside zero-knowledge proof systems. Round
//! constants and the internal diagonal match the published BabyBear instance, so outputs agree
//! bit for bit with external verifiers and circuit implementations of the same permutation.
//!
//! The permutation is generic over [ReducibleElement](math::ReducibleElement) backends: it can
//! be computed over canonical field elements or over elements which delay modular reduction
//! and track the bit width of intermediate values.
//!
//! # Example
//! ```
//! use bear_crypto::{permute, Poseidon2, STATE_WIDTH};
//! use math::{fields::f31::BaseElement, FieldElement};
//!
//! let state = [BaseElement::ZERO; STATE_WIDTH];
//! let result = permute(state);
//! assert_eq!(BaseElement::new(348670919), result[0]);
//!
//! // the same permutation through an explicitly instantiated engine
//! assert_eq!(result, Poseidon2::babybear_16().permute(state));
//! ```
#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

use math::fields::f31::BaseElement;

mod poseidon2;
pub use poseidon2::{
    Poseidon2, Poseidon2Params, RoundKind, INTERNAL_DIAG, MONTY_INVERSE, NUM_EXTERNAL_ROUNDS,
    NUM_INTERNAL_ROUNDS, NUM_ROUNDS, RAW_ROUND_CONSTANTS, ROUND_CONSTANTS, STATE_WIDTH,
};

mod errors;
pub use errors::ParamsError;

// PUBLISHED INSTANCE
// ================================================================================================

/// The published BabyBear Poseidon2 permutation of width 16.
pub static BABYBEAR_16: Poseidon2 = Poseidon2::babybear_16();

/// Applies the published BabyBear Poseidon2 permutation of width 16 to the provided state.
pub fn permute(state: [BaseElement; STATE_WIDTH]) -> [BaseElement; STATE_WIDTH] {
    BABYBEAR_16.permute(state)
}
