// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! This crate contains an implementation of the 31-bit BabyBear prime field with modulus
//! $2^{31} - 2^{27} + 1$, together with the arithmetic backend contract consumed by the
//! Poseidon2 permutation.
//!
//! Two backends are provided:
//! * [BaseElement](fields::f31::BaseElement) keeps every value in canonical form and reduces
//!   after each operation.
//! * [LazyElement](fields::f31::LazyElement) delays reduction and statically tracks an upper
//!   bound on the bit length of each value, the way circuit backends emulating this field do.
//!
//! Both implement [ReducibleElement], so code written against that trait produces identical
//! results with either of them.
#![no_std]

#[macro_use]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod field;
pub use field::{FieldElement, ReducibleElement, StarkField};
pub mod fields {
    //! Finite field implementations.
    //!
    //! This module contains concrete implementations of the base STARK field used by the
    //! permutation.

    pub use super::field::f31;
}

mod errors;
pub use errors::{ArithmeticError, ElementDecodingError};
