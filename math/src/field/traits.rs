// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use core::{
    fmt::{Debug, Display},
    ops::{Add, AddAssign, BitAnd, Mul, MulAssign, Neg, ShrAssign, Sub, SubAssign},
};

use utils::{Deserializable, Randomizable, Serializable};

// FIELD ELEMENT
// ================================================================================================

pub trait FieldElement:
    Copy
    + Clone
    + Debug
    + Display
    + Default
    + Send
    + Sync
    + Eq
    + PartialEq
    + Sized
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Mul<Self, Output = Self>
    + AddAssign<Self>
    + SubAssign<Self>
    + MulAssign<Self>
    + Neg<Output = Self>
    + From<u32>
    + From<u16>
    + From<u8>
    + Serializable
    + Deserializable
    + Randomizable
{
    type PositiveInteger: Debug
        + Copy
        + PartialEq
        + PartialOrd
        + ShrAssign
        + BitAnd<Output = Self::PositiveInteger>
        + From<u32>;

    /// Number of bytes needed to encode an element
    const ELEMENT_BYTES: usize;

    /// The additive identity.
    const ZERO: Self;

    /// The multiplicative identity.
    const ONE: Self;

    // ALGEBRA
    // --------------------------------------------------------------------------------------------

    /// Returns this field element added to itself.
    fn double(self) -> Self {
        self + self
    }

    /// Returns this field element raised to power 2.
    fn square(self) -> Self {
        self * self
    }

    /// Exponentiates this field element by `power` parameter.
    fn exp(self, power: Self::PositiveInteger) -> Self {
        let mut r = Self::ONE;
        let mut b = self;
        let mut p = power;

        let int_zero = Self::PositiveInteger::from(0u32);
        let int_one = Self::PositiveInteger::from(1u32);

        if p == int_zero {
            return Self::ONE;
        } else if b == Self::ZERO {
            return Self::ZERO;
        }

        while p > int_zero {
            if p & int_one == int_one {
                r *= b;
            }
            p >>= int_one;
            b = b.square();
        }

        r
    }
}

// STARK FIELD
// ================================================================================================

pub trait StarkField: FieldElement {
    /// Prime modulus of the field.
    const MODULUS: Self::PositiveInteger;

    /// The number of bits needed to represents `Self::MODULUS`.
    const MODULUS_BITS: u32;

    /// Returns a canonical integer representation of the field element.
    fn as_int(&self) -> Self::PositiveInteger;
}

// REDUCIBLE ELEMENT
// ================================================================================================

/// Arithmetic backend contract for code which must run both over native field elements and over
/// representations that delay modular reduction.
///
/// A value of `Self` is congruent to some element of [Self::Field], but may be physically larger
/// than the field modulus. Every value carries a statically known upper bound on its bit length
/// ([bit_width()](Self::bit_width)); the bound depends only on the sequence of operations which
/// produced the value, never on the values themselves.
///
/// Implementations must uphold the following:
/// * `a + b` has width at most `max(width(a), width(b)) + 1`.
/// * `a.mul_const(c)` grows the width by at most `ceil(log2(c))` bits.
/// * `a * b` has width at most `width(a) + width(b)`; if that would exceed [Self::MAX_BITS], the
///   implementation reduces its operands first.
/// * `a.reduce()` returns the canonical element congruent to `a`.
///
/// Any operation which cannot be carried out within [Self::MAX_BITS] bits is a fatal error.
pub trait ReducibleElement:
    Copy + Debug + Send + Sync + Add<Self, Output = Self> + Mul<Self, Output = Self>
{
    /// The field this backend computes in.
    type Field: StarkField;

    /// Maximum number of bits a value of this backend can hold.
    const MAX_BITS: u32;

    /// Lifts a canonical field element into this backend.
    fn from_canonical(value: Self::Field) -> Self;

    /// Returns this value multiplied by a small constant.
    fn mul_const(self, c: u32) -> Self;

    /// Returns the canonical field element congruent to this value.
    fn reduce(self) -> Self::Field;

    /// Returns the upper bound on the bit length of this value.
    fn bit_width(&self) -> u32;
}
