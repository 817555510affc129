// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Field elements with delayed reduction.
//!
//! A [LazyElement] stores an unreduced integer in a `u64` together with a static upper bound on
//! its bit length. Additions and multiplications by small constants never reduce; the caller is
//! responsible for calling [reduce()](LazyElement::reduce) before a value could outgrow 64 bits.
//! This mirrors how circuit backends which emulate the BabyBear field inside a larger native
//! field account for the size of intermediate values.

use core::{
    fmt::{Display, Formatter},
    ops::{Add, Mul},
};

use super::{BaseElement, M64};
use crate::{errors::ArithmeticError, FieldElement, ReducibleElement, StarkField};

// LAZY ELEMENT
// ================================================================================================

/// An unreduced BabyBear value with a tracked bit width.
///
/// The tracked width is an upper bound: `value < 2^bits` always holds. The width of a result
/// depends only on the widths of the operands, so the sequence of reductions performed by a
/// computation is the same for every input.
#[derive(Copy, Clone, Debug)]
pub struct LazyElement {
    value: u64,
    bits: u32,
}

impl LazyElement {
    /// Maximum bit width of a value held by this backend.
    pub const MAX_BITS: u32 = u64::BITS;

    /// Width of a canonical field element.
    const CANONICAL_BITS: u32 = BaseElement::MODULUS_BITS;

    /// Returns a new element holding an arbitrary `u64` value. As nothing is known about the
    /// value, its width is set to [Self::MAX_BITS].
    pub const fn new(value: u64) -> Self {
        Self { value, bits: Self::MAX_BITS }
    }

    /// Returns a new element holding `value` with a declared width of `bits`.
    ///
    /// # Errors
    /// Returns an error if `bits` exceeds [Self::MAX_BITS] or if `value` does not fit into
    /// `bits` bits.
    pub fn with_bit_width(value: u64, bits: u32) -> Result<Self, ArithmeticError> {
        if bits > Self::MAX_BITS {
            return Err(ArithmeticError::BitWidthOverflow { required: bits, max: Self::MAX_BITS });
        }
        if bits < Self::MAX_BITS && value >> bits != 0 {
            return Err(ArithmeticError::ValueExceedsBitWidth(bits));
        }
        Ok(Self { value, bits })
    }

    /// Returns the unreduced integer held by this element.
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Returns the sum of `self` and `rhs` without any reduction.
    ///
    /// # Errors
    /// Returns an error if the width of the sum could exceed [Self::MAX_BITS].
    pub fn try_add(self, rhs: Self) -> Result<Self, ArithmeticError> {
        let bits = self.bits.max(rhs.bits) + 1;
        check_width(bits)?;
        Ok(Self { value: self.value + rhs.value, bits })
    }

    /// Returns `self` multiplied by the constant `c` without any reduction.
    ///
    /// # Errors
    /// Returns an error if the width of the product could exceed [Self::MAX_BITS].
    pub fn try_mul_const(self, c: u32) -> Result<Self, ArithmeticError> {
        let bits = self.bits + ceil_log2(c);
        check_width(bits)?;
        Ok(Self { value: self.value * c as u64, bits })
    }

    /// Returns the product of `self` and `rhs` without any reduction.
    ///
    /// # Errors
    /// Returns an error if the width of the product could exceed [Self::MAX_BITS].
    pub fn try_mul(self, rhs: Self) -> Result<Self, ArithmeticError> {
        let bits = self.bits + rhs.bits;
        check_width(bits)?;
        Ok(Self { value: self.value * rhs.value, bits })
    }

    /// Returns the canonical field element congruent to this value.
    #[inline]
    pub const fn reduce(self) -> BaseElement {
        BaseElement::from_wrapped_u64(self.value)
    }

    /// Returns this value reduced to canonical form but kept in the lazy representation.
    #[inline]
    fn reduced(self) -> Self {
        Self::from(self.reduce())
    }
}

impl ReducibleElement for LazyElement {
    type Field = BaseElement;

    const MAX_BITS: u32 = u64::BITS;

    #[inline(always)]
    fn from_canonical(value: BaseElement) -> Self {
        value.into()
    }

    /// # Panics
    /// Panics if the width of the product could exceed 64 bits.
    fn mul_const(self, c: u32) -> Self {
        self.try_mul_const(c).unwrap_or_else(|err| panic!("{err}"))
    }

    #[inline(always)]
    fn reduce(self) -> BaseElement {
        LazyElement::reduce(self)
    }

    #[inline(always)]
    fn bit_width(&self) -> u32 {
        self.bits
    }
}

impl From<BaseElement> for LazyElement {
    fn from(value: BaseElement) -> Self {
        Self {
            value: value.as_int() as u64,
            bits: Self::CANONICAL_BITS,
        }
    }
}

impl Display for LazyElement {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        write!(f, "{} ({} bits)", self.value, self.bits)
    }
}

// OVERLOADED OPERATORS
// ================================================================================================

impl Add for LazyElement {
    type Output = Self;

    /// # Panics
    /// Panics if the width of the sum could exceed 64 bits; this means a reduction is missing in
    /// the calling code.
    fn add(self, rhs: Self) -> Self {
        self.try_add(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl Mul for LazyElement {
    type Output = Self;

    /// Multiplies two values, reducing the wider operand (or both operands) first if the width
    /// of the product would otherwise exceed 64 bits.
    fn mul(self, rhs: Self) -> Self {
        let (mut lhs, mut rhs) = (self, rhs);
        if lhs.bits + rhs.bits > Self::MAX_BITS {
            if lhs.bits >= rhs.bits {
                lhs = lhs.reduced();
            } else {
                rhs = rhs.reduced();
            }
        }
        if lhs.bits + rhs.bits > Self::MAX_BITS {
            lhs = lhs.reduced();
            rhs = rhs.reduced();
        }

        // two canonical values take at most 62 bits, so this cannot overflow
        Self {
            value: lhs.value * rhs.value,
            bits: lhs.bits + rhs.bits,
        }
    }
}

impl PartialEq for LazyElement {
    /// Two lazy elements are equal if they represent the same field element.
    fn eq(&self, other: &Self) -> bool {
        self.value % M64 == other.value % M64
    }
}

impl Eq for LazyElement {}

impl Default for LazyElement {
    fn default() -> Self {
        BaseElement::ZERO.into()
    }
}

// HELPER FUNCTIONS
// ================================================================================================

#[inline(always)]
fn check_width(bits: u32) -> Result<(), ArithmeticError> {
    if bits > LazyElement::MAX_BITS {
        return Err(ArithmeticError::BitWidthOverflow {
            required: bits,
            max: LazyElement::MAX_BITS,
        });
    }
    Ok(())
}

/// Returns the number of bits by which multiplying by `c` can grow a value.
#[inline(always)]
const fn ceil_log2(c: u32) -> u32 {
    if c <= 1 {
        0
    } else {
        u32::BITS - (c - 1).leading_zeros()
    }
}
