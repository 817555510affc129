// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! An implementation of the 31-bit BabyBear prime field with modulus $2^{31} - 2^{27} + 1$.
//!
//! Elements are stored in canonical form, i.e. as integers in the range [0, M). This keeps the
//! representation identical to the one used by external verifiers and circuit backends, which
//! consume round constants and test vectors as plain integers.
//!
//! This field has a number of attractive properties:
//!
//! * Elements fit into 31 bits, so the product of two elements fits into 62 bits and can be
//!   computed with native 64-bit arithmetic.
//! * $x \mapsto x^7$ is a permutation of the field, which makes it usable as an S-Box.

use alloc::string::ToString;
use core::{
    fmt::{Debug, Display, Formatter},
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use utils::{
    ByteReader, ByteWriter, Deserializable, DeserializationError, Randomizable, Serializable,
};

use super::{FieldElement, ReducibleElement, StarkField};
use crate::errors::ElementDecodingError;

mod lazy;
pub use lazy::LazyElement;


// CONSTANTS
// ================================================================================================

/// Field modulus = 2^31 - 2^27 + 1
const M: u32 = 2013265921;

/// Field modulus as u64; used when reducing products and unreduced accumulators.
const M64: u64 = M as u64;

/// Number of bytes needed to represent field element
const ELEMENT_BYTES: usize = core::mem::size_of::<u32>();

// FIELD ELEMENT
// ================================================================================================

/// Represents base field element in the field.
///
/// Internal values are always in the range [0, M).
#[derive(Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u64", into = "u32"))]
pub struct BaseElement(u32);

impl BaseElement {
    /// Creates a new field element from the provided `value`.
    ///
    /// If the value is greater than or equal to the field modulus, modular reduction is
    /// silently performed.
    pub const fn new(value: u32) -> BaseElement {
        Self(value % M)
    }

    /// Creates a new field element from an arbitrary `u32` value, reducing it modulo the field
    /// modulus. Round constant tables are commonly published in this form.
    pub const fn from_wrapped_u32(value: u32) -> BaseElement {
        Self::new(value)
    }

    /// Creates a new field element from a `u64` value, reducing it modulo the field modulus.
    pub const fn from_wrapped_u64(value: u64) -> BaseElement {
        Self((value % M64) as u32)
    }

    /// Converts an array of integers into an array of field elements; every integer is reduced
    /// modulo the field modulus.
    pub const fn new_array<const N: usize>(values: [u32; N]) -> [BaseElement; N] {
        let mut result = [Self(0); N];
        let mut i = 0;
        while i < N {
            result[i] = Self::new(values[i]);
            i += 1;
        }
        result
    }

    /// Returns canonical integer representation of this field element.
    #[inline(always)]
    pub const fn as_int(&self) -> u32 {
        self.0
    }

    /// Computes an exponentiation to the power 7 using the addition chain
    /// x^2, x^4, x^6, x^7. This is the Poseidon2 S-Box over this field.
    #[inline(always)]
    pub fn exp7(self) -> Self {
        let x2 = self.square();
        let x4 = x2.square();
        let x6 = x4 * x2;
        x6 * self
    }

    /// Multiplies a field element by an integer smaller than 2^32.
    #[inline(always)]
    pub const fn mul_small(self, rhs: u32) -> Self {
        Self::from_wrapped_u64((self.0 as u64) * (rhs as u64))
    }
}

impl FieldElement for BaseElement {
    type PositiveInteger = u32;

    const ZERO: Self = Self(0);
    const ONE: Self = Self(1);

    const ELEMENT_BYTES: usize = ELEMENT_BYTES;

    // ALGEBRA
    // --------------------------------------------------------------------------------------------

    #[inline]
    fn double(self) -> Self {
        self + self
    }

    #[inline]
    fn exp(self, power: Self::PositiveInteger) -> Self {
        let mut b: Self;
        let mut r = Self::ONE;
        for i in (0..32).rev() {
            r = r.square();
            b = r;
            b *= self;
            // Constant-time branching
            let mask = 0u32.wrapping_sub((power >> i) & 1);
            r.0 ^= mask & (r.0 ^ b.0);
        }

        r
    }
}

impl StarkField for BaseElement {
    /// sage: MODULUS = 2^31 - 2^27 + 1 \
    /// sage: GF(MODULUS).is_prime_field() \
    /// True \
    /// sage: GF(MODULUS).order() \
    /// 2013265921
    const MODULUS: Self::PositiveInteger = M;
    const MODULUS_BITS: u32 = 31;

    #[inline]
    fn as_int(&self) -> Self::PositiveInteger {
        self.0
    }
}

impl ReducibleElement for BaseElement {
    type Field = Self;

    const MAX_BITS: u32 = 31;

    #[inline(always)]
    fn from_canonical(value: Self) -> Self {
        value
    }

    #[inline(always)]
    fn mul_const(self, c: u32) -> Self {
        self.mul_small(c)
    }

    #[inline(always)]
    fn reduce(self) -> Self {
        self
    }

    #[inline(always)]
    fn bit_width(&self) -> u32 {
        Self::MODULUS_BITS
    }
}

impl Randomizable for BaseElement {
    const VALUE_SIZE: usize = Self::ELEMENT_BYTES;

    fn from_random_bytes(bytes: &[u8]) -> Option<Self> {
        Self::try_from(bytes).ok()
    }
}

impl Debug for BaseElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self)
    }
}

impl Display for BaseElement {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// OVERLOADED OPERATORS
// ================================================================================================

impl Add for BaseElement {
    type Output = Self;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self {
        // both operands are below 2^31, so the sum cannot overflow a u32
        let (x1, c1) = (self.0 + rhs.0).overflowing_sub(M);
        let adj = 0u32.wrapping_sub(c1 as u32);
        Self(x1.wrapping_add(M & adj))
    }
}

impl AddAssign for BaseElement {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs
    }
}

impl Sub for BaseElement {
    type Output = Self;

    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, rhs: Self) -> Self {
        let (x1, c1) = self.0.overflowing_sub(rhs.0);
        let adj = 0u32.wrapping_sub(c1 as u32);
        Self(x1.wrapping_add(M & adj))
    }
}

impl SubAssign for BaseElement {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for BaseElement {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_wrapped_u64((self.0 as u64) * (rhs.0 as u64))
    }
}

impl MulAssign for BaseElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs
    }
}

impl Neg for BaseElement {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

// TYPE CONVERSIONS
// ================================================================================================

impl From<bool> for BaseElement {
    fn from(value: bool) -> Self {
        Self(value.into())
    }
}

impl From<u8> for BaseElement {
    fn from(value: u8) -> Self {
        Self(value.into())
    }
}

impl From<u16> for BaseElement {
    fn from(value: u16) -> Self {
        Self(value.into())
    }
}

impl From<u32> for BaseElement {
    /// Converts a 32-bit value into a field element. If the value is greater than or equal to
    /// the field modulus, modular reduction is silently performed.
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl TryFrom<u64> for BaseElement {
    type Error = ElementDecodingError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value >= M64 {
            Err(ElementDecodingError::ValueTooLarge(value))
        } else {
            Ok(Self(value as u32))
        }
    }
}

impl TryFrom<&'_ [u8]> for BaseElement {
    type Error = ElementDecodingError;

    /// Converts a slice of bytes into a field element; returns error if the value encoded in bytes
    /// is not a valid field element. The bytes are assumed to encode the element in the canonical
    /// representation in little-endian byte order.
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() < ELEMENT_BYTES {
            return Err(ElementDecodingError::NotEnoughBytes(ELEMENT_BYTES, bytes.len()));
        }
        if bytes.len() > ELEMENT_BYTES {
            return Err(ElementDecodingError::TooManyBytes(ELEMENT_BYTES, bytes.len()));
        }
        let mut buf = [0u8; ELEMENT_BYTES];
        buf.copy_from_slice(bytes);
        Self::try_from(u32::from_le_bytes(buf) as u64)
    }
}

impl FromStr for BaseElement {
    type Err = ElementDecodingError;

    /// Parses a decimal literal such as `"2013265919"` into a field element. Literals which are
    /// not smaller than the field modulus are rejected rather than reduced.
    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let value = literal
            .trim()
            .parse::<u64>()
            .map_err(|_| ElementDecodingError::InvalidLiteral(literal.to_string()))?;
        Self::try_from(value)
    }
}

impl From<BaseElement> for u32 {
    fn from(value: BaseElement) -> Self {
        value.0
    }
}

impl From<BaseElement> for u64 {
    fn from(value: BaseElement) -> Self {
        value.0.into()
    }
}

// SERIALIZATION / DESERIALIZATION
// ================================================================================================

impl Serializable for BaseElement {
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        target.write_u32(self.0);
    }

    fn get_size_hint(&self) -> usize {
        ELEMENT_BYTES
    }
}

impl Deserializable for BaseElement {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let value = source.read_u32()?;
        if value >= M {
            return Err(DeserializationError::InvalidValue(format!(
                "invalid field element: value {value} is greater than or equal to the field modulus"
            )));
        }
        Ok(Self(value))
    }
}
