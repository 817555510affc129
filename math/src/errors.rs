// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use alloc::string::String;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ElementDecodingError {
    #[error("not enough bytes for a full field element; expected {0} bytes, but was {1} bytes")]
    NotEnoughBytes(usize, usize),

    #[error("too many bytes for a field element; expected {0} bytes, but was {1} bytes")]
    TooManyBytes(usize, usize),

    #[error("invalid field element: value {0} is greater than or equal to the field modulus")]
    ValueTooLarge(u64),

    #[error("invalid field element literal: `{0}` is not a decimal integer")]
    InvalidLiteral(String),
}

/// Errors raised by backends which delay modular reduction.
///
/// These indicate a missing reduction point in the calling code; they are never caused by the
/// values being processed, only by their tracked bit widths.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("result may need {required} bits, but the backend can hold at most {max} bits")]
    BitWidthOverflow { required: u32, max: u32 },

    #[error("value does not fit into the declared width of {0} bits")]
    ValueExceedsBitWidth(u32),
}
