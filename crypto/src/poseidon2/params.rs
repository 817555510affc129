// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use math::fields::f31::BaseElement;
use tracing::{event, Level};
use utils::{ByteReader, ByteWriter, Deserializable, DeserializationError, Serializable};

use super::{constants::ROUND_CONSTANTS, ParamsError};

// CONSTANTS
// ================================================================================================

/// Number of field elements in the permutation state.
pub const STATE_WIDTH: usize = 16;

/// Number of external (full) rounds; half of them run before the internal rounds and half after.
pub const NUM_EXTERNAL_ROUNDS: usize = 8;

/// Number of internal (partial) rounds.
pub const NUM_INTERNAL_ROUNDS: usize = 13;

/// Total number of rounds, and thus the number of rows in the round constant table.
pub const NUM_ROUNDS: usize = NUM_EXTERNAL_ROUNDS + NUM_INTERNAL_ROUNDS;

// POSEIDON2 PARAMETERS
// ================================================================================================

/// Parameters of a Poseidon2 permutation over the BabyBear field.
///
/// The round structure is fixed: a state of [STATE_WIDTH] elements, [NUM_EXTERNAL_ROUNDS]
/// external rounds split evenly around [NUM_INTERNAL_ROUNDS] internal rounds. What can vary is
/// the round constant table; a table supplied at runtime is validated once, when the parameters
/// are built, so that a permutation instantiated from them cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poseidon2Params {
    round_constants: [[BaseElement; STATE_WIDTH]; NUM_ROUNDS],
}

impl Poseidon2Params {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns parameters for the published BabyBear Poseidon2 instance of width 16.
    pub const fn babybear_16() -> Self {
        Self { round_constants: ROUND_CONSTANTS }
    }

    /// Returns new parameters for the specified round structure and round constant table.
    ///
    /// Every row of `rows` must contain `width` integers; internal rounds read only the first
    /// entry of their row, but the table is still required to be rectangular. All integers must
    /// be canonical field elements; values which would have to be reduced are rejected.
    ///
    /// # Errors
    /// Returns an error if:
    /// * `width` is not 16.
    /// * The number of external and internal rounds is not 8 and 13 respectively.
    /// * The number of rows is not equal to the number of rounds.
    /// * Any row does not contain exactly `width` values.
    /// * Any value is greater than or equal to the field modulus.
    pub fn new<R, T>(
        width: usize,
        num_external_rounds: usize,
        num_internal_rounds: usize,
        rows: &[R],
    ) -> Result<Self, ParamsError>
    where
        R: AsRef<[T]>,
        T: Copy + Into<u64>,
    {
        if width != STATE_WIDTH {
            return Err(ParamsError::InvalidStateWidth { expected: STATE_WIDTH, actual: width });
        }
        if num_external_rounds != NUM_EXTERNAL_ROUNDS || num_internal_rounds != NUM_INTERNAL_ROUNDS
        {
            return Err(ParamsError::InvalidRoundSplit {
                external: num_external_rounds,
                internal: num_internal_rounds,
            });
        }
        if rows.len() != NUM_ROUNDS {
            return Err(ParamsError::InvalidRoundCount {
                expected: NUM_ROUNDS,
                actual: rows.len(),
            });
        }

        let mut round_constants = [[BaseElement::new(0); STATE_WIDTH]; NUM_ROUNDS];
        for (row, (source, target)) in rows.iter().zip(round_constants.iter_mut()).enumerate() {
            let source = source.as_ref();
            if source.len() != STATE_WIDTH {
                return Err(ParamsError::InvalidRowWidth {
                    row,
                    expected: STATE_WIDTH,
                    actual: source.len(),
                });
            }
            for (column, (&value, constant)) in source.iter().zip(target.iter_mut()).enumerate() {
                let value: u64 = value.into();
                *constant = BaseElement::try_from(value)
                    .map_err(|_| ParamsError::NonCanonicalConstant { row, column, value })?;
            }
        }

        event!(
            Level::DEBUG,
            "validated Poseidon2 parameters: width {}, {} external rounds, {} internal rounds",
            width,
            num_external_rounds,
            num_internal_rounds
        );

        Ok(Self { round_constants })
    }

    /// Returns new parameters with the default round structure and the specified round constant
    /// table.
    ///
    /// # Errors
    /// Returns an error if the table does not have 21 rows of 16 canonical field elements each.
    pub fn from_rows<R, T>(rows: &[R]) -> Result<Self, ParamsError>
    where
        R: AsRef<[T]>,
        T: Copy + Into<u64>,
    {
        Self::new(STATE_WIDTH, NUM_EXTERNAL_ROUNDS, NUM_INTERNAL_ROUNDS, rows)
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the number of elements in the permutation state.
    pub const fn width(&self) -> usize {
        STATE_WIDTH
    }

    /// Returns the total number of external rounds.
    pub const fn num_external_rounds(&self) -> usize {
        NUM_EXTERNAL_ROUNDS
    }

    /// Returns the number of internal rounds.
    pub const fn num_internal_rounds(&self) -> usize {
        NUM_INTERNAL_ROUNDS
    }

    /// Returns the round constants for the specified round.
    ///
    /// # Panics
    /// Panics if `round` is not smaller than 21.
    pub const fn round_constants(&self, round: usize) -> &[BaseElement; STATE_WIDTH] {
        &self.round_constants[round]
    }
}

impl Default for Poseidon2Params {
    fn default() -> Self {
        Self::babybear_16()
    }
}

// SERIALIZATION
// ================================================================================================

impl Serializable for Poseidon2Params {
    /// Serializes the round constant table row by row, each constant as a little-endian u32.
    fn write_into<W: ByteWriter>(&self, target: &mut W) {
        target.write(self.round_constants);
    }

    fn get_size_hint(&self) -> usize {
        self.round_constants.get_size_hint()
    }
}

impl Deserializable for Poseidon2Params {
    fn read_from<R: ByteReader>(source: &mut R) -> Result<Self, DeserializationError> {
        let round_constants = source.read()?;
        Ok(Self { round_constants })
    }
}
