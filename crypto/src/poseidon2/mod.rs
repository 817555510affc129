// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use math::{fields::f31::BaseElement, FieldElement, ReducibleElement};
use tracing::info_span;
#[cfg(feature = "concurrent")]
use utils::iterators::*;
use utils::{group_slice_elements_mut, iter_mut};

use crate::ParamsError;

mod constants;
pub use constants::{INTERNAL_DIAG, MONTY_INVERSE, RAW_ROUND_CONSTANTS, ROUND_CONSTANTS};

mod linear;

mod params;
pub use params::{
    Poseidon2Params, NUM_EXTERNAL_ROUNDS, NUM_INTERNAL_ROUNDS, NUM_ROUNDS, STATE_WIDTH,
};

#[cfg(test)]
mod tests;

// CONSTANTS
// ================================================================================================

/// Number of external rounds applied before the internal rounds.
const HALF_EXTERNAL_ROUNDS: usize = NUM_EXTERNAL_ROUNDS / 2;

/// Minimum number of states processed by a single thread when permuting states in parallel.
const MIN_CONCURRENT_BATCH: usize = 64;

/// S-Box power; the S-Box is computed with an unrolled addition chain, so this is used in tests
/// only.
#[cfg(test)]
const ALPHA: u32 = 7;

// ROUND KIND
// ================================================================================================

/// Kind of a Poseidon2 round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundKind {
    /// A full round: constants are added to all state elements, the S-Box is applied to all
    /// state elements, and the state is mixed by the external linear layer.
    External,
    /// A partial round: a constant is added to the first state element, the S-Box is applied to
    /// the first state element only, and the state is mixed by the internal linear layer.
    Internal,
}

// POSEIDON2 PERMUTATION
// ================================================================================================

/// Poseidon2 permutation over the BabyBear field with a state of 16 elements.
///
/// The permutation is instantiated as follows:
/// * Field: 31-bit prime field with modulus 2^31 - 2^27 + 1.
/// * State width: 16 field elements.
/// * Number of external rounds: 8, split into 4 rounds before and 4 rounds after the internal
///   rounds.
/// * Number of internal rounds: 13.
/// * S-Box degree: 7.
///
/// Before the first round, the state is mixed by the external linear layer. After that, rounds
/// are applied in the order given by [round_schedule()](Poseidon2::round_schedule).
///
/// The permutation is generic over the arithmetic backend. Canonical field elements
/// ([BaseElement]) and lazily reduced elements ([LazyElement](math::fields::f31::LazyElement))
/// produce identical results; with the latter, values are reduced only at the end of each S-Box,
/// at the end of the internal linear layer, and before an external linear layer for inputs too
/// wide to be mixed without reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poseidon2 {
    params: Poseidon2Params,
}

impl Poseidon2 {
    // CONSTRUCTORS
    // --------------------------------------------------------------------------------------------

    /// Returns a new permutation instantiated with the specified parameters.
    pub const fn new(params: Poseidon2Params) -> Self {
        Self { params }
    }

    /// Returns the published BabyBear Poseidon2 permutation of width 16.
    pub const fn babybear_16() -> Self {
        Self::new(Poseidon2Params::babybear_16())
    }

    // PUBLIC ACCESSORS
    // --------------------------------------------------------------------------------------------

    /// Returns the parameters of this permutation.
    pub const fn params(&self) -> &Poseidon2Params {
        &self.params
    }

    /// Returns an iterator over the rounds of this permutation in the order they are applied;
    /// each item is a round index together with the kind of the round.
    ///
    /// The schedule does not depend on the state being permuted.
    pub fn round_schedule(&self) -> impl Iterator<Item = (usize, RoundKind)> {
        let internal_end = HALF_EXTERNAL_ROUNDS + NUM_INTERNAL_ROUNDS;
        (0..NUM_ROUNDS).map(move |round| {
            if (HALF_EXTERNAL_ROUNDS..internal_end).contains(&round) {
                (round, RoundKind::Internal)
            } else {
                (round, RoundKind::External)
            }
        })
    }

    // PERMUTATION
    // --------------------------------------------------------------------------------------------

    /// Returns the result of applying the permutation to the provided state.
    pub fn permute<E>(&self, mut state: [E; STATE_WIDTH]) -> [E; STATE_WIDTH]
    where
        E: ReducibleElement<Field = BaseElement>,
    {
        self.permute_mut(&mut state);
        state
    }

    /// Applies the permutation to the provided state in place.
    ///
    /// Elements do not need to be reduced: inputs wider than 54 bits are brought to canonical
    /// form by the initial external layer, so any value a backend can hold is accepted.
    pub fn permute_mut<E>(&self, state: &mut [E; STATE_WIDTH])
    where
        E: ReducibleElement<Field = BaseElement>,
    {
        Self::apply_external_linear_layer(state);
        for (round, _) in self.round_schedule() {
            self.apply_round(state, round);
        }
    }

    /// Applies the permutation to a state provided as a slice.
    ///
    /// # Errors
    /// Returns an error if the slice does not contain exactly 16 elements.
    pub fn permute_slice(&self, state: &mut [BaseElement]) -> Result<(), ParamsError> {
        let actual = state.len();
        let state: &mut [BaseElement; STATE_WIDTH] = state
            .try_into()
            .map_err(|_| ParamsError::InvalidStateWidth { expected: STATE_WIDTH, actual })?;
        self.permute_mut(state);
        Ok(())
    }

    /// Applies the permutation to each of the provided states.
    ///
    /// When `concurrent` feature is enabled, the states are permuted in multiple threads.
    pub fn permute_many(&self, states: &mut [[BaseElement; STATE_WIDTH]]) {
        let _span = info_span!("permute_many", num_states = states.len()).entered();
        iter_mut!(states, MIN_CONCURRENT_BATCH).for_each(|state| self.permute_mut(state));
    }

    /// Applies the permutation to consecutive 16-element states laid out in a single buffer.
    ///
    /// # Errors
    /// Returns an error if the length of the buffer is not a multiple of 16; in this case the
    /// buffer is left unchanged.
    pub fn permute_flat(&self, elements: &mut [BaseElement]) -> Result<(), ParamsError> {
        if elements.len() % STATE_WIDTH != 0 {
            return Err(ParamsError::InvalidStateWidth {
                expected: STATE_WIDTH,
                actual: elements.len() % STATE_WIDTH,
            });
        }
        self.permute_many(group_slice_elements_mut(elements));
        Ok(())
    }

    // ROUND FUNCTIONS
    // --------------------------------------------------------------------------------------------

    /// Applies the specified round to the provided state. The kind of the round is determined by
    /// its position in the schedule.
    ///
    /// # Panics
    /// Panics if `round` is not smaller than 21.
    #[inline(always)]
    pub fn apply_round<E>(&self, state: &mut [E; STATE_WIDTH], round: usize)
    where
        E: ReducibleElement<Field = BaseElement>,
    {
        let constants = self.params.round_constants(round);
        if (HALF_EXTERNAL_ROUNDS..HALF_EXTERNAL_ROUNDS + NUM_INTERNAL_ROUNDS).contains(&round) {
            state[0] = apply_sbox(state[0] + E::from_canonical(constants[0]));
            Self::apply_internal_linear_layer(state);
        } else {
            for (value, &constant) in state.iter_mut().zip(constants) {
                *value = apply_sbox(*value + E::from_canonical(constant));
            }
            Self::apply_external_linear_layer(state);
        }
    }

    /// Applies the external (full) linear layer to the provided state. Elements wider than 54
    /// bits are reduced before mixing.
    #[inline(always)]
    pub fn apply_external_linear_layer<E: ReducibleElement>(state: &mut [E; STATE_WIDTH]) {
        linear::external_linear_layer(state);
    }

    /// Applies the internal (partial) linear layer to the provided state; all resulting elements
    /// are in canonical form.
    #[inline(always)]
    pub fn apply_internal_linear_layer<E>(state: &mut [E; STATE_WIDTH])
    where
        E: ReducibleElement<Field = BaseElement>,
    {
        linear::internal_linear_layer(state);
    }
}

impl Default for Poseidon2 {
    fn default() -> Self {
        Self::babybear_16()
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Computes x^7 using the addition chain x^2, x^4, x^6, x^7 and returns the result in canonical
/// form. The input is brought to canonical form first so that the chain cannot overflow.
#[inline(always)]
fn apply_sbox<E>(x: E) -> E
where
    E: ReducibleElement<Field = BaseElement>,
{
    let x = E::from_canonical((x + E::from_canonical(BaseElement::ZERO)).reduce());
    let x2 = x * x;
    let x4 = x2 * x2;
    let x6 = x4 * x2;
    let x7 = x6 * x;
    E::from_canonical(x7.reduce())
}
