// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use math::{fields::f31::BaseElement, ReducibleElement};
use utils::group_slice_elements_mut;

use super::{
    constants::{INTERNAL_DIAG, MONTY_INVERSE},
    STATE_WIDTH,
};

// CONSTANTS
// ================================================================================================

/// Number of bits by which the external layer, followed by a round constant addition and the
/// S-Box normalization, can grow the width of an element.
pub const EXTERNAL_LAYER_HEADROOM: u32 = 10;

// EXTERNAL LAYER
// ================================================================================================

/// Multiplies a 4-element block by the circulant-like matrix
///
/// ```text
/// [ 2 3 1 1 ]
/// [ 1 2 3 1 ]
/// [ 1 1 2 3 ]
/// [ 3 1 1 2 ]
/// ```
///
/// using only additions and two doublings.
#[inline(always)]
pub fn mds_light_4x4<E: ReducibleElement>(x: &mut [E; 4]) {
    let t01 = x[0] + x[1];
    let t23 = x[2] + x[3];
    let t0123 = t01 + t23;
    let t01123 = t0123 + x[1];
    let t01233 = t0123 + x[3];

    // x[0] and x[2] must be read before they are overwritten
    x[3] = t01233 + x[0].mul_const(2);
    x[1] = t01123 + x[2].mul_const(2);
    x[0] = t01123 + t01;
    x[2] = t01233 + t23;
}

/// Applies the external linear layer: every 4-element block is mixed by [mds_light_4x4], then
/// each element is offset by the sum of all elements in the same position across blocks.
///
/// Elements too wide to absorb [EXTERNAL_LAYER_HEADROOM] more bits are reduced first; the choice
/// depends only on tracked widths. Otherwise no reduction is performed, so for canonical inputs
/// the outputs are at most 39 bits wide.
#[inline(always)]
pub fn external_linear_layer<E: ReducibleElement>(state: &mut [E; STATE_WIDTH]) {
    for value in state.iter_mut() {
        if value.bit_width() + EXTERNAL_LAYER_HEADROOM > E::MAX_BITS {
            *value = E::from_canonical(value.reduce());
        }
    }

    for block in group_slice_elements_mut::<E, 4>(state) {
        mds_light_4x4(block);
    }

    let mut sums = [state[0], state[1], state[2], state[3]];
    for block in state[4..].chunks_exact(4) {
        for (sum, &value) in sums.iter_mut().zip(block) {
            *sum = *sum + value;
        }
    }

    for (i, value) in state.iter_mut().enumerate() {
        *value = *value + sums[i % 4];
    }
}

// INTERNAL LAYER
// ================================================================================================

/// Applies the internal linear layer `1 + diag(INTERNAL_DIAG)` followed by a multiplication by
/// 2^-32. All outputs are reduced to canonical form.
#[inline(always)]
pub fn internal_linear_layer<E>(state: &mut [E; STATE_WIDTH])
where
    E: ReducibleElement<Field = BaseElement>,
{
    let sum = state[1..].iter().fold(state[0], |acc, &value| acc + value);
    let monty_inverse = E::from_canonical(MONTY_INVERSE);

    for (value, &diag) in state.iter_mut().zip(INTERNAL_DIAG.iter()) {
        let scaled = *value * E::from_canonical(diag) + sum;
        *value = E::from_canonical((scaled * monty_inverse).reduce());
    }
}
