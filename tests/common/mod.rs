#![allow(dead_code)]

mod assertions;
mod fixtures;

pub use assertions::{
    assert_canonical_attitude, assert_snapshot_finite, assert_state_finite, assert_vector_eq,
};
pub use fixtures::*;
