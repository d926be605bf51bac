//! Small helpers shared across the credible layer crates.

pub mod hex;
