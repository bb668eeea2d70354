//! Combat systems

pub mod damage;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod damage_tests;

pub use damage::*;
