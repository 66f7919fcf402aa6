//! Phonological post-processing of phonemizer output.
//!
//! ```text
//! raw IPA (strong forms, stress marks)
//!     ↓
//! [reduction]  weak forms, contractions
//!     ↓
//! [allophony]  t/d realization, stress removal
//!     ↓
//! spoken IPA
//! ```

pub mod allophony;
pub mod reduction;
pub mod symbols;

pub use allophony::{realize, realize_stops, strip_stress};
pub use reduction::{Context, ReductionEngine, Rule};
