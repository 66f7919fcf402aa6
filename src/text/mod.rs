//! Text preparation before phonemization.
//!
//! - [`normalize`]: quote/dash folding and ASCII filtering
//! - [`segmenter`]: re-joining hard-wrapped lines into complete units
//! - [`ocr_repair`]: optional fixes for common scanner misreads

pub mod normalize;
pub mod ocr_repair;
pub mod segmenter;

pub use normalize::normalize;
pub use segmenter::{advance, CarryState};
