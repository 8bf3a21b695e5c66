//! The form registry: parts, forms, physical constants, and the fixed
//! composition rules that turn one choice of form per part into a full model.
//!
//! Everything here is a closed catalog the synthesizer queries; nothing in
//! this module performs I/O or holds state.

pub mod compose;
pub mod constants;
pub mod form;
pub mod part;

pub use compose::{INPUT_ARRAYS, TRAILING_PARAMETERS, is_valid_combination};
pub use form::PartForm;
pub use part::CorrelationPart;
