pub mod errors;
pub mod templates;
