pub mod billing;
pub mod text_generation;
