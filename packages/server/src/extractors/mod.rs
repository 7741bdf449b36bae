pub mod context;
pub mod json;
