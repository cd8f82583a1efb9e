pub mod cors;

pub use cors::{compile_origin_regex, cors_layer};
