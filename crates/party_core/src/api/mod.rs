pub mod party_json;

pub use party_json::*;
