pub mod envelope;
pub mod vault;
