pub mod category;
pub mod checkout;
pub mod furniture;
pub mod metrics;
pub mod money;
pub mod preferences;
pub mod recommendation;
pub mod settings;
pub mod transaction;
pub mod user;
