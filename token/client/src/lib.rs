pub mod amount;
pub mod client;
pub mod token;
