pub mod contact;
pub mod health;
pub mod messages;
pub mod metrics;
pub mod stats;
