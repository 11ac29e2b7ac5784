pub mod config;
pub mod message;
pub mod reveal;
pub mod scheduler;
pub mod session;
