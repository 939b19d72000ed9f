pub mod config;
pub mod dispatch;
pub mod extract;
pub mod outputs;
pub mod registry;
pub mod session;
pub mod telemetry;
pub mod time;
pub mod utterance;

// Re-export specific items if needed for convenient access
pub use dispatch::dispatcher::Dispatcher;
