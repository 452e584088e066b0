pub mod engine;
pub mod event;
pub mod loader;
pub mod session;
