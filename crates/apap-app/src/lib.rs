pub mod app;
pub mod cli;
pub mod error;
pub mod health;
pub mod items;
pub mod limits;
pub mod retry;
pub mod settings;
pub mod shutdown;
pub mod state;
pub mod telemetry;
