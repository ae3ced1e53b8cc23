// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod engine;
pub mod level;
pub mod registry;
pub mod runtime;
pub mod timer;
pub mod tutorial;
pub mod ui;

pub use app::App;
