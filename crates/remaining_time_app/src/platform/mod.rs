mod app;
mod logging;
mod settings;
mod ui;

pub use app::run_app;
