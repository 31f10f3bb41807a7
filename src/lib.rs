pub mod app;
pub mod commands;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod logging;

#[cfg(test)]
pub mod test_helpers;
