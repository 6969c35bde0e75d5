//! Core settings resolution types.

mod builder;
mod engine;
mod scanner;
mod validate;

pub use builder::SettingsBuilder;
pub use engine::Settings;
pub use validate::validate_setting;
