#[macro_use]
pub mod logging;
pub use logging::*;

pub mod data;
pub mod settings;
