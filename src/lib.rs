pub mod commands;
pub mod delivery;
pub mod logging;
pub mod settings;
pub mod skyline;
pub mod viewer;
