pub mod config_io;
pub mod paths;
pub mod state;
