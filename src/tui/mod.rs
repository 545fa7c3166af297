pub mod app;
pub mod input;
pub mod render;
pub mod settings;
pub mod textfield;
pub mod theme;

pub use app::run;
