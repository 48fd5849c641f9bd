pub mod api;
pub mod config;
pub mod desktop;
pub mod desktop_window;
pub mod interop;
pub mod viewers;

pub use api::{ApiError, MayanClient};
pub use config::{ConfigError, ConsoleConfig};
pub use desktop::*;
pub use desktop_window::*;
pub use interop::*;
pub use viewers::*;
