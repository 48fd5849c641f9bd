pub mod classify;
pub mod document;
pub mod fallback;
pub mod image;
pub mod labels;
pub mod shell;
pub mod source;
pub mod text;
pub mod viewport;

pub use classify::*;
pub use document::*;
pub use fallback::*;
pub use image::*;
pub use labels::*;
pub use shell::*;
pub use source::*;
pub use text::*;
pub use viewport::*;
