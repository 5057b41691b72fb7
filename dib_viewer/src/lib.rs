pub mod app;
pub mod display;
pub mod error;
pub mod filemanager;
pub mod render;

pub use app::{run, BitmapViewer, Presentation};
pub use error::ViewerError;
