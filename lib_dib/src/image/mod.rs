pub mod decoder;
pub mod encoder;
pub mod format;

pub use decoder::{decode, load_surface_from_file};
pub use encoder::{encode, encode_to, export_surface_to_file};
