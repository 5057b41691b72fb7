pub mod constants;
pub mod image;
pub mod resource;
pub mod surface;

use log::*;
use std::fs::File;
use std::io::Write;

pub use crate::image::format::{ChannelMasks, Palette, PixelFormat, Rgb};
pub use crate::image::{decode, encode, export_surface_to_file, load_surface_from_file};
pub use crate::resource::{load_surface_from_resource, Resource};
pub use crate::surface::{create_surface, ColorLayout, PixelBuffer, Surface, SurfaceDescriptor};

pub const LOG_FILE: &str = "dib.log";

pub fn init_logging() {
    let mut builder = env_logger::Builder::new();

    match File::create(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => eprintln!("Can't create {}: {}, logging to stderr", LOG_FILE, e),
    }

    builder
        .filter(Some("lib_dib"), LevelFilter::Debug)
        .filter(Some("dib_viewer"), LevelFilter::Debug)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}:{}] {}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}
