//! Loads the embedded bitmap as a device-independent surface, shows it, and
//! can write it back out as a bitmap file.

use dib_viewer::{run, BitmapViewer, Presentation, ViewerError};
use lib_dib::{load_surface_from_resource, Resource};

const BITMAP: Resource = lib_dib::bitmap_resource!("../../resources/bitmap.bmp");

fn main() -> Result<(), ViewerError> {
    lib_dib::init_logging();

    let surface = load_surface_from_resource(&BITMAP)?;

    run(
        "Example 2",
        BitmapViewer::surface(surface, Presentation::Actual).with_save(),
    )
}
