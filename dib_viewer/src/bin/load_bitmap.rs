//! Loads a bitmap compiled into the executable and blits it at its own size.

use dib_viewer::{filemanager, run, BitmapViewer, ViewerError};
use lib_dib::Resource;

const BITMAP: Resource = lib_dib::bitmap_resource!("../../resources/bitmap.bmp");

fn main() -> Result<(), ViewerError> {
    lib_dib::init_logging();

    // A bitmap that fails to load keeps the window from opening.
    let image = filemanager::load_device_bitmap(&BITMAP)?;

    run("Example 1", BitmapViewer::device(image))
}
