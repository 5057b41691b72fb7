//! Builds a surface by hand and plots a single white pixel in its centre.

use dib_viewer::{run, BitmapViewer, Presentation, ViewerError};
use lib_dib::create_surface;

const DIB_WIDTH: u32 = 320;
const DIB_HEIGHT: u32 = 240;
const DIB_DEPTH: u16 = 32;

fn main() -> Result<(), ViewerError> {
    lib_dib::init_logging();

    let mut surface = create_surface(DIB_WIDTH, DIB_HEIGHT, DIB_DEPTH)?;
    surface.put_pixel(DIB_WIDTH / 2, DIB_HEIGHT / 2, 0xFF, 0xFF, 0xFF)?;

    run(
        "Example 3",
        BitmapViewer::surface(surface, Presentation::Stretched),
    )
}
