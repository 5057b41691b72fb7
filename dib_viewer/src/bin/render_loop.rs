//! Plots random pixels into a hand-built surface on every idle frame.

use dib_viewer::render::RandomPixels;
use dib_viewer::{run, BitmapViewer, Presentation, ViewerError};
use lib_dib::create_surface;

const DIB_DEPTH: u16 = 32;
const DIB_WIDTH: u32 = 320;
const DIB_HEIGHT: u32 = 240;

// Frames arrive far less often than idle messages did, so plot a batch.
const PIXELS_PER_FRAME: usize = 256;

fn main() -> Result<(), ViewerError> {
    lib_dib::init_logging();

    let surface = create_surface(DIB_WIDTH, DIB_HEIGHT, DIB_DEPTH)?;

    run(
        "Example 4",
        BitmapViewer::surface(surface, Presentation::Stretched)
            .with_renderer(RandomPixels::new(PIXELS_PER_FRAME)),
    )
}
