#![allow(dead_code)]

use lib_dib::{create_surface, Surface};

pub const DEPTHS: [u16; 5] = [8, 15, 16, 24, 32];

// (bits per pixel, bytes per pixel, info block size)
pub const DEPTH_TABLE: [(u16, usize, usize); 5] = [
    (8, 1, 1068),
    (15, 2, 60),
    (16, 2, 60),
    (24, 3, 44),
    (32, 4, 60),
];

pub const GRADIENT_WIDTH: u32 = 16;
pub const GRADIENT_HEIGHT: u32 = 16;

/// A surface where every pixel has a distinct colour.
pub fn gradient(bits_per_pixel: u16) -> Surface {
    let mut surface = create_surface(GRADIENT_WIDTH, GRADIENT_HEIGHT, bits_per_pixel).unwrap();
    for y in 0..GRADIENT_HEIGHT {
        for x in 0..GRADIENT_WIDTH {
            let r = (x * 16) as u8;
            let g = (y * 16) as u8;
            let b = ((x + y) * 8) as u8;
            surface.put_pixel(x, y, r, g, b).unwrap();
        }
    }
    surface
}

pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("lib_dib_{}_{}", std::process::id(), name))
}
