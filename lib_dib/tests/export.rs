mod common;

use std::fs;

use common::{gradient, temp_path, DEPTHS, GRADIENT_HEIGHT, GRADIENT_WIDTH};
use lib_dib::image::encoder::EncodeError;
use lib_dib::{
    create_surface, decode, encode, export_surface_to_file, load_surface_from_file,
    load_surface_from_resource, PixelFormat, Resource,
};

#[test]
fn test_export_32bpp_roundtrip() {
    let surface = gradient(32);
    let encoded = encode(&surface).unwrap();

    // 32 bpp rows need no padding, so the payload is the buffer itself
    assert_eq!(&encoded[14 + 40 + 12..], surface.pixels().as_bytes());

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded.width(), GRADIENT_WIDTH);
    assert_eq!(decoded.height(), GRADIENT_HEIGHT);
    assert_eq!(decoded.descriptor().bits_per_pixel(), 32);
    assert_eq!(decoded.pixels().as_bytes(), surface.pixels().as_bytes());
}

#[test]
fn test_export_roundtrip_every_depth() {
    for bpp in DEPTHS {
        let surface = gradient(bpp);
        let decoded = decode(&encode(&surface).unwrap()).unwrap();
        assert_eq!(decoded, surface, "{} bpp", bpp);
    }
}

#[test]
fn test_export_odd_width_24bpp() {
    let mut surface = create_surface(5, 3, 24).unwrap();
    surface.put_pixel(4, 2, 0xAA, 0xBB, 0xCC).unwrap();

    let encoded = encode(&surface).unwrap();
    // 15 bytes per row padded to 16
    assert_eq!(encoded.len(), 14 + 40 + 16 * 3);

    let decoded = decode(&encoded).unwrap();
    assert_eq!(decoded.format(), PixelFormat::Bgr24);
    assert_eq!(decoded.pixels().as_bytes(), surface.pixels().as_bytes());
}

#[test]
fn test_export_to_file() {
    let surface = gradient(16);
    let path = temp_path("export.bmp");

    export_surface_to_file(&surface, &path).unwrap();
    let written = fs::read(&path).unwrap();
    assert_eq!(written, encode(&surface).unwrap());

    let loaded = load_surface_from_file(&path).unwrap();
    assert_eq!(loaded, surface);

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_export_to_unwritable_path() {
    let surface = gradient(24);
    let before = surface.clone();
    let path = temp_path("missing-dir").join("nested").join("out.bmp");

    let result = export_surface_to_file(&surface, &path);
    assert!(matches!(result, Err(EncodeError::Io(_))));
    assert_eq!(surface, before);
}

#[test]
fn test_resource_loads_like_created_surface() {
    let surface = gradient(8);
    let bytes: &'static [u8] = Box::leak(encode(&surface).unwrap().into_boxed_slice());
    let resource = Resource::new("gradient", bytes);

    let mut loaded = load_surface_from_resource(&resource).unwrap();
    assert_eq!(loaded, surface);

    loaded.put_pixel(0, 0, 0x40, 0x40, 0x40).unwrap();
    assert_eq!(loaded.pixels().as_bytes()[0], 0x40);
}
