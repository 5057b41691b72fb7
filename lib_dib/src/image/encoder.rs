use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::{debug, error, info};
use thiserror::Error;

use crate::constants::{
    BI_BITFIELDS, FILE_HEADER_SIZE, INFO_HEADER_SIZE, MAGIC, MASK_WORD_SIZE, PALETTE_ENTRIES,
    PIXELS_PER_METER, RGBQUAD_SIZE,
};
use crate::surface::{ColorLayout, Surface};

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("encoded bitmap of {0} bytes exceeds the 4 GiB file limit")]
    TooLarge(u64),
}

/// Byte layout of a surface once written as a bitmap file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileLayout {
    pub color_table_size: usize,
    pub stride: usize,
    pub pixel_offset: usize,
    pub image_size: usize,
    pub file_size: usize,
}

impl FileLayout {
    pub fn of(surface: &Surface) -> Self {
        let descriptor = surface.descriptor();
        let color_table_size = match descriptor.layout() {
            ColorLayout::Indexed(_) => RGBQUAD_SIZE * PALETTE_ENTRIES,
            ColorLayout::PackedMask(_) => MASK_WORD_SIZE * 3,
            ColorLayout::Direct => 0,
        };
        let stride = padded_stride(descriptor.row_bytes());
        let pixel_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + color_table_size;
        let image_size = stride * descriptor.height() as usize;

        Self {
            color_table_size,
            stride,
            pixel_offset,
            image_size,
            file_size: pixel_offset + image_size,
        }
    }
}

/// Rows in a bitmap file start on 4-byte boundaries.
pub fn padded_stride(row_bytes: usize) -> usize {
    (row_bytes + 3) & !3
}

/// Serialises a surface into an in-memory bitmap file.
pub fn encode(surface: &Surface) -> Result<Vec<u8>, EncodeError> {
    let mut encoded = Vec::with_capacity(FileLayout::of(surface).file_size);
    encode_to(surface, &mut encoded)?;
    Ok(encoded)
}

pub fn encode_to<W: Write>(surface: &Surface, mut writer: W) -> Result<(), EncodeError> {
    let descriptor = surface.descriptor();
    let layout = FileLayout::of(surface);

    let file_size = u32::try_from(layout.file_size).map_err(|_| {
        error!("Bitmap of {} bytes cannot be described by a file header", layout.file_size);
        EncodeError::TooLarge(layout.file_size as u64)
    })?;

    info!(
        "Encoding {}x{} surface at {} bpp",
        descriptor.width(),
        descriptor.height(),
        descriptor.bits_per_pixel()
    );

    // Step 1: File header
    writer.write_all(&MAGIC)?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(&0u16.to_le_bytes())?; // Reserved
    writer.write_all(&0u16.to_le_bytes())?; // Reserved
    writer.write_all(&(layout.pixel_offset as u32).to_le_bytes())?;
    debug!(
        "File header written: size={} offset={}",
        file_size, layout.pixel_offset
    );

    // Step 2: Info header
    let colors_used = match descriptor.layout() {
        ColorLayout::Indexed(_) => PALETTE_ENTRIES as u32,
        _ => 0,
    };
    writer.write_all(&(INFO_HEADER_SIZE as u32).to_le_bytes())?;
    writer.write_all(&(descriptor.width() as i32).to_le_bytes())?;
    writer.write_all(&descriptor.stored_height().to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?; // Planes
    writer.write_all(&descriptor.format().bit_count().to_le_bytes())?;
    writer.write_all(&descriptor.format().compression().to_le_bytes())?;
    writer.write_all(&(layout.image_size as u32).to_le_bytes())?;
    writer.write_all(&PIXELS_PER_METER.to_le_bytes())?;
    writer.write_all(&PIXELS_PER_METER.to_le_bytes())?;
    writer.write_all(&colors_used.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?; // Important colours
    debug!(
        "Info header written: bit count {}, compression {}",
        descriptor.format().bit_count(),
        descriptor.format().compression()
    );

    // Step 3: Colour table
    match descriptor.layout() {
        ColorLayout::Indexed(palette) => {
            for color in palette.entries() {
                writer.write_all(&[color.b, color.g, color.r, 0])?;
            }
            debug!("Palette written with {} entries", PALETTE_ENTRIES);
        }
        ColorLayout::PackedMask(masks) => {
            debug_assert_eq!(descriptor.format().compression(), BI_BITFIELDS);
            for word in masks.to_words() {
                writer.write_all(&word.to_le_bytes())?;
            }
            debug!("Channel masks written: {:08X?}", masks.to_words());
        }
        ColorLayout::Direct => {}
    }

    // Step 4: Pixel rows, top row first
    let padding = [0u8; 3];
    let pad = layout.stride - descriptor.row_bytes();
    for row in surface.pixels().as_bytes().chunks_exact(descriptor.row_bytes()) {
        writer.write_all(row)?;
        writer.write_all(&padding[..pad])?;
    }
    writer.flush()?;

    info!("Encoding completed: {} bytes", layout.file_size);
    Ok(())
}

/// Writes the surface to `path` as a bitmap file. The surface is left
/// untouched whether or not the export succeeds, and a failed export leaves
/// no partial file behind.
pub fn export_surface_to_file<P: AsRef<Path>>(surface: &Surface, path: P) -> Result<(), EncodeError> {
    write_file(path.as_ref(), |writer| encode_to(surface, writer))
}

fn write_file<F>(path: &Path, write: F) -> Result<(), EncodeError>
where
    F: FnOnce(BufWriter<File>) -> Result<(), EncodeError>,
{
    let file = File::create(path).map_err(|e| {
        error!("Can't open {} for writing: {}", path.display(), e);
        e
    })?;

    if let Err(e) = write(BufWriter::new(file)) {
        error!("Failed to write bitmap to {}: {}", path.display(), e);
        if let Err(remove_error) = fs::remove_file(path) {
            error!("Can't remove partial file {}: {}", path.display(), remove_error);
        }
        return Err(e);
    }

    info!("Bitmap saved to {}", path.display());
    Ok(())
}
