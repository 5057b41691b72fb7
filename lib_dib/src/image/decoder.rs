use std::fs;
use std::io;
use std::path::Path;

use log::{debug, error, info};
use thiserror::Error;

use super::encoder::padded_stride;
use super::format::{ChannelMasks, Palette, PixelFormat, Rgb};
use crate::constants::{
    BI_BITFIELDS, BI_RGB, FILE_HEADER_SIZE, INFO_HEADER_SIZE, MAGIC, PALETTE_ENTRIES,
    RGBQUAD_SIZE, V4_HEADER_SIZE, V5_HEADER_SIZE,
};
use crate::surface::{ColorLayout, Surface, SurfaceError};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid format or header")]
    InvalidHeader,
    #[error("Unsupported info header size {0}")]
    UnsupportedHeaderSize(u32),
    #[error("Unexpected end of data while reading {0}")]
    Truncated(&'static str),
    #[error("Unsupported compression method {0}")]
    UnsupportedCompression(u32),
    #[error("Unsupported channel masks {red:08X}/{green:08X}/{blue:08X}")]
    UnsupportedMasks { red: u32, green: u32, blue: u32 },
    #[error("Invalid surface: {0}")]
    Surface(#[from] SurfaceError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Little-endian field reader over the raw file bytes.
struct Cursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    fn take(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], DecodeError> {
        let end = self
            .position
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                error!("Unexpected end of data while reading {}", what);
                DecodeError::Truncated(what)
            })?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    fn u16(&mut self, what: &'static str) -> Result<u16, DecodeError> {
        let bytes = self.take(2, what)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn u32(&mut self, what: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.take(4, what)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn i32(&mut self, what: &'static str) -> Result<i32, DecodeError> {
        Ok(self.u32(what)? as i32)
    }

    fn seek(&mut self, position: usize) {
        self.position = position;
    }
}

#[derive(Debug)]
struct InfoHeader {
    size: u32,
    width: i32,
    height: i32,
    bit_count: u16,
    compression: u32,
    colors_used: u32,
}

/// Parses a bitmap file into a top-down surface.
pub fn decode(encoded_data: &[u8]) -> Result<Surface, DecodeError> {
    let mut cursor = Cursor::new(encoded_data);

    // Check the file header and magic number
    if encoded_data.len() < FILE_HEADER_SIZE || !encoded_data.starts_with(&MAGIC) {
        error!("Invalid format or missing magic number in header");
        return Err(DecodeError::InvalidHeader);
    }
    cursor.seek(MAGIC.len());
    let file_size = cursor.u32("file size")?;
    cursor.u32("reserved")?;
    let pixel_offset = cursor.u32("pixel offset")? as usize;
    debug!("File header: size={} pixel offset={}", file_size, pixel_offset);

    let info = read_info_header(&mut cursor)?;
    debug!("Info header: {:?}", info);

    if info.width <= 0 || info.height == 0 || info.height == i32::MIN {
        error!("Invalid bitmap dimensions {}x{}", info.width, info.height);
        return Err(DecodeError::InvalidHeader);
    }
    let width = info.width as u32;
    let height = info.height.unsigned_abs();
    let bottom_up = info.height > 0;

    // Masks live inside V4/V5 headers, or right after a 40-byte header.
    let masks = if info.compression == BI_BITFIELDS {
        cursor.seek(FILE_HEADER_SIZE + INFO_HEADER_SIZE);
        Some(ChannelMasks {
            red: cursor.u32("red mask")?,
            green: cursor.u32("green mask")?,
            blue: cursor.u32("blue mask")?,
        })
    } else {
        None
    };

    let format = match (info.bit_count, info.compression) {
        (8, BI_RGB) => PixelFormat::Indexed8,
        (16, BI_RGB) => PixelFormat::Rgb555,
        (24, BI_RGB) => PixelFormat::Bgr24,
        (32, BI_RGB) => PixelFormat::Xrgb32,
        (16 | 32, BI_BITFIELDS) => format_for_masks(info.bit_count, masks)?,
        (8 | 24, BI_BITFIELDS) | (_, BI_RGB) => {
            error!("Unsupported bit count {}", info.bit_count);
            return Err(SurfaceError::UnsupportedFormat(info.bit_count).into());
        }
        (_, compression) => {
            error!("Unsupported compression method {}", compression);
            return Err(DecodeError::UnsupportedCompression(compression));
        }
    };

    let layout = match format {
        PixelFormat::Indexed8 => {
            cursor.seek(FILE_HEADER_SIZE + info.size as usize);
            ColorLayout::Indexed(read_palette(&mut cursor, info.colors_used)?)
        }
        PixelFormat::Bgr24 => ColorLayout::Direct,
        packed => ColorLayout::PackedMask(packed.masks().ok_or(DecodeError::InvalidHeader)?),
    };

    // Strip row padding and flip bottom-up files into top-down order
    let row_bytes = width as usize * format.bytes_per_pixel();
    let stride = padded_stride(row_bytes);
    let (surface_size, file_rows_size) = row_bytes
        .checked_mul(height as usize)
        .zip(stride.checked_mul(height as usize))
        .ok_or(SurfaceError::OutOfMemory { bytes: usize::MAX })?;
    cursor.seek(pixel_offset);
    let rows = cursor.take(file_rows_size, "pixel rows")?;
    let mut bytes = Vec::new();
    bytes
        .try_reserve_exact(surface_size)
        .map_err(|_| SurfaceError::OutOfMemory {
            bytes: surface_size,
        })?;
    for y in 0..height as usize {
        let source_row = if bottom_up { height as usize - 1 - y } else { y };
        let start = source_row * stride;
        bytes.extend_from_slice(&rows[start..start + row_bytes]);
    }

    let surface = Surface::from_parts(width, height, format, layout, bytes)?;
    info!(
        "Decoded {}x{} bitmap at {} bpp ({})",
        width,
        height,
        format.bits_per_pixel(),
        if bottom_up { "bottom-up" } else { "top-down" }
    );
    Ok(surface)
}

pub fn load_surface_from_file<P: AsRef<Path>>(path: P) -> Result<Surface, DecodeError> {
    let data = fs::read(path.as_ref()).map_err(|e| {
        error!("Can't read {}: {}", path.as_ref().display(), e);
        e
    })?;
    decode(&data)
}

fn read_info_header(cursor: &mut Cursor) -> Result<InfoHeader, DecodeError> {
    let size = cursor.u32("info header size")?;
    if ![INFO_HEADER_SIZE, V4_HEADER_SIZE, V5_HEADER_SIZE].contains(&(size as usize)) {
        error!("Unsupported info header size {}", size);
        return Err(DecodeError::UnsupportedHeaderSize(size));
    }

    let width = cursor.i32("width")?;
    let height = cursor.i32("height")?;
    let planes = cursor.u16("planes")?;
    if planes != 1 {
        error!("Invalid plane count {}", planes);
        return Err(DecodeError::InvalidHeader);
    }
    let bit_count = cursor.u16("bit count")?;
    let compression = cursor.u32("compression")?;
    cursor.u32("image size")?;
    cursor.i32("horizontal resolution")?;
    cursor.i32("vertical resolution")?;
    let colors_used = cursor.u32("colors used")?;
    cursor.u32("important colors")?;

    Ok(InfoHeader {
        size,
        width,
        height,
        bit_count,
        compression,
        colors_used,
    })
}

fn read_palette(cursor: &mut Cursor, colors_used: u32) -> Result<Palette, DecodeError> {
    let count = match colors_used as usize {
        0 => PALETTE_ENTRIES,
        n => n.min(PALETTE_ENTRIES),
    };

    let mut colors = Vec::with_capacity(count);
    for _ in 0..count {
        let quad = cursor.take(RGBQUAD_SIZE, "palette")?;
        colors.push(Rgb::new(quad[2], quad[1], quad[0]));
    }
    debug!("Read palette with {} colors", count);

    Ok(Palette::from_colors(&colors))
}

fn format_for_masks(bit_count: u16, masks: Option<ChannelMasks>) -> Result<PixelFormat, DecodeError> {
    let masks = masks.ok_or(DecodeError::InvalidHeader)?;
    match (bit_count, masks) {
        (16, ChannelMasks::RGB555) => Ok(PixelFormat::Rgb555),
        (16, ChannelMasks::RGB565) => Ok(PixelFormat::Rgb565),
        (32, ChannelMasks::XRGB8888) => Ok(PixelFormat::Xrgb32),
        _ => {
            error!("Unsupported channel masks {:08X?}", masks.to_words());
            Err(DecodeError::UnsupportedMasks {
                red: masks.red,
                green: masks.green,
                blue: masks.blue,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(width: i32, height: i32, bit_count: u16, compression: u32, extra: &[u8]) -> Vec<u8> {
        let offset = (14 + 40 + extra.len()) as u32;
        let mut data = Vec::new();
        data.extend_from_slice(b"BM");
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&offset.to_le_bytes());
        data.extend_from_slice(&40u32.to_le_bytes());
        data.extend_from_slice(&width.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&bit_count.to_le_bytes());
        data.extend_from_slice(&compression.to_le_bytes());
        data.extend_from_slice(&[0; 20]);
        data.extend_from_slice(extra);
        data
    }

    /// A V4 or V5 header: the three masks sit right after the 40-byte core,
    /// the rest of the header is zero.
    fn versioned_header(size: u32, width: i32, height: i32, bit_count: u16, masks: [u32; 3]) -> Vec<u8> {
        let mut data = header(width, height, bit_count, BI_BITFIELDS, &[]);
        data[10..14].copy_from_slice(&(14 + size).to_le_bytes());
        data[14..18].copy_from_slice(&size.to_le_bytes());
        for word in masks {
            data.extend_from_slice(&word.to_le_bytes());
        }
        data.resize(14 + size as usize, 0);
        data
    }

    fn assert_565_header(size: u32) {
        let mut data = versioned_header(size, 2, -1, 16, [0xF800, 0x07E0, 0x001F]);
        data.extend_from_slice(&0xF800u16.to_le_bytes());
        data.extend_from_slice(&0x07E0u16.to_le_bytes());

        let surface = decode(&data).unwrap();
        assert_eq!(surface.format(), PixelFormat::Rgb565);
        assert_eq!(surface.get_pixel(0, 0).unwrap(), Rgb::new(0xF8, 0, 0));
        assert_eq!(surface.get_pixel(1, 0).unwrap(), Rgb::new(0, 0xFC, 0));
    }

    #[test]
    fn test_decode_bad_magic() {
        assert!(matches!(decode(b"PX000000000000000"), Err(DecodeError::InvalidHeader)));
        assert!(matches!(decode(b"BM"), Err(DecodeError::InvalidHeader)));
    }

    #[test]
    fn test_decode_bottom_up_rows_are_flipped() {
        // 1x2, 24 bpp, bottom row first in the file
        let mut data = header(1, 2, 24, BI_RGB, &[]);
        data.extend_from_slice(&[0x03, 0x02, 0x01, 0x00]); // bottom
        data.extend_from_slice(&[0x30, 0x20, 0x10, 0x00]); // top

        let surface = decode(&data).unwrap();
        assert!(surface.descriptor().is_top_down());
        assert_eq!(surface.get_pixel(0, 0).unwrap(), Rgb::new(0x10, 0x20, 0x30));
        assert_eq!(surface.get_pixel(0, 1).unwrap(), Rgb::new(0x01, 0x02, 0x03));
    }

    #[test]
    fn test_decode_sixteen_bpp_without_masks_is_555() {
        let mut data = header(2, -1, 16, BI_RGB, &[]);
        data.extend_from_slice(&0x7C00u16.to_le_bytes());
        data.extend_from_slice(&0x001Fu16.to_le_bytes());

        let surface = decode(&data).unwrap();
        assert_eq!(surface.format(), PixelFormat::Rgb555);
        assert_eq!(surface.get_pixel(0, 0).unwrap(), Rgb::new(0xF8, 0, 0));
        assert_eq!(surface.get_pixel(1, 0).unwrap(), Rgb::new(0, 0, 0xF8));
    }

    #[test]
    fn test_decode_short_palette() {
        let mut palette = Vec::new();
        palette.extend_from_slice(&[0xFF, 0x00, 0x00, 0x00]); // blue
        palette.extend_from_slice(&[0x00, 0x00, 0xFF, 0x00]); // red
        let mut data = header(1, -1, 8, BI_RGB, &palette);
        data[46..50].copy_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[1, 0, 0, 0]);

        let surface = decode(&data).unwrap();
        let palette = surface.descriptor().palette().unwrap();
        assert_eq!(palette.get(0), Rgb::new(0, 0, 0xFF));
        assert_eq!(palette.get(1), Rgb::new(0xFF, 0, 0));
        assert_eq!(palette.get(2), Rgb::BLACK);
        assert_eq!(surface.get_pixel(0, 0).unwrap(), Rgb::new(0xFF, 0, 0));
    }

    #[test]
    fn test_decode_v4_header_with_565_masks() {
        assert_565_header(V4_HEADER_SIZE as u32);
    }

    #[test]
    fn test_decode_v5_header_with_565_masks() {
        assert_565_header(V5_HEADER_SIZE as u32);
    }

    #[test]
    fn test_decode_thirty_two_bpp() {
        let mut data = header(2, 1, 32, BI_RGB, &[]);
        data.extend_from_slice(&0x0010_2030u32.to_le_bytes());
        data.extend_from_slice(&0x00FF_FFFFu32.to_le_bytes());

        let surface = decode(&data).unwrap();
        assert_eq!(surface.format(), PixelFormat::Xrgb32);
        assert_eq!(surface.dimensions(), (2, 1));
        assert_eq!(surface.get_pixel(0, 0).unwrap(), Rgb::new(0x10, 0x20, 0x30));
        assert_eq!(surface.get_pixel(1, 0).unwrap(), Rgb::WHITE);
    }

    #[test]
    fn test_decode_unsupported_masks() {
        let mut masks = Vec::new();
        for word in [0x0000_00FFu32, 0x0000_FF00, 0x00FF_0000] {
            masks.extend_from_slice(&word.to_le_bytes());
        }
        let mut data = header(1, 1, 32, BI_BITFIELDS, &masks);
        data.extend_from_slice(&[0; 4]);

        assert!(matches!(
            decode(&data),
            Err(DecodeError::UnsupportedMasks { red: 0xFF, .. })
        ));
    }

    #[test]
    fn test_decode_rle_is_unsupported() {
        let data = header(1, 1, 8, 1, &[]);
        assert!(matches!(decode(&data), Err(DecodeError::UnsupportedCompression(1))));
    }

    #[test]
    fn test_decode_four_bpp_is_unsupported() {
        let data = header(1, 1, 4, BI_RGB, &[]);
        assert!(matches!(
            decode(&data),
            Err(DecodeError::Surface(SurfaceError::UnsupportedFormat(4)))
        ));
    }

    #[test]
    fn test_decode_truncated_pixels() {
        let mut data = header(4, 4, 32, BI_RGB, &[]);
        data.extend_from_slice(&[0; 10]);
        assert!(matches!(decode(&data), Err(DecodeError::Truncated("pixel rows"))));
    }
}
