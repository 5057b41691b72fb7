pub mod buffer;
pub mod descriptor;

use log::{debug, error};
use thiserror::Error;

pub use buffer::PixelBuffer;
pub use descriptor::{ColorLayout, SurfaceDescriptor};

use crate::image::format::{PixelFormat, Rgb};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("unsupported pixel format: {0} bits per pixel")]
    UnsupportedFormat(u16),
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("out of memory allocating {bytes} bytes of pixel data")]
    OutOfMemory { bytes: usize },
    #[error("coordinates ({x}, {y}) are out of bounds for a {width}x{height} surface")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    #[error("pixel buffer holds {actual} bytes, layout needs {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// A device-independent surface: its descriptor and the pixels it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    descriptor: SurfaceDescriptor,
    pixels: PixelBuffer,
}

/// Creates a zeroed top-down surface of the given depth.
pub fn create_surface(width: u32, height: u32, bits_per_pixel: u16) -> Result<Surface, SurfaceError> {
    let format = PixelFormat::from_bits_per_pixel(bits_per_pixel).map_err(|e| {
        error!("Cannot create a surface with {} bpp", bits_per_pixel);
        e
    })?;
    Surface::new(width, height, format)
}

impl Surface {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, SurfaceError> {
        Self::with_layout(width, height, format, ColorLayout::for_format(format))
    }

    /// Creates a zeroed surface with an explicit colour layout, e.g. an
    /// indexed surface with a non-grayscale palette.
    pub fn with_layout(
        width: u32,
        height: u32,
        format: PixelFormat,
        layout: ColorLayout,
    ) -> Result<Self, SurfaceError> {
        let size = checked_surface_size(width, height, format)?;
        if !layout.matches(format) {
            return Err(SurfaceError::UnsupportedFormat(format.bits_per_pixel()));
        }

        let pixels = PixelBuffer::zeroed(size)?;
        debug!(
            "Created {}x{} surface at {} bpp ({} bytes, info block {} bytes)",
            width,
            height,
            format.bits_per_pixel(),
            size,
            format.info_size()
        );

        Ok(Self {
            descriptor: SurfaceDescriptor::new(width, height, format, layout),
            pixels,
        })
    }

    /// Wraps pixels produced elsewhere (e.g. by the decoder). The bytes must
    /// already be tightly packed, top-down rows.
    pub fn from_parts(
        width: u32,
        height: u32,
        format: PixelFormat,
        layout: ColorLayout,
        bytes: Vec<u8>,
    ) -> Result<Self, SurfaceError> {
        let expected = checked_surface_size(width, height, format)?;
        if bytes.len() != expected {
            return Err(SurfaceError::BufferSizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        if !layout.matches(format) {
            return Err(SurfaceError::UnsupportedFormat(format.bits_per_pixel()));
        }

        Ok(Self {
            descriptor: SurfaceDescriptor::new(width, height, format, layout),
            pixels: PixelBuffer::from_vec(bytes),
        })
    }

    pub fn descriptor(&self) -> &SurfaceDescriptor {
        &self.descriptor
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.descriptor.width()
    }

    pub fn height(&self) -> u32 {
        self.descriptor.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn format(&self) -> PixelFormat {
        self.descriptor.format()
    }

    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height() {
            return None;
        }
        let stride = self.descriptor.row_bytes();
        let start = y as usize * stride;
        Some(&self.pixels.as_bytes()[start..start + stride])
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn offset(&self, x: u32, y: u32) -> Result<usize, SurfaceError> {
        let (width, height) = self.dimensions();
        if x >= width || y >= height {
            return Err(SurfaceError::OutOfBounds {
                x,
                y,
                width,
                height,
            });
        }
        Ok((y as usize * width as usize + x as usize) * self.descriptor.bytes_per_pixel())
    }

    /// Writes one pixel, packing the colour into the surface's format.
    ///
    /// Coordinates outside the surface are rejected with
    /// [`SurfaceError::OutOfBounds`] and nothing is written.
    pub fn put_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<(), SurfaceError> {
        let offset = self.offset(x, y)?;
        match self.format() {
            PixelFormat::Indexed8 => {
                let index = match self.descriptor.palette() {
                    Some(palette) => palette.index_for(Rgb::new(r, g, b)),
                    None => r,
                };
                self.pixels.as_bytes_mut()[offset] = index;
            }
            PixelFormat::Rgb555 => self.pixels.write_u16(offset, pack_555(r, g, b)),
            PixelFormat::Rgb565 => self.pixels.write_u16(offset, pack_565(r, g, b)),
            PixelFormat::Bgr24 => {
                self.pixels.as_bytes_mut()[offset..offset + 3].copy_from_slice(&[b, g, r]);
            }
            PixelFormat::Xrgb32 => self.pixels.write_u32(offset, pack_8888(r, g, b)),
        }
        Ok(())
    }

    /// Reads one pixel back. Packed formats return the truncated channels
    /// with the dropped low bits zero.
    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Rgb, SurfaceError> {
        let offset = self.offset(x, y)?;
        Ok(self.color_at(offset))
    }

    fn color_at(&self, offset: usize) -> Rgb {
        let bytes = self.pixels.as_bytes();
        match self.format() {
            PixelFormat::Indexed8 => match self.descriptor.palette() {
                Some(palette) => palette.get(bytes[offset]),
                None => Rgb::gray(bytes[offset]),
            },
            PixelFormat::Rgb555 => unpack_555(self.pixels.read_u16(offset)),
            PixelFormat::Rgb565 => unpack_565(self.pixels.read_u16(offset)),
            PixelFormat::Bgr24 => Rgb::new(bytes[offset + 2], bytes[offset + 1], bytes[offset]),
            PixelFormat::Xrgb32 => {
                let word = self.pixels.read_u32(offset);
                Rgb::new((word >> 16) as u8, (word >> 8) as u8, word as u8)
            }
        }
    }

    /// Expands the surface into top-down RGBA bytes for presentation.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let bpp = self.descriptor.bytes_per_pixel();
        let mut rgba = Vec::with_capacity(self.pixels.len() / bpp * 4);
        for offset in (0..self.pixels.len()).step_by(bpp) {
            let color = self.color_at(offset);
            rgba.extend_from_slice(&[color.r, color.g, color.b, 0xFF]);
        }
        rgba
    }
}

fn checked_surface_size(width: u32, height: u32, format: PixelFormat) -> Result<usize, SurfaceError> {
    if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(SurfaceError::InvalidDimensions { width, height });
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|pixels| pixels.checked_mul(format.bytes_per_pixel()))
        .ok_or(SurfaceError::OutOfMemory { bytes: usize::MAX })
}

pub fn pack_555(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 7) | ((g as u16 & 0xF8) << 2) | (b as u16 >> 3)
}

pub fn pack_565(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3)
}

pub fn pack_8888(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

fn unpack_555(word: u16) -> Rgb {
    Rgb::new(
        ((word >> 7) & 0xF8) as u8,
        ((word >> 2) & 0xF8) as u8,
        ((word << 3) & 0xF8) as u8,
    )
}

fn unpack_565(word: u16) -> Rgb {
    Rgb::new(
        ((word >> 8) & 0xF8) as u8,
        ((word >> 3) & 0xFC) as u8,
        ((word << 3) & 0xF8) as u8,
    )
}
