use crate::image::format::{ChannelMasks, Palette, PixelFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorLayout {
    Indexed(Palette),
    PackedMask(ChannelMasks),
    /// One byte per channel in B, G, R order.
    Direct,
}

impl ColorLayout {
    pub fn for_format(format: PixelFormat) -> Self {
        match (format, format.masks()) {
            (PixelFormat::Indexed8, _) => ColorLayout::Indexed(Palette::grayscale()),
            (_, Some(masks)) => ColorLayout::PackedMask(masks),
            (_, None) => ColorLayout::Direct,
        }
    }

    pub fn matches(&self, format: PixelFormat) -> bool {
        match self {
            ColorLayout::Indexed(_) => format == PixelFormat::Indexed8,
            ColorLayout::PackedMask(masks) => {
                format.masks() == Some(*masks)
                    && masks.is_disjoint()
                    && masks.fits(format.bits_per_pixel())
            }
            ColorLayout::Direct => format == PixelFormat::Bgr24,
        }
    }
}

/// Describes the layout of a surface's pixel buffer.
///
/// The height is kept negative the way the bitmap header stores it, marking
/// row 0 as the visual top of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    width: u32,
    height: i32,
    format: PixelFormat,
    layout: ColorLayout,
}

impl SurfaceDescriptor {
    pub(crate) fn new(width: u32, height: u32, format: PixelFormat, layout: ColorLayout) -> Self {
        debug_assert!(layout.matches(format));
        Self {
            width,
            height: -(height as i32),
            format,
            layout,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    /// Height as stored in the header; negative means top-down.
    pub fn stored_height(&self) -> i32 {
        self.height
    }

    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn bits_per_pixel(&self) -> u16 {
        self.format.bits_per_pixel()
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.format.bytes_per_pixel()
    }

    pub fn info_size(&self) -> usize {
        self.format.info_size()
    }

    pub fn layout(&self) -> &ColorLayout {
        &self.layout
    }

    pub fn palette(&self) -> Option<&Palette> {
        match &self.layout {
            ColorLayout::Indexed(palette) => Some(palette),
            _ => None,
        }
    }

    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel()
    }
}
