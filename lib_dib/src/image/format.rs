use crate::constants::{
    BI_BITFIELDS, BI_RGB, INFO_SIZE, MASK_WORD_SIZE, PALETTE_ENTRIES, RGBQUAD_SIZE,
};
use crate::surface::SurfaceError;

/// The five pixel layouts a surface can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8 bpp, one palette index per pixel.
    Indexed8,
    /// 15 bpp packed into a 16-bit word, top bit unused.
    Rgb555,
    /// 16 bpp packed into a 16-bit word.
    Rgb565,
    /// 24 bpp, one byte per channel in B, G, R order.
    Bgr24,
    /// 32 bpp, `0x00RRGGBB` in a little-endian double word.
    Xrgb32,
}

impl PixelFormat {
    pub const ALL: [PixelFormat; 5] = [
        PixelFormat::Indexed8,
        PixelFormat::Rgb555,
        PixelFormat::Rgb565,
        PixelFormat::Bgr24,
        PixelFormat::Xrgb32,
    ];

    pub fn from_bits_per_pixel(bits_per_pixel: u16) -> Result<Self, SurfaceError> {
        match bits_per_pixel {
            8 => Ok(PixelFormat::Indexed8),
            15 => Ok(PixelFormat::Rgb555),
            16 => Ok(PixelFormat::Rgb565),
            24 => Ok(PixelFormat::Bgr24),
            32 => Ok(PixelFormat::Xrgb32),
            other => Err(SurfaceError::UnsupportedFormat(other)),
        }
    }

    /// Logical colour depth.
    pub fn bits_per_pixel(self) -> u16 {
        match self {
            PixelFormat::Indexed8 => 8,
            PixelFormat::Rgb555 => 15,
            PixelFormat::Rgb565 => 16,
            PixelFormat::Bgr24 => 24,
            PixelFormat::Xrgb32 => 32,
        }
    }

    /// Depth as written to the `biBitCount` header field. 15 bpp surfaces
    /// are stored in 16-bit words and only distinguished by their masks.
    pub fn bit_count(self) -> u16 {
        match self {
            PixelFormat::Rgb555 => 16,
            other => other.bits_per_pixel(),
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Indexed8 => 1,
            PixelFormat::Rgb555 | PixelFormat::Rgb565 => 2,
            PixelFormat::Bgr24 => 3,
            PixelFormat::Xrgb32 => 4,
        }
    }

    pub fn compression(self) -> u32 {
        match self {
            PixelFormat::Indexed8 | PixelFormat::Bgr24 => BI_RGB,
            PixelFormat::Rgb555 | PixelFormat::Rgb565 | PixelFormat::Xrgb32 => BI_BITFIELDS,
        }
    }

    pub fn masks(self) -> Option<ChannelMasks> {
        match self {
            PixelFormat::Rgb555 => Some(ChannelMasks::RGB555),
            PixelFormat::Rgb565 => Some(ChannelMasks::RGB565),
            PixelFormat::Xrgb32 => Some(ChannelMasks::XRGB8888),
            PixelFormat::Indexed8 | PixelFormat::Bgr24 => None,
        }
    }

    /// Size of the in-memory info block: the header plus room for either a
    /// 256-entry palette or four mask words.
    pub fn info_size(self) -> usize {
        match self {
            PixelFormat::Indexed8 => INFO_SIZE + RGBQUAD_SIZE * PALETTE_ENTRIES,
            PixelFormat::Rgb555 | PixelFormat::Rgb565 | PixelFormat::Xrgb32 => {
                INFO_SIZE + MASK_WORD_SIZE * 4
            }
            PixelFormat::Bgr24 => INFO_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
}

impl ChannelMasks {
    pub const RGB555: ChannelMasks = ChannelMasks {
        red: 0x0000_7C00,
        green: 0x0000_03E0,
        blue: 0x0000_001F,
    };
    pub const RGB565: ChannelMasks = ChannelMasks {
        red: 0x0000_F800,
        green: 0x0000_07E0,
        blue: 0x0000_001F,
    };
    pub const XRGB8888: ChannelMasks = ChannelMasks {
        red: 0x00FF_0000,
        green: 0x0000_FF00,
        blue: 0x0000_00FF,
    };

    pub fn is_disjoint(&self) -> bool {
        self.red & self.green == 0 && self.red & self.blue == 0 && self.green & self.blue == 0
    }

    pub fn fits(&self, bits: u16) -> bool {
        let limit = if bits >= 32 {
            u32::MAX
        } else {
            (1u32 << bits) - 1
        };
        (self.red | self.green | self.blue) & !limit == 0
    }

    pub fn to_words(self) -> [u32; 3] {
        [self.red, self.green, self.blue]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Integer Rec.601 luma. Weights sum to 256, so grays map to themselves.
    pub fn luminance(self) -> u8 {
        ((77 * self.r as u32 + 150 * self.g as u32 + 29 * self.b as u32) >> 8) as u8
    }

    fn distance(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

/// A 256-entry colour table for indexed surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Box<[Rgb; PALETTE_ENTRIES]>,
}

impl Palette {
    pub fn grayscale() -> Self {
        let mut entries = Box::new([Rgb::BLACK; PALETTE_ENTRIES]);
        for (i, entry) in entries.iter_mut().enumerate() {
            *entry = Rgb::gray(i as u8);
        }
        Self { entries }
    }

    /// Builds a palette from up to 256 colours; missing entries are black.
    pub fn from_colors(colors: &[Rgb]) -> Self {
        let mut entries = Box::new([Rgb::BLACK; PALETTE_ENTRIES]);
        for (entry, &color) in entries.iter_mut().zip(colors) {
            *entry = color;
        }
        Self { entries }
    }

    pub fn get(&self, index: u8) -> Rgb {
        self.entries[index as usize]
    }

    pub fn entries(&self) -> &[Rgb] {
        &self.entries[..]
    }

    pub fn is_grayscale(&self) -> bool {
        self.entries
            .iter()
            .enumerate()
            .all(|(i, &entry)| entry == Rgb::gray(i as u8))
    }

    /// Palette index used to store `color`.
    pub fn index_for(&self, color: Rgb) -> u8 {
        if self.is_grayscale() {
            return color.luminance();
        }

        let mut best = 0usize;
        let mut best_distance = u32::MAX;
        for (i, &entry) in self.entries.iter().enumerate() {
            let distance = entry.distance(color);
            if distance < best_distance {
                best = i;
                best_distance = distance;
                if distance == 0 {
                    break;
                }
            }
        }
        best as u8
    }
}
