pub const FORMAT_NAME: &str = "Windows Bitmap";
pub const FILE_EXT: &str = "bmp";

pub const MAGIC: [u8; 2] = *b"BM";

pub const FILE_HEADER_SIZE: usize = 14;
pub const INFO_HEADER_SIZE: usize = 40;
pub const V4_HEADER_SIZE: usize = 108;
pub const V5_HEADER_SIZE: usize = 124;

/// Size of the in-memory info block with its single trailing colour slot.
pub const INFO_SIZE: usize = INFO_HEADER_SIZE + RGBQUAD_SIZE;
pub const RGBQUAD_SIZE: usize = 4;
pub const MASK_WORD_SIZE: usize = 4;

pub const PALETTE_ENTRIES: usize = 256;

pub const BI_RGB: u32 = 0;
pub const BI_BITFIELDS: u32 = 3;

/// 72 DPI expressed in pixels per metre.
pub const PIXELS_PER_METER: i32 = 2835;
