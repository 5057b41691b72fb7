use eframe::egui::{self, Color32, ColorImage, Pos2, Rect, TextureHandle, Vec2};
use lib_dib::Surface;
use log::debug;

/// What a viewer window shows.
pub enum Content {
    /// A bitmap already converted to the display format by the image loader.
    Device(ColorImage),
    /// A device-independent surface, converted on every upload.
    Dib(Surface),
}

impl Content {
    pub fn dimensions(&self) -> (usize, usize) {
        match self {
            Content::Device(image) => (image.size[0], image.size[1]),
            Content::Dib(surface) => (surface.width() as usize, surface.height() as usize),
        }
    }

    pub fn surface(&self) -> Option<&Surface> {
        match self {
            Content::Dib(surface) => Some(surface),
            Content::Device(_) => None,
        }
    }

    pub fn surface_mut(&mut self) -> Option<&mut Surface> {
        match self {
            Content::Dib(surface) => Some(surface),
            Content::Device(_) => None,
        }
    }

    pub fn to_color_image(&self) -> ColorImage {
        match self {
            Content::Device(image) => image.clone(),
            Content::Dib(surface) => surface_to_color_image(surface),
        }
    }
}

pub fn surface_to_color_image(surface: &Surface) -> ColorImage {
    let (width, height) = surface.dimensions();
    ColorImage::from_rgba_unmultiplied([width as usize, height as usize], &surface.to_rgba8())
}

/// GPU copy of the content, re-uploaded only after the content changed.
#[derive(Default)]
pub struct SurfaceTexture {
    handle: Option<TextureHandle>,
    dirty: bool,
}

impl SurfaceTexture {
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty || self.handle.is_none()
    }

    pub fn texture(&mut self, ctx: &egui::Context, content: &Content) -> &TextureHandle {
        let handle = match self.handle.take() {
            Some(mut handle) => {
                if self.dirty {
                    handle.set(content.to_color_image(), egui::TextureOptions::NEAREST);
                }
                handle
            }
            None => {
                let (width, height) = content.dimensions();
                debug!("Uploading {}x{} texture", width, height);
                ctx.load_texture(
                    "surface",
                    content.to_color_image(),
                    egui::TextureOptions::NEAREST,
                )
            }
        };
        self.dirty = false;
        self.handle.insert(handle)
    }
}

/// Destination rectangle for a blit: the whole client area when stretching,
/// otherwise the content's own size anchored at the top-left corner.
pub fn destination_rect(client: Rect, content_size: (usize, usize), stretch: bool, pixels_per_point: f32) -> Rect {
    if stretch {
        return client;
    }
    let size = Vec2::new(content_size.0 as f32, content_size.1 as f32) / pixels_per_point;
    Rect::from_min_size(client.min, size)
}

pub fn blit(painter: &egui::Painter, texture: &TextureHandle, destination: Rect) {
    painter.image(
        texture.id(),
        destination,
        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
        Color32::WHITE,
    );
}
