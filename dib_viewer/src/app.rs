use eframe::egui;
use eframe::Frame;
use egui::ColorImage;
use lib_dib::Surface;
use log::{error, info};

use crate::display::{blit, destination_rect, Content, SurfaceTexture};
use crate::error::ViewerError;
use crate::filemanager;
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Blit at the bitmap's own size.
    Actual,
    /// Stretch the bitmap over the whole client area.
    Stretched,
}

pub struct BitmapViewer {
    content: Content,
    texture: SurfaceTexture,
    presentation: Presentation,
    renderer: Option<Box<dyn Renderer>>,
    allow_save: bool,
    status: Option<String>,
}

impl BitmapViewer {
    /// Shows a bitmap already converted by the image loader.
    pub fn device(image: ColorImage) -> Self {
        Self::with_content(Content::Device(image), Presentation::Actual)
    }

    /// Shows a device-independent surface.
    pub fn surface(surface: Surface, presentation: Presentation) -> Self {
        Self::with_content(Content::Dib(surface), presentation)
    }

    fn with_content(content: Content, presentation: Presentation) -> Self {
        Self {
            content,
            texture: SurfaceTexture::default(),
            presentation,
            renderer: None,
            allow_save: false,
            status: None,
        }
    }

    /// Adds a "Save Bitmap" toolbar action for surface content.
    pub fn with_save(mut self) -> Self {
        self.allow_save = true;
        self
    }

    /// Runs `renderer` on every frame and keeps repainting.
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// One idle step: let the renderer touch the surface. Returns whether
    /// the surface changed.
    pub fn idle(&mut self) -> bool {
        let (Some(renderer), Some(surface)) = (self.renderer.as_mut(), self.content.surface_mut())
        else {
            return false;
        };

        match renderer.render(surface) {
            Ok(()) => {
                self.texture.invalidate();
                true
            }
            Err(e) => {
                error!("Render step failed: {}", e);
                false
            }
        }
    }

    fn save(&mut self) {
        let Some(surface) = self.content.surface() else {
            return;
        };

        self.status = match filemanager::save_bitmap(surface) {
            Ok(path) => Some(format!("Saved to {}", path.display())),
            Err(ViewerError::DialogCanceled) => None,
            Err(e) => {
                error!("Saving bitmap failed: {}", e);
                Some(format!("Save failed: {}", e))
            }
        };
    }

    fn draw_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("💾 Save Bitmap").clicked() {
                    self.save();
                }

                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });
    }

    fn draw_central_panel(&mut self, ctx: &egui::Context) {
        // The blit covers the panel, so skip the background fill.
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let client = ui.max_rect();
                let destination = destination_rect(
                    client,
                    self.content.dimensions(),
                    self.presentation == Presentation::Stretched,
                    ctx.pixels_per_point(),
                );

                let texture = self.texture.texture(ctx, &self.content);
                blit(ui.painter(), texture, destination);
            });
    }
}

impl eframe::App for BitmapViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if self.idle() {
            ctx.request_repaint();
        }

        if self.allow_save {
            self.draw_toolbar(ctx);
        }
        self.draw_central_panel(ctx);
    }
}

/// Opens the window and runs the event loop until it is closed.
pub fn run(title: &str, app: BitmapViewer) -> Result<(), ViewerError> {
    let (width, height) = app.content().dimensions();
    info!("Opening {} ({}x{})", title, width, height);

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(title, native_options, Box::new(|_cc| Ok(Box::new(app))))?;

    info!("{} closed", title);
    Ok(())
}
