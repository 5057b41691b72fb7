use std::path::PathBuf;

use eframe::egui::ColorImage;
use lib_dib::constants::{FILE_EXT, FORMAT_NAME};
use lib_dib::{export_surface_to_file, Resource, Surface};
use log::{error, info};

use crate::error::ViewerError;

/// Loads an embedded bitmap through the general-purpose image loader,
/// converting it straight to the display format.
pub fn load_device_bitmap(resource: &Resource) -> Result<ColorImage, ViewerError> {
    if resource.bytes.is_empty() {
        error!("Bitmap resource {} is empty", resource.name);
        return Err(ViewerError::ResourceLoadFailure {
            name: resource.name,
            source: None,
        });
    }

    let image = image::load_from_memory(resource.bytes)
        .map_err(|e| {
            error!("Error loading bitmap resource {}: {}", resource.name, e);
            ViewerError::ResourceLoadFailure {
                name: resource.name,
                source: Some(e),
            }
        })?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    info!("Loaded device bitmap {} ({}x{})", resource.name, size[0], size[1]);

    Ok(ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

pub fn pick_save_path() -> Result<PathBuf, ViewerError> {
    rfd::FileDialog::new()
        .add_filter(FORMAT_NAME, &[FILE_EXT])
        .set_file_name(format!("bitmap.{}", FILE_EXT))
        .save_file()
        .ok_or(ViewerError::DialogCanceled)
}

pub fn save_bitmap(surface: &Surface) -> Result<PathBuf, ViewerError> {
    let path = pick_save_path()?;
    export_surface_to_file(surface, &path)?;
    info!("File saved successfully to {}", path.display());
    Ok(path)
}
