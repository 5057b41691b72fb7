use log::{error, info};
use thiserror::Error;

use crate::image::decoder::{decode, DecodeError};
use crate::surface::Surface;

#[derive(Error, Debug)]
pub enum ResourceError {
    /// The resource is empty or does not decode. `source` is `None` for an
    /// empty resource.
    #[error("failed to load bitmap resource `{name}`")]
    LoadFailure {
        name: &'static str,
        #[source]
        source: Option<DecodeError>,
    },
}

/// A bitmap compiled into the executable.
#[derive(Debug, Clone, Copy)]
pub struct Resource {
    pub name: &'static str,
    pub bytes: &'static [u8],
}

impl Resource {
    pub const fn new(name: &'static str, bytes: &'static [u8]) -> Self {
        Self { name, bytes }
    }
}

/// Embeds a bitmap file at compile time, named after its path.
#[macro_export]
macro_rules! bitmap_resource {
    ($path:literal) => {
        $crate::resource::Resource::new($path, include_bytes!($path))
    };
}

/// Loads an embedded bitmap as a surface. The result is indistinguishable
/// from a surface created with [`crate::create_surface`].
pub fn load_surface_from_resource(resource: &Resource) -> Result<Surface, ResourceError> {
    if resource.bytes.is_empty() {
        error!("Bitmap resource {} is empty", resource.name);
        return Err(ResourceError::LoadFailure {
            name: resource.name,
            source: None,
        });
    }

    let surface = decode(resource.bytes).map_err(|source| {
        error!("Error loading bitmap resource {}: {}", resource.name, source);
        ResourceError::LoadFailure {
            name: resource.name,
            source: Some(source),
        }
    })?;

    info!(
        "Loaded resource {} ({}x{} at {} bpp)",
        resource.name,
        surface.width(),
        surface.height(),
        surface.descriptor().bits_per_pixel()
    );
    Ok(surface)
}
