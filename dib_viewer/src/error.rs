use lib_dib::image::encoder::EncodeError;
use lib_dib::resource::ResourceError;
use lib_dib::surface::SurfaceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("File dialog was canceled")]
    DialogCanceled,

    /// `source` is `None` when the resource is empty.
    #[error("Bitmap resource `{name}` could not be loaded")]
    ResourceLoadFailure {
        name: &'static str,
        #[source]
        source: Option<image::ImageError>,
    },

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Export error: {0}")]
    Export(#[from] EncodeError),

    #[error("Window error: {0}")]
    Window(#[from] eframe::Error),
}
