use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to read font {path}")]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not a usable font")]
    InvalidFont { path: PathBuf },
    #[error("failed to decode image {path}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{0:?} is not under the render root")]
    AssetUrl(String),
    #[error("image has no pixels")]
    EmptyImage,
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },
    #[error("frame buffer holds {actual} bytes, canvas needs {expected}")]
    FrameSize { expected: usize, actual: usize },
}
