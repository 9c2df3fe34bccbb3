use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render spec: {0}")]
    InvalidSpec(String),
    #[error("unreadable image: {0}")]
    UnreadableImage(#[source] image::ImageError),
    #[error("{0} does not implement a transform")]
    NotImplemented(&'static str),
    #[error("encoding {format} failed: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
