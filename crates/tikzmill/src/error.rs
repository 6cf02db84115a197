pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid size {value:?}: expected \"width,height\" with positive integers")]
    InvalidSize { value: String },

    #[error("unknown text encoding label: {label:?}")]
    UnknownEncoding { label: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("SVG parse error: {0}")]
    SvgParse(#[from] roxmltree::Error),

    #[error("expected exactly one <svg> element, found {found}")]
    SvgStructure { found: usize },

    #[error("SVG has neither an explicit size nor a usable viewBox")]
    SvgNoSize,

    #[error("toolchain config {path}: {message}")]
    ToolchainConfig { path: String, message: String },

    #[error("display sink rejected payload: {message}")]
    Sink { message: String },
}
