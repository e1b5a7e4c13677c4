use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("no container exists for view `{0}`")]
    MissingContainer(&'static str),

    #[error("view `{0}` is already initialized")]
    AlreadyInitialized(&'static str),

    #[error("view `{0}` is not initialized")]
    NotInitialized(&'static str),

    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("failed to read data file `{path}`: {source}")]
    DataFile {
        path: String,
        source: std::io::Error,
    },
}
