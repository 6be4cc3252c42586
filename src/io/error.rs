//! Error types for model fitting, generation and file operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all synthesis operations
#[derive(Debug)]
pub enum SynthesisError {
    /// Failed to load source image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save generated image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to serialize a model
    ModelEncode {
        /// Destination of the model blob
        path: PathBuf,
        /// Underlying encoding error
        source: bincode::Error,
    },

    /// Failed to deserialize a model
    ModelDecode {
        /// Origin of the model blob
        path: PathBuf,
        /// Underlying decoding error
        source: bincode::Error,
    },

    /// Source raster doesn't meet fitting requirements
    InvalidSourceData {
        /// Description of what's wrong with the source data
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Context vector length differs from the index dimensionality
    DimensionMismatch {
        /// Dimensionality the index was built with
        expected: usize,
        /// Length of the offending vector
        actual: usize,
    },

    /// A context index node already exists at this exact key
    OccupiedKey {
        /// The duplicate key
        key: Vec<f64>,
    },

    /// Vertex handle does not belong to the graph
    MissingVertex {
        /// Raw vertex handle
        vertex: usize,
    },

    /// Edge would connect a vertex to itself
    SelfLoop {
        /// Raw vertex handle
        vertex: usize,
    },

    /// Raster coordinate outside the raster
    PositionOutOfBounds {
        /// Requested (x, y)
        position: (usize, usize),
        /// Raster (width, height)
        dimensions: (usize, usize),
    },
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::ModelEncode { path, source } => {
                write!(f, "Failed to write model '{}': {source}", path.display())
            }
            Self::ModelDecode { path, source } => {
                write!(f, "Failed to read model '{}': {source}", path.display())
            }
            Self::InvalidSourceData { reason } => {
                write!(f, "Invalid source data: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Context vector has {actual} components, index expects {expected}"
                )
            }
            Self::OccupiedKey { key } => {
                write!(f, "Context {key:?} is already present in the index")
            }
            Self::MissingVertex { vertex } => {
                write!(f, "Vertex {vertex} is not part of the graph")
            }
            Self::SelfLoop { vertex } => {
                write!(f, "Refusing to draw an edge from vertex {vertex} to itself")
            }
            Self::PositionOutOfBounds {
                position,
                dimensions,
            } => {
                write!(
                    f,
                    "Position ({}, {}) is outside the {}x{} raster",
                    position.0, position.1, dimensions.0, dimensions.1
                )
            }
        }
    }
}

impl std::error::Error for SynthesisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            Self::ModelEncode { source, .. } | Self::ModelDecode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for synthesis results
pub type Result<T> = std::result::Result<T, SynthesisError>;

impl From<image::ImageError> for SynthesisError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for SynthesisError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<bincode::Error> for SynthesisError {
    fn from(err: bincode::Error) -> Self {
        Self::ModelDecode {
            path: PathBuf::from("<stream>"),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> SynthesisError {
    SynthesisError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
