use thiserror::Error;

/// Everything that can go wrong while configuring, training, querying or
/// persisting a model.
///
/// All variants are `Send`, so they can be reported over the error channel of
/// an online learner.
#[derive(Debug, Error)]
pub enum Error {
    /// The model was configured or invoked in a way it cannot work with,
    /// e.g. an unknown optimization method or a missing data stream
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Batch training was requested without any examples
    #[error("cannot learn from an empty dataset")]
    EmptyDataset,

    /// A label vector of the batch dataset has the wrong length
    #[error("label of example {index} has length {actual}, expected {expected}")]
    LabelDimension {
        /// Position of the offending example in the dataset
        index: usize,
        /// Output dimensionality of the model
        expected: usize,
        /// Length of the label that was found
        actual: usize,
    },

    /// A datapoint does not fit the model's declared dimensions
    #[error("malformed datapoint: {0}")]
    DataShape(String),

    /// A feature vector given for prediction has the wrong dimension
    #[error("dimension mismatch: expected {expected} features, got {actual}")]
    Dimension {
        /// Declared feature count of the model
        expected: usize,
        /// Dimension of the given vector
        actual: usize,
    },

    /// A persistence operation was called without a path
    #[error("no file path given, refusing to persist or restore the model")]
    EmptyPath,

    /// Reading or writing a model file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A model file could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result alias used throughout the workspace
pub type Result<T> = std::result::Result<T, Error>;
