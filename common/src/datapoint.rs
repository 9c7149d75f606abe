use crate::SparseVector;

/// A labeled example for the regression models.
///
/// `y` holds the expected outputs and must match the model's output
/// dimensionality, which is 1 for least squares.
#[derive(Debug, Clone, PartialEq)]
pub struct Datapoint {
    /// The features
    pub x: SparseVector,
    /// The expected outputs
    pub y: Vec<f64>,
}

impl Datapoint {
    /// Create a datapoint from sparse features
    pub fn new(x: SparseVector, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    /// Create a datapoint from dense features, dropping zero entries
    pub fn dense(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x: SparseVector::from(x),
            y,
        }
    }
}

/// A labeled document for the text classifiers.
/// `y` is the class index in `0..classes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDatapoint {
    /// The raw document
    pub x: String,
    /// The class of the document
    pub y: u8,
}

impl TextDatapoint {
    /// Create a new text datapoint
    pub fn new(x: impl Into<String>, y: u8) -> Self {
        Self { x: x.into(), y }
    }
}
