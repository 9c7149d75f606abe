use std::collections::BTreeMap;

use crate::{Error, Result};

/// A feature vector that only stores its non-zero entries.
///
/// Absent indices are implicitly 0.0. Every stored index is below `dim`,
/// the length the vector would have in dense form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    dim: usize,
    entries: BTreeMap<usize, f64>,
}

impl SparseVector {
    /// An all-zero vector of the given dimension
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            entries: BTreeMap::new(),
        }
    }

    /// Build a sparse vector from (index, value) pairs.
    /// Fails if any index is outside of `0..dim`.
    pub fn from_pairs<I>(dim: usize, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let mut v = Self::new(dim);
        for (index, value) in pairs {
            v.insert(index, value)?;
        }
        Ok(v)
    }

    /// Sets the value at `index`. Storing 0.0 removes the entry.
    pub fn insert(&mut self, index: usize, value: f64) -> Result<()> {
        if index >= self.dim {
            return Err(Error::Dimension {
                expected: self.dim,
                actual: index.saturating_add(1),
            });
        }
        if value == 0.0 {
            self.entries.remove(&index);
        } else {
            self.entries.insert(index, value);
        }
        Ok(())
    }

    /// The value at `index`, 0.0 if absent
    #[inline(always)]
    pub fn get(&self, index: usize) -> f64 {
        self.entries.get(&index).copied().unwrap_or(0.0)
    }

    /// Length of the vector in dense form
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of stored (non-zero) entries
    #[inline(always)]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Iterate the non-zero entries in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().map(|(i, v)| (*i, *v))
    }

    /// Expand into a dense vector of length `dim`
    pub fn to_dense(&self) -> Vec<f64> {
        let mut dense = vec![0.0; self.dim];
        for (i, v) in self.iter() {
            dense[i] = v;
        }
        dense
    }
}

impl From<&[f64]> for SparseVector {
    fn from(values: &[f64]) -> Self {
        let entries = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0.0)
            .map(|(i, v)| (i, *v))
            .collect();
        Self {
            dim: values.len(),
            entries,
        }
    }
}

impl From<Vec<f64>> for SparseVector {
    fn from(values: Vec<f64>) -> Self {
        Self::from(values.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_zeros_are_dropped() {
        let v = SparseVector::from(vec![0.0, 1.5, 0.0, -2.0]);
        assert_eq!(v.dim(), 4);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.get(0), 0.0);
        assert_eq!(v.get(1), 1.5);
        assert_eq!(v.get(3), -2.0);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(1, 1.5), (3, -2.0)]);
    }

    #[test]
    fn insert_out_of_range_fails() {
        let mut v = SparseVector::new(3);
        assert!(v.insert(2, 1.0).is_ok());
        assert!(matches!(
            v.insert(3, 1.0),
            Err(Error::Dimension {
                expected: 3,
                actual: 4
            })
        ));
        assert!(matches!(
            v.insert(usize::MAX, 1.0),
            Err(Error::Dimension {
                expected: 3,
                actual: usize::MAX
            })
        ));
        assert!(SparseVector::from_pairs(3, [(0, 1.0), (usize::MAX, 2.0)]).is_err());
        assert_eq!(v.nnz(), 1);
    }

    #[test]
    fn inserting_zero_removes() {
        let mut v = SparseVector::from_pairs(5, [(1, 2.0), (4, 3.0)]).unwrap();
        v.insert(1, 0.0).unwrap();
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.to_dense(), vec![0.0, 0.0, 0.0, 0.0, 3.0]);
    }

    #[test]
    fn from_pairs_rejects_bad_index() {
        assert!(SparseVector::from_pairs(2, [(0, 1.0), (7, 1.0)]).is_err());
    }
}
