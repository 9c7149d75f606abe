use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, PoisonError, RwLock,
};

use common::{Error, Result};
use nalgebra::DVector;

/// The parameter vector θ shared between one trainer and many predictors.
///
/// Readers take a snapshot, an `Arc` to an immutable vector. The trainer
/// builds the next vector on its side and swaps it in, so the lock is only
/// held for the pointer swap and readers never see a half written θ.
#[derive(Debug)]
pub struct SharedParameters {
    current: RwLock<Arc<DVector<f64>>>,
    len: usize,
    writer_active: AtomicBool,
}

impl SharedParameters {
    /// θ = 0 for a model with the given number of features.
    /// [`Params::validate`](crate::Params::validate) keeps `features` below `usize::MAX`.
    pub fn zeros(features: usize) -> Self {
        Self::new(DVector::zeros(features.saturating_add(1)))
    }

    /// Share an existing parameter vector
    pub fn new(theta: DVector<f64>) -> Self {
        Self {
            len: theta.len(),
            current: RwLock::new(Arc::new(theta)),
            writer_active: AtomicBool::new(false),
        }
    }

    /// The latest committed θ
    pub fn snapshot(&self) -> Arc<DVector<f64>> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Length of θ, fixed for the lifetime of the store
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether a trainer currently holds the writer role
    pub fn is_training(&self) -> bool {
        self.writer_active.load(Ordering::Acquire)
    }

    /// Claim the single writer role. Fails if a trainer already holds it.
    pub fn acquire_writer(self: &Arc<Self>) -> Result<ParameterWriter> {
        if self
            .writer_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::Configuration(
                "the parameters are already being trained".to_string(),
            ));
        }
        trace!("parameter writer acquired");

        Ok(ParameterWriter {
            store: Arc::clone(self),
        })
    }

    fn swap(&self, theta: DVector<f64>) -> Arc<DVector<f64>> {
        let next = Arc::new(theta);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let prev = std::mem::replace(&mut *guard, Arc::clone(&next));
        drop(guard);
        drop(prev);

        next
    }
}

/// Exclusive right to publish new parameters. Released on drop.
#[derive(Debug)]
pub struct ParameterWriter {
    store: Arc<SharedParameters>,
}

impl ParameterWriter {
    /// Commit `theta` as the new parameter vector and return the committed snapshot
    pub fn publish(&self, theta: DVector<f64>) -> Result<Arc<DVector<f64>>> {
        if theta.len() != self.store.len() {
            return Err(Error::DataShape(format!(
                "parameter vector has length {}, expected {}",
                theta.len(),
                self.store.len()
            )));
        }
        Ok(self.store.swap(theta))
    }

    /// The latest committed θ
    #[inline(always)]
    pub fn snapshot(&self) -> Arc<DVector<f64>> {
        self.store.snapshot()
    }
}

impl Drop for ParameterWriter {
    fn drop(&mut self) {
        self.store.writer_active.store(false, Ordering::Release);
        trace!("parameter writer released");
    }
}
