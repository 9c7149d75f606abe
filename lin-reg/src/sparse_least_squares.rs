use std::{fmt, path::Path, sync::Arc, thread::JoinHandle};

use common::{read_json, write_json, Datapoint, Error, Persist, Result, SparseVector};
use crossbeam::channel::{Receiver, Sender};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::{
    cost, hypothesis, hypothesis_dense, OnlineLearner, OptimizationMethod, Params,
    SharedParameters, UpdateRule, OUTPUT_DIM,
};

/// Linear least squares over sparse features, h(θ, x) = θ0 + Σ θ(i+1) * x(i)
///
/// The parameter vector is shared, so [`predict`](Self::predict) can be
/// called from any thread while [`online_learn`](Self::online_learn) keeps
/// training it in the background.
#[derive(Debug)]
pub struct SparseLeastSquares {
    params: Params,
    data: Vec<Datapoint>,
    parameters: Arc<SharedParameters>,
}

#[derive(Serialize, Deserialize)]
struct SavedModel {
    params: Params,
    parameters: Vec<f64>,
}

impl SparseLeastSquares {
    /// Create an untrained model, θ = 0, without a dataset
    pub fn new(params: Params) -> Result<Self> {
        params.validate()?;
        let parameters = Arc::new(SharedParameters::zeros(params.features));

        Ok(Self {
            params,
            data: Vec::new(),
            parameters,
        })
    }

    /// Create an untrained model with a dataset for batch training
    pub fn with_data(params: Params, data: Vec<Datapoint>) -> Result<Self> {
        let mut model = Self::new(params)?;
        model.data = data;

        Ok(model)
    }

    /// Replace the batch training dataset
    pub fn set_data(&mut self, data: Vec<Datapoint>) {
        self.data = data;
    }

    /// The stored batch training dataset
    #[inline(always)]
    pub fn data(&self) -> &[Datapoint] {
        &self.data
    }

    /// The hyperparameters
    #[inline(always)]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Snapshot of the current parameter vector, bias first
    #[inline(always)]
    pub fn parameters(&self) -> Arc<DVector<f64>> {
        self.parameters.snapshot()
    }

    /// Overwrite θ, e.g. to reset the model.
    /// Fails while an online learner is training the model.
    pub fn set_parameters(&self, theta: Vec<f64>) -> Result<()> {
        let writer = self.parameters.acquire_writer()?;
        writer.publish(DVector::from_vec(theta))?;

        Ok(())
    }

    /// Train on the stored dataset.
    ///
    /// The whole dataset is validated before the first step, so a failed
    /// call leaves θ untouched.
    pub fn learn(&mut self) -> Result<()> {
        self.validate_data()?;
        let writer = self.parameters.acquire_writer()?;
        let mut theta: DVector<f64> = (*writer.snapshot()).clone();

        info!(
            "learning with {} gradient descent over {} examples for {} iterations",
            self.params.method,
            self.data.len(),
            self.params.max_iterations
        );
        match self.params.method {
            OptimizationMethod::Batch => self.descend(&self.params.batch_rule(), &mut theta)?,
            OptimizationMethod::Stochastic => {
                self.descend(&self.params.stochastic_rule(), &mut theta)?
            }
        }
        writer.publish(theta)?;
        info!("learning done, {}", self);

        Ok(())
    }

    fn descend<U: UpdateRule>(&self, rule: &U, theta: &mut DVector<f64>) -> Result<()> {
        let report_every = (self.params.max_iterations / 10).max(1);
        let regularizer = self.params.regularizer();
        for iter in 0..self.params.max_iterations {
            rule.step(theta, &self.data)?;

            if iter % report_every == 0 && log_enabled!(log::Level::Debug) {
                debug!("iteration {}: cost {}", iter, cost(theta, &self.data, &regularizer)?);
            }
        }

        Ok(())
    }

    fn validate_data(&self) -> Result<()> {
        if self.data.is_empty() {
            return Err(Error::EmptyDataset);
        }
        for (index, dp) in self.data.iter().enumerate() {
            if dp.y.len() != OUTPUT_DIM {
                return Err(Error::LabelDimension {
                    index,
                    expected: OUTPUT_DIM,
                    actual: dp.y.len(),
                });
            }
            if dp.x.dim() != self.params.features {
                return Err(Error::DataShape(format!(
                    "features of example {} have dimension {}, expected {}",
                    index,
                    dp.x.dim(),
                    self.params.features
                )));
            }
        }

        Ok(())
    }

    /// Train from a stream of datapoints on a background thread.
    ///
    /// Every valid datapoint is applied with one stochastic gradient step,
    /// regardless of the configured method, and `on_update` is called with
    /// the new θ. Malformed datapoints are reported on `errors` and skipped.
    /// Once `stream` is closed and drained the learner stops and drops
    /// `errors`, closing the channel. Without a stream a single
    /// configuration error is reported.
    ///
    /// The caller must keep receiving from `errors`, a rendezvous channel
    /// stalls the learner until each error is taken.
    pub fn online_learn<F>(
        &self,
        errors: Sender<Error>,
        stream: Option<Receiver<Datapoint>>,
        on_update: F,
    ) -> Result<JoinHandle<()>>
    where
        F: FnMut(&DVector<f64>) + Send + 'static,
    {
        OnlineLearner::new(
            self.params.stochastic_rule(),
            self.params.features,
            Arc::clone(&self.parameters),
        )
        .spawn(errors, stream, on_update)
    }

    /// Predict the output for dense features, the result has length 1
    pub fn predict(&self, x: &[f64]) -> Result<Vec<f64>> {
        let theta = self.parameters.snapshot();

        Ok(vec![hypothesis_dense(&theta, x)?])
    }

    /// Predict the output for sparse features, the result has length 1
    pub fn predict_sparse(&self, x: &SparseVector) -> Result<Vec<f64>> {
        let theta = self.parameters.snapshot();

        Ok(vec![hypothesis(&theta, x)?])
    }

    /// Regularized cost of the stored dataset under the current θ
    pub fn cost(&self) -> Result<f64> {
        cost(&self.parameters.snapshot(), &self.data, &self.params.regularizer())
    }
}

impl Persist for SparseLeastSquares {
    fn persist_to_file(&self, path: &Path) -> Result<()> {
        let saved = SavedModel {
            params: self.params.clone(),
            parameters: self.parameters.snapshot().as_slice().to_vec(),
        };
        write_json(path, &saved)?;
        info!("persisted model to {}", path.display());

        Ok(())
    }

    fn restore_from_file(&mut self, path: &Path) -> Result<()> {
        let saved: SavedModel = read_json(path)?;
        saved.params.validate()?;
        let expected = saved.params.features.checked_add(1);
        if expected != Some(saved.parameters.len()) {
            return Err(Error::DataShape(format!(
                "stored parameter vector has length {}, expected {} features plus the bias",
                saved.parameters.len(),
                saved.params.features
            )));
        }

        let writer = self.parameters.acquire_writer()?;
        let theta = DVector::from_vec(saved.parameters);
        if theta.len() == self.parameters.len() {
            writer.publish(theta)?;
        } else {
            self.parameters = Arc::new(SharedParameters::new(theta));
        }
        drop(writer);
        self.params = saved.params;
        info!("restored model from {}", path.display());

        Ok(())
    }
}

impl fmt::Display for SparseLeastSquares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let theta = self.parameters.snapshot();
        write!(f, "h(θ,x) = {:.5}", theta[0])?;
        for (i, t) in theta.iter().skip(1).enumerate() {
            write!(f, " + {:.5}*x[{}]", t, i)?;
        }

        Ok(())
    }
}
