use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use common::{Datapoint, Error, Result};
use crossbeam::channel::{Receiver, SendError, Sender};
use nalgebra::DVector;

use crate::{SharedParameters, UpdateRule, OUTPUT_DIM};

/// Trains a shared parameter vector from a live stream of datapoints.
///
/// Every valid datapoint is applied with the update rule and committed
/// right away, so concurrent predictions observe the model improving.
/// Malformed datapoints are reported on the error channel and skipped.
/// Closing the stream finishes learning, which closes the error channel.
pub struct OnlineLearner<U> {
    rule: U,
    features: usize,
    parameters: Arc<SharedParameters>,
}

impl<U> OnlineLearner<U>
where
    U: UpdateRule + Send + 'static,
{
    /// Create a new online learner
    ///
    /// # Arguments:
    /// rule: The update rule applied to each datapoint
    /// features: Declared feature count every datapoint must match
    /// parameters: The parameter vector to train
    pub fn new(rule: U, features: usize, parameters: Arc<SharedParameters>) -> Self {
        Self {
            rule,
            features,
            parameters,
        }
    }

    /// Run the learner on its own thread
    ///
    /// The returned handle finishes once the stream is closed and drained.
    pub fn spawn<F>(
        self,
        errors: Sender<Error>,
        stream: Option<Receiver<Datapoint>>,
        on_update: F,
    ) -> Result<JoinHandle<()>>
    where
        F: FnMut(&DVector<f64>) + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name("online-learner".to_string())
            .spawn(move || self.run(errors, stream, on_update))?;

        Ok(handle)
    }

    /// Consume the stream on the calling thread
    ///
    /// Errors are sent on `errors`, which may be a rendezvous channel: the
    /// learner then waits until the caller receives each error.
    /// `on_update` is called with θ after every committed update.
    pub fn run<F>(
        self,
        errors: Sender<Error>,
        stream: Option<Receiver<Datapoint>>,
        mut on_update: F,
    ) where
        F: FnMut(&DVector<f64>),
    {
        let stream = match stream {
            Some(stream) => stream,
            None => {
                report(
                    &errors,
                    Error::Configuration("online learning needs a data stream".to_string()),
                );
                return;
            }
        };
        let writer = match self.parameters.acquire_writer() {
            Ok(writer) => writer,
            Err(e) => {
                report(&errors, e);
                return;
            }
        };

        let mut theta = writer.snapshot();
        let mut updates: usize = 0;
        let mut rejected: usize = 0;
        info!("online learning started with {} features", self.features);

        for dp in stream.iter() {
            if let Err(e) = self.validate(&dp) {
                rejected += 1;
                warn!("rejecting datapoint: {}", e);
                report(&errors, e);
                continue;
            }

            let mut next: DVector<f64> = (*theta).clone();
            if let Err(e) = self.rule.step(&mut next, std::slice::from_ref(&dp)) {
                rejected += 1;
                report(&errors, e);
                continue;
            }
            theta = match writer.publish(next) {
                Ok(committed) => committed,
                Err(e) => {
                    report(&errors, e);
                    continue;
                }
            };
            updates += 1;

            on_update(&*theta);
        }

        info!(
            "online learning finished after {} updates, {} datapoints rejected",
            updates, rejected
        );
    }

    fn validate(&self, dp: &Datapoint) -> Result<()> {
        if dp.x.dim() != self.features {
            return Err(Error::DataShape(format!(
                "features have dimension {}, expected {}",
                dp.x.dim(),
                self.features
            )));
        }
        if dp.y.len() != OUTPUT_DIM {
            return Err(Error::DataShape(format!(
                "label has length {}, expected {}",
                dp.y.len(),
                OUTPUT_DIM
            )));
        }

        Ok(())
    }
}

fn report(errors: &Sender<Error>, err: Error) {
    if let Err(SendError(err)) = errors.send(err) {
        warn!("error channel is closed, dropping error: {}", err);
    }
}
