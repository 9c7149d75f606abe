use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt,
    path::Path,
};

use common::{read_json, write_json, Error, Persist, Result, TextDatapoint};
use crossbeam::channel::{Receiver, Sender};
use serde::{Deserialize, Serialize};

use crate::tokenize;

/// Occurrences of one dictionary word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Word {
    /// occurrences per class
    count: Vec<u64>,
    /// occurrences over all classes
    seen: u64,
}

/// Everything the classifier has learned, this is what gets persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Counts {
    words: BTreeMap<String, Word>,
    /// documents per class
    documents: Vec<u64>,
    /// words per class
    totals: Vec<u64>,
    dict_size: u64,
    seen: u64,
}

impl Counts {
    fn new(classes: usize) -> Self {
        Self {
            words: BTreeMap::new(),
            documents: vec![0; classes],
            totals: vec![0; classes],
            dict_size: 0,
            seen: 0,
        }
    }

    fn check(&self) -> Result<()> {
        let classes = self.documents.len();
        if classes == 0 || classes > u8::MAX as usize + 1 {
            return Err(Error::DataShape(format!("invalid number of classes {}", classes)));
        }
        if self.totals.len() != classes {
            return Err(Error::DataShape(format!(
                "word totals cover {} classes, expected {}",
                self.totals.len(),
                classes
            )));
        }
        if let Some((w, _)) = self.words.iter().find(|(_, word)| word.count.len() != classes) {
            return Err(Error::DataShape(format!(
                "counts of word '{}' do not cover {} classes",
                w, classes
            )));
        }
        if self.dict_size != self.words.len() as u64 {
            return Err(Error::DataShape(format!(
                "dictionary size {} does not match {} stored words",
                self.dict_size,
                self.words.len()
            )));
        }
        if self.seen != self.documents.iter().sum::<u64>() {
            return Err(Error::DataShape("document counts do not add up".to_string()));
        }

        Ok(())
    }
}

/// Multinomial Naive Bayes text classifier
///
/// h(x) = argmax_c { log P(y = c) + Σ log P(w | y = c) } over the words w of
/// a document, where both distributions are estimated with add-one
/// smoothing. Words the model has never seen do not take part in a
/// prediction.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    counts: Counts,
    sanitize: fn(char) -> bool,
}

impl NaiveBayes {
    /// Create an empty classifier over `classes` classes.
    /// Characters for which `sanitize` returns true are stripped from words.
    pub fn new(classes: u8, sanitize: fn(char) -> bool) -> Result<Self> {
        if classes == 0 {
            return Err(Error::Configuration(
                "a classifier needs at least one class".to_string(),
            ));
        }

        Ok(Self {
            counts: Counts::new(classes as usize),
            sanitize,
        })
    }

    /// Number of classes
    #[inline(always)]
    pub fn classes(&self) -> usize {
        self.counts.documents.len()
    }

    /// Number of distinct words seen while learning
    #[inline(always)]
    pub fn dict_size(&self) -> u64 {
        self.counts.dict_size
    }

    /// Number of documents learned from
    #[inline(always)]
    pub fn documents(&self) -> u64 {
        self.counts.seen
    }

    /// Replace the sanitizer used for new documents
    pub fn set_sanitize(&mut self, sanitize: fn(char) -> bool) {
        self.sanitize = sanitize;
    }

    /// Learn from a single document
    pub fn learn_one(&mut self, dp: &TextDatapoint) -> Result<()> {
        self.check_class(dp.y)?;
        let class = dp.y as usize;
        let classes = self.classes();
        let counts = &mut self.counts;

        counts.documents[class] += 1;
        counts.seen += 1;
        for token in tokenize(&dp.x, self.sanitize) {
            let word = match counts.words.entry(token) {
                Entry::Occupied(e) => e.into_mut(),
                Entry::Vacant(e) => {
                    counts.dict_size += 1;
                    e.insert(Word {
                        count: vec![0; classes],
                        seen: 0,
                    })
                }
            };
            word.count[class] += 1;
            word.seen += 1;
            counts.totals[class] += 1;
        }

        Ok(())
    }

    /// Learn from a dataset. Every label is checked before the first
    /// document is counted.
    pub fn learn(&mut self, data: &[TextDatapoint]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyDataset);
        }
        for dp in data.iter() {
            self.check_class(dp.y)?;
        }
        for dp in data.iter() {
            self.learn_one(dp)?;
        }
        info!("learned from {} documents, {}", data.len(), self);

        Ok(())
    }

    /// Learn from every document received on `stream` until it is closed.
    ///
    /// Documents with an out of range class are reported on `errors` and
    /// skipped. `errors` is dropped on return, which closes the channel.
    /// This blocks, so run it on its own thread.
    pub fn online_learn(&mut self, errors: Sender<Error>, stream: Receiver<TextDatapoint>) {
        info!("naive bayes online learning started with {} classes", self.classes());
        let mut learned: usize = 0;
        let mut rejected: usize = 0;
        for dp in stream.iter() {
            match self.learn_one(&dp) {
                Ok(()) => learned += 1,
                Err(e) => {
                    rejected += 1;
                    warn!("rejected document: {}", e);
                    if errors.send(e).is_err() {
                        warn!("error channel closed, dropping error");
                    }
                }
            }
        }
        info!(
            "naive bayes online learning stopped after {} documents, {} rejected",
            learned, rejected
        );
    }

    /// The most likely class of `text`
    pub fn predict(&self, text: &str) -> u8 {
        self.probability(text).0
    }

    /// The most likely class of `text` together with its posterior
    /// probability. Ties go to the lower class index.
    pub fn probability(&self, text: &str) -> (u8, f64) {
        let scores = self.log_scores(text);
        let (best, max) = scores
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |(best, max), (c, s)| {
                if *s > max {
                    (c, *s)
                } else {
                    (best, max)
                }
            });
        let norm: f64 = scores.iter().map(|s| (s - max).exp()).sum();

        (best as u8, 1.0 / norm)
    }

    /// log P(y = c) + Σ log P(w | y = c) for every class c
    fn log_scores(&self, text: &str) -> Vec<f64> {
        let counts = &self.counts;
        let classes = self.classes() as f64;
        let dict = counts.dict_size as f64;
        let mut scores: Vec<f64> = counts
            .documents
            .iter()
            .map(|d| ((*d as f64 + 1.0) / (counts.seen as f64 + classes)).ln())
            .collect();

        for token in tokenize(text, self.sanitize) {
            let word = match counts.words.get(&token) {
                Some(w) => w,
                None => continue,
            };
            for (c, score) in scores.iter_mut().enumerate() {
                *score += ((word.count[c] as f64 + 1.0) / (counts.totals[c] as f64 + dict)).ln();
            }
        }
        trace!("log scores of '{}': {:?}", text, scores);

        scores
    }

    fn check_class(&self, y: u8) -> Result<()> {
        if y as usize >= self.classes() {
            return Err(Error::DataShape(format!(
                "class {} out of range for a classifier with {} classes",
                y,
                self.classes()
            )));
        }

        Ok(())
    }
}

impl Persist for NaiveBayes {
    fn persist_to_file(&self, path: &Path) -> Result<()> {
        write_json(path, &self.counts)?;
        info!("persisted naive bayes model to {}", path.display());

        Ok(())
    }

    /// Restores the learned counts, the sanitizer stays as it is
    fn restore_from_file(&mut self, path: &Path) -> Result<()> {
        let counts: Counts = read_json(path)?;
        counts.check()?;
        self.counts = counts;
        info!("restored naive bayes model from {}", path.display());

        Ok(())
    }
}

impl fmt::Display for NaiveBayes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "h(θ) = argmax_c{{log(P(y = c)) + Σlog(P(x|y = c))}}, classes: {}, words: {}",
            self.classes(),
            self.counts.dict_size
        )
    }
}
