// src/classifier/adapter.rs
//! Feature matrix to gesture label

use crate::config::constants::classifier::{CLASS_COUNT, LABELS};
use crate::error::{ClassifierStage, GestureErrorBuilder, GestureResult};
use ndarray::{Array2, ArrayView3, Axis};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

const COMPONENT: &str = "classifier";

/// Black-box model mapping a `1 x rows x width` batch to class probabilities
pub trait Classifier: Send {
    fn predict(&mut self, input: ArrayView3<'_, f32>) -> GestureResult<Vec<f32>>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&mut self, input: ArrayView3<'_, f32>) -> GestureResult<Vec<f32>> {
        (**self).predict(input)
    }
}

/// Classifier backed by a closure
pub struct FnClassifier<F> {
    f: F,
}

impl<F> FnClassifier<F>
where
    F: FnMut(ArrayView3<'_, f32>) -> GestureResult<Vec<f32>> + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Classifier for FnClassifier<F>
where
    F: FnMut(ArrayView3<'_, f32>) -> GestureResult<Vec<f32>> + Send,
{
    fn predict(&mut self, input: ArrayView3<'_, f32>) -> GestureResult<Vec<f32>> {
        (self.f)(input)
    }
}

/// Classification result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: &'static str,
    pub class_index: usize,
    pub probability: f32,
}

/// Index of the largest value; ties go to the lowest index
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Letter for a class index
pub fn label_for_index(index: usize) -> Option<&'static str> {
    LABELS.get(index).copied()
}

/// Adds the batch axis, runs the model and maps the winning class to a letter
pub struct ClassifierAdapter<C> {
    classifier: C,
}

impl<C: Classifier> ClassifierAdapter<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classify(&mut self, features: &Array2<f32>) -> GestureResult<Prediction> {
        let error = || GestureErrorBuilder::new(COMPONENT, "classify");
        let batch = features.view().insert_axis(Axis(0));
        let probabilities = self.classifier.predict(batch)?;

        if probabilities.len() != CLASS_COUNT {
            return Err(error().classifier(
                ClassifierStage::Invoke,
                &format!("expected {} probabilities, got {}", CLASS_COUNT, probabilities.len()),
            ));
        }
        if probabilities.iter().any(|p| p.is_nan()) {
            return Err(error().classifier(ClassifierStage::Invoke, "model returned NaN probabilities"));
        }

        let class_index = argmax(&probabilities)
            .ok_or_else(|| error().classifier(ClassifierStage::Invoke, "empty probability vector"))?;
        let label = label_for_index(class_index)
            .ok_or_else(|| error().classifier(ClassifierStage::Invoke, "class index out of range"))?;
        debug!(label, probability = probabilities[class_index], "gesture classified");

        Ok(Prediction {
            label,
            class_index,
            probability: probabilities[class_index],
        })
    }

    pub fn into_inner(self) -> C {
        self.classifier
    }
}

/// Adapter shared between the host and blocking classification jobs
#[derive(Clone)]
pub struct SharedClassifier {
    inner: Arc<Mutex<ClassifierAdapter<Box<dyn Classifier>>>>,
}

impl SharedClassifier {
    pub fn new<C: Classifier + 'static>(classifier: C) -> Self {
        let boxed: Box<dyn Classifier> = Box::new(classifier);
        Self {
            inner: Arc::new(Mutex::new(ClassifierAdapter::new(boxed))),
        }
    }

    pub fn classify_blocking(&self, features: &Array2<f32>) -> GestureResult<Prediction> {
        self.inner.lock().classify(features)
    }

    /// Classify on the blocking pool so the async loop keeps running
    pub async fn classify(&self, features: Array2<f32>) -> GestureResult<Prediction> {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.lock().classify(&features))
            .await
            .map_err(|e| {
                GestureErrorBuilder::new(COMPONENT, "classify").classifier(ClassifierStage::Invoke, &e.to_string())
            })?
    }
}
