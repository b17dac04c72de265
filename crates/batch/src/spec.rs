//! Shape declarations for the exchange boundary.

use std::collections::BTreeMap;

use crate::{Batch, BatchError, Tensor};

/// Trailing (per-instance) shape of one named tensor. The batch dimension is
/// prepended when a spec is materialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TensorSpec {
    pub shape: Vec<usize>,
}

impl TensorSpec {
    #[must_use]
    pub fn new(shape: Vec<usize>) -> Self {
        Self { shape }
    }

    /// Full shape once batched over `batch` instances.
    #[must_use]
    pub fn batched(&self, batch: usize) -> Vec<usize> {
        let mut full = Vec::with_capacity(self.shape.len() + 1);
        full.push(batch);
        full.extend_from_slice(&self.shape);
        full
    }
}

/// A named collection of [`TensorSpec`]s, declared once at environment
/// construction and fixed afterwards.
#[derive(Clone, Debug, Default)]
pub struct CompositeSpec {
    entries: BTreeMap<String, TensorSpec>,
}

impl CompositeSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, spec: TensorSpec) -> Self {
        self.entries.insert(key.into(), spec);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, spec: TensorSpec) {
        self.entries.insert(key.into(), spec);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TensorSpec> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TensorSpec)> {
        self.entries.iter().map(|(k, s)| (k.as_str(), s))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Materializes a zeroed batch of every declared tensor.
    #[must_use]
    pub fn zero(&self, batch: usize) -> Batch {
        let mut out = Batch::new();
        for (key, spec) in &self.entries {
            out.insert(key.clone(), Tensor::zeros(spec.batched(batch)));
        }
        out
    }

    /// Checks that every declared entry is present in `batch` with the
    /// declared shape. Undeclared extra entries are ignored.
    ///
    /// # Errors
    /// Returns the first [`BatchError`] encountered.
    pub fn validate(&self, batch: &Batch, instances: usize) -> Result<(), BatchError> {
        for (key, spec) in &self.entries {
            let tensor = batch.get(key)?;
            let expected = spec.batched(instances);
            if tensor.shape != expected {
                return Err(BatchError::ShapeMismatch {
                    key: key.clone(),
                    expected,
                    got: tensor.shape.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CompositeSpec, TensorSpec};
    use crate::{BatchError, Tensor};

    #[test]
    fn zero_prepends_batch_dimension() {
        let spec = CompositeSpec::new()
            .with("obs_self", TensorSpec::new(vec![2, 1, 25]))
            .with("reward", TensorSpec::new(vec![2, 1]));
        let batch = spec.zero(16);
        assert_eq!(batch.get("obs_self").unwrap().shape, vec![16, 2, 1, 25]);
        assert_eq!(batch.get("reward").unwrap().shape, vec![16, 2, 1]);
    }

    #[test]
    fn validate_rejects_wrong_shape() {
        let spec = CompositeSpec::new().with("reward", TensorSpec::new(vec![2, 1]));
        let mut batch = spec.zero(4);
        batch.insert("reward", Tensor::zeros(vec![4, 3, 1]));
        assert!(matches!(
            spec.validate(&batch, 4),
            Err(BatchError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn validate_ignores_extra_entries() {
        let spec = CompositeSpec::new().with("done", TensorSpec::new(vec![1]));
        let mut batch = spec.zero(2);
        batch.insert("unrelated", Tensor::zeros(vec![7]));
        assert!(spec.validate(&batch, 2).is_ok());
    }
}
