use serde::{Deserialize, Serialize};

use crate::error::{RagError, ServiceError};

/// A fixed-length embedding vector.
///
/// Never empty and never holds NaN or infinite components; those are
/// rejected at construction. Dimensionality is checked again whenever two
/// embeddings are compared.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Result<Self, ServiceError> {
        if values.is_empty() {
            return Err(ServiceError::InvalidResponse {
                message: "embedding has no components".to_string(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(ServiceError::InvalidResponse {
                message: format!("embedding component {index} is not finite"),
            });
        }
        Ok(Self(values))
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Euclidean norm, computed in `f64` so squares of large components
    /// stay finite.
    pub fn norm(&self) -> f64 {
        self.0
            .iter()
            .map(|&x| f64::from(x) * f64::from(x))
            .sum::<f64>()
            .sqrt()
    }

    /// Fail with `DimensionMismatch` unless `other` has `self`'s length.
    pub fn ensure_same_dimensions(&self, other: &Embedding) -> Result<(), RagError> {
        if self.dimensions() == other.dimensions() {
            Ok(())
        } else {
            Err(RagError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            })
        }
    }
}

impl<'de> Deserialize<'de> for Embedding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<f32>::deserialize(deserializer)?;
        Embedding::new(values).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Vec<f32>> for Embedding {
    type Error = ServiceError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        Embedding::new(values)
    }
}
