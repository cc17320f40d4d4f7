// file: src/embedding/mod.rs
// description: text encoder abstraction and vector similarity
// reference: sentence-embedding ranking of fetched papers

pub mod local;
pub mod remote;

use crate::error::{PipelineError, Result};
use async_trait::async_trait;

pub use local::LocalEncoder;
pub use remote::ApiEncoder;

/// Produces fixed-length vectors in a single vector space.
///
/// Ranking relies on the query and every document being embedded by the same
/// instance, so callers pass them together in one `embed_batch` call.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// One vector per input, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn model_name(&self) -> &str;
}

/// Cosine of the angle between `a` and `b`, in [-1, 1]. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(PipelineError::Embedding(format!(
            "dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}
