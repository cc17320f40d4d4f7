// file: src/pipeline/ranker.rs
// description: orders candidates by cosine similarity to the query
// reference: embedding ranking stage

use crate::embedding::{TextEncoder, cosine_similarity};
use crate::error::{PipelineError, Result};
use crate::models::CandidateRecord;
use std::cmp::Ordering;
use tracing::debug;

/// Scores every record against `query_text` and sorts by score, highest first.
///
/// The query and all documents go to the encoder in one batch. The sort is
/// stable, so equal scores keep their feed order. On error the records are
/// left untouched.
pub async fn rank_records(
    encoder: &dyn TextEncoder,
    query_text: &str,
    records: &mut [CandidateRecord],
) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }

    let mut texts = Vec::with_capacity(records.len() + 1);
    texts.push(query_text.to_string());
    texts.extend(records.iter().map(CandidateRecord::document_text));

    let vectors = encoder.embed_batch(&texts).await?;
    if vectors.len() != texts.len() {
        return Err(PipelineError::Embedding(format!(
            "encoder returned {} vectors for {} inputs",
            vectors.len(),
            texts.len()
        )));
    }

    let (query_vector, document_vectors) = vectors
        .split_first()
        .ok_or_else(|| PipelineError::Embedding("no query vector".to_string()))?;

    let scores = document_vectors
        .iter()
        .map(|doc| cosine_similarity(query_vector, doc))
        .collect::<Result<Vec<f32>>>()?;

    for (record, score) in records.iter_mut().zip(scores) {
        record.score = Some(score);
    }

    records.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
    });

    debug!(
        "Ranked {} records with {} (top score {:?})",
        records.len(),
        encoder.model_name(),
        records.first().and_then(|r| r.score)
    );

    Ok(())
}

/// Marks every record as not ranked.
pub fn clear_scores(records: &mut [CandidateRecord]) {
    for record in records.iter_mut() {
        record.score = None;
    }
}
