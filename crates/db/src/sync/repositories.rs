use async_trait::async_trait;

use crate::sync::models::Watermark;
use vitrine_common::error::VitrineResult;

#[async_trait]
pub trait WatermarkRepository: Send + Sync {
    /// Fetch the "since" watermark, inserting a row with the given default
    /// value when none exists yet. Keeps the single-row invariant via the
    /// primary key on `pairs.key`.
    ///
    /// The advance itself happens inside the company batch commit so that
    /// insertions and the watermark update are one unit.
    async fn get_or_seed(&self, default_val: &str) -> VitrineResult<Watermark>;
}
