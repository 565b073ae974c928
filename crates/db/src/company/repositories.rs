use async_trait::async_trait;
use uuid::Uuid;

use crate::company::models::{Company, CompanyCard, CompanyFilter, CompanyStatus, IngestCommit, NewCompany};
use vitrine_common::error::VitrineResult;

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Accepted companies only, ordered alphabetically by name. Backs the
    /// public directory page.
    async fn list_accepted(&self) -> VitrineResult<Vec<CompanyCard>>;

    /// Admin listing across all lifecycle states.
    async fn list(&self, filter: CompanyFilter) -> VitrineResult<Vec<Company>>;

    async fn get_by_id(&self, id: Uuid) -> VitrineResult<Option<Company>>;

    /// Administrator lifecycle transition. Errors with NotFound when the
    /// id does not exist.
    async fn set_status(&self, id: Uuid, status: CompanyStatus) -> VitrineResult<Company>;

    /// Insert a batch of pending submissions and advance the "since"
    /// watermark in a single transaction.
    ///
    /// The watermark write is guarded by `expected_since` (the value the
    /// sync read before fetching); when the guard misses the update is
    /// applied unconditionally and the commit reports `raced = true`.
    async fn insert_pending_batch(
        &self,
        companies: Vec<NewCompany>,
        expected_since: &str,
        new_since: &str,
    ) -> VitrineResult<IngestCommit>;
}
