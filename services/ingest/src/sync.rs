use chrono::{Duration, NaiveDateTime};

use vitrine_common::error::VitrineError;
use vitrine_db::company::models::NewCompany;
use vitrine_db::company::repositories::CompanyRepository;
use vitrine_db::sync::repositories::WatermarkRepository;

use crate::fields::{FieldMap, SubmissionField};
use crate::typeform::client::{TypeformClient, TypeformError};
use crate::typeform::models::FormResponse;

/// Watermark value used the very first time, before any sync has run.
pub const DEFAULT_SINCE: &str = "0";

/// Offset added to the last record's date when advancing the watermark,
/// guarding against clock skew re-fetching the same record.
const WATERMARK_SKEW_HOURS: i64 = 2;

const DATE_LAND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Client(#[from] TypeformError),

    #[error(transparent)]
    Store(#[from] VitrineError),

    #[error("unparseable submission date {value:?}: {source}")]
    BadDate {
        value: String,
        source: chrono::ParseError,
    },
}

impl From<SyncError> for VitrineError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Store(e) => e,
            other => VitrineError::Upstream(other.to_string()),
        }
    }
}

#[derive(Debug)]
pub struct SyncReport {
    /// Raw responses as fetched, exposed by the trigger endpoint as its
    /// diagnostic payload.
    pub fetched: Vec<FormResponse>,
    pub inserted: usize,
    pub new_since: Option<String>,
    pub raced: bool,
}

/// Pulls completed form responses newer than the persisted watermark,
/// maps them onto pending company submissions and commits them together
/// with the watermark advance.
pub struct DirectorySyncer<C, W> {
    client: TypeformClient,
    companies: C,
    watermarks: W,
}

impl<C, W> DirectorySyncer<C, W>
where
    C: CompanyRepository,
    W: WatermarkRepository,
{
    pub fn new(client: TypeformClient, companies: C, watermarks: W) -> Self {
        Self {
            client,
            companies,
            watermarks,
        }
    }

    pub async fn synchronize(&self) -> Result<SyncReport, SyncError> {
        let watermark = self.watermarks.get_or_seed(DEFAULT_SINCE).await?;
        let since = watermark.val;

        let payload = self.client.fetch_completed(&since).await?;
        tracing::info!(
            questions = payload.questions.len(),
            responses = payload.responses.len(),
            %since,
            "fetched form document"
        );

        if payload.responses.is_empty() {
            return Ok(SyncReport {
                fetched: Vec::new(),
                inserted: 0,
                new_since: None,
                raced: false,
            });
        }

        let fields = FieldMap::from_questions(&payload.questions);
        let missing = fields.missing();
        if !missing.is_empty() {
            tracing::warn!(?missing, "expected question labels absent from remote form");
        }

        let mut batch = Vec::with_capacity(payload.responses.len());
        let mut last_date: Option<NaiveDateTime> = None;

        for response in &payload.responses {
            let date = NaiveDateTime::parse_from_str(
                &response.metadata.date_land,
                DATE_LAND_FORMAT,
            )
            .map_err(|source| SyncError::BadDate {
                value: response.metadata.date_land.clone(),
                source,
            })?;
            last_date = Some(date);

            batch.push(NewCompany {
                name: fields.answer(SubmissionField::Name, response),
                url: fields.answer(SubmissionField::WebAddress, response),
                logo_submitted: fields.answer(SubmissionField::LogoUrl, response),
                contact_name: fields.answer(SubmissionField::ContactName, response),
                contact_email: fields.answer(SubmissionField::ContactEmail, response),
                twitter: fields.answer(SubmissionField::Twitter, response),
                founded_year: fields.answer(SubmissionField::FoundedYear, response),
                date_submitted: date.and_utc(),
            });
        }

        // The advance follows the LAST record in the batch, not the max
        // date across it. Out-of-order batches therefore move the
        // watermark backwards relative to earlier records.
        let last = last_date.ok_or_else(|| {
            SyncError::Store(VitrineError::Internal(
                "non-empty batch without a last date".to_string(),
            ))
        })?;
        let new_since = (last + Duration::hours(WATERMARK_SKEW_HOURS))
            .and_utc()
            .timestamp()
            .to_string();

        let commit = self
            .companies
            .insert_pending_batch(batch, &since, &new_since)
            .await?;

        tracing::info!(
            inserted = commit.inserted,
            raced = commit.raced,
            %new_since,
            "sync committed"
        );

        Ok(SyncReport {
            fetched: payload.responses,
            inserted: commit.inserted,
            new_since: Some(new_since),
            raced: commit.raced,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeform::client::TypeformConfig;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;
    use vitrine_common::error::VitrineResult;
    use vitrine_db::company::models::{
        Company, CompanyCard, CompanyFilter, CompanyStatus, IngestCommit,
    };
    use vitrine_db::sync::models::Watermark;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // ── Mock CompanyRepository ──────────────────────────────────

    type RecordedCommit = (Vec<NewCompany>, String, String);

    #[derive(Clone, Default)]
    struct MockCompanyRepo {
        commits: Arc<Mutex<Vec<RecordedCommit>>>,
    }

    #[async_trait]
    impl CompanyRepository for MockCompanyRepo {
        async fn list_accepted(&self) -> VitrineResult<Vec<CompanyCard>> {
            Ok(Vec::new())
        }

        async fn list(&self, _filter: CompanyFilter) -> VitrineResult<Vec<Company>> {
            Ok(Vec::new())
        }

        async fn get_by_id(&self, _id: Uuid) -> VitrineResult<Option<Company>> {
            Ok(None)
        }

        async fn set_status(
            &self,
            id: Uuid,
            _status: CompanyStatus,
        ) -> VitrineResult<Company> {
            Err(VitrineError::NotFound(format!("company not found: {id}")))
        }

        async fn insert_pending_batch(
            &self,
            companies: Vec<NewCompany>,
            expected_since: &str,
            new_since: &str,
        ) -> VitrineResult<IngestCommit> {
            let inserted = companies.len();
            self.commits.lock().unwrap().push((
                companies,
                expected_since.to_string(),
                new_since.to_string(),
            ));
            Ok(IngestCommit {
                inserted,
                raced: false,
            })
        }
    }

    // ── Mock WatermarkRepository ────────────────────────────────

    struct MockWatermarkRepo {
        val: String,
    }

    impl MockWatermarkRepo {
        fn new(val: &str) -> Self {
            Self {
                val: val.to_string(),
            }
        }
    }

    #[async_trait]
    impl WatermarkRepository for MockWatermarkRepo {
        async fn get_or_seed(&self, _default_val: &str) -> VitrineResult<Watermark> {
            Ok(Watermark {
                key: "since".to_string(),
                val: self.val.clone(),
                updated_at: Utc::now(),
            })
        }
    }

    // ── Fixtures ────────────────────────────────────────────────

    fn all_questions() -> serde_json::Value {
        serde_json::json!([
            { "id": "q_name", "question": "Startup name" },
            { "id": "q_year", "question": "Year founded" },
            { "id": "q_url", "question": "Web address" },
            { "id": "q_twitter", "question": "Twitter handle" },
            { "id": "q_logo", "question": "URL to high-resolution (white) logo" },
            { "id": "q_contact", "question": "Contact person" },
            { "id": "q_email", "question": "Contact email address" }
        ])
    }

    fn full_response(date_land: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "metadata": { "date_land": date_land },
            "answers": {
                "q_name": name,
                "q_year": "2014",
                "q_url": "https://acme.example.com",
                "q_twitter": "@acme",
                "q_logo": "https://cdn.example.com/acme.png",
                "q_contact": "Ada Lovelace",
                "q_email": "ada@acme.example.com"
            }
        })
    }

    async fn syncer_for(
        server: &MockServer,
        since: &str,
    ) -> (
        DirectorySyncer<MockCompanyRepo, MockWatermarkRepo>,
        MockCompanyRepo,
    ) {
        let config = TypeformConfig {
            base_url: server.uri(),
            form_uid: "AbC123".to_string(),
            api_key: "fake-key".to_string(),
            timeout_secs: 5,
        };
        let client = TypeformClient::new(config).unwrap();
        let companies = MockCompanyRepo::default();
        let syncer = DirectorySyncer::new(
            client,
            companies.clone(),
            MockWatermarkRepo::new(since),
        );
        (syncer, companies)
    }

    fn mount_document(
        server: &MockServer,
        questions: serde_json::Value,
        responses: serde_json::Value,
    ) -> Mock {
        Mock::given(method("GET"))
            .and(path("/v0/form/AbC123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "questions": questions,
                "responses": responses
            })))
    }

    // ── Tests ───────────────────────────────────────────────────

    #[tokio::test]
    async fn zero_responses_is_a_noop() {
        let server = MockServer::start().await;
        mount_document(&server, all_questions(), serde_json::json!([]))
            .mount(&server)
            .await;

        let (syncer, companies) = syncer_for(&server, "100").await;
        let report = syncer.synchronize().await.expect("sync should succeed");

        assert!(report.fetched.is_empty());
        assert_eq!(report.inserted, 0);
        assert_eq!(report.new_since, None);
        assert!(companies.commits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fetch_uses_current_watermark() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/form/AbC123"))
            .and(query_param("since", "1425000000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "questions": [],
                "responses": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (syncer, _companies) = syncer_for(&server, "1425000000").await;
        syncer.synchronize().await.expect("sync should succeed");
    }

    #[tokio::test]
    async fn single_full_response_inserts_one_pending_company() {
        let server = MockServer::start().await;
        mount_document(
            &server,
            all_questions(),
            serde_json::json!([full_response("2015-03-01 10:00:00", "Acme")]),
        )
        .mount(&server)
        .await;

        let (syncer, companies) = syncer_for(&server, "100").await;
        let report = syncer.synchronize().await.expect("sync should succeed");

        assert_eq!(report.inserted, 1);
        assert_eq!(report.fetched.len(), 1);

        let commits = companies.commits.lock().unwrap();
        assert_eq!(commits.len(), 1);
        let (batch, expected_since, new_since) = &commits[0];
        assert_eq!(expected_since, "100");

        // 2015-03-01 10:00:00 + 2h, as epoch seconds
        let expected = Utc
            .with_ymd_and_hms(2015, 3, 1, 12, 0, 0)
            .unwrap()
            .timestamp()
            .to_string();
        assert_eq!(new_since, &expected);
        assert_eq!(new_since, "1425211200");

        assert_eq!(batch.len(), 1);
        let company = &batch[0];
        assert_eq!(company.name.as_deref(), Some("Acme"));
        assert_eq!(company.url.as_deref(), Some("https://acme.example.com"));
        assert_eq!(
            company.logo_submitted.as_deref(),
            Some("https://cdn.example.com/acme.png")
        );
        assert_eq!(company.contact_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(company.contact_email.as_deref(), Some("ada@acme.example.com"));
        assert_eq!(company.twitter.as_deref(), Some("@acme"));
        assert_eq!(company.founded_year.as_deref(), Some("2014"));
        assert_eq!(
            company.date_submitted,
            Utc.with_ymd_and_hms(2015, 3, 1, 10, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn missing_answer_yields_none_for_that_field_only() {
        let server = MockServer::start().await;
        let mut response = full_response("2015-03-01 10:00:00", "Acme");
        response["answers"]
            .as_object_mut()
            .unwrap()
            .remove("q_twitter");

        mount_document(&server, all_questions(), serde_json::json!([response]))
            .mount(&server)
            .await;

        let (syncer, companies) = syncer_for(&server, "100").await;
        syncer.synchronize().await.expect("sync should succeed");

        let commits = companies.commits.lock().unwrap();
        let company = &commits[0].0[0];
        assert_eq!(company.twitter, None);
        assert_eq!(company.name.as_deref(), Some("Acme"));
        assert_eq!(company.contact_email.as_deref(), Some("ada@acme.example.com"));
    }

    #[tokio::test]
    async fn missing_question_label_yields_none_for_that_field() {
        let server = MockServer::start().await;
        // Form only defines the name question.
        mount_document(
            &server,
            serde_json::json!([{ "id": "q_name", "question": "Startup name" }]),
            serde_json::json!([full_response("2015-03-01 10:00:00", "Acme")]),
        )
        .mount(&server)
        .await;

        let (syncer, companies) = syncer_for(&server, "100").await;
        syncer.synchronize().await.expect("sync should succeed");

        let commits = companies.commits.lock().unwrap();
        let company = &commits[0].0[0];
        assert_eq!(company.name.as_deref(), Some("Acme"));
        assert_eq!(company.founded_year, None);
        assert_eq!(company.url, None);
    }

    #[tokio::test]
    async fn batch_commits_once_and_advances_from_last_record() {
        let server = MockServer::start().await;
        // Middle record has the LATEST date; the watermark must still
        // follow the last record in sequence order.
        mount_document(
            &server,
            all_questions(),
            serde_json::json!([
                full_response("2015-03-01 10:00:00", "First"),
                full_response("2015-03-05 09:30:00", "Middle"),
                full_response("2015-03-02 08:00:00", "Last"),
            ]),
        )
        .mount(&server)
        .await;

        let (syncer, companies) = syncer_for(&server, "100").await;
        let report = syncer.synchronize().await.expect("sync should succeed");

        assert_eq!(report.inserted, 3);

        let commits = companies.commits.lock().unwrap();
        assert_eq!(commits.len(), 1, "all rows go in one commit");
        let (batch, _, new_since) = &commits[0];
        assert_eq!(batch.len(), 3);

        let expected = Utc
            .with_ymd_and_hms(2015, 3, 2, 10, 0, 0)
            .unwrap()
            .timestamp()
            .to_string();
        assert_eq!(new_since, &expected);
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v0/form/AbC123"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let (syncer, companies) = syncer_for(&server, "100").await;
        let err = syncer.synchronize().await.unwrap_err();
        assert!(matches!(err, SyncError::Client(_)));
        assert!(companies.commits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unparseable_date_fails_the_sync() {
        let server = MockServer::start().await;
        mount_document(
            &server,
            all_questions(),
            serde_json::json!([full_response("yesterday-ish", "Acme")]),
        )
        .mount(&server)
        .await;

        let (syncer, companies) = syncer_for(&server, "100").await;
        let err = syncer.synchronize().await.unwrap_err();
        assert!(matches!(err, SyncError::BadDate { .. }));
        assert!(companies.commits.lock().unwrap().is_empty());
    }
}
