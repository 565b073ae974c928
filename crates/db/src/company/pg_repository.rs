use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::company::models::{
    Company, CompanyCard, CompanyFilter, CompanyStatus, IngestCommit, NewCompany,
};
use crate::company::repositories::CompanyRepository;
use crate::sync::models::SINCE_KEY;
use vitrine_common::error::{VitrineError, VitrineResult};

const COMPANY_COLUMNS: &str = "id, name, url, logo_submitted, logo, contact_name, \
     contact_email, twitter, founded_year, date_submitted, status, created_at, updated_at";

#[derive(Clone)]
pub struct PgCompanyRepository {
    pool: PgPool,
}

impl PgCompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_row(row: PgRow) -> VitrineResult<Company> {
        let status_raw: String = row.get("status");
        let status = CompanyStatus::from_str(&status_raw).map_err(VitrineError::Internal)?;

        Ok(Company {
            id: row.get("id"),
            name: row.get("name"),
            url: row.get("url"),
            logo_submitted: row.get("logo_submitted"),
            logo: row.get("logo"),
            contact_name: row.get("contact_name"),
            contact_email: row.get("contact_email"),
            twitter: row.get("twitter"),
            founded_year: row.get("founded_year"),
            date_submitted: row.get("date_submitted"),
            status,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl CompanyRepository for PgCompanyRepository {
    async fn list_accepted(&self) -> VitrineResult<Vec<CompanyCard>> {
        let rows = sqlx::query(
            "select name, url, logo from companies
             where status = 'accepted'
             order by name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| VitrineError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|r| CompanyCard {
                name: r.get("name"),
                url: r.get("url"),
                logo: r.get("logo"),
            })
            .collect())
    }

    async fn list(&self, filter: CompanyFilter) -> VitrineResult<Vec<Company>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "select {COMPANY_COLUMNS} from companies where true"
        ));

        if let Some(status) = filter.status {
            qb.push(" and status = ").push_bind(status.as_str());
        }

        qb.push(" order by date_submitted desc nulls last, created_at desc");
        qb.push(" limit ").push_bind(filter.limit.unwrap_or(50));
        qb.push(" offset ").push_bind(filter.offset.unwrap_or(0));

        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| VitrineError::Database(e.to_string()))?;

        rows.into_iter().map(Self::map_row).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> VitrineResult<Option<Company>> {
        let sql = format!("select {COMPANY_COLUMNS} from companies where id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| VitrineError::Database(e.to_string()))?;

        match row {
            Some(r) => Ok(Some(Self::map_row(r)?)),
            None => Ok(None),
        }
    }

    async fn set_status(&self, id: Uuid, status: CompanyStatus) -> VitrineResult<Company> {
        let sql = format!(
            "update companies set status = $1, updated_at = $2
             where id = $3
             returning {COMPANY_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| VitrineError::Database(e.to_string()))?;

        match row {
            Some(r) => Self::map_row(r),
            None => Err(VitrineError::NotFound(format!("company not found: {id}"))),
        }
    }

    async fn insert_pending_batch(
        &self,
        companies: Vec<NewCompany>,
        expected_since: &str,
        new_since: &str,
    ) -> VitrineResult<IngestCommit> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| VitrineError::Database(e.to_string()))?;

        let now = Utc::now();
        let inserted = companies.len();

        for company in companies {
            sqlx::query(
                "insert into companies
                 (id, name, url, logo_submitted, contact_name, contact_email, twitter,
                  founded_year, date_submitted, status, created_at, updated_at)
                 values ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, $10)",
            )
            .bind(Uuid::new_v4())
            .bind(company.name)
            .bind(company.url)
            .bind(company.logo_submitted)
            .bind(company.contact_name)
            .bind(company.contact_email)
            .bind(company.twitter)
            .bind(company.founded_year)
            .bind(company.date_submitted)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| VitrineError::Database(e.to_string()))?;
        }

        // Guarded advance: only matches when the watermark still holds the
        // value this sync started from.
        let guarded = sqlx::query(
            "update pairs set val = $1, updated_at = $2 where key = $3 and val = $4",
        )
        .bind(new_since)
        .bind(now)
        .bind(SINCE_KEY)
        .bind(expected_since)
        .execute(&mut *tx)
        .await
        .map_err(|e| VitrineError::Database(e.to_string()))?;

        let raced = guarded.rows_affected() == 0;
        if raced {
            // A concurrent sync moved the watermark; keep the original
            // last-writer-wins behavior and overwrite it anyway.
            tracing::warn!(
                expected = expected_since,
                new = new_since,
                "watermark changed while syncing, overwriting"
            );
            sqlx::query("update pairs set val = $1, updated_at = $2 where key = $3")
                .bind(new_since)
                .bind(now)
                .bind(SINCE_KEY)
                .execute(&mut *tx)
                .await
                .map_err(|e| VitrineError::Database(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| VitrineError::Database(e.to_string()))?;

        Ok(IngestCommit { inserted, raced })
    }
}
