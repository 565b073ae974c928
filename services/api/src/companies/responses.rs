use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use vitrine_db::company::models::Company;

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub id: Uuid,
    pub name: Option<String>,
    pub url: Option<String>,
    pub logo_submitted: Option<String>,
    pub logo: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
    pub twitter: Option<String>,
    pub founded_year: Option<String>,
    pub date_submitted: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
    fn from(company: Company) -> Self {
        Self {
            id: company.id,
            name: company.name,
            url: company.url,
            logo_submitted: company.logo_submitted,
            logo: company.logo,
            contact_name: company.contact_name,
            contact_email: company.contact_email,
            twitter: company.twitter,
            founded_year: company.founded_year,
            date_submitted: company.date_submitted,
            status: company.status.as_str().to_string(),
            created_at: company.created_at,
            updated_at: company.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListCompaniesResponse {
    pub data: Vec<CompanyResponse>,
    pub count: usize,
}
