use vitrine_config::init_tracing;
use vitrine_db::company::pg_repository::PgCompanyRepository;
use vitrine_db::sync::pg_repository::PgWatermarkRepository;
use vitrine_ingest::sync::DirectorySyncer;
use vitrine_ingest::typeform::client::{TypeformClient, TypeformConfig};

#[tokio::main]
async fn main() {
    init_tracing("info");
    let _ = dotenvy::dotenv();

    tracing::info!(service = "vitrine-ingest", "starting");

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = vitrine_db::create_pool(&database_url)
        .await
        .expect("failed to connect to database");

    match TypeformConfig::from_env() {
        Some(config) => {
            tracing::info!(form_uid = %config.form_uid, "form connector configured, starting sync");

            let client = TypeformClient::new(config).expect("failed to create typeform client");
            let companies = PgCompanyRepository::new(pool.clone());
            let watermarks = PgWatermarkRepository::new(pool.clone());

            let syncer = DirectorySyncer::new(client, companies, watermarks);

            match syncer.synchronize().await {
                Ok(report) => {
                    tracing::info!(
                        fetched = report.fetched.len(),
                        inserted = report.inserted,
                        new_since = ?report.new_since,
                        raced = report.raced,
                        "sync completed"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "sync failed");
                }
            }
        }
        None => {
            tracing::info!("no typeform credentials found, skipping sync");
        }
    }

    tracing::info!("ingest service finished");
}
