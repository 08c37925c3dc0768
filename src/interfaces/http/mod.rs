use crate::application::EnrollmentImportUseCase;
use crate::domain::enrollment::{NormalizedRecord, UpdateMode};
use crate::domain::error::AppError;
use actix_cors::Cors;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

/// Entries kept for `GET /api/logs`
pub const MAX_LOG_ENTRIES: usize = 100;

pub const TEMPLATE_FILE_NAME: &str = "enrollment_template.csv";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub import_use_case: Arc<EnrollmentImportUseCase>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

/// Records already validated by the upload UI
#[derive(Debug, Deserialize)]
pub struct UploadBody {
    #[serde(default)]
    pub import_id: Option<Uuid>,
    #[serde(default)]
    pub update_mode: Option<UpdateMode>,
    pub records: Vec<NormalizedRecord>,
}

fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::ValidationError(_) | AppError::ParseError(_) => {
            HttpResponse::BadRequest().body(err.to_string())
        }
        AppError::ApiError(_) => HttpResponse::BadGateway().body(err.to_string()),
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[post("/import/validate")]
async fn validate_import(data: web::Data<HttpState>, body: web::Bytes) -> impl Responder {
    add_log(
        &data.logs,
        "INFO",
        "Import",
        &format!("Validating upload ({} bytes)", body.len()),
    );

    match data.import_use_case.import_bytes(&body) {
        Ok(outcome) => {
            add_log(
                &data.logs,
                "INFO",
                "Import",
                &format!(
                    "Import {}: {} valid, {} errors, {} warnings",
                    outcome.import_id,
                    outcome.valid_records,
                    outcome.error_records,
                    outcome.warning_records
                ),
            );
            HttpResponse::Ok().json(outcome)
        }
        Err(e) => {
            warn!(error = %e, "import rejected");
            add_log(
                &data.logs,
                "ERROR",
                "Import",
                &format!("Validation failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[post("/import/preview")]
async fn preview_mapping(data: web::Data<HttpState>, body: web::Bytes) -> impl Responder {
    let content = crate::infrastructure::csv::decode_bytes(&body);
    match data.import_use_case.preview_mapping(&content) {
        Ok(mapping) => HttpResponse::Ok().json(mapping),
        Err(e) => error_response(&e),
    }
}

#[get("/import/template")]
async fn download_template(data: web::Data<HttpState>) -> impl Responder {
    match data.import_use_case.template_csv() {
        Ok(csv) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(TEMPLATE_FILE_NAME.to_string())],
            })
            .body(csv),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Import",
                &format!("Template export failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[post("/import/upload")]
async fn upload_records(data: web::Data<HttpState>, req: web::Json<UploadBody>) -> impl Responder {
    let UploadBody {
        import_id,
        update_mode,
        records,
    } = req.into_inner();
    let import_id = import_id.unwrap_or_else(Uuid::new_v4);
    let mode = update_mode.unwrap_or_else(|| data.import_use_case.default_update_mode());

    add_log(
        &data.logs,
        "INFO",
        "Upload",
        &format!(
            "Uploading {} records (import={} mode={})",
            records.len(),
            import_id,
            mode
        ),
    );

    match data
        .import_use_case
        .upload_records(import_id, records, mode)
        .await
    {
        Ok(receipt) => HttpResponse::Ok().json(receipt),
        Err(e) => {
            warn!(error = %e, %import_id, "upload failed");
            add_log(
                &data.logs,
                "ERROR",
                "Upload",
                &format!("Upload failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = lock_logs(&data.logs);
    HttpResponse::Ok().json(&*logs)
}

fn lock_logs(logs: &Mutex<Vec<LogEntry>>) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
    logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = lock_logs(logs);
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Routes under `/api`, plus body limits sized from the import config
pub fn configure(max_file_bytes: u64) -> impl FnOnce(&mut web::ServiceConfig) {
    let limit = usize::try_from(max_file_bytes).unwrap_or(usize::MAX);
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::PayloadConfig::new(limit))
            // JSON records run several times the size of the CSV they came from
            .app_data(web::JsonConfig::default().limit(limit.saturating_mul(4)))
            .service(
                web::scope("/api")
                    .service(validate_import)
                    .service(preview_mapping)
                    .service(download_template)
                    .service(upload_records)
                    .service(get_logs),
            );
    }
}

pub fn start_server(
    import_use_case: Arc<EnrollmentImportUseCase>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    host: &str,
    port: u16,
) -> std::io::Result<Server> {
    let max_file_bytes = import_use_case.config().max_file_bytes;
    let state = web::Data::new(HttpState {
        import_use_case,
        logs,
    });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure(max_file_bytes))
    })
    .bind((host, port))?
    .run();

    info!(host, port, "HTTP server listening");
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::ImportConfig;
    use crate::infrastructure::persistence::{PersistenceApi, UploadReceipt, UploadRequest};
    use actix_web::{http::StatusCode, test};
    use async_trait::async_trait;

    struct AcceptAll;

    #[async_trait]
    impl PersistenceApi for AcceptAll {
        async fn upload(
            &self,
            request: &UploadRequest,
        ) -> crate::domain::error::Result<UploadReceipt> {
            Ok(UploadReceipt {
                inserted: Some(request.records.len()),
                ..UploadReceipt::default()
            })
        }
    }

    fn state(use_case: EnrollmentImportUseCase) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            import_use_case: Arc::new(use_case),
            logs: Arc::new(Mutex::new(Vec::new())),
        })
    }

    const CLEAN_CSV: &str = "Student ID,First Name,Last Name,Academic Year,Semester,Currently Enrolled\n\
                             2024-001,juan,dela cruz,2024-2025,1st sem,yes\n";

    #[actix_web::test]
    async fn test_validate_returns_outcome() {
        let data = state(EnrollmentImportUseCase::new(ImportConfig::default()));
        let app = test::init_service(
            App::new()
                .app_data(data.clone())
                .configure(configure(ImportConfig::default().max_file_bytes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/import/validate")
            .set_payload(CLEAN_CSV)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["validRecords"], 1);
        assert_eq!(body["errorRecords"], 0);
        assert_eq!(body["validData"][0]["first_name"], "Juan");

        let logs = data.logs.lock().unwrap();
        assert!(logs.iter().any(|l| l.message.contains("1 valid")));
    }

    #[actix_web::test]
    async fn test_file_level_errors_are_bad_requests() {
        let data = state(EnrollmentImportUseCase::new(ImportConfig::default()));
        let app = test::init_service(
            App::new()
                .app_data(data)
                .configure(configure(ImportConfig::default().max_file_bytes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/import/validate")
            .set_payload("Student ID,First Name\n")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_template_is_a_csv_attachment() {
        let data = state(EnrollmentImportUseCase::new(ImportConfig::default()));
        let app = test::init_service(
            App::new()
                .app_data(data)
                .configure(configure(ImportConfig::default().max_file_bytes)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/import/template").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let disposition = resp
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains(TEMPLATE_FILE_NAME));

        let body = test::read_body(resp).await;
        assert!(body.starts_with(b"Student ID,First Name,Last Name"));
    }

    #[actix_web::test]
    async fn test_upload_without_persistence_is_server_error() {
        let data = state(EnrollmentImportUseCase::new(ImportConfig::default()));
        let app = test::init_service(
            App::new()
                .app_data(data)
                .configure(configure(ImportConfig::default().max_file_bytes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/import/upload")
            .set_json(serde_json::json!({
                "records": [{"student_id_number": "2024-001"}]
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_upload_forwards_records() {
        let use_case = EnrollmentImportUseCase::new(ImportConfig::default())
            .with_persistence(Arc::new(AcceptAll));
        let data = state(use_case);
        let app = test::init_service(
            App::new()
                .app_data(data)
                .configure(configure(ImportConfig::default().max_file_bytes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/import/upload")
            .set_json(serde_json::json!({
                "update_mode": "replace",
                "records": [{"student_id_number": "2024-001"}, {"student_id_number": "2024-002"}]
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["inserted"], 2);
    }

    #[actix_web::test]
    async fn test_logs_endpoint() {
        let data = state(EnrollmentImportUseCase::new(ImportConfig::default()));
        add_log(&data.logs, "INFO", "Test", "hello");
        let app = test::init_service(
            App::new()
                .app_data(data)
                .configure(configure(ImportConfig::default().max_file_bytes)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/logs").to_request();
        let body: Vec<LogEntry> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].message, "hello");
    }

    #[actix_web::test]
    async fn test_log_buffer_is_bounded() {
        let logs = Mutex::new(Vec::new());
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            add_log(&logs, "DEBUG", "Test", &format!("entry {}", i));
        }
        let logs = logs.lock().unwrap();
        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 5");
    }
}
