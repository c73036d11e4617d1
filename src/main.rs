use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use incipit::convert::{convert_docx_bytes, preview_docx_bytes};
use incipit::types::{ConvertOptions, EmphasisStyle};
use serde_json::json;
use std::path::Path;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

struct Upload {
    file_name: String,
    bytes: Vec<u8>,
    options: ConvertOptions,
}

/// Collects the uploaded document and its conversion options from the
/// multipart form. Unknown fields are ignored; a missing file or an
/// unparseable word count is the caller's error.
async fn read_upload(mut multipart: Multipart) -> Result<Upload, String> {
    let mut file_name = String::new();
    let mut bytes: Option<Vec<u8>> = None;
    let mut options = ConvertOptions::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {e}"))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().unwrap_or("document.docx").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file: {e}"))?;
                bytes = Some(data.to_vec());
            }
            "word_count" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read word_count: {e}"))?;
                options.word_count = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("Invalid word_count: {value}"))?;
            }
            "format_style" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read format_style: {e}"))?;
                options.emphasis = if value == "bold" {
                    EmphasisStyle::Bold
                } else {
                    EmphasisStyle::Italic
                };
            }
            "apply_cms" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read apply_cms: {e}"))?;
                options.apply_citation_style = value == "yes";
            }
            _ => {}
        }
    }

    let Some(bytes) = bytes else {
        return Err("No file provided".to_string());
    };
    Ok(Upload {
        file_name,
        bytes,
        options,
    })
}

fn download_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let stem = stem.replace(['"', '\r', '\n'], "_");
    format!("{stem}_incipit.docx")
}

async fn handle_convert(multipart: Multipart) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(message) => return (StatusCode::BAD_REQUEST, message).into_response(),
    };

    match convert_docx_bytes(&upload.bytes, &upload.options) {
        Ok((converted, summary)) => {
            tracing::info!(
                "{}: converted {} notes",
                upload.file_name,
                summary.notes_processed
            );
            let headers = [
                (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!(
                        "attachment; filename=\"{}\"",
                        download_name(&upload.file_name)
                    ),
                ),
            ];
            (headers, converted).into_response()
        }
        Err(message) => {
            tracing::error!("{}: conversion failed: {}", upload.file_name, message);
            (StatusCode::BAD_REQUEST, message).into_response()
        }
    }
}

async fn handle_preview(multipart: Multipart) -> Response {
    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(message) => {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    };

    match preview_docx_bytes(&upload.bytes) {
        Ok(previews) => Json(previews).into_response(),
        Err(message) => {
            tracing::error!("{}: preview failed: {}", upload.file_name, message);
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
        }
    }
}

async fn handle_health() -> &'static str {
    "ok"
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .route("/convert", post(handle_convert))
        .route("/preview", post(handle_preview))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .fallback(handle_health);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("Failed to bind server port");

    tracing::info!("Listening on :{port}");

    axum::serve(listener, app).await.expect("Server failed");
}
