use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, Responder, Result, error, web};
use validator::Validate;

use crate::models::customization::ErrorLevel;
use crate::payload::{Payload, QrRequest};
use crate::render::{self, ExportFormat};
use crate::structs::qr_request::{GenerateImageRequest, ImageParams, PreviewResponse};

/// Build an attachment response for a rendered image.
pub fn image_response(bytes: Vec<u8>, format: ExportFormat, file_name: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes)
}

/// Content that overflows the code at this error level is the caller's to fix.
pub fn render_failure(e: anyhow::Error, level: ErrorLevel) -> Result<HttpResponse> {
    if render::is_data_too_long(&e) {
        return Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
            "error": format!("Content too long for error level {:?}", level)
        })));
    }
    Err(error::ErrorInternalServerError(format!(
        "QR code generation error: {:#}",
        e
    )))
}

/// Encode a request without rendering it
pub async fn preview_payload(web::Json(request): web::Json<QrRequest>) -> Result<impl Responder> {
    Ok(HttpResponse::Ok().json(PreviewResponse {
        kind: request.kind(),
        ready: request.is_ready(),
        payload: request.try_encode(),
    }))
}

/// Render a request into a downloadable PNG or SVG
pub async fn generate_image(
    query: web::Query<ImageParams>,
    web::Json(req): web::Json<GenerateImageRequest>,
) -> Result<impl Responder> {
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let kind = req.request.kind();
    let payload = match req.request.try_encode() {
        Some(payload) => payload,
        None => {
            return Ok(HttpResponse::UnprocessableEntity().json(serde_json::json!({
                "error": format!("Fill in the required field for a {} QR code", kind)
            })));
        }
    };

    let format = query.format.unwrap_or_default();
    let size = render::clamp_size(query.size);
    let bytes = match render::render(&payload, &req.customization, size, format) {
        Ok(bytes) => bytes,
        Err(e) => return render_failure(e, req.customization.error_level),
    };

    let file_name = render::export_file_name(kind, query.variant.unwrap_or_default(), format);
    Ok(image_response(bytes, format, file_name))
}
