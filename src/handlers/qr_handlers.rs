use actix_web::{HttpResponse, Responder, Result, error, web};
use mongodb::bson::oid::ObjectId;
use validator::Validate;

use crate::handlers::generator_handlers::{image_response, render_failure};
use crate::middlewares::auth_context::AuthContext;
use crate::models::qr_code::{QrCodeRecord, QrCodeUpdate};
use crate::render::{self, ExportVariant};
use crate::state::app_state::AppState;
use crate::structs::qr_request::{CreateQrRequest, ImageParams, QrCodeResponse, UpdateQrRequest};

fn parse_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| error::ErrorBadRequest("Invalid QR code ID format"))
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "QR code not found"
    }))
}

/// List the caller's saved codes, newest first
pub async fn list_qr_codes(
    app_state: web::Data<AppState>,
    auth: AuthContext,
) -> Result<impl Responder> {
    let user = auth.require_user()?;
    let records = app_state.store.list_for_user(&user.id).await.map_err(|e| {
        log::error!("Failed to list QR codes for {}: {:#}", user.id, e);
        error::ErrorInternalServerError(format!("Database error: {}", e))
    })?;

    let response: Vec<QrCodeResponse> = records.into_iter().map(QrCodeResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// Save a code for the caller
pub async fn create_qr_code(
    app_state: web::Data<AppState>,
    auth: AuthContext,
    web::Json(req): web::Json<CreateQrRequest>,
) -> Result<impl Responder> {
    let user = auth.require_user()?;
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let mut record = QrCodeRecord::new(
        user.id.clone(),
        req.kind,
        req.content,
        req.customization,
        req.name,
        req.destination_url,
    );
    if let Some(is_dynamic) = req.is_dynamic {
        record.is_dynamic = is_dynamic;
    }

    let saved = app_state.store.insert(record).await.map_err(|e| {
        log::error!("Failed to save QR code: {:#}", e);
        error::ErrorInternalServerError(format!("Database error: {}", e))
    })?;
    log::info!("Saved {} QR code {} for {}", saved.kind, saved.short_id, user.id);

    Ok(HttpResponse::Created().json(QrCodeResponse::from(saved)))
}

pub async fn get_qr_code(
    app_state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> Result<impl Responder> {
    let user = auth.require_user()?;
    let id = parse_id(&path.into_inner())?;

    let record = app_state
        .store
        .find_for_user(&user.id, &id)
        .await
        .map_err(|e| error::ErrorInternalServerError(format!("Database error: {}", e)))?;

    match record {
        Some(record) => Ok(HttpResponse::Ok().json(QrCodeResponse::from(record))),
        None => Ok(not_found()),
    }
}

/// Change where a dynamic code points, its name, look or active flag
pub async fn update_qr_code(
    app_state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<String>,
    web::Json(req): web::Json<UpdateQrRequest>,
) -> Result<impl Responder> {
    let user = auth.require_user()?;
    let id = parse_id(&path.into_inner())?;
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let update = QrCodeUpdate {
        name: req.name,
        destination_url: req.destination_url,
        customization: req.customization,
        is_active: req.is_active,
    };
    if update.is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Nothing to update"
        })));
    }

    let updated = app_state
        .store
        .update_for_user(&user.id, &id, &update)
        .await
        .map_err(|e| error::ErrorInternalServerError(format!("Database error: {}", e)))?;

    match updated {
        Some(record) => Ok(HttpResponse::Ok().json(QrCodeResponse::from(record))),
        None => Ok(not_found()),
    }
}

pub async fn delete_qr_code(
    app_state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<String>,
) -> Result<impl Responder> {
    let user = auth.require_user()?;
    let id = parse_id(&path.into_inner())?;

    let deleted = app_state
        .store
        .delete_for_user(&user.id, &id)
        .await
        .map_err(|e| error::ErrorInternalServerError(format!("Database error: {}", e)))?;

    if deleted {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Ok(not_found())
    }
}

/// Render a saved code. Dynamic codes carry the redirect link, static ones their content.
pub async fn get_qr_image(
    app_state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<String>,
    query: web::Query<ImageParams>,
) -> Result<impl Responder> {
    let user = auth.require_user()?;
    let id = parse_id(&path.into_inner())?;

    let record = match app_state
        .store
        .find_for_user(&user.id, &id)
        .await
        .map_err(|e| error::ErrorInternalServerError(format!("Database error: {}", e)))?
    {
        Some(record) => record,
        None => return Ok(not_found()),
    };

    let target = record.encoded_target(&app_state.config.public_base_url);
    let format = query.format.unwrap_or_default();
    let bytes = match render::render(
        &target,
        &record.customization,
        render::clamp_size(query.size),
        format,
    ) {
        Ok(bytes) => bytes,
        Err(e) => return render_failure(e, record.customization.error_level),
    };

    let file_name = render::export_file_name(
        record.kind,
        query.variant.unwrap_or(ExportVariant::Pro),
        format,
    );
    Ok(image_response(bytes, format, file_name))
}
