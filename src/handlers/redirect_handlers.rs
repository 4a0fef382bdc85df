use actix_web::{HttpRequest, HttpResponse, http, web};

use crate::models::scan::ScanRecord;
use crate::state::app_state::AppState;
use crate::tracking::redirect::{RedirectFailure, RedirectState};
use crate::utils::hash_ip::hash_ip;

fn header_value(req: &HttpRequest, name: http::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn error_page(failure: RedirectFailure) -> HttpResponse {
    let mut response = match failure {
        RedirectFailure::LookupFailed => HttpResponse::InternalServerError(),
        RedirectFailure::NotFound | RedirectFailure::NoDestination => HttpResponse::NotFound(),
    };

    response.content_type("text/html; charset=utf-8").body(format!(
        "<!DOCTYPE html>\
         <html lang=\"pt-BR\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>QR Code Inválido</title></head>\
         <body><main>\
         <h1>QR Code Inválido</h1>\
         <p>{}</p>\
         <a href=\"/\">Criar um QR Code</a>\
         </main></body></html>",
        failure.message()
    ))
}

/// Public landing route for dynamic codes: record the scan, then send the
/// visitor on to the destination.
pub async fn redirect_to_destination(
    app_state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> HttpResponse {
    let short_id = path.into_inner();
    let lookup = app_state.store.find_active_by_short_id(&short_id).await;
    if let Err(e) = &lookup {
        log::error!("Lookup of QR code {} failed: {:#}", short_id, e);
    }

    if let Ok(Some(record)) = &lookup {
        if let Some(qr_code_id) = record.id {
            let ip = req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string();
            let scan = ScanRecord::new(
                qr_code_id,
                hash_ip(&ip, &app_state.config.ip_hash_salt),
                header_value(&req, http::header::USER_AGENT),
                header_value(&req, http::header::REFERER),
            );

            // Awaited so the scan is written before the visitor leaves, but a
            // failure here never blocks the redirect.
            if let Err(e) = app_state.store.record_scan(scan).await {
                log::warn!("Failed to record scan for {}: {:#}", short_id, e);
            }
        }
    }

    match RedirectState::Loading.resolve(lookup.as_ref().map(Option::as_ref)) {
        RedirectState::Redirecting(url) => HttpResponse::Found()
            .append_header((http::header::LOCATION, url))
            .finish(),
        RedirectState::Error(failure) => error_page(failure),
        RedirectState::Loading => error_page(RedirectFailure::LookupFailed),
    }
}
