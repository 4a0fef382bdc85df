use actix_web::web;

use crate::handlers::generator_handlers::{generate_image, preview_payload};
use crate::handlers::health_handlers::health_check;
use crate::handlers::profile_handlers::get_profile;
use crate::handlers::qr_handlers::{
    create_qr_code, delete_qr_code, get_qr_code, get_qr_image, list_qr_codes, update_qr_code,
};
use crate::handlers::redirect_handlers::redirect_to_destination;
use crate::middlewares::authmw::SessionRestore;

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig, jwt_secret: &str, jwt_audience: Option<&str>) {
    // Dynamic QR landing route at the root level
    cfg.route("/r/{short_id}", web::get().to(redirect_to_destination));
    // Health check - no session needed
    cfg.route("/api/health/check", web::get().to(health_check));
    // API routes - session optional, handlers decide whether they need a user
    cfg.service(
        web::scope("/api")
            .wrap(SessionRestore::new(jwt_secret, jwt_audience))
            .route("/generate/preview", web::post().to(preview_payload))
            .route("/generate/image", web::post().to(generate_image))
            .route("/me", web::get().to(get_profile))
            .service(
                web::scope("/qr")
                    .route("", web::get().to(list_qr_codes))
                    .route("", web::post().to(create_qr_code))
                    .route("/{id}", web::get().to(get_qr_code))
                    .route("/{id}", web::patch().to(update_qr_code))
                    .route("/{id}", web::delete().to(delete_qr_code))
                    .route("/{id}/image", web::get().to(get_qr_image)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::dev::Service;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test};
    use mongodb::bson::oid::ObjectId;

    use super::*;
    use crate::config::Config;
    use crate::db::memory::MemoryStore;
    use crate::db::store::QrStore;
    use crate::models::customization::Customization;
    use crate::models::qr_code::QrCodeRecord;
    use crate::payload::QrKind;
    use crate::state::app_state::AppState;
    use crate::tracking::user_agent::{Browser, DeviceType};
    use crate::utils::jwt::{create_token, create_token_for};

    const EDGE_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.51";

    macro_rules! test_app {
        ($store:expr) => {{
            let config = Config::for_tests();
            let secret = config.jwt_secret.clone();
            let audience = config.jwt_audience.clone();
            let state = web::Data::new(AppState {
                store: $store,
                config,
            });
            test::init_service(
                App::new()
                    .app_data(state)
                    .configure(move |cfg| init_routes(cfg, &secret, audience.as_deref())),
            )
            .await
        }};
    }

    fn bearer(user_id: &str) -> (header::HeaderName, String) {
        let token = create_token(
            user_id,
            Some("ana@example.com"),
            Some("Ana Souza"),
            &Config::for_tests().jwt_secret,
        );
        (header::AUTHORIZATION, format!("Bearer {}", token))
    }

    async fn seed(store: &MemoryStore, user_id: &str, destination: &str) -> QrCodeRecord {
        let record = QrCodeRecord::new(
            user_id.into(),
            QrKind::Url,
            destination.into(),
            Customization::default(),
            Some("Menu".into()),
            None,
        );
        store.insert(record).await.unwrap()
    }

    #[actix_web::test]
    async fn unknown_short_id_shows_error_screen() {
        let app = test_app!(Arc::new(MemoryStore::default()));
        let req = test::TestRequest::get().uri("/r/nope1234").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("QR Code não encontrado ou inativo"));
        assert!(body.contains("href=\"/\""));
    }

    #[actix_web::test]
    async fn resolvable_code_redirects_and_records_scan() {
        let store = Arc::new(MemoryStore::default());
        let record = seed(&store, "owner", "example.com").await;
        let app = test_app!(store.clone());

        let req = test::TestRequest::get()
            .uri(&format!("/r/{}", record.short_id))
            .insert_header((header::USER_AGENT, EDGE_UA))
            .insert_header((header::REFERER, "https://flyer.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://example.com"
        );

        let scans = store.scans().await;
        assert_eq!(scans.len(), 1);
        assert_eq!(scans[0].browser, Browser::Edge);
        assert_eq!(scans[0].device_type, DeviceType::Desktop);
        assert_eq!(scans[0].referrer.as_deref(), Some("https://flyer.example"));
    }

    #[actix_web::test]
    async fn repeat_visitors_count_once_as_unique() {
        let store = Arc::new(MemoryStore::default());
        let record = seed(&store, "owner", "https://example.com").await;
        let app = test_app!(store.clone());

        for _ in 0..3 {
            let req = test::TestRequest::get()
                .uri(&format!("/r/{}", record.short_id))
                .peer_addr("203.0.113.7:5000".parse().unwrap())
                .to_request();
            test::call_service(&app, req).await;
        }

        let updated = store.get(&record.id.unwrap()).await.unwrap();
        assert_eq!(updated.total_scans, 3);
        assert_eq!(updated.unique_scans, 1);
        assert!(updated.last_scan_at.is_some());
    }

    #[actix_web::test]
    async fn inactive_code_is_not_found() {
        let store = Arc::new(MemoryStore::default());
        let mut record = QrCodeRecord::new(
            "owner".into(),
            QrKind::Url,
            "https://example.com".into(),
            Customization::default(),
            None,
            None,
        );
        record.is_active = false;
        let record = store.insert(record).await.unwrap();
        let app = test_app!(store.clone());

        let req = test::TestRequest::get()
            .uri(&format!("/r/{}", record.short_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(store.scans().await.is_empty());
    }

    #[actix_web::test]
    async fn failed_scan_insert_does_not_block_redirect() {
        let store = Arc::new(MemoryStore::failing_scans());
        let record = seed(&store, "owner", "mailto:team@example.com").await;
        let app = test_app!(store);

        let req = test::TestRequest::get()
            .uri(&format!("/r/{}", record.short_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "mailto:team@example.com"
        );
    }

    #[actix_web::test]
    async fn lookup_failure_shows_processing_error() {
        let store = Arc::new(MemoryStore::failing_lookups());
        let app = test_app!(store);

        let req = test::TestRequest::get().uri("/r/abcd1234").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
        assert!(body.contains("Erro ao processar QR Code"));
    }

    #[actix_web::test]
    async fn generator_works_anonymously() {
        let app = test_app!(Arc::new(MemoryStore::default()));
        let req = test::TestRequest::post()
            .uri("/api/generate/preview")
            .set_json(serde_json::json!({
                "kind": "social",
                "fields": { "platform": "tiktok", "username": "@acme" }
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["payload"], "https://tiktok.com/@acme");
    }

    #[actix_web::test]
    async fn saved_codes_need_a_session() {
        let app = test_app!(Arc::new(MemoryStore::default()));

        let req = test::TestRequest::get().uri("/api/qr").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/qr")
            .insert_header((header::AUTHORIZATION, "Bearer garbage"))
            .to_request();
        let resp = app.call(req).await;
        let status = match resp {
            Ok(resp) => resp.status(),
            Err(e) => e.error_response().status(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn provider_audience_is_enforced() {
        let app = test_app!(Arc::new(MemoryStore::default()));
        let secret = Config::for_tests().jwt_secret;

        let token = create_token_for("user-1", None, None, Some("authenticated"), &secret);
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let token = create_token_for("user-1", None, None, Some("service_role"), &secret);
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_request();
        let status = match app.call(req).await {
            Ok(resp) => resp.status(),
            Err(e) => e.error_response().status(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn profile_has_initials() {
        let app = test_app!(Arc::new(MemoryStore::default()));
        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(bearer("user-1"))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["id"], "user-1");
        assert_eq!(body["initials"], "AS");
    }

    #[actix_web::test]
    async fn create_list_update_delete_round() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/api/qr")
            .insert_header(bearer("user-1"))
            .set_json(serde_json::json!({
                "kind": "url",
                "content": "example.com",
                "name": "Flyer",
                "customization": { "fgColor": "#0f172a", "logoSize": 40 }
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(created["destination_url"], "example.com");
        assert_eq!(created["customization"]["fgColor"], "#0f172a");
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/qr")
            .insert_header(bearer("user-1"))
            .to_request();
        let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/qr/{}", id))
            .insert_header(bearer("user-1"))
            .set_json(serde_json::json!({ "destination_url": "https://new.example" }))
            .to_request();
        let updated: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["destination_url"], "https://new.example");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/qr/{}", id))
            .insert_header(bearer("user-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let oid = ObjectId::parse_str(&id).unwrap();
        assert!(store.get(&oid).await.is_none());
    }

    #[actix_web::test]
    async fn static_codes_print_their_content() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/api/qr")
            .insert_header(bearer("user-1"))
            .set_json(serde_json::json!({
                "kind": "text",
                "content": "hello",
                "is_dynamic": false
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(created["is_dynamic"], false);

        let id = created["id"].as_str().unwrap().to_string();
        let record = store.get(&ObjectId::parse_str(&id).unwrap()).await.unwrap();
        assert_eq!(record.encoded_target("https://qr.example"), "hello");

        let req = test::TestRequest::get()
            .uri(&format!("/api/qr/{}/image?format=svg", id))
            .insert_header(bearer("user-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn other_users_codes_are_invisible() {
        let store = Arc::new(MemoryStore::default());
        let record = seed(&store, "owner", "https://example.com").await;
        let id = record.id.unwrap().to_hex();
        let app = test_app!(store.clone());

        let req = test::TestRequest::get()
            .uri(&format!("/api/qr/{}", id))
            .insert_header(bearer("intruder"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/qr/{}", id))
            .insert_header(bearer("intruder"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(store.get(&record.id.unwrap()).await.is_some());

        let req = test::TestRequest::get()
            .uri("/api/qr")
            .insert_header(bearer("intruder"))
            .to_request();
        let listed: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn saved_code_image_is_rendered() {
        let store = Arc::new(MemoryStore::default());
        let record = seed(&store, "user-1", "https://example.com").await;
        let app = test_app!(store);

        let req = test::TestRequest::get()
            .uri(&format!("/api/qr/{}/image?format=svg", record.id.unwrap().to_hex()))
            .insert_header(bearer("user-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
    }

    #[actix_web::test]
    async fn malformed_id_is_bad_request() {
        let app = test_app!(Arc::new(MemoryStore::default()));
        let req = test::TestRequest::get()
            .uri("/api/qr/not-an-object-id")
            .insert_header(bearer("user-1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn health_check_pings_store() {
        let app = test_app!(Arc::new(MemoryStore::default()));
        let req = test::TestRequest::get().uri("/api/health/check").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
    }
}
