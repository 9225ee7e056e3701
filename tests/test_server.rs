//! Integration test: Server API endpoints

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use survival_insight::server::{create_router, AppState, ServerConfig};
use tower::ServiceExt;

use common::{form_value_request, upload_request, FLIPPED_CSV, LABELLED_CSV, UNLABELLED_CSV};
use survival_insight::analysis::analyze as analyze_offline;
use survival_insight::training::ModelState;

fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        static_dir: None,
        max_upload_size: 10 * 1024 * 1024,
        prediction_limit: 100,
        cors_origin: None,
    }
}

fn test_app() -> (Arc<AppState>, axum::Router) {
    let config = test_config();
    let state = Arc::new(AppState::new(config.clone()));
    let app = create_router(Arc::clone(&state), &config);
    (state, app)
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_root_serves_html() {
    let (_, app) = test_app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<html"));
    assert!(html.contains("/analyze"));
}

#[tokio::test]
async fn test_health_endpoint() {
    let (_, app) = test_app();
    let (status, json) = send(
        &app,
        Request::builder().uri("/api/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model_trained"], false);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let (_, app) = test_app();
    let (status, json) = send(
        &app,
        Request::builder().uri("/nope").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_missing_file_field() {
    let (_, app) = test_app();
    let (status, json) = send(
        &app,
        upload_request("/analyze", "attachment", "train.csv", LABELLED_CSV.as_bytes()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file part in the request");
}

#[tokio::test]
async fn test_non_multipart_request() {
    let (_, app) = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/analyze")
        .header("content-type", "text/csv")
        .body(Body::from(LABELLED_CSV))
        .unwrap();
    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file part in the request");
}

#[tokio::test]
async fn test_file_field_without_filename_is_not_a_file() {
    let (state, app) = test_app();
    let (status, json) = send(
        &app,
        form_value_request("/analyze", "file", LABELLED_CSV.as_bytes()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file part in the request");
    assert!(!state.is_model_trained().await);
}

#[tokio::test]
async fn test_no_file_selected() {
    let (_, app) = test_app();
    let (status, json) = send(
        &app,
        upload_request("/analyze", "file", "", LABELLED_CSV.as_bytes()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file selected");
}

#[tokio::test]
async fn test_empty_file() {
    let (state, app) = test_app();
    let (status, json) = send(&app, upload_request("/analyze", "file", "train.csv", b"")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Uploaded file is empty");
    assert!(!state.is_model_trained().await);
}

#[tokio::test]
async fn test_unlabelled_upload_never_trains() {
    let (state, app) = test_app();
    let (status, json) = send(
        &app,
        upload_request("/analyze", "file", "test.csv", UNLABELLED_CSV.as_bytes()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!state.is_model_trained().await);
    assert_eq!(json["predictions"].as_array().unwrap().len(), 0);
    assert_eq!(json["summary"]["total"], 0);
    assert_eq!(json["summary"]["rows"], 6);
    assert!(json["charts"]["sex_survival"].as_str().unwrap().len() > 0);
}

#[tokio::test]
async fn test_labelled_upload_trains_and_predicts() {
    let (state, app) = test_app();
    let (status, json) = send(
        &app,
        upload_request("/analyze", "file", "train.csv", LABELLED_CSV.as_bytes()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(state.is_model_trained().await);

    let predictions = json["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 14);
    for p in predictions {
        let outcome = p["Predicted_Outcome"].as_u64().unwrap();
        assert!(outcome == 0 || outcome == 1);
        let proba = p["Survival_Probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&proba));
    }
    assert_eq!(predictions[0]["PassengerId"], 1);
    assert_eq!(predictions[0]["Name"], "Braund, Mr. Owen Harris");

    let summary = &json["summary"];
    let total = summary["total"].as_u64().unwrap();
    let survived = summary["survived"].as_u64().unwrap();
    let deceased = summary["deceased"].as_u64().unwrap();
    assert_eq!(total, 14);
    assert_eq!(survived + deceased, total);
    assert_eq!(summary["model_trained"], true);
}

#[tokio::test]
async fn test_second_labelled_upload_does_not_retrain() {
    let (state, app) = test_app();
    let (status, _) = send(
        &app,
        upload_request("/analyze", "file", "train.csv", LABELLED_CSV.as_bytes()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let before = {
        let model = state.model.read().await;
        model.classifier().unwrap().model().coefficients.clone()
    };

    let (status, _) = send(
        &app,
        upload_request("/api/analyze", "file", "flipped.csv", FLIPPED_CSV.as_bytes()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let after = {
        let model = state.model.read().await;
        model.classifier().unwrap().model().coefficients.clone()
    };
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_unlabelled_upload_after_training_is_predicted() {
    let (_, app) = test_app();
    send(
        &app,
        upload_request("/analyze", "file", "train.csv", LABELLED_CSV.as_bytes()),
    )
    .await;

    let (status, json) = send(
        &app,
        upload_request("/analyze", "file", "test.csv", UNLABELLED_CSV.as_bytes()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predictions"].as_array().unwrap().len(), 6);
    assert_eq!(json["summary"]["total"], 6);
    assert_eq!(json["predictions"][0]["PassengerId"], 892);
}

#[tokio::test]
async fn test_prediction_records_capped() {
    let mut config = test_config();
    config.prediction_limit = 3;
    let state = Arc::new(AppState::new(config.clone()));
    let app = create_router(state, &config);

    let (status, json) = send(
        &app,
        upload_request("/analyze", "file", "train.csv", LABELLED_CSV.as_bytes()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predictions"].as_array().unwrap().len(), 3);
    assert_eq!(json["summary"]["total"], 14);
}

#[tokio::test]
async fn test_malformed_content_is_500() {
    let (state, app) = test_app();
    let garbage = [0xff_u8, 0xfe, 0x00, 0x9c, 0x80, 0x81];
    let (status, json) = send(&app, upload_request("/analyze", "file", "bad.csv", &garbage)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = json["error"].as_str().unwrap();
    assert!(message.starts_with("An error occurred on the server"));
    assert!(!state.is_model_trained().await);
}

#[tokio::test]
async fn test_missing_feature_column_is_500() {
    let (_, app) = test_app();
    let csv = "PassengerId,Survived,Pclass,Sex,Age\n1,0,3,male,22\n2,1,1,female,38\n";
    let (status, json) = send(&app, upload_request("/analyze", "file", "x.csv", csv.as_bytes())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("Fare"));
}

#[tokio::test]
async fn test_invalid_labels_is_500() {
    let (state, app) = test_app();
    let csv = "Survived,Pclass,Sex,Age,Fare\n0,3,male,22,7.25\n5,1,female,38,71.28\n";
    let (status, json) = send(&app, upload_request("/analyze", "file", "x.csv", csv.as_bytes())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!json["error"].as_str().unwrap().is_empty());
    assert!(!state.is_model_trained().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_labelled_uploads_train_once() {
    let (state, app) = test_app();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            let (name, csv) = if i % 2 == 0 {
                ("train.csv", LABELLED_CSV)
            } else {
                ("flipped.csv", FLIPPED_CSV)
            };
            tokio::spawn(async move {
                app.oneshot(upload_request("/analyze", "file", name, csv.as_bytes()))
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    // whichever upload won, the stored model is exactly one fit of it
    let stored = {
        let model = state.model.read().await;
        model.classifier().unwrap().model().coefficients.clone()
    };
    let single_fit = |csv: &str| {
        let mut fresh = ModelState::new();
        analyze_offline(csv.as_bytes(), &mut fresh, 100).unwrap();
        let coefficients = fresh.classifier().unwrap().model().coefficients.clone();
        coefficients
    };
    let labelled = single_fit(LABELLED_CSV);
    let flipped = single_fit(FLIPPED_CSV);
    assert!(stored == labelled || stored == flipped);
}
