//! Cloudinary client against a local HTTP fake.

use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use vidsqueeze_cloud::cloudinary::{CloudinaryClient, CloudinaryConfig, SignatureAlgorithm};
use vidsqueeze_cloud::media::{
    DestroyOutcome, MediaError, MediaProvider, ResourceType, UploadFile, UploadOptions,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn client_for(server: &MockServer) -> CloudinaryClient {
    CloudinaryClient::new(CloudinaryConfig {
        cloud_name: "demo".to_string(),
        api_key: "key-123".to_string(),
        api_secret: "secret".to_string(),
        api_base_url: server.uri(),
        signature_algorithm: SignatureAlgorithm::Sha1,
    })
}

fn clip() -> UploadFile {
    UploadFile {
        file_name: "clip.mov".to_string(),
        content_type: Some("video/quicktime".to_string()),
        bytes: vec![0u8; 1024],
    }
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_returns_asset_descriptor() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/video/upload"))
        .and(body_string_contains("video-uploads"))
        .and(body_string_contains("f_mp4,q_auto"))
        .and(body_string_contains("key-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": "video-uploads/abc",
            "bytes": 77414,
            "duration": 38.2,
            "secure_url": "https://res.cloudinary.com/demo/video/upload/video-uploads/abc.mp4"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let asset = client_for(&server)
        .upload(clip(), &UploadOptions::video())
        .await
        .unwrap();

    assert_eq!(asset.public_id, "video-uploads/abc");
    assert_eq!(asset.bytes, 77414);
    assert_eq!(asset.duration, Some(38.2));
}

#[tokio::test]
async fn image_upload_has_no_duration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/image/upload"))
        .and(body_string_contains("image-uploads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "public_id": "image-uploads/pic",
            "bytes": 2048
        })))
        .mount(&server)
        .await;

    let asset = client_for(&server)
        .upload(clip(), &UploadOptions::image())
        .await
        .unwrap();

    assert_eq!(asset.public_id, "image-uploads/pic");
    assert_eq!(asset.duration, None);
}

#[tokio::test]
async fn upload_api_error_carries_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/video/upload"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": { "message": "Invalid Signature" } })),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload(clip(), &UploadOptions::video())
        .await
        .unwrap_err();

    assert_matches!(err, MediaError::Api { status: 401, ref message } if message == "Invalid Signature");
}

#[tokio::test]
async fn upload_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/video/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(5))
                .set_body_json(json!({ "public_id": "late", "bytes": 1 })),
        )
        .mount(&server)
        .await;

    let mut options = UploadOptions::video();
    options.timeout = Duration::from_millis(200);

    let err = client_for(&server).upload(clip(), &options).await.unwrap_err();
    assert_matches!(err, MediaError::Timeout);
}

#[tokio::test]
async fn upload_rejects_empty_public_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "public_id": "", "bytes": 1 })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload(clip(), &UploadOptions::video())
        .await
        .unwrap_err();
    assert_matches!(err, MediaError::InvalidResponse(_));
}

// ---------------------------------------------------------------------------
// Destroy
// ---------------------------------------------------------------------------

async fn destroy_with_result(result: &str) -> DestroyOutcome {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/video/destroy"))
        .and(body_string_contains("public_id=video-uploads%2Fabc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": result })))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .destroy("video-uploads/abc", ResourceType::Video)
        .await
        .unwrap()
}

#[tokio::test]
async fn destroy_ok() {
    assert_eq!(destroy_with_result("ok").await, DestroyOutcome::Deleted);
}

#[tokio::test]
async fn destroy_not_found() {
    assert_eq!(destroy_with_result("not found").await, DestroyOutcome::NotFound);
}

#[tokio::test]
async fn destroy_other_result_is_kept() {
    assert_eq!(
        destroy_with_result("error").await,
        DestroyOutcome::Other("error".to_string())
    );
}

#[tokio::test]
async fn destroy_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1_1/demo/video/destroy"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .destroy("video-uploads/abc", ResourceType::Video)
        .await
        .unwrap_err();
    assert_matches!(err, MediaError::Api { status: 500, .. });
}
