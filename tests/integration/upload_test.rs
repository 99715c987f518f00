//! Integration tests for local and cloud image uploads.

use std::sync::Arc;

use http::StatusCode;

use crate::helpers::{Part, StubImageHost, TestApp, multipart_body};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

#[tokio::test]
async fn local_upload_writes_file_and_serves_it() {
    let app = TestApp::new().await;

    let body = multipart_body(&[
        Part::Text {
            name: "img",
            value: "cover.png",
        },
        Part::File {
            name: "file",
            file_name: "original.png",
            content_type: "image/png",
            data: PNG,
        },
    ]);
    let response = app.multipart("/api/upload", body).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["url"], "cover.png");

    let on_disk = std::fs::read(app.images.path().join("cover.png")).expect("stored file");
    assert_eq!(on_disk, PNG);

    let served = app.request("GET", "/images/cover.png", None, None).await;
    assert_eq!(served.status, StatusCode::OK);
    assert_eq!(served.bytes, PNG);
}

#[tokio::test]
async fn local_upload_falls_back_to_original_name() {
    let app = TestApp::new().await;

    let body = multipart_body(&[Part::File {
        name: "file",
        file_name: "original.png",
        content_type: "image/png",
        data: PNG,
    }]);
    let response = app.multipart("/api/upload", body).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["url"], "original.png");
}

#[tokio::test]
async fn local_upload_rejects_path_traversal() {
    let app = TestApp::new().await;

    for name in ["../escape.png", "nested/x.png", ".."] {
        let body = multipart_body(&[
            Part::Text { name: "img", value: name },
            Part::File {
                name: "file",
                file_name: "x.png",
                content_type: "image/png",
                data: PNG,
            },
        ]);
        let response = app.multipart("/api/upload", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "name {name}");
    }

    let parent = app.images.path().parent().expect("temp parent");
    assert!(!parent.join("escape.png").exists());
}

#[tokio::test]
async fn local_upload_without_file_is_400() {
    let app = TestApp::new().await;

    let body = multipart_body(&[Part::Text {
        name: "img",
        value: "cover.png",
    }]);
    let response = app.multipart("/api/upload", body).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn missing_image_is_422() {
    let app = TestApp::with_cloud(Arc::new(StubImageHost)).await;

    let body = multipart_body(&[Part::Text {
        name: "caption",
        value: "no file attached",
    }]);
    let response = app.multipart("/api/cloud-upload", body).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json()["message"], "Image is not presented!");
}

#[tokio::test]
async fn cloud_upload_rejects_oversized_image() {
    let app = TestApp::with_cloud(Arc::new(StubImageHost)).await;
    let big = vec![0u8; 1_000_001];

    let body = multipart_body(&[Part::File {
        name: "file",
        file_name: "big.png",
        content_type: "image/png",
        data: &big,
    }]);
    let response = app.multipart("/api/cloud-upload", body).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json()["message"],
        "File size cannot be larger than 1MB!"
    );
}

#[tokio::test]
async fn cloud_upload_rejects_unsupported_type() {
    let app = TestApp::with_cloud(Arc::new(StubImageHost)).await;

    let body = multipart_body(&[Part::File {
        name: "file",
        file_name: "anim.gif",
        content_type: "image/gif",
        data: b"GIF89a",
    }]);
    let response = app.multipart("/api/cloud-upload", body).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json()["message"], "Not supported file type!");
}

#[tokio::test]
async fn cloud_upload_returns_host_url() {
    let app = TestApp::with_cloud(Arc::new(StubImageHost)).await;

    let body = multipart_body(&[Part::File {
        name: "file",
        file_name: "cat.jpg",
        content_type: "image/jpeg",
        data: b"\xff\xd8\xff\xe0jpeg",
    }]);
    let response = app.multipart("/api/cloud-upload", body).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["url"], "https://cdn.test/cat.jpg");
}

#[tokio::test]
async fn cloud_host_failure_is_422_with_message() {
    // No credentials configured: the real host refuses before any request.
    let app = TestApp::new().await;

    let body = multipart_body(&[Part::File {
        name: "file",
        file_name: "cat.png",
        content_type: "image/png",
        data: PNG,
    }]);
    let response = app.multipart("/api/cloud-upload", body).await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.json()["message"],
        "Cloud image host is not configured"
    );
}
