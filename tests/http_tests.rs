//! Tests for the HTTP boundary
//!
//! Drives the router in-process with hand-built multipart bodies and checks
//! status codes, JSON bodies and document headers.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod fixtures;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use fixtures::{roster_csv, roster_xlsx};
use seatplan::server::{build_router, ServerConfig};

const BOUNDARY: &str = "seatplan-test-boundary";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
struct Form {
    body: Vec<u8>,
}

impl Form {
    fn new() -> Self {
        Self::default()
    }

    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    fn file(mut self, name: &str, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn manual(self, rows: u32, columns: u32, per_seat: u32) -> Self {
        self.text("manualConfig", "true")
            .text("rows", &rows.to_string())
            .text("columns", &columns.to_string())
            .text("studentsPerSeat", &per_seat.to_string())
    }

    fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

fn app() -> Router {
    build_router(&ServerConfig::default())
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, body.to_vec())
}

async fn send_json(request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send(app(), request).await;
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", String::from_utf8_lossy(&body)));
    (status, json)
}

// ============================================================================
// Status and templates
// ============================================================================

#[tokio::test]
async fn test_status() {
    let request = Request::get("/api/status").body(Body::empty()).unwrap();
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_template_download_is_readable() {
    let request = Request::get("/assets/templates/students.xlsx")
        .body(Body::empty())
        .unwrap();
    let (status, headers, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("students.xlsx"));
    let wb = seatplan::parser::parse(&body).unwrap();
    assert_eq!(wb.sheets[0].cell_text(0, 0), Some("Roll No"));
}

#[tokio::test]
async fn test_unknown_template_is_not_found() {
    let request = Request::get("/assets/templates/invigilators.xlsx")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("invigilators.xlsx"));
}

// ============================================================================
// Preview
// ============================================================================

#[tokio::test]
async fn test_preview_manual_layout_without_students() {
    let request = Form::new().manual(2, 3, 1).into_request("/api/seating/preview");
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["dimensions"]["rows"], 2);
    assert_eq!(json["dimensions"]["columns"], 3);
    assert_eq!(json["preview"].as_array().unwrap().len(), 6);
    assert!(json["unassignedStudents"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_preview_manual_config_ignores_placeholder_file() {
    let students = roster_csv(&[("2", "Bo", "X"), ("1", "Ann", "X"), ("3", "Cy", "X")]);
    let request = Form::new()
        .file("roomMatrixFile", "dummy.xlsx", b"")
        .file("studentsFile", "students.csv", students.as_bytes())
        .text("allocationType", "roll")
        .manual(1, 2, 1)
        .into_request("/api/seating/preview");
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["preview"], serde_json::json!(["1", "2"]));
    assert_eq!(
        json["unassignedStudents"],
        serde_json::json!([{"rollNo": "3", "name": "Cy", "class": "X"}])
    );
    assert_eq!(json["rooms"][0]["roomNo"], "Manual");
}

#[tokio::test]
async fn test_preview_reports_row_errors_and_warnings() {
    let students = "Roll No,Name,Class\n1,Ann,X\n,Nobody,X\n1,Dup,X\n";
    let matrix = "Room No,Rows,Columns,Total Capacity\nA,2,2,5\n";
    let request = Form::new()
        .file("studentsFile", "students.csv", students.as_bytes())
        .file("roomMatrixFile", "rooms.csv", matrix.as_bytes())
        .into_request("/api/seating/preview");
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["rowErrors"][0]["row"], 3);
    let kinds: Vec<&str> = json["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["kind"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["capacityMismatch", "duplicateRollNo"]);
}

#[tokio::test]
async fn test_preview_requires_room_source() {
    let request = Form::new()
        .text("allocationType", "roll")
        .into_request("/api/seating/preview");
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("roomMatrixFile"));
}

#[tokio::test]
async fn test_preview_bad_manual_numbers() {
    let request = Form::new()
        .text("manualConfig", "true")
        .text("rows", "three")
        .text("columns", "2")
        .text("studentsPerSeat", "1")
        .into_request("/api/seating/preview");
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("rows"));
}

#[tokio::test]
async fn test_preview_bad_allocation_type() {
    let request = Form::new()
        .manual(1, 1, 1)
        .text("allocationType", "random")
        .into_request("/api/seating/preview");
    let (status, _) = send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preview_corrupt_upload_is_bad_request() {
    let request = Form::new()
        .file("roomMatrixFile", "rooms.xlsx", b"PK\x03\x04garbage")
        .into_request("/api/seating/preview");
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("could not read"));
}

#[tokio::test]
async fn test_preview_missing_columns_is_unprocessable() {
    let request = Form::new()
        .file("roomMatrixFile", "rooms.csv", b"Room No,Rows\nA,2\n")
        .into_request("/api/seating/preview");
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("Columns"));
}

#[tokio::test]
async fn test_non_multipart_body_is_json_error() {
    let request = Request::post("/api/seating/preview")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

// ============================================================================
// Generate
// ============================================================================

#[tokio::test]
async fn test_generate_returns_pdf_attachment() {
    let students = roster_xlsx(&[("1", "Ann", "X"), ("2", "Bo", "X"), ("3", "Cy", "X")]);
    let request = Form::new()
        .file("studentsFile", "students.xlsx", &students)
        .text("allocationType", "alphabetical")
        .manual(1, 2, 1)
        .into_request("/api/seating/generate");
    let (status, headers, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"seating_chart.pdf\""
    );
    assert_eq!(headers["x-unassigned-count"], "1");
    assert_eq!(headers["x-warning-count"], "0");
    assert_eq!(headers["x-row-error-count"], "0");
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_generate_reports_diagnostic_counts() {
    let students = roster_csv(&[("1", "Ann", "X"), ("", "Nobody", "X"), ("1", "Ann", "Y")]);
    let request = Form::new()
        .file("studentsFile", "students.csv", students.as_bytes())
        .text("allocationType", "roll")
        .manual(2, 2, 1)
        .into_request("/api/seating/generate");
    let (status, headers, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["x-unassigned-count"], "0");
    assert_eq!(headers["x-warning-count"], "1");
    assert_eq!(headers["x-row-error-count"], "1");
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_generate_requires_students_file() {
    let request = Form::new()
        .text("allocationType", "roll")
        .manual(1, 1, 1)
        .into_request("/api/seating/generate");
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("studentsFile"));
}

#[tokio::test]
async fn test_generate_requires_allocation_type() {
    let students = roster_csv(&[("1", "Ann", "X")]);
    let request = Form::new()
        .file("studentsFile", "students.csv", students.as_bytes())
        .manual(1, 1, 1)
        .into_request("/api/seating/generate");
    let (status, json) = send_json(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("allocationType"));
}

#[tokio::test]
async fn test_generate_without_valid_students_is_unprocessable() {
    let students = "Roll No,Name,Class\n,,X\n";
    let request = Form::new()
        .file("studentsFile", "students.csv", students.as_bytes())
        .text("allocationType", "roll")
        .manual(1, 1, 1)
        .into_request("/api/seating/generate");
    let (status, _) = send_json(request).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Middleware
// ============================================================================

#[tokio::test]
async fn test_cors_headers_follow_config() {
    let request = || {
        Request::get("/api/status")
            .header(header::ORIGIN, "http://example.test")
            .body(Body::empty())
            .unwrap()
    };
    let (_, headers, _) = send(app(), request()).await;
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let exposed = headers[header::ACCESS_CONTROL_EXPOSE_HEADERS].to_str().unwrap();
    for name in ["content-disposition", "x-unassigned-count", "x-warning-count", "x-row-error-count"] {
        assert!(exposed.contains(name), "{exposed}");
    }

    let closed = build_router(&ServerConfig {
        cors: false,
        ..ServerConfig::default()
    });
    let (_, headers, _) = send(closed, request()).await;
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let small = build_router(&ServerConfig {
        max_upload_bytes: 256,
        ..ServerConfig::default()
    });
    let students = roster_csv(&[("1", "Ann", "X"); 64]);
    let request = Form::new()
        .file("studentsFile", "students.csv", students.as_bytes())
        .manual(1, 1, 1)
        .into_request("/api/seating/preview");
    let (status, _, body) = send(small, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].is_string());
}
