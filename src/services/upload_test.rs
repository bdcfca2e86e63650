use super::*;
use crate::error::ErrorCode;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a, 0xff]), "0aff");
}

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

// =============================================================================
// sign_params
// =============================================================================

#[test]
fn signature_sorts_params_and_appends_secret() {
    let unsorted = [("timestamp", "1700000000".to_owned()), ("folder", "hotel_images".to_owned())];
    let sorted = [("folder", "hotel_images".to_owned()), ("timestamp", "1700000000".to_owned())];
    assert_eq!(sign_params(&unsorted, "secret"), sign_params(&sorted, "secret"));

    let mut hasher = Sha256::new();
    hasher.update(b"folder=hotel_images&timestamp=1700000000secret");
    assert_eq!(sign_params(&sorted, "secret"), bytes_to_hex(&hasher.finalize()));
}

#[test]
fn signature_depends_on_secret() {
    let params = [("timestamp", "1".to_owned())];
    let a = sign_params(&params, "one");
    assert_eq!(a.len(), 64);
    assert_ne!(a, sign_params(&params, "two"));
}

// =============================================================================
// parse_upload_response
// =============================================================================

#[test]
fn parse_success_extracts_secure_url() {
    let body = r#"{"public_id":"hotel_images/abc","secure_url":"https://res.cloudinary.com/x/abc.jpg"}"#;
    let uploaded = parse_upload_response(200, body).unwrap();
    assert_eq!(uploaded.secure_url, "https://res.cloudinary.com/x/abc.jpg");
}

#[test]
fn parse_missing_secure_url() {
    let err = parse_upload_response(200, r#"{"public_id":"abc"}"#).unwrap_err();
    assert!(matches!(err, UploadError::MissingSecureUrl));
    assert_eq!(err.to_string(), "Failed to get secure URL from Cloudinary");
}

#[test]
fn parse_error_surfaces_upstream_message() {
    let err = parse_upload_response(401, r#"{"error":{"message":"Invalid Signature"}}"#).unwrap_err();
    assert_eq!(err.to_string(), "Invalid Signature");
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!err.is_internal());
}

#[test]
fn parse_non_json_is_upstream_error() {
    assert!(matches!(parse_upload_response(502, "<html>"), Err(UploadError::Upstream(_))));
}

#[test]
fn upload_error_statuses() {
    assert_eq!(UploadError::NoFile.status(), StatusCode::BAD_REQUEST);
    assert_eq!(UploadError::NoFile.to_string(), "No file uploaded");
    assert_eq!(UploadError::NotConfigured.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(UploadError::HttpClientBuild("x".into()).is_internal());
}
