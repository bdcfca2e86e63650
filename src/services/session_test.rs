use super::*;

// =============================================================================
// bearer_token
// =============================================================================

#[test]
fn bearer_token_extracts_value() {
    assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
}

#[test]
fn bearer_token_scheme_is_case_insensitive() {
    assert_eq!(bearer_token("bearer abc123"), Some("abc123"));
    assert_eq!(bearer_token("BEARER   abc123  "), Some("abc123"));
}

#[test]
fn bearer_token_rejects_other_schemes() {
    assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
    assert_eq!(bearer_token("abc123"), None);
}

#[test]
fn bearer_token_rejects_empty_token() {
    assert_eq!(bearer_token("Bearer "), None);
    assert_eq!(bearer_token(""), None);
}

// =============================================================================
// SessionUser
// =============================================================================

#[test]
fn session_user_serialize_none_avatar() {
    let user = SessionUser {
        id: Uuid::nil(),
        full_name: "Ana Ruiz".into(),
        email: "ana@example.com".into(),
        avatar_url: None,
    };
    let json = serde_json::to_value(&user).unwrap();
    assert_eq!(json["full_name"], "Ana Ruiz");
    assert_eq!(json["email"], "ana@example.com");
    assert!(json["avatar_url"].is_null());
}
