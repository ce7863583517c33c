use super::*;
use axum::http::HeaderValue;

fn teacher() -> SessionUser {
    SessionUser {
        user_id: 3,
        name: "Anna".to_string(),
        role: Role::Teacher,
    }
}

#[test]
fn test_create_get_remove() {
    let store = SessionStore::new(Duration::from_secs(60));
    let token = store.create(teacher());

    assert_eq!(token.len(), 32);
    assert_eq!(store.get(&token), Some(teacher()));
    assert!(store.get("not-a-token").is_none());

    store.remove(&token);
    assert!(store.get(&token).is_none());
}

#[test]
fn test_tokens_are_unique() {
    let store = SessionStore::new(Duration::from_secs(60));
    let a = store.create(teacher());
    let b = store.create(teacher());
    assert_ne!(a, b);
}

#[test]
fn test_idle_sessions_expire() {
    let store = SessionStore::new(Duration::from_millis(50));
    let token = store.create(teacher());
    std::thread::sleep(Duration::from_millis(150));
    assert!(store.get(&token).is_none());
}

#[test]
fn test_cookie_attributes() {
    let store = SessionStore::new(Duration::from_secs(3600));
    let cookie = store.cookie("abc");
    assert!(cookie.starts_with("riza_session=abc;"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Max-Age=3600"));
    assert!(SessionStore::clear_cookie().contains("Max-Age=0"));
}

#[test]
fn test_token_from_headers() {
    let mut headers = HeaderMap::new();
    assert!(token_from_headers(&headers).is_none());

    headers.insert(COOKIE, HeaderValue::from_static("theme=dark; riza_session=tok123; lang=it"));
    assert_eq!(token_from_headers(&headers).as_deref(), Some("tok123"));

    let mut empty = HeaderMap::new();
    empty.insert(COOKIE, HeaderValue::from_static("riza_session="));
    assert!(token_from_headers(&empty).is_none());

    let mut split = HeaderMap::new();
    split.append(COOKIE, HeaderValue::from_static("theme=dark"));
    split.append(COOKIE, HeaderValue::from_static("riza_session=second"));
    assert_eq!(token_from_headers(&split).as_deref(), Some("second"));
}

#[test]
fn test_session_user_from_account() {
    let user = User {
        id: 9,
        name: "Root".to_string(),
        email: "root@school.it".to_string(),
        role: Role::Admin,
        status: crate::accounts::Status::Active,
        created_at: "2026-01-01 00:00:00".to_string(),
    };
    let session = SessionUser::from(&user);
    assert_eq!(session.user_id, 9);
    assert!(session.is_admin());
}
