use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::routing::get;
use tower::ServiceExt;

use crate::routes::guarded;

fn app() -> Router {
    guarded(
        Router::new()
            .route("/dashboard", get(|| async { "dashboard" }))
            .route("/dashboard/settings", get(|| async { "settings" }))
            .route("/dashboards", get(|| async { "lookalike" }))
            .route("/sign-in", get(|| async { "sign-in" })),
    )
}

async fn send(uri: &str, cookie: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

fn location(resp: &axum::response::Response) -> &str {
    resp.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn protected_without_cookie_redirects_to_sign_in() {
    let resp = send("/dashboard", None).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&resp),
        "/sign-in?error=Please+sign+in+to+access+this+page&redirect=%2Fdashboard"
    );
}

#[tokio::test]
async fn protected_sub_path_keeps_full_return_path() {
    let resp = send("/dashboard/settings", None).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
    assert!(location(&resp).ends_with("&redirect=%2Fdashboard%2Fsettings"));
}

#[tokio::test]
async fn protected_with_cookie_passes_through() {
    let resp = send("/dashboard", Some("theme=dark; token=tok123")).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_token_cookie_is_rejected() {
    let resp = send("/dashboard", Some("token=")).await;

    assert_eq!(resp.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn unprotected_paths_pass_without_cookie() {
    assert_eq!(send("/sign-in", None).await.status(), StatusCode::OK);
    assert_eq!(send("/dashboards", None).await.status(), StatusCode::OK);
}
