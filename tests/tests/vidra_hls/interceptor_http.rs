//! Interceptor tests over a real HTTP server: the full
//! fetch-rewrite-respond loop, including the recursive variant → media
//! → key chain.

use axum::{Router, routing::get};
use url::Url;
use vidra::{
    hls::{
        InterceptError, InterceptorOptions, LoadOutcome, LoadingRequest,
        ResourceLoaderInterceptor, swap_scheme,
    },
    net::HttpClient,
};
use vidra_test_utils::{TestHttpServer, manifests};

fn router() -> Router {
    Router::new()
        .route("/live/index.m3u8", get(|| async { manifests::variant_playlist() }))
        .route("/live/low/index.m3u8", get(|| async { manifests::media_playlist() }))
        .route(
            "/live/high/index.m3u8",
            get(|| async { manifests::encrypted_media_playlist() }),
        )
}

fn options() -> InterceptorOptions {
    // The test server speaks plain HTTP.
    InterceptorOptions::default().with_transport_scheme("http".to_string())
}

fn interceptor() -> ResourceLoaderInterceptor<HttpClient> {
    ResourceLoaderInterceptor::new(HttpClient::default(), options())
}

/// The private-scheme URL for a path on the test server.
fn private_url(server: &TestHttpServer, path: &str) -> Url {
    swap_scheme(&server.url(path), "vidra").unwrap()
}

async fn fetch(
    interceptor: &ResourceLoaderInterceptor<HttpClient>,
    url: Url,
) -> Result<bytes::Bytes, InterceptError> {
    let (request, rx) = LoadingRequest::new(url);
    assert!(matches!(
        interceptor.intercept(request).await,
        LoadOutcome::Handled
    ));
    rx.await.unwrap()
}

#[tokio::test]
async fn variant_playlist_keeps_nested_references_interceptable() {
    let server = TestHttpServer::new(router()).await;
    let interceptor = interceptor();

    let body = fetch(&interceptor, private_url(&server, "/live/index.m3u8"))
        .await
        .unwrap();
    let text = std::str::from_utf8(&body).unwrap();

    let quality_urls: Vec<&str> = text
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .collect();
    assert_eq!(quality_urls.len(), 2);
    for quality_url in quality_urls {
        assert!(quality_url.starts_with("vidra://"));
        assert!(quality_url.ends_with("index.m3u8"));
    }
}

#[tokio::test]
async fn nested_media_playlist_resolves_through_a_second_interception() {
    let server = TestHttpServer::new(router()).await;
    let interceptor = interceptor();

    let variant = fetch(&interceptor, private_url(&server, "/live/index.m3u8"))
        .await
        .unwrap();
    let low_url = std::str::from_utf8(&variant)
        .unwrap()
        .lines()
        .find(|line| !line.starts_with('#') && !line.trim().is_empty())
        .unwrap()
        .to_string();

    // Feed the rewritten reference back in, as the item layer would.
    let media = fetch(&interceptor, Url::parse(&low_url).unwrap())
        .await
        .unwrap();
    let text = std::str::from_utf8(&media).unwrap();

    let segments: Vec<&str> = text
        .lines()
        .filter(|line| !line.starts_with('#') && !line.trim().is_empty())
        .collect();
    assert_eq!(segments.len(), 3);
    for segment in segments {
        assert!(segment.starts_with(&format!("http://{}", server.base_url().authority())));
        assert!(segment.ends_with(".ts"));
    }
}

#[tokio::test]
async fn encrypted_playlist_routes_its_key_back_through_the_private_scheme() {
    let server = TestHttpServer::new(router()).await;
    let interceptor = interceptor();

    let body = fetch(&interceptor, private_url(&server, "/live/high/index.m3u8"))
        .await
        .unwrap();
    let text = std::str::from_utf8(&body).unwrap();

    let key_line = text
        .lines()
        .find(|line| line.starts_with("#EXT-X-KEY"))
        .unwrap();
    assert!(key_line.contains("URI=\"vidra://"));
    assert!(key_line.contains("/live/high/enc.key\""));
    assert!(key_line.contains("IV=0x9c7db8778570d05c3f9ae7d1e05f3a29"));
}

#[tokio::test]
async fn key_fetch_fails_with_the_unimplemented_default_handler() {
    let server = TestHttpServer::new(router()).await;
    let interceptor = interceptor();

    let result = fetch(&interceptor, private_url(&server, "/live/high/enc.key")).await;
    assert!(matches!(
        result,
        Err(InterceptError::KeyHandlingUnimplemented)
    ));
}

#[tokio::test]
async fn missing_manifest_surfaces_the_http_status() {
    let server = TestHttpServer::new(router()).await;
    let interceptor = interceptor();

    let result = fetch(&interceptor, private_url(&server, "/live/missing.m3u8")).await;
    match result {
        Err(InterceptError::Net(err)) => assert_eq!(err.status_code(), Some(404)),
        other => panic!("expected a network error, got {other:?}"),
    }
}

#[tokio::test]
async fn http_scheme_requests_are_declined() {
    let server = TestHttpServer::new(router()).await;
    let interceptor = interceptor();

    let url = server.url("/live/index.m3u8");
    let (request, _rx) = LoadingRequest::new(url.clone());
    match interceptor.intercept(request).await {
        LoadOutcome::Declined(returned) => assert_eq!(returned.url, url),
        LoadOutcome::Handled => panic!("transport-scheme request must be declined"),
    }
}
