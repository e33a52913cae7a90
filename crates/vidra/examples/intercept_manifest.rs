//! Fetch and rewrite an HLS manifest through the interceptor.
//!
//! ```
//! cargo run -p vidra --example intercept_manifest [URL]
//! ```
//!
//! The URL may use the private `vidra://` scheme or plain `https://`
//! (which gets swapped before interception).

use std::{env::args, error::Error};

use tracing::{info, metadata::LevelFilter};
use tracing_subscriber::EnvFilter;
use url::Url;
use vidra::{
    hls::{LoadOutcome, LoadingRequest, swap_scheme},
    prelude::*,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::default()
                .add_directive("vidra_hls=debug".parse()?)
                .add_directive("vidra_net=warn".parse()?)
                .add_directive(LevelFilter::INFO.into()),
        )
        .with_line_number(false)
        .with_file(false)
        .init();

    let url: Url = args()
        .nth(1)
        .unwrap_or_else(|| "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8".to_string())
        .parse()?;
    let url = if url.scheme() == "vidra" {
        url
    } else {
        swap_scheme(&url, "vidra")?
    };

    info!("Intercepting manifest load: {url}");

    let interceptor =
        ResourceLoaderInterceptor::new(HttpClient::default(), InterceptorOptions::default());
    let (request, rx) = LoadingRequest::new(url);

    match interceptor.intercept(request).await {
        LoadOutcome::Handled => {
            let body = rx.await??;
            println!("{}", String::from_utf8_lossy(&body));
        }
        LoadOutcome::Declined(request) => {
            info!("Request declined (foreign scheme): {}", request.url);
        }
    }

    Ok(())
}
