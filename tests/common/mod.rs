#![allow(dead_code)]

pub mod mock_backend;
pub mod multipart;

use report_assistant::config::AppConfig;
use report_assistant::server::AppState;
use std::time::Duration;

/// Config pointing the relay and the page at the given upstreams.
pub fn test_config(api_url: Option<String>, analysis_endpoint: Option<String>) -> AppConfig {
    AppConfig {
        api_url,
        analysis_endpoint,
        timeout_secs: Some(5),
        ..Default::default()
    }
}

/// Waits for the background analysis started by `/submit` to finish.
pub async fn wait_until_idle(state: &AppState) {
    for _ in 0..250 {
        if !state.page.session.lock().await.loading {
            return;
        }
        actix_web::rt::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("analysis still running after 5s");
}
