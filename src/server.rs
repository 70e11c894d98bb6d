use crate::config::AppConfig;
use crate::form::read_multipart;
use crate::page::PageState;
use crate::relay::{RelayError, RelayState};
use crate::submission::{AnalysisClient, Submission};
use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, HttpServer, get, post, web};

#[get("/health")]
pub async fn health(_req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok().body("Ok")
}

#[get("/")]
pub async fn index(page: web::Data<PageState>) -> Result<HttpResponse, actix_web::Error> {
    let html = page
        .render()
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[post("/submit")]
pub async fn submit(
    payload: Multipart,
    page: web::Data<PageState>,
) -> Result<HttpResponse, actix_web::Error> {
    let submission = Submission::from_parts(read_multipart(payload).await?);
    {
        let mut session = page.session.lock().await;
        session.text = submission.text.clone();
        session.guidelines_text = submission.guidelines_text.clone();
        session.begin_submission();
    }
    // the page shows the loading state until the analysis lands
    let page = page.into_inner();
    actix_web::rt::spawn(async move {
        let result = page.client.analyze(&submission).await;
        page.session.lock().await.finish_submission(result);
    });
    Ok(see_other("/"))
}

#[post("/messages/{index}/delete")]
pub async fn delete_message(
    path: web::Path<usize>,
    page: web::Data<PageState>,
) -> HttpResponse {
    let idx = path.into_inner();
    if page.session.lock().await.transcript.remove(idx).is_none() {
        log::debug!("No message at index {}", idx);
    }
    see_other("/")
}

#[post("/api/proxy")]
pub async fn proxy(
    payload: Multipart,
    relay: web::Data<RelayState>,
) -> Result<HttpResponse, actix_web::Error> {
    let parts = read_multipart(payload).await?;
    let resp = relay.forward_form(parts).await?;
    Ok(resp.into_json_response()?)
}

#[post("/proxy")]
pub async fn legacy_proxy(
    req: HttpRequest,
    body: web::Bytes,
    relay: web::Data<RelayState>,
) -> Result<HttpResponse, RelayError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.as_bytes());
    relay
        .forward_raw(content_type, body)
        .await?
        .into_json_response()
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Shared state for every worker.
#[derive(Clone)]
pub struct AppState {
    pub relay: web::Data<RelayState>,
    pub page: web::Data<PageState>,
    pub max_payload_bytes: usize,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let relay = RelayState::new(config)?;
        let client = AnalysisClient::new(relay.client.clone(), config.analysis_endpoint());
        let page = PageState::new(client)?;
        Ok(Self {
            relay: web::Data::new(relay),
            page: web::Data::new(page),
            max_payload_bytes: config.max_payload_bytes,
        })
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.relay.clone())
            .app_data(self.page.clone())
            .app_data(web::PayloadConfig::new(self.max_payload_bytes))
            .service(health)
            .service(index)
            .service(submit)
            .service(delete_message)
            .service(proxy)
            .service(legacy_proxy);
    }
}

pub async fn startup(config: AppConfig) -> anyhow::Result<()> {
    let app_state = AppState::new(&config)?;

    if config.api_url.is_none() {
        log::warn!("API_URL is not set; relayed requests will fail until it is configured");
    }
    log::info!("Starting server at {}:{}", config.host, config.port);

    HttpServer::new(move || {
        let state = app_state.clone();
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
