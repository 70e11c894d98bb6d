use actix_multipart::Multipart;
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, post, web};
use report_assistant::form::read_multipart;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned analysis in the shape the backend's `/analyze` returns.
#[allow(dead_code)]
pub fn sample_analysis() -> Value {
    json!({
        "success": true,
        "data": {
            "company_name": "TechFlow Solutions",
            "report_type": "Quarterly Performance Report",
            "year": "Q3 2024",
            "important_metrics": {
                "Total Revenue": "$12.4M",
                "Customer Base": "45,000 users",
                "Monthly Growth": "8.2%"
            },
            "summary": "TechFlow Solutions reported strong Q3 2024 performance.",
            "review": "The report demonstrates solid business fundamentals.",
            "processing_time": 2.5
        },
        "meta": {
            "processing_time_seconds": 2.5,
            "has_guidelines": true
        }
    })
}

#[allow(dead_code)]
pub fn error_analysis() -> Value {
    json!({
        "success": false,
        "error": "Report content too short for meaningful analysis"
    })
}

#[derive(Default)]
struct Hits(AtomicUsize);

#[post("/analyze")]
async fn analyze(hits: web::Data<Hits>) -> HttpResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(sample_analysis())
}

/// Same reply as `/analyze`, after a delay long enough to observe loading.
#[post("/slow")]
async fn slow(hits: web::Data<Hits>) -> HttpResponse {
    actix_web::rt::time::sleep(std::time::Duration::from_millis(500)).await;
    hits.0.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(sample_analysis())
}

#[post("/error")]
async fn error(hits: web::Data<Hits>) -> HttpResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    HttpResponse::BadRequest().json(error_analysis())
}

/// Fields typed differently from what the backend normally sends.
#[post("/loose")]
async fn loose() -> HttpResponse {
    HttpResponse::Ok().json(json!({"success": null, "error": {"code": 1}}))
}

#[post("/html")]
async fn html() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html")
        .body("<html>Wrong Site!</html>")
}

/// Reports every multipart field it received.
#[post("/echo")]
async fn echo(payload: Multipart) -> Result<HttpResponse, actix_web::Error> {
    let parts = read_multipart(payload).await?;
    let received: Vec<Value> = parts
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "file_name": p.file_name,
                "content_type": p.content_type,
                "len": p.data.len(),
            })
        })
        .collect();
    Ok(HttpResponse::Ok().json(json!({ "success": true, "received": received })))
}

/// Reports the headers and body it saw.
#[post("/raw")]
async fn raw(req: HttpRequest, body: web::Bytes) -> HttpResponse {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    HttpResponse::Ok().json(json!({
        "content_type": header("content-type"),
        "x_forwarded_secret": header("x-forwarded-secret"),
        "body": String::from_utf8_lossy(&body),
    }))
}

pub struct MockBackend {
    pub base_url: String,
    hits: web::Data<Hits>,
    handle: ServerHandle,
}

#[allow(dead_code)]
impl MockBackend {
    pub async fn start() -> std::io::Result<Self> {
        let hits = web::Data::new(Hits::default());
        let app_hits = hits.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_hits.clone())
                .service(analyze)
                .service(slow)
                .service(error)
                .service(loose)
                .service(html)
                .service(echo)
                .service(raw)
        })
        .workers(1)
        .bind(("127.0.0.1", 0))?;
        let port = server.addrs()[0].port();
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            hits,
            handle,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Requests served by `/analyze`, `/slow` and `/error`.
    pub fn hits(&self) -> usize {
        self.hits.0.load(Ordering::SeqCst)
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}
