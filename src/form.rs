use actix_multipart::Multipart;
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;

/// One field of an inbound multipart body, fully buffered.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FormPart {
    pub fn is_file(&self) -> bool {
        self.file_name.is_some()
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// Drains a multipart body. File inputs submitted without a selected file
/// (empty file name, empty body) are dropped.
pub async fn read_multipart(mut payload: Multipart) -> Result<Vec<FormPart>, actix_web::Error> {
    let mut parts = Vec::new();
    while let Some(mut field) = payload.try_next().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.to_string());

        let mut data = BytesMut::new();
        while let Some(chunk) = field.try_next().await? {
            data.extend_from_slice(&chunk);
        }

        if file_name.as_deref() == Some("") && data.is_empty() {
            log::debug!("Skipping empty file field {}", name);
            continue;
        }
        parts.push(FormPart {
            name,
            file_name,
            content_type,
            data: data.freeze(),
        });
    }
    Ok(parts)
}
