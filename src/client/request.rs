use http::Method;
use serde_json::Value;
use std::path::Path;

use crate::error::{AppError, Result};

/// A request that can be sent more than once.
///
/// The refresh interceptor replays the original request after renewing the
/// access token, so bodies are kept as plain data and turned into a reqwest
/// body on every attempt.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartForm),
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn query_pairs(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

#[derive(Debug, Clone)]
enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        upload: FileUpload,
    },
}

/// File attached to a multipart form.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::BadRequest(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self {
            content_type: content_type_for(&file_name),
            file_name,
            bytes,
        })
    }
}

fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_or_octet_stream()
        .to_string()
}

/// Multipart body kept as data so it can be rebuilt for a retry.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push_text(name, value);
        self
    }

    pub fn push_text(&mut self, name: impl Into<String>, value: impl ToString) {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.to_string(),
        });
    }

    pub fn push_file(&mut self, name: impl Into<String>, upload: FileUpload) {
        self.parts.push(FormPart::File {
            name: name.into(),
            upload,
        });
    }

    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            FormPart::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.parts
            .iter()
            .any(|part| matches!(part, FormPart::File { name: n, .. } if n == name))
    }

    pub fn build(&self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::File { name, upload } => {
                    let file = reqwest::multipart::Part::bytes(upload.bytes.clone())
                        .file_name(upload.file_name.clone())
                        .mime_str(&upload.content_type)?;
                    form.part(name.clone(), file)
                }
            };
        }
        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_image_types() {
        assert_eq!(content_type_for("logo.PNG"), "image/png");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("banner.webp"), "image/webp");
        assert_eq!(content_type_for("scan.bmp"), "image/bmp");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }

    #[test]
    fn form_lookup() {
        let mut form = MultipartForm::new().text("name", "Lenses").text("is_active", 1);
        form.push_file(
            "image",
            FileUpload {
                file_name: "a.png".into(),
                content_type: "image/png".into(),
                bytes: vec![1, 2, 3],
            },
        );

        assert_eq!(form.text_value("is_active"), Some("1"));
        assert!(form.has_file("image"));
        assert!(!form.has_file("logo"));
        assert!(form.build().is_ok());
    }

    #[test]
    fn reads_upload_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banner.webp");
        std::fs::write(&path, b"RIFF").unwrap();

        let upload = FileUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "banner.webp");
        assert_eq!(upload.content_type, "image/webp");
        assert_eq!(upload.bytes, b"RIFF");

        assert!(FileUpload::from_path(dir.path().join("missing.png")).is_err());
    }
}
