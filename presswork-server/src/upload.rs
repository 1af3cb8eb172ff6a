//! Request payload reading and file upload handling
//!
//! Create/update endpoints accept the same payload either as a JSON body or
//! as multipart form data (forms serialize structured fields as strings; the
//! normalizer downstream copes with both). Uploaded images are written under
//! the statically-served uploads tree; resumes stay in memory and are stored
//! as database blobs.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use presswork_common::defaults;
use presswork_common::{Error, Result};
use serde_json::{Map, Value};
use std::path::Path;
use uuid::Uuid;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// File handling applied to the payload's single file field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRule {
    /// `image` field, ≤10MB, written to disk
    BlogImage,
    /// `avatar` field, ≤3MB, written to disk
    Avatar,
    /// `resume` field, ≤5MB, kept in memory
    Resume,
}

impl FileRule {
    fn field_name(&self) -> &'static str {
        match self {
            FileRule::BlogImage => "image",
            FileRule::Avatar => "avatar",
            FileRule::Resume => "resume",
        }
    }

    fn max_bytes(&self) -> usize {
        match self {
            FileRule::BlogImage => defaults::MAX_BLOG_IMAGE_BYTES,
            FileRule::Avatar => defaults::MAX_AVATAR_BYTES,
            FileRule::Resume => defaults::MAX_RESUME_BYTES,
        }
    }

    fn disk_prefix(&self) -> &'static str {
        match self {
            FileRule::BlogImage => "blog",
            FileRule::Avatar => "avatar",
            FileRule::Resume => "resume",
        }
    }
}

/// Resume file held for blob storage
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Parsed request payload: scalar fields plus the optional file
#[derive(Debug, Default)]
pub struct FormPayload {
    pub fields: Map<String, Value>,
    /// Public path of a stored image upload (e.g. /uploads/blog-images/...)
    pub file_path: Option<String>,
    pub resume: Option<ResumeUpload>,
}

impl FormPayload {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field as a trimmed string; empty and non-string values yield None
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

fn extension_of(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

/// Read a request payload as either multipart form data or a JSON object,
/// applying the given file rule to the payload's file field.
pub async fn read_request_payload(
    req: Request,
    uploads_dir: &Path,
    rule: FileRule,
) -> Result<FormPayload> {
    if is_multipart(&req) {
        read_multipart(req, uploads_dir, rule).await
    } else {
        let fields = read_json_object(req).await?;
        Ok(FormPayload {
            fields,
            ..FormPayload::default()
        })
    }
}

/// Read a JSON body into a field map. An empty body is an empty map.
pub async fn read_json_object(req: Request) -> Result<Map<String, Value>> {
    let bytes = axum::body::to_bytes(req.into_body(), crate::MAX_BODY_BYTES)
        .await
        .map_err(|e| Error::InvalidInput(format!("Failed to read request body: {}", e)))?;

    if bytes.is_empty() {
        return Ok(Map::new());
    }

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| Error::InvalidInput(format!("Invalid JSON body: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::InvalidInput(
            "Expected a JSON object body".to_string(),
        )),
    }
}

async fn read_multipart(req: Request, uploads_dir: &Path, rule: FileRule) -> Result<FormPayload> {
    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| Error::InvalidInput(format!("Invalid multipart payload: {}", e)))?;

    let mut payload = FormPayload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::InvalidInput(format!("Invalid multipart payload: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == rule.field_name() && field.file_name().is_some() {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| Error::InvalidInput(format!("Failed to read upload: {}", e)))?;

            if data.len() > rule.max_bytes() {
                return Err(Error::InvalidInput(format!(
                    "{} exceeds the {}MB size limit",
                    rule.field_name(),
                    rule.max_bytes() / (1024 * 1024)
                )));
            }

            match rule {
                FileRule::BlogImage | FileRule::Avatar => {
                    let path =
                        store_image(uploads_dir, rule, &filename, &content_type, &data).await?;
                    payload.file_path = Some(path);
                }
                FileRule::Resume => {
                    let ext = extension_of(&filename);
                    if !RESUME_EXTENSIONS.contains(&ext.as_str()) {
                        return Err(Error::InvalidInput(
                            "Resume must be a PDF or Word document".to_string(),
                        ));
                    }
                    payload.resume = Some(ResumeUpload {
                        data: data.to_vec(),
                        content_type: if content_type.is_empty() {
                            "application/octet-stream".to_string()
                        } else {
                            content_type
                        },
                        filename,
                    });
                }
            }
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| Error::InvalidInput(format!("Invalid multipart field: {}", e)))?;
            payload.fields.insert(name, Value::String(text));
        }
    }

    Ok(payload)
}

/// Validate and persist an image upload, returning its public path
async fn store_image(
    uploads_dir: &Path,
    rule: FileRule,
    original_name: &str,
    content_type: &str,
    data: &[u8],
) -> Result<String> {
    let ext = extension_of(original_name);
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) || !content_type.starts_with("image/") {
        return Err(Error::InvalidInput(
            "Only image files are allowed".to_string(),
        ));
    }

    let stored_name = format!("{}-{}.{}", rule.disk_prefix(), Uuid::new_v4().simple(), ext);
    let dir = uploads_dir.join("blog-images");
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join(&stored_name), data).await?;

    Ok(format!("/uploads/blog-images/{}", stored_name))
}
