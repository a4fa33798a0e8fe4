use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use reqwest::multipart::{Form, Part};
use shared::protocol::{ACCEPTANCE_CRITERIA_FIELD, FILE_FIELD, USER_STORY_FIELD};

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileField {
    pub name: String,
    pub path: PathBuf,
}

/// Current state of the review form: text fields plus at most one file.
///
/// The file is only referenced by path; its bytes are read when a submission
/// takes a [`ReviewForm::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct ReviewForm {
    fields: BTreeMap<String, String>,
    file: Option<FileField>,
}

impl ReviewForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form with the fields the review endpoint declares.
    pub fn review(
        file: Option<PathBuf>,
        acceptance_criteria: impl Into<String>,
        user_story: impl Into<String>,
    ) -> Self {
        let mut form = Self::new()
            .with_field(ACCEPTANCE_CRITERIA_FIELD, acceptance_criteria)
            .with_field(USER_STORY_FIELD, user_story);
        if let Some(path) = file {
            form.attach_file(FILE_FIELD, path);
        }
        form
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn attach_file(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        self.file = Some(FileField {
            name: name.into(),
            path: path.into(),
        });
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self) -> Option<&FileField> {
        self.file.as_ref()
    }

    /// Captures the form as it is right now, reading the attached file.
    pub async fn snapshot(&self) -> Result<FormPayload> {
        let file = match &self.file {
            Some(field) => Some(FilePart::read(field).await?),
            None => None,
        };
        Ok(FormPayload {
            fields: self
                .fields
                .iter()
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
            file,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    async fn read(field: &FileField) -> Result<Self> {
        let bytes = tokio::fs::read(&field.path)
            .await
            .map_err(|source| ClientError::Form {
                path: field.path.clone(),
                source,
            })?;
        Ok(Self {
            field: field.name.clone(),
            file_name: file_name(&field.path),
            mime_type: mime_guess::from_path(&field.path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            bytes,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Field values frozen at submission time, owned by one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPayload {
    pub fields: Vec<(String, String)>,
    pub file: Option<FilePart>,
}

impl FormPayload {
    pub fn into_multipart(self) -> Result<Form> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        if let Some(file) = self.file {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.mime_type)?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}
