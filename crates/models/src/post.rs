use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity;
use crate::errors::ModelError;
use crate::patch::PatchField;
use crate::record::{FieldType, FieldValue, Record, RecordField, RecordId, RecordKind};
use crate::validate::validate_name;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: RecordId,
    pub title: String,
    pub content: String,
    pub author: String,
    pub published: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub published: bool,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into(), author: author.into(), published: false }
    }

    pub fn published(mut self) -> Self {
        self.published = true;
        self
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name("title", &self.title)?;
        validate_name("author", &self.author)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostPatch {
    pub title: PatchField<String>,
    pub content: PatchField<String>,
    pub author: PatchField<String>,
    pub published: PatchField<bool>,
}

impl PostPatch {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(title) = self.title.require("title")? {
            validate_name("title", title)?;
        }
        self.content.require("content")?;
        if let Some(author) = self.author.require("author")? {
            validate_name("author", author)?;
        }
        self.published.require("published")?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostField {
    Id,
    Title,
    Content,
    Author,
    Published,
}

impl RecordField for PostField {
    const ALL: &'static [Self] = &[Self::Id, Self::Title, Self::Content, Self::Author, Self::Published];

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Content => "content",
            Self::Author => "author",
            Self::Published => "published",
        }
    }

    fn field_type(self) -> FieldType {
        match self {
            Self::Title | Self::Content | Self::Author => FieldType::Text,
            Self::Id => FieldType::Number,
            Self::Published => FieldType::Flag,
        }
    }
}

impl Record for Post {
    type Input = NewPost;
    type Patch = PostPatch;
    type Changes = PostPatch;
    type Field = PostField;

    const KIND: RecordKind = RecordKind::Post;

    fn id(&self) -> RecordId {
        self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn field(&self, field: PostField) -> FieldValue<'_> {
        match field {
            PostField::Id => FieldValue::Number(self.id as f64),
            PostField::Title => FieldValue::Text(&self.title),
            PostField::Content => FieldValue::Text(&self.content),
            PostField::Author => FieldValue::Text(&self.author),
            PostField::Published => FieldValue::Flag(self.published),
        }
    }

    fn from_input(id: RecordId, input: NewPost, now: DateTime<Utc>) -> Result<Self, ModelError> {
        input.validate()?;
        Ok(Self {
            id,
            title: input.title,
            content: input.content,
            author: input.author,
            published: input.published,
            created_at: Some(now),
        })
    }

    fn validate_patch(patch: PostPatch) -> Result<PostPatch, ModelError> {
        patch.validate()?;
        Ok(patch)
    }

    fn apply_patch(&mut self, patch: PostPatch) {
        patch.title.apply(&mut self.title);
        patch.content.apply(&mut self.content);
        patch.author.apply(&mut self.author);
        patch.published.apply(&mut self.published);
    }

    fn status_field() -> Option<PostField> {
        Some(PostField::Published)
    }
}

impl From<entity::post::Model> for Post {
    fn from(m: entity::post::Model) -> Self {
        Self {
            id: u64::try_from(m.id).unwrap_or_default(),
            title: m.title,
            content: m.content,
            author: m.author,
            published: m.published,
            created_at: Some(m.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_default_to_unpublished() {
        let input: NewPost = serde_json::from_str(r#"{"title":"T","content":"C","author":"A"}"#).unwrap();
        assert!(!input.published);
    }

    #[test]
    fn blank_author_is_rejected() {
        let err = Post::from_input(1, NewPost::new("T", "C", " "), Utc::now()).unwrap_err();
        assert_eq!(err.field(), "author");
    }
}
