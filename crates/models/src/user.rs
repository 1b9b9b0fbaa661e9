use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity;
use crate::errors::ModelError;
use crate::patch::PatchField;
use crate::record::{FieldType, FieldValue, Record, RecordField, RecordId, RecordKind};
use crate::validate::{validate_age, validate_email, validate_name};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, age: i64) -> Self {
        Self { name: name.into(), email: email.into(), age, is_active: true }
    }

    /// Returns the validated age.
    pub fn validate(&self) -> Result<u32, ModelError> {
        validate_name("name", &self.name)?;
        validate_email(&self.email)?;
        validate_age(self.age)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub name: PatchField<String>,
    pub email: PatchField<String>,
    pub age: PatchField<i64>,
    pub is_active: PatchField<bool>,
}

/// A [`UserPatch`] that passed validation; `age` is already a `u32`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserChanges {
    pub name: PatchField<String>,
    pub email: PatchField<String>,
    pub age: PatchField<u32>,
    pub is_active: PatchField<bool>,
}

impl UserPatch {
    pub fn validate(self) -> Result<UserChanges, ModelError> {
        if let Some(name) = self.name.require("name")? {
            validate_name("name", name)?;
        }
        if let Some(email) = self.email.require("email")? {
            validate_email(email)?;
        }
        let age = match self.age.require("age")? {
            Some(age) => PatchField::Set(validate_age(*age)?),
            None => PatchField::Absent,
        };
        self.is_active.require("is_active")?;
        Ok(UserChanges { name: self.name, email: self.email, age, is_active: self.is_active })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    Id,
    Name,
    Email,
    Age,
    IsActive,
}

impl RecordField for UserField {
    const ALL: &'static [Self] = &[Self::Id, Self::Name, Self::Email, Self::Age, Self::IsActive];

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Email => "email",
            Self::Age => "age",
            Self::IsActive => "is_active",
        }
    }

    fn field_type(self) -> FieldType {
        match self {
            Self::Name | Self::Email => FieldType::Text,
            Self::Id | Self::Age => FieldType::Number,
            Self::IsActive => FieldType::Flag,
        }
    }
}

impl Record for User {
    type Input = NewUser;
    type Patch = UserPatch;
    type Changes = UserChanges;
    type Field = UserField;

    const KIND: RecordKind = RecordKind::User;

    fn id(&self) -> RecordId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn field(&self, field: UserField) -> FieldValue<'_> {
        match field {
            UserField::Id => FieldValue::Number(self.id as f64),
            UserField::Name => FieldValue::Text(&self.name),
            UserField::Email => FieldValue::Text(&self.email),
            UserField::Age => FieldValue::Number(f64::from(self.age)),
            UserField::IsActive => FieldValue::Flag(self.is_active),
        }
    }

    fn from_input(id: RecordId, input: NewUser, now: DateTime<Utc>) -> Result<Self, ModelError> {
        let age = input.validate()?;
        Ok(Self {
            id,
            name: input.name,
            email: input.email,
            age,
            is_active: input.is_active,
            created_at: Some(now),
        })
    }

    fn validate_patch(patch: UserPatch) -> Result<UserChanges, ModelError> {
        patch.validate()
    }

    fn apply_patch(&mut self, changes: UserChanges) {
        changes.name.apply(&mut self.name);
        changes.email.apply(&mut self.email);
        changes.age.apply(&mut self.age);
        changes.is_active.apply(&mut self.is_active);
    }

    fn unique_fields() -> &'static [UserField] {
        &[UserField::Email]
    }

    fn status_field() -> Option<UserField> {
        Some(UserField::IsActive)
    }
}

impl From<entity::user::Model> for User {
    fn from(m: entity::user::Model) -> Self {
        Self {
            id: u64::try_from(m.id).unwrap_or_default(),
            name: m.name,
            email: m.email,
            age: u32::try_from(m.age).unwrap_or_default(),
            is_active: m.is_active,
            created_at: Some(m.created_at),
        }
    }
}
