use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity;
use crate::errors::ModelError;
use crate::patch::PatchField;
use crate::record::{FieldType, FieldValue, Record, RecordField, RecordId, RecordKind};
use crate::validate::{validate_amount, validate_name, validate_tags};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub tax: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub tax: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, description: impl Into<String>, price: f64) -> Self {
        Self { name: name.into(), description: description.into(), price, tax: None, tags: Vec::new() }
    }

    pub fn with_tax(mut self, tax: f64) -> Self {
        self.tax = Some(tax);
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        validate_name("name", &self.name)?;
        validate_amount("price", self.price)?;
        if let Some(tax) = self.tax {
            validate_amount("tax", tax)?;
        }
        validate_tags(&self.tags)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub name: PatchField<String>,
    pub description: PatchField<String>,
    pub price: PatchField<f64>,
    /// Nullable: an explicit `null` clears the tax.
    pub tax: PatchField<f64>,
    pub tags: PatchField<Vec<String>>,
}

impl ItemPatch {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(name) = self.name.require("name")? {
            validate_name("name", name)?;
        }
        self.description.require("description")?;
        if let Some(price) = self.price.require("price")? {
            validate_amount("price", *price)?;
        }
        if let Some(tax) = self.tax.as_set() {
            validate_amount("tax", *tax)?;
        }
        if let Some(tags) = self.tags.require("tags")? {
            validate_tags(tags)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    Id,
    Name,
    Description,
    Price,
    Tax,
    Tags,
}

impl RecordField for ItemField {
    const ALL: &'static [Self] = &[Self::Id, Self::Name, Self::Description, Self::Price, Self::Tax, Self::Tags];

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Price => "price",
            Self::Tax => "tax",
            Self::Tags => "tags",
        }
    }

    fn field_type(self) -> FieldType {
        match self {
            Self::Name | Self::Description => FieldType::Text,
            Self::Id | Self::Price | Self::Tax => FieldType::Number,
            Self::Tags => FieldType::Tags,
        }
    }
}

impl Record for Item {
    type Input = NewItem;
    type Patch = ItemPatch;
    type Changes = ItemPatch;
    type Field = ItemField;

    const KIND: RecordKind = RecordKind::Item;

    fn id(&self) -> RecordId {
        self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn field(&self, field: ItemField) -> FieldValue<'_> {
        match field {
            ItemField::Id => FieldValue::Number(self.id as f64),
            ItemField::Name => FieldValue::Text(&self.name),
            ItemField::Description => FieldValue::Text(&self.description),
            ItemField::Price => FieldValue::Number(self.price),
            ItemField::Tax => self.tax.map_or(FieldValue::Null, FieldValue::Number),
            ItemField::Tags => FieldValue::Tags(&self.tags),
        }
    }

    fn from_input(id: RecordId, input: NewItem, now: DateTime<Utc>) -> Result<Self, ModelError> {
        input.validate()?;
        Ok(Self {
            id,
            name: input.name,
            description: input.description,
            price: input.price,
            tax: input.tax,
            tags: input.tags,
            created_at: Some(now),
        })
    }

    fn validate_patch(patch: ItemPatch) -> Result<ItemPatch, ModelError> {
        patch.validate()?;
        Ok(patch)
    }

    fn apply_patch(&mut self, patch: ItemPatch) {
        patch.name.apply(&mut self.name);
        patch.description.apply(&mut self.description);
        patch.price.apply(&mut self.price);
        patch.tax.apply_nullable(&mut self.tax);
        patch.tags.apply(&mut self.tags);
    }
}

impl From<entity::item::Model> for Item {
    fn from(m: entity::item::Model) -> Self {
        Self {
            id: u64::try_from(m.id).unwrap_or_default(),
            name: m.name,
            description: m.description,
            price: m.price,
            tax: m.tax,
            tags: Vec::new(),
            created_at: Some(m.created_at),
        }
    }
}
