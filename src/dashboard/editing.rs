//! JSON-level edits applied to the working copy.
//!
//! Every edit is a partial overlay: fields present in the patch replace the current
//! values, absent fields are kept. Item ids are never taken from a patch.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::{
    add_item, remove_item, update_item, Collection, ContentRecord, ListItem, Section,
};

/// Overlay the fields of `patch` onto `base`.
pub fn overlay<T: Serialize + DeserializeOwned>(base: &T, patch: Value) -> Result<T, AppError> {
    let Value::Object(fields) = patch else {
        return Err(AppError::Validation("Expected a JSON object".to_string()));
    };

    let mut merged = serde_json::to_value(base)?;
    if let Value::Object(target) = &mut merged {
        target.extend(fields);
    }
    Ok(serde_json::from_value(merged)?)
}

fn add_json<T: ListItem>(items: &mut Vec<T>, patch: Option<Value>) -> Result<Value, AppError> {
    let item = match patch {
        Some(patch) => Some(overlay(&T::blank(), patch)?),
        None => None,
    };
    Ok(serde_json::to_value(add_item(items, item))?)
}

fn update_json<T: ListItem>(items: &mut [T], id: &str, patch: Value) -> Result<Value, AppError> {
    let not_found = || {
        AppError::NotFound(format!(
            "No item {} in {}",
            id,
            T::COLLECTION.as_str()
        ))
    };

    let existing = items.iter().find(|item| item.id() == id).ok_or_else(not_found)?;
    let merged = overlay(existing, patch)?;
    let updated = update_item(items, id, merged).ok_or_else(not_found)?;
    Ok(serde_json::to_value(updated)?)
}

fn remove_json<T: ListItem>(items: &mut Vec<T>, id: &str) -> Result<(), AppError> {
    if remove_item(items, id) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "No item {} in {}",
            id,
            T::COLLECTION.as_str()
        )))
    }
}

impl ContentRecord {
    /// Patch a single-valued section; returns the section after the edit.
    pub fn patch_section(&mut self, section: Section, patch: Value) -> Result<Value, AppError> {
        match section {
            Section::Hero => {
                self.hero = overlay(&self.hero, patch)?;
                Ok(serde_json::to_value(&self.hero)?)
            }
            Section::About => {
                self.about = overlay(&self.about, patch)?;
                Ok(serde_json::to_value(&self.about)?)
            }
            Section::Contact => {
                self.contact = overlay(&self.contact, patch)?;
                Ok(serde_json::to_value(&self.contact)?)
            }
            Section::Company => {
                self.company = overlay(&self.company, patch)?;
                Ok(serde_json::to_value(&self.company)?)
            }
        }
    }

    /// Append a new item with a generated id; returns the stored item.
    pub fn add_to(&mut self, collection: Collection, patch: Option<Value>) -> Result<Value, AppError> {
        match collection {
            Collection::Services => add_json(&mut self.services, patch),
            Collection::Projects => add_json(&mut self.projects, patch),
            Collection::Partners => add_json(&mut self.partners, patch),
        }
    }

    /// Patch the item with `id`; returns the stored item.
    pub fn update_in(
        &mut self,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> Result<Value, AppError> {
        match collection {
            Collection::Services => update_json(&mut self.services, id, patch),
            Collection::Projects => update_json(&mut self.projects, id, patch),
            Collection::Partners => update_json(&mut self.partners, id, patch),
        }
    }

    pub fn remove_from(&mut self, collection: Collection, id: &str) -> Result<(), AppError> {
        match collection {
            Collection::Services => remove_json(&mut self.services, id),
            Collection::Projects => remove_json(&mut self.projects, id),
            Collection::Partners => remove_json(&mut self.partners, id),
        }
    }
}
