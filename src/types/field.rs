// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Tri-state optional field used by desired parameters.
//!
//! A declaration can leave a field out (`Unset`), write an explicit `null`
//! (`Empty`), or give it a value (`Set`). Only `Unset` fields are eligible
//! for late-initialization.

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Field<T> {
    #[default]
    Unset,
    Empty,
    Set(T),
}

impl<T> Field<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Field::Unset)
    }

    /// The value, if one was given.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Field::Set(v) => Some(v),
            Field::Unset | Field::Empty => None,
        }
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Field::Set(v) => Some(v),
            Field::Unset | Field::Empty => None,
        }
    }
}

impl<T: Clone> Field<T> {
    /// Fill an unset field from the observed value. Never touches a field
    /// the declarer wrote, including an explicit `null`.
    pub fn late_init(&mut self, observed: Option<&T>) {
        if !self.is_unset() {
            return;
        }
        if let Some(v) = observed {
            *self = Field::Set(v.clone());
        }
    }

    /// Override the remote counterpart with the declared value.
    pub fn project(&self, remote: &mut Option<T>) {
        match self {
            Field::Unset => {}
            Field::Empty => *remote = None,
            Field::Set(v) => *remote = Some(v.clone()),
        }
    }
}

// `Unset` is dropped by `skip_serializing_if`; anything that reaches the
// serializer is either `null` or a value.
impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Set(v) => serializer.serialize_some(v),
            Field::Unset | Field::Empty => serializer.serialize_none(),
        }
    }
}

// Missing keys never reach here (`#[serde(default)]` yields `Unset`).
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Field::Set(v),
            None => Field::Empty,
        })
    }
}

impl<T: JsonSchema> JsonSchema for Field<T> {
    fn is_referenceable() -> bool {
        false
    }

    fn schema_name() -> String {
        <Option<T>>::schema_name()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        <Option<T>>::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Holder {
        #[serde(default, skip_serializing_if = "Field::is_unset")]
        content_type: Field<String>,
    }

    #[test]
    fn test_missing_key_is_unset() {
        let h: Holder = serde_json::from_str("{}").unwrap();
        assert_eq!(h.content_type, Field::Unset);
    }

    #[test]
    fn test_null_is_empty() {
        let h: Holder = serde_json::from_str(r#"{"content_type":null}"#).unwrap();
        assert_eq!(h.content_type, Field::Empty);
    }

    #[test]
    fn test_value_is_set() {
        let h: Holder = serde_json::from_str(r#"{"content_type":"text/plain"}"#).unwrap();
        assert_eq!(h.content_type, Field::Set("text/plain".to_string()));
    }

    #[test]
    fn test_serialization_keeps_the_three_states_apart() {
        let unset = Holder { content_type: Field::Unset };
        let empty = Holder { content_type: Field::Empty };
        let set = Holder { content_type: Field::Set("a".to_string()) };

        assert_eq!(serde_json::to_string(&unset).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&empty).unwrap(), r#"{"content_type":null}"#);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"{"content_type":"a"}"#);
    }

    #[test]
    fn test_late_init_only_fills_unset() {
        let observed = "from-remote".to_string();

        let mut unset: Field<String> = Field::Unset;
        unset.late_init(Some(&observed));
        assert_eq!(unset, Field::Set(observed.clone()));

        let mut empty: Field<String> = Field::Empty;
        empty.late_init(Some(&observed));
        assert_eq!(empty, Field::Empty);

        let mut set = Field::Set("mine".to_string());
        set.late_init(Some(&observed));
        assert_eq!(set, Field::Set("mine".to_string()));

        let mut still_unset: Field<String> = Field::Unset;
        still_unset.late_init(None);
        assert_eq!(still_unset, Field::Unset);
    }

    #[test]
    fn test_project() {
        let mut remote = Some("remote".to_string());
        Field::<String>::Unset.project(&mut remote);
        assert_eq!(remote.as_deref(), Some("remote"));

        Field::Set("desired".to_string()).project(&mut remote);
        assert_eq!(remote.as_deref(), Some("desired"));

        Field::<String>::Empty.project(&mut remote);
        assert_eq!(remote, None);
    }
}
