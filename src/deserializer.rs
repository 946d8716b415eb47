//! Serde deserializer over produced configurations
//!
//! This module lets a generated [`Value`] (or a summary turned into one) be
//! deserialized straight into Rust types using the standard serde derive
//! macros.

use crate::error::{Error, SerdeError};
use crate::value::{Value, ValueArray, ValueMap};
use serde::de::{self, DeserializeOwned, DeserializeSeed, Visitor};

/// Deserializes a configuration value into a Rust type
pub fn from_value<T>(value: Value) -> Result<T, Error>
where
    T: DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

/// Deserializer for individual configuration values
pub struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(s) => visitor.visit_string(s),
            Value::Integer(i) => visitor.visit_i64(i),
            Value::Float(f) => visitor.visit_f64(f),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Null => visitor.visit_unit(),
            Value::Object(obj) => visitor.visit_map(MapAccess::new(obj)),
            Value::Array(arr) => visitor.visit_seq(SeqAccess::new(arr)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            // Unit variant written as a plain string
            Value::String(variant) => visitor.visit_enum(EnumAccess::new(variant, None)),
            // Data variant written as a single-entry mapping
            Value::Object(obj) if obj.len() == 1 => match obj.into_iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumAccess::new(variant, Some(value))),
                None => Err(Error::Serde(SerdeError::Custom(
                    "Expected a single-entry mapping for enum".to_string(),
                ))),
            },
            other => Err(Error::Serde(SerdeError::TypeMismatch {
                expected: "string or single-entry mapping",
                found: other.type_name(),
            })),
        }
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    // Delegate all other methods to deserialize_any for simplicity
    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

/// Sequence access for arrays
struct SeqAccess {
    array: smallvec::IntoIter<[Value; 4]>,
}

impl SeqAccess {
    fn new(array: Box<ValueArray>) -> Self {
        Self {
            array: (*array).into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqAccess {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.array.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        let (lower, upper) = self.array.size_hint();
        upper.or(Some(lower))
    }
}

/// Map access for objects
struct MapAccess {
    object: indexmap::map::IntoIter<String, Value>,
    current_value: Option<Value>,
}

impl MapAccess {
    fn new(object: ValueMap) -> Self {
        Self {
            object: object.into_iter(),
            current_value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapAccess {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        match self.object.next() {
            Some((key, value)) => {
                self.current_value = Some(value);
                seed.deserialize(ValueDeserializer::new(Value::String(key)))
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current_value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::Serde(SerdeError::Custom(
                "No value available for map entry".to_string(),
            ))),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.object.len())
    }
}

/// Enum access for enum deserialization
struct EnumAccess {
    variant_name: String,
    variant_value: Option<Value>,
}

impl EnumAccess {
    fn new(variant_name: String, variant_value: Option<Value>) -> Self {
        Self {
            variant_name,
            variant_value,
        }
    }
}

impl<'de> de::EnumAccess<'de> for EnumAccess {
    type Error = Error;
    type Variant = VariantAccess;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let variant_name =
            seed.deserialize(ValueDeserializer::new(Value::String(self.variant_name)))?;
        Ok((variant_name, VariantAccess::new(self.variant_value)))
    }
}

/// Variant access for enum variants
struct VariantAccess {
    value: Option<Value>,
}

impl VariantAccess {
    fn new(value: Option<Value>) -> Self {
        Self { value }
    }

    fn missing(kind: &str) -> Error {
        Error::Serde(SerdeError::Custom(format!(
            "Expected {} variant data, found unit",
            kind
        )))
    }
}

impl<'de> de::VariantAccess<'de> for VariantAccess {
    type Error = Error;

    fn unit_variant(self) -> Result<(), Self::Error> {
        match self.value {
            None | Some(Value::Null) => Ok(()),
            Some(_) => Err(Error::Serde(SerdeError::Custom(
                "Expected unit variant, found data".to_string(),
            ))),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Self::missing("newtype")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(array)) => visitor.visit_seq(SeqAccess::new(array)),
            Some(other) => Err(Error::Serde(SerdeError::TypeMismatch {
                expected: "sequence",
                found: other.type_name(),
            })),
            None => Err(Self::missing("tuple")),
        }
    }

    fn struct_variant<V>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(object)) => visitor.visit_map(MapAccess::new(object)),
            Some(other) => Err(Error::Serde(SerdeError::TypeMismatch {
                expected: "mapping",
                found: other.type_name(),
            })),
            None => Err(Self::missing("struct")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    enum Optimizer {
        Sgd,
        Adam { beta: f64 },
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Training {
        epochs: u32,
        learning_rate: f64,
        optimizer: Optimizer,
        shape: Vec<u8>,
        tag: Option<String>,
        seed: Option<u64>,
    }

    fn doc(value: serde_json::Value) -> Value {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_struct_from_value() {
        let training: Training = from_value(doc(json!({
            "epochs": 10,
            "learning_rate": 1,
            "optimizer": "sgd",
            "shape": [4, 4],
            "tag": "baseline",
            "seed": null
        })))
        .unwrap();
        assert_eq!(
            training,
            Training {
                epochs: 10,
                learning_rate: 1.0,
                optimizer: Optimizer::Sgd,
                shape: vec![4, 4],
                tag: Some("baseline".to_string()),
                seed: None,
            }
        );
    }

    #[test]
    fn test_struct_variant_from_single_entry_mapping() {
        let optimizer: Optimizer = from_value(doc(json!({"adam": {"beta": 0.9}}))).unwrap();
        assert_eq!(optimizer, Optimizer::Adam { beta: 0.9 });
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let result: Result<u32, Error> = from_value(Value::from("ten"));
        assert!(matches!(result, Err(Error::Serde(SerdeError::Custom(_)))));

        let result: Result<Optimizer, Error> = from_value(Value::from(3));
        assert!(matches!(
            result,
            Err(Error::Serde(SerdeError::TypeMismatch {
                found: "integer",
                ..
            }))
        ));
    }
}
