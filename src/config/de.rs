//! `serde` deserializer over a borrowed [`Node`]
//!
//! Struct fields are looked up by exact key first and then by snake_case
//! form, so `localPath` and `LOCAL_PATH` both fill a `local_path` field.
//! Keys of plain maps (`HashMap`, `BTreeMap`, ...) are handed over as
//! written.

use super::decode::to_snake_case;
use crate::domain::node::{Node, NodeMap};
use serde::de::value::BorrowedStrDeserializer;
use serde::de::{
    self, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, Unexpected, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use std::fmt;

/// Error raised while walking a node
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct DeError(String);

impl de::Error for DeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DeError(msg.to_string())
    }
}

pub struct NodeDeserializer<'de> {
    node: &'de Node,
}

impl<'de> NodeDeserializer<'de> {
    pub fn new(node: &'de Node) -> Self {
        Self { node }
    }
}

fn unexpected(node: &Node) -> Unexpected<'_> {
    match node {
        Node::Null => Unexpected::Unit,
        Node::Bool(b) => Unexpected::Bool(*b),
        Node::Int(i) => Unexpected::Signed(*i),
        Node::Float(f) => Unexpected::Float(*f),
        Node::String(s) => Unexpected::Str(s),
        Node::Seq(_) => Unexpected::Seq,
        Node::Map(_) => Unexpected::Map,
    }
}

impl<'de> de::Deserializer<'de> for NodeDeserializer<'de> {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.node {
            Node::Null => visitor.visit_unit(),
            Node::Bool(b) => visitor.visit_bool(*b),
            Node::Int(i) => visitor.visit_i64(*i),
            Node::Float(f) => visitor.visit_f64(*f),
            Node::String(s) => visitor.visit_borrowed_str(s),
            Node::Seq(items) => visitor.visit_seq(NodeSeqAccess {
                iter: items.iter(),
            }),
            Node::Map(map) => visitor.visit_map(NodeMapAccess::new(map, None)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        match self.node {
            Node::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        match self.node {
            Node::Map(map) => visitor.visit_map(NodeMapAccess::new(map, Some(fields))),
            _ => self.deserialize_any(visitor),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        match self.node {
            Node::String(s) => visitor.visit_enum(BorrowedStrDeserializer::<DeError>::new(s)),
            Node::Map(map) if map.len() == 1 => match map.iter().next() {
                Some((variant, value)) => visitor.visit_enum(NodeEnumAccess {
                    variant: variant.as_str(),
                    value,
                }),
                None => Err(de::Error::invalid_length(0, &"a single variant key")),
            },
            other => Err(de::Error::invalid_type(
                unexpected(other),
                &"a variant name or a single-key mapping",
            )),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map identifier
    }
}

struct NodeSeqAccess<'de> {
    iter: std::slice::Iter<'de, Node>,
}

impl<'de> SeqAccess<'de> for NodeSeqAccess<'de> {
    type Error = DeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, DeError> {
        match self.iter.next() {
            Some(node) => seed.deserialize(NodeDeserializer::new(node)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct NodeMapAccess<'de> {
    iter: indexmap::map::Iter<'de, String, Node>,
    /// Field names of the target struct; `None` for plain maps
    fields: Option<&'static [&'static str]>,
    value: Option<&'de Node>,
}

impl<'de> NodeMapAccess<'de> {
    fn new(map: &'de NodeMap, fields: Option<&'static [&'static str]>) -> Self {
        Self {
            iter: map.iter(),
            fields,
            value: None,
        }
    }

    fn field_name(&self, key: &'de str) -> &'de str {
        let Some(fields) = self.fields else {
            return key;
        };
        if fields.iter().any(|field| *field == key) {
            return key;
        }
        let folded = to_snake_case(key);
        match fields.iter().copied().find(|field| to_snake_case(field) == folded) {
            Some(field) => field,
            None => key,
        }
    }
}

impl<'de> MapAccess<'de> for NodeMapAccess<'de> {
    type Error = DeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, DeError> {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                let name = self.field_name(key);
                seed.deserialize(BorrowedStrDeserializer::new(name)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, DeError> {
        match self.value.take() {
            Some(value) => seed.deserialize(NodeDeserializer::new(value)),
            None => Err(de::Error::custom("mapping value requested before its key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct NodeEnumAccess<'de> {
    variant: &'de str,
    value: &'de Node,
}

impl<'de> EnumAccess<'de> for NodeEnumAccess<'de> {
    type Error = DeError;
    type Variant = NodeVariantAccess<'de>;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, Self::Variant), DeError> {
        let variant = seed.deserialize(BorrowedStrDeserializer::<DeError>::new(self.variant))?;
        Ok((variant, NodeVariantAccess { value: self.value }))
    }
}

struct NodeVariantAccess<'de> {
    value: &'de Node,
}

impl<'de> VariantAccess<'de> for NodeVariantAccess<'de> {
    type Error = DeError;

    fn unit_variant(self) -> Result<(), DeError> {
        match self.value {
            Node::Null => Ok(()),
            other => Err(de::Error::invalid_type(unexpected(other), &"unit variant")),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, DeError> {
        seed.deserialize(NodeDeserializer::new(self.value))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, DeError> {
        de::Deserializer::deserialize_seq(NodeDeserializer::new(self.value), visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        de::Deserializer::deserialize_struct(NodeDeserializer::new(self.value), "", fields, visitor)
    }
}
