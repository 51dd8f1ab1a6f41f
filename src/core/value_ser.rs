//! serde `Serializer` that captures any `Serialize` type as a [`Value`] tree

use super::value::Value;
use serde::ser::{self, Serialize};
use std::fmt;

#[derive(Debug)]
pub struct StructuralError(String);

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for StructuralError {}

impl ser::Error for StructuralError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        StructuralError(msg.to_string())
    }
}

pub(crate) struct ValueSerializer;

type Res = Result<Value, StructuralError>;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = StructuralError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = VariantBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = StructBuilder;
    type SerializeStructVariant = VariantBuilder;

    fn serialize_bool(self, v: bool) -> Res {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Res {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Res {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Res {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Res {
        Ok(Value::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Res {
        Ok(Value::Uint(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Res {
        Ok(Value::Uint(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Res {
        Ok(Value::Uint(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Res {
        Ok(Value::Uint(v))
    }

    fn serialize_f32(self, v: f32) -> Res {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Res {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Res {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Res {
        Ok(Value::Str(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Res {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Res {
        Ok(Value::Null)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Res {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Res {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Res {
        Ok(Value::Struct(Vec::new()))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Res {
        Ok(Value::Str(variant.to_string()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Res {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Res {
        Ok(Value::Struct(vec![(
            variant.to_string(),
            value.serialize(ValueSerializer)?,
        )]))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, StructuralError> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, StructuralError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, StructuralError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder, StructuralError> {
        Ok(VariantBuilder {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, StructuralError> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<StructBuilder, StructuralError> {
        Ok(StructBuilder {
            fields: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder, StructuralError> {
        Ok(VariantBuilder {
            variant,
            items: Vec::with_capacity(len),
        })
    }
}

pub(crate) struct SeqBuilder {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = StructuralError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), StructuralError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::Seq(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = StructuralError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), StructuralError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Res {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = StructuralError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), StructuralError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Res {
        ser::SerializeSeq::end(self)
    }
}

pub(crate) struct MapBuilder {
    entries: Vec<(String, Value)>,
    next_key: Option<String>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = StructuralError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), StructuralError> {
        self.next_key = Some(key.serialize(ValueSerializer)?.to_key_string());
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), StructuralError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| StructuralError("map value without a key".to_string()))?;
        self.entries.push((key, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(mut self) -> Res {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Value::Map(self.entries))
    }
}

pub(crate) struct StructBuilder {
    fields: Vec<(String, Value)>,
}

impl ser::SerializeStruct for StructBuilder {
    type Ok = Value;
    type Error = StructuralError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), StructuralError> {
        self.fields
            .push((key.to_string(), value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::Struct(self.fields))
    }
}

/// Tuple and struct enum variants, wrapped as `{Variant:payload}`.
pub(crate) struct VariantBuilder {
    variant: &'static str,
    items: Vec<(String, Value)>,
}

impl ser::SerializeTupleVariant for VariantBuilder {
    type Ok = Value;
    type Error = StructuralError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), StructuralError> {
        self.items
            .push((String::new(), value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Res {
        let items = self.items.into_iter().map(|(_, v)| v).collect();
        Ok(Value::Struct(vec![(
            self.variant.to_string(),
            Value::Seq(items),
        )]))
    }
}

impl ser::SerializeStructVariant for VariantBuilder {
    type Ok = Value;
    type Error = StructuralError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), StructuralError> {
        self.items
            .push((key.to_string(), value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn end(self) -> Res {
        Ok(Value::Struct(vec![(
            self.variant.to_string(),
            Value::Struct(self.items),
        )]))
    }
}
