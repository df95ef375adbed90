//! Tagged union for the loosely typed values carried by bus properties.
//!
//! Values coming off the bus are decoded into [`Variant`] once, at the
//! transport boundary. Every accessor fails closed with a [`VariantError`]
//! when the value has another shape, so callers decide whether to degrade
//! to a default or surface the error.

use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Serializer, ser::SerializeMap};
use zbus::zvariant::{
    Array, Dict, ObjectPath, OwnedValue, Signature, Structure, StructureBuilder, Value,
};

/// Property name to value mapping, as returned by `GetAll` and `Metadata`
pub type PropertyMap = BTreeMap<String, Variant>;

/// Track metadata as delivered by a player, passed through unvalidated
pub type MetadataMap = PropertyMap;

/// A dynamically typed bus value.
///
/// Every wire type a player can return for a property is kept with its
/// exact signature, so a value decoded here and encoded again is
/// indistinguishable from the original on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Variant {
    /// Boolean (`b`)
    Bool(bool),
    /// Unsigned byte (`y`)
    Byte(u8),
    /// Signed 16-bit integer (`n`)
    Int16(i16),
    /// Unsigned 16-bit integer (`q`)
    UInt16(u16),
    /// Signed 32-bit integer (`i`)
    Int32(i32),
    /// Signed 64-bit integer (`x`)
    Int64(i64),
    /// Unsigned 32-bit integer (`u`)
    UInt32(u32),
    /// Unsigned 64-bit integer (`t`)
    UInt64(u64),
    /// Double precision float (`d`)
    Double(f64),
    /// String (`s`)
    Str(String),
    /// Object path (`o`)
    ObjectPath(String),
    /// Type signature (`g`)
    Signature(String),
    /// List of strings (`as`)
    StrList(Vec<String>),
    /// List of variants (`av`)
    List(Vec<Variant>),
    /// Any other array, such as `ao` or `ax`
    Array(TypedArray),
    /// Structure such as `(oss)`
    Struct(TypedStruct),
    /// String keyed dictionary (`a{sv}`)
    Dict(PropertyMap),
    /// Any other dictionary, such as `a{ss}`
    Map(TypedMap),
}

/// Array with a fixed element type other than `s` or `v`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TypedArray {
    /// Signature of one element
    #[serde(skip)]
    pub element: String,
    /// Elements in wire order
    pub items: Vec<Variant>,
}

/// Structure with its full signature
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TypedStruct {
    /// Signature of the whole structure, parentheses included
    #[serde(skip)]
    pub signature: String,
    /// Fields in wire order
    pub fields: Vec<Variant>,
}

/// Dictionary whose key or value type differs from `a{sv}`
#[derive(Debug, Clone, PartialEq)]
pub struct TypedMap {
    /// Signature of the keys
    pub key: String,
    /// Signature of the values
    pub value: String,
    /// Entries in wire order
    pub entries: Vec<(Variant, Variant)>,
}

impl Serialize for TypedMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Conversion failure between a [`Variant`] and a concrete type
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VariantError {
    /// The value exists but has another shape
    #[error("expected {expected}, found {found}")]
    UnexpectedShape {
        /// Shape the caller asked for
        expected: &'static str,
        /// Shape actually present
        found: &'static str,
    },

    /// The bus value uses a type this union does not model
    #[error("unsupported bus type '{0}'")]
    Unsupported(String),

    /// An integer does not fit the requested width
    #[error("integer {0} out of range")]
    OutOfRange(String),

    /// A string is not a valid object path
    #[error("invalid object path '{0}'")]
    InvalidObjectPath(String),

    /// A container element does not match the container's signature
    #[error("cannot encode value: {0}")]
    Encoding(String),
}

impl Variant {
    /// Short name of the shape, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::Int16(_) => "int16",
            Self::UInt16(_) => "uint16",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::UInt32(_) => "uint32",
            Self::UInt64(_) => "uint64",
            Self::Double(_) => "double",
            Self::Str(_) => "string",
            Self::ObjectPath(_) => "object path",
            Self::Signature(_) => "signature",
            Self::StrList(_) => "string list",
            Self::List(_) | Self::Array(_) => "list",
            Self::Struct(_) => "struct",
            Self::Dict(_) | Self::Map(_) => "dict",
        }
    }

    fn mismatch(&self, expected: &'static str) -> VariantError {
        VariantError::UnexpectedShape {
            expected,
            found: self.kind(),
        }
    }

    /// Borrow the value as a string; object paths and signatures count as strings.
    ///
    /// # Errors
    /// Returns `UnexpectedShape` for any other shape
    pub fn as_str(&self) -> Result<&str, VariantError> {
        match self {
            Self::Str(s) | Self::ObjectPath(s) | Self::Signature(s) => Ok(s),
            other => Err(other.mismatch("string")),
        }
    }

    /// Read the value as a boolean.
    ///
    /// # Errors
    /// Returns `UnexpectedShape` for any other shape
    pub fn as_bool(&self) -> Result<bool, VariantError> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(other.mismatch("bool")),
        }
    }

    /// Read the value as a float.
    ///
    /// # Errors
    /// Returns `UnexpectedShape` for any other shape
    pub fn as_f64(&self) -> Result<f64, VariantError> {
        match self {
            Self::Double(d) => Ok(*d),
            other => Err(other.mismatch("double")),
        }
    }

    /// Read any integer shape as a signed 64-bit integer.
    ///
    /// Players disagree on the width of `mpris:length`, so every integer
    /// width is accepted here.
    ///
    /// # Errors
    /// Returns `UnexpectedShape` for non-integers, `OutOfRange` for
    /// unsigned values above `i64::MAX`
    pub fn as_i64(&self) -> Result<i64, VariantError> {
        match self {
            Self::Byte(n) => Ok(i64::from(*n)),
            Self::Int16(n) => Ok(i64::from(*n)),
            Self::UInt16(n) => Ok(i64::from(*n)),
            Self::Int32(n) => Ok(i64::from(*n)),
            Self::Int64(n) => Ok(*n),
            Self::UInt32(n) => Ok(i64::from(*n)),
            Self::UInt64(n) => i64::try_from(*n).map_err(|_| VariantError::OutOfRange(n.to_string())),
            other => Err(other.mismatch("integer")),
        }
    }

    /// Read the value as a list of strings.
    ///
    /// A single string is accepted as a one-element list, and a list of
    /// variants or object paths is accepted when every element is a string.
    ///
    /// # Errors
    /// Returns `UnexpectedShape` when any element is not a string
    pub fn to_string_list(&self) -> Result<Vec<String>, VariantError> {
        match self {
            Self::StrList(items) => Ok(items.clone()),
            Self::Str(s) => Ok(vec![s.clone()]),
            Self::List(items) | Self::Array(TypedArray { items, .. }) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect(),
            other => Err(other.mismatch("string list")),
        }
    }

    /// Borrow the value as a dictionary.
    ///
    /// # Errors
    /// Returns `UnexpectedShape` for any other shape
    pub fn as_dict(&self) -> Result<&PropertyMap, VariantError> {
        match self {
            Self::Dict(map) => Ok(map),
            other => Err(other.mismatch("dict")),
        }
    }

    /// Encode the value for the wire.
    ///
    /// # Errors
    /// Returns `InvalidObjectPath` if an object path is malformed, and
    /// `Unsupported` or `Encoding` if a container does not match its
    /// recorded signature
    pub fn to_value(&self) -> Result<Value<'static>, VariantError> {
        let value = match self {
            Self::Bool(b) => Value::from(*b),
            Self::Byte(n) => Value::from(*n),
            Self::Int16(n) => Value::from(*n),
            Self::UInt16(n) => Value::from(*n),
            Self::Int32(n) => Value::from(*n),
            Self::Int64(n) => Value::from(*n),
            Self::UInt32(n) => Value::from(*n),
            Self::UInt64(n) => Value::from(*n),
            Self::Double(d) => Value::from(*d),
            Self::Str(s) => Value::from(s.clone()),
            Self::ObjectPath(path) => {
                let path = ObjectPath::try_from(path.clone())
                    .map_err(|_| VariantError::InvalidObjectPath(path.clone()))?;
                Value::from(path)
            }
            Self::Signature(signature) => Value::Signature(parse_signature(signature)?),
            Self::StrList(items) => Value::from(items.clone()),
            Self::List(items) => {
                let values = items
                    .iter()
                    .map(Self::to_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Value::from(values)
            }
            Self::Array(array) => array.to_value()?,
            Self::Struct(structure) => structure.to_value()?,
            Self::Dict(map) => Value::from(encode_map(map)?),
            Self::Map(map) => map.to_value()?,
        };
        Ok(value)
    }

    /// Encode the value as an element of type `signature`, boxing it when
    /// the container holds variants.
    fn to_value_as(&self, signature: &Signature) -> Result<Value<'static>, VariantError> {
        let value = self.to_value()?;
        if matches!(signature, Signature::Variant) {
            Ok(Value::Value(Box::new(value)))
        } else {
            Ok(value)
        }
    }

    fn from_array(array: &Array<'_>) -> Result<Self, VariantError> {
        let items = array
            .iter()
            .map(Self::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        match array.element_signature() {
            Signature::Str => items
                .into_iter()
                .map(|item| match item {
                    Self::Str(s) => Ok(s),
                    other => Err(VariantError::Unsupported(other.kind().to_string())),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Self::StrList),
            Signature::Variant => Ok(Self::List(items)),
            element => Ok(Self::Array(TypedArray {
                element: element.to_string(),
                items,
            })),
        }
    }

    fn from_dict(dict: &Dict<'_, '_>) -> Result<Self, VariantError> {
        let Signature::Dict { key, value } = dict.signature() else {
            return Err(VariantError::Unsupported(dict.signature().to_string()));
        };

        if matches!(key.signature(), Signature::Str)
            && matches!(value.signature(), Signature::Variant)
        {
            let mut map = PropertyMap::new();
            for (key, value) in dict.iter() {
                let Value::Str(key) = key else {
                    return Err(VariantError::Unsupported(key.value_signature().to_string()));
                };
                map.insert(key.to_string(), Self::try_from(value)?);
            }
            return Ok(Self::Dict(map));
        }

        let entries = dict
            .iter()
            .map(|(k, v)| Ok((Self::try_from(k)?, Self::try_from(v)?)))
            .collect::<Result<Vec<_>, VariantError>>()?;
        Ok(Self::Map(TypedMap {
            key: key.signature().to_string(),
            value: value.signature().to_string(),
            entries,
        }))
    }

    fn from_structure(structure: &Structure<'_>) -> Result<Self, VariantError> {
        let fields = structure
            .fields()
            .iter()
            .map(Self::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Struct(TypedStruct {
            signature: structure.signature().to_string(),
            fields,
        }))
    }
}

impl TypedArray {
    fn to_value(&self) -> Result<Value<'static>, VariantError> {
        let element = parse_signature(&self.element)?;
        let mut array = Array::new(&element);
        for item in &self.items {
            array
                .append(item.to_value_as(&element)?)
                .map_err(|e| VariantError::Encoding(e.to_string()))?;
        }
        Ok(Value::Array(array))
    }
}

impl TypedStruct {
    fn to_value(&self) -> Result<Value<'static>, VariantError> {
        let Signature::Structure(field_signatures) = parse_signature(&self.signature)? else {
            return Err(VariantError::Unsupported(self.signature.clone()));
        };

        let mut builder = StructureBuilder::new();
        for (field, signature) in self.fields.iter().zip(field_signatures.iter()) {
            builder = builder.append_field(field.to_value_as(signature)?);
        }
        builder
            .build()
            .map(Value::Structure)
            .map_err(|e| VariantError::Encoding(e.to_string()))
    }
}

impl TypedMap {
    fn to_value(&self) -> Result<Value<'static>, VariantError> {
        let key_signature = parse_signature(&self.key)?;
        let value_signature = parse_signature(&self.value)?;
        let mut dict = Dict::new(&key_signature, &value_signature);
        for (key, value) in &self.entries {
            dict.append(
                key.to_value_as(&key_signature)?,
                value.to_value_as(&value_signature)?,
            )
            .map_err(|e| VariantError::Encoding(e.to_string()))?;
        }
        Ok(Value::Dict(dict))
    }
}

fn parse_signature(signature: &str) -> Result<Signature, VariantError> {
    Signature::try_from(signature).map_err(|_| VariantError::Unsupported(signature.to_string()))
}

impl TryFrom<&Value<'_>> for Variant {
    type Error = VariantError;

    fn try_from(value: &Value<'_>) -> Result<Self, Self::Error> {
        let variant = match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::U8(n) => Self::Byte(*n),
            Value::I16(n) => Self::Int16(*n),
            Value::U16(n) => Self::UInt16(*n),
            Value::I32(n) => Self::Int32(*n),
            Value::U32(n) => Self::UInt32(*n),
            Value::I64(n) => Self::Int64(*n),
            Value::U64(n) => Self::UInt64(*n),
            Value::F64(d) => Self::Double(*d),
            Value::Str(s) => Self::Str(s.to_string()),
            Value::Signature(s) => Self::Signature(s.to_string()),
            Value::ObjectPath(path) => Self::ObjectPath(path.to_string()),
            Value::Value(inner) => Self::try_from(inner.as_ref())?,
            Value::Array(array) => Self::from_array(array)?,
            Value::Dict(dict) => Self::from_dict(dict)?,
            Value::Structure(structure) => Self::from_structure(structure)?,
            other => return Err(VariantError::Unsupported(other.value_signature().to_string())),
        };
        Ok(variant)
    }
}

impl TryFrom<&OwnedValue> for Variant {
    type Error = VariantError;

    fn try_from(value: &OwnedValue) -> Result<Self, Self::Error> {
        Self::try_from(&**value)
    }
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Variant {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Variant {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<i64> for Variant {
    fn from(value: i64) -> Self {
        Self::Int64(value)
    }
}

impl From<Vec<String>> for Variant {
    fn from(value: Vec<String>) -> Self {
        Self::StrList(value)
    }
}

impl From<PropertyMap> for Variant {
    fn from(value: PropertyMap) -> Self {
        Self::Dict(value)
    }
}

/// Encode a property map as an `a{sv}` wire dictionary.
///
/// # Errors
/// Returns the first encoding error of any value
pub fn encode_map(map: &PropertyMap) -> Result<HashMap<String, Value<'static>>, VariantError> {
    map.iter()
        .map(|(key, value)| Ok((key.clone(), value.to_value()?)))
        .collect()
}

/// Decode an `a{sv}` wire dictionary, dropping entries whose type is not modelled.
pub fn decode_map(map: &HashMap<String, OwnedValue>) -> PropertyMap {
    map.iter()
        .filter_map(|(key, value)| match Variant::try_from(value) {
            Ok(variant) => Some((key.clone(), variant)),
            Err(e) => {
                tracing::debug!("Dropping property '{key}': {e}");
                None
            }
        })
        .collect()
}
