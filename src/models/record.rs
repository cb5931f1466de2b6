//! Record model: an ordered mapping from field name to value

use super::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// An ordered mapping from field name to a scalar value.
///
/// The field list is shared by every record of a batch, so a record only owns
/// its values. A field listed but not present in the source reads as
/// [`Value::Missing`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    /// Create a record over a shared field list
    ///
    /// Values beyond the field list are dropped and missing trailing values are
    /// padded with [`Value::Missing`], so `values().len() == fields().len()`.
    pub fn new(fields: Arc<[String]>, mut values: Vec<Value>) -> Self {
        values.resize(fields.len(), Value::Missing);
        Self { fields, values }
    }

    /// Build a record from `(field, value)` pairs, mainly for tests and fixtures
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let (fields, values): (Vec<String>, Vec<Value>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(fields.into(), values)
    }

    pub fn fields(&self) -> &Arc<[String]> {
        &self.fields
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named field, `None` when the field is not part of this record
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .position(|f| f == field)
            .map(|i| &self.values[i])
    }

    /// Value at a field position; out-of-range positions read as missing
    pub fn value_at(&self, index: usize) -> &Value {
        static MISSING: Value = Value::Missing;
        self.values.get(index).unwrap_or(&MISSING)
    }

    /// Iterate `(field, value)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.iter() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_name() {
        let record = Record::from_pairs([
            ("Store Number", Value::Float(2633.0)),
            ("City", "Ames".into()),
        ]);
        assert_eq!(record.get("City"), Some(&Value::Text("Ames".to_string())));
        assert_eq!(record.get("County"), None);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_short_values_are_padded() {
        let fields: Arc<[String]> = vec!["a".to_string(), "b".to_string()].into();
        let record = Record::new(fields, vec![Value::Integer(1)]);
        assert_eq!(record.value_at(1), &Value::Missing);
        assert_eq!(record.value_at(7), &Value::Missing);
    }
}
