//! Attribute extraction - pulling named fields out of arbitrary source values.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Read the named fields off `source`, in the order given.
///
/// The source is anything serde can view as a JSON object: a struct with
/// named fields, a map, or an already-built `Value::Object`. Struct fields
/// and map keys are treated uniformly. A name with no matching field fails
/// with [`Error::MissingAttribute`]; the failure is not recovered here and
/// aborts the encode that requested it.
///
/// Pure with respect to the builder: no tree state is touched.
pub fn read_fields<S>(source: &S, names: &[&str]) -> Result<Vec<(String, Value)>>
where
    S: Serialize + ?Sized,
{
    let view = serde_json::to_value(source)?;

    names
        .iter()
        .map(|&name| {
            // Value::get resolves only on objects, so a scalar source
            // fails the same way an absent field does.
            view.get(name)
                .cloned()
                .map(|value| (name.to_string(), value))
                .ok_or_else(|| Error::MissingAttribute(name.to_string()))
        })
        .collect()
}
