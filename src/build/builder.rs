//! The target-stack construction engine.
//!
//! A `Builder` owns a stack of node frames; the top frame is the target
//! every operation mutates. Nesting operations push a fresh frame, hand
//! the builder to a caller closure, pop the finished node, and attach it
//! to the frame underneath. The stack starts with a single empty object
//! frame (the eventual root) and is back to that one frame when the
//! caller's construction logic returns.

use crate::build::extract::read_fields;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};

/// Mutable builder for one ordered JSON document.
pub struct Builder {
    stack: Vec<Value>,
}

/// Target kind for error messages.
fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Builder {
    /// A builder whose root is an empty object.
    pub fn new() -> Self {
        Builder {
            stack: vec![Value::Object(Map::new())],
        }
    }

    /// Write `name -> value` on the current object target.
    ///
    /// Accepts scalars and prebuilt nodes alike. Writing an existing key
    /// again replaces the value but keeps the key's original position.
    /// `Value::Null` is a real value: the key is present and renders as
    /// `null`, never dropped.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        match self.top_mut() {
            Value::Object(map) => {
                map.insert(name.into(), value.into());
                Ok(())
            }
            other => Err(Error::InvalidTarget {
                expected: "object",
                found: kind_of(other),
            }),
        }
    }

    /// Build an object child under `name`.
    ///
    /// A closure that writes nothing attaches `{}` - the key is never
    /// omitted.
    pub fn set_object<F>(&mut self, name: impl Into<String>, build: F) -> Result<()>
    where
        F: FnOnce(&mut Builder) -> Result<()>,
    {
        let node = self.scratch(build)?;
        self.set(name, node)
    }

    /// Build an array child under `name`, one object per item.
    pub fn set_array<T, F>(
        &mut self,
        name: impl Into<String>,
        items: impl IntoIterator<Item = T>,
        build: F,
    ) -> Result<()>
    where
        F: FnMut(&mut Builder, T) -> Result<()>,
    {
        let node = self.scratch_array(|json| json.array(items, build))?;
        self.set(name, node)
    }

    /// Build an array child under `name` by extracting `names` from each
    /// item.
    pub fn set_array_extract<S>(
        &mut self,
        name: impl Into<String>,
        items: impl IntoIterator<Item = S>,
        names: &[&str],
    ) -> Result<()>
    where
        S: Serialize,
    {
        let node = self.scratch_array(|json| json.array_extract(items, names))?;
        self.set(name, node)
    }

    /// Build an object child under `name` holding fields extracted from
    /// `source`.
    pub fn set_extract<S>(&mut self, name: impl Into<String>, source: &S, names: &[&str]) -> Result<()>
    where
        S: Serialize + ?Sized,
    {
        let node = self.scratch(|json| json.extract(source, names))?;
        self.set(name, node)
    }

    /// Read each of `names` off `source` and `set` it on the current
    /// object target. A missing field aborts the encode.
    pub fn extract<S>(&mut self, source: &S, names: &[&str]) -> Result<()>
    where
        S: Serialize + ?Sized,
    {
        for (name, value) in read_fields(source, names)? {
            self.set(name, value)?;
        }
        Ok(())
    }

    /// Build one object child and append it to the current array target.
    pub fn child<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce(&mut Builder) -> Result<()>,
    {
        self.ensure_array()?;
        let node = self.scratch(build)?;
        self.append(node)
    }

    /// Build one object per item, in original order, and append each to
    /// the current array target. Empty input yields an empty array.
    pub fn array<T, F>(&mut self, items: impl IntoIterator<Item = T>, mut build: F) -> Result<()>
    where
        F: FnMut(&mut Builder, T) -> Result<()>,
    {
        self.ensure_array()?;
        for item in items {
            let node = self.scratch(|json| build(json, item))?;
            self.append(node)?;
        }
        Ok(())
    }

    /// Append one object per item holding the fields named in `names`.
    pub fn array_extract<S>(&mut self, items: impl IntoIterator<Item = S>, names: &[&str]) -> Result<()>
    where
        S: Serialize,
    {
        self.ensure_array()?;
        for item in items {
            let mut child = Map::new();
            for (name, value) in read_fields(&item, names)? {
                child.insert(name, value);
            }
            self.append(Value::Object(child))?;
        }
        Ok(())
    }

    /// Append each item as-is to the current array target. Used for
    /// arrays of scalars or of prebuilt nodes.
    pub fn array_values<T>(&mut self, items: impl IntoIterator<Item = T>) -> Result<()>
    where
        T: Into<Value>,
    {
        self.ensure_array()?;
        for item in items {
            self.append(item)?;
        }
        Ok(())
    }

    /// Splice one prebuilt node onto the current array target.
    pub fn append(&mut self, node: impl Into<Value>) -> Result<()> {
        self.ensure_array()?;
        if let Value::Array(items) = self.top_mut() {
            items.push(node.into());
        }
        Ok(())
    }

    /// Consume the builder, yielding the finished root node.
    pub fn into_value(mut self) -> Value {
        self.stack.pop().expect("builder stack holds the root frame")
    }

    /// Run `build` against a fresh object frame and hand back the node it
    /// produced. The frame is popped on the error path too, so a failing
    /// closure leaves the stack balanced on its way out.
    pub(crate) fn scratch<F>(&mut self, build: F) -> Result<Value>
    where
        F: FnOnce(&mut Builder) -> Result<()>,
    {
        self.stack.push(Value::Object(Map::new()));
        let outcome = build(self);
        let node = self.stack.pop().expect("scratch frame pushed above");
        outcome.map(|_| node)
    }

    /// Same as `scratch`, but the fresh frame is an array.
    fn scratch_array<F>(&mut self, build: F) -> Result<Value>
    where
        F: FnOnce(&mut Builder) -> Result<()>,
    {
        self.stack.push(Value::Array(Vec::new()));
        let outcome = build(self);
        let node = self.stack.pop().expect("scratch frame pushed above");
        outcome.map(|_| node)
    }

    /// Make the current target an array.
    ///
    /// An empty object target converts in place - this is how the fresh
    /// object root becomes a top-level array, and how an object block that
    /// only issues `child` calls becomes one. A target that already holds
    /// keys cannot convert.
    fn ensure_array(&mut self) -> Result<()> {
        let top = self.top_mut();
        match top {
            Value::Array(_) => Ok(()),
            Value::Object(map) if map.is_empty() => {
                *top = Value::Array(Vec::new());
                Ok(())
            }
            other => Err(Error::InvalidTarget {
                expected: "array",
                found: kind_of(other),
            }),
        }
    }

    fn top_mut(&mut self) -> &mut Value {
        self.stack.last_mut().expect("builder stack is never empty")
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}
