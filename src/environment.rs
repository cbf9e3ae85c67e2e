use indexmap::IndexMap;

use crate::value::Value;

/// A binding table from symbol name to value.
///
/// Environments are plain owned values with snapshot semantics: a
/// child scope is a full copy of its parent with local bindings
/// overlaid, never a reference into it. Defining a name therefore
/// mutates only the environment object at hand — durable when that
/// object is the session root the host retains, invisible afterward
/// when it is a disposable `let`/call child. Values are `Rc`-shared,
/// so the copy itself is shallow.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: IndexMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// The root table for a fresh session: every builtin plus the
    /// standing `nil`/`true`/`false` bindings.
    pub fn standard() -> Self {
        let mut env = Self::new();
        crate::stdlib::install(&mut env);
        env
    }

    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Snapshots this environment and overlays the given bindings.
    pub fn child(&self, binds: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut env = self.clone();
        for (name, value) in binds {
            env.define(name, value);
        }
        env
    }

    /// Overlays host bindings onto this environment in place.
    pub fn extend(&mut self, binds: impl IntoIterator<Item = (String, Value)>) {
        for (name, value) in binds {
            self.define(name, value);
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
