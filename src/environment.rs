use std::collections::HashMap;

use crate::{error::RuntimeError, object::ObjectRef};

/// Flat name-to-value table shared by every scope of one session.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, ObjectRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
        }
    }

    /// Binds `name`, overwriting any previous value.
    pub fn set(&mut self, name: &str, value: ObjectRef) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Result<ObjectRef, RuntimeError> {
        match self.bindings.get(name) {
            Some(value) => Ok(value.clone()),
            None => Err(RuntimeError::IdentifierNotFound(name.to_string())),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;

    #[test]
    fn set_overwrites() {
        let mut environment = Environment::new();
        environment.set("a", Object::integer(1));
        environment.set("a", Object::integer(2));
        assert_eq!(*environment.get("a").unwrap(), Object::Integer(2));
    }

    #[test]
    fn missing_name_is_an_error() {
        let environment = Environment::new();
        assert_eq!(
            environment.get("foobar"),
            Err(RuntimeError::IdentifierNotFound("foobar".into()))
        );
    }
}
