//! Runtime values produced by the evaluator.
//!
//! The same `Object` type carries ordinary values and the signals that stop
//! a statement sequence (`Return`, `Error`, and a `Block` whose evaluation
//! exited early). Booleans and null are shared singletons compared by
//! pointer identity.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::error::RuntimeError;

pub type ObjectRef = Arc<Object>;

lazy_static! {
    pub static ref TRUE: ObjectRef = Arc::new(Object::Boolean(true));
    pub static ref FALSE: ObjectRef = Arc::new(Object::Boolean(false));
    pub static ref NULL: ObjectRef = Arc::new(Object::Null);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Integer,
    Boolean,
    Null,
    Return,
    Error,
    Block,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::Return => "RETURN",
            ObjectType::Error => "ERROR",
            ObjectType::Block => "BLOCK",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    Null,
    Return(ObjectRef),
    Error(RuntimeError),
    Block(BlockResult),
}

/// Outcome of evaluating a statement sequence.
///
/// When `early_exit` is set the last value is the `Return`, `Error` or
/// early-exit `Block` that stopped the sequence.
#[derive(Debug, Default, PartialEq)]
pub struct BlockResult {
    pub values: Vec<ObjectRef>,
    pub early_exit: bool,
}

impl Object {
    pub fn type_name(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::Return(_) => ObjectType::Return,
            Object::Error(_) => ObjectType::Error,
            Object::Block(_) => ObjectType::Block,
        }
    }

    pub fn integer(value: i64) -> ObjectRef {
        Arc::new(Object::Integer(value))
    }

    pub fn error(error: RuntimeError) -> ObjectRef {
        Arc::new(Object::Error(error))
    }

    /// Returns one of the boolean singletons, never a fresh allocation.
    pub fn native_bool(value: bool) -> ObjectRef {
        if value {
            TRUE.clone()
        } else {
            FALSE.clone()
        }
    }

    /// Whether this object stops the statement sequence that produced it.
    pub fn is_unwinding(&self) -> bool {
        match self {
            Object::Return(_) | Object::Error(_) => true,
            Object::Block(block) => block.early_exit,
            _ => false,
        }
    }

    /// The runtime error that stopped evaluation, looking through early-exit
    /// blocks.
    pub fn as_error(&self) -> Option<&RuntimeError> {
        match self {
            Object::Error(error) => Some(error),
            Object::Block(block) if block.early_exit => {
                block.values.last().and_then(|last| last.as_error())
            }
            _ => None,
        }
    }
}

/// Only the `TRUE` singleton itself is truthy.
pub fn is_truthy(object: &ObjectRef) -> bool {
    Arc::ptr_eq(object, &TRUE)
}

/// The value a caller should show for `object`: return wrappers are opened
/// and blocks report their last value.
pub fn final_value(object: &ObjectRef) -> ObjectRef {
    match &**object {
        Object::Return(inner) => final_value(inner),
        Object::Block(block) => match block.values.last() {
            Some(last) => final_value(last),
            None => NULL.clone(),
        },
        _ => object.clone(),
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Integer(value) => write!(f, "{value}"),
            Object::Boolean(value) => write!(f, "{value}"),
            Object::Null => write!(f, "null"),
            Object::Return(inner) => write!(f, "{inner}"),
            Object::Error(error) => write!(f, "ERROR: {error}"),
            Object::Block(block) => {
                for (i, value) in block.values.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}
