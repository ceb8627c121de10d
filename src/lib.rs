//! A tree-walking interpreter for a small expression language with integers,
//! booleans, `let`/assignment, `if`/`else`, blocks and `return`.
//!
//! Source text flows through the [`scanner`], the Pratt [`parser`] and the
//! [`interpreter`], which reports returns and runtime errors as ordinary
//! [`object::Object`] values instead of unwinding the host stack.

mod ast_display;
pub mod environment;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod object;
pub mod parser;
pub mod scanner;
pub mod stmt;
pub mod token;

use environment::Environment;
use error::ParseError;
use object::ObjectRef;

/// Parses and evaluates `source` against `environment`.
///
/// Nothing is evaluated when parsing reports any error.
pub fn run_source(
    source: &str,
    environment: &mut Environment,
) -> Result<Vec<ObjectRef>, Vec<ParseError>> {
    let (program, errors) = parser::parse_source(source);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(interpreter::evaluate_program(&program, environment))
}
