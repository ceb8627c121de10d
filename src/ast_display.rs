use std::fmt;

use crate::{
    expr::*,
    stmt::{Block, Program, Statement},
};

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrefixOperator::Bang => write!(f, "!"),
            PrefixOperator::Minus => write!(f, "-"),
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Star => "*",
            InfixOperator::Slash => "/",
            InfixOperator::EqualEqual => "==",
            InfixOperator::BangEqual => "!=",
            InfixOperator::Greater => ">",
            InfixOperator::GreaterEqual => ">=",
            InfixOperator::Less => "<",
            InfixOperator::LessEqual => "<=",
        };
        write!(f, "{symbol}")
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    match items.first() {
        Some(item) => write!(f, "{item}")?,
        _ => {}
    }
    items
        .iter()
        .skip(1)
        .fold(Ok(()), |result, item| result.and_then(|_| write!(f, ", {item}")))
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(identifier) => write!(f, "{identifier}"),
            Expression::IntegerLiteral(value) => write!(f, "{value}"),
            Expression::BooleanLiteral(value) => write!(f, "{value}"),
            Expression::Prefix { operator, right } => write!(f, "({operator}{right})"),
            Expression::Infix {
                operator,
                left,
                right,
            } => write!(f, "({left}{operator}{right})"),
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if {condition} {consequence}")?;
                if !alternative.statements.is_empty() {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            Expression::FunctionLiteral { params, body } => {
                write!(f, "fn(")?;
                write_list(f, params)?;
                write!(f, ") {body}")
            }
            Expression::Call { callee, args } => {
                write!(f, "{callee}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {name} = {value};"),
            Statement::Return { value } => write!(f, "return {value};"),
            Statement::Assignment { name, value } => write!(f, "{name} = {value};"),
            Statement::While { condition, body } => write!(f, "while {condition} {body}"),
            Statement::Expression { expression } => write!(f, "{expression}"),
            Statement::Block(block) => write!(f, "{block}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}
