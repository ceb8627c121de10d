use crate::expr::{Expression, Identifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Let { name: Identifier, value: Expression },
    Return { value: Expression },
    Assignment { name: Identifier, value: Expression },
    While { condition: Expression, body: Block },
    Expression { expression: Expression },
    Block(Block),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Statement>,
}

/// Root of a parsed source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub statements: Vec<Statement>,
}
