//! IR statements, expressions and values.
//!
//! Statements are the unit the block builder slices into basic blocks. Each kind of
//! statement, expression and value is one variant of a tagged union, and every
//! consumer matches on them exhaustively.
//!
//! The `Display` implementations produce the textual IR form:
//!
//! | Statement | Text |
//! |-----------|------|
//! | [`Statement::Definition`] | `$a = $b + 1` |
//! | [`Statement::Label`] | `L1:` |
//! | [`Statement::Jump`] | `jmp L1` |
//! | [`Statement::ConditionalJump`] | `jz $c L1` / `jnz $c L1` |
//! | [`Statement::Return`] | `ret` / `ret $a` |
//! | [`Statement::VoidCall`] | `call f($a, 2)` |

use std::fmt;

use strum::Display;

/// A named IR variable, written `$name` in text form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(String);

impl Variable {
    /// Creates a variable. A leading `$` is accepted and stripped.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Variable(name.strip_prefix('$').unwrap_or(name).to_string())
    }

    /// Returns the bare name without the `$` sigil.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// An operand: either a variable or an integer constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A variable read
    Variable(Variable),
    /// An integer literal
    Constant(i64),
}

impl Value {
    /// Shorthand for a variable operand.
    #[must_use]
    pub fn var(name: &str) -> Self {
        Value::Variable(Variable::new(name))
    }

    /// Returns the variable read by this operand, if any.
    #[must_use]
    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Value::Variable(var) => Some(var),
            Value::Constant(_) => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Constant(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Constant(i64::from(value))
    }
}

impl From<Variable> for Value {
    fn from(var: Variable) -> Self {
        Value::Variable(var)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Variable(var) => write!(f, "{var}"),
            Value::Constant(value) => write!(f, "{value}"),
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum UnaryOp {
    /// Arithmetic negation
    #[strum(serialize = "-")]
    Neg,
    /// Logical negation
    #[strum(serialize = "!")]
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BinaryOp {
    /// Addition
    #[strum(serialize = "+")]
    Add,
    /// Subtraction
    #[strum(serialize = "-")]
    Sub,
    /// Multiplication
    #[strum(serialize = "*")]
    Mul,
    /// Division
    #[strum(serialize = "/")]
    Div,
    /// Remainder
    #[strum(serialize = "%")]
    Rem,
    /// Equality comparison
    #[strum(serialize = "==")]
    Eq,
    /// Inequality comparison
    #[strum(serialize = "!=")]
    Ne,
    /// Less-than comparison
    #[strum(serialize = "<")]
    Lt,
    /// Less-or-equal comparison
    #[strum(serialize = "<=")]
    Le,
    /// Greater-than comparison
    #[strum(serialize = ">")]
    Gt,
    /// Greater-or-equal comparison
    #[strum(serialize = ">=")]
    Ge,
}

/// Right-hand side of a definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    /// A plain operand
    Value(Value),
    /// A unary operation
    Unary {
        /// The operator
        op: UnaryOp,
        /// The operand
        operand: Value,
    },
    /// A binary operation
    Binary {
        /// The operator
        op: BinaryOp,
        /// Left operand
        lhs: Value,
        /// Right operand
        rhs: Value,
    },
    /// A call whose result is used
    Call {
        /// Callee name
        function: String,
        /// Call arguments
        args: Vec<Value>,
    },
}

impl Expression {
    /// Shorthand for a binary expression.
    #[must_use]
    pub fn binary(op: BinaryOp, lhs: impl Into<Value>, rhs: impl Into<Value>) -> Self {
        Expression::Binary {
            op,
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// Returns the operands read by this expression, in source order.
    #[must_use]
    pub fn operands(&self) -> Vec<&Value> {
        match self {
            Expression::Value(value) | Expression::Unary { operand: value, .. } => vec![value],
            Expression::Binary { lhs, rhs, .. } => vec![lhs, rhs],
            Expression::Call { args, .. } => args.iter().collect(),
        }
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Expression::Value(value)
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Expression::Value(Value::Constant(value))
    }
}

impl From<i32> for Expression {
    fn from(value: i32) -> Self {
        Expression::Value(Value::from(value))
    }
}

impl From<Variable> for Expression {
    fn from(var: Variable) -> Self {
        Expression::Value(Value::Variable(var))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Value(value) => write!(f, "{value}"),
            Expression::Unary { op, operand } => write!(f, "{op}{operand}"),
            Expression::Binary { op, lhs, rhs } => write!(f, "{lhs} {op} {rhs}"),
            Expression::Call { function, args } => {
                write!(f, "{function}(")?;
                write_args(f, args)?;
                write!(f, ")")
            }
        }
    }
}

/// The test a conditional jump applies to its condition value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum JumpTest {
    /// Jump when the condition is zero
    #[strum(serialize = "jz")]
    Zero,
    /// Jump when the condition is non-zero
    #[strum(serialize = "jnz")]
    NonZero,
}

/// One IR statement of a function body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Statement {
    /// `target = value`
    Definition {
        /// The variable being defined
        target: Variable,
        /// The defining expression
        value: Expression,
    },
    /// A jump target. Labels are unique per function.
    Label(String),
    /// Unconditional jump to a label
    Jump(String),
    /// Jump to `target` when `test` holds for `condition`, fall through otherwise
    ConditionalJump {
        /// Zero / non-zero test
        test: JumpTest,
        /// The tested value
        condition: Value,
        /// Jump target label
        target: String,
    },
    /// Function return, with an optional value
    Return(Option<Value>),
    /// A call whose result is discarded
    VoidCall {
        /// Callee name
        function: String,
        /// Call arguments
        args: Vec<Value>,
    },
}

impl Statement {
    /// Creates `target = value`.
    #[must_use]
    pub fn define(target: &str, value: impl Into<Expression>) -> Self {
        Statement::Definition {
            target: Variable::new(target),
            value: value.into(),
        }
    }

    /// Creates a label statement.
    #[must_use]
    pub fn label(name: &str) -> Self {
        Statement::Label(name.to_string())
    }

    /// Creates an unconditional jump.
    #[must_use]
    pub fn jump(target: &str) -> Self {
        Statement::Jump(target.to_string())
    }

    /// Creates `jz condition target`.
    #[must_use]
    pub fn jz(condition: impl Into<Value>, target: &str) -> Self {
        Statement::ConditionalJump {
            test: JumpTest::Zero,
            condition: condition.into(),
            target: target.to_string(),
        }
    }

    /// Creates `jnz condition target`.
    #[must_use]
    pub fn jnz(condition: impl Into<Value>, target: &str) -> Self {
        Statement::ConditionalJump {
            test: JumpTest::NonZero,
            condition: condition.into(),
            target: target.to_string(),
        }
    }

    /// Creates a return statement.
    #[must_use]
    pub fn ret(value: Option<Value>) -> Self {
        Statement::Return(value)
    }

    /// Creates a call statement whose result is discarded.
    #[must_use]
    pub fn call(function: &str, args: Vec<Value>) -> Self {
        Statement::VoidCall {
            function: function.to_string(),
            args,
        }
    }

    /// Returns `true` for label statements.
    #[must_use]
    pub fn is_label(&self) -> bool {
        matches!(self, Statement::Label(_))
    }

    /// Returns `true` for unconditional and conditional jumps.
    #[must_use]
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            Statement::Jump(_) | Statement::ConditionalJump { .. }
        )
    }

    /// Returns the variable written by this statement, if any.
    #[must_use]
    pub fn defined_variable(&self) -> Option<&Variable> {
        match self {
            Statement::Definition { target, .. } => Some(target),
            Statement::Label(_)
            | Statement::Jump(_)
            | Statement::ConditionalJump { .. }
            | Statement::Return(_)
            | Statement::VoidCall { .. } => None,
        }
    }

    /// Returns the variables read by this statement, in source order.
    #[must_use]
    pub fn used_variables(&self) -> Vec<&Variable> {
        let operands: Vec<&Value> = match self {
            Statement::Definition { value, .. } => value.operands(),
            Statement::ConditionalJump { condition, .. } => vec![condition],
            Statement::Return(value) => value.iter().collect(),
            Statement::VoidCall { args, .. } => args.iter().collect(),
            Statement::Label(_) | Statement::Jump(_) => Vec::new(),
        };
        operands.into_iter().filter_map(Value::as_variable).collect()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Definition { target, value } => write!(f, "{target} = {value}"),
            Statement::Label(name) => write!(f, "{name}:"),
            Statement::Jump(target) => write!(f, "jmp {target}"),
            Statement::ConditionalJump {
                test,
                condition,
                target,
            } => write!(f, "{test} {condition} {target}"),
            Statement::Return(None) => write!(f, "ret"),
            Statement::Return(Some(value)) => write!(f, "ret {value}"),
            Statement::VoidCall { function, args } => {
                write!(f, "call {function}(")?;
                write_args(f, args)?;
                write!(f, ")")
            }
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Value]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}
