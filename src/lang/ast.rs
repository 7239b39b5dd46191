use std::fmt::{Debug, Formatter};
use crate::util::stack::ensure_sufficient_stack;

#[derive(Clone, PartialEq)]
pub enum Expr {
    Nil,
    ConstantInt(i64),
    ConstantFloat(f64),
    ConstantString(String),
    Identifier(String),

    Later(Box<Expr>),
    Block(Vec<Expr>),
    Array(Vec<Expr>),
    /// Entries in source order; duplicates are resolved when lowering.
    Map(Vec<(String, Expr)>),
    Pair(Box<Expr>, Box<Expr>),

    /// A quoted message (`\ verb value`).
    Message(MessageExpr),
    Send {
        subject: Box<Expr>,
        message: MessageExpr,
    },
}

#[derive(Clone, PartialEq)]
pub struct MessageExpr {
    pub verb: String,
    pub object: Box<Expr>,
}

impl MessageExpr {
    pub fn new(verb: String, object: Expr) -> MessageExpr {
        MessageExpr { verb, object: Box::new(object) }
    }
}

impl Expr {
    /// Moves every direct child into `pending`, leaving `Nil` in its place.
    fn release_children(&mut self, pending: &mut Vec<Expr>) {
        match self {
            Expr::Later(expr) => pending.push(std::mem::replace(&mut **expr, Expr::Nil)),
            Expr::Block(items) | Expr::Array(items) => pending.append(items),
            Expr::Map(entries) => pending.extend(entries.drain(..).map(|(_, value)| value)),
            Expr::Pair(a, b) => {
                pending.push(std::mem::replace(&mut **a, Expr::Nil));
                pending.push(std::mem::replace(&mut **b, Expr::Nil));
            },
            Expr::Message(message) => pending.push(std::mem::replace(&mut *message.object, Expr::Nil)),
            Expr::Send { subject, message } => {
                pending.push(std::mem::replace(&mut **subject, Expr::Nil));
                pending.push(std::mem::replace(&mut *message.object, Expr::Nil));
            },
            _ => {},
        }
    }
}

// A long send chain nests one level per message; tear it down from a work list
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.release_children(&mut pending);

        while let Some(mut expr) = pending.pop() {
            expr.release_children(&mut pending);
        }
    }
}

impl Debug for MessageExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:?}", self.verb, self.object)
    }
}

// Fully parenthesized, so the tree shape is visible
impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        ensure_sufficient_stack(|| match self {
            Expr::Nil => write!(f, "()"),
            Expr::ConstantInt(value) => write!(f, "{}", value),
            Expr::ConstantFloat(value) => write!(f, "{:?}", value),
            Expr::ConstantString(value) => write!(f, "{:?}", value),
            Expr::Identifier(name) => write!(f, "{}", name),

            Expr::Later(expr) => write!(f, "@({:?})", expr),
            Expr::Block(items) => write!(f, "{{{}}}", items.iter()
                .map(|item| format!("{:?}", item)).collect::<Vec<String>>().join(", ")),
            Expr::Array(items) => write!(f, "[{}]", items.iter()
                .map(|item| format!("{:?}", item)).collect::<Vec<String>>().join(", ")),
            Expr::Map(entries) => write!(f, "#{{{}}}", entries.iter()
                .map(|(key, value)| format!("{:?}: {:?}", key, value)).collect::<Vec<String>>().join(", ")),
            Expr::Pair(a, b) => write!(f, "({:?}:{:?})", a, b),

            Expr::Message(message) => write!(f, "\\ {:?}", message),
            Expr::Send { subject, message } => write!(f, "({:?} {:?})", subject, message),
        })
    }
}
