use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::lang::environment::Frame;
use crate::lang::evaluator::EvalResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
    // @formatter:off
    Nil,
    Integer, Float, String,
    Name, Later,
    Block, Array, Map, Pair,
    Message, Send,
    Handler,
    // @formatter:on
}

impl ValueType {
    pub const ALL: [ValueType; 13] = [
        ValueType::Nil,
        ValueType::Integer, ValueType::Float, ValueType::String,
        ValueType::Name, ValueType::Later,
        ValueType::Block, ValueType::Array, ValueType::Map, ValueType::Pair,
        ValueType::Message, ValueType::Send,
        ValueType::Handler,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Nil => "Nil",
            ValueType::Integer => "Integer",
            ValueType::Float => "Float",
            ValueType::String => "String",
            ValueType::Name => "Name",
            ValueType::Later => "Later",
            ValueType::Block => "Block",
            ValueType::Array => "Array",
            ValueType::Map => "Map",
            ValueType::Pair => "Pair",
            ValueType::Message => "Message",
            ValueType::Send => "Send",
            ValueType::Handler => "Handler",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A runtime value. Payloads are shared, so cloning a value never copies a tree.
#[derive(Clone)]
pub enum Value {
    Nil,
    Integer(i64),
    Float(f64),
    String(Rc<str>),
    Name(Rc<str>),
    Later(Rc<Value>),
    Block(Rc<[Value]>),
    Array(Rc<[Value]>),
    Map(Rc<BTreeMap<String, Value>>),
    Pair(Rc<Value>, Rc<Value>),
    Message(Rc<Message>),
    Send(Rc<Send>),
    Handler(Handler),
}

impl Value {
    pub fn string(value: impl Into<Rc<str>>) -> Value {
        Value::String(value.into())
    }

    pub fn name(name: impl Into<Rc<str>>) -> Value {
        Value::Name(name.into())
    }

    pub fn later(value: Value) -> Value {
        Value::Later(Rc::new(value))
    }

    pub fn block(items: Vec<Value>) -> Value {
        Value::Block(items.into())
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(items.into())
    }

    pub fn map(entries: BTreeMap<String, Value>) -> Value {
        Value::Map(Rc::new(entries))
    }

    pub fn pair(a: Value, b: Value) -> Value {
        Value::Pair(Rc::new(a), Rc::new(b))
    }

    pub fn message(verb: impl Into<Rc<str>>, object: Value) -> Value {
        Value::Message(Rc::new(Message::new(verb, object)))
    }

    pub fn send(subject: Value, message: Message) -> Value {
        Value::Send(Rc::new(Send { subject, message: Rc::new(message) }))
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Nil => ValueType::Nil,
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Name(_) => ValueType::Name,
            Value::Later(_) => ValueType::Later,
            Value::Block(_) => ValueType::Block,
            Value::Array(_) => ValueType::Array,
            Value::Map(_) => ValueType::Map,
            Value::Pair(_, _) => ValueType::Pair,
            Value::Message(_) => ValueType::Message,
            Value::Send(_) => ValueType::Send,
            Value::Handler(_) => ValueType::Handler,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

/// Takes the value out of `value` if nothing else shares it.
fn release_unique(value: &mut Rc<Value>, pending: &mut Vec<Value>) {
    if let Some(value) = Rc::get_mut(value) {
        pending.push(std::mem::replace(value, Value::Nil));
    }
}

impl Value {
    /// Moves every uniquely owned child into `pending`, leaving `Nil` in its place.
    /// Shared children only lose a reference.
    fn release_children(&mut self, pending: &mut Vec<Value>) {
        match self {
            Value::Later(value) => release_unique(value, pending),
            Value::Block(items) | Value::Array(items) => if let Some(items) = Rc::get_mut(items) {
                pending.extend(items.iter_mut().map(|item| std::mem::replace(item, Value::Nil)));
            },
            Value::Map(entries) => if let Some(entries) = Rc::get_mut(entries) {
                pending.extend(entries.values_mut().map(|value| std::mem::replace(value, Value::Nil)));
            },
            Value::Pair(a, b) => {
                release_unique(a, pending);
                release_unique(b, pending);
            },
            Value::Message(message) => if let Some(message) = Rc::get_mut(message) {
                pending.push(std::mem::replace(&mut message.object, Value::Nil));
            },
            Value::Send(send) => if let Some(send) = Rc::get_mut(send) {
                pending.push(std::mem::replace(&mut send.subject, Value::Nil));

                if let Some(message) = Rc::get_mut(&mut send.message) {
                    pending.push(std::mem::replace(&mut message.object, Value::Nil));
                }
            },
            _ => {},
        }
    }
}

// Nested values are torn down from a work list instead of one drop frame per level
impl Drop for Value {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.release_children(&mut pending);

        while let Some(mut value) = pending.pop() {
            value.release_children(&mut pending);
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Name(a), Value::Name(b)) => a == b,
            (Value::Later(a), Value::Later(b)) => a == b,
            (Value::Block(a), Value::Block(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Pair(a1, b1), Value::Pair(a2, b2)) => a1 == a2 && b1 == b2,
            (Value::Message(a), Value::Message(b)) => a == b,
            (Value::Send(a), Value::Send(b)) => a == b,
            (Value::Handler(a), Value::Handler(b)) => a == b,
            _ => false,
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::lang::writer::render(self))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::lang::writer::render(self))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub verb: Rc<str>,
    pub object: Value,
}

impl Message {
    pub fn new(verb: impl Into<Rc<str>>, object: Value) -> Message {
        Message { verb: verb.into(), object }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Send {
    pub subject: Value,
    pub message: Rc<Message>,
}

pub type HandlerFn = dyn Fn(&Value, &Message, &Rc<Frame>) -> EvalResult<Value>;

/// A native reply bound under a verb in a prototype frame.
#[derive(Clone)]
pub struct Handler {
    verb: Rc<str>,
    function: Rc<HandlerFn>,
}

impl Handler {
    pub fn new(verb: impl Into<Rc<str>>, function: impl Fn(&Value, &Message, &Rc<Frame>) -> EvalResult<Value> + 'static) -> Handler {
        Handler { verb: verb.into(), function: Rc::new(function) }
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    pub fn handle(&self, subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
        (self.function)(subject, message, frame)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.function, &other.function)
    }
}

impl Debug for Handler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handler({})", self.verb)
    }
}
