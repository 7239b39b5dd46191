use std::collections::BTreeMap;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, trace};
use crate::lang::environment::{Frame, RecursionToParent};
use crate::lang::value::{Handler, Message, Value, ValueType};
use crate::util::stack::ensure_sufficient_stack;

/// The message every value is sent to evaluate it.
pub const EVAL: &str = "eval";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EvalError {
    #[error("Name '{0}' not found")]
    NameNotFound(String),
    #[error("HandlerNotFound: no '{verb}' for {value_type} {subject}")]
    HandlerNotFound {
        value_type: ValueType,
        verb: String,
        subject: String,
    },
    #[error("Type mismatch: expected {expected}, got {left} and {right}")]
    TypeMismatch {
        expected: ValueType,
        left: ValueType,
        right: ValueType,
    },
}

impl EvalError {
    pub fn type_mismatch(expected: ValueType, left: &Value, right: &Value) -> EvalError {
        EvalError::TypeMismatch { expected, left: left.value_type(), right: right.value_type() }
    }

    fn handler_not_found(subject: &Value, message: &Message) -> EvalError {
        EvalError::HandlerNotFound {
            value_type: subject.value_type(),
            verb: message.verb.to_string(),
            subject: subject.to_string(),
        }
    }
}

pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluates `value` by sending it `eval` in `frame`.
pub fn evaluate(frame: &Rc<Frame>, value: &Value) -> EvalResult<Value> {
    ensure_sufficient_stack(|| {
        send(frame, value, &Message::new(EVAL, Value::Nil))
    })
}

/// Dispatches `message` to `subject`: type tag to prototype, verb to handler, then calls it.
pub fn send(frame: &Rc<Frame>, subject: &Value, message: &Message) -> EvalResult<Value> {
    let handler = find_handler(frame, subject, message)?;
    handler.handle(subject, message, frame)
}

pub fn find_handler(frame: &Frame, subject: &Value, message: &Message) -> EvalResult<Handler> {
    let value_type = subject.value_type();

    let prototype = match frame.find_type(value_type, RecursionToParent::Always) {
        Some(prototype) => prototype,
        None => {
            debug!(%value_type, verb = %message.verb, "prototype not found");
            return Err(EvalError::handler_not_found(subject, message));
        },
    };

    // Prototypes are flat: the verb has to be bound on the prototype itself
    match prototype.find(&message.verb, RecursionToParent::Never) {
        Some(Value::Handler(ref handler)) => {
            trace!(%value_type, verb = %message.verb, "handler found");
            Ok(handler.clone())
        },
        _ => {
            debug!(%value_type, verb = %message.verb, subject = %subject, "handler not found");
            Err(EvalError::handler_not_found(subject, message))
        },
    }
}

// Default `eval` replies

pub fn identity_eval(subject: &Value, _message: &Message, _frame: &Rc<Frame>) -> EvalResult<Value> {
    Ok(subject.clone())
}

pub fn name_eval(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    let Value::Name(name) = subject else {
        return Err(EvalError::type_mismatch(ValueType::Name, subject, &message.object));
    };

    frame.find(name, RecursionToParent::Always)
        .ok_or_else(|| EvalError::NameNotFound(name.to_string()))
}

/// Forces one layer: the wrapped value comes back unevaluated.
pub fn later_eval(subject: &Value, message: &Message, _frame: &Rc<Frame>) -> EvalResult<Value> {
    match subject {
        Value::Later(value) => Ok(Value::clone(value)),
        _ => Err(EvalError::type_mismatch(ValueType::Later, subject, &message.object)),
    }
}

pub fn block_eval(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    let Value::Block(items) = subject else {
        return Err(EvalError::type_mismatch(ValueType::Block, subject, &message.object));
    };

    let mut result = Value::Nil;

    for item in items.iter() {
        result = evaluate(frame, item)?;
    }

    Ok(result)
}

pub fn array_eval(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    let Value::Array(items) = subject else {
        return Err(EvalError::type_mismatch(ValueType::Array, subject, &message.object));
    };

    let items = items.iter()
        .map(|item| evaluate(frame, item))
        .collect::<EvalResult<Vec<Value>>>()?;

    Ok(Value::array(items))
}

pub fn map_eval(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    let Value::Map(entries) = subject else {
        return Err(EvalError::type_mismatch(ValueType::Map, subject, &message.object));
    };

    let entries = entries.iter()
        .map(|(key, value)| Ok((key.clone(), evaluate(frame, value)?)))
        .collect::<EvalResult<BTreeMap<String, Value>>>()?;

    Ok(Value::map(entries))
}

pub fn pair_eval(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    let Value::Pair(a, b) = subject else {
        return Err(EvalError::type_mismatch(ValueType::Pair, subject, &message.object));
    };

    let a = evaluate(frame, a)?;
    let b = evaluate(frame, b)?;

    Ok(Value::pair(a, b))
}

/// Evaluates the operand only; the verb stays as it is.
pub fn message_eval(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    let Value::Message(quoted) = subject else {
        return Err(EvalError::type_mismatch(ValueType::Message, subject, &message.object));
    };

    let object = evaluate(frame, &quoted.object)?;
    Ok(Value::Message(Rc::new(Message { verb: Rc::clone(&quoted.verb), object })))
}

/// Evaluates subject and message in `frame`, then dispatches in a fresh child frame that
/// binds `it` and `that`. The child's `up_limit` keeps both names local to this one send.
pub fn send_eval(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    let Value::Send(pending) = subject else {
        return Err(EvalError::type_mismatch(ValueType::Send, subject, &message.object));
    };

    let subject = evaluate(frame, &pending.subject)?;
    let message = match evaluate(frame, &Value::Message(Rc::clone(&pending.message)))? {
        Value::Message(ref message) => Rc::clone(message),
        other => return Err(EvalError::type_mismatch(ValueType::Message, &subject, &other)),
    };

    let transient = Rc::new(frame.down().set_up_limit());
    transient.bind("it", subject.clone())
        .bind("that", message.object.clone());

    send(&transient, &subject, &message)
}

#[cfg(test)]
mod tests;
