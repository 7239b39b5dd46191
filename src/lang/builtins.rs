use std::cmp::Ordering;
use std::rc::Rc;
use tracing::debug;
use crate::lang::environment::Frame;
use crate::lang::evaluator::{self, EvalError, EvalResult, EVAL};
use crate::lang::value::{Handler, Message, Value, ValueType};

/// A payload type the generic operator handlers work on.
pub trait Operand: Sized + 'static {
    const TYPE: ValueType;

    fn extract(value: &Value) -> Option<&Self>;
    fn wrap(self) -> Value;

    fn matches(value: &Value) -> bool {
        Self::extract(value).is_some()
    }
}

impl Operand for i64 {
    const TYPE: ValueType = ValueType::Integer;

    fn extract(value: &Value) -> Option<&Self> {
        match value {
            Value::Integer(value) => Some(value),
            _ => None,
        }
    }

    fn wrap(self) -> Value {
        Value::Integer(self)
    }
}

impl Operand for f64 {
    const TYPE: ValueType = ValueType::Float;

    fn extract(value: &Value) -> Option<&Self> {
        match value {
            Value::Float(value) => Some(value),
            _ => None,
        }
    }

    fn wrap(self) -> Value {
        Value::Float(self)
    }
}

impl Operand for Rc<str> {
    const TYPE: ValueType = ValueType::String;

    fn extract(value: &Value) -> Option<&Self> {
        match value {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    fn wrap(self) -> Value {
        Value::String(self)
    }
}

/// Both sides have to be a `T`; the result is wrapped back into the same variant.
pub fn binary_operator<T: Operand>(verb: &str, operation: fn(&T, &T) -> T) -> Handler {
    Handler::new(verb, move |subject, message, _frame| {
        match (T::extract(subject), T::extract(&message.object)) {
            (Some(left), Some(right)) => Ok(operation(left, right).wrap()),
            _ => Err(EvalError::type_mismatch(T::TYPE, subject, &message.object)),
        }
    })
}

type Predicate = fn(&Value) -> bool;
type OrderingTest = fn(Option<Ordering>) -> bool;

#[derive(Clone, Copy)]
pub struct Comparison {
    expected: ValueType,
    left: Predicate,
    right: Predicate,
    order: fn(&Value, &Value) -> Option<Ordering>,
    reply: fn(&Value, &Value) -> Value,
}

impl Comparison {
    /// Compares two `T`s. A `Nil` operand is accepted but never ordered, so only `!=` holds for it.
    pub fn typed<T: Operand + PartialOrd>() -> Comparison {
        Comparison {
            expected: T::TYPE,
            left: T::matches,
            right: |value| value.is_nil() || T::matches(value),
            order: |left, right| match (T::extract(left), T::extract(right)) {
                (Some(left), Some(right)) => left.partial_cmp(right),
                _ => None,
            },
            reply: |left, _right| left.clone(),
        }
    }

    /// `Nil` against anything: equal only to `Nil`, and replies with a sentinel in that case.
    pub fn nil() -> Comparison {
        Comparison {
            expected: ValueType::Nil,
            left: Value::is_nil,
            right: |_| true,
            order: |_left, right| if right.is_nil() { Some(Ordering::Equal) } else { None },
            reply: |_left, right| if right.is_nil() { Value::Integer(1) } else { right.clone() },
        }
    }

    pub fn handler(self, verb: &str, test: OrderingTest) -> Handler {
        Handler::new(verb, move |subject, message, _frame| {
            if !(self.left)(subject) || !(self.right)(&message.object) {
                return Err(EvalError::type_mismatch(self.expected, subject, &message.object));
            }

            if test((self.order)(subject, &message.object)) {
                Ok((self.reply)(subject, &message.object))
            } else {
                Ok(Value::Nil)
            }
        })
    }

    pub fn handlers(self) -> Vec<Handler> {
        vec![
            self.handler("<", less),
            self.handler("<=", less_equal),
            self.handler(">", greater),
            self.handler(">=", greater_equal),
            self.handler("=", equal),
            self.handler("!=", not_equal),
        ]
    }
}

fn less(ordering: Option<Ordering>) -> bool {
    matches!(ordering, Some(Ordering::Less))
}

fn less_equal(ordering: Option<Ordering>) -> bool {
    matches!(ordering, Some(Ordering::Less | Ordering::Equal))
}

fn greater(ordering: Option<Ordering>) -> bool {
    matches!(ordering, Some(Ordering::Greater))
}

fn greater_equal(ordering: Option<Ordering>) -> bool {
    matches!(ordering, Some(Ordering::Greater | Ordering::Equal))
}

fn equal(ordering: Option<Ordering>) -> bool {
    matches!(ordering, Some(Ordering::Equal))
}

fn not_equal(ordering: Option<Ordering>) -> bool {
    !equal(ordering)
}

fn never(_ordering: Option<Ordering>) -> bool {
    false
}

// Control flow. `Nil` is the only false value.

/// `cond ? then:else`. The chosen side is evaluated once more, which forces a `Later` branch.
fn ternary(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    let Value::Pair(then, otherwise) = &message.object else {
        return Err(EvalError::type_mismatch(ValueType::Pair, subject, &message.object));
    };

    evaluator::evaluate(frame, if subject.is_nil() { otherwise } else { then })
}

fn and(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    if subject.is_nil() { Ok(Value::Nil) }
    else { evaluator::evaluate(frame, &message.object) }
}

fn or(subject: &Value, message: &Message, frame: &Rc<Frame>) -> EvalResult<Value> {
    if subject.is_nil() { evaluator::evaluate(frame, &message.object) }
    else { Ok(subject.clone()) }
}

fn map_get(subject: &Value, message: &Message, _frame: &Rc<Frame>) -> EvalResult<Value> {
    let Value::Map(entries) = subject else {
        return Err(EvalError::type_mismatch(ValueType::Map, subject, &message.object));
    };
    let Value::String(key) = &message.object else {
        return Err(EvalError::type_mismatch(ValueType::String, subject, &message.object));
    };

    Ok(entries.get(&**key).cloned().unwrap_or(Value::Nil))
}

/// Binds every handler under its own verb in a fresh, flat frame.
pub fn prototype(handlers: Vec<Handler>) -> Rc<Frame> {
    let prototype = Frame::new();

    for handler in handlers {
        let verb = handler.verb().to_owned();
        prototype.bind(verb, Value::Handler(handler));
    }

    Rc::new(prototype)
}

/// The built-in replies for one type. `Handler` values have none.
pub fn prototype_for(value_type: ValueType) -> Option<Rc<Frame>> {
    let eval: fn(&Value, &Message, &Rc<Frame>) -> EvalResult<Value> = match value_type {
        ValueType::Nil | ValueType::Integer | ValueType::Float | ValueType::String => evaluator::identity_eval,
        ValueType::Name => evaluator::name_eval,
        ValueType::Later => evaluator::later_eval,
        ValueType::Block => evaluator::block_eval,
        ValueType::Array => evaluator::array_eval,
        ValueType::Map => evaluator::map_eval,
        ValueType::Pair => evaluator::pair_eval,
        ValueType::Message => evaluator::message_eval,
        ValueType::Send => evaluator::send_eval,
        ValueType::Handler => return None,
    };

    let mut handlers = vec![
        Handler::new(EVAL, eval),
        Handler::new("?", ternary),
        Handler::new("and", and),
        Handler::new("or", or),
    ];

    match value_type {
        ValueType::Nil => {
            let nil = Comparison::nil();

            handlers.extend([
                nil.handler("<", never),
                nil.handler("<=", never),
                nil.handler(">", never),
                nil.handler(">=", never),
                nil.handler("=", equal),
                nil.handler("!=", not_equal),
            ]);
        },
        ValueType::Integer => {
            handlers.extend([
                binary_operator::<i64>("+", |a, b| a.wrapping_add(*b)),
                binary_operator::<i64>("-", |a, b| a.wrapping_sub(*b)),
                binary_operator::<i64>("*", |a, b| a.wrapping_mul(*b)),
            ]);
            handlers.extend(Comparison::typed::<i64>().handlers());
        },
        ValueType::Float => {
            handlers.extend([
                binary_operator::<f64>("+", |a, b| a + b),
                binary_operator::<f64>("-", |a, b| a - b),
                binary_operator::<f64>("*", |a, b| a * b),
                binary_operator::<f64>("/", |a, b| a / b),
            ]);
            handlers.extend(Comparison::typed::<f64>().handlers());
        },
        ValueType::String => {
            handlers.push(binary_operator::<Rc<str>>("+", |a, b| Rc::from(format!("{}{}", a, b))));
            handlers.extend(Comparison::typed::<Rc<str>>().handlers());
        },
        ValueType::Map => handlers.push(Handler::new(".", map_get)),
        _ => {},
    }

    Some(prototype(handlers))
}

/// A root holding every built-in prototype, wrapped so evaluation starts one `right().down()` below it.
pub fn root_frame() -> Rc<Frame> {
    let root = Frame::new();
    let mut count = 0;

    for value_type in ValueType::ALL {
        if let Some(prototype) = prototype_for(value_type) {
            root.bind_type(value_type, prototype);
            count += 1;
        }
    }

    debug!(prototypes = count, "root frame ready");
    Rc::new(Rc::new(Rc::new(root).right()).down())
}
