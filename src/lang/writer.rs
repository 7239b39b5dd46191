use std::fmt::Write;
use crate::lang::value::{Message, Value};
use crate::util;
use crate::util::stack::ensure_sufficient_stack;

/// Renders a value in source syntax.
pub fn render(value: &Value) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_value(value, &mut out);
    out
}

pub fn write_value(value: &Value, out: &mut impl Write) -> std::fmt::Result {
    ensure_sufficient_stack(|| match value {
        Value::Nil => write!(out, "()"),
        Value::Integer(value) => write!(out, "{}", value),
        Value::Float(value) => write_float(*value, out),
        Value::String(value) => write!(out, "{}", util::quote_str(value)),
        Value::Name(name) => write!(out, "{}", name),

        Value::Later(value) => {
            write!(out, "@(")?;
            write_value(value, out)?;
            write!(out, ")")
        },
        Value::Block(items) => write_sequence("{", items, "}", out),
        Value::Array(items) => write_sequence("[", items, "]", out),
        Value::Map(entries) => {
            write!(out, "#{{")?;

            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }

                write!(out, "{}: ", util::quote_str(key))?;
                write_value(value, out)?;
            }

            write!(out, "}}")
        },
        Value::Pair(a, b) => {
            write_value(a, out)?;
            write!(out, ":")?;
            write_value(b, out)
        },

        Value::Message(message) => {
            write!(out, "\\ ")?;
            write_message(message, out)
        },
        Value::Send(send) => {
            write_value(&send.subject, out)?;
            write!(out, " ")?;
            write_message(&send.message, out)
        },
        Value::Handler(_) => write!(out, "Handler"),
    })
}

fn write_message(message: &Message, out: &mut impl Write) -> std::fmt::Result {
    write!(out, "{} ", message.verb)?;
    write_value(&message.object, out)
}

fn write_sequence(open: &str, items: &[Value], close: &str, out: &mut impl Write) -> std::fmt::Result {
    write!(out, "{}", open)?;

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }

        write_value(item, out)?;
    }

    write!(out, "{}", close)
}

fn write_float(value: f64, out: &mut impl Write) -> std::fmt::Result {
    // Integral floats keep their `.0` so they lex as floats again
    if value.is_finite() && value.fract() == 0.0 { write!(out, "{:.1}", value) }
    else { write!(out, "{}", value) }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use pretty_assertions::assert_eq;
    use crate::lang::value::Handler;
    use super::*;

    #[test]
    fn scalars() {
        assert_eq!(render(&Value::Nil), "()");
        assert_eq!(render(&Value::from(-12)), "-12");
        assert_eq!(render(&Value::from(1.5)), "1.5");
        assert_eq!(render(&Value::from(2.0)), "2.0");
        assert_eq!(render(&Value::from("say \"hi\" \\o/")), r#""say \"hi\" \\o/""#);
        assert_eq!(render(&Value::name("foo")), "foo");
    }

    #[test]
    fn composites() {
        assert_eq!(render(&Value::later(Value::name("a"))), "@(a)");
        assert_eq!(render(&Value::block(vec![Value::from(1), Value::from(2)])), "{1, 2}");
        assert_eq!(render(&Value::block(vec![])), "{}");
        assert_eq!(render(&Value::array(vec![Value::from(1), Value::from("x")])), "[1, \"x\"]");
        assert_eq!(render(&Value::pair(Value::from(1), Value::pair(Value::from(2), Value::from(3)))), "1:2:3");

        let mut entries = BTreeMap::new();
        entries.insert(String::from("b"), Value::from(2));
        entries.insert(String::from("a"), Value::Nil);
        assert_eq!(render(&Value::map(entries)), "#{\"a\": (), \"b\": 2}");
    }

    #[test]
    fn messages_and_sends() {
        assert_eq!(render(&Value::message("+", Value::from(1))), "\\ + 1");
        assert_eq!(render(&Value::send(Value::from(1), Message::new("+", Value::from(2)))), "1 + 2");
        assert_eq!(render(&Value::Handler(Handler::new("eval", |s, _, _| Ok(s.clone())))), "Handler");
    }
}
