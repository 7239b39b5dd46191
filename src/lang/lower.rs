use std::collections::BTreeMap;
use crate::lang::ast::{Expr, MessageExpr};
use crate::lang::value::{Message, Value};
use crate::util::stack::ensure_sufficient_stack;

/// Turns a parse tree into the value tree the evaluator runs. Purely structural.
pub fn lower_to_value(expr: &Expr) -> Value {
    ensure_sufficient_stack(|| match expr {
        Expr::Nil => Value::Nil,
        Expr::ConstantInt(value) => Value::Integer(*value),
        Expr::ConstantFloat(value) => Value::Float(*value),
        Expr::ConstantString(value) => Value::string(value.as_str()),
        Expr::Identifier(name) => Value::name(name.as_str()),

        Expr::Later(expr) => Value::later(lower_to_value(expr)),
        Expr::Block(items) => Value::block(items.iter().map(lower_to_value).collect()),
        Expr::Array(items) => Value::array(items.iter().map(lower_to_value).collect()),
        Expr::Map(entries) => {
            let mut map = BTreeMap::new();

            // Later entries overwrite earlier ones with the same key
            for (key, value) in entries {
                map.insert(key.clone(), lower_to_value(value));
            }

            Value::map(map)
        },
        Expr::Pair(a, b) => Value::pair(lower_to_value(a), lower_to_value(b)),

        Expr::Message(message) => Value::Message(lower_message(message).into()),
        Expr::Send { subject, message } => Value::send(lower_to_value(subject), lower_message(message)),
    })
}

fn lower_message(message: &MessageExpr) -> Message {
    Message::new(message.verb.as_str(), lower_to_value(&message.object))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn lowers_sends_and_messages() {
        let expr = Expr::Send {
            subject: Box::new(Expr::ConstantInt(1)),
            message: MessageExpr::new(String::from("+"), Expr::Message(MessageExpr::new(String::from("-"), Expr::Nil))),
        };

        assert_eq!(lower_to_value(&expr), Value::send(Value::from(1), Message::new("+", Value::message("-", Value::Nil))));
    }

    #[test]
    fn duplicate_map_keys_keep_the_last_value() {
        let expr = Expr::Map(vec![
            (String::from("a"), Expr::ConstantInt(1)),
            (String::from("b"), Expr::ConstantInt(2)),
            (String::from("a"), Expr::ConstantInt(3)),
        ]);

        let mut expected = BTreeMap::new();
        expected.insert(String::from("a"), Value::from(3));
        expected.insert(String::from("b"), Value::from(2));

        assert_eq!(lower_to_value(&expr), Value::map(expected));
    }
}
