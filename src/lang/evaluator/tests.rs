use std::collections::BTreeMap;
use crate::lang::builtins::{prototype, root_frame};
use super::*;

fn send_value(subject: Value, verb: &str, object: Value) -> Value {
    Value::send(subject, Message::new(verb, object))
}

mod dispatch {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_missing_prototype() {
        let frame = Rc::new(Frame::new());

        assert_eq!(Err(EvalError::HandlerNotFound {
            value_type: ValueType::Integer,
            verb: String::from("eval"),
            subject: String::from("1"),
        }), evaluate(&frame, &Value::from(1)));
    }

    #[test]
    pub fn test_unknown_verb() {
        assert_eq!(Err(EvalError::HandlerNotFound {
            value_type: ValueType::Integer,
            verb: String::from("unknownverb"),
            subject: String::from("1"),
        }), evaluate(&root_frame(), &send_value(Value::from(1), "unknownverb", Value::from(2))));
    }

    #[test]
    pub fn test_handlers_have_no_prototype() {
        let handler = Value::Handler(Handler::new(EVAL, identity_eval));

        assert_eq!(Err(EvalError::HandlerNotFound {
            value_type: ValueType::Handler,
            verb: String::from("eval"),
            subject: String::from("Handler"),
        }), evaluate(&root_frame(), &handler));
    }

    #[test]
    pub fn test_prototype_lookup_is_flat() {
        let base = Rc::new(Frame::new());
        base.bind(EVAL, Value::Handler(Handler::new(EVAL, identity_eval)));
        let derived = Rc::new(base.right());

        let frame = Rc::new(Frame::new());
        frame.bind_type(ValueType::Integer, derived);

        assert!(matches!(evaluate(&frame, &Value::from(1)), Err(EvalError::HandlerNotFound { .. })));
    }

    #[test]
    pub fn test_non_handler_binding() {
        let proto = Rc::new(Frame::new());
        proto.bind(EVAL, Value::from(1));

        let frame = Rc::new(Frame::new());
        frame.bind_type(ValueType::Integer, proto);

        assert!(matches!(evaluate(&frame, &Value::from(1)), Err(EvalError::HandlerNotFound { .. })));
    }

    #[test]
    pub fn test_overridden_eval() {
        let frame = Rc::new(Frame::new());
        frame.bind_type(ValueType::Integer, prototype(vec![
            Handler::new(EVAL, |subject, _, _| match subject {
                Value::Integer(value) => Ok(Value::from(value * 2)),
                _ => Ok(Value::Nil),
            }),
        ]));

        assert_eq!(Ok(Value::from(42)), evaluate(&frame, &Value::from(21)));
    }

    #[test]
    pub fn test_message_eval_must_reply_with_a_message() {
        let frame = root_frame();
        frame.bind_type(ValueType::Message, prototype(vec![
            Handler::new(EVAL, |_, _, _| Ok(Value::from(0))),
        ]));

        assert_eq!(Err(EvalError::TypeMismatch {
            expected: ValueType::Message,
            left: ValueType::Integer,
            right: ValueType::Integer,
        }), evaluate(&frame, &send_value(Value::from(1), "+", Value::from(2))));
    }
}

mod replies {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_literals_are_identity() {
        let frame = root_frame();

        for value in [Value::Nil, Value::from(1), Value::from(1.5), Value::from("s")] {
            assert_eq!(Ok(value.clone()), evaluate(&frame, &value));
        }
    }

    #[test]
    pub fn test_names() {
        let frame = root_frame();
        frame.bind("x", Value::from(3));

        assert_eq!(Ok(Value::from(3)), evaluate(&frame, &Value::name("x")));
        assert_eq!(Err(EvalError::NameNotFound(String::from("y"))), evaluate(&frame, &Value::name("y")));
    }

    #[test]
    pub fn test_later_forces_one_layer() {
        let inner = send_value(Value::from(1), "+", Value::from(2));

        assert_eq!(Ok(inner.clone()), evaluate(&root_frame(), &Value::later(inner)));
    }

    #[test]
    pub fn test_block_keeps_last() {
        let frame = root_frame();
        let block = Value::block(vec![
            send_value(Value::from(1), "+", Value::from(1)),
            send_value(Value::from(2), "*", Value::from(5)),
        ]);

        assert_eq!(Ok(Value::from(10)), evaluate(&frame, &block));
        assert_eq!(Ok(Value::Nil), evaluate(&frame, &Value::block(vec![])));
    }

    #[test]
    pub fn test_block_stops_at_first_error() {
        let block = Value::block(vec![Value::name("missing"), send_value(Value::from(1), "nope", Value::Nil)]);

        assert_eq!(Err(EvalError::NameNotFound(String::from("missing"))), evaluate(&root_frame(), &block));
    }

    #[test]
    pub fn test_containers() {
        let frame = root_frame();
        let three = send_value(Value::from(1), "+", Value::from(2));

        assert_eq!(Ok(Value::array(vec![Value::from(3), Value::from(1)])),
            evaluate(&frame, &Value::array(vec![three.clone(), Value::from(1)])));
        assert_eq!(Ok(Value::pair(Value::from(3), Value::from(3))),
            evaluate(&frame, &Value::pair(three.clone(), three.clone())));

        let mut entries = BTreeMap::new();
        entries.insert(String::from("k"), three.clone());
        let mut expected = BTreeMap::new();
        expected.insert(String::from("k"), Value::from(3));
        assert_eq!(Ok(Value::map(expected)), evaluate(&frame, &Value::map(entries)));
    }

    #[test]
    pub fn test_message_keeps_verb() {
        let message = Value::message("-", send_value(Value::from(1), "+", Value::from(2)));

        assert_eq!(Ok(Value::message("-", Value::from(3))), evaluate(&root_frame(), &message));
    }
}

mod sends {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ternary(condition: Value, then: Value) -> Value {
        send_value(condition, "?", Value::pair(Value::later(then), Value::from(0)))
    }

    #[test]
    pub fn test_it_and_that_inside_a_send() {
        let frame = root_frame();

        assert_eq!(Ok(Value::from(7)), evaluate(&frame, &ternary(Value::from(7), Value::name("it"))));
        assert_eq!(Ok(Value::from(49)), evaluate(&frame, &ternary(Value::from(7),
            send_value(Value::name("it"), "*", Value::name("it")))));
    }

    #[test]
    pub fn test_that_is_the_evaluated_operand() {
        let frame = root_frame();
        let expr = send_value(Value::Nil, "or", Value::later(Value::name("that")));

        assert_eq!(Ok(Value::name("that")), evaluate(&frame, &expr));
    }

    #[test]
    pub fn test_nested_sends_rebind_it() {
        let inner = ternary(Value::from(10), Value::name("it"));

        assert_eq!(Ok(Value::from(10)), evaluate(&root_frame(), &ternary(Value::from(1), inner)));
    }

    #[test]
    pub fn test_it_is_unbound_outside_sends() {
        let frame = root_frame();

        assert_eq!(Err(EvalError::NameNotFound(String::from("it"))), evaluate(&frame, &Value::name("it")));
        assert_eq!(Err(EvalError::NameNotFound(String::from("that"))),
            evaluate(&frame, &send_value(Value::from(1), "+", Value::name("that"))));
    }

    #[test]
    pub fn test_transient_frame_is_discarded() {
        let frame = root_frame();
        let block = Value::block(vec![ternary(Value::from(1), Value::name("it")), Value::name("it")]);

        assert_eq!(Err(EvalError::NameNotFound(String::from("it"))), evaluate(&frame, &block));
    }
}
