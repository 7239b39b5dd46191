use super::*;

fn parse(source: &str) -> ParseResult<Expr> {
    Parser::new(Lexer::new(source)).parse()
}

fn tree(source: &str) -> String {
    format!("{:?}", parse(source).expect("parsing failed"))
}

mod sends {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_left_associative() {
        assert_eq!("((1 + 2) + 3)", tree("1 + 2 + 3"));
        assert_eq!("((1 - 2) * 3)", tree("1 - 2 * 3"));
    }

    #[test]
    pub fn test_parentheses() {
        assert_eq!("(1 + (2 * 3))", tree("1 + (2 * 3)"));
        assert_eq!("()", tree("()"));
    }

    #[test]
    pub fn test_name_verbs() {
        assert_eq!(Expr::Send {
            subject: Box::new(Expr::ConstantInt(1)),
            message: MessageExpr::new(String::from("and"), Expr::ConstantInt(2)),
        }, parse("1 and 2").expect("parsing failed"));
        assert_eq!("((a or b) ? (1:2))", tree("a or b ? 1:2"));
    }

    #[test]
    pub fn test_quoted_message() {
        assert_eq!(Expr::Message(MessageExpr::new(String::from("+"), Expr::ConstantInt(1))), parse("\\ + 1").expect("parsing failed"));
        assert_eq!("(1 eval \\ + 2)", tree("1 eval \\ + 2"));
    }
}

mod values {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_scalars() {
        assert_eq!(Expr::ConstantInt(42), parse("42").expect("parsing failed"));
        assert_eq!(Expr::ConstantFloat(1.5), parse("1.5").expect("parsing failed"));
        assert_eq!(Expr::ConstantString(String::from("a\"b")), parse(r#""a\"b""#).expect("parsing failed"));
        assert_eq!(Expr::Identifier(String::from("foo")), parse("foo").expect("parsing failed"));
    }

    #[test]
    pub fn test_pair_right_associative() {
        assert_eq!(Expr::Pair(
            Box::new(Expr::ConstantInt(1)),
            Box::new(Expr::Pair(Box::new(Expr::ConstantInt(2)), Box::new(Expr::ConstantInt(3)))),
        ), parse("1:2:3").expect("parsing failed"));
    }

    #[test]
    pub fn test_pair_binds_tighter_than_sends() {
        assert_eq!("((1:2) + 3)", tree("1:2 + 3"));
        assert_eq!("(1 + (2:3))", tree("1 + 2:3"));
    }

    #[test]
    pub fn test_later() {
        assert_eq!("@(a)", tree("@a"));
        assert_eq!("@((1 + 2))", tree("@(1 + 2)"));
        assert_eq!("@((1:2))", tree("@1:2"));
    }

    #[test]
    pub fn test_sequences() {
        assert_eq!("{1, (2 + 3)}", tree("{1, 2 + 3}"));
        assert_eq!("[1, [], {}]", tree("[1, [], {}]"));
        assert_eq!(Expr::Block(vec![]), parse("{}").expect("parsing failed"));
    }

    #[test]
    pub fn test_maps() {
        assert_eq!(Expr::Map(vec![
            (String::from("a"), Expr::ConstantInt(1)),
            (String::from("b\""), Expr::Pair(Box::new(Expr::ConstantInt(2)), Box::new(Expr::ConstantInt(3)))),
            (String::from("a"), Expr::Nil),
        ]), parse(r#"#{"a": 1, "b\"": 2:3, "a": ()}"#).expect("parsing failed"));
        assert_eq!(Expr::Map(vec![]), parse("#{}").expect("parsing failed"));
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    pub fn test_trailing_tokens() {
        assert_eq!(Err(Error::Parser(ParserError::UnexpectedToken {
            token_type: TokenType::Number,
            text: String::from("2"),
            pos: TokenPos::new(1, 3),
            message: String::from("Expected end of input after expression"),
        })), parse("1 2"));
    }

    #[test]
    pub fn test_missing_value() {
        assert_eq!(Err(Error::Parser(ParserError::UnexpectedToken {
            token_type: TokenType::ParenRight,
            text: String::from(")"),
            pos: TokenPos::new(1, 1),
            message: String::from("Expected value"),
        })), parse(")"));
        assert_eq!(TokenPos::new(1, 4), match parse("1 +") {
            Err(Error::Parser(err)) => err.get_pos(),
            other => panic!("expected a parser error, got {:?}", other),
        });
    }

    #[test]
    pub fn test_map_keys_are_strings() {
        assert_eq!(Err(Error::Parser(ParserError::UnexpectedToken {
            token_type: TokenType::Name,
            text: String::from("a"),
            pos: TokenPos::new(1, 3),
            message: String::from("Expected string key in map"),
        })), parse("#{a: 1}"));
    }

    #[test]
    pub fn test_unclosed_block() {
        assert!(matches!(parse("{1, 2"), Err(Error::Parser(ParserError::UnexpectedToken { token_type: TokenType::Eof, .. }))));
    }

    #[test]
    pub fn test_integer_overflow() {
        assert!(matches!(parse("99999999999999999999"), Err(Error::Parser(ParserError::InvalidLiteral {
            token_type: TokenType::Number, pos: TokenPos { line: 1, column: 1 }, ..
        }))));
    }

    #[test]
    pub fn test_lexer_errors_propagate() {
        assert_eq!(Err(Error::Lexer(crate::lang::lexer::LexerError::UnexpectedCharacter(TokenPos::new(1, 5), ';'))), parse("1 + ;"));
    }
}
