//! Symbolic expression resolution.
//!
//! Every address, range, width and offset in the model is an expression
//! string. The core only needs two things from an expression engine: resolve
//! a string to a number, and tell whether a string is well formed. Both are
//! captured by [`ExpressionParser`]. [`LiteralExpressionParser`] is a small
//! implementation covering Verilog-style literals, parameter references and
//! integer arithmetic.

use crate::parameter::Parameter;
use std::collections::HashMap;

/// Resolves symbolic expressions to numbers.
///
/// Implementations must be usable from several threads at once when each
/// caller holds its own model snapshot.
pub trait ExpressionParser: Sync {
    /// Resolves `expression` to its value as a decimal string.
    ///
    /// Returns `None` when the expression cannot be resolved.
    fn parse_expression(&self, expression: &str) -> Option<String>;

    /// Returns `true` if `expression` is well formed and resolvable.
    fn is_valid_expression(&self, expression: &str) -> bool {
        self.parse_expression(expression).is_some()
    }

    /// Resolves `expression` to a non-negative integer.
    fn resolve_u64(&self, expression: &str) -> Option<u64> {
        self.parse_expression(expression)?.parse().ok()
    }

    /// Resolves `expression` to a signed integer.
    fn resolve_i64(&self, expression: &str) -> Option<i64> {
        self.parse_expression(expression)?.parse().ok()
    }
}

/// Parser for integer literals, parameter references and `+ - * / % **`.
///
/// Accepted literals: decimal (`42`), C hex (`0x2A`), Verilog based
/// (`'h2A`, `8'b0010_1010`, `'d42`, `'o52`) and double-quoted strings, which
/// resolve to their contents. Identifiers resolve through the registered
/// parameters, by name or by id, recursively.
#[derive(Debug, Clone, Default)]
pub struct LiteralExpressionParser {
    symbols: HashMap<String, String>,
}

const MAX_DEPTH: usize = 32;

impl LiteralExpressionParser {
    /// Creates a parser with no known symbols.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser that knows the given parameters.
    pub fn with_parameters<'a>(parameters: impl IntoIterator<Item = &'a Parameter>) -> Self {
        let mut parser = Self::new();
        parser.add_parameters(parameters);
        parser
    }

    /// Registers `name` as resolving to `value`.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.symbols.insert(name.into(), value.into());
    }

    /// Registers parameters by name and, when set, by id.
    pub fn add_parameters<'a>(&mut self, parameters: impl IntoIterator<Item = &'a Parameter>) {
        for parameter in parameters {
            if let Some(id) = parameter.id.as_ref().filter(|id| !id.is_empty()) {
                self.define(id.clone(), parameter.value.clone());
            }
            self.define(parameter.name.clone(), parameter.value.clone());
        }
    }

    fn evaluate(&self, expression: &str, depth: usize) -> Option<Value> {
        if depth > MAX_DEPTH {
            return None;
        }
        let tokens = tokenize(expression)?;
        if tokens.is_empty() {
            return None;
        }
        let mut eval = Evaluator {
            parser: self,
            tokens: &tokens,
            pos: 0,
            depth,
        };
        let value = eval.expression()?;
        if eval.pos == tokens.len() {
            Some(value)
        } else {
            None
        }
    }
}

impl ExpressionParser for LiteralExpressionParser {
    fn parse_expression(&self, expression: &str) -> Option<String> {
        match self.evaluate(expression, 0)? {
            Value::Int(n) => Some(n.to_string()),
            Value::Str(s) => Some(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i128),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(i128),
    Str(String),
    Ident(String),
    Op(&'static str),
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Option<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' | '\r' => i += 1,
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Op("**"));
                i += 2;
            }
            '+' | '-' | '*' | '/' | '%' => {
                tokens.push(Token::Op(match c {
                    '+' => "+",
                    '-' => "-",
                    '*' => "*",
                    '/' => "/",
                    _ => "%",
                }));
                i += 1;
            }
            '"' => {
                let end = chars[i + 1..].iter().position(|&ch| ch == '"')? + i + 1;
                tokens.push(Token::Str(chars[i + 1..end].iter().collect()));
                i = end + 1;
            }
            '\'' => {
                let (value, next) = based_literal(&chars, i + 1)?;
                tokens.push(Token::Number(value));
                i = next;
            }
            '0'..='9' => {
                let start = i;
                if c == '0' && matches!(chars.get(i + 1), Some('x') | Some('X')) {
                    i += 2;
                    let digits_start = i;
                    while i < chars.len() && (chars[i].is_ascii_hexdigit() || chars[i] == '_') {
                        i += 1;
                    }
                    let digits: String = chars[digits_start..i].iter().filter(|&&ch| ch != '_').collect();
                    tokens.push(Token::Number(i128::from_str_radix(&digits, 16).ok()?));
                    continue;
                }
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '_') {
                    i += 1;
                }
                if chars.get(i) == Some(&'\'') {
                    // Size prefix of a sized literal; the size itself is ignored.
                    let (value, next) = based_literal(&chars, i + 1)?;
                    tokens.push(Token::Number(value));
                    i = next;
                } else {
                    let digits: String = chars[start..i].iter().filter(|&&ch| ch != '_').collect();
                    tokens.push(Token::Number(digits.parse().ok()?));
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

/// Parses the part of a based literal after the apostrophe.
fn based_literal(chars: &[char], mut i: usize) -> Option<(i128, usize)> {
    if matches!(chars.get(i), Some('s') | Some('S')) {
        i += 1;
    }
    let radix = match chars.get(i)?.to_ascii_lowercase() {
        'h' => 16,
        'd' => 10,
        'o' => 8,
        'b' => 2,
        _ => return None,
    };
    i += 1;
    let start = i;
    while i < chars.len() && (chars[i].is_digit(radix) || chars[i] == '_') {
        i += 1;
    }
    let digits: String = chars[start..i].iter().filter(|&&ch| ch != '_').collect();
    if digits.is_empty() {
        return None;
    }
    Some((i128::from_str_radix(&digits, radix).ok()?, i))
}

struct Evaluator<'a> {
    parser: &'a LiteralExpressionParser,
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Evaluator<'_> {
    fn peek_op(&self) -> Option<&'static str> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) => Some(op),
            _ => None,
        }
    }

    fn expression(&mut self) -> Option<Value> {
        let mut lhs = self.term()?;
        while let Some(op @ ("+" | "-")) = self.peek_op() {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Value::Int(arith(op, int(&lhs)?, int(&rhs)?)?);
        }
        Some(lhs)
    }

    fn term(&mut self) -> Option<Value> {
        let mut lhs = self.power()?;
        while let Some(op @ ("*" | "/" | "%")) = self.peek_op() {
            self.pos += 1;
            let rhs = self.power()?;
            lhs = Value::Int(arith(op, int(&lhs)?, int(&rhs)?)?);
        }
        Some(lhs)
    }

    fn power(&mut self) -> Option<Value> {
        let base = self.unary()?;
        if self.peek_op() == Some("**") {
            self.pos += 1;
            let exponent = self.power()?;
            return Some(Value::Int(arith("**", int(&base)?, int(&exponent)?)?));
        }
        Some(base)
    }

    fn unary(&mut self) -> Option<Value> {
        match self.peek_op() {
            Some("-") => {
                self.pos += 1;
                Some(Value::Int(int(&self.unary()?)?.checked_neg()?))
            }
            Some("+") => {
                self.pos += 1;
                Some(Value::Int(int(&self.unary()?)?))
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Option<Value> {
        let token = self.tokens.get(self.pos)?.clone();
        self.pos += 1;
        match token {
            Token::Number(n) => Some(Value::Int(n)),
            Token::Str(s) => Some(Value::Str(s)),
            Token::Ident(name) => {
                let value = self.parser.symbols.get(&name)?;
                self.parser.evaluate(value, self.depth + 1)
            }
            Token::LParen => {
                let value = self.expression()?;
                match self.tokens.get(self.pos) {
                    Some(Token::RParen) => {
                        self.pos += 1;
                        Some(value)
                    }
                    _ => None,
                }
            }
            Token::RParen | Token::Op(_) => None,
        }
    }
}

fn int(value: &Value) -> Option<i128> {
    match value {
        Value::Int(n) => Some(*n),
        Value::Str(_) => None,
    }
}

fn arith(op: &str, a: i128, b: i128) -> Option<i128> {
    match op {
        "+" => a.checked_add(b),
        "-" => a.checked_sub(b),
        "*" => a.checked_mul(b),
        "/" => a.checked_div(b),
        "%" => a.checked_rem(b),
        "**" => a.checked_pow(u32::try_from(b).ok()?),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> Option<String> {
        LiteralExpressionParser::new().parse_expression(expr)
    }

    #[test]
    fn decimal_and_hex_literals() {
        assert_eq!(eval("42").as_deref(), Some("42"));
        assert_eq!(eval("0x2A").as_deref(), Some("42"));
        assert_eq!(eval("'h2A").as_deref(), Some("42"));
        assert_eq!(eval("8'b0010_1010").as_deref(), Some("42"));
        assert_eq!(eval("'d42").as_deref(), Some("42"));
        assert_eq!(eval("'o52").as_deref(), Some("42"));
        assert_eq!(eval("1_000").as_deref(), Some("1000"));
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval("2 + 3 * 4").as_deref(), Some("14"));
        assert_eq!(eval("(2 + 3) * 4").as_deref(), Some("20"));
        assert_eq!(eval("2 ** 3 ** 2").as_deref(), Some("512"));
        assert_eq!(eval("32 - 1").as_deref(), Some("31"));
        assert_eq!(eval("-4 + 10").as_deref(), Some("6"));
        assert_eq!(eval("17 % 5").as_deref(), Some("2"));
    }

    #[test]
    fn invalid_expressions() {
        assert_eq!(eval(""), None);
        assert_eq!(eval("   "), None);
        assert_eq!(eval("1 +"), None);
        assert_eq!(eval("(1"), None);
        assert_eq!(eval("1 / 0"), None);
        assert_eq!(eval("'hzz"), None);
        assert_eq!(eval("unknown"), None);
        assert_eq!(eval("4 $ 2"), None);
        assert!(!LiteralExpressionParser::new().is_valid_expression("1 2"));
    }

    #[test]
    fn string_literal() {
        assert_eq!(eval("\"hello\"").as_deref(), Some("hello"));
        assert_eq!(eval("\"hello\" + 1"), None);
    }

    #[test]
    fn parameters_by_name_and_id() {
        let params = vec![
            Parameter::new("WIDTH", "32").with_id("uuid_width"),
            Parameter::new("DEPTH", "WIDTH * 2"),
        ];
        let parser = LiteralExpressionParser::with_parameters(&params);
        assert_eq!(parser.resolve_u64("DEPTH"), Some(64));
        assert_eq!(parser.resolve_u64("uuid_width - 1"), Some(31));
    }

    #[test]
    fn recursive_parameters_terminate() {
        let mut parser = LiteralExpressionParser::new();
        parser.define("A", "B");
        parser.define("B", "A");
        assert_eq!(parser.parse_expression("A"), None);
    }

    #[test]
    fn resolve_helpers() {
        let parser = LiteralExpressionParser::new();
        assert_eq!(parser.resolve_u64("'h1000"), Some(4096));
        assert_eq!(parser.resolve_u64("-1"), None);
        assert_eq!(parser.resolve_i64("-1"), Some(-1));
        assert!(parser.is_valid_expression("4"));
    }
}
