//! Lowers the `rustpython-parser` AST into the interpreter's statement tree.
//!
//! A script is a sequence of simple statements: `name = expr` or a bare
//! expression. Expressions cover literals, names, tuple/list/dict displays,
//! calls and the `+ - *` operators. Valid Python outside this subset is
//! rejected with `NotImplementedError` rather than a misleading `SyntaxError`.

use std::borrow::Cow;

use num_bigint::BigInt;
use rustpython_parser::{
    Mode, ParseErrorType, Tok,
    ast::{self, Constant, Expr as AstExpr, Operator as AstOperator, Ranged, Stmt, UnaryOp},
    lexer::lex,
    text_size::{TextRange, TextSize},
};

use crate::{
    exception_private::ExcType,
    exception_public::{Exception, StackFrame},
    expressions::{Expr, ExprLoc, Identifier, Literal, Node, Operator, UnaryOperator},
};

/// Maximum nesting depth for AST structures during parsing.
/// Matches CPython's limit of ~200 for nested parentheses.
/// This prevents stack overflow from deeply nested structures like `((((x,),),),)`.
#[cfg(not(debug_assertions))]
pub const MAX_NESTING_DEPTH: u16 = 200;
/// In debug builds, we use a lower limit because stack frames are much larger
/// (no inlining, debug info, etc.). The limit is set conservatively to prevent
/// stack overflow while still catching the error before the recursion limit.
#[cfg(debug_assertions)]
pub const MAX_NESTING_DEPTH: u16 = 35;

/// 1-based line and column of a token in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct CodeRange {
    pub line: u32,
    pub column: u32,
}

impl CodeRange {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Errors produced while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseError {
    /// Error in syntax
    Syntax {
        msg: Cow<'static, str>,
        position: CodeRange,
    },
    /// An indented line outside a block, or a dedent to an unknown level.
    Indentation {
        msg: Cow<'static, str>,
        position: CodeRange,
    },
    /// An expression nested too deeply to compile, e.g. `1+1+...` with
    /// hundreds of thousands of terms.
    Recursion { position: CodeRange },
    /// Valid Python outside the supported subset.
    /// Message gets prefixed with "The minipy parser does not yet support ".
    NotImplemented {
        msg: Cow<'static, str>,
        position: CodeRange,
    },
}

impl ParseError {
    pub(crate) fn syntax(msg: impl Into<Cow<'static, str>>, position: CodeRange) -> Self {
        Self::Syntax {
            msg: msg.into(),
            position,
        }
    }

    fn indentation(msg: impl Into<Cow<'static, str>>, position: CodeRange) -> Self {
        Self::Indentation {
            msg: msg.into(),
            position,
        }
    }

    pub(crate) fn not_implemented(msg: impl Into<Cow<'static, str>>, position: CodeRange) -> Self {
        Self::NotImplemented {
            msg: msg.into(),
            position,
        }
    }

    /// Converts this parser error into a Python exception with source location.
    pub fn into_python_exc(self, filename: &str, source: &str) -> Exception {
        let (exc_type, message, position) = match self {
            Self::Syntax { msg, position } => (ExcType::SyntaxError, msg.into_owned(), position),
            Self::Indentation { msg, position } => (ExcType::IndentationError, msg.into_owned(), position),
            Self::Recursion { position } => (
                ExcType::RecursionError,
                "maximum recursion depth exceeded during compilation".to_owned(),
                position,
            ),
            Self::NotImplemented { msg, position } => (
                ExcType::NotImplementedError,
                format!("The minipy parser does not yet support {msg}"),
                position,
            ),
        };
        let frame = StackFrame::from_position(position, filename, source);
        Exception::new(exc_type, Some(message)).with_traceback(Some(frame))
    }
}

/// Parses a script into statements.
pub(crate) fn parse(code: &str) -> Result<Vec<Node>, ParseError> {
    let mut parser = Parser::new(code);
    parser.check_nesting()?;
    let module = match rustpython_parser::parse(code, Mode::Module, "<string>") {
        Ok(ast::Mod::Module(module)) => module,
        Ok(_) => return Err(ParseError::syntax("invalid syntax", CodeRange::default())),
        Err(err) => return Err(parser.convert_error(&err.error, err.offset)),
    };
    parser.parse_statements(module.body)
}

/// Converts the rustpython AST into [`Node`]s, rejecting what the interpreter
/// does not run.
struct Parser<'a> {
    code: &'a str,
    /// Byte offset at which each line starts, to turn offsets into line and column.
    line_starts: Vec<usize>,
    /// Remaining nesting depth budget for recursive structures.
    /// Starts at MAX_NESTING_DEPTH and decrements on each nested level.
    /// When it reaches zero, we return a "too many nested parentheses" error.
    depth_remaining: u16,
}

impl<'a> Parser<'a> {
    fn new(code: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(code.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            code,
            line_starts,
            depth_remaining: MAX_NESTING_DEPTH,
        }
    }

    fn position(&self, offset: TextSize) -> CodeRange {
        let offset = usize::from(offset).min(self.code.len());
        let line = self.line_starts.partition_point(|&start| start <= offset).max(1);
        let start = self.line_starts.get(line - 1).copied().unwrap_or(0);
        let column = self.code.get(start..offset).map_or(0, |prefix| prefix.chars().count()) + 1;
        CodeRange::new(
            u32::try_from(line).unwrap_or(u32::MAX),
            u32::try_from(column).unwrap_or(u32::MAX),
        )
    }

    /// Text of the line containing `offset`.
    fn line_at(&self, offset: TextSize) -> (usize, &'a str) {
        let offset = usize::from(offset).min(self.code.len());
        let index = self.line_starts.partition_point(|&start| start <= offset).max(1) - 1;
        let start = self.line_starts.get(index).copied().unwrap_or(0);
        let rest = self.code.get(start..).unwrap_or_default();
        (start, rest.lines().next().unwrap_or_default())
    }

    /// Scans the token stream for nesting the tree would not survive.
    ///
    /// Runs before the AST is built: the tree is dropped and lowered
    /// recursively, so `((((...))))` or a `1+1+...` chain hundreds of thousands
    /// of terms long must never reach it. Open brackets count one level each,
    /// and operators count one level within the current element of the
    /// innermost bracket. Bracket mismatches are reported here too, with
    /// CPython's tokenizer messages.
    fn check_nesting(&self) -> Result<(), ParseError> {
        let limit = usize::from(MAX_NESTING_DEPTH);
        let mut brackets: Vec<(char, TextRange)> = Vec::new();
        // operators seen in the current element, one counter per open bracket plus the statement
        let mut chains: Vec<usize> = vec![0];
        let mut chain_total = 0;

        for result in lex(self.code, Mode::Module) {
            let (tok, range) = match result {
                Ok(spanned) => spanned,
                Err(err) => return self.check_lex_failure(&brackets, err.location),
            };
            match tok {
                Tok::Lpar | Tok::Lsqb | Tok::Lbrace => {
                    let open = match tok {
                        Tok::Lpar => '(',
                        Tok::Lsqb => '[',
                        _ => '{',
                    };
                    brackets.push((open, range));
                    chains.push(0);
                    if brackets.len() + chain_total > limit {
                        return Err(ParseError::syntax(
                            "too many nested parentheses",
                            self.position(range.start()),
                        ));
                    }
                }
                Tok::Rpar | Tok::Rsqb | Tok::Rbrace => {
                    let close = match tok {
                        Tok::Rpar => ')',
                        Tok::Rsqb => ']',
                        _ => '}',
                    };
                    self.close_bracket(&mut brackets, close, range)?;
                    chain_total -= chains.pop().unwrap_or(0);
                }
                Tok::Comma | Tok::Colon | Tok::Equal | Tok::Semi => {
                    if let Some(count) = chains.last_mut() {
                        chain_total -= *count;
                        *count = 0;
                    }
                }
                Tok::Newline => {
                    chains.clear();
                    chains.push(0);
                    chain_total = 0;
                }
                Tok::Plus
                | Tok::Minus
                | Tok::Star
                | Tok::Slash
                | Tok::DoubleSlash
                | Tok::Percent
                | Tok::DoubleStar
                | Tok::At
                | Tok::Vbar
                | Tok::Amper
                | Tok::CircumFlex
                | Tok::LeftShift
                | Tok::RightShift
                | Tok::Tilde
                | Tok::Dot
                | Tok::Not => {
                    if let Some(count) = chains.last_mut() {
                        *count += 1;
                        chain_total += 1;
                    }
                    if brackets.len() + chain_total > limit {
                        return Err(ParseError::Recursion {
                            position: self.position(range.start()),
                        });
                    }
                }
                _ => {}
            }
        }

        match brackets.last() {
            Some((open, range)) => Err(ParseError::syntax(
                format!("'{open}' was never closed"),
                self.position(range.start()),
            )),
            None => Ok(()),
        }
    }

    fn close_bracket(&self, brackets: &mut Vec<(char, TextRange)>, close: char, range: TextRange) -> Result<(), ParseError> {
        let position = self.position(range.start());
        match brackets.pop() {
            None => Err(ParseError::syntax(format!("unmatched '{close}'"), position)),
            Some((open, _)) if matching_close(open) != close => Err(ParseError::syntax(
                format!("closing parenthesis '{close}' does not match opening parenthesis '{open}'"),
                position,
            )),
            Some(_) => Ok(()),
        }
    }

    /// Reports bracket problems the lexer stopped on; anything else is left
    /// for the parser, which gives the better message.
    fn check_lex_failure(&self, brackets: &[(char, TextRange)], location: TextSize) -> Result<(), ParseError> {
        let offset = usize::from(location);
        if offset >= self.code.trim_end().len()
            && let Some((open, range)) = brackets.last()
        {
            return Err(ParseError::syntax(
                format!("'{open}' was never closed"),
                self.position(range.start()),
            ));
        }
        if brackets.is_empty()
            && let Some(close) = self.code.get(offset..).and_then(|rest| rest.chars().next())
            && matches!(close, ')' | ']' | '}')
        {
            return Err(ParseError::syntax(format!("unmatched '{close}'"), self.position(location)));
        }
        Ok(())
    }

    fn convert_error(&self, error: &ParseErrorType, offset: TextSize) -> ParseError {
        let (line_start, line) = self.line_at(offset);
        let statement = line.trim_start();
        if let Some(rest) = statement.strip_prefix("print")
            && rest.starts_with([' ', '\t'])
            && !rest.trim_start().is_empty()
            && !rest.trim_start().starts_with(['(', '=', '.', '['])
        {
            let indent = line.len() - statement.len();
            let position = self.position(TextSize::try_from(line_start + indent).unwrap_or(offset));
            return ParseError::syntax("Missing parentheses in call to 'print'. Did you mean print(...)?", position);
        }

        let position = self.position(offset);
        if error.is_indentation_error() {
            let msg = match error {
                ParseErrorType::Lexical(_) => "unindent does not match any outer indentation level",
                ParseErrorType::UnrecognizedToken(Tok::Indent, _) => "unexpected indent",
                _ => "expected an indented block",
            };
            return ParseError::indentation(msg, position);
        }
        ParseError::syntax(error.to_string(), position)
    }

    fn parse_statements(&mut self, statements: Vec<Stmt>) -> Result<Vec<Node>, ParseError> {
        statements
            .into_iter()
            .map(|statement| self.parse_statement(statement))
            .collect()
    }

    fn parse_statement(&mut self, statement: Stmt) -> Result<Node, ParseError> {
        match statement {
            Stmt::Expr(ast::StmtExpr { value, .. }) => Ok(Node::Expr(self.parse_expression(*value)?)),
            Stmt::Assign(ast::StmtAssign { targets, value, .. }) => self.parse_assignment(targets, *value),
            Stmt::AugAssign(assign) => Err(ParseError::not_implemented(
                "augmented assignment",
                self.position(assign.range.start()),
            )),
            Stmt::AnnAssign(assign) => Err(ParseError::not_implemented(
                "annotated assignment",
                self.position(assign.range.start()),
            )),
            other => {
                let range = other.range();
                Err(ParseError::not_implemented(
                    self.statement_kind(range),
                    self.position(range.start()),
                ))
            }
        }
    }

    /// Names a compound or keyword statement by its leading keyword.
    fn statement_kind(&self, range: TextRange) -> Cow<'static, str> {
        let text = self.code.get(usize::from(range.start())..).unwrap_or_default();
        let keyword: String = text.chars().take_while(char::is_ascii_alphabetic).collect();
        if keyword.is_empty() {
            Cow::Borrowed("this statement")
        } else {
            Cow::Owned(format!("'{keyword}' statements"))
        }
    }

    fn parse_assignment(&mut self, targets: Vec<AstExpr>, value: AstExpr) -> Result<Node, ParseError> {
        let mut targets = targets.into_iter();
        let (Some(target), None) = (targets.next(), targets.next()) else {
            return Err(ParseError::not_implemented(
                "chained assignment",
                self.position(value.range().start()),
            ));
        };
        let position = self.position(target.range().start());
        let target = match target {
            AstExpr::Name(ast::ExprName { id, .. }) => Identifier::new(id.as_str().to_owned(), position),
            AstExpr::Constant(ast::ExprConstant { value, .. }) => {
                let msg = match value {
                    Constant::None => "cannot assign to None",
                    Constant::Bool(true) => "cannot assign to True",
                    Constant::Bool(false) => "cannot assign to False",
                    _ => "cannot assign to literal",
                };
                return Err(ParseError::syntax(msg, position));
            }
            AstExpr::Call(_) => {
                return Err(ParseError::syntax(
                    "cannot assign to function call here. Maybe you meant '==' instead of '='?",
                    position,
                ));
            }
            AstExpr::Tuple(_) | AstExpr::List(_) | AstExpr::Starred(_) => {
                return Err(ParseError::not_implemented("unpacking assignment", position));
            }
            other => return Err(self.unsupported_expression(&other)),
        };
        let object = self.parse_expression(value)?;
        Ok(Node::Assign { target, object })
    }

    /// Parses an expression, with depth tracking to prevent stack overflow
    /// from deeply nested structures.
    fn parse_expression(&mut self, expression: AstExpr) -> Result<ExprLoc, ParseError> {
        self.decr_depth_remaining(expression.range())?;
        let result = self.parse_expression_impl(expression);
        self.depth_remaining += 1;
        result
    }

    fn parse_expression_impl(&mut self, expression: AstExpr) -> Result<ExprLoc, ParseError> {
        let position = self.position(expression.range().start());
        let expr = match expression {
            AstExpr::Constant(ast::ExprConstant { value, .. }) => Expr::Literal(parse_constant(value, position)?),
            AstExpr::Name(ast::ExprName { id, .. }) => Expr::Name(Identifier::new(id.as_str().to_owned(), position)),
            AstExpr::Call(ast::ExprCall {
                func, args, keywords, ..
            }) => {
                if let Some(keyword) = keywords.first() {
                    let feature = if keyword.arg.is_some() {
                        "keyword arguments"
                    } else {
                        "star arguments"
                    };
                    return Err(ParseError::not_implemented(
                        feature,
                        self.position(keyword.value.range().start()),
                    ));
                }
                if let Some(starred) = args.iter().find(|arg| matches!(arg, AstExpr::Starred(_))) {
                    return Err(ParseError::not_implemented(
                        "star arguments",
                        self.position(starred.range().start()),
                    ));
                }
                let callable = Box::new(self.parse_expression(*func)?);
                Expr::Call {
                    callable,
                    args: self.parse_expressions(args)?,
                }
            }
            AstExpr::BinOp(ast::ExprBinOp { left, op, right, .. }) => {
                let op = match op {
                    AstOperator::Add => Operator::Add,
                    AstOperator::Sub => Operator::Sub,
                    AstOperator::Mult => Operator::Mult,
                    other => {
                        return Err(ParseError::not_implemented(
                            format!("the '{}' operator", operator_symbol(other)),
                            position,
                        ));
                    }
                };
                Expr::Op {
                    left: Box::new(self.parse_expression(*left)?),
                    op,
                    right: Box::new(self.parse_expression(*right)?),
                }
            }
            AstExpr::UnaryOp(ast::ExprUnaryOp { op, operand, .. }) => {
                let op = match op {
                    UnaryOp::USub => UnaryOperator::Neg,
                    UnaryOp::UAdd => UnaryOperator::Pos,
                    UnaryOp::Not => return Err(ParseError::not_implemented("the 'not' operator", position)),
                    UnaryOp::Invert => return Err(ParseError::not_implemented("the '~' operator", position)),
                };
                Expr::Unary {
                    op,
                    operand: Box::new(self.parse_expression(*operand)?),
                }
            }
            AstExpr::Tuple(ast::ExprTuple { elts, .. }) => Expr::Tuple(self.parse_expressions(elts)?),
            AstExpr::List(ast::ExprList { elts, .. }) => Expr::List(self.parse_expressions(elts)?),
            AstExpr::Dict(ast::ExprDict { keys, values, .. }) => {
                let mut pairs = Vec::with_capacity(values.len());
                for (key, value) in keys.into_iter().zip(values) {
                    let Some(key) = key else {
                        return Err(ParseError::not_implemented(
                            "dict unpacking",
                            self.position(value.range().start()),
                        ));
                    };
                    pairs.push((self.parse_expression(key)?, self.parse_expression(value)?));
                }
                Expr::Dict(pairs)
            }
            other => return Err(self.unsupported_expression(&other)),
        };
        Ok(ExprLoc::new(position, expr))
    }

    fn parse_expressions(&mut self, expressions: Vec<AstExpr>) -> Result<Vec<ExprLoc>, ParseError> {
        expressions
            .into_iter()
            .map(|expression| self.parse_expression(expression))
            .collect()
    }

    fn unsupported_expression(&self, expression: &AstExpr) -> ParseError {
        let feature = match expression {
            AstExpr::Attribute(_) => "attribute access",
            AstExpr::Subscript(_) | AstExpr::Slice(_) => "subscripts",
            AstExpr::Set(_) => "set displays",
            AstExpr::Starred(_) => "starred expressions",
            AstExpr::BoolOp(_) => "boolean operators",
            AstExpr::Compare(_) => "comparisons",
            AstExpr::Lambda(_) => "lambda expressions",
            AstExpr::IfExp(_) => "conditional expressions",
            AstExpr::NamedExpr(_) => "assignment expressions",
            AstExpr::ListComp(_) | AstExpr::SetComp(_) | AstExpr::DictComp(_) | AstExpr::GeneratorExp(_) => {
                "comprehensions"
            }
            AstExpr::JoinedStr(_) | AstExpr::FormattedValue(_) => "f-strings",
            _ => "this expression",
        };
        ParseError::not_implemented(feature, self.position(expression.range().start()))
    }

    fn decr_depth_remaining(&mut self, range: TextRange) -> Result<(), ParseError> {
        if let Some(depth_remaining) = self.depth_remaining.checked_sub(1) {
            self.depth_remaining = depth_remaining;
            Ok(())
        } else {
            Err(ParseError::syntax(
                "too many nested parentheses",
                self.position(range.start()),
            ))
        }
    }
}

fn parse_constant(value: Constant, position: CodeRange) -> Result<Literal, ParseError> {
    match value {
        Constant::None => Ok(Literal::None),
        Constant::Bool(b) => Ok(Literal::Bool(b)),
        Constant::Str(s) => Ok(Literal::Str(s)),
        // via decimal text so the parser's bigint type never leaks out
        Constant::Int(i) => parse_int_literal(&i.to_string(), position),
        Constant::Float(f) => Ok(Literal::Float(f)),
        Constant::Complex { imag, .. } => Ok(Literal::Imag(imag)),
        Constant::Bytes(_) => Err(ParseError::not_implemented("bytes literals", position)),
        _ => Err(ParseError::not_implemented("this literal", position)),
    }
}

fn parse_int_literal(digits: &str, position: CodeRange) -> Result<Literal, ParseError> {
    if let Ok(i) = digits.parse::<i64>() {
        return Ok(Literal::Int(i));
    }
    digits
        .parse::<BigInt>()
        .map(Literal::LongInt)
        .map_err(|_| ParseError::syntax("invalid integer literal", position))
}

fn matching_close(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        _ => '}',
    }
}

fn operator_symbol(op: AstOperator) -> &'static str {
    match op {
        AstOperator::Add => "+",
        AstOperator::Sub => "-",
        AstOperator::Mult => "*",
        AstOperator::MatMult => "@",
        AstOperator::Div => "/",
        AstOperator::Mod => "%",
        AstOperator::Pow => "**",
        AstOperator::LShift => "<<",
        AstOperator::RShift => ">>",
        AstOperator::BitOr => "|",
        AstOperator::BitXor => "^",
        AstOperator::BitAnd => "&",
        AstOperator::FloorDiv => "//",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_err(code: &str) -> Exception {
        parse(code).unwrap_err().into_python_exc("test.py", code)
    }

    fn single_literal(code: &str) -> Literal {
        let nodes = parse(code).unwrap();
        match &nodes[..] {
            [Node::Expr(ExprLoc {
                expr: Expr::Literal(literal),
                ..
            })] => literal.clone(),
            other => panic!("expected one literal, got {other:?}"),
        }
    }

    #[test]
    fn literals() {
        assert_eq!(single_literal("10"), Literal::Int(10));
        assert_eq!(single_literal("0x1f"), Literal::Int(31));
        assert_eq!(single_literal("1_000"), Literal::Int(1000));
        assert_eq!(single_literal("10.25"), Literal::Float(10.25));
        assert_eq!(single_literal("2j"), Literal::Imag(2.0));
        assert_eq!(single_literal("None"), Literal::None);
        assert_eq!(single_literal("True"), Literal::Bool(true));
        assert!(matches!(single_literal("99999999999999999999"), Literal::LongInt(_)));
    }

    #[test]
    fn strings_concatenate_and_unescape() {
        assert_eq!(single_literal(r"'a\tb' 'c'"), Literal::Str("a\tbc".to_owned()));
        assert_eq!(single_literal(r"u'gulfem'"), Literal::Str("gulfem".to_owned()));
        assert_eq!(single_literal(r"r'\n'"), Literal::Str("\\n".to_owned()));
        assert_eq!(single_literal("'''x\ny'''"), Literal::Str("x\ny".to_owned()));
    }

    #[test]
    fn parses_assignment_and_calls() {
        let nodes = parse("str = \"gulfem\"\nprint(len(str))\n").unwrap();
        assert_eq!(nodes.len(), 2);
        let Node::Assign { target, object } = &nodes[0] else {
            panic!("expected assignment");
        };
        assert_eq!(target.name, "str");
        assert!(matches!(object.expr, Expr::Literal(Literal::Str(ref s)) if s == "gulfem"));
        let Node::Expr(call) = &nodes[1] else {
            panic!("expected expression");
        };
        assert_eq!(call.position, CodeRange::new(2, 1));
        assert!(matches!(call.expr, Expr::Call { ref args, .. } if args.len() == 1));
    }

    #[test]
    fn positions_count_characters() {
        let nodes = parse("s = 'é'\nx = 1\n    \ny = é").unwrap();
        let Node::Assign { object, .. } = &nodes[2] else {
            panic!("expected assignment");
        };
        assert_eq!(object.position, CodeRange::new(4, 5));
    }

    #[test]
    fn parenthesised_expression_is_not_a_tuple() {
        let nodes = parse("(1)\n(1,)\n()").unwrap();
        assert!(matches!(&nodes[0], Node::Expr(e) if matches!(e.expr, Expr::Literal(Literal::Int(1)))));
        assert!(matches!(&nodes[1], Node::Expr(e) if matches!(e.expr, Expr::Tuple(ref items) if items.len() == 1)));
        assert!(matches!(&nodes[2], Node::Expr(e) if matches!(e.expr, Expr::Tuple(ref items) if items.is_empty())));
    }

    #[test]
    fn legacy_print_statement_is_a_syntax_error() {
        let exc = parse_err("it = iter('ab')\nprint it.next()");
        assert_eq!(exc.exc_type(), ExcType::SyntaxError);
        assert_eq!(
            exc.message(),
            Some("Missing parentheses in call to 'print'. Did you mean print(...)?")
        );
        assert_eq!(exc.traceback().map(|frame| frame.start.line), Some(2));
    }

    #[test]
    fn unexpected_indent() {
        let exc = parse_err("x = 1\n    y = 2");
        assert_eq!(exc.summary(), "IndentationError: unexpected indent");
    }

    #[test]
    fn bracket_errors() {
        assert_eq!(parse_err("print(1").summary(), "SyntaxError: '(' was never closed");
        assert_eq!(parse_err("x)").summary(), "SyntaxError: unmatched ')'");
        assert_eq!(
            parse_err("[1)").summary(),
            "SyntaxError: closing parenthesis ')' does not match opening parenthesis '['"
        );
    }

    #[test]
    fn unsupported_syntax_is_not_implemented() {
        for (code, feature) in [
            ("x.y", "attribute access"),
            ("{1, 2}", "set displays"),
            ("f(a=1)", "keyword arguments"),
            ("f(*a)", "star arguments"),
            ("if x: pass", "'if' statements"),
            ("x += 1", "augmented assignment"),
            ("a[0]", "subscripts"),
            ("a = b = 1", "chained assignment"),
            ("1 / 2", "the '/' operator"),
            ("not x", "the 'not' operator"),
            ("b'x'", "bytes literals"),
            ("{**d}", "dict unpacking"),
        ] {
            let exc = parse_err(code);
            assert_eq!(exc.exc_type(), ExcType::NotImplementedError, "{code}");
            assert_eq!(
                exc.message(),
                Some(format!("The minipy parser does not yet support {feature}").as_str()),
                "{code}"
            );
        }
    }

    #[test]
    fn invalid_targets() {
        assert_eq!(parse_err("1 = x").summary(), "SyntaxError: cannot assign to literal");
        assert_eq!(parse_err("None = 1").summary(), "SyntaxError: cannot assign to None");
    }

    #[test]
    fn invalid_source_is_a_syntax_error() {
        for code in ["x = ", "f(1 2)", "'abc", "x = $"] {
            assert_eq!(parse_err(code).exc_type(), ExcType::SyntaxError, "{code}");
        }
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let code = format!("{}1{}", "(".repeat(300), ")".repeat(300));
        assert_eq!(parse_err(&code).summary(), "SyntaxError: too many nested parentheses");
        let code = format!("x = {}1{}", "[".repeat(300), "]".repeat(300));
        assert_eq!(parse_err(&code).summary(), "SyntaxError: too many nested parentheses");
    }

    #[test]
    fn long_operator_chain_is_rejected() {
        let code = format!("x = 1{}\nprint(x)", "+1".repeat(200_000));
        let exc = parse_err(&code);
        assert_eq!(
            exc.summary(),
            "RecursionError: maximum recursion depth exceeded during compilation"
        );
        assert_eq!(exc.traceback().map(|frame| frame.start.line), Some(1));
    }

    #[test]
    fn operator_counts_reset_between_elements() {
        let short_chain = format!("x = 1{}", "+1".repeat(20));
        assert!(parse(&short_chain).is_ok());
        let many_sums = format!("x = [{}]", vec!["1 + 1 * 2"; 500].join(", "));
        assert!(parse(&many_sums).is_ok());
        let many_lines = "x = 1 + 1\n".repeat(500);
        assert!(parse(&many_lines).is_ok());
    }
}
