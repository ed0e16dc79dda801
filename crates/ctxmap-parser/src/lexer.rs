//! Lexical analyzer for ctxmap source text.
//!
//! The lexer converts source text into a stream of [`Token`]s for parsing.
//! Words are matched whole and only then classified against the keyword
//! table, so `ServiceNowPlatform` is one identifier rather than the keyword
//! `Service` followed by `NowPlatform`.
//!
//! The public entry point is [`tokenize`], which performs error-recovering
//! lexical analysis and collects all diagnostics in a single pass.

use log::trace;
use winnow::{
    Parser as _,
    combinator::{alt, cut_err, opt, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, none_of, one_of, take_till, take_until, take_while},
};

use ctxmap_core::keywords::Keyword;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic information attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    code: ErrorCode,
    message: &'static str,
    help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<LexerDiagnostic>>;

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse an escape sequence inside a string literal, starting at the backslash.
fn string_escape(input: &mut Input<'_>) -> IResult<char> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    let escaped = one_of(['\\', '"', '\'', 'n', 'r', 't'])
        .map(|c| match c {
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            other => other,
        })
        .parse_next(input);

    escaped.map_err(|_: ErrMode<ContextError<LexerDiagnostic>>| {
        ErrMode::Cut(ContextError::new().add_context(
            input,
            &input.checkpoint(),
            LexerDiagnostic {
                code: ErrorCode::E003,
                message: "invalid escape sequence",
                help: Some("valid escapes: `\\\\`, `\\\"`, `\\'`, `\\n`, `\\r`, `\\t`"),
                start: escape_start,
            },
        ))
    })
}

/// Parse a double-quoted string literal.
///
/// Strings may not span lines; a raw newline before the closing quote
/// reports an unterminated string.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let string_char = none_of(['"', '\\', '\n', '\r']);
    let string_content = repeat(0.., alt((string_escape, string_char))).fold(
        String::new,
        |mut acc: String, ch| {
            acc.push(ch);
            acc
        },
    );

    let start_pos = input.current_token_start();

    '"'.parse_next(input)?;

    cut_err(terminated(string_content, '"'))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add closing `\"` before the end of the line"),
            start: start_pos,
        })
        .parse_next(input)
        .map(Token::StringLiteral)
}

/// Parse line comment starting with '//'
fn line_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    preceded("//", take_while(0.., |c| c != '\n'))
        .map(Token::LineComment)
        .parse_next(input)
}

/// Parse block comment `/* ... */`; comments do not nest.
fn block_comment<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start_pos = input.current_token_start();

    "/*".parse_next(input)?;

    cut_err(terminated(take_until(0.., "*/"), "*/"))
        .context(LexerDiagnostic {
            code: ErrorCode::E004,
            message: "unterminated block comment",
            help: Some("close the comment with `*/`"),
            start: start_pos,
        })
        .map(Token::BlockComment)
        .parse_next(input)
}

/// Parse a complete word: `[A-Za-z_][A-Za-z0-9_]*`.
fn raw_word<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(1.., is_word_char)
        .verify(|s: &str| {
            s.chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        })
        .parse_next(input)
}

/// Parse a word and classify it as a keyword or an identifier.
///
/// The whole word is consumed before the keyword lookup, which gives
/// longest-match semantics for free.
fn word<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    raw_word
        .map(|text| match Keyword::lookup(text) {
            Some(keyword) => Token::Keyword(keyword),
            None => Token::Identifier(text),
        })
        .parse_next(input)
}

/// Parse an escaped identifier `^word`; the word is never a keyword.
fn escaped_identifier<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    let start_pos = input.current_token_start();

    '^'.parse_next(input)?;

    cut_err(raw_word)
        .context(LexerDiagnostic {
            code: ErrorCode::E005,
            message: "`^` must be followed by an identifier",
            help: Some("write the escaped name directly after the caret: `^type`"),
            start: start_pos,
        })
        .map(Token::Identifier)
        .parse_next(input)
}

/// Parse multi-character operators (order matters - longest first)
fn multi_char_operator<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        literal("<->").value(Token::DoubleArrow),
        literal("->").value(Token::Arrow),
        literal("<-").value(Token::LeftArrow),
    ))
    .parse_next(input)
}

/// Parse single character tokens
fn single_char_token<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    alt((
        '-'.value(Token::Dash),
        '='.value(Token::Equals),
        '<'.value(Token::LessThan),
        '>'.value(Token::GreaterThan),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        ';'.value(Token::Semicolon),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse whitespace (spaces, tabs, etc. but not newlines)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    take_while(1.., |c: char| c.is_whitespace() && c != '\n')
        .value(Token::Whitespace)
        .parse_next(input)
}

/// Parse newline
fn newline<'a>(input: &mut Input<'a>) -> IResult<Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        line_comment,        // Comments first, they start with ordinary characters
        block_comment,
        string_literal,      // Must come before any single char
        multi_char_operator, // Must come before single char operators
        escaped_identifier,  // Must come before word
        word,                // Keywords and identifiers
        single_char_token,   // Single character tokens
        newline,             // Must come before whitespace
        whitespace,          // General whitespace
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();

    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            let checkpoint = input.checkpoint();
            match positioned_token(&mut input) {
                Ok(token) => {
                    self.tokens.push(token);
                }
                Err(e) => {
                    // Backtracked alternatives leave no committed progress;
                    // report at the character that started no token.
                    if matches!(e, ErrMode::Backtrack(_)) {
                        input.reset(&checkpoint);
                    }
                    let error_pos = input.current_token_start();
                    let diagnostic = Self::convert_err_mode(e, error_pos, &input);
                    let code = diagnostic.code();
                    self.diagnostics.emit(diagnostic);

                    Self::recover(&mut input, code);
                }
            }
        }
    }

    /// Skips past the offending text so lexing can resume.
    ///
    /// An invalid escape abandons the rest of its string. Anything else skips
    /// the current word, or a single character when there is none, so that
    /// `123abc` reports once instead of once per character.
    fn recover(input: &mut Input<'a>, code: Option<ErrorCode>) {
        if code == Some(ErrorCode::E003) {
            let _ = (
                take_till::<_, _, ErrMode<ContextError>>(0.., ['"', '\n']),
                opt('"'),
            )
                .parse_next(input);
            return;
        }

        if take_while::<_, _, ErrMode<ContextError>>(1.., is_word_char)
            .parse_next(input)
            .is_err()
            && !input.is_empty()
        {
            let _ = any::<_, ErrMode<ContextError>>.parse_next(input);
        }
    }

    /// Finish lexing and return tokens or collected errors.
    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|()| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Extracts `LexerDiagnostic` from the error context for rich error info
    /// with code, message, and help. Falls back to E002 (unexpected character)
    /// if no diagnostic context is found.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
        rest: &Input<'a>,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos.max(*start + 1));

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let width = rest.chars().next().map(char::len_utf8).unwrap_or(1);
        let span = Span::new(error_pos..error_pos + width);
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Tokenize source text, collecting every lexical error.
///
/// Lexing continues after an error so that all problems in a document are
/// reported in one pass.
///
/// # Returns
///
/// - `Ok(tokens)` - All tokens successfully lexed, trivia included
/// - `Err(ParseError)` - One or more errors occurred; contains all diagnostics
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    let result = lexer.finish();

    if let Ok(tokens) = &result {
        trace!(tokens = tokens.len(); "Tokenized source");
    }
    result
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    /// Identifiers that begin with a keyword and continue with more word
    /// characters.
    fn keyword_prefixed_strategy() -> impl Strategy<Value = String> {
        let keywords: Vec<&'static str> = Keyword::all_words().collect();
        (prop::sample::select(keywords), "[A-Za-z0-9_]{1,12}")
            .prop_map(|(keyword, rest)| format!("{keyword}{rest}"))
            .prop_filter("must not itself be a keyword", |word| {
                Keyword::lookup(word).is_none()
            })
    }

    fn check_keyword_prefix_is_single_identifier(word: &str) -> Result<(), TestCaseError> {
        let source = format!("BoundedContext {word} {{ }}");
        let tokens = tokenize(&source).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let meaningful: Vec<_> = tokens.iter().filter(|t| !t.is_trivia()).collect();

        prop_assert_eq!(meaningful.len(), 4);
        prop_assert_eq!(&meaningful[1].token, &Token::Identifier(word));
        Ok(())
    }

    fn check_keywords_round_trip(word: &str) -> Result<(), TestCaseError> {
        let tokens = tokenize(word).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(tokens.len(), 1);
        prop_assert!(matches!(tokens[0].token, Token::Keyword(k) if k.as_str() == word));
        Ok(())
    }

    proptest! {
        #[test]
        fn keyword_prefixed_words_stay_whole(word in keyword_prefixed_strategy()) {
            check_keyword_prefix_is_single_identifier(&word)?;
        }

        #[test]
        fn every_keyword_lexes_as_keyword(
            word in prop::sample::select(Keyword::all_words().collect::<Vec<_>>())
        ) {
            check_keywords_round_trip(word)?;
        }
    }
}
