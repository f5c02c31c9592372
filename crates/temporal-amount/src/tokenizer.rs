//! Lexical scan of compact amount expressions.
//!
//! Grammar: `'-'? (digits letters)+`. Digits are ASCII; letters are any
//! alphabetic characters. A unit symbol runs until the next digit or the
//! end of input, so multi-letter symbols such as `mo` need no separator.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::ParseError;

/// One unresolved `<digits><letters>` token.
///
/// `digits` may be empty; whether that is an error is decided when the
/// token is resolved against a unit registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'i> {
    pub digits: &'i str,
    pub symbol: &'i str,
    /// Character index of the token's first character.
    pub position: usize,
}

/// Lazily yields [`Lexeme`]s in input order.
///
/// Errors are yielded at the point they occur, after which the iterator
/// is exhausted. A misplaced sign is reported by [`Tokenizer::new`].
#[derive(Debug, Clone)]
pub struct Tokenizer<'i> {
    input: &'i str,
    chars: Peekable<CharIndices<'i>>,
    position: usize,
    negative: bool,
    done: bool,
}

impl<'i> Tokenizer<'i> {
    /// Strip the optional leading sign.
    ///
    /// # Errors
    ///
    /// - [`ParseError::EmptyInput`] if nothing follows the sign.
    /// - [`ParseError::MisplacedSign`] if a `-` appears past index 0. This
    ///   is checked up front and takes precedence over every other error.
    pub fn new(input: &'i str) -> Result<Self, ParseError> {
        let (negative, body_start) = match input.strip_prefix('-') {
            Some(_) => (true, 1),
            None => (false, 0),
        };
        if input.len() == body_start {
            return Err(ParseError::EmptyInput);
        }
        if let Some(index) = input.chars().skip(1).position(|c| c == '-') {
            return Err(ParseError::MisplacedSign { position: index + 1 });
        }

        let mut chars = input.char_indices().peekable();
        if negative {
            chars.next();
        }

        Ok(Self {
            input,
            chars,
            position: body_start,
            negative,
            done: false,
        })
    }

    /// Whether the expression carried a leading `-`.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    fn fail(&mut self, error: ParseError) -> Option<Result<Lexeme<'i>, ParseError>> {
        self.done = true;
        Some(Err(error))
    }
}

impl<'i> Iterator for Tokenizer<'i> {
    type Item = Result<Lexeme<'i>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let input = self.input;
        let mut token: Option<(usize, usize)> = None;
        let mut symbol_start: Option<usize> = None;

        while let Some((offset, c)) = self.chars.next() {
            let position = self.position;
            self.position += 1;

            let (token_start, token_position) = *token.get_or_insert((offset, position));
            if c.is_ascii_digit() {
                continue;
            }
            if !c.is_alphabetic() {
                return self.fail(ParseError::InvalidCharacter {
                    character: c,
                    position,
                });
            }

            let unit_from = *symbol_start.get_or_insert(offset);
            let boundary = match self.chars.peek() {
                None => true,
                Some(&(_, next)) => next.is_ascii_digit(),
            };
            if boundary {
                let end = offset + c.len_utf8();
                return Some(Ok(Lexeme {
                    digits: &input[token_start..unit_from],
                    symbol: &input[unit_from..end],
                    position: token_position,
                }));
            }
        }

        self.done = true;
        // Letters always close a token at end of input, so only digits remain.
        let (start, _) = token?;
        Some(Err(ParseError::IncompleteToken(input[start..].to_string())))
    }
}
