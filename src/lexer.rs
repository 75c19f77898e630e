use crate::error::CalcError;

const OPERATORS: [&str; 6] = ["+", "-", "*", "/", "%", "^"];

/// Whether the whole string reads as an integer or a floating-point value.
pub fn is_number(s: &str) -> bool {
    s.parse::<i64>().is_ok() || s.parse::<f64>().is_ok()
}

pub fn is_operator(s: &str) -> bool {
    OPERATORS.contains(&s)
}

/// A bracketed identifier such as `[pi]`. The contents are not checked here.
pub fn is_special(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('[') && s.ends_with(']')
}

pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_operator_char(c: char) -> bool {
    matches!(c, '+' | '-' | '*' | '/' | '%' | '^')
}

pub fn is_special_open(c: char) -> bool {
    c == '['
}

pub fn is_special_close(c: char) -> bool {
    c == ']'
}

pub fn is_dot(c: char) -> bool {
    c == '.'
}

pub fn is_space(c: char) -> bool {
    c == ' '
}

/// Characters that may begin a new token right after a finished one.
fn starts_token(c: char) -> bool {
    is_digit(c) || is_operator_char(c) || is_special_open(c)
}

/// State of the character scanner while it walks one chunk of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Neutral,
    IntegerDigits,
    DecimalDigits,
    Operator,
    SpecialOpen,
    SpecialClose,
    Other,
}

/// Text produced by a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// Append the character as is.
    Char(char),
    /// Append a separating space, then the character.
    Separated(char),
}

impl Emit {
    fn write_to(self, buf: &mut String) {
        match self {
            Emit::Char(c) => buf.push(c),
            Emit::Separated(c) => {
                buf.push(' ');
                buf.push(c);
            }
        }
    }
}

impl ScanState {
    /// The state entered when `c` begins a token.
    pub fn for_char(c: char) -> Self {
        if is_special_open(c) {
            ScanState::SpecialOpen
        } else if is_special_close(c) {
            ScanState::SpecialClose
        } else if is_digit(c) {
            ScanState::IntegerDigits
        } else if is_operator_char(c) {
            ScanState::Operator
        } else if is_dot(c) {
            ScanState::DecimalDigits
        } else {
            ScanState::Other
        }
    }

    /// Feeds one character to the scanner.
    ///
    /// Returns the next state and the text to append, or gives back the
    /// character when it cannot continue or start a token from here.
    pub fn step(self, c: char) -> Result<(ScanState, Emit), char> {
        use ScanState::*;

        match self {
            Neutral if starts_token(c) || is_dot(c) => Ok((Self::for_char(c), Emit::Char(c))),

            // bracket contents are opaque
            SpecialOpen if is_special_close(c) => Ok((SpecialClose, Emit::Char(c))),
            SpecialOpen => Ok((SpecialOpen, Emit::Char(c))),

            IntegerDigits | DecimalDigits | Operator | SpecialClose if is_space(c) => {
                Ok((Neutral, Emit::Char(c)))
            }
            IntegerDigits | DecimalDigits if is_digit(c) => Ok((self, Emit::Char(c))),
            IntegerDigits if is_dot(c) => Ok((DecimalDigits, Emit::Char(c))),
            Operator if is_dot(c) => Ok((DecimalDigits, Emit::Separated(c))),
            IntegerDigits | DecimalDigits | Operator | SpecialClose if starts_token(c) => {
                Ok((Self::for_char(c), Emit::Separated(c)))
            }

            _ => Err(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    Operator,
    Special,
    /// Left behind by consecutive spaces; carries no meaning.
    Blank,
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub fn classify(text: String) -> Self {
        let kind = if text.is_empty() {
            TokenKind::Blank
        } else if is_number(&text) {
            TokenKind::Number
        } else if is_operator(&text) {
            TokenKind::Operator
        } else if is_special(&text) {
            TokenKind::Special
        } else {
            TokenKind::Unknown
        };

        Self { text, kind }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[derive(Debug)]
pub struct Lexer<'a> {
    source: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { source: input }
    }

    /// Rewrites the line so that every token is followed by exactly one space.
    fn scan(&self) -> Result<String, CalcError> {
        let mut buf = String::with_capacity(self.source.len() * 2);
        let mut offset = 0;

        for chunk in self.source.split(' ') {
            if is_number(chunk) || is_operator(chunk) {
                buf.push_str(chunk);
                buf.push(' ');
            } else {
                tracing::trace!(chunk = %chunk, offset, "scanning chunk");

                let mut state = ScanState::Neutral;
                for (i, c) in chunk.char_indices() {
                    let (next, emit) = state.step(c).map_err(|found| CalcError::Tokenize {
                        found,
                        line: self.source.to_string(),
                        span: (offset + i, found.len_utf8()).into(),
                    })?;
                    emit.write_to(&mut buf);
                    state = next;
                }

                buf.push(' ');
            }

            offset += chunk.len() + 1;
        }

        Ok(buf)
    }

    /// Splits the line into raw token strings.
    ///
    /// Empty strings from runs of spaces are kept, except at the very end.
    pub fn split(&self) -> Result<Vec<String>, CalcError> {
        let scanned = self.scan()?;
        let mut pieces: Vec<String> = scanned.split(' ').map(str::to_owned).collect();

        while pieces.last().is_some_and(|p| p.is_empty()) {
            pieces.pop();
        }

        Ok(pieces)
    }

    pub fn tokenize(&self) -> Result<Vec<Token>, CalcError> {
        Ok(self.split()?.into_iter().map(Token::classify).collect())
    }
}

pub fn tokenize(line: &str) -> Result<Vec<Token>, CalcError> {
    Lexer::new(line).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> Vec<String> {
        Lexer::new(input).split().unwrap()
    }

    #[test]
    fn test_predicates() {
        assert!(is_number("42"));
        assert!(is_number("-3.5"));
        assert!(is_number(".5"));
        assert!(is_number("1e3"));
        assert!(!is_number("3+4"));
        assert!(!is_number(""));

        for op in ["+", "-", "*", "/", "%", "^"] {
            assert!(is_operator(op));
        }
        assert!(!is_operator("++"));
        assert!(!is_operator(""));

        assert!(is_special("[pi]"));
        assert!(is_special("[]"));
        assert!(!is_special("["));
        assert!(!is_special("[pi"));
    }

    #[test]
    fn test_state_for_char() {
        assert_eq!(ScanState::for_char('7'), ScanState::IntegerDigits);
        assert_eq!(ScanState::for_char('^'), ScanState::Operator);
        assert_eq!(ScanState::for_char('['), ScanState::SpecialOpen);
        assert_eq!(ScanState::for_char(']'), ScanState::SpecialClose);
        assert_eq!(ScanState::for_char('.'), ScanState::DecimalDigits);
        assert_eq!(ScanState::for_char('x'), ScanState::Other);
    }

    #[test]
    fn test_neutral_transitions() {
        let s = ScanState::Neutral;
        assert_eq!(s.step('1'), Ok((ScanState::IntegerDigits, Emit::Char('1'))));
        assert_eq!(s.step('-'), Ok((ScanState::Operator, Emit::Char('-'))));
        assert_eq!(s.step('['), Ok((ScanState::SpecialOpen, Emit::Char('['))));
        assert_eq!(s.step('.'), Ok((ScanState::DecimalDigits, Emit::Char('.'))));
        assert_eq!(s.step(']'), Err(']'));
        assert_eq!(s.step('a'), Err('a'));
        assert_eq!(s.step(' '), Err(' '));
    }

    #[test]
    fn test_number_transitions() {
        let s = ScanState::IntegerDigits;
        assert_eq!(s.step('2'), Ok((ScanState::IntegerDigits, Emit::Char('2'))));
        assert_eq!(s.step('.'), Ok((ScanState::DecimalDigits, Emit::Char('.'))));
        assert_eq!(s.step('+'), Ok((ScanState::Operator, Emit::Separated('+'))));
        assert_eq!(s.step('['), Ok((ScanState::SpecialOpen, Emit::Separated('['))));
        assert_eq!(s.step(' '), Ok((ScanState::Neutral, Emit::Char(' '))));
        assert_eq!(s.step('x'), Err('x'));

        let s = ScanState::DecimalDigits;
        assert_eq!(s.step('2'), Ok((ScanState::DecimalDigits, Emit::Char('2'))));
        assert_eq!(s.step('*'), Ok((ScanState::Operator, Emit::Separated('*'))));
        assert_eq!(s.step('.'), Err('.'));
    }

    #[test]
    fn test_operator_transitions() {
        let s = ScanState::Operator;
        assert_eq!(s.step('3'), Ok((ScanState::IntegerDigits, Emit::Separated('3'))));
        assert_eq!(s.step('/'), Ok((ScanState::Operator, Emit::Separated('/'))));
        assert_eq!(s.step('.'), Ok((ScanState::DecimalDigits, Emit::Separated('.'))));
        assert_eq!(s.step(' '), Ok((ScanState::Neutral, Emit::Char(' '))));
        assert_eq!(s.step(']'), Err(']'));
    }

    #[test]
    fn test_special_transitions() {
        let s = ScanState::SpecialOpen;
        assert_eq!(s.step('m'), Ok((ScanState::SpecialOpen, Emit::Char('m'))));
        assert_eq!(s.step('+'), Ok((ScanState::SpecialOpen, Emit::Char('+'))));
        assert_eq!(s.step(']'), Ok((ScanState::SpecialClose, Emit::Char(']'))));

        let s = ScanState::SpecialClose;
        assert_eq!(s.step('4'), Ok((ScanState::IntegerDigits, Emit::Separated('4'))));
        assert_eq!(s.step('['), Ok((ScanState::SpecialOpen, Emit::Separated('['))));
        assert_eq!(s.step('.'), Err('.'));

        assert_eq!(ScanState::Other.step('1'), Err('1'));
    }

    #[test]
    fn test_split_adjacent_tokens() {
        assert_eq!(split("3+4*2"), vec!["3", "+", "4", "*", "2"]);
        assert_eq!(split("3 4 +"), vec!["3", "4", "+"]);
        assert_eq!(split("2[pi]*"), vec!["2", "[pi]", "*"]);
        assert_eq!(split("[mem][pi]+"), vec!["[mem]", "[pi]", "+"]);
        assert_eq!(split("4.5*.5"), vec!["4.5", "*", ".5"]);
        assert_eq!(split("1 2+3-"), vec!["1", "2", "+", "3", "-"]);
    }

    #[test]
    fn test_split_fast_path() {
        assert_eq!(split("-3 2.5e1 +"), vec!["-3", "2.5e1", "+"]);
    }

    #[test]
    fn test_split_keeps_interior_blanks() {
        assert_eq!(split("3  4 +"), vec!["3", "", "4", "+"]);
        assert_eq!(split(" 3"), vec!["", "3"]);
        assert!(split("").is_empty());
    }

    #[test]
    fn test_unclosed_bracket_is_kept() {
        let tokens = tokenize("3 [pi").unwrap();
        assert_eq!(tokens[1].text, "[pi");
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
    }

    #[test]
    fn test_classify() {
        let kinds: Vec<TokenKind> = tokenize("1  + [pi]")
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Number,
                TokenKind::Blank,
                TokenKind::Operator,
                TokenKind::Special,
            ]
        );
    }

    #[test]
    fn test_unrecognized_character() {
        let err = tokenize("3 4a +").unwrap_err();
        assert_eq!(
            err,
            CalcError::Tokenize {
                found: 'a',
                line: "3 4a +".to_string(),
                span: (3, 1).into(),
            }
        );
    }

    #[test]
    fn test_second_decimal_point() {
        match tokenize("1..2") {
            Err(CalcError::Tokenize { found, .. }) => assert_eq!(found, '.'),
            other => panic!("expected a tokenize error, got {other:?}"),
        }
    }
}
