use std::str::FromStr;

use crate::{
    error::CalcError,
    lexer::{Token, TokenKind},
    Lexer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
}

impl Op {
    /// Applies the operator with `a` as the left and `b` as the right operand.
    ///
    /// Follows IEEE-754 throughout: dividing by zero gives an infinity or NaN
    /// and `%` takes the sign of the dividend.
    pub fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Op::Plus => a + b,
            Op::Minus => a - b,
            Op::Star => a * b,
            Op::Slash => a / b,
            Op::Percent => a % b,
            Op::Caret => a.powf(b),
        }
    }
}

impl FromStr for Op {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Op::Plus),
            "-" => Ok(Op::Minus),
            "*" => Ok(Op::Star),
            "/" => Ok(Op::Slash),
            "%" => Ok(Op::Percent),
            "^" => Ok(Op::Caret),
            _ => Err(CalcError::UnrecognizedToken(s.to_string())),
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Op::Plus => "+",
                Op::Minus => "-",
                Op::Star => "*",
                Op::Slash => "/",
                Op::Percent => "%",
                Op::Caret => "^",
            }
        )
    }
}

/// Named values written in brackets, e.g. `[pi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Special {
    Mem,
    Pi,
}

impl FromStr for Special {
    type Err = CalcError;

    /// Parses a bracketed token. Matching ignores case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .ok_or_else(|| CalcError::UnrecognizedToken(s.to_string()))?
            .to_lowercase();

        match name.as_str() {
            "mem" => Ok(Special::Mem),
            "pi" => Ok(Special::Pi),
            _ => Err(CalcError::UnsupportedSpecial(name)),
        }
    }
}

/// Evaluates RPN lines and remembers the last successful result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluator {
    memory: f64,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memory(memory: f64) -> Self {
        Self { memory }
    }

    /// The value `[mem]` currently recalls.
    pub fn memory(&self) -> f64 {
        self.memory
    }

    /// Tokenizes and evaluates one line.
    ///
    /// The result is stored as the new memory value; on error the memory is
    /// left untouched.
    pub fn evaluate(&mut self, line: &str) -> Result<f64, CalcError> {
        let tokens = Lexer::new(line).tokenize()?;
        tracing::debug!(?tokens, "tokenized line");

        let result = self.eval_tokens(&tokens)?;

        tracing::debug!(result, previous = self.memory, "updating memory");
        self.memory = result;
        Ok(result)
    }

    /// Runs classified tokens through the operand stack without touching memory.
    ///
    /// An empty expression evaluates to `0`.
    pub fn eval_tokens(&self, tokens: &[Token]) -> Result<f64, CalcError> {
        let mut stack: Vec<f64> = Vec::new();

        for token in tokens {
            match token.kind {
                TokenKind::Blank => continue,
                TokenKind::Number => {
                    let n = token
                        .text
                        .parse::<f64>()
                        .map_err(|_| CalcError::Parse(token.text.clone()))?;
                    stack.push(n);
                }
                TokenKind::Operator => {
                    let op: Op = token.text.parse()?;
                    let b = stack.pop().ok_or(CalcError::StackUnderflow)?;
                    let a = stack.pop().ok_or(CalcError::StackUnderflow)?;
                    stack.push(op.apply(a, b));
                }
                TokenKind::Special => match token.text.parse::<Special>()? {
                    Special::Mem => stack.push(self.memory),
                    Special::Pi => stack.push(std::f64::consts::PI),
                },
                TokenKind::Unknown => {
                    return Err(CalcError::UnrecognizedToken(token.text.clone()));
                }
            }
        }

        match stack.len() {
            0 => Ok(0.0),
            1 => Ok(stack[0]),
            remaining => Err(CalcError::IncompleteExpression { remaining }),
        }
    }
}
