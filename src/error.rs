use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Everything that can go wrong while evaluating one line.
///
/// None of these are fatal: the line is abandoned and the calculator's
/// memory keeps its previous value.
#[derive(Diagnostic, Debug, Error, Clone, PartialEq)]
pub enum CalcError {
    #[error("unrecognized token starting with: '{found}'")]
    #[diagnostic(code(rpn::tokenize))]
    Tokenize {
        found: char,
        #[source_code]
        line: String,
        #[label("this input character")]
        span: SourceSpan,
    },

    #[error("unable to parse \"{0}\"")]
    #[diagnostic(code(rpn::parse))]
    Parse(String),

    #[error("not enough operands")]
    #[diagnostic(
        code(rpn::stack_underflow),
        help("operators take the two values pushed before them, e.g. `3 4 +`")
    )]
    StackUnderflow,

    #[error("too few operators, multiple values remain on the stack")]
    #[diagnostic(code(rpn::incomplete), help("add operators until a single value remains"))]
    IncompleteExpression { remaining: usize },

    #[error("unsupported special command: \"{0}\"")]
    #[diagnostic(code(rpn::special), help("supported specials are [mem] and [pi]"))]
    UnsupportedSpecial(String),

    #[error("unrecognized token: \"{0}\"")]
    #[diagnostic(code(rpn::unrecognized))]
    UnrecognizedToken(String),
}
