pub mod error;
pub mod evaluator;
pub mod lexer;

pub use error::CalcError;
pub use evaluator::*;
pub use lexer::*;
