use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LadderError {
    #[error("option chain is empty")]
    EmptyChain,

    #[error("division by zero: {0} is 0")]
    DivideByZero(&'static str),

    #[error("invalid price: {0}")]
    InvalidPrice(f64),
}

pub type LadderResult<T> = Result<T, LadderError>;
