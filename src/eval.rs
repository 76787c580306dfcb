use log::trace;
use thiserror::Error;

use crate::parse::{Application, TokenTree};

/// Why evaluation stopped. Once produced, a failure is returned unchanged
/// from every enclosing application.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid operator")]
    UnknownOperator,
    #[error("invalid number")]
    MalformedNumeral,
    #[error("integer overflow")]
    Overflow,
}

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
    pub fn from_symbol(symbol: &str) -> Option<Op> {
        Some(match symbol {
            "+" => Op::Plus,
            "-" => Op::Minus,
            "*" => Op::Star,
            "/" => Op::Slash,
            "%" => Op::Percent,
            "^" => Op::Caret,
            _ => return None,
        })
    }
}

pub fn evaluate(tree: &TokenTree<'_>) -> Result<i64, Failure> {
    match tree {
        TokenTree::Numeral(text) => text.parse().map_err(|_| Failure::MalformedNumeral),
        TokenTree::Cons(app) => apply(app),
    }
}

fn apply(app: &Application<'_>) -> Result<i64, Failure> {
    let mut acc = evaluate(app.head())?;

    for operand in app.tail() {
        let rhs = evaluate(operand)?;
        let combined = combine(app.operator(), acc, rhs);
        trace!("({} {acc} {rhs}) => {combined:?}", app.operator());
        acc = combined?;
    }

    Ok(acc)
}

/// Folds one more operand into the accumulator, left operand first.
pub fn combine(symbol: &str, lhs: i64, rhs: i64) -> Result<i64, Failure> {
    let Some(op) = Op::from_symbol(symbol) else {
        return Err(Failure::UnknownOperator);
    };

    match op {
        Op::Plus => lhs.checked_add(rhs).ok_or(Failure::Overflow),
        Op::Minus => lhs.checked_sub(rhs).ok_or(Failure::Overflow),
        Op::Star => lhs.checked_mul(rhs).ok_or(Failure::Overflow),
        Op::Slash if rhs == 0 => Err(Failure::DivisionByZero),
        Op::Slash => lhs.checked_div(rhs).ok_or(Failure::Overflow),
        Op::Percent if rhs == 0 => Err(Failure::DivisionByZero),
        Op::Percent => lhs.checked_rem(rhs).ok_or(Failure::Overflow),
        Op::Caret => power(lhs, rhs),
    }
}

/// `base` multiplied into 1, `exponent` times. A negative exponent means no
/// multiplications at all.
fn power(base: i64, exponent: i64) -> Result<i64, Failure> {
    if exponent < 0 {
        return Ok(1);
    }

    match u32::try_from(exponent) {
        Ok(exponent) => base.checked_pow(exponent).ok_or(Failure::Overflow),
        // any other base overflows long before u32::MAX
        Err(_) => match base {
            0 => Ok(0),
            1 => Ok(1),
            -1 if exponent % 2 == 0 => Ok(1),
            -1 => Ok(-1),
            _ => Err(Failure::Overflow),
        },
    }
}
