use log::{debug, trace};
use std::iter::{Enumerate, Peekable};
use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Op(char),
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid char in expression: '{ch}' at position {position}")]
    InvalidCharacter { ch: char, position: usize },
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,
    #[error("empty expression")]
    EmptyExpression,
    #[error("malformed expression")]
    MalformedExpression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub lhs: f64,
    pub op: char,
    pub rhs: f64,
    pub result: f64,
}

#[derive(Debug, Default)]
pub struct EvaluationTrace {
    pub steps: Vec<Step>,
    pub detailed_mode: bool,
}

impl EvaluationTrace {
    pub fn new(detailed_mode: bool) -> Self {
        EvaluationTrace {
            steps: Vec::new(),
            detailed_mode,
        }
    }

    pub fn add_step(&mut self, step: Step) {
        if self.detailed_mode {
            self.steps.push(step);
        }
    }
}

/// Lazily splits an expression into tokens.
///
/// Stops at the first character that cannot start a token; positions in
/// `EvalError::InvalidCharacter` are character (not byte) offsets.
pub struct Scanner<'a> {
    chars: Peekable<Enumerate<Chars<'a>>>,
    failed: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(expression: &'a str) -> Self {
        Scanner {
            chars: expression.chars().enumerate().peekable(),
            failed: false,
        }
    }

    // Every digit is accumulated into one integer, the fractional digit count
    // only decides the final divisor. Extra dots are consumed and ignored.
    fn scan_number(&mut self) -> f64 {
        let mut value = 0.0;
        let mut decimal_places = -1.0;
        let mut is_decimal = false;

        while let Some(&(_, ch)) = self.chars.peek() {
            match ch {
                '.' => is_decimal = true,
                '0'..='9' => {
                    value = value * 10.0 + f64::from(ch as u8 - b'0');
                    if is_decimal {
                        decimal_places *= 10.0;
                    }
                }
                _ => break,
            }
            self.chars.next();
        }

        if is_decimal {
            value /= -decimal_places;
        }
        value
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token, EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some(&(position, ch)) = self.chars.peek() {
            let token = match ch {
                c if c.is_whitespace() => {
                    self.chars.next();
                    continue;
                }
                '0'..='9' => return Some(Ok(Token::Number(self.scan_number()))),
                '(' => Token::LParen,
                ')' => Token::RParen,
                '+' | '-' | '*' | '/' => Token::Op(ch),
                _ => {
                    self.failed = true;
                    return Some(Err(EvalError::InvalidCharacter { ch, position }));
                }
            };
            self.chars.next();
            return Some(Ok(token));
        }
        None
    }
}

pub fn precedence(op: char) -> u8 {
    match op {
        '+' | '-' => 1,
        '*' | '/' => 2,
        _ => 0,
    }
}

pub fn apply_op(a: f64, b: f64, op: char) -> Result<f64, EvalError> {
    match op {
        '+' => Ok(a + b),
        '-' => Ok(a - b),
        '*' => Ok(a * b),
        '/' => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(a / b)
        }
        _ => Ok(0.0),
    }
}

pub fn evaluate(expression: &str) -> Result<f64, EvalError> {
    evaluate_traced(expression, &mut EvaluationTrace::new(false))
}

pub fn evaluate_traced(expression: &str, trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
    let result = run(expression, trace);
    debug!("evaluate {:?} -> {:?}", expression, result);
    result
}

fn run(expression: &str, trace: &mut EvaluationTrace) -> Result<f64, EvalError> {
    let mut values: Vec<f64> = Vec::new();
    let mut ops: Vec<char> = Vec::new();
    let mut seen_token = false;

    for token in Scanner::new(expression) {
        seen_token = true;
        match token? {
            Token::Number(n) => values.push(n),
            Token::LParen => ops.push('('),
            Token::RParen => loop {
                match ops.last() {
                    Some('(') => {
                        ops.pop();
                        break;
                    }
                    Some(_) => fold(&mut values, &mut ops, trace)?,
                    None => return Err(EvalError::UnbalancedParentheses),
                }
            },
            Token::Op(op) => {
                while let Some(&top) = ops.last() {
                    if precedence(top) < precedence(op) {
                        break;
                    }
                    fold(&mut values, &mut ops, trace)?;
                }
                ops.push(op);
            }
        }
    }

    if ops.contains(&'(') {
        return Err(EvalError::UnbalancedParentheses);
    }
    while !ops.is_empty() {
        fold(&mut values, &mut ops, trace)?;
    }

    match values.as_slice() {
        [result] => Ok(*result),
        [] if !seen_token => Err(EvalError::EmptyExpression),
        _ => Err(EvalError::MalformedExpression),
    }
}

fn fold(
    values: &mut Vec<f64>,
    ops: &mut Vec<char>,
    trace: &mut EvaluationTrace,
) -> Result<(), EvalError> {
    let op = ops.pop().ok_or(EvalError::MalformedExpression)?;
    let b = values.pop().ok_or(EvalError::MalformedExpression)?;
    let a = values.pop().ok_or(EvalError::MalformedExpression)?;

    let result = apply_op(a, b, op)?;
    trace!("fold {} {} {} = {}", a, op, b, result);
    trace.add_step(Step { lhs: a, op, rhs: b, result });
    values.push(result);
    Ok(())
}
