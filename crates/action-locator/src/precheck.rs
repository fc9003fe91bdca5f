//! Cheap syntax screening for generated expressions.
//!
//! Only generated alternatives go through this check; caller-supplied
//! candidates are always sent to the driver as-is.

use locator_core_types::{LocatorKind, LocatorStrategy};

/// Reject expressions that cannot possibly resolve.
pub fn check_expression(strategy: &LocatorStrategy) -> Result<(), String> {
    let expr = strategy.expression();
    if expr.trim().is_empty() {
        return Err("empty expression".to_string());
    }
    match strategy.kind() {
        LocatorKind::Id | LocatorKind::Name | LocatorKind::Class | LocatorKind::Tag => {
            if expr.chars().any(char::is_whitespace) {
                return Err(format!("whitespace in {} token", strategy.kind()));
            }
            Ok(())
        }
        LocatorKind::Css => {
            check_balanced(expr)?;
            if let Some(rest) = expr.strip_prefix('#') {
                if rest.starts_with(|c: char| c.is_ascii_digit()) {
                    return Err("css id selector starts with a digit".to_string());
                }
            }
            Ok(())
        }
        LocatorKind::Xpath => check_balanced(expr),
    }
}

fn check_balanced(expr: &str) -> Result<(), String> {
    let mut stack = Vec::new();
    let mut quote: Option<char> = None;
    for c in expr.chars() {
        if let Some(open) = quote {
            if c == open {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => stack.push(c),
            ')' => expect_open(&mut stack, '(')?,
            ']' => expect_open(&mut stack, '[')?,
            _ => {}
        }
    }
    if let Some(open) = quote {
        return Err(format!("unterminated {open} quote"));
    }
    if let Some(open) = stack.pop() {
        return Err(format!("unclosed '{open}'"));
    }
    Ok(())
}

fn expect_open(stack: &mut Vec<char>, open: char) -> Result<(), String> {
    match stack.pop() {
        Some(c) if c == open => Ok(()),
        _ => Err(format!("unbalanced '{open}'")),
    }
}
