// Copyright The MAL Authors
// SPDX-License-Identifier: Apache-2.0

/// Arithmetic category of spec §4.2. Binary in the AST even though some
/// rule-file forms read like unary sugar (`a * k`, `k / a`, `100 - a`,
/// `1 / a`): the parser desugars the literal side into a
/// `MalExpression::Literal` leaf so the evaluator only ever has to broadcast
/// two families together (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl ArithmeticOperator {
    pub fn apply(self, left: f64, right: f64) -> Option<f64> {
        match self {
            ArithmeticOperator::Add => Some(left + right),
            ArithmeticOperator::Subtract => Some(left - right),
            ArithmeticOperator::Multiply => Some(left * right),
            ArithmeticOperator::Divide => {
                if right == 0.0 {
                    // Divide-by-zero is silent: no output for the key
                    // (spec §4.7), never a hard failure.
                    None
                } else {
                    Some(left / right)
                }
            }
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
        }
    }
}
