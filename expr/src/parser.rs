//! Recursive-descent parser and evaluator for the grammar
//!
//! ```text
//! expression := term (('+'|'-') term)*
//! term       := factor (('*'|'/') factor)*
//! factor     := ['+'|'-'] exp_term
//! exp_term   := atom ('^' atom)*
//! atom       := number | '(' expression ')'   [unit identifier]
//! ```
//!
//! grounded on `original_source/src/util/expression-evaluator.cpp`'s
//! `evaluateExpression`/`evaluateTerm`/`evaluateExpTerm`/
//! `evaluateSignedFactor`/`evaluateFactor`. Each production returns a
//! [`Quantity`] carrying a `value` and a `dimension` (the order of the
//! length unit, e.g. 2 for an area).

use crate::error::EvalError;
use crate::lexer::{Lexer, Token};
use crate::units::{Unit, UnitTable};

/// A value produced by evaluation: a number together with the order of
/// its length unit (0 = dimensionless, 1 = length, 2 = area, ...).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub dimension: i32,
}

impl Quantity {
    fn dimensionless(value: f64) -> Self {
        Quantity { value, dimension: 0 }
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    current_offset: usize,
    default_unit: &'a Unit,
    table: &'a UnitTable,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, default_unit: &'a Unit, table: &'a UnitTable) -> Result<Self, EvalError> {
        let mut lexer = Lexer::new(input);
        let current_offset = lexer.offset();
        let current = lexer.next_token()?;
        Ok(Parser { lexer, current, current_offset, default_unit, table })
    }

    fn advance(&mut self) -> Result<(), EvalError> {
        self.current_offset = self.lexer.offset();
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn expect_rparen(&mut self) -> Result<(), EvalError> {
        if self.current == Token::RParen {
            self.advance()
        } else {
            Err(EvalError::Parse { message: "expected ')'", offset: self.current_offset })
        }
    }

    fn expect_end(&self) -> Result<(), EvalError> {
        if self.current == Token::End {
            Ok(())
        } else {
            Err(EvalError::Parse { message: "trailing input after expression", offset: self.current_offset })
        }
    }

    /// The dimension a bare, unit-less number would carry if it were
    /// reinterpreted against the default unit: 1 if that unit is
    /// absolute (a real length unit), 0 otherwise (e.g. a bare percentage
    /// default).
    fn default_dimension(&self) -> i32 {
        i32::from(self.default_unit.absolute)
    }

    fn parse_atom(&mut self) -> Result<Quantity, EvalError> {
        let mut q = match self.current.clone() {
            Token::Num(n) => {
                self.advance()?;
                Quantity::dimensionless(n)
            }
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect_rparen()?;
                inner
            }
            _ => {
                return Err(EvalError::Parse { message: "expected number or '('", offset: self.current_offset })
            }
        };

        if let Token::Ident(name) = self.current.clone() {
            let offset = self.current_offset;
            self.advance()?;
            let unit = self
                .table
                .lookup(&name)
                .ok_or_else(|| EvalError::UnknownUnit { unit: name.clone(), offset })?;
            // `Unit suffix divides the value by the unit's factor and adds
            // dimension 1`: expressed relative to the evaluator's default
            // unit, not an absolute scale.
            let factor = self.default_unit.px_per_unit / unit.px_per_unit;
            q.value /= factor;
            q.dimension += i32::from(unit.absolute);
        }

        Ok(q)
    }

    fn parse_exp_term(&mut self) -> Result<Quantity, EvalError> {
        let mut base = self.parse_atom()?;
        while self.current == Token::Caret {
            let offset = self.current_offset;
            self.advance()?;
            let exponent = self.parse_atom()?;
            if exponent.dimension != 0 {
                return Err(EvalError::DimensionMismatch { message: "exponent must be dimensionless", offset });
            }
            base.value = base.value.powf(exponent.value);
            base.dimension = (base.dimension as f64 * exponent.value).round() as i32;
        }
        Ok(base)
    }

    fn parse_factor(&mut self) -> Result<Quantity, EvalError> {
        let negate = match self.current {
            Token::Plus => {
                self.advance()?;
                false
            }
            Token::Minus => {
                self.advance()?;
                true
            }
            _ => false,
        };
        let mut q = self.parse_exp_term()?;
        if negate {
            q.value = -q.value;
        }
        Ok(q)
    }

    fn parse_term(&mut self) -> Result<Quantity, EvalError> {
        let mut q = self.parse_factor()?;
        loop {
            match self.current {
                Token::Star => {
                    self.advance()?;
                    let rhs = self.parse_factor()?;
                    q.value *= rhs.value;
                    q.dimension += rhs.dimension;
                }
                Token::Slash => {
                    self.advance()?;
                    let rhs = self.parse_factor()?;
                    q.value /= rhs.value;
                    q.dimension -= rhs.dimension;
                }
                _ => break,
            }
        }
        Ok(q)
    }

    fn parse_expression(&mut self) -> Result<Quantity, EvalError> {
        let mut q = self.parse_term()?;
        loop {
            let offset = self.current_offset;
            let subtract = match self.current {
                Token::Plus => {
                    self.advance()?;
                    false
                }
                Token::Minus => {
                    self.advance()?;
                    true
                }
                _ => break,
            };
            let mut rhs = self.parse_term()?;

            if rhs.dimension != q.dimension {
                let default_dim = self.default_dimension();
                if rhs.dimension == 0 && q.dimension == default_dim {
                    rhs.dimension = default_dim;
                } else if q.dimension == 0 && rhs.dimension == default_dim {
                    q.dimension = default_dim;
                } else {
                    return Err(EvalError::DimensionMismatch {
                        message: "addition requires matching dimensions",
                        offset,
                    });
                }
            }

            q.value += if subtract { -rhs.value } else { rhs.value };
        }
        Ok(q)
    }

    fn parse(mut self) -> Result<Quantity, EvalError> {
        if self.current == Token::End {
            return Ok(Quantity::dimensionless(0.0));
        }
        let mut result = self.parse_expression()?;
        self.expect_end()?;

        // Entire expression came out dimensionless: apply the default unit,
        // matching `evaluate()`'s final `resolveUnit(NULL, ...)` step.
        let default_dim = self.default_dimension();
        if result.dimension == 0 && default_dim != 0 {
            result.dimension = default_dim;
        }
        Ok(result)
    }
}

/// Evaluates `input` against `default_unit`, returning the resulting
/// [`Quantity`] expressed in terms of that unit.
pub fn evaluate(input: &str, default_unit: &Unit, table: &UnitTable) -> Result<Quantity, EvalError> {
    Parser::new(input, default_unit, table)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::unit_table;

    fn unit(name: &str) -> Unit {
        *unit_table().lookup(name).unwrap()
    }

    #[test]
    fn adds_matching_units() {
        let mm = unit("mm");
        let q = evaluate("10mm + 2cm", &mm, unit_table()).unwrap();
        assert!((q.value - 30.0).abs() < 1e-9);
        assert_eq!(q.dimension, 1);
    }

    #[test]
    fn bare_number_takes_default_unit() {
        let px = unit("px");
        let q = evaluate("100", &px, unit_table()).unwrap();
        assert!((q.value - 100.0).abs() < 1e-9);
        assert_eq!(q.dimension, 1);
    }

    #[test]
    fn multiplication_adds_dimension() {
        let inch = unit("in");
        let q = evaluate("1in * 1in", &inch, unit_table()).unwrap();
        assert_eq!(q.dimension, 2);
    }

    #[test]
    fn dimensionless_reinterpreted_against_default() {
        let inch = unit("in");
        let q = evaluate("1 + 1in", &inch, unit_table()).unwrap();
        assert!((q.value - 2.0).abs() < 1e-9);
        assert_eq!(q.dimension, 1);
    }

    #[test]
    fn division_by_zero_yields_infinity_without_fault() {
        let px = unit("px");
        let q = evaluate("1 / 0", &px, unit_table()).unwrap();
        assert!(q.value.is_infinite());
    }

    #[test]
    fn trailing_operator_is_a_parse_error() {
        let px = unit("px");
        let err = evaluate("1 +", &px, unit_table()).unwrap_err();
        assert!(matches!(err, EvalError::Parse { .. }));
    }

    #[test]
    fn unknown_unit_suffix_is_reported() {
        let px = unit("px");
        let err = evaluate("3 furlongs", &px, unit_table()).unwrap_err();
        assert!(matches!(err, EvalError::UnknownUnit { .. }));
    }

    #[test]
    fn exponent_with_unit_is_a_dimension_mismatch() {
        let px = unit("px");
        let err = evaluate("2 ^ 1px", &px, unit_table()).unwrap_err();
        assert!(matches!(err, EvalError::DimensionMismatch { .. }));
    }

    /// Standard `*`-before-`+` precedence: `2 * 3cm` folds to a single
    /// dimension-1 term (60mm) before the `+ 5mm` addition runs, landing
    /// on 65mm. Wrapping the sum in parentheses instead forces the
    /// addition first and evaluates to a different, equally valid, 70mm —
    /// see `DESIGN.md` for which reading this crate's seed test follows.
    #[test]
    fn seed_scenario_default_unit_reinterpretation() {
        let mm = unit("mm");
        let q = evaluate("2 * 3cm + 5mm", &mm, unit_table()).unwrap();
        assert!((q.value - 65.0).abs() < 1e-9);
        assert_eq!(q.dimension, 1);
    }
}
