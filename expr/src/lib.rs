//! Recursive-descent evaluator for unit-aware length expressions
//! (component J): arithmetic over numbers carrying a `dimension` order,
//! with a configurable default unit for dimensionless literals.
//!
//! Grounded on Inkscape's `ExpressionEvaluator`
//! (`original_source/src/util/expression-evaluator.cpp`, itself derived
//! from libgimpwidgets' `gimpeevl.c`): same grammar, same dimension
//! algebra, same error taxonomy.

mod error;
mod lexer;
mod parser;
mod units;

pub use error::{EvalError, EvalResult};
pub use parser::Quantity;
pub use units::{unit_table, Unit, UnitTable};

/// Evaluates expressions against a fixed default unit.
///
/// The default unit is what a bare, unit-less number (or an expression
/// that reduces to dimension 0) is reinterpreted as, and what unit
/// suffixes in the input are converted relative to.
pub struct Evaluator {
    default_unit: Unit,
}

impl Evaluator {
    /// Looks `default_unit_name` up in the process-wide unit table.
    /// Returns [`EvalError::UnknownUnit`] if it isn't a known unit.
    pub fn new(default_unit_name: &str) -> EvalResult<Self> {
        let default_unit = *unit_table()
            .lookup(default_unit_name)
            .ok_or_else(|| EvalError::UnknownUnit { unit: default_unit_name.to_string(), offset: 0 })?;
        Ok(Evaluator { default_unit })
    }

    /// Evaluates `input`, an already-validated UTF-8 string.
    pub fn evaluate(&self, input: &str) -> EvalResult<Quantity> {
        parser::evaluate(input, &self.default_unit, unit_table())
    }

    /// Evaluates `input` given as raw bytes, validating UTF-8 first
    /// (mirroring the original's `g_utf8_validate` guard at the top of
    /// `evaluate()`).
    pub fn evaluate_bytes(&self, input: &[u8]) -> EvalResult<Quantity> {
        let s = std::str::from_utf8(input).map_err(|_| EvalError::InvalidUtf8)?;
        self.evaluate(s)
    }

    pub fn default_unit(&self) -> &Unit {
        &self.default_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_surface_smoke_test() {
        let eval = Evaluator::new("mm").unwrap();
        let q = eval.evaluate("10mm + 2cm").unwrap();
        assert!((q.value - 30.0).abs() < 1e-9);
        assert_eq!(q.dimension, 1);
    }

    #[test]
    fn empty_expression_is_zero() {
        let eval = Evaluator::new("px").unwrap();
        let q = eval.evaluate("").unwrap();
        assert_eq!(q.value, 0.0);
    }

    #[test]
    fn unknown_default_unit_is_rejected() {
        assert!(Evaluator::new("parsecs").is_err());
    }

    #[test]
    fn rejects_invalid_utf8() {
        let eval = Evaluator::new("px").unwrap();
        let bytes = [0x31, 0xff, 0xfe];
        assert!(matches!(eval.evaluate_bytes(&bytes), Err(EvalError::InvalidUtf8)));
    }
}
