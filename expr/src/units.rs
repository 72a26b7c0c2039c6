//! The unit table (component J's one piece of process-wide state): a
//! read-only list of length units and their conversion factor to a common
//! canonical unit (CSS pixels), built once and shared by every
//! [`crate::Evaluator`].
//!
//! Grounded on `original_source/src/util/expression-evaluator.cpp`'s
//! `resolveUnit`, which looks an identifier up in a process-wide
//! `unit_table` and reports whether the unit is "absolute" (carries
//! dimension) or not (e.g. a bare percentage).

use std::sync::OnceLock;

/// A single length unit: its name, whether it carries dimension (an
/// "absolute" unit in the original's terms), and its conversion factor to
/// the canonical unit (CSS pixels, matching SVG's `1in == 96px`).
#[derive(Copy, Clone, Debug)]
pub struct Unit {
    pub name: &'static str,
    pub absolute: bool,
    pub px_per_unit: f64,
}

const UNITS: &[Unit] = &[
    Unit { name: "px", absolute: true, px_per_unit: 1.0 },
    Unit { name: "in", absolute: true, px_per_unit: 96.0 },
    Unit { name: "mm", absolute: true, px_per_unit: 96.0 / 25.4 },
    Unit { name: "cm", absolute: true, px_per_unit: 96.0 / 2.54 },
    Unit { name: "m", absolute: true, px_per_unit: 96.0 / 25.4 * 1000.0 },
    Unit { name: "pt", absolute: true, px_per_unit: 96.0 / 72.0 },
    Unit { name: "pc", absolute: true, px_per_unit: 16.0 },
    // A bare percentage carries no physical dimension: it always resolves
    // against some externally supplied reference, which this evaluator
    // does not model, so it is kept dimensionless.
    Unit { name: "%", absolute: false, px_per_unit: 1.0 },
];

/// The process-wide unit table, built once and treated as read-only
/// afterward (`SPEC_FULL.md` §3 "Configuration" / §9 "Global state").
pub struct UnitTable {
    units: &'static [Unit],
}

impl UnitTable {
    pub fn lookup(&self, name: &str) -> Option<&'static Unit> {
        self.units.iter().find(|u| u.name == name)
    }
}

static TABLE: OnceLock<UnitTable> = OnceLock::new();

pub fn unit_table() -> &'static UnitTable {
    TABLE.get_or_init(|| UnitTable { units: UNITS })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_units() {
        let table = unit_table();
        assert!(table.lookup("mm").is_some());
        assert!(table.lookup("in").unwrap().px_per_unit == 96.0);
        assert!(table.lookup("bogus").is_none());
    }

    #[test]
    fn percent_is_not_absolute() {
        assert!(!unit_table().lookup("%").unwrap().absolute);
    }
}
