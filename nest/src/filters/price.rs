/// Price window resolution.
///
/// A budget derives the band `[budget / 10, budget]`; explicit `minPrice` / `maxPrice`
/// then replace the matching side. Resolution order is budget, min, max.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceBand {
    pub derived_lower: Option<f64>,
    pub derived_upper: Option<f64>,
    pub explicit_lower: Option<f64>,
    pub explicit_upper: Option<f64>,
}

impl PriceBand {
    pub const BUDGET_FLOOR_DIVISOR: f64 = 10.0;

    pub fn new(budget: Option<f64>, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        Self {
            derived_lower: budget.map(|b| b / Self::BUDGET_FLOOR_DIVISOR),
            derived_upper: budget,
            explicit_lower: min_price,
            explicit_upper: max_price,
        }
    }

    /// True when no price input was given at all, so no range clause is built.
    pub fn is_unbounded(&self) -> bool {
        self.derived_upper.is_none() && self.explicit_lower.is_none() && self.explicit_upper.is_none()
    }

    /// Inclusive `(lower, upper)` bounds after explicit values override the budget band.
    pub fn resolve(&self) -> (Option<f64>, Option<f64>) {
        let lower = self.explicit_lower.or(self.derived_lower);
        let upper = self.explicit_upper.or(self.derived_upper);
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_alone_derives_band() {
        let band = PriceBand::new(Some(1000.0), None, None);
        assert_eq!(band.resolve(), (Some(100.0), Some(1000.0)));
    }

    #[test]
    fn explicit_min_overrides_derived_lower_only() {
        let band = PriceBand::new(Some(1000.0), Some(500.0), None);
        assert_eq!(band.resolve(), (Some(500.0), Some(1000.0)));
    }

    #[test]
    fn explicit_max_overrides_derived_upper_only() {
        let band = PriceBand::new(Some(1000.0), None, Some(800.0));
        assert_eq!(band.resolve(), (Some(100.0), Some(800.0)));
    }

    #[test]
    fn explicit_bounds_win_even_when_inverted_against_budget() {
        let band = PriceBand::new(Some(1000.0), Some(5000.0), None);
        assert_eq!(band.resolve(), (Some(5000.0), Some(1000.0)));
    }

    #[test]
    fn no_inputs_is_unbounded() {
        let band = PriceBand::new(None, None, None);
        assert!(band.is_unbounded());
        assert_eq!(band.resolve(), (None, None));
        assert!(!PriceBand::new(None, Some(1.0), None).is_unbounded());
    }
}
