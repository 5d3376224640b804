mod extract;

use crate::*;

/// Two-factor model with one structural path and a residual covariance.
pub(super) fn sample_table() -> ParameterTable {
    ParameterTable::new(vec![
        ParameterRow::new("ind60", Operator::Loading, "x1").with_est(1.0, None, None),
        ParameterRow::new("ind60", Operator::Loading, "x2").with_est(2.18, Some(0.14), Some(0.0)),
        ParameterRow::new("dem60", Operator::Loading, "y1").with_est(1.0, None, None),
        ParameterRow::new("dem60", Operator::Loading, "y2").with_est(1.35, Some(0.17), Some(0.0)),
        ParameterRow::new("dem60", Operator::Regression, "ind60")
            .with_est(1.47, Some(0.39), Some(0.0002))
            .with_ci(0.71, 2.23),
        ParameterRow::new("y1", Operator::Covariance, "y2").with_est(-0.12, Some(0.4), Some(0.76)),
        ParameterRow::new("y1", Operator::Covariance, "y1").with_est(1.9, Some(0.4), Some(0.0)),
        ParameterRow::new("x1", Operator::Intercept, "").with_est(5.12, Some(0.08), Some(0.0)),
        ParameterRow::new("total", Operator::Defined, "a*b").with_est(0.3, None, None),
    ])
}
