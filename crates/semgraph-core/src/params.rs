//! Parameter tables produced by SEM estimators.
//!
//! Estimation happens elsewhere; this module only reads the resulting table. Rows follow the
//! `lhs op rhs` convention shared by lavaan, OpenMx and Mplus exports.

use crate::error::{Error, Result};
use crate::model::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    /// `=~`: latent `lhs` is measured by `rhs`.
    Loading,
    /// `~`: `lhs` is regressed on `rhs`.
    Regression,
    /// `~~`: covariance, or variance when `lhs == rhs`.
    Covariance,
    /// `~1`: intercept or mean of `lhs`.
    Intercept,
    /// `:=`: defined parameter.
    Defined,
    /// `|`: threshold of an ordinal indicator.
    Threshold,
    /// `==`, `<`, `>`: equality or inequality constraint.
    Constraint,
    /// `<~`: composite `lhs` is formed from `rhs`.
    Composite,
    /// `~*~`: scaling factor of an ordinal indicator.
    Scaling,
    /// Any other operator an estimator writes. Kept verbatim and never drawn.
    Other(String),
}

impl Operator {
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Loading => "=~",
            Operator::Regression => "~",
            Operator::Covariance => "~~",
            Operator::Intercept => "~1",
            Operator::Defined => ":=",
            Operator::Threshold => "|",
            Operator::Constraint => "==",
            Operator::Composite => "<~",
            Operator::Scaling => "~*~",
            Operator::Other(op) => op.as_str(),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "=~" => Ok(Operator::Loading),
            "~" => Ok(Operator::Regression),
            "~~" => Ok(Operator::Covariance),
            "~1" => Ok(Operator::Intercept),
            ":=" => Ok(Operator::Defined),
            "|" => Ok(Operator::Threshold),
            "==" | "<" | ">" => Ok(Operator::Constraint),
            "<~" => Ok(Operator::Composite),
            "~*~" => Ok(Operator::Scaling),
            "" => Err(Error::UnsupportedOperator { op: s.to_string() }),
            other => Ok(Operator::Other(other.to_string())),
        }
    }
}

impl TryFrom<String> for Operator {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(value: Operator) -> Self {
        match value {
            Operator::Other(op) => op,
            known => known.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRow {
    pub lhs: String,
    pub op: Operator,
    #[serde(default)]
    pub rhs: String,
    #[serde(default)]
    pub est: Option<f64>,
    #[serde(default)]
    pub se: Option<f64>,
    #[serde(default)]
    pub pval: Option<f64>,
    #[serde(default)]
    pub ci_lower: Option<f64>,
    #[serde(default)]
    pub ci_upper: Option<f64>,
    #[serde(default)]
    pub est_std: Option<f64>,
    /// Parameter label assigned in the model syntax.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
}

impl ParameterRow {
    pub fn new(lhs: impl Into<String>, op: Operator, rhs: impl Into<String>) -> Self {
        Self {
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
            est: None,
            se: None,
            pval: None,
            ci_lower: None,
            ci_upper: None,
            est_std: None,
            label: None,
            group: None,
        }
    }

    pub fn with_est(mut self, est: f64, se: Option<f64>, pval: Option<f64>) -> Self {
        self.est = Some(est);
        self.se = se;
        self.pval = pval;
        self
    }

    pub fn with_ci(mut self, lower: f64, upper: f64) -> Self {
        self.ci_lower = Some(lower);
        self.ci_upper = Some(upper);
        self
    }

    pub fn is_variance(&self) -> bool {
        self.op == Operator::Covariance && self.lhs == self.rhs
    }

    /// Estimate at two decimals followed by significance stars.
    pub fn est_sig(&self) -> Option<String> {
        let est = self.est?;
        let mut out = format_fixed(est, 2);
        out.push_str(significance_stars(self.pval));
        Some(out)
    }

    pub fn est_std_sig(&self) -> Option<String> {
        let est = self.est_std?;
        let mut out = format_fixed(est, 2);
        out.push_str(significance_stars(self.pval));
        Some(out)
    }

    pub fn confint(&self) -> Option<String> {
        let lower = self.ci_lower?;
        let upper = self.ci_upper?;
        Some(format!(
            "[{}, {}]",
            format_fixed(lower, 2),
            format_fixed(upper, 2)
        ))
    }

    pub fn column(&self, name: &str) -> Cell {
        let number = |v: Option<f64>| v.map_or(Cell::Missing, Cell::Number);
        let text = |v: Option<String>| v.map_or(Cell::Missing, Cell::Text);
        match name {
            "lhs" => Cell::Text(self.lhs.clone()),
            "op" => Cell::Text(self.op.as_str().to_string()),
            "rhs" => Cell::Text(self.rhs.clone()),
            "est" => number(self.est),
            "se" => number(self.se),
            "pval" => number(self.pval),
            "ci_lower" => number(self.ci_lower),
            "ci_upper" => number(self.ci_upper),
            "est_std" => number(self.est_std),
            "est_sig" => text(self.est_sig()),
            "est_std_sig" => text(self.est_std_sig()),
            "confint" => text(self.confint()),
            "param_label" => text(self.label.clone()),
            "group" => text(self.group.clone()),
            _ => Cell::Missing,
        }
    }
}

/// `*` for p < .05, `**` for p < .01, `***` for p < .001.
pub fn significance_stars(pval: Option<f64>) -> &'static str {
    match pval {
        Some(p) if p < 0.001 => "***",
        Some(p) if p < 0.01 => "**",
        Some(p) if p < 0.05 => "*",
        _ => "",
    }
}

/// Fixed-point formatting that never prints a negative zero.
pub fn format_fixed(value: f64, digits: usize) -> String {
    let out = format!("{value:.digits$}");
    if out.starts_with('-') && out[1..].chars().all(|c| c == '0' || c == '.') {
        return out[1..].to_string();
    }
    out
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTable {
    rows: Vec<ParameterRow>,
}

impl ParameterTable {
    pub fn new(rows: Vec<ParameterRow>) -> Self {
        Self { rows }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn rows(&self) -> &[ParameterRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean/intercept row of `name`, if the table has one.
    pub fn intercept(&self, name: &str) -> Option<&ParameterRow> {
        self.rows
            .iter()
            .find(|r| r.op == Operator::Intercept && r.lhs == name)
    }
}

impl FromIterator<ParameterRow> for ParameterTable {
    fn from_iter<T: IntoIterator<Item = ParameterRow>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// A fitted model as seen by graph extraction.
///
/// Estimator bindings implement this; the graph code never inspects the model otherwise.
pub trait FittedModel {
    fn parameter_table(&self) -> Result<ParameterTable>;
}

impl FittedModel for ParameterTable {
    fn parameter_table(&self) -> Result<ParameterTable> {
        Ok(self.clone())
    }
}
