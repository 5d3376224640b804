//! Conditional styling: predicate-guarded aesthetic assignment over tables.

use crate::error::{Error, Result};
use crate::expr::{LabelExpr, Predicate};
use crate::model::{AesValue, Aesthetic, Cell, Node, NodeShape, NodeTable, Row, Table};
use std::str::FromStr;

pub trait RowPredicate<R: ?Sized> {
    fn matches(&self, row: &R) -> bool;
}

impl<R: Row, F: Fn(&R) -> bool> RowPredicate<R> for F {
    fn matches(&self, row: &R) -> bool {
        self(row)
    }
}

impl<R: Row> RowPredicate<R> for Predicate {
    fn matches(&self, row: &R) -> bool {
        self.eval(row)
    }
}

/// Named row selections used by the common styling shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    Positive,
    Negative,
    /// p < .05
    Significant,
    NonSignificant,
    /// Estimated without a standard error (or with se = 0).
    Fixed,
    Variance,
    Covariance,
    Regression,
    Loading,
    Latent,
    Observed,
}

impl Selector {
    pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

    pub fn select<R: Row + ?Sized>(self, row: &R) -> bool {
        let est = row.column("est").as_f64();
        let pval = row.column("pval").as_f64();
        let op_is = |op: &str| matches!(row.column("op"), Cell::Text(s) if s == op);
        let same_ends = row.column("lhs") == row.column("rhs");
        match self {
            Selector::Positive => est.is_some_and(|v| v > 0.0),
            Selector::Negative => est.is_some_and(|v| v < 0.0),
            Selector::Significant => pval.is_some_and(|p| p < Self::SIGNIFICANCE_LEVEL),
            Selector::NonSignificant => pval.is_some_and(|p| p >= Self::SIGNIFICANCE_LEVEL),
            Selector::Fixed => {
                est.is_some() && row.column("se").as_f64().is_none_or(|se| se == 0.0)
            }
            Selector::Variance => op_is("~~") && same_ends,
            Selector::Covariance => op_is("~~") && !same_ends,
            Selector::Regression => op_is("~"),
            Selector::Loading => op_is("=~"),
            Selector::Latent => matches!(row.column("shape"), Cell::Text(s) if s == "oval"),
            Selector::Observed => matches!(row.column("shape"), Cell::Text(s) if s == "rect"),
        }
    }
}

impl<R: Row> RowPredicate<R> for Selector {
    fn matches(&self, row: &R) -> bool {
        self.select(row)
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "pos" | "positive" => Selector::Positive,
            "neg" | "negative" => Selector::Negative,
            "sig" | "significant" => Selector::Significant,
            "nonsig" | "nonsignificant" => Selector::NonSignificant,
            "fix" | "fixed" => Selector::Fixed,
            "var" | "variance" => Selector::Variance,
            "cov" | "covariance" => Selector::Covariance,
            "reg" | "regression" => Selector::Regression,
            "load" | "loading" => Selector::Loading,
            "latent" => Selector::Latent,
            "obs" | "observed" => Selector::Observed,
            _ => {
                return Err(Error::UnknownName {
                    kind: "selector",
                    value: s.to_string(),
                });
            }
        })
    }
}

/// Either a named selector or a parsed predicate expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Selector(Selector),
    Predicate(Predicate),
}

impl Condition {
    /// Selector names win over expressions; anything else is parsed as a predicate.
    pub fn parse(input: &str) -> Result<Self> {
        match input.parse::<Selector>() {
            Ok(sel) => Ok(Condition::Selector(sel)),
            Err(_) => Ok(Condition::Predicate(Predicate::parse(input)?)),
        }
    }
}

impl<R: Row> RowPredicate<R> for Condition {
    fn matches(&self, row: &R) -> bool {
        match self {
            Condition::Selector(sel) => sel.select(row),
            Condition::Predicate(pred) => pred.eval(row),
        }
    }
}

impl<R: Row + Clone> Table<R> {
    /// Overwrites `aes` on the rows matching `predicate`.
    ///
    /// Rows lacking `aes` are initialized to [`Aesthetic::default_value`] before the predicate
    /// runs, so after this call every row carries the aesthetic.
    pub fn with_aes_where<P>(&self, predicate: &P, aes: Aesthetic, value: impl Into<AesValue>) -> Self
    where
        P: RowPredicate<R> + ?Sized,
    {
        let value = value.into();
        self.iter()
            .map(|row| {
                let mut row = row.clone();
                if !row.aesthetics().contains(aes) {
                    row.aesthetics_mut().set(aes, aes.default_value());
                }
                if predicate.matches(&row) {
                    row.aesthetics_mut().set(aes, value.clone());
                }
                row
            })
            .collect()
    }

    /// Sets `aes` on every row.
    pub fn with_aes(&self, aes: Aesthetic, value: impl Into<AesValue>) -> Self {
        self.with_aes_where(&|_: &R| true, aes, value)
    }

    /// Recomputes the label of the rows matching `predicate`.
    pub fn with_label_where<P>(&self, predicate: &P, label: &LabelExpr) -> Self
    where
        P: RowPredicate<R> + ?Sized,
    {
        self.iter()
            .map(|row| {
                let mut row = row.clone();
                if predicate.matches(&row) {
                    let text = label.eval(&row);
                    row.set_label(text);
                }
                row
            })
            .collect()
    }

    pub fn relabel(&self, label: &LabelExpr) -> Self {
        self.with_label_where(&|_: &R| true, label)
    }
}

impl NodeTable {
    /// Sets the shape of the nodes matching `predicate`.
    ///
    /// Shape is what [`Selector::Latent`] and [`Selector::Observed`] read, so later rules in a
    /// chain see the new shape.
    pub fn with_shape_where<P>(&self, predicate: &P, shape: NodeShape) -> Self
    where
        P: RowPredicate<Node> + ?Sized,
    {
        self.iter()
            .map(|node| {
                let mut node = node.clone();
                if predicate.matches(&node) {
                    node.shape = shape;
                }
                node
            })
            .collect()
    }
}
