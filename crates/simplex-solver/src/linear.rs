use std::fmt;

use num_traits::{One, Zero};

use crate::rational::Rational;

/// A named, indexed variable such as `x3`.
///
/// Index 0 is reserved for the auxiliary variable of phase one; decision
/// variables start at 1. Every variable created while transforming a model
/// gets a fresh index, so within one model the index alone identifies a
/// row/column variable.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub name: String,
    pub index: u32,
}

impl Variable {
    pub fn new(name: impl Into<String>, index: u32) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// The interpretation range `self >= 0`.
    pub fn non_negative_range(&self) -> Equation {
        self.lower_bound_range(Rational::zero())
    }

    /// The interpretation range `self >= bound`.
    pub fn lower_bound_range(&self, bound: Rational) -> Equation {
        Equation::new(
            Expression::from(Term::linear(Rational::one(), self.clone())),
            Relation::GreaterOrEqual,
            Expression::from(Term::Constant(bound)),
        )
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.index)
    }
}

/// One summand of a linear expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Constant(Rational),
    Linear(Rational, Variable),
}

impl Term {
    pub fn constant(coefficient: impl Into<Rational>) -> Self {
        Term::Constant(coefficient.into())
    }

    pub fn linear(coefficient: impl Into<Rational>, variable: Variable) -> Self {
        Term::Linear(coefficient.into(), variable)
    }

    pub fn coefficient(&self) -> &Rational {
        match self {
            Term::Constant(c) | Term::Linear(c, _) => c,
        }
    }

    fn coefficient_mut(&mut self) -> &mut Rational {
        match self {
            Term::Constant(c) | Term::Linear(c, _) => c,
        }
    }

    pub fn variable(&self) -> Option<&Variable> {
        match self {
            Term::Constant(_) => None,
            Term::Linear(_, v) => Some(v),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    /// Whether two terms merge into one: same variable, or both constants.
    fn same_identity(&self, other: &Term) -> bool {
        self.variable() == other.variable()
    }

    fn sort_key(&self) -> i64 {
        self.variable().map_or(-1, |v| i64::from(v.index))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(c) => write!(f, "{}", c),
            Term::Linear(c, v) => write!(f, "{}{}", c, v),
        }
    }
}

/// A linear expression: an ordered list of terms with at most one term per
/// variable, at most one constant, and no zero coefficients.
///
/// Every mutating method re-establishes that shape before returning.
/// Equality ignores term order.
#[derive(Debug, Clone, Default)]
pub struct Expression {
    terms: Vec<Term>,
}

impl Expression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an expression from arbitrary terms, merging duplicates.
    pub fn from_terms(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut expression = Self::new();
        expression.add_terms(terms);
        expression
    }

    pub fn constant_only(value: Rational) -> Self {
        Self::from(Term::Constant(value))
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// The constant term, zero when absent.
    pub fn constant(&self) -> Rational {
        self.terms
            .iter()
            .find(|t| t.is_constant())
            .map(|t| t.coefficient().clone())
            .unwrap_or_else(Rational::zero)
    }

    pub fn coefficient(&self, variable: &Variable) -> Option<&Rational> {
        self.terms
            .iter()
            .find(|t| t.variable() == Some(variable))
            .map(Term::coefficient)
    }

    pub fn contains(&self, variable: &Variable) -> bool {
        self.coefficient(variable).is_some()
    }

    pub fn linear_terms(&self) -> impl Iterator<Item = (&Rational, &Variable)> {
        self.terms.iter().filter_map(|t| match t {
            Term::Linear(c, v) => Some((c, v)),
            Term::Constant(_) => None,
        })
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.terms.iter().filter_map(Term::variable)
    }

    /// Merge one term in, dropping the result if its coefficient becomes zero.
    pub fn add_term(&mut self, term: Term) {
        match self.terms.iter().position(|t| t.same_identity(&term)) {
            Some(i) => {
                *self.terms[i].coefficient_mut() += term.coefficient();
                if self.terms[i].coefficient().is_zero() {
                    self.terms.remove(i);
                }
            }
            None => {
                if !term.coefficient().is_zero() {
                    self.terms.push(term);
                }
            }
        }
        debug_assert!(self.is_merged(), "expression lost its merged shape: {:?}", self.terms);
    }

    pub fn add_terms(&mut self, terms: impl IntoIterator<Item = Term>) {
        for term in terms {
            self.add_term(term);
        }
    }

    /// `self += factor * other`
    pub fn add_scaled(&mut self, other: &Expression, factor: &Rational) {
        for term in &other.terms {
            self.add_term(term.scaled(factor));
        }
    }

    pub fn scale(&mut self, factor: &Rational) {
        if factor.is_zero() {
            self.terms.clear();
            return;
        }
        for term in &mut self.terms {
            *term.coefficient_mut() *= factor;
        }
    }

    pub fn scaled(&self, factor: &Rational) -> Expression {
        let mut result = self.clone();
        result.scale(factor);
        result
    }

    /// Remove the term of `variable`, returning its coefficient.
    pub fn remove(&mut self, variable: &Variable) -> Option<Rational> {
        let i = self.terms.iter().position(|t| t.variable() == Some(variable))?;
        Some(self.terms.remove(i).coefficient().clone())
    }

    /// Remove the constant term, returning it (zero when absent).
    pub fn remove_constant(&mut self) -> Rational {
        match self.terms.iter().position(Term::is_constant) {
            Some(i) => self.terms.remove(i).coefficient().clone(),
            None => Rational::zero(),
        }
    }

    /// Replace every occurrence of `variable` by `replacement`, scaled by the
    /// variable's coefficient. Returns whether anything was replaced.
    pub fn substitute(&mut self, variable: &Variable, replacement: &Expression) -> bool {
        match self.remove(variable) {
            Some(coefficient) => {
                self.add_scaled(replacement, &coefficient);
                true
            }
            None => false,
        }
    }

    /// Value of the expression given a value for each variable.
    pub fn evaluate(&self, mut value_of: impl FnMut(&Variable) -> Rational) -> Rational {
        self.terms
            .iter()
            .map(|t| match t {
                Term::Constant(c) => c.clone(),
                Term::Linear(c, v) => c * &value_of(v),
            })
            .sum()
    }

    /// At most one term per variable identity and no zero coefficients.
    pub fn is_merged(&self) -> bool {
        self.terms.iter().enumerate().all(|(i, t)| {
            !t.coefficient().is_zero() && self.terms[i + 1..].iter().all(|other| !other.same_identity(t))
        })
    }
}

impl Term {
    fn scaled(&self, factor: &Rational) -> Term {
        match self {
            Term::Constant(c) => Term::Constant(c * factor),
            Term::Linear(c, v) => Term::Linear(c * factor, v.clone()),
        }
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.terms.len() == other.terms.len() && self.terms.iter().all(|t| other.terms.contains(t))
    }
}

impl Eq for Expression {}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Self::from_terms([term])
    }
}

impl FromIterator<Term> for Expression {
    fn from_iter<I: IntoIterator<Item = Term>>(iter: I) -> Self {
        Self::from_terms(iter)
    }
}

/// Constant first, then by variable index; an empty expression reads `0`.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        let mut ordered: Vec<&Term> = self.terms.iter().collect();
        ordered.sort_by_key(|t| t.sort_key());
        let rendered: Vec<String> = ordered.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", rendered.join(" "))
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    #[cfg_attr(feature = "serde", serde(rename = "<", alias = "lessThan"))]
    Less,
    #[cfg_attr(feature = "serde", serde(rename = "<=", alias = "lessThanOrEqual"))]
    LessOrEqual,
    #[cfg_attr(feature = "serde", serde(rename = "=", alias = "equal"))]
    Equal,
    #[cfg_attr(feature = "serde", serde(rename = ">=", alias = "greaterThanOrEqual"))]
    GreaterOrEqual,
    #[cfg_attr(feature = "serde", serde(rename = ">", alias = "greaterThan"))]
    Greater,
}

impl Relation {
    /// The relation after multiplying both sides by a negative number, which
    /// is also the relation after swapping the sides.
    pub fn mirrored(self) -> Self {
        match self {
            Relation::Less => Relation::Greater,
            Relation::LessOrEqual => Relation::GreaterOrEqual,
            Relation::Equal => Relation::Equal,
            Relation::GreaterOrEqual => Relation::LessOrEqual,
            Relation::Greater => Relation::Less,
        }
    }

    pub fn is_strict(self) -> bool {
        matches!(self, Relation::Less | Relation::Greater)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Less => "<",
            Relation::LessOrEqual => "<=",
            Relation::Equal => "=",
            Relation::GreaterOrEqual => ">=",
            Relation::Greater => ">",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// `left relation right`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Equation {
    pub left: Expression,
    pub relation: Relation,
    pub right: Expression,
}

impl Equation {
    pub fn new(left: Expression, relation: Relation, right: Expression) -> Self {
        Self { left, relation, right }
    }

    /// Multiply both sides by a non-zero factor; a negative factor mirrors the relation.
    pub fn multiply(&mut self, factor: &Rational) {
        debug_assert!(!factor.is_zero(), "multiplying an equation by zero");
        self.left.scale(factor);
        self.right.scale(factor);
        if factor.is_negative() {
            self.relation = self.relation.mirrored();
        }
    }

    pub fn add_to_left(&mut self, terms: impl IntoIterator<Item = Term>) {
        self.left.add_terms(terms);
    }

    pub fn add_to_right(&mut self, terms: impl IntoIterator<Item = Term>) {
        self.right.add_terms(terms);
    }

    /// Add the same terms to both sides.
    pub fn add(&mut self, terms: impl IntoIterator<Item = Term>) {
        let terms: Vec<Term> = terms.into_iter().collect();
        self.add_to_left(terms.iter().cloned());
        self.add_to_right(terms);
    }

    pub fn swap_sides(&mut self) {
        std::mem::swap(&mut self.left, &mut self.right);
        self.relation = self.relation.mirrored();
    }

    pub fn substitute(&mut self, variable: &Variable, replacement: &Expression) {
        self.left.substitute(variable, replacement);
        self.right.substitute(variable, replacement);
    }

    /// Move every variable term to the left and every constant to the right.
    pub fn normalize(&mut self) {
        let moved_left: Vec<Term> = self.right.terms().iter().filter(|t| !t.is_constant()).cloned().collect();
        let left_constant = self.left.constant();
        self.add(moved_left.iter().map(|t| t.scaled(&-Rational::one())));
        self.add([Term::Constant(-left_constant)]);
    }

    /// Rewrite the equation as `variable = ...`, with everything else on the
    /// right. Returns `false`, leaving the equation untouched, if the
    /// variable does not occur.
    pub fn solve_for(&mut self, variable: &Variable) -> bool {
        let mut rest = self.right.clone();
        rest.add_scaled(&self.left, &-Rational::one());
        // 0 = rest, where rest = c * variable + remainder
        let Some(coefficient) = rest.remove(variable) else {
            return false;
        };
        rest.scale(&(-Rational::one() / coefficient));
        self.left = Expression::from(Term::linear(Rational::one(), variable.clone()));
        self.right = rest;
        true
    }

    /// The variable isolated on the left of a dictionary row (`v = ...`).
    pub fn basic_variable(&self) -> Option<&Variable> {
        match self.left.terms() {
            [Term::Linear(c, v)] if c.is_one() => Some(v),
            _ => None,
        }
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.left.variables().chain(self.right.variables())
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.relation, self.right)
    }
}
