/// WHERE-clause compiler and evaluator
///
/// The accepted grammar is deliberately flat: the clause is a list of
/// conjunction terms separated by the literal ` AND `, each of which is a list
/// of disjunction terms separated by the literal ` OR `, each of which is a
/// single `<column> <op> <value>` comparison. Parentheses are deleted before a
/// comparison is read, so they never group anything. Operators are found by
/// substring search in the order `!=`, `=`, `>`, `<`; there is no `>=`/`<=`.
use crate::schema::TableSchema;
use crate::text::unquote;
use std::cmp::Ordering;
use std::fmt;

/// Comparison operators, listed in detection priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Ne, // !=
    Eq, // =
    Gt, // >
    Lt, // <
}

impl ComparisonOp {
    /// Detection order. `!=` must precede `=`.
    const SEARCH_ORDER: [ComparisonOp; 4] = [
        ComparisonOp::Ne,
        ComparisonOp::Eq,
        ComparisonOp::Gt,
        ComparisonOp::Lt,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Ne => "!=",
            ComparisonOp::Eq => "=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Lt => "<",
        }
    }

    /// Applies the operator to a stored field and a literal, both already
    /// unquoted. `>`/`<` compare numerically when both sides parse as
    /// integers and fall back to byte-wise string order otherwise.
    pub fn apply(self, field: &str, literal: &str) -> bool {
        match self {
            ComparisonOp::Eq => field == literal,
            ComparisonOp::Ne => field != literal,
            ComparisonOp::Gt => compare_values(field, literal) == Ordering::Greater,
            ComparisonOp::Lt => compare_values(field, literal) == Ordering::Less,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

fn compare_values(left: &str, right: &str) -> Ordering {
    match (left.parse::<i64>(), right.parse::<i64>()) {
        (Ok(l), Ok(r)) => l.cmp(&r),
        _ => left.cmp(right),
    }
}

/// One `<column> <op> <value>` term. The value has its quotes stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub column: String,
    pub op: ComparisonOp,
    pub value: String,
}

impl Comparison {
    /// Reads a single disjunction term. Returns `None` when no operator is
    /// present.
    pub fn parse(term: &str) -> Option<Self> {
        let cleaned: String = term.chars().filter(|c| *c != '(' && *c != ')').collect();
        let cleaned = cleaned.trim();

        let (op, position) = ComparisonOp::SEARCH_ORDER
            .iter()
            .find_map(|op| cleaned.find(op.symbol()).map(|pos| (*op, pos)))?;

        let column = cleaned[..position].trim();
        let value = cleaned[position + op.symbol().len()..].trim();

        Some(Self {
            column: column.to_string(),
            op,
            value: unquote(value).to_string(),
        })
    }
}

/// A compiled WHERE clause: an AND over groups, each group an OR over terms.
///
/// A term without an operator is kept as `None` and never matches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Condition {
    groups: Vec<Vec<Option<Comparison>>>,
}

impl Condition {
    /// Compiles a WHERE clause. Only the empty string matches every record;
    /// a blank clause is a single term without an operator.
    pub fn parse(clause: &str) -> Self {
        if clause.is_empty() {
            return Self::always();
        }

        let groups = clause
            .split(" AND ")
            .map(|conjunct| {
                conjunct
                    .split(" OR ")
                    .map(|term| {
                        let comparison = Comparison::parse(term);
                        if comparison.is_none() {
                            tracing::trace!(term = term.trim(), "WHERE term has no operator");
                        }
                        comparison
                    })
                    .collect()
            })
            .collect();

        Self { groups }
    }

    /// The condition that accepts every record.
    pub fn always() -> Self {
        Self { groups: Vec::new() }
    }

    /// Whether the condition has no terms at all.
    pub fn is_unconditional(&self) -> bool {
        self.groups.is_empty()
    }

    /// Resolves column names against `schema` so the result can be evaluated
    /// per record without further lookups.
    pub fn bind(&self, schema: &TableSchema) -> Predicate {
        let groups = self
            .groups
            .iter()
            .map(|group| {
                group
                    .iter()
                    .map(|term| {
                        term.as_ref().and_then(|cmp| {
                            schema.column_index(&cmp.column).map(|index| BoundComparison {
                                index,
                                op: cmp.op,
                                value: cmp.value.clone(),
                            })
                        })
                    })
                    .collect()
            })
            .collect();

        Predicate { groups }
    }
}

#[derive(Debug, Clone)]
struct BoundComparison {
    index: usize,
    op: ComparisonOp,
    value: String,
}

/// A [`Condition`] bound to one table's column positions.
#[derive(Debug, Clone)]
pub struct Predicate {
    groups: Vec<Vec<Option<BoundComparison>>>,
}

impl Predicate {
    /// Evaluates the predicate against one record.
    ///
    /// Terms naming an unknown column, or a field past the end of a short
    /// record, evaluate to false.
    pub fn matches(&self, record: &[String]) -> bool {
        self.groups.iter().all(|group| {
            group.iter().any(|term| match term {
                Some(cmp) => record
                    .get(cmp.index)
                    .is_some_and(|field| cmp.op.apply(unquote(field), &cmp.value)),
                None => false,
            })
        })
    }
}
