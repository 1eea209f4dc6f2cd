/*!
# Storage applier

Interprets the storage-independent [`Predicate`]s and [`SortInstruction`]
produced by the translator as sea-orm conditions and orderings.

Search predicates compile to `UPPER(column) LIKE '%TERM%' ESCAPE '\'`, so
the escaped `\`, `%` and `_` of a search term only ever match literally.
Related searches compile to a correlated `EXISTS` subquery.
*/

use sea_orm::{
    ColumnTrait, ColumnType, Condition, EntityTrait, IdenStatic, Order, QueryFilter, QueryOrder,
    Select, Value,
    sea_query::{Alias, Expr, Func, LikeExpr, Query, SimpleExpr},
};

use crate::config::SortDirection;
use crate::filtering::{FilterValue, Predicate, SortInstruction};
use crate::translator::TranslationResult;

const LIKE_ESCAPE: char = '\\';

/// A table reachable from a resource through a foreign key, for
/// `relation.column` searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedTable {
    /// Name used in searchable fields (`category` in `category.name`)
    pub relation: &'static str,
    pub table: &'static str,
    /// Column on `table` referenced by `parent_key`
    pub related_key: &'static str,
    /// Foreign-key column on the resource's own table
    pub parent_key: &'static str,
}

/// The columns and relations a resource exposes to list queries
#[derive(Debug, Clone)]
pub struct ColumnCatalog<C> {
    table: &'static str,
    columns: Vec<(&'static str, C)>,
    relations: Vec<RelatedTable>,
}

impl<C> ColumnCatalog<C>
where
    C: ColumnTrait + Copy,
{
    #[must_use]
    pub const fn new(
        table: &'static str,
        columns: Vec<(&'static str, C)>,
        relations: Vec<RelatedTable>,
    ) -> Self {
        Self {
            table,
            columns,
            relations,
        }
    }

    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<C> {
        self.columns
            .iter()
            .find(|(column_name, _)| *column_name == name)
            .map(|(_, column)| *column)
    }

    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&RelatedTable> {
        self.relations.iter().find(|related| related.relation == name)
    }

    fn resolve(&self, field: &str) -> ResolvedColumn {
        let qualified = |column| Expr::col((Alias::new(self.table), column));
        match self.column(field) {
            Some(column) => ResolvedColumn {
                expr: qualified(Alias::new(column.as_str())),
                kind: ColumnKind::of(column.def().get_column_type()),
            },
            None => ResolvedColumn {
                expr: qualified(Alias::new(field)),
                kind: ColumnKind::Inferred,
            },
        }
    }
}

/// How filter values are bound for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
    /// Column not in the catalog; numeric-looking text binds as a number
    Inferred,
}

impl ColumnKind {
    fn of(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => Self::Integer,
            ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_) | ColumnType::Money(_) => {
                Self::Float
            }
            ColumnType::Boolean => Self::Boolean,
            _ => Self::Text,
        }
    }

    fn bind(self, value: &FilterValue) -> Value {
        match (self, value) {
            (_, FilterValue::Date(date)) => Value::from(*date),
            (Self::Integer | Self::Inferred, FilterValue::Text(text)) => text
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .or_else(|_| text.trim().parse::<f64>().map(Value::from))
                .unwrap_or_else(|_| Value::from(text.clone())),
            (Self::Float, FilterValue::Text(text)) => text
                .trim()
                .parse::<f64>()
                .map_or_else(|_| Value::from(text.clone()), Value::from),
            (Self::Boolean, FilterValue::Integer(i)) => Value::from(*i != 0),
            (Self::Boolean, FilterValue::Bool(flag)) => Value::from(*flag),
            (Self::Text, FilterValue::Bool(flag)) => Value::from(if *flag { "1" } else { "0" }),
            (_, FilterValue::Bool(flag)) => Value::from(i64::from(*flag)),
            (_, FilterValue::Text(text)) => Value::from(text.clone()),
            (_, FilterValue::Integer(i)) => Value::from(*i),
            (_, FilterValue::Float(x)) => Value::from(*x),
        }
    }
}

struct ResolvedColumn {
    expr: Expr,
    kind: ColumnKind,
}

impl ResolvedColumn {
    /// The column itself, or `DATE(column)` when compared with a date
    fn operand(self, value: &FilterValue) -> (Expr, ColumnKind) {
        if matches!(value, FilterValue::Date(_)) {
            let date = Func::cust(Alias::new("DATE")).arg(self.expr);
            (Expr::expr(date), self.kind)
        } else {
            (self.expr, self.kind)
        }
    }
}

/// Build the `WHERE` condition for a list of predicates (AND-ed).
#[must_use]
pub fn build_condition<C>(predicates: &[Predicate], catalog: &ColumnCatalog<C>) -> Condition
where
    C: ColumnTrait + Copy,
{
    predicates
        .iter()
        .filter_map(|predicate| predicate_condition(predicate, catalog))
        .fold(Condition::all(), Condition::add)
}

fn predicate_condition<C>(predicate: &Predicate, catalog: &ColumnCatalog<C>) -> Option<Condition>
where
    C: ColumnTrait + Copy,
{
    if let Predicate::Any(children) = predicate {
        let alternatives: Vec<Condition> = children
            .iter()
            .filter_map(|child| predicate_condition(child, catalog))
            .collect();
        if alternatives.is_empty() {
            // Nothing resolvable to match against: the group matches no rows
            return Some(Condition::all().add(Expr::val(1).eq(0)));
        }
        return Some(alternatives.into_iter().fold(Condition::any(), Condition::add));
    }

    predicate_expr(predicate, catalog).map(|expr| Condition::all().add(expr))
}

fn predicate_expr<C>(predicate: &Predicate, catalog: &ColumnCatalog<C>) -> Option<SimpleExpr>
where
    C: ColumnTrait + Copy,
{
    let expr = match predicate {
        Predicate::Equals { field, value } => {
            let (column, kind) = catalog.resolve(field).operand(value);
            column.eq(kind.bind(value))
        }
        Predicate::GreaterEq { field, value } => {
            let (column, kind) = catalog.resolve(field).operand(value);
            column.gte(kind.bind(value))
        }
        Predicate::LessEq { field, value } => {
            let (column, kind) = catalog.resolve(field).operand(value);
            column.lte(kind.bind(value))
        }
        Predicate::Between { field, min, max } => {
            let (column, kind) = catalog.resolve(field).operand(min);
            column.between(kind.bind(min), kind.bind(max))
        }
        Predicate::In { field, values } => {
            let resolved = catalog.resolve(field);
            let kind = resolved.kind;
            resolved
                .expr
                .is_in(values.iter().map(|value| kind.bind(value)))
        }
        Predicate::IsNull { field } => catalog.resolve(field).expr.is_null(),
        Predicate::IsNotNull { field } => catalog.resolve(field).expr.is_not_null(),
        Predicate::Contains { field, term } => contains(catalog.resolve(field).expr, term),
        Predicate::RelatedContains {
            relation,
            field,
            term,
        } => {
            let Some(related) = catalog.relation(relation) else {
                tracing::debug!(relation = %relation, "Skipping search on undeclared relation");
                return None;
            };
            related_contains(catalog.table(), related, field, term)
        }
        Predicate::Any(_) => return None,
    };
    Some(expr)
}

/// `UPPER(column) LIKE '%TERM%' ESCAPE '\'` for an already-escaped term
fn contains(column: Expr, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", term.to_uppercase());
    Expr::expr(Func::upper(column)).like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
}

/// `EXISTS (SELECT 1 FROM related WHERE related.key = parent.fk AND <contains>)`
fn related_contains(
    parent_table: &'static str,
    related: &RelatedTable,
    field: &str,
    term: &str,
) -> SimpleExpr {
    let mut subquery = Query::select();
    subquery
        .expr(Expr::val(1))
        .from(Alias::new(related.table))
        .and_where(
            Expr::col((Alias::new(related.table), Alias::new(related.related_key)))
                .equals((Alias::new(parent_table), Alias::new(related.parent_key))),
        )
        .and_where(contains(
            Expr::col((Alias::new(related.table), Alias::new(field))),
            term,
        ));
    Expr::exists(subquery)
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

/// The ordering a select will actually use.
///
/// Columns on related tables (`relation.column`) and columns the catalog does
/// not know fall back to `default_column`; the direction is kept.
#[must_use]
pub fn effective_sort<C>(
    sort: &SortInstruction,
    default_column: &str,
    catalog: &ColumnCatalog<C>,
) -> SortInstruction
where
    C: ColumnTrait + Copy,
{
    if catalog.column(&sort.column).is_some() {
        return sort.clone();
    }

    tracing::debug!(
        column = %sort.column,
        fallback = %default_column,
        "Sort column not available on table, using default"
    );
    SortInstruction {
        column: default_column.to_string(),
        direction: sort.direction,
    }
}

/// Resolve the sort column to an expression, after [`effective_sort`]
#[must_use]
pub fn order_expr<C>(
    sort: &SortInstruction,
    default_column: &str,
    catalog: &ColumnCatalog<C>,
) -> SimpleExpr
where
    C: ColumnTrait + Copy,
{
    let sort = effective_sort(sort, default_column, catalog);
    catalog.resolve(&sort.column).expr.into()
}

/// Apply predicates and ordering of a translation to a select.
///
/// Returns the select together with the ordering it applies, which differs
/// from `query.sort` when the requested column is not on the table.
/// Pagination is left to the caller.
#[must_use]
pub fn apply_to_select<E, C>(
    select: Select<E>,
    query: &TranslationResult,
    default_sort_column: &str,
    catalog: &ColumnCatalog<C>,
) -> (Select<E>, SortInstruction)
where
    E: EntityTrait,
    C: ColumnTrait + Copy,
{
    let sort = effective_sort(&query.sort, default_sort_column, catalog);
    let select = select
        .filter(build_condition(&query.predicates, catalog))
        .order_by(
            SimpleExpr::from(catalog.resolve(&sort.column).expr),
            Order::from(sort.direction),
        );
    (select, sort)
}
