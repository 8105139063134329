/// Query plan
///
/// The compiled, immutable form of one query: an optional projection, an
/// optional WHERE chain, an optional ordering and an optional limit.
use super::binder::{BindMode, Binder};
use super::clause::{Clauses, OrderBy};
use super::composer::ConditionChain;
use crate::error::Result;
use crate::value::Value;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct QueryPlan {
    pub projection: Option<Vec<String>>,
    pub predicate: Option<ConditionChain>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl QueryPlan {
    /// Compile query text and its positional parameters into a plan.
    ///
    /// In [`BindMode::Permissive`] this never fails.
    pub fn compile(query: &str, params: &[Value], mode: BindMode) -> Result<Self> {
        let clauses = Clauses::parse(query);

        let mut binder = Binder::new(params, mode);
        let predicate = clauses
            .where_clause
            .as_ref()
            .map(|clause| binder.bind_where(clause))
            .transpose()?;
        let bound = binder.consumed();
        binder.finish()?;

        let plan = QueryPlan {
            projection: clauses.select,
            predicate,
            order_by: clauses.order_by,
            limit: clauses.limit,
        };
        debug!(plan = %plan, placeholders = bound, params = params.len(), "compiled query");
        Ok(plan)
    }

    /// Whether executing the plan leaves its input unchanged
    pub fn is_identity(&self) -> bool {
        self.projection.is_none()
            && self.predicate.is_none()
            && self.order_by.is_none()
            && self.limit.is_none()
    }
}

impl fmt::Display for QueryPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.projection {
            Some(fields) => write!(f, "SELECT {}", fields.join(", "))?,
            None => write!(f, "SELECT *")?,
        }
        if let Some(predicate) = &self.predicate {
            write!(f, " WHERE {}", predicate)?;
        }
        if let Some(order) = &self.order_by {
            write!(f, " ORDER BY {} {}", order.field, order.direction)?;
        }
        if let Some(limit) = self.limit {
            write!(f, " LIMIT {}", limit)?;
        }
        Ok(())
    }
}
