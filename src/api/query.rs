//! List endpoint query parameters
//!
//! Shared limit/offset pagination, whitelist-validated ordering, and the
//! per-endpoint filter sets. The structs stay flat: query-string
//! deserialization does not compose through nested/flattened structs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::repositories::ListParams;
use crate::database::GoalFilters;
use crate::utils::errors::{GoalboardError, Result};

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

/// Common list parameters accepted by every list endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub ordering: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    /// Validate against the endpoint's ordering whitelist and produce
    /// repository-level parameters.
    pub fn into_params(self, allowed: &[&str], default_order: &str) -> Result<ListParams> {
        let order_sql = order_clause(self.ordering.as_deref(), allowed, default_order)?;

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = self.offset.unwrap_or(0).max(0);

        Ok(ListParams {
            limit,
            offset,
            order_sql,
            search: self.search.filter(|s| !s.is_empty()),
        })
    }
}

/// Translate an `ordering` parameter (`title`, `-created`, ...) into an
/// ORDER BY fragment. Only whitelisted field names pass; anything else
/// is a validation error, never SQL.
pub fn order_clause(ordering: Option<&str>, allowed: &[&str], default: &str) -> Result<String> {
    let ordering = match ordering {
        None | Some("") => default,
        Some(o) => o,
    };

    let (field, direction) = match ordering.strip_prefix('-') {
        Some(field) => (field, "DESC"),
        None => (ordering, "ASC"),
    };

    if !allowed.contains(&field) {
        return Err(GoalboardError::Validation(format!(
            "cannot order by '{field}'"
        )));
    }

    Ok(format!("{field} {direction}"))
}

/// Paginated response envelope
#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub count: i64,
    pub results: Vec<T>,
}

/// Category list accepts an optional board filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub ordering: Option<String>,
    pub search: Option<String>,
    pub board: Option<i64>,
}

impl CategoryListQuery {
    pub fn list(&self) -> ListQuery {
        ListQuery {
            limit: self.limit,
            offset: self.offset,
            ordering: self.ordering.clone(),
            search: self.search.clone(),
        }
    }
}

/// Comment list is always scoped to one goal
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub ordering: Option<String>,
    pub goal: Option<i64>,
}

impl CommentListQuery {
    pub fn list(&self) -> ListQuery {
        ListQuery {
            limit: self.limit,
            offset: self.offset,
            ordering: self.ordering.clone(),
            search: None,
        }
    }

    pub fn goal_id(&self) -> Result<i64> {
        self.goal
            .ok_or_else(|| GoalboardError::Validation("goal parameter is required".to_string()))
    }
}

/// Goal list filters: category/priority membership and a due-date range
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub ordering: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due_date_gte: Option<NaiveDate>,
    pub due_date_lte: Option<NaiveDate>,
}

impl GoalListQuery {
    pub fn list(&self) -> ListQuery {
        ListQuery {
            limit: self.limit,
            offset: self.offset,
            ordering: self.ordering.clone(),
            search: self.search.clone(),
        }
    }

    pub fn filters(&self) -> Result<GoalFilters> {
        let categories = self.category.as_deref().map(parse_id_list).transpose()?;
        let priorities = self.priority.as_deref().map(parse_priority_list).transpose()?;

        Ok(GoalFilters {
            categories,
            priorities,
            due_date_gte: self.due_date_gte,
            due_date_lte: self.due_date_lte,
        })
    }
}

/// Parse a comma-separated id list
fn parse_id_list(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| GoalboardError::Validation(format!("invalid id: '{part}'")))
        })
        .collect()
}

/// Parse a comma-separated priority list (1 = low .. 4 = critical)
fn parse_priority_list(raw: &str) -> Result<Vec<i16>> {
    raw.split(',')
        .map(|part| {
            let value = part
                .trim()
                .parse::<i16>()
                .map_err(|_| GoalboardError::Validation(format!("invalid priority: '{part}'")))?;
            if !(1..=4).contains(&value) {
                return Err(GoalboardError::Validation(format!(
                    "invalid priority: '{part}'"
                )));
            }
            Ok(value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALLOWED: &[&str] = &["title", "created"];

    #[test]
    fn test_order_clause_whitelist() {
        assert_eq!(order_clause(Some("title"), ALLOWED, "title ASC").unwrap(), "title ASC");
        assert_eq!(
            order_clause(Some("-created"), ALLOWED, "title ASC").unwrap(),
            "created DESC"
        );
        assert!(order_clause(Some("password_hash"), ALLOWED, "title ASC").is_err());
        assert!(order_clause(Some("title; DROP TABLE users"), ALLOWED, "title ASC").is_err());
    }

    #[test]
    fn test_order_clause_default() {
        assert_eq!(order_clause(None, ALLOWED, "created DESC").unwrap(), "created DESC");
        assert_eq!(order_clause(Some(""), ALLOWED, "created DESC").unwrap(), "created DESC");
    }

    #[test]
    fn test_limit_clamping() {
        let params = ListQuery {
            limit: Some(10_000),
            offset: Some(-5),
            ordering: None,
            search: None,
        }
        .into_params(ALLOWED, "title ASC")
        .unwrap();

        assert_eq!(params.limit, 500);
        assert_eq!(params.offset, 0);
    }

    #[test]
    fn test_id_list_parsing() {
        assert_eq!(parse_id_list("1, 2,3").unwrap(), vec![1, 2, 3]);
        assert!(parse_id_list("1,x").is_err());
    }

    #[test]
    fn test_priority_list_parsing() {
        assert_eq!(parse_priority_list("1,4").unwrap(), vec![1, 4]);
        assert!(parse_priority_list("0").is_err());
        assert!(parse_priority_list("5").is_err());
    }

    #[test]
    fn test_goal_filters() {
        let query = GoalListQuery {
            category: Some("7,8".to_string()),
            priority: Some("3".to_string()),
            ..Default::default()
        };

        let filters = query.filters().unwrap();
        assert_eq!(filters.categories, Some(vec![7, 8]));
        assert_eq!(filters.priorities, Some(vec![3]));
    }

    #[test]
    fn test_comment_query_requires_goal() {
        let query = CommentListQuery::default();
        assert!(query.goal_id().is_err());
    }
}
