use axum::{
    extract::{Query, State},
    Json,
};
use models::{Item, ItemField, RecordField};
use serde::{Deserialize, Serialize};
use service::{Pagination, SearchCriteria, ServiceError};

use crate::{errors::JsonApiError, state::AppState};

#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ItemSearchQuery {
    /// Substring of the name or description.
    pub q: Option<String>,
    /// Exact tag.
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Field name, `name` when absent; prefix with `-` for descending order.
    pub sort_by: Option<String>,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchFilters {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: String,
}

#[derive(Debug, Serialize)]
pub struct ItemSearchResponse {
    pub query: Option<String>,
    pub filters: SearchFilters,
    pub results: Vec<Item>,
    pub total: usize,
}

pub const DEFAULT_SORT: &str = "name";

impl ItemSearchQuery {
    pub fn effective_sort(&self) -> &str {
        self.sort_by.as_deref().unwrap_or(DEFAULT_SORT)
    }

    /// Build the item criteria; an unknown sort field is an invalid query.
    pub fn to_criteria(&self) -> Result<SearchCriteria<ItemField>, ServiceError> {
        let mut criteria = SearchCriteria::new();
        if let Some(q) = &self.q {
            criteria = criteria.text(q.clone(), [ItemField::Name, ItemField::Description]);
        }
        if let Some(category) = &self.category {
            criteria = criteria.equals(ItemField::Tags, category.as_str());
        }
        if self.min_price.is_some() || self.max_price.is_some() {
            criteria = criteria.range(ItemField::Price, self.min_price, self.max_price);
        }
        let sort_by = self.effective_sort();
        let (name, descending) = match sort_by.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (sort_by, false),
        };
        let field = ItemField::from_name(name)
            .ok_or_else(|| ServiceError::invalid_query(format!("unknown sort field `{name}`")))?;
        criteria = criteria.sort_by(field, descending);
        if let Some(page) = Pagination::optional(self.skip, self.limit) {
            criteria = criteria.paginate(page);
        }
        Ok(criteria)
    }
}

#[utoipa::path(
    get, path = "/search", tag = "search",
    params(ItemSearchQuery),
    responses((status = 200, description = "Search OK"), (status = 400, description = "Invalid Query"))
)]
pub async fn search_items(
    State(state): State<AppState>,
    Query(q): Query<ItemSearchQuery>,
) -> Result<Json<ItemSearchResponse>, JsonApiError> {
    let outcome = state.registry.items.search(q.to_criteria()?)?;
    let sort_by = q.effective_sort().to_string();
    Ok(Json(ItemSearchResponse {
        query: q.q,
        filters: SearchFilters { category: q.category, min_price: q.min_price, max_price: q.max_price, sort_by },
        results: outcome.results,
        total: outcome.total,
    }))
}
