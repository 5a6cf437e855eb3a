use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{Condition, FilterData, FilterOrderInfo};
use crate::types::Document;

/// Compiled query: a where-tree and sort keys, evaluated in memory against
/// the datastore's documents.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    where_data: Option<Condition>,
    order_data: Vec<FilterOrderInfo>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: FilterData) -> Result<Self, FilterError> {
        let mut filter = Self::new();
        filter.assign(data)?;
        Ok(filter)
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = data.order { self.order(order)?; }
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        self.where_data = Some(FilterWhere::parse(&conditions)?);
        Ok(self)
    }

    pub fn order(&mut self, order_spec: Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(&order_spec)?;
        Ok(self)
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.where_data.as_ref().map_or(true, |c| c.matches(doc))
    }

    /// Select then sort. Returns owned copies so callers never hold
    /// references into the store.
    pub fn apply<'a>(&self, docs: impl IntoIterator<Item = &'a Document>) -> Vec<Document> {
        let mut out: Vec<Document> = docs.into_iter().filter(|d| self.matches(d)).cloned().collect();
        FilterOrder::sort(&mut out, &self.order_data);
        out
    }
}
