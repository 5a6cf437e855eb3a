use std::cmp::Ordering;

use serde_json::Value;

use super::error::FilterError;
use super::filter_order::compare_values;
use super::types::{Condition, FilterOp, FilterWhereInfo};
use crate::types::Document;

pub struct FilterWhere;

impl FilterWhere {
    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    /// Parse a where-object into a condition tree. Top-level keys are ANDed.
    pub fn parse(where_data: &Value) -> Result<Condition, FilterError> {
        Self::validate(where_data)?;
        let obj = match where_data {
            Value::Object(obj) => obj,
            _ => return Ok(Condition::And(vec![])),
        };

        let mut conditions = Vec::new();
        for (key, value) in obj {
            if key.starts_with('$') {
                conditions.push(Self::parse_logical_operator(key, value)?);
            } else {
                Self::validate_field(key)?;
                conditions.extend(Self::parse_field_condition(key, value)?);
            }
        }

        if conditions.len() == 1 {
            return Ok(conditions.remove(0));
        }
        Ok(Condition::And(conditions))
    }

    fn parse_logical_operator(op: &str, value: &Value) -> Result<Condition, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let parts = arr.iter().map(Self::parse).collect::<Result<Vec<_>, _>>()?;
                Ok(if op == "$and" { Condition::And(parts) } else { Condition::Or(parts) })
            }
            "$not" => Ok(Condition::Not(Box::new(Self::parse(value)?))),
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<Condition>, FilterError> {
        // { field: { "$op": v } } when every key is an operator, otherwise implicit equality
        if let Value::Object(obj) = value {
            if !obj.is_empty() && obj.keys().all(|k| k.starts_with('$')) {
                let mut out = Vec::new();
                for (op_key, op_val) in obj {
                    let operator = Self::map_operator(op_key)?;
                    Self::validate_operator_data(operator, op_val)?;
                    out.push(Condition::Field(FilterWhereInfo {
                        column: field.to_string(),
                        operator,
                        data: op_val.clone(),
                    }));
                }
                return Ok(out);
            }
        }

        Ok(vec![Condition::Field(FilterWhereInfo {
            column: field.to_string(),
            operator: FilterOp::Eq,
            data: value.clone(),
        })])
    }

    fn map_operator(op_key: &str) -> Result<FilterOp, FilterError> {
        Ok(match op_key {
            "$eq" => FilterOp::Eq,
            "$ne" | "$neq" => FilterOp::Ne,
            "$gt" => FilterOp::Gt,
            "$gte" => FilterOp::Gte,
            "$lt" => FilterOp::Lt,
            "$lte" => FilterOp::Lte,
            "$in" => FilterOp::In,
            "$nin" => FilterOp::NIn,
            "$exists" => FilterOp::Exists,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn validate_operator_data(operator: FilterOp, data: &Value) -> Result<(), FilterError> {
        match operator {
            FilterOp::In | FilterOp::NIn if !data.is_array() => Err(FilterError::InvalidOperatorData(
                "$in/$nin require an array".to_string(),
            )),
            FilterOp::Exists if !data.is_boolean() => Err(FilterError::InvalidOperatorData(
                "$exists requires a boolean".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_field(field: &str) -> Result<(), FilterError> {
        if field.is_empty() || field.split('.').any(str::is_empty) {
            return Err(FilterError::InvalidField(format!("Invalid field path: {:?}", field)));
        }
        Ok(())
    }
}

impl Condition {
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Condition::Field(info) => field_matches(info, lookup(doc, &info.column)),
            Condition::And(parts) => parts.iter().all(|c| c.matches(doc)),
            Condition::Or(parts) => parts.iter().any(|c| c.matches(doc)),
            Condition::Not(inner) => !inner.matches(doc),
        }
    }
}

/// Resolve a dotted path ("a.b.c") through nested objects
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Value> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}

fn field_matches(info: &FilterWhereInfo, actual: Option<&Value>) -> bool {
    match info.operator {
        FilterOp::Eq => actual.map_or(false, |v| equals_or_contains(v, &info.data)),
        FilterOp::Ne => !actual.map_or(false, |v| equals_or_contains(v, &info.data)),
        FilterOp::Gt => ordered(actual, &info.data, |o| o == Ordering::Greater),
        FilterOp::Gte => ordered(actual, &info.data, |o| o != Ordering::Less),
        FilterOp::Lt => ordered(actual, &info.data, |o| o == Ordering::Less),
        FilterOp::Lte => ordered(actual, &info.data, |o| o != Ordering::Greater),
        FilterOp::In => in_list(actual, &info.data),
        FilterOp::NIn => !in_list(actual, &info.data),
        FilterOp::Exists => actual.is_some() == info.data.as_bool().unwrap_or(true),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    compare_values(Some(a), Some(b)) == Ordering::Equal
}

// Array fields match a scalar query when any element matches
fn equals_or_contains(actual: &Value, expected: &Value) -> bool {
    if values_equal(actual, expected) {
        return true;
    }
    match (actual, expected) {
        (Value::Array(items), other) if !other.is_array() => items.iter().any(|i| values_equal(i, other)),
        _ => false,
    }
}

// Range operators only compare numbers with numbers and strings with strings
fn ordered(actual: Option<&Value>, bound: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    match (actual, bound) {
        (Some(a @ Value::Number(_)), Value::Number(_)) | (Some(a @ Value::String(_)), Value::String(_)) => {
            accept(compare_values(Some(a), Some(bound)))
        }
        _ => false,
    }
}

fn in_list(actual: Option<&Value>, list: &Value) -> bool {
    match (actual, list.as_array()) {
        (Some(v), Some(items)) => items.iter().any(|item| equals_or_contains(v, item)),
        _ => false,
    }
}
