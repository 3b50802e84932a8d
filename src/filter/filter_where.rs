use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::str::FromStr;

use super::error::FilterError;
use super::types::{FilterCondition, FilterOp, FilterWhereInfo};

pub struct FilterWhere;

impl FilterWhere {
    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause("WHERE must be an object".to_string())),
        }
    }

    /// Parse a `where` value into a condition tree. `null` matches everything.
    pub fn parse(where_data: &Value) -> Result<FilterCondition, FilterError> {
        Self::validate(where_data)?;
        match where_data {
            Value::Object(obj) => Self::parse_where_data(obj),
            _ => Ok(FilterCondition::And(vec![])),
        }
    }

    fn parse_clause(value: &Value) -> Result<FilterCondition, FilterError> {
        match value {
            Value::Object(obj) => Self::parse_where_data(obj),
            _ => Err(FilterError::InvalidWhereClause("clause must be an object".to_string())),
        }
    }

    fn parse_where_data(obj: &Map<String, Value>) -> Result<FilterCondition, FilterError> {
        let mut conditions = Vec::with_capacity(obj.len());
        for (key, value) in obj {
            if key.starts_with('$') {
                conditions.push(Self::parse_logical_operator(key, value)?);
            } else {
                conditions.extend(Self::parse_field_condition(key, value)?);
            }
        }
        Ok(FilterCondition::And(conditions))
    }

    fn parse_logical_operator(op: &str, value: &Value) -> Result<FilterCondition, FilterError> {
        match op {
            "$and" | "$or" => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| FilterError::InvalidOperatorData(format!("{} requires array", op)))?;
                let clauses = arr.iter().map(Self::parse_clause).collect::<Result<Vec<_>, _>>()?;
                Ok(if op == "$and" { FilterCondition::And(clauses) } else { FilterCondition::Or(clauses) })
            }
            "$not" => Ok(FilterCondition::Not(Box::new(Self::parse_clause(value)?))),
            _ => Err(FilterError::UnsupportedOperator(op.to_string())),
        }
    }

    fn parse_field_condition(field: &str, value: &Value) -> Result<Vec<FilterCondition>, FilterError> {
        validate_column(field)?;

        // { field: { $op: arg } } unless the object carries no operators
        if let Value::Object(obj) = value {
            if !obj.is_empty() && obj.keys().all(|k| k.starts_with('$')) {
                let mut out = Vec::with_capacity(obj.len());
                for (op_key, op_val) in obj {
                    let operator = Self::map_operator(op_key)?;
                    Self::validate_operator_data(operator, op_val)?;
                    out.push(FilterCondition::Field(FilterWhereInfo {
                        column: field.to_string(),
                        operator,
                        data: op_val.clone(),
                    }));
                }
                return Ok(out);
            }
        }

        // Implicit equality: { field: value }
        Ok(vec![FilterCondition::Field(FilterWhereInfo {
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
            "$like" => FilterOp::Like,
            "$ilike" => FilterOp::ILike,
            "$in" => FilterOp::In,
            "$nin" => FilterOp::NIn,
            "$between" => FilterOp::Between,
            "$exists" => FilterOp::Exists,
            "$null" => FilterOp::Null,
            other => return Err(FilterError::UnsupportedOperator(other.to_string())),
        })
    }

    fn validate_operator_data(operator: FilterOp, data: &Value) -> Result<(), FilterError> {
        match operator {
            FilterOp::Like | FilterOp::ILike if !data.is_string() => {
                Err(FilterError::InvalidOperatorData("$like requires a string pattern".to_string()))
            }
            FilterOp::In | FilterOp::NIn if !data.is_array() => {
                Err(FilterError::InvalidOperatorData("$in requires array".to_string()))
            }
            FilterOp::Between => match data.as_array() {
                Some(values) if values.len() == 2 => Ok(()),
                _ => Err(FilterError::InvalidOperatorData("$between requires exactly 2 values".to_string())),
            },
            FilterOp::Exists | FilterOp::Null if !data.is_boolean() => {
                Err(FilterError::InvalidOperatorData("$exists and $null require a boolean".to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn matches(condition: &FilterCondition, record: &Value) -> bool {
        match condition {
            FilterCondition::And(all) => all.iter().all(|c| Self::matches(c, record)),
            FilterCondition::Or(any) => any.iter().any(|c| Self::matches(c, record)),
            FilterCondition::Not(inner) => !Self::matches(inner, record),
            FilterCondition::Field(info) => Self::matches_field(info, record.get(&info.column)),
        }
    }

    fn matches_field(info: &FilterWhereInfo, field: Option<&Value>) -> bool {
        let value = field.unwrap_or(&Value::Null);
        let data = &info.data;
        match info.operator {
            FilterOp::Eq => values_equal(value, data),
            FilterOp::Ne => !values_equal(value, data),
            FilterOp::Gt => compare_values(value, data) == Some(Ordering::Greater),
            FilterOp::Gte => matches!(compare_values(value, data), Some(Ordering::Greater | Ordering::Equal)),
            FilterOp::Lt => compare_values(value, data) == Some(Ordering::Less),
            FilterOp::Lte => matches!(compare_values(value, data), Some(Ordering::Less | Ordering::Equal)),
            FilterOp::Like | FilterOp::ILike => {
                let (Some(text), Some(pattern)) = (value_text(value), data.as_str()) else {
                    return false;
                };
                if info.operator == FilterOp::ILike {
                    like_match(&text.to_lowercase(), &pattern.to_lowercase())
                } else {
                    like_match(&text, pattern)
                }
            }
            FilterOp::In => data.as_array().is_some_and(|arr| arr.iter().any(|d| values_equal(value, d))),
            FilterOp::NIn => data.as_array().is_some_and(|arr| !arr.iter().any(|d| values_equal(value, d))),
            FilterOp::Between => match data.as_array().map(Vec::as_slice) {
                Some([low, high]) => {
                    matches!(compare_values(value, low), Some(Ordering::Greater | Ordering::Equal))
                        && matches!(compare_values(value, high), Some(Ordering::Less | Ordering::Equal))
                }
                _ => false,
            },
            FilterOp::Exists => field.is_some() == data.as_bool().unwrap_or(true),
            FilterOp::Null => value.is_null() == data.as_bool().unwrap_or(true),
        }
    }
}

pub(crate) fn validate_column(column: &str) -> Result<(), FilterError> {
    let mut chars = column.chars();
    let valid_start = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
    if !valid_start || !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Err(FilterError::InvalidColumn(format!("Invalid column name format: {}", column)));
    }
    Ok(())
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Order two JSON scalars for range operators. Numbers and decimal strings
/// compare numerically, other strings lexicographically (so ISO dates sort by
/// time). `None` when the pair has no meaningful order.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_decimal(a), as_decimal(b)) {
        return Some(x.cmp(&y));
    }
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total order used for sorting. Ranks by type first
/// (null < bool < number < string < array/object). Among strings, decimal
/// strings come before the rest and compare numerically, ties broken by text.
pub(crate) fn sort_values(a: &Value, b: &Value) -> Ordering {
    fn rank(value: &Value) -> u8 {
        match value {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) | Value::Object(_) => 4,
        }
    }

    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => match (as_decimal(a), as_decimal(b)) {
            (Some(dx), Some(dy)) => dx.cmp(&dy),
            _ => x.as_f64().unwrap_or(0.0).total_cmp(&y.as_f64().unwrap_or(0.0)),
        },
        (Value::String(x), Value::String(y)) => match (as_decimal(a), as_decimal(b)) {
            (Some(dx), Some(dy)) => dx.cmp(&dy).then_with(|| x.cmp(y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => x.cmp(y),
        },
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Equality for `$eq`, `$in` and implicit matches. Strings match exactly;
/// a JSON number matches a number or decimal string of the same value.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::Number(_) | Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            match (as_decimal(a), as_decimal(b)) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            }
        }
        _ => a == b,
    }
}

/// SQL LIKE: `%` matches any run of characters, `_` exactly one.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((star_p, star_t)) = backtrack {
            p = star_p + 1;
            t = star_t + 1;
            backtrack = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|c| *c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(where_data: Value, record: &Value) -> bool {
        let condition = FilterWhere::parse(&where_data).unwrap();
        FilterWhere::matches(&condition, record)
    }

    #[test]
    fn test_implicit_equality_and_operators() {
        let record = json!({"id": 3, "grade": "8", "section": "A", "amount": "1200.00", "class_id": null});
        assert!(check(json!({"grade": "8", "section": "A"}), &record));
        assert!(!check(json!({"grade": "9"}), &record));
        assert!(check(json!({"amount": {"$gte": 1000, "$lt": "1500"}}), &record));
        assert!(check(json!({"id": {"$in": [1, 3]}}), &record));
        assert!(check(json!({"id": {"$nin": [1, 2]}}), &record));
        assert!(check(json!({"id": {"$between": [2, 4]}}), &record));
        assert!(check(json!({"class_id": {"$null": true}}), &record));
        assert!(check(json!({"class_id": null}), &record));
        assert!(check(json!({"missing": {"$exists": false}}), &record));
        assert!(check(json!({"section": {"$neq": "B"}}), &record));
    }

    #[test]
    fn test_string_equality_is_exact() {
        let phones = [
            json!({"id": 1, "phone_number": "0123"}),
            json!({"id": 2, "phone_number": "123"}),
            json!({"id": 3, "phone_number": "123.0"}),
        ];
        let matched: Vec<_> = phones
            .iter()
            .filter(|r| check(json!({"phone_number": "123"}), r))
            .map(|r| r["id"].clone())
            .collect();
        assert_eq!(matched, vec![json!(2)]);
        assert!(!check(json!({"phone_number": {"$in": ["123"]}}), &phones[0]));
        assert!(check(json!({"phone_number": {"$ne": "123"}}), &phones[2]));

        // A JSON number still matches decimal strings by value
        assert!(check(json!({"amount": 1200}), &json!({"amount": "1200.00"})));
        assert!(check(json!({"amount": {"$in": [5, 1200]}}), &json!({"amount": "1200.00"})));
    }

    #[test]
    fn test_sort_values_is_total() {
        let values = [
            json!(null), json!(false), json!(true), json!(-1), json!(2.5), json!(10),
            json!("-1"), json!("0.5"), json!("05"), json!("5"), json!("9"), json!("10"), json!("100"),
            json!("1a"), json!("2b"), json!("7x"), json!("ART"), json!("Z9"), json!("abc"), json!([1]),
        ];
        // Listed in ascending order: every pair must agree with its position
        for (i, a) in values.iter().enumerate() {
            for (j, b) in values.iter().enumerate() {
                assert_eq!(sort_values(a, b), i.cmp(&j), "{} vs {}", a, b);
            }
        }
    }

    #[test]
    fn test_logical_operators() {
        let record = json!({"id": 1, "status": "late", "date": "2024-09-02"});
        assert!(check(json!({"$or": [{"status": "absent"}, {"status": "late"}]}), &record));
        assert!(!check(json!({"$and": [{"status": "late"}, {"id": 2}]}), &record));
        assert!(check(json!({"$not": {"status": "present"}}), &record));
        assert!(check(json!({"date": {"$gt": "2024-09-01"}}), &record));
    }

    #[test]
    fn test_like_patterns() {
        assert!(like_match("Greenfield Public School", "Green%"));
        assert!(like_match("Greenfield", "Gr_enf%d"));
        assert!(like_match("abc", "%"));
        assert!(!like_match("Greenfield", "green%"));
        assert!(check(json!({"name": {"$ilike": "%PUBLIC%"}}), &json!({"name": "Greenfield Public School"})));
    }

    #[test]
    fn test_malformed_clauses_are_rejected() {
        assert!(matches!(
            FilterWhere::parse(&json!({"id": {"$regex": "1"}})),
            Err(FilterError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            FilterWhere::parse(&json!({"id": {"$between": [1]}})),
            Err(FilterError::InvalidOperatorData(_))
        ));
        assert!(matches!(
            FilterWhere::parse(&json!({"$or": {"id": 1}})),
            Err(FilterError::InvalidOperatorData(_))
        ));
        assert!(matches!(FilterWhere::parse(&json!(["id"])), Err(FilterError::InvalidWhereClause(_))));
        assert!(matches!(FilterWhere::parse(&json!({"bad column": 1})), Err(FilterError::InvalidColumn(_))));
    }
}
