use serde_json::Value;
use std::cmp::Ordering;

use super::error::FilterError;
use super::filter_where::{sort_values, validate_column};
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    pub fn validate_and_parse(order: &Value) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let infos = match order {
            Value::Null => vec![],
            Value::String(s) => Self::parse_order_string(s)?,
            Value::Array(arr) => {
                // Expect array of strings like ["created_at desc", "name asc"]
                let mut out = Vec::new();
                for v in arr {
                    match v {
                        Value::String(s) => out.extend(Self::parse_order_string(s)?),
                        _ => return Err(FilterError::InvalidOrder("order entries must be strings".to_string())),
                    }
                }
                out
            }
            Value::Object(obj) => {
                // { "created_at": "desc", "name": "asc" }
                let mut out = Vec::new();
                for (k, v) in obj {
                    let sort = Self::parse_direction(v.as_str().unwrap_or("asc"))?;
                    out.push(FilterOrderInfo { column: k.clone(), sort });
                }
                out
            }
            _ => return Err(FilterError::InvalidOrder("order must be a string, array or object".to_string())),
        };

        for info in &infos {
            validate_column(&info.column)?;
        }
        Ok(infos)
    }

    fn parse_order_string(s: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        // split on commas, then each token into column and direction
        let mut out = Vec::new();
        for part in s.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                let sort = Self::parse_direction(it.next().unwrap_or("asc"))?;
                out.push(FilterOrderInfo { column: col.to_string(), sort });
            }
        }
        Ok(out)
    }

    fn parse_direction(dir: &str) -> Result<SortDirection, FilterError> {
        if dir.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if dir.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(FilterError::InvalidOrder(format!("unknown sort direction '{}'", dir)))
        }
    }

    /// Compare two records by the order list. Nulls and missing fields sort first.
    pub fn compare(infos: &[FilterOrderInfo], a: &Value, b: &Value) -> Ordering {
        for info in infos {
            let left = a.get(&info.column).unwrap_or(&Value::Null);
            let right = b.get(&info.column).unwrap_or(&Value::Null);
            let ordering = match info.sort {
                SortDirection::Asc => sort_values(left, right),
                SortDirection::Desc => sort_values(left, right).reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_formats() {
        let from_string = FilterOrder::validate_and_parse(&json!("grade desc, section")).unwrap();
        assert_eq!(from_string.len(), 2);
        assert_eq!(from_string[0].sort, SortDirection::Desc);
        assert_eq!(from_string[1].sort, SortDirection::Asc);

        let from_object = FilterOrder::validate_and_parse(&json!({"name": "DESC"})).unwrap();
        assert_eq!(from_object[0].column, "name");
        assert_eq!(from_object[0].sort, SortDirection::Desc);

        assert!(FilterOrder::validate_and_parse(&json!("name sideways")).is_err());
        assert!(FilterOrder::validate_and_parse(&json!(42)).is_err());
    }

    #[test]
    fn test_compare_numeric_strings_and_nulls() {
        let infos = FilterOrder::validate_and_parse(&json!("amount desc")).unwrap();
        let small = json!({"amount": "99.50"});
        let large = json!({"amount": "1200.00"});
        let none = json!({"amount": null});
        assert_eq!(FilterOrder::compare(&infos, &large, &small), Ordering::Less);
        assert_eq!(FilterOrder::compare(&infos, &none, &small), Ordering::Greater);
    }
}
