use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::{validate_column, FilterWhere};
use super::types::{FilterCondition, FilterData, FilterOrderInfo};

/// Query over one collection's records in their JSON form.
pub struct Filter {
    collection: String,
    select_columns: Vec<String>,
    condition: Option<FilterCondition>,
    order_data: Vec<FilterOrderInfo>,
    limit: Option<usize>,
    offset: usize,
}

impl Filter {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            select_columns: vec![],
            condition: None,
            order_data: vec![],
            limit: None,
            offset: 0,
        }
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(select) = data.select { self.select(select)?; }
        if let Some(where_clause) = data.where_clause { self.where_clause(where_clause)?; }
        if let Some(order) = data.order { self.order(order)?; }
        self.limit(data.limit, data.offset)?;
        Ok(self)
    }

    pub fn select(&mut self, columns: Vec<String>) -> Result<&mut Self, FilterError> {
        for column in &columns {
            if column != "*" { validate_column(column)?; }
        }
        self.select_columns = columns;
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        self.condition = Some(FilterWhere::parse(&conditions)?);
        Ok(self)
    }

    pub fn order(&mut self, order_spec: Value) -> Result<&mut Self, FilterError> {
        self.order_data = FilterOrder::validate_and_parse(&order_spec)?;
        Ok(self)
    }

    pub fn limit(&mut self, limit: Option<i64>, offset: Option<i64>) -> Result<&mut Self, FilterError> {
        if let Some(off) = offset {
            self.offset = usize::try_from(off)
                .map_err(|_| FilterError::InvalidOffset("Offset must be non-negative".to_string()))?;
        }

        let requested = match limit {
            Some(l) => Some(
                usize::try_from(l).map_err(|_| FilterError::InvalidLimit("Limit must be non-negative".to_string()))?,
            ),
            None => None,
        };

        // Apply max limit from config
        let max_limit = crate::config::CONFIG.filter.max_limit;
        self.limit = match (requested, max_limit) {
            (Some(l), Some(max)) if l > max => {
                if crate::config::CONFIG.filter.debug_logging {
                    tracing::warn!("Limit {} exceeds max {}, capping to max", l, max);
                }
                Some(max)
            }
            (None, max) => max,
            (l, _) => l,
        };
        Ok(self)
    }

    pub fn matches(&self, record: &Value) -> bool {
        self.condition
            .as_ref()
            .map_or(true, |condition| FilterWhere::matches(condition, record))
    }

    /// Filter, sort, page and project `records`, which arrive in id order.
    pub fn apply(&self, records: Vec<Value>) -> Vec<Value> {
        let total = records.len();
        let mut rows: Vec<Value> = records.into_iter().filter(|r| self.matches(r)).collect();
        let matched = rows.len();

        if !self.order_data.is_empty() {
            // Stable sort keeps id order among ties
            rows.sort_by(|a, b| FilterOrder::compare(&self.order_data, a, b));
        }

        let page = rows
            .into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .map(|row| self.project(row))
            .collect::<Vec<_>>();

        if crate::config::CONFIG.filter.debug_logging {
            tracing::debug!(
                "Filter on {}: {} of {} records matched, returning {}",
                self.collection,
                matched,
                total,
                page.len()
            );
        }
        page
    }

    fn project(&self, row: Value) -> Value {
        if self.select_columns.is_empty() || self.select_columns.iter().any(|c| c == "*") {
            return row;
        }
        match row {
            Value::Object(mut fields) => {
                fields.retain(|key, _| key == "id" || self.select_columns.iter().any(|c| c == key));
                Value::Object(fields)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::filter_where::sort_values;
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Mathematics", "code": "MATH", "school_id": 1}),
            json!({"id": 2, "name": "Science", "code": "SCI", "school_id": 1}),
            json!({"id": 3, "name": "History", "code": null, "school_id": 2}),
            json!({"id": 4, "name": "Art", "code": "ART", "school_id": 1}),
        ]
    }

    fn data(value: Value) -> FilterData {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_where_order_limit_offset() {
        let mut filter = Filter::new("subjects");
        filter
            .assign(data(json!({
                "where": {"school_id": 1},
                "order": "name asc",
                "limit": 2,
                "offset": 1
            })))
            .unwrap();

        let names: Vec<_> = filter.apply(records()).into_iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("Mathematics"), json!("Science")]);
    }

    #[test]
    fn test_select_keeps_id() {
        let mut filter = Filter::new("subjects");
        filter.assign(data(json!({"select": ["name"], "where": {"id": 2}}))).unwrap();
        let rows = filter.apply(records());
        assert_eq!(rows, vec![json!({"id": 2, "name": "Science"})]);
    }

    #[test]
    fn test_negative_limit_and_offset_rejected() {
        let mut filter = Filter::new("subjects");
        assert!(matches!(filter.limit(Some(-1), None), Err(FilterError::InvalidLimit(_))));
        assert!(matches!(filter.limit(Some(5), Some(-3)), Err(FilterError::InvalidOffset(_))));
    }

    #[test]
    fn test_limit_capped_by_config() {
        let mut filter = Filter::new("subjects");
        filter.limit(Some(i64::MAX), None).unwrap();
        match crate::config::CONFIG.filter.max_limit {
            Some(max) => assert_eq!(filter.limit, Some(max)),
            None => assert_eq!(filter.limit, Some(i64::MAX as usize)),
        }
    }

    #[test]
    fn test_order_over_mixed_codes_is_consistent() {
        const CODES: [&str; 14] = ["10", "9", "1a", "2b", "100", "ART", "05", "7x", "8", "30", "0.5", "abc", "Z9", "-1"];
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as usize
        };

        for round in 0..40 {
            let rows: Vec<Value> = (0..60)
                .map(|id| match next() % 16 {
                    14 => json!({"id": id, "code": null}),
                    15 => json!({"id": id, "code": (next() % 50) as i64 - 10}),
                    i => json!({"id": id, "code": CODES[i]}),
                })
                .collect();

            let mut asc = Filter::new("subjects");
            asc.assign(data(json!({"order": "code asc"}))).unwrap();
            let sorted = asc.apply(rows.clone());
            assert_eq!(sorted.len(), rows.len());
            for pair in sorted.windows(2) {
                assert_ne!(
                    sort_values(&pair[0]["code"], &pair[1]["code"]),
                    std::cmp::Ordering::Greater,
                    "round {}: {} before {}",
                    round,
                    pair[0],
                    pair[1]
                );
            }

            let mut desc = Filter::new("subjects");
            desc.assign(data(json!({"order": "code desc"}))).unwrap();
            let codes = |rows: Vec<Value>| rows.into_iter().map(|r| r["code"].clone()).collect::<Vec<_>>();
            let mut reversed = codes(desc.apply(rows));
            reversed.reverse();
            assert_eq!(reversed, codes(sorted));
        }
    }

    #[test]
    fn test_unknown_body_keys_rejected() {
        assert!(serde_json::from_value::<FilterData>(json!({"filter": {}})).is_err());
    }
}
