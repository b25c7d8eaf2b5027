//! Request and response models for the DataTables server-side protocol.
//!
//! The request mirrors the wire shape grid clients send: `draw`, `start` and
//! `length` plus an ordered column list where each entry may carry a search
//! value, and an order list of which only the first entry is honoured. All
//! fields deserialize as optional so that a malformed request can be rejected
//! with a bad-request result instead of a deserialization failure.

use axum::Json;
use axum::response::{IntoResponse, Response};
use sea_orm::JsonValue;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One grid request as sent by a DataTables-style client.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GridRequest {
    /// Opaque request counter, echoed back verbatim.
    pub draw: Option<i64>,
    /// Row offset of the requested page.
    pub start: Option<u64>,
    /// Page size. Negative means "all rows" and skips the LIMIT clause.
    pub length: Option<i64>,
    #[serde(default)]
    pub columns: Vec<GridColumn>,
    #[serde(default)]
    pub order: Vec<GridOrder>,
}

/// A column entry of the request; `data` is the logical column key.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GridColumn {
    pub data: Option<String>,
    pub search: Option<GridSearch>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GridSearch {
    pub value: Option<String>,
}

/// An order entry; `column` indexes into the request's column list.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GridOrder {
    pub column: Option<usize>,
    pub dir: Option<String>,
}

/// The required request fields, unwrapped after validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidGrid {
    pub draw: i64,
    pub start: u64,
    pub length: i64,
}

impl GridRequest {
    /// Gate for any query work: `draw`, `start` and `length` must all be
    /// present or the whole call is rejected.
    #[must_use]
    pub fn validate(&self) -> Option<ValidGrid> {
        Some(ValidGrid {
            draw: self.draw?,
            start: self.start?,
            length: self.length?,
        })
    }

    /// Logical column key and direction of the first order entry, when both
    /// are present. Only `order[0]` is ever honoured.
    #[must_use]
    pub fn order_target(&self) -> Option<(&str, &str)> {
        let entry = self.order.first()?;
        let column = self.columns.get(entry.column?)?;
        Some((column.data.as_deref()?, entry.dir.as_deref()?))
    }
}

/// The fixed response envelope grid clients consume.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GridResponse {
    pub draw: i64,
    #[serde(rename = "recordsTotal")]
    pub records_total: u64,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: u64,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<JsonValue>,
    /// Present only on degraded (timed-out) responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GridResponse {
    #[must_use]
    pub fn page(draw: i64, records_total: u64, records_filtered: u64, data: Vec<JsonValue>) -> Self {
        Self {
            draw,
            records_total,
            records_filtered,
            data,
            error: None,
        }
    }

    /// Empty page with zeroed counters and an error message; the shape a
    /// client receives when the call outran its time budget.
    #[must_use]
    pub fn degraded(draw: i64, message: impl Into<String>) -> Self {
        Self {
            draw,
            records_total: 0,
            records_filtered: 0,
            data: Vec::new(),
            error: Some(message.into()),
        }
    }
}

impl IntoResponse for GridResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_wire_shape() {
        let request: GridRequest = serde_json::from_value(json!({
            "draw": 3,
            "start": 20,
            "length": 10,
            "columns": [
                {"data": "name", "search": {"value": "smith"}},
                {"data": "age", "search": {"value": null}},
                {"data": "created_at"}
            ],
            "order": [{"column": 1, "dir": "desc"}]
        }))
        .unwrap();

        let valid = request.validate().unwrap();
        assert_eq!(valid.draw, 3);
        assert_eq!(valid.start, 20);
        assert_eq!(valid.length, 10);
        assert_eq!(request.columns.len(), 3);
        assert_eq!(
            request.columns[0].search.as_ref().unwrap().value.as_deref(),
            Some("smith")
        );
        assert_eq!(request.order_target(), Some(("age", "desc")));
    }

    #[test]
    fn validation_requires_draw_start_and_length() {
        let mut request = GridRequest {
            draw: Some(1),
            start: Some(0),
            length: Some(10),
            ..GridRequest::default()
        };
        assert!(request.validate().is_some());

        request.length = None;
        assert!(request.validate().is_none());

        request.length = Some(10);
        request.draw = None;
        assert!(request.validate().is_none());
    }

    #[test]
    fn order_target_needs_a_matching_column() {
        let request = GridRequest {
            draw: Some(1),
            start: Some(0),
            length: Some(10),
            columns: vec![GridColumn {
                data: Some("name".into()),
                search: None,
            }],
            order: vec![GridOrder {
                column: Some(5),
                dir: Some("asc".into()),
            }],
            ..GridRequest::default()
        };
        assert_eq!(request.order_target(), None);
    }

    #[test]
    fn response_envelope_field_names() {
        let value = serde_json::to_value(GridResponse::page(7, 100, 40, vec![json!({"id": 1})])).unwrap();
        assert_eq!(value["draw"], 7);
        assert_eq!(value["recordsTotal"], 100);
        assert_eq!(value["recordsFiltered"], 40);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn degraded_response_carries_message_and_zero_counters() {
        let value = serde_json::to_value(GridResponse::degraded(9, "too slow")).unwrap();
        assert_eq!(value["draw"], 9);
        assert_eq!(value["recordsTotal"], 0);
        assert_eq!(value["recordsFiltered"], 0);
        assert_eq!(value["data"].as_array().unwrap().len(), 0);
        assert_eq!(value["error"], "too slow");
    }
}
