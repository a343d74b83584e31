use serde::{Deserialize, Serialize};
use shared::{errors::ServiceError, utils::format_validation_errors};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FindAllInventory {
    /// Case-insensitive substring matched against product name, product ID and category.
    pub search: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,

    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: Option<i64>,

    /// Ignored unless `limit` is also given.
    #[validate(range(min = 0, message = "offset must be a non-negative number"))]
    pub offset: Option<i64>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl FindAllInventory {
    pub fn search_term(&self) -> Option<&str> {
        present(&self.search)
    }

    pub fn category_filter(&self) -> Option<&str> {
        present(&self.category)
    }

    pub fn location_filter(&self) -> Option<&str> {
        present(&self.location)
    }

    /// `(limit, offset)` when a limit was supplied.
    pub fn window(&self) -> Option<(i64, Option<i64>)> {
        self.limit
            .map(|limit| (limit, self.offset.filter(|offset| *offset > 0)))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    #[validate(range(min = 0, message = "threshold must be a non-negative number"))]
    pub threshold: Option<i32>,
}

/// Create payload. Every field is optional on the wire so that an absent
/// field is reported by name instead of as a generic JSON error; a zero
/// quantity is a present value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateInventoryRequest {
    #[validate(
        required(message = "Missing required field: product_name"),
        length(min = 1, max = 255, message = "product_name must be 1-255 characters")
    )]
    #[schema(example = "Wireless Mouse")]
    pub product_name: Option<String>,

    #[validate(
        required(message = "Missing required field: product_id"),
        length(min = 1, max = 50, message = "product_id must be 1-50 characters")
    )]
    #[schema(example = "WM-001")]
    pub product_id: Option<String>,

    #[validate(
        required(message = "Missing required field: category"),
        length(min = 1, max = 100, message = "category must be 1-100 characters")
    )]
    #[schema(example = "Electronics")]
    pub category: Option<String>,

    #[validate(
        required(message = "Missing required field: location"),
        length(min = 1, max = 100, message = "location must be 1-100 characters")
    )]
    #[schema(example = "Warehouse A")]
    pub location: Option<String>,

    #[validate(
        required(message = "Missing required field: available_quantity"),
        range(min = 0, message = "available_quantity must be a non-negative number")
    )]
    #[schema(example = 10)]
    pub available_quantity: Option<i32>,

    #[validate(
        required(message = "Missing required field: reserved_quantity"),
        range(min = 0, message = "reserved_quantity must be a non-negative number")
    )]
    #[schema(example = 2)]
    pub reserved_quantity: Option<i32>,

    #[validate(
        required(message = "Missing required field: on_hand_quantity"),
        range(min = 0, message = "on_hand_quantity must be a non-negative number")
    )]
    #[schema(example = 8)]
    pub on_hand_quantity: Option<i32>,
}

/// A fully validated row ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInventoryItem {
    pub product_name: String,
    pub product_id: String,
    pub category: String,
    pub location: String,
    pub available_quantity: i32,
    pub reserved_quantity: i32,
    pub on_hand_quantity: i32,
}

fn required<T: Clone>(value: &Option<T>, field: &str) -> Result<T, ServiceError> {
    value
        .clone()
        .ok_or_else(|| ServiceError::validation(format!("Missing required field: {field}")))
}

impl TryFrom<&CreateInventoryRequest> for NewInventoryItem {
    type Error = ServiceError;

    fn try_from(req: &CreateInventoryRequest) -> Result<Self, Self::Error> {
        req.validate()
            .map_err(|e| ServiceError::Validation(format_validation_errors(&e)))?;

        Ok(Self {
            product_name: required(&req.product_name, "product_name")?,
            product_id: required(&req.product_id, "product_id")?,
            category: required(&req.category, "category")?,
            location: required(&req.location, "location")?,
            available_quantity: required(&req.available_quantity, "available_quantity")?,
            reserved_quantity: required(&req.reserved_quantity, "reserved_quantity")?,
            on_hand_quantity: required(&req.on_hand_quantity, "on_hand_quantity")?,
        })
    }
}

/// Partial update. `None` (absent or `null`) leaves the column untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateInventoryRequest {
    #[validate(length(min = 1, max = 255, message = "product_name must be 1-255 characters"))]
    pub product_name: Option<String>,

    #[validate(length(min = 1, max = 50, message = "product_id must be 1-50 characters"))]
    pub product_id: Option<String>,

    #[validate(length(min = 1, max = 100, message = "category must be 1-100 characters"))]
    pub category: Option<String>,

    #[validate(length(min = 1, max = 100, message = "location must be 1-100 characters"))]
    pub location: Option<String>,

    #[validate(range(min = 0, message = "available_quantity must be a non-negative number"))]
    pub available_quantity: Option<i32>,

    #[validate(range(min = 0, message = "reserved_quantity must be a non-negative number"))]
    pub reserved_quantity: Option<i32>,

    #[validate(range(min = 0, message = "on_hand_quantity must be a non-negative number"))]
    pub on_hand_quantity: Option<i32>,
}

/// The only columns an update may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryColumn {
    ProductName,
    ProductId,
    Category,
    Location,
    AvailableQuantity,
    ReservedQuantity,
    OnHandQuantity,
}

impl InventoryColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            InventoryColumn::ProductName => "product_name",
            InventoryColumn::ProductId => "product_id",
            InventoryColumn::Category => "category",
            InventoryColumn::Location => "location",
            InventoryColumn::AvailableQuantity => "available_quantity",
            InventoryColumn::ReservedQuantity => "reserved_quantity",
            InventoryColumn::OnHandQuantity => "on_hand_quantity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValue {
    Text(String),
    Quantity(i32),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub column: InventoryColumn,
    pub value: ColumnValue,
}

impl UpdateInventoryRequest {
    pub fn validate_fields(&self) -> Result<(), ServiceError> {
        self.validate()
            .map_err(|e| ServiceError::Validation(format_validation_errors(&e)))
    }

    /// Supplied fields in a fixed column order.
    pub fn changes(&self) -> Vec<FieldChange> {
        let text = [
            (InventoryColumn::ProductName, &self.product_name),
            (InventoryColumn::ProductId, &self.product_id),
            (InventoryColumn::Category, &self.category),
            (InventoryColumn::Location, &self.location),
        ];
        let quantities = [
            (InventoryColumn::AvailableQuantity, self.available_quantity),
            (InventoryColumn::ReservedQuantity, self.reserved_quantity),
            (InventoryColumn::OnHandQuantity, self.on_hand_quantity),
        ];

        let text_changes = text.into_iter().filter_map(|(column, value)| {
            value.as_ref().map(|v| FieldChange {
                column,
                value: ColumnValue::Text(v.clone()),
            })
        });
        let quantity_changes = quantities.into_iter().filter_map(|(column, value)| {
            value.map(|v| FieldChange {
                column,
                value: ColumnValue::Quantity(v),
            })
        });

        text_changes.chain(quantity_changes).collect()
    }
}

/// Stock adjustment restricted to the three quantity columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateQuantitiesRequest {
    pub available_quantity: Option<i32>,
    pub reserved_quantity: Option<i32>,
    pub on_hand_quantity: Option<i32>,
}

impl From<UpdateQuantitiesRequest> for UpdateInventoryRequest {
    fn from(value: UpdateQuantitiesRequest) -> Self {
        UpdateInventoryRequest {
            available_quantity: value.available_quantity,
            reserved_quantity: value.reserved_quantity,
            on_hand_quantity: value.on_hand_quantity,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkUpdateItem {
    pub id: i32,
    pub data: UpdateInventoryRequest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BulkUpdateRequest {
    pub updates: Vec<BulkUpdateItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn complete() -> CreateInventoryRequest {
        CreateInventoryRequest {
            product_name: Some("Widget".into()),
            product_id: Some("P1".into()),
            category: Some("Tools".into()),
            location: Some("A1".into()),
            available_quantity: Some(10),
            reserved_quantity: Some(2),
            on_hand_quantity: Some(8),
        }
    }

    fn messages(err: ServiceError) -> Vec<String> {
        match err {
            ServiceError::Validation(messages) => messages,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn zero_quantities_are_present_values() {
        let req = CreateInventoryRequest {
            available_quantity: Some(0),
            reserved_quantity: Some(0),
            on_hand_quantity: Some(0),
            ..complete()
        };

        let item = NewInventoryItem::try_from(&req).expect("zero is allowed");
        assert_eq!(item.available_quantity, 0);
    }

    #[rstest]
    #[case::name(CreateInventoryRequest { product_name: None, ..complete() }, "Missing required field: product_name")]
    #[case::product_id(CreateInventoryRequest { product_id: None, ..complete() }, "Missing required field: product_id")]
    #[case::category(CreateInventoryRequest { category: None, ..complete() }, "Missing required field: category")]
    #[case::location(CreateInventoryRequest { location: None, ..complete() }, "Missing required field: location")]
    #[case::available(CreateInventoryRequest { available_quantity: None, ..complete() }, "Missing required field: available_quantity")]
    #[case::reserved(CreateInventoryRequest { reserved_quantity: None, ..complete() }, "Missing required field: reserved_quantity")]
    #[case::on_hand(CreateInventoryRequest { on_hand_quantity: None, ..complete() }, "Missing required field: on_hand_quantity")]
    #[case::negative(CreateInventoryRequest { reserved_quantity: Some(-3), ..complete() }, "reserved_quantity must be a non-negative number")]
    #[case::empty_name(CreateInventoryRequest { product_name: Some(String::new()), ..complete() }, "product_name must be 1-255 characters")]
    fn rejects_incomplete_create(#[case] req: CreateInventoryRequest, #[case] expected: &str) {
        let err = NewInventoryItem::try_from(&req).expect_err("request is invalid");
        assert_eq!(messages(err), vec![expected.to_string()]);
    }

    #[test]
    fn changes_only_cover_supplied_fields() {
        let req = UpdateInventoryRequest {
            available_quantity: Some(5),
            ..Default::default()
        };

        assert_eq!(
            req.changes(),
            vec![FieldChange {
                column: InventoryColumn::AvailableQuantity,
                value: ColumnValue::Quantity(5),
            }]
        );
    }

    #[test]
    fn changes_follow_column_order() {
        let req = UpdateInventoryRequest {
            on_hand_quantity: Some(1),
            product_id: Some("P9".into()),
            location: Some("B2".into()),
            ..Default::default()
        };

        let columns: Vec<_> = req.changes().iter().map(|c| c.column.as_str()).collect();
        assert_eq!(columns, vec!["product_id", "location", "on_hand_quantity"]);
    }

    #[test]
    fn explicit_nulls_and_unknown_keys_are_ignored() {
        let req: UpdateInventoryRequest = serde_json::from_str(
            r#"{"product_name": null, "created_at": "2020-01-01", "id": 99}"#,
        )
        .expect("payload parses");

        assert!(req.changes().is_empty());
    }

    #[test]
    fn window_ignores_offset_without_limit() {
        let only_offset = FindAllInventory {
            offset: Some(20),
            ..Default::default()
        };
        assert_eq!(only_offset.window(), None);

        let both = FindAllInventory {
            limit: Some(10),
            offset: Some(20),
            ..Default::default()
        };
        assert_eq!(both.window(), Some((10, Some(20))));
    }

    #[test]
    fn blank_filters_count_as_absent() {
        let req = FindAllInventory {
            search: Some("  ".into()),
            category: Some(String::new()),
            location: Some("Dock".into()),
            ..Default::default()
        };

        assert_eq!(req.search_term(), None);
        assert_eq!(req.category_filter(), None);
        assert_eq!(req.location_filter(), Some("Dock"));
    }

    #[test]
    fn quantity_adjustment_never_touches_labels() {
        let req = UpdateInventoryRequest::from(UpdateQuantitiesRequest {
            reserved_quantity: Some(4),
            ..Default::default()
        });

        assert_eq!(req.product_id, None);
        assert_eq!(req.changes().len(), 1);
    }
}
