use serde::{Deserialize, Serialize};
use serde_json::Value;

use catalog_core::{DomainError, DomainResult, ProductId, Violations};
use catalog_infra::ListQuery;
use catalog_products::{NewProduct, Product, ProductPatch};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /products`.
///
/// Fields arrive as raw JSON values and are converted in `validate`, so a
/// missing or mistyped field is reported next to every other violation
/// instead of aborting deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub price: Option<Value>,
    pub stock: Option<Value>,
}

impl CreateProductRequest {
    pub fn validate(self) -> DomainResult<Product> {
        let mut violations = Violations::new();

        let id = match require("id", self.id, &mut violations)
            .and_then(|v| string_field("id", v, &mut violations))
        {
            Some(raw) => match raw.parse::<ProductId>() {
                Ok(id) => Some(id),
                Err(DomainError::Validation(v)) => {
                    violations.extend(v);
                    None
                }
                Err(e) => return Err(e),
            },
            None => None,
        };

        let fields = ProductPatch {
            name: require("name", self.name, &mut violations)
                .and_then(|v| string_field("name", v, &mut violations)),
            price: require("price", self.price, &mut violations)
                .and_then(|v| price_field(v, &mut violations)),
            stock: require("stock", self.stock, &mut violations)
                .and_then(|v| stock_field(v, &mut violations)),
        };
        collect(fields.validate(), &mut violations)?;

        match (id, fields.name, fields.price, fields.stock) {
            (Some(id), Some(name), Some(price), Some(stock)) if violations.is_empty() => {
                NewProduct { id, name, price, stock }.validate()
            }
            _ => Err(DomainError::Validation(violations)),
        }
    }
}

/// Body of `PATCH /products/{id}`. Absent and `null` fields are both "unset".
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<Value>,
    pub price: Option<Value>,
    pub stock: Option<Value>,
}

impl UpdateProductRequest {
    /// Field types and constraints first, then the "at least one field" rule.
    pub fn validate(self) -> DomainResult<ProductPatch> {
        let mut violations = Violations::new();
        let patch = ProductPatch {
            name: self.name.and_then(|v| string_field("name", v, &mut violations)),
            price: self.price.and_then(|v| price_field(v, &mut violations)),
            stock: self.stock.and_then(|v| stock_field(v, &mut violations)),
        };
        collect(patch.validate(), &mut violations)?;
        violations.into_result(())?;

        if patch.is_empty() {
            return Err(DomainError::validation("empty payload"));
        }
        Ok(patch)
    }
}

fn require(field: &str, value: Option<Value>, violations: &mut Violations) -> Option<Value> {
    if value.is_none() {
        violations.push(field, "field required");
    }
    value
}

fn string_field(field: &str, value: Value, violations: &mut Violations) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => {
            violations.push(field, "must be a string");
            None
        }
    }
}

fn price_field(value: Value, violations: &mut Violations) -> Option<f64> {
    let price = value.as_f64();
    if price.is_none() {
        violations.push("price", "must be a number");
    }
    price
}

/// Integral floats such as `3.0` are accepted.
fn stock_field(value: Value, violations: &mut Violations) -> Option<i64> {
    let stock = match &value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    if stock.is_none() {
        violations.push("stock", "must be an integer");
    }
    stock
}

/// Fold constraint violations into `violations`; other errors pass through.
fn collect(checked: DomainResult<()>, violations: &mut Violations) -> DomainResult<()> {
    match checked {
        Ok(()) => Ok(()),
        Err(DomainError::Validation(v)) => {
            violations.extend(v);
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Query string of `GET /products`.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub q: Option<String>,
}

impl ListProductsParams {
    pub fn validate(self) -> DomainResult<ListQuery> {
        let mut violations = Violations::new();

        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            violations.push("limit", format!("must be between 1 and {MAX_PAGE_SIZE}"));
        }

        let offset = u64::try_from(self.offset.unwrap_or(0)).unwrap_or_else(|_| {
            violations.push("offset", "must be greater than or equal to 0");
            0
        });

        if matches!(self.q.as_deref(), Some("")) {
            violations.push("q", "must not be empty");
        }

        violations.into_result(ListQuery {
            limit: u32::try_from(limit).ok(),
            offset,
            q: self.q,
        })
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

impl From<&Product> for ProductResponse {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id().to_string(),
            name: p.name().to_string(),
            price: p.price(),
            stock: p.stock(),
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self::from(&p)
    }
}
