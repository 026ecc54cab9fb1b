use catalog_core::{DomainResult, ProductId, Violations};

/// Upper bound on `name`, counted in characters (matches the `VARCHAR(200)` column).
pub const NAME_MAX_CHARS: usize = 200;

/// A catalog product.
///
/// Instances are only obtainable through validation (`NewProduct::validate`,
/// `ProductPatch::apply`) or from storage that already held valid rows, so
/// holding a `Product` means every field constraint holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: f64,
    stock: i64,
}

impl Product {
    /// Rebuild a product from storage, re-checking constraints.
    pub fn restore(id: ProductId, name: String, price: f64, stock: i64) -> DomainResult<Self> {
        NewProduct { id, name, price, stock }.validate()
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }
}

/// Create shape: every field is required, the id is chosen by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub stock: i64,
}

impl NewProduct {
    /// Check every field and collect all violations, not just the first.
    pub fn validate(self) -> DomainResult<Product> {
        let mut violations = Violations::new();
        check_name(&self.name, &mut violations);
        check_price(self.price, &mut violations);
        check_stock(self.stock, &mut violations);

        violations.into_result(Product {
            id: self.id,
            name: self.name,
            price: self.price,
            stock: self.stock,
        })
    }
}

/// Sparse update: `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.stock.is_none()
    }

    /// Check only the fields that are present.
    pub fn validate(&self) -> DomainResult<()> {
        let mut violations = Violations::new();
        if let Some(name) = &self.name {
            check_name(name, &mut violations);
        }
        if let Some(price) = self.price {
            check_price(price, &mut violations);
        }
        if let Some(stock) = self.stock {
            check_stock(stock, &mut violations);
        }
        violations.into_result(())
    }

    /// Merge the set fields over `current`.
    ///
    /// The id is never touched. Callers validate the patch first; the merged
    /// record is checked again so an unvalidated patch cannot produce an
    /// invalid `Product`.
    pub fn apply(&self, current: &Product) -> DomainResult<Product> {
        NewProduct {
            id: current.id,
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            price: self.price.unwrap_or(current.price),
            stock: self.stock.unwrap_or(current.stock),
        }
        .validate()
    }
}

fn check_name(name: &str, violations: &mut Violations) {
    if name.is_empty() {
        violations.push("name", "must not be empty");
    } else if name.chars().count() > NAME_MAX_CHARS {
        violations.push("name", format!("must be at most {NAME_MAX_CHARS} characters"));
    }
}

fn check_price(price: f64, violations: &mut Violations) {
    if !price.is_finite() {
        violations.push("price", "must be a finite number");
    } else if price < 0.0 {
        violations.push("price", "must be greater than or equal to 0");
    }
}

fn check_stock(stock: i64, violations: &mut Violations) {
    if stock < 0 {
        violations.push("stock", "must be greater than or equal to 0");
    }
}
