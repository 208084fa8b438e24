//! Static table descriptors shared by the generator and the sink.
//!
//! Every physical relation is described by a [`TableSpec`] const: the table
//! name, the surrogate-key column, and the ordered non-key columns. SQL text
//! is only ever built from these descriptors, so the consts double as the
//! identifier allow-list: [`lookup`] and [`TableSpec::validate_identifiers`]
//! reject anything that did not come from this module.

use crate::model::ConstraintViolation;

/// PostgreSQL column type of a descriptor column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    VarChar(u16),
    Text,
    Decimal { precision: u8, scale: u8 },
    Char(u8),
    TimestampTz,
}

impl SqlType {
    /// The DDL spelling of this type.
    pub fn ddl(&self) -> String {
        match self {
            SqlType::Integer => "INTEGER".to_string(),
            SqlType::VarChar(len) => format!("VARCHAR({len})"),
            SqlType::Text => "TEXT".to_string(),
            SqlType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
            SqlType::Char(len) => format!("CHAR({len})"),
            SqlType::TimestampTz => "TIMESTAMP WITH TIME ZONE".to_string(),
        }
    }
}

/// A single non-key column of a physical table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub sql_type: SqlType,
}

/// A physical table: name, surrogate-key column, ordered non-key columns.
///
/// The surrogate key is held separately because the sink owns it: inserts
/// never supply it, and the returned ids are backfilled into the in-memory
/// rows after the stage commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub primary_key: &'static str,
    pub columns: &'static [ColumnSpec],
}

impl TableSpec {
    /// Ordered non-key column names.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }

    /// Verify every identifier in this spec is allow-list safe.
    pub fn validate_identifiers(&self) -> Result<(), ConstraintViolation> {
        for ident in std::iter::once(self.name)
            .chain(std::iter::once(self.primary_key))
            .chain(self.columns.iter().map(|c| c.name))
        {
            if !is_safe_identifier(ident) {
                return Err(ConstraintViolation::new(
                    self.name,
                    format!("unsafe SQL identifier {ident:?}"),
                ));
            }
        }
        Ok(())
    }
}

/// Lowercase ASCII identifiers only; the first character must be a letter.
pub fn is_safe_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

pub const USERS: TableSpec = TableSpec {
    name: "users",
    primary_key: "id",
    columns: &[
        ColumnSpec {
            name: "name",
            sql_type: SqlType::VarChar(255),
        },
        ColumnSpec {
            name: "email",
            sql_type: SqlType::VarChar(255),
        },
        ColumnSpec {
            name: "address",
            sql_type: SqlType::Text,
        },
        ColumnSpec {
            name: "created_at",
            sql_type: SqlType::TimestampTz,
        },
        ColumnSpec {
            name: "updated_at",
            sql_type: SqlType::TimestampTz,
        },
        ColumnSpec {
            name: "deleted_at",
            sql_type: SqlType::TimestampTz,
        },
    ],
};

pub const PRODUCTS: TableSpec = TableSpec {
    name: "products",
    primary_key: "id",
    columns: &[
        ColumnSpec {
            name: "name",
            sql_type: SqlType::VarChar(255),
        },
        ColumnSpec {
            name: "category",
            sql_type: SqlType::VarChar(100),
        },
        ColumnSpec {
            name: "price",
            sql_type: SqlType::Decimal {
                precision: 10,
                scale: 2,
            },
        },
        ColumnSpec {
            name: "created_at",
            sql_type: SqlType::TimestampTz,
        },
        ColumnSpec {
            name: "updated_at",
            sql_type: SqlType::TimestampTz,
        },
        ColumnSpec {
            name: "deleted_at",
            sql_type: SqlType::TimestampTz,
        },
    ],
};

pub const ORDERS: TableSpec = TableSpec {
    name: "orders",
    primary_key: "id",
    columns: &[
        ColumnSpec {
            name: "user_id",
            sql_type: SqlType::Integer,
        },
        ColumnSpec {
            name: "status",
            sql_type: SqlType::VarChar(50),
        },
        ColumnSpec {
            name: "created_at",
            sql_type: SqlType::TimestampTz,
        },
        ColumnSpec {
            name: "updated_at",
            sql_type: SqlType::TimestampTz,
        },
    ],
};

pub const ORDER_ITEMS: TableSpec = TableSpec {
    name: "order_items",
    primary_key: "id",
    columns: &[
        ColumnSpec {
            name: "order_id",
            sql_type: SqlType::Integer,
        },
        ColumnSpec {
            name: "product_id",
            sql_type: SqlType::Integer,
        },
        ColumnSpec {
            name: "quantity",
            sql_type: SqlType::Integer,
        },
    ],
};

/// All physical tables in dependency order (parents before children).
pub const ALL_TABLES: [&TableSpec; 4] = [&USERS, &PRODUCTS, &ORDERS, &ORDER_ITEMS];

/// Look a table up by name. Returns `None` for anything outside the
/// allow-list.
pub fn lookup(name: &str) -> Option<&'static TableSpec> {
    ALL_TABLES.iter().copied().find(|spec| spec.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_specs_have_safe_identifiers() {
        for spec in ALL_TABLES {
            spec.validate_identifiers().unwrap();
        }
    }

    #[test]
    fn test_lookup_allow_list() {
        assert_eq!(lookup("users").map(|s| s.name), Some("users"));
        assert_eq!(lookup("order_items").map(|s| s.name), Some("order_items"));
        assert!(lookup("users; DROP TABLE users").is_none());
        assert!(lookup("accounts").is_none());
    }

    #[test]
    fn test_is_safe_identifier() {
        assert!(is_safe_identifier("order_items"));
        assert!(is_safe_identifier("batch_id"));
        assert!(!is_safe_identifier(""));
        assert!(!is_safe_identifier("1users"));
        assert!(!is_safe_identifier("Users"));
        assert!(!is_safe_identifier("users\"; --"));
    }

    #[test]
    fn test_dependency_order() {
        let names: Vec<_> = ALL_TABLES.iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["users", "products", "orders", "order_items"]);
    }

    #[test]
    fn test_type_ddl() {
        assert_eq!(SqlType::VarChar(255).ddl(), "VARCHAR(255)");
        assert_eq!(
            SqlType::Decimal {
                precision: 10,
                scale: 2
            }
            .ddl(),
            "DECIMAL(10, 2)"
        );
        assert_eq!(SqlType::Char(8).ddl(), "CHAR(8)");
        assert_eq!(SqlType::TimestampTz.ddl(), "TIMESTAMP WITH TIME ZONE");
    }
}
