//! The agent platform schema.
//!
//! The schema is fixed: eleven tables rooted at `Users`, each loaded from one CSV file whose
//! columns are positional in table order. [`TABLES`] lists them in foreign-key dependency order,
//! so creating (and loading) front to back never references a missing parent, and dropping back
//! to front never orphans a child.
//!
//! Every foreign key cascades on delete. Removing a `Users` or `BaseModel` row removes its whole
//! dependent subtree.

use sqlx::PgConnection;
use tracing::{debug, instrument};

use crate::db::errors::Result;

/// Column types used by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    BigInt,
    Text,
    Date,
}

impl SqlType {
    pub fn as_sql(self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Text => "TEXT",
            SqlType::Date => "DATE",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: SqlType,
    pub not_null: bool,
}

const fn col(name: &'static str, sql_type: SqlType) -> Column {
    Column {
        name,
        sql_type,
        not_null: false,
    }
}

const fn required(name: &'static str, sql_type: SqlType) -> Column {
    Column {
        name,
        sql_type,
        not_null: true,
    }
}

/// Foreign key from `columns` to `parent(parent_columns)`, always `ON DELETE CASCADE`.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKey {
    pub columns: &'static [&'static str],
    pub parent: &'static str,
    pub parent_columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub name: &'static str,
    /// CSV file, relative to the import folder
    pub file_name: &'static str,
    pub columns: &'static [Column],
    pub primary_key: &'static [&'static str],
    pub foreign_keys: &'static [ForeignKey],
}

use SqlType::{BigInt, Date, Integer, Text};

/// All tables, in foreign-key dependency order.
pub const TABLES: &[TableSchema] = &[
    TableSchema {
        name: "Users",
        file_name: "User.csv",
        columns: &[col("uid", Integer), required("email", Text), required("username", Text)],
        primary_key: &["uid"],
        foreign_keys: &[],
    },
    TableSchema {
        name: "AgentCreator",
        file_name: "AgentCreator.csv",
        columns: &[col("uid", Integer), col("bio", Text), col("payout", Text)],
        primary_key: &["uid"],
        foreign_keys: &[ForeignKey {
            columns: &["uid"],
            parent: "Users",
            parent_columns: &["uid"],
        }],
    },
    TableSchema {
        name: "AgentClient",
        file_name: "AgentClient.csv",
        columns: &[
            col("uid", Integer),
            required("interests", Text),
            required("cardholder", Text),
            required("expire", Date),
            required("cardno", BigInt),
            required("cvv", Integer),
            required("zip", Integer),
        ],
        primary_key: &["uid"],
        foreign_keys: &[ForeignKey {
            columns: &["uid"],
            parent: "Users",
            parent_columns: &["uid"],
        }],
    },
    TableSchema {
        name: "BaseModel",
        file_name: "BaseModel.csv",
        columns: &[col("bmid", Integer), required("creator_uid", Integer), required("description", Text)],
        primary_key: &["bmid"],
        foreign_keys: &[ForeignKey {
            columns: &["creator_uid"],
            parent: "AgentCreator",
            parent_columns: &["uid"],
        }],
    },
    TableSchema {
        name: "CustomizedModel",
        file_name: "CustomizedModel.csv",
        columns: &[col("bmid", Integer), required("mid", Integer)],
        primary_key: &["bmid", "mid"],
        foreign_keys: &[ForeignKey {
            columns: &["bmid"],
            parent: "BaseModel",
            parent_columns: &["bmid"],
        }],
    },
    TableSchema {
        name: "Configuration",
        file_name: "Configuration.csv",
        columns: &[
            col("cid", Integer),
            required("client_uid", Integer),
            required("content", Text),
            required("labels", Text),
        ],
        primary_key: &["cid"],
        foreign_keys: &[ForeignKey {
            columns: &["client_uid"],
            parent: "AgentClient",
            parent_columns: &["uid"],
        }],
    },
    TableSchema {
        name: "InternetService",
        file_name: "InternetService.csv",
        columns: &[col("sid", Integer), required("provider", Text), required("endpoints", Text)],
        primary_key: &["sid"],
        foreign_keys: &[],
    },
    TableSchema {
        name: "LLMService",
        file_name: "LLMService.csv",
        columns: &[col("sid", Integer), col("domain", Text)],
        primary_key: &["sid"],
        foreign_keys: &[ForeignKey {
            columns: &["sid"],
            parent: "InternetService",
            parent_columns: &["sid"],
        }],
    },
    TableSchema {
        name: "DataStorage",
        file_name: "DataStorage.csv",
        columns: &[col("sid", Integer), col("type", Text)],
        primary_key: &["sid"],
        foreign_keys: &[ForeignKey {
            columns: &["sid"],
            parent: "InternetService",
            parent_columns: &["sid"],
        }],
    },
    TableSchema {
        name: "ModelServices",
        file_name: "ModelServices.csv",
        columns: &[required("bmid", Integer), required("sid", Integer), required("version", Integer)],
        primary_key: &["bmid", "sid"],
        foreign_keys: &[
            ForeignKey {
                columns: &["bmid"],
                parent: "BaseModel",
                parent_columns: &["bmid"],
            },
            ForeignKey {
                columns: &["sid"],
                parent: "InternetService",
                parent_columns: &["sid"],
            },
        ],
    },
    TableSchema {
        name: "ModelConfigurations",
        file_name: "ModelConfigurations.csv",
        columns: &[
            required("bmid", Integer),
            required("mid", Integer),
            required("cid", Integer),
            required("duration", Integer),
        ],
        primary_key: &["bmid", "mid", "cid"],
        foreign_keys: &[
            ForeignKey {
                columns: &["bmid", "mid"],
                parent: "CustomizedModel",
                parent_columns: &["bmid", "mid"],
            },
            ForeignKey {
                columns: &["cid"],
                parent: "Configuration",
                parent_columns: &["cid"],
            },
        ],
    },
];

impl TableSchema {
    pub fn create_statement(&self) -> String {
        let mut definitions: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                let mut def = format!("{} {}", c.name, c.sql_type.as_sql());
                if c.not_null {
                    def.push_str(" NOT NULL");
                }
                def
            })
            .collect();

        definitions.push(format!("PRIMARY KEY ({})", self.primary_key.join(", ")));
        for fk in self.foreign_keys {
            definitions.push(format!(
                "FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE CASCADE",
                fk.columns.join(", "),
                fk.parent,
                fk.parent_columns.join(", ")
            ));
        }

        format!("CREATE TABLE {} (\n    {}\n)", self.name, definitions.join(",\n    "))
    }

    /// `CASCADE` drops dependent constraints, so the drop order never trips over foreign keys.
    pub fn drop_statement(&self) -> String {
        format!("DROP TABLE IF EXISTS {} CASCADE", self.name)
    }

    /// Full-tuple insert taking every column as a text parameter.
    ///
    /// Each parameter is cast to its column type server-side, so CSV fields can be bound as they
    /// were read and PostgreSQL does the parsing (and rejects malformed values).
    pub fn insert_statement(&self) -> String {
        let columns: Vec<&str> = self.columns.iter().map(|c| c.name).collect();
        let values: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| format!("CAST(${} AS {})", i + 1, c.sql_type.as_sql()))
            .collect();

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.name,
            columns.join(", "),
            values.join(", ")
        )
    }
}

/// Drop every table and recreate the empty schema.
///
/// Running this twice in a row leaves the same empty schema. Callers that need the reset to be
/// atomic with a subsequent load run it inside a transaction; PostgreSQL DDL is transactional.
#[instrument(skip(conn), err)]
pub async fn reset(conn: &mut PgConnection) -> Result<()> {
    for table in TABLES.iter().rev() {
        sqlx::query(&table.drop_statement()).execute(&mut *conn).await?;
    }
    for table in TABLES {
        debug!(table = table.name, "creating table");
        sqlx::query(&table.create_statement()).execute(&mut *conn).await?;
    }
    Ok(())
}
