//! Database dialects and the dialect-conditional rendering rules.
//!
//! Every dialect-specific decision made while rendering a column
//! definition funnels through this module, so the per-dialect
//! differences stay in one table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized dialect '{0}'")]
pub struct ParseDialectError(pub String);

/// Database dialects understood by the renderer.
///
/// [`Dialect::Generic`] stands in for any database the renderer has no
/// dedicated rules for; it follows the MySQL branch of every
/// dialect-conditional table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// MySQL and MariaDB.
    Mysql,
    /// PostgreSQL.
    Postgres,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    Mssql,
    /// Oracle Database.
    Oracle,
    /// CUBRID.
    Cubrid,
    /// Fallback for unknown databases.
    #[default]
    Generic,
}

impl Dialect {
    /// Every concrete dialect, without the generic fallback.
    pub const ALL: [Self; 6] = [
        Self::Mysql,
        Self::Postgres,
        Self::Sqlite,
        Self::Mssql,
        Self::Oracle,
        Self::Cubrid,
    ];

    /// Returns the canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
            Self::Mssql => "mssql",
            Self::Oracle => "oracle",
            Self::Cubrid => "cubrid",
            Self::Generic => "generic",
        }
    }

    /// Returns the raw SQL appended to a sole primary-key column.
    ///
    /// MSSQL identity columns carry the same clause whether or not
    /// they auto-increment; PostgreSQL and Oracle express
    /// auto-increment through the type itself, so only the key clause
    /// is appended.
    #[must_use]
    pub fn primary_key_append(self, auto_increment: bool) -> &'static str {
        match self {
            Self::Mssql => "IDENTITY PRIMARY KEY",
            Self::Postgres | Self::Oracle => "PRIMARY KEY",
            Self::Sqlite => {
                if auto_increment {
                    "PRIMARY KEY AUTOINCREMENT"
                } else {
                    "PRIMARY KEY"
                }
            }
            Self::Mysql | Self::Cubrid | Self::Generic => {
                if auto_increment {
                    "AUTO_INCREMENT PRIMARY KEY"
                } else {
                    "PRIMARY KEY"
                }
            }
        }
    }

    /// Returns the keywords that carry primary-key or auto-increment
    /// meaning inside an append string for this dialect.
    #[must_use]
    pub fn primary_key_keywords(self) -> &'static [&'static str] {
        match self {
            Self::Mssql => &["IDENTITY", "PRIMARY", "KEY"],
            Self::Postgres | Self::Oracle => &["PRIMARY", "KEY"],
            Self::Sqlite => &["PRIMARY", "KEY", "AUTOINCREMENT"],
            Self::Mysql | Self::Cubrid | Self::Generic => &["AUTO_INCREMENT", "PRIMARY", "KEY"],
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = ParseDialectError;

    /// Parses a dialect name, accepting the driver aliases commonly
    /// found in connection strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "postgres" | "postgresql" | "pgsql" => Ok(Self::Postgres),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "mssql" | "sqlsrv" | "dblib" => Ok(Self::Mssql),
            "oracle" | "oci" => Ok(Self::Oracle),
            "cubrid" => Ok(Self::Cubrid),
            "generic" => Ok(Self::Generic),
            _ => Err(ParseDialectError(s.to_string())),
        }
    }
}
