//! Adapter registry.
//!
//! An adapter is a short identifier selecting a connector family. Each
//! adapter resolves to the data source class the pool engine instantiates.

use std::fmt;

/// Supported database adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Adapter {
    /// IBM DB2.
    Db2,
    /// Apache Derby.
    Derby,
    /// FoundationDB SQL layer.
    Fdbsql,
    /// Firebird.
    Firebird,
    /// H2.
    H2,
    /// HyperSQL.
    Hsqldb,
    /// MariaDB.
    Mariadb,
    /// MySQL.
    Mysql,
    /// Oracle.
    Oracle,
    /// PostgreSQL via pgjdbc-ng.
    PgjdbcNg,
    /// PostgreSQL.
    Postgresql,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    Sqlserver,
    /// Microsoft SQL Server via jTDS.
    SqlserverJtds,
    /// Sybase.
    Sybase,
}

impl Adapter {
    /// All adapters, sorted by name.
    pub const ALL: [Adapter; 15] = [
        Self::Db2,
        Self::Derby,
        Self::Fdbsql,
        Self::Firebird,
        Self::H2,
        Self::Hsqldb,
        Self::Mariadb,
        Self::Mysql,
        Self::Oracle,
        Self::PgjdbcNg,
        Self::Postgresql,
        Self::Sqlite,
        Self::Sqlserver,
        Self::SqlserverJtds,
        Self::Sybase,
    ];

    /// The adapter key.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Db2 => "db2",
            Self::Derby => "derby",
            Self::Fdbsql => "fdbsql",
            Self::Firebird => "firebird",
            Self::H2 => "h2",
            Self::Hsqldb => "hsqldb",
            Self::Mariadb => "mariadb",
            Self::Mysql => "mysql",
            Self::Oracle => "oracle",
            Self::PgjdbcNg => "pgjdbc_ng",
            Self::Postgresql => "postgresql",
            Self::Sqlite => "sqlite",
            Self::Sqlserver => "sqlserver",
            Self::SqlserverJtds => "sqlserver_jtds",
            Self::Sybase => "sybase",
        }
    }

    /// The connector (data source class) identifier this adapter resolves to.
    #[must_use]
    pub const fn connector(&self) -> &'static str {
        match self {
            Self::Db2 => "com.ibm.db2.jcc.DB2SimpleDataSource",
            Self::Derby => "org.apache.derby.jdbc.ClientDataSource",
            Self::Fdbsql => "com.foundationdb.sql.jdbc.ds.FDBSimpleDataSource",
            Self::Firebird => "org.firebirdsql.pool.FBSimpleDataSource",
            Self::H2 => "org.h2.jdbcx.JdbcDataSource",
            Self::Hsqldb => "org.hsqldb.jdbc.JDBCDataSource",
            Self::Mariadb => "org.mariadb.jdbc.MySQLDataSource",
            Self::Mysql => "com.mysql.jdbc.jdbc2.optional.MysqlDataSource",
            Self::Oracle => "oracle.jdbc.pool.OracleDataSource",
            Self::PgjdbcNg => "com.impossibl.postgres.jdbc.PGDataSource",
            Self::Postgresql => "org.postgresql.ds.PGSimpleDataSource",
            Self::Sqlite => "org.sqlite.JDBC",
            Self::Sqlserver => "com.microsoft.sqlserver.jdbc.SQLServerDataSource",
            Self::SqlserverJtds => "net.sourceforge.jtds.jdbcx.JtdsDataSource",
            Self::Sybase => "com.sybase.jdbcx.SybDataSource",
        }
    }

    /// Look up an adapter by key.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|adapter| adapter.name() == name)
    }

    /// Comma-separated list of every adapter key, sorted.
    #[must_use]
    pub fn names() -> String {
        Self::ALL.map(|adapter| adapter.name()).join(", ")
    }
}

impl fmt::Display for Adapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
