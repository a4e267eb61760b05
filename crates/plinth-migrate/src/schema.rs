//! Declared-table schema manager
//!
//! Unlike the migration runner, DDL errors here abort and propagate: table
//! creation is an explicit install step.

use crate::error::{MigrateError, MigrateResult};
use plinth_core::{SchemaConfig, TableDef};
use plinth_db::Database;

/// Creates and drops the tables declared in a repo's `schema` section
#[derive(Debug, Clone, Copy)]
pub struct SchemaManager<'a> {
    schema: &'a SchemaConfig,
}

impl<'a> SchemaManager<'a> {
    pub fn new(schema: &'a SchemaConfig) -> Self {
        Self { schema }
    }

    /// Prefixed name of a declared table
    pub fn table_name(&self, table: &TableDef) -> String {
        format!("{}{}", self.schema.table_prefix, table.name)
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for `table`
    pub fn create_statement(&self, table: &TableDef) -> String {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.table_name(table),
            table.columns.join(",\n")
        );
        if let Some(options) = self.schema.table_options.as_deref().map(str::trim) {
            if !options.is_empty() {
                sql.push(' ');
                sql.push_str(options);
            }
        }
        sql
    }

    pub fn drop_statement(&self, table: &TableDef) -> String {
        format!("DROP TABLE IF EXISTS {}", self.table_name(table))
    }

    /// Create every declared table in declaration order. Returns how many
    /// statements were executed.
    pub async fn create_tables(&self, db: &dyn Database) -> MigrateResult<usize> {
        for table in &self.schema.tables {
            let sql = self.create_statement(table);
            log::debug!("Executing: {sql}");
            db.execute(&sql)
                .await
                .map_err(|source| MigrateError::Schema {
                    table: self.table_name(table),
                    source,
                })?;
        }
        Ok(self.schema.tables.len())
    }

    /// Drop every declared table, last declared first.
    pub async fn drop_tables(&self, db: &dyn Database) -> MigrateResult<usize> {
        for table in self.schema.tables.iter().rev() {
            let sql = self.drop_statement(table);
            log::debug!("Executing: {sql}");
            db.execute(&sql)
                .await
                .map_err(|source| MigrateError::Schema {
                    table: self.table_name(table),
                    source,
                })?;
        }
        Ok(self.schema.tables.len())
    }

    /// Prefixed names of declared tables that do not exist yet
    pub async fn missing_tables(&self, db: &dyn Database) -> MigrateResult<Vec<String>> {
        let mut missing = Vec::new();
        for table in &self.schema.tables {
            let name = self.table_name(table);
            let exists = db
                .relation_exists(&name)
                .await
                .map_err(|source| MigrateError::Schema {
                    table: name.clone(),
                    source,
                })?;
            if !exists {
                missing.push(name);
            }
        }
        Ok(missing)
    }
}
