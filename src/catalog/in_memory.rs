use std::collections::BTreeMap;

use crate::catalog::{
    Catalog, Column, ColumnKey, Parameter, ParameterKey, Procedure, ProcedureKey, QueryType,
    Statement, StatementKey, Table, TableKey,
};
use crate::error::{DesignResult, DesignerError};

/// Arena catalog keyed by entity keys.
///
/// Ordered maps keep every listing deterministic, which the visit orders rely on when weights
/// tie.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    tables: BTreeMap<TableKey, Table>,
    columns: BTreeMap<ColumnKey, Column>,
    procedures: BTreeMap<ProcedureKey, Procedure>,
    parameters: BTreeMap<ParameterKey, Parameter>,
    statements: BTreeMap<StatementKey, Statement>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_table<S: Into<String>>(&mut self, name: S, columns: &[&str]) -> TableKey {
        let key = TableKey::new(name);
        let column_keys: Vec<ColumnKey> = columns.iter().map(|c| key.column(*c)).collect();
        for column in &column_keys {
            self.columns.insert(
                column.clone(),
                Column {
                    key: column.clone(),
                    foreign_key: None,
                },
            );
        }
        self.tables.insert(
            key.clone(),
            Table {
                key: key.clone(),
                columns: column_keys,
                is_replicated: false,
                partition_column: None,
            },
        );
        key
    }

    /// Declares `child` as a foreign key referencing `parent`.
    pub fn add_foreign_key(&mut self, child: &ColumnKey, parent: &ColumnKey) -> DesignResult<()> {
        self.get_column(parent)?;
        let column = self
            .columns
            .get_mut(child)
            .ok_or_else(|| DesignerError::unknown("column", child))?;
        column.foreign_key = Some(parent.clone());
        Ok(())
    }

    pub fn set_partition_column(&mut self, column: &ColumnKey) -> DesignResult<()> {
        let table = self
            .tables
            .get_mut(column.table())
            .ok_or_else(|| DesignerError::unknown("table", column.table()))?;
        if !table.columns.contains(column) {
            return Err(DesignerError::unknown("column", column));
        }
        table.is_replicated = false;
        table.partition_column = Some(column.clone());
        Ok(())
    }

    pub fn set_replicated(&mut self, table: &TableKey) -> DesignResult<()> {
        let table = self
            .tables
            .get_mut(table)
            .ok_or_else(|| DesignerError::unknown("table", table))?;
        table.is_replicated = true;
        table.partition_column = None;
        Ok(())
    }

    pub fn add_procedure<S: Into<String>>(&mut self, name: S) -> ProcedureKey {
        self.insert_procedure(ProcedureKey::new(name), false)
    }

    pub fn add_system_procedure<S: Into<String>>(&mut self, name: S) -> ProcedureKey {
        self.insert_procedure(ProcedureKey::new(name), true)
    }

    fn insert_procedure(&mut self, key: ProcedureKey, system: bool) -> ProcedureKey {
        self.procedures.insert(
            key.clone(),
            Procedure {
                key: key.clone(),
                system,
                parameters: vec![],
                statements: vec![],
            },
        );
        key
    }

    pub fn add_parameter<S: Into<String>>(
        &mut self,
        procedure: &ProcedureKey,
        name: S,
        is_array: bool,
    ) -> DesignResult<ParameterKey> {
        let proc = self
            .procedures
            .get_mut(procedure)
            .ok_or_else(|| DesignerError::unknown("procedure", procedure))?;
        let key = procedure.parameter(name);
        proc.parameters.push(key.clone());
        self.parameters.insert(
            key.clone(),
            Parameter {
                key: key.clone(),
                is_array,
            },
        );
        Ok(key)
    }

    /// Adds a statement. Output columns are also counted as referenced.
    pub fn add_statement<S: Into<String>>(
        &mut self,
        procedure: &ProcedureKey,
        name: S,
        query_type: QueryType,
        referenced: &[ColumnKey],
        output: &[ColumnKey],
    ) -> DesignResult<StatementKey> {
        for column in referenced.iter().chain(output.iter()) {
            self.get_column(column)?;
        }
        let proc = self
            .procedures
            .get_mut(procedure)
            .ok_or_else(|| DesignerError::unknown("procedure", procedure))?;
        let key = procedure.statement(name);
        proc.statements.push(key.clone());
        self.statements.insert(
            key.clone(),
            Statement {
                key: key.clone(),
                query_type,
                referenced_columns: referenced.iter().chain(output.iter()).cloned().collect(),
                output_columns: output.iter().cloned().collect(),
            },
        );
        Ok(key)
    }
}

impl Catalog for InMemoryCatalog {
    fn tables(&self) -> Vec<&Table> {
        self.tables.values().collect()
    }

    fn table(&self, key: &TableKey) -> Option<&Table> {
        self.tables.get(key)
    }

    fn column(&self, key: &ColumnKey) -> Option<&Column> {
        self.columns.get(key)
    }

    fn procedures(&self) -> Vec<&Procedure> {
        self.procedures.values().collect()
    }

    fn procedure(&self, key: &ProcedureKey) -> Option<&Procedure> {
        self.procedures.get(key)
    }

    fn parameter(&self, key: &ParameterKey) -> Option<&Parameter> {
        self.parameters.get(key)
    }

    fn statement(&self, key: &StatementKey) -> Option<&Statement> {
        self.statements.get(key)
    }
}
