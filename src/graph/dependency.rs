use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::catalog::{Catalog, ColumnKey, TableKey};
use crate::error::{DesignResult, DesignerError};

/// Foreign key graph. Edges point from the referenced (parent) table to the referencing (child)
/// table and carry the child's foreign key column.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<TableKey, ColumnKey>,
    vertices: HashMap<TableKey, NodeIndex>,
    /// Parent column -> columns referencing it directly.
    referencing: HashMap<ColumnKey, Vec<ColumnKey>>,
}

impl DependencyGraph {
    pub fn from_catalog<C: Catalog + ?Sized>(catalog: &C) -> DesignResult<Self> {
        let mut dgraph = DependencyGraph::default();
        for table in catalog.tables() {
            dgraph.add_table(table.key().clone());
        }
        for table in catalog.tables() {
            for column_key in table.columns() {
                let column = catalog.get_column(column_key)?;
                if let Some(parent) = column.foreign_key() {
                    dgraph.add_foreign_key(column_key.clone(), parent.clone())?;
                }
            }
        }
        Ok(dgraph)
    }

    pub fn add_table(&mut self, table: TableKey) -> NodeIndex {
        if let Some(idx) = self.vertices.get(&table) {
            return *idx;
        }
        let idx = self.graph.add_node(table.clone());
        self.vertices.insert(table, idx);
        idx
    }

    pub fn add_foreign_key(&mut self, child: ColumnKey, parent: ColumnKey) -> DesignResult<()> {
        let parent_idx = self.vertex(parent.table())?;
        let child_idx = self.vertex(child.table())?;
        self.graph.add_edge(parent_idx, child_idx, child.clone());
        self.referencing.entry(parent).or_default().push(child);
        Ok(())
    }

    pub fn contains(&self, table: &TableKey) -> bool {
        self.vertices.contains_key(table)
    }

    fn vertex(&self, table: &TableKey) -> DesignResult<NodeIndex> {
        self.vertices
            .get(table)
            .copied()
            .ok_or_else(|| DesignerError::MissingVertex(table.to_string()))
    }

    /// Child tables of `table`, sorted and without self references.
    pub fn successors(&self, table: &TableKey) -> DesignResult<Vec<TableKey>> {
        let idx = self.vertex(table)?;
        Ok(self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter(|n| *n != idx)
            .map(|n| self.graph[n].clone())
            .sorted()
            .dedup()
            .collect())
    }

    /// Tables not referencing any other table, sorted.
    pub fn roots(&self) -> Vec<TableKey> {
        self.graph
            .node_indices()
            .filter(|idx| {
                self.graph
                    .edges_directed(*idx, Direction::Incoming)
                    .all(|e| e.source() == *idx)
            })
            .map(|idx| self.graph[idx].clone())
            .sorted()
            .collect()
    }

    /// Every column that transitively references `column` through foreign keys.
    pub fn descendants(&self, column: &ColumnKey) -> BTreeSet<ColumnKey> {
        let mut found = BTreeSet::new();
        let mut stack = vec![column.clone()];
        while let Some(current) = stack.pop() {
            for child in self.referencing.get(&current).into_iter().flatten() {
                if child != column && found.insert(child.clone()) {
                    stack.push(child.clone());
                }
            }
        }
        found
    }

    /// All tables with every parent before its children. Ties, and tables caught in a
    /// reference cycle, go in name order.
    pub fn parent_first_order(&self) -> Vec<TableKey> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                let parents = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .filter(|p| *p != idx)
                    .unique()
                    .count();
                (idx, parents)
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<(&TableKey, NodeIndex)>> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(idx, _)| Reverse((&self.graph[*idx], *idx)))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some(Reverse((table, idx))) = ready.pop() {
            order.push(table.clone());
            for child in self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .filter(|c| *c != idx)
                .unique()
            {
                if let Some(degree) = in_degree.get_mut(&child) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse((&self.graph[child], child)));
                    }
                }
            }
            in_degree.remove(&idx);
        }

        if !in_degree.is_empty() {
            log::debug!("Dependency cycle among {} tables", in_degree.len());
            order.extend(
                in_degree
                    .keys()
                    .map(|idx| self.graph[*idx].clone())
                    .sorted(),
            );
        }
        order
    }
}
