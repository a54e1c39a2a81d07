use std::collections::{BTreeSet, HashMap, HashSet};

use enumset::EnumSet;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use smallvec::SmallVec;

use crate::catalog::{ColumnKey, QueryType, TableKey};
use crate::workload::Histogram;

/// Columns used together by one access, and the kinds of queries that used them.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSetEntry {
    columns: SmallVec<[ColumnKey; 2]>,
    query_types: EnumSet<QueryType>,
}

impl ColumnSetEntry {
    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    pub fn query_types(&self) -> EnumSet<QueryType> {
        self.query_types
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnSet {
    entries: Vec<ColumnSetEntry>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an access. Accessing the same columns again only widens the query types.
    pub fn add<I, Q>(&mut self, columns: I, query_types: Q)
    where
        I: IntoIterator<Item = ColumnKey>,
        Q: Into<EnumSet<QueryType>>,
    {
        let columns: SmallVec<[ColumnKey; 2]> = columns.into_iter().collect();
        let query_types = query_types.into();
        match self.entries.iter_mut().find(|e| e.columns == columns) {
            Some(entry) => entry.query_types |= query_types,
            None => self.entries.push(ColumnSetEntry {
                columns,
                query_types,
            }),
        }
    }

    pub fn with<I, Q>(mut self, columns: I, query_types: Q) -> Self
    where
        I: IntoIterator<Item = ColumnKey>,
        Q: Into<EnumSet<QueryType>>,
    {
        self.add(columns, query_types);
        self
    }

    pub fn entries(&self) -> &[ColumnSetEntry] {
        &self.entries
    }

    /// Drops the entries used by nothing but inserts.
    pub fn without_insert_only(&self) -> ColumnSet {
        ColumnSet {
            entries: self
                .entries
                .iter()
                .filter(|e| !QueryType::is_insert_only(e.query_types))
                .cloned()
                .collect(),
        }
    }

    /// Distinct columns of `table` mentioned by any entry.
    pub fn columns_of(&self, table: &TableKey) -> BTreeSet<ColumnKey> {
        self.entries
            .iter()
            .flat_map(|e| e.columns.iter())
            .filter(|c| c.table() == table)
            .cloned()
            .collect()
    }

    /// Number of entries each column appears in.
    pub fn column_histogram(&self) -> Histogram<ColumnKey> {
        self.entries
            .iter()
            .flat_map(|e| e.columns.iter())
            .map(|c| (c.clone(), 1))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccessEdge {
    total_weight: f64,
    columns: ColumnSet,
}

impl AccessEdge {
    pub fn new(total_weight: f64, columns: ColumnSet) -> Self {
        Self {
            total_weight,
            columns,
        }
    }

    /// Aggregated workload frequency of the co-access.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }
}

/// Undirected graph of tables accessed together by the workload.
///
/// A self loop records accesses confined to a single table.
#[derive(Clone, Debug, Default)]
pub struct AccessGraph {
    graph: UnGraph<TableKey, AccessEdge>,
    vertices: HashMap<TableKey, NodeIndex>,
}

impl AccessGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, table: TableKey) -> NodeIndex {
        if let Some(idx) = self.vertices.get(&table) {
            return *idx;
        }
        let idx = self.graph.add_node(table.clone());
        self.vertices.insert(table, idx);
        idx
    }

    pub fn add_edge(&mut self, first: TableKey, second: TableKey, edge: AccessEdge) {
        let first = self.add_vertex(first);
        let second = self.add_vertex(second);
        self.graph.add_edge(first, second, edge);
    }

    pub fn contains_vertex(&self, table: &TableKey) -> bool {
        self.vertices.contains_key(table)
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Edges touching `table`, each once, paired with the table at the other end. `None` when
    /// the table has no vertex.
    pub fn incident_edges(&self, table: &TableKey) -> Option<Vec<(&TableKey, &AccessEdge)>> {
        let idx = *self.vertices.get(table)?;
        let mut seen = HashSet::<EdgeIndex>::new();
        let edges = self
            .graph
            .edges(idx)
            .filter(|e| seen.insert(e.id()))
            .map(|e| {
                let other = if e.source() == idx {
                    e.target()
                } else {
                    e.source()
                };
                (&self.graph[other], e.weight())
            })
            .collect();
        Some(edges)
    }

    /// Edges between two distinct tables.
    pub fn edges_between(&self, first: &TableKey, second: &TableKey) -> Vec<&AccessEdge> {
        match (self.vertices.get(first), self.vertices.get(second)) {
            (Some(a), Some(b)) => self
                .graph
                .edges_connecting(*a, *b)
                .map(|e| e.weight())
                .collect(),
            _ => vec![],
        }
    }

    /// Sum of the weights of every edge touching `table`.
    pub fn incident_weight(&self, table: &TableKey) -> f64 {
        self.incident_edges(table)
            .map(|edges| edges.iter().map(|(_, e)| e.total_weight()).sum())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_set_merges_query_types() {
        let t = TableKey::new("t");
        let set = ColumnSet::new()
            .with([t.column("a")], QueryType::Insert)
            .with([t.column("a")], QueryType::Select)
            .with([t.column("b")], QueryType::Insert);
        assert_eq!(2, set.entries().len());
        assert_eq!(
            QueryType::Insert | QueryType::Select,
            set.entries()[0].query_types()
        );

        let filtered = set.without_insert_only();
        assert_eq!(1, filtered.entries().len());
        assert_eq!(
            vec![t.column("a")],
            filtered.columns_of(&t).into_iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_incident_edges_include_self_loop_once() {
        let t = TableKey::new("t");
        let u = TableKey::new("u");
        let mut graph = AccessGraph::new();
        graph.add_edge(t.clone(), t.clone(), AccessEdge::new(1.0, ColumnSet::new()));
        graph.add_edge(t.clone(), u.clone(), AccessEdge::new(2.0, ColumnSet::new()));

        let edges = graph.incident_edges(&t).unwrap();
        assert_eq!(2, edges.len());
        assert_eq!(3.0, graph.incident_weight(&t));
        assert_eq!(2.0, graph.incident_weight(&u));
        assert_eq!(1, graph.edges_between(&u, &t).len());
        assert!(graph.incident_edges(&TableKey::new("x")).is_none());
    }
}
