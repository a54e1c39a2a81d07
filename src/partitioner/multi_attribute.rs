use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::Hash;

use itertools::Itertools;

use crate::catalog::{
    Attribute, ColumnKey, Composite, CompositeRegistry, Named, ParameterKey, ProcedureKey,
    QueryType, TableKey,
};
use crate::context::DesignerContext;
use crate::error::DesignResult;

/// Composites each attribute participates in, keyed in input order.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeCandidates<K> {
    entries: Vec<(Attribute<K>, BTreeSet<Composite<K>>)>,
}

impl<K: PartialEq> CompositeCandidates<K> {
    pub fn get(&self, attribute: &Attribute<K>) -> Option<&BTreeSet<Composite<K>>> {
        self.entries
            .iter()
            .find(|(a, _)| a == attribute)
            .map(|(_, composites)| composites)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute<K>, &BTreeSet<Composite<K>>)> {
        self.entries.iter().map(|(a, c)| (a, c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every distinct composite generated.
    pub fn composites(&self) -> BTreeSet<Composite<K>>
    where
        K: Ord + Clone,
    {
        self.entries
            .iter()
            .flat_map(|(_, c)| c.iter().cloned())
            .collect()
    }
}

/// Pairs up `attributes` into composite candidates.
///
/// Every unordered pair of distinct base attributes that are not arrays yields one composite,
/// memoized in `registry`. Composite and array attributes still get an entry, with no
/// composites.
pub fn generate_composite_candidates<K, F>(
    attributes: &[Attribute<K>],
    is_array: F,
    registry: &CompositeRegistry<K>,
) -> DesignResult<CompositeCandidates<K>>
where
    K: Named + Clone + Ord + Hash,
    F: Fn(&K) -> bool,
{
    let mut entries: Vec<(Attribute<K>, BTreeSet<Composite<K>>)> = attributes
        .iter()
        .unique()
        .map(|a| (a.clone(), BTreeSet::new()))
        .collect();

    let eligible: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, (attr, _))| matches!(attr, Attribute::Base(key) if !is_array(key)))
        .map(|(idx, _)| idx)
        .collect();

    for (i, j) in eligible.into_iter().tuple_combinations() {
        let (first, second) = match (&entries[i].0, &entries[j].0) {
            (Attribute::Base(first), Attribute::Base(second)) => (first, second),
            _ => continue,
        };
        let composite = registry.get_pair(first, second)?;
        entries[i].1.insert(composite.clone());
        entries[j].1.insert(composite);
    }

    Ok(CompositeCandidates { entries })
}

/// Composite parameter candidates of `procedure`, built from its non-array parameters.
pub fn generate_multi_parameter_candidates(
    ctx: &DesignerContext<'_>,
    procedure: &ProcedureKey,
    registry: &CompositeRegistry<ParameterKey>,
) -> DesignResult<CompositeCandidates<ParameterKey>> {
    let proc = ctx.catalog.get_procedure(procedure)?;
    let mut arrays = HashSet::new();
    for key in proc.parameters() {
        if ctx.catalog.get_parameter(key)?.is_array() {
            arrays.insert(key.clone());
        }
    }
    let params: Vec<Attribute<ParameterKey>> = proc
        .parameters()
        .iter()
        .cloned()
        .map(Attribute::Base)
        .collect();
    generate_composite_candidates(&params, |p| arrays.contains(p), registry)
}

/// Composite column candidates per table, from the columns `procedure`'s statements access
/// together. Insert statements are skipped.
pub fn generate_multi_column_candidates(
    ctx: &DesignerContext<'_>,
    procedure: &ProcedureKey,
    registry: &CompositeRegistry<ColumnKey>,
) -> DesignResult<BTreeMap<TableKey, BTreeSet<Composite<ColumnKey>>>> {
    let proc = ctx.catalog.get_procedure(procedure)?;
    let mut multi_columns: BTreeMap<TableKey, BTreeSet<Composite<ColumnKey>>> = BTreeMap::new();

    for stmt_key in proc.statements() {
        let stmt = ctx.catalog.get_statement(stmt_key)?;
        if stmt.query_type() == QueryType::Insert {
            continue;
        }
        let by_table = stmt
            .referenced_columns()
            .iter()
            .into_group_map_by(|c| c.table().clone());
        for (table, columns) in by_table.into_iter().sorted() {
            let composites = multi_columns.entry(table).or_default();
            for (first, second) in columns.into_iter().tuple_combinations() {
                composites.insert(registry.get_pair(first, second)?);
            }
        }
    }
    Ok(multi_columns)
}
