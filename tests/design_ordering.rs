//! End-to-end visit orders for a cut-down TPC-C schema.
//!
//! ```text
//! warehouse <- district <- customer
//!     ^
//!     +------- stock -> item (replicated, read-only)
//! ```
//!
//! Two user procedures (`neworder`, `payment`) and one system procedure run against it. The
//! access graph weights follow the invocation counts.

use partition_designer::catalog::{
    Attribute, ColumnKey, CompositeRegistry, InMemoryCatalog, ParameterKey, ProcedureKey,
    QueryType, TableKey,
};
use partition_designer::context::DesignerContext;
use partition_designer::correlation::ParameterMappings;
use partition_designer::graph::{AccessEdge, AccessGraph, ColumnSet, DependencyGraph};
use partition_designer::hints::DesignerHints;
use partition_designer::partitioner::*;
use partition_designer::stat::{InMemoryStatistics, TableStatistics};
use partition_designer::workload::WorkloadSummary;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Tpcc {
    catalog: InMemoryCatalog,
    stats: InMemoryStatistics,
    workload: WorkloadSummary,
    correlations: ParameterMappings,
    access_graph: AccessGraph,
    dependency_graph: DependencyGraph,
    hints: DesignerHints,
}

impl Tpcc {
    fn context(&self) -> DesignerContext<'_> {
        DesignerContext {
            catalog: &self.catalog,
            stats: &self.stats,
            workload: &self.workload,
            correlations: &self.correlations,
            access_graph: &self.access_graph,
            dependency_graph: &self.dependency_graph,
            hints: &self.hints,
        }
    }
}

fn col(table: &str, name: &str) -> ColumnKey {
    TableKey::new(table).column(name)
}

fn tables(names: &[&str]) -> Vec<TableKey> {
    names.iter().map(|n| TableKey::new(*n)).collect()
}

fn param(procedure: &str, name: &str) -> Attribute<ParameterKey> {
    Attribute::Base(ProcedureKey::new(procedure).parameter(name))
}

fn column_names(order: &[PartitionCandidate]) -> Vec<String> {
    order.iter().map(|c| c.to_string()).collect()
}

fn tpcc() -> Tpcc {
    let mut catalog = InMemoryCatalog::new();
    let warehouse = catalog.add_table("warehouse", &["w_id", "w_name"]);
    let district = catalog.add_table("district", &["d_id", "d_w_id", "d_name"]);
    let customer = catalog.add_table(
        "customer",
        &["c_id", "c_d_id", "c_w_id", "c_last", "c_balance"],
    );
    let item = catalog.add_table("item", &["i_id", "i_name", "i_price"]);
    let stock = catalog.add_table("stock", &["s_i_id", "s_w_id", "s_qty"]);

    let fks = [
        (col("district", "d_w_id"), col("warehouse", "w_id")),
        (col("customer", "c_d_id"), col("district", "d_id")),
        (col("customer", "c_w_id"), col("district", "d_w_id")),
        (col("stock", "s_w_id"), col("warehouse", "w_id")),
        (col("stock", "s_i_id"), col("item", "i_id")),
    ];
    for (child, parent) in &fks {
        catalog.add_foreign_key(child, parent).unwrap();
    }
    catalog.set_partition_column(&warehouse.column("w_id")).unwrap();
    catalog.set_partition_column(&district.column("d_w_id")).unwrap();
    catalog.set_partition_column(&customer.column("c_w_id")).unwrap();
    catalog.set_partition_column(&stock.column("s_w_id")).unwrap();
    catalog.set_replicated(&item).unwrap();

    let neworder = catalog.add_procedure("neworder");
    catalog.add_parameter(&neworder, "w_id", false).unwrap();
    catalog.add_parameter(&neworder, "d_id", false).unwrap();
    catalog.add_parameter(&neworder, "i_ids", true).unwrap();
    catalog
        .add_statement(
            &neworder,
            "get_district",
            QueryType::Select,
            &[district.column("d_w_id"), district.column("d_id")],
            &[district.column("d_name")],
        )
        .unwrap();
    catalog
        .add_statement(
            &neworder,
            "get_item",
            QueryType::Select,
            &[item.column("i_id")],
            &[item.column("i_price"), item.column("i_name")],
        )
        .unwrap();
    catalog
        .add_statement(
            &neworder,
            "update_stock",
            QueryType::Update,
            &[stock.column("s_i_id"), stock.column("s_w_id"), stock.column("s_qty")],
            &[],
        )
        .unwrap();

    let payment = catalog.add_procedure("payment");
    catalog.add_parameter(&payment, "w_id", false).unwrap();
    catalog.add_parameter(&payment, "c_id", false).unwrap();
    catalog
        .add_statement(
            &payment,
            "get_customer",
            QueryType::Select,
            &[customer.column("c_id")],
            &[customer.column("c_w_id"), customer.column("c_balance")],
        )
        .unwrap();
    catalog
        .add_statement(
            &payment,
            "update_warehouse",
            QueryType::Update,
            &[warehouse.column("w_id")],
            &[],
        )
        .unwrap();

    let stats_proc = catalog.add_system_procedure("@Statistics");
    catalog.add_parameter(&stats_proc, "component", false).unwrap();

    let workload = WorkloadSummary::new()
        .with_procedure_count(neworder.clone(), 45)
        .with_procedure_count(payment.clone(), 43)
        .with_procedure_count(stats_proc, 100);

    let mut correlations = ParameterMappings::new();
    correlations.add(neworder.parameter("w_id"), col("district", "d_w_id"), 1.0);
    correlations.add(neworder.parameter("w_id"), col("stock", "s_w_id"), 0.9);
    correlations.add(neworder.parameter("d_id"), col("district", "d_w_id"), 0.2);
    correlations.add(payment.parameter("w_id"), col("customer", "c_w_id"), 1.0);
    correlations.add(payment.parameter("w_id"), col("warehouse", "w_id"), 1.0);
    correlations.add(payment.parameter("c_id"), col("customer", "c_w_id"), 0.1);

    let mut access_graph = AccessGraph::new();
    let mut edge = |a: &TableKey, b: &TableKey, weight: f64, columns: ColumnSet| {
        access_graph.add_edge(a.clone(), b.clone(), AccessEdge::new(weight, columns));
    };
    edge(
        &district,
        &district,
        45.0,
        ColumnSet::new().with([district.column("d_w_id"), district.column("d_id")], QueryType::Select),
    );
    edge(&item, &item, 45.0, ColumnSet::new().with([item.column("i_id")], QueryType::Select));
    edge(
        &stock,
        &item,
        45.0,
        ColumnSet::new().with(
            [stock.column("s_i_id"), item.column("i_id")],
            QueryType::Update | QueryType::Select,
        ),
    );
    edge(
        &stock,
        &stock,
        45.0,
        ColumnSet::new()
            .with([stock.column("s_w_id")], QueryType::Update)
            .with([stock.column("s_qty")], QueryType::Update),
    );
    edge(
        &customer,
        &customer,
        43.0,
        ColumnSet::new().with([customer.column("c_id")], QueryType::Select),
    );
    edge(
        &warehouse,
        &warehouse,
        43.0,
        ColumnSet::new().with([warehouse.column("w_id")], QueryType::Update),
    );
    edge(
        &warehouse,
        &district,
        10.0,
        ColumnSet::new().with([warehouse.column("w_id"), district.column("d_w_id")], QueryType::Select),
    );
    edge(
        &district,
        &customer,
        5.0,
        ColumnSet::new()
            .with([district.column("d_id"), customer.column("c_d_id")], QueryType::Select)
            .with([customer.column("c_last")], QueryType::Insert),
    );

    let mut stats = InMemoryStatistics::new();
    for table in [&warehouse, &district, &customer, &stock] {
        stats.add_table(table.clone(), TableStatistics::new(1_000_000, false));
    }
    stats.add_table(item.clone(), TableStatistics::new(1000, true));

    let hints = DesignerHints::from_json_str(
        r#"{ "force_replication_size_limit": 0.01, "max_memory_per_partition": 1000000 }"#,
    )
    .unwrap();

    let dependency_graph = DependencyGraph::from_catalog(&catalog).unwrap();
    Tpcc {
        catalog,
        stats,
        workload,
        correlations,
        access_graph,
        dependency_graph,
        hints,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn procedure_order_skips_system_procedures() {
    let tpcc = tpcc();
    let order = generate_procedure_order(&tpcc.context()).unwrap();
    assert_eq!(
        vec![ProcedureKey::new("neworder"), ProcedureKey::new("payment")],
        order
    );
}

#[test]
fn parameter_order_by_correlation() {
    let tpcc = tpcc();
    let registry = CompositeRegistry::new();

    let neworder =
        generate_parameter_order(&tpcc.context(), &ProcedureKey::new("neworder"), &registry)
            .unwrap();
    assert!(!neworder.fallback);
    assert_eq!(
        vec![param("neworder", "w_id"), param("neworder", "d_id")],
        neworder.candidates
    );
    assert!((neworder.weights[&param("neworder", "w_id")] - 0.9f64.sqrt()).abs() < 1e-9);

    let payment =
        generate_parameter_order(&tpcc.context(), &ProcedureKey::new("payment"), &registry)
            .unwrap();
    assert_eq!(
        vec![param("payment", "w_id"), param("payment", "c_id")],
        payment.candidates
    );
}

#[test]
fn table_order_replicates_item_first() {
    let tpcc = tpcc();
    let order = generate_table_order(&tpcc.context()).unwrap();
    // item is forced first, then the walk from item (heaviest root) reaches stock, and the walk
    // from warehouse visits district before customer.
    assert_eq!(
        tables(&["item", "stock", "warehouse", "district", "customer"]),
        order
    );
}

#[test]
fn column_orders() {
    let tpcc = tpcc();
    let ctx = tpcc.context();

    let item = generate_column_order(&ctx, &"item".into(), ReplicationPlacement::Auto).unwrap();
    assert_eq!(
        vec!["item.*replicated*", "item.i_id", "item.i_name", "item.i_price"],
        column_names(&item)
    );

    let district =
        generate_column_order(&ctx, &"district".into(), ReplicationPlacement::Auto).unwrap();
    assert_eq!(
        vec![
            "district.d_w_id",
            "district.d_id",
            "district.d_name",
            "district.*replicated*"
        ],
        column_names(&district)
    );
    let weights = column_access_weights(&ctx, &"district".into()).unwrap();
    assert_eq!(110.0, weights[&col("district", "d_w_id")]);
    assert_eq!(100.0, weights[&col("district", "d_id")]);

    // c_last is only ever inserted.
    let customer =
        generate_column_order(&ctx, &"customer".into(), ReplicationPlacement::Auto).unwrap();
    assert_eq!(
        vec![
            "customer.c_id",
            "customer.c_d_id",
            "customer.c_balance",
            "customer.c_last",
            "customer.c_w_id",
            "customer.*replicated*"
        ],
        column_names(&customer)
    );
}

#[test]
fn search_orderings_with_composite_parameters() {
    let mut tpcc = tpcc();
    tpcc.hints.enable_multi_partitioning = true;
    let registry = CompositeRegistry::new();
    let orderings = generate_search_orderings(&tpcc.context(), &registry).unwrap();

    assert_eq!(orderings.procedures.len(), orderings.parameters.len());
    assert_eq!(5, orderings.columns.len());
    assert_eq!(orderings.tables.len(), orderings.columns.len());

    // One composite per procedure: the array parameter never pairs up.
    assert_eq!(2, registry.len());
    let neworder = &orderings.parameters[&ProcedureKey::new("neworder")];
    let composite = registry
        .lookup([
            ProcedureKey::new("neworder").parameter("w_id"),
            ProcedureKey::new("neworder").parameter("d_id"),
        ])
        .unwrap();
    assert_eq!(
        vec![
            param("neworder", "w_id"),
            Attribute::Composite(composite),
            param("neworder", "d_id")
        ],
        neworder.candidates
    );

    // Running again reuses the registered composites.
    let again = generate_search_orderings(&tpcc.context(), &registry).unwrap();
    assert_eq!(orderings, again);
    assert_eq!(2, registry.len());
}

#[test]
fn multi_column_candidates_per_table() {
    let tpcc = tpcc();
    let registry = CompositeRegistry::new();
    let candidates = generate_multi_column_candidates(
        &tpcc.context(),
        &ProcedureKey::new("neworder"),
        &registry,
    )
    .unwrap();
    assert_eq!(tables(&["district", "item", "stock"]), candidates.keys().cloned().collect::<Vec<_>>());
    assert!(candidates.values().all(|c| c.len() == 3));
}

#[test]
fn vertical_partitioning_for_customer() {
    let tpcc = tpcc();
    let candidates =
        generate_vertical_partitioning_candidates(&tpcc.context(), &col("customer", "c_w_id"))
            .unwrap();
    assert_eq!(1, candidates.len());
    assert_eq!(
        vec![col("customer", "c_balance"), col("customer", "c_id")],
        candidates[0].columns().iter().cloned().collect::<Vec<_>>()
    );
    assert_eq!(1, candidates[0].statements().len());
}
