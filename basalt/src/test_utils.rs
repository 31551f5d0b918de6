use std::collections::HashMap;
use std::sync::Arc;

use arrow_schema::Schema;
use maplit::hashmap;

use crate::catalog::{
    Catalog, MemoryCatalog, PartitionDesc, QualifiedName, TableDesc, TableKind, TableRef,
};
use crate::optimizer::{OptimizerContext, SessionVariables, INTERNAL_CATALOG};

pub const T1_SCHEMA_JSON: &str = r#"{
                "fields": [
                    {
                        "name": "c1",
                        "nullable": false,
                        "data_type": "Int64",
                        "dict_id": 0,
                        "dict_is_ordered": false,
                        "metadata": {}
                    },
                    {
                        "name": "c2",
                        "nullable": true,
                        "data_type": "Utf8",
                        "dict_id": 0,
                        "dict_is_ordered": false,
                        "metadata": {}
                    },
                    {
                        "name": "c3",
                        "nullable": false,
                        "data_type": "Int64",
                        "dict_id": 0,
                        "dict_is_ordered": false,
                        "metadata": {}
                    }
                ],
                "metadata": {}
            }"#;

pub const T2_SCHEMA_JSON: &str = r#"{
                "fields": [
                    {
                        "name": "c1",
                        "nullable": false,
                        "data_type": "Int64",
                        "dict_id": 0,
                        "dict_is_ordered": false,
                        "metadata": {}
                    },
                    {
                        "name": "c4",
                        "nullable": true,
                        "data_type": "Int64",
                        "dict_id": 0,
                        "dict_is_ordered": false,
                        "metadata": {}
                    }
                ],
                "metadata": {}
            }"#;

pub const SALES_SCHEMA_JSON: &str = r#"{
                "fields": [
                    {
                        "name": "id",
                        "nullable": false,
                        "data_type": "Int64",
                        "dict_id": 0,
                        "dict_is_ordered": false,
                        "metadata": {}
                    },
                    {
                        "name": "amount",
                        "nullable": false,
                        "data_type": "Int64",
                        "dict_id": 0,
                        "dict_is_ordered": false,
                        "metadata": {}
                    },
                    {
                        "name": "note",
                        "nullable": true,
                        "data_type": "Utf8",
                        "dict_id": 0,
                        "dict_is_ordered": false,
                        "metadata": {}
                    }
                ],
                "metadata": {}
            }"#;

pub fn schema_from_json(json: &str) -> Schema {
    serde_json::from_str(json).unwrap()
}

pub fn internal_name(database: &str, table: &str) -> QualifiedName {
    QualifiedName::new(INTERNAL_CATALOG, database, table)
}

/// Catalog shared by tests:
///
/// * `db1.t1(c1, c2, c3)`, `db1.t2(c1, c4)`: plain OLAP tables, first column is the key;
/// * `db1.sales(id, amount, note)`: supports partial update, key `id`;
/// * `db1.events(c1, c2, c3)`: regular partitions `p0`, `p1`, temporary partitions `p1`, `p2`;
/// * `db1.v1`: a view, `db1.ext`: an external table;
/// * `db2.t1(c1, c4)`.
pub fn build_catalog_for_test() -> Arc<MemoryCatalog> {
    let catalog = MemoryCatalog::new();

    let schemas: HashMap<&str, Schema> = hashmap! {
        "t1" => schema_from_json(T1_SCHEMA_JSON),
        "t2" => schema_from_json(T2_SCHEMA_JSON),
        "sales" => schema_from_json(SALES_SCHEMA_JSON),
    };

    catalog.register_table(TableDesc::from_schema(
        1,
        internal_name("db1", "t1"),
        &schemas["t1"],
        1,
    ));
    catalog.register_table(TableDesc::from_schema(
        2,
        internal_name("db1", "t2"),
        &schemas["t2"],
        1,
    ));
    catalog.register_table(
        TableDesc::from_schema(3, internal_name("db1", "sales"), &schemas["sales"], 1)
            .with_partial_update(true),
    );
    catalog.register_table(
        TableDesc::from_schema(4, internal_name("db1", "events"), &schemas["t1"], 1)
            .with_partitions(vec![
                PartitionDesc::new(100, "p0"),
                PartitionDesc::new(101, "p1"),
                PartitionDesc::temporary(201, "p1"),
                PartitionDesc::temporary(202, "p2"),
            ]),
    );
    catalog.register_table(TableDesc::new(
        5,
        internal_name("db1", "v1"),
        TableKind::View,
        TableDesc::from_schema(0, internal_name("db1", "v1"), &schemas["t2"], 0)
            .columns()
            .to_vec(),
    ));
    catalog.register_table(TableDesc::new(
        6,
        internal_name("db1", "ext"),
        TableKind::External,
        TableDesc::from_schema(0, internal_name("db1", "ext"), &schemas["t2"], 0)
            .columns()
            .to_vec(),
    ));
    catalog.register_table(TableDesc::from_schema(
        7,
        internal_name("db2", "t1"),
        &schemas["t2"],
        1,
    ));

    Arc::new(catalog)
}

/// Context over [`build_catalog_for_test`] with `db1` as current database.
pub fn build_context_for_test() -> OptimizerContext {
    OptimizerContext::new(
        build_catalog_for_test(),
        SessionVariables::default().with_current_database("db1"),
    )
}

pub fn table_for_test(context: &OptimizerContext, database: &str, table: &str) -> TableRef {
    context.catalog.table(&internal_name(database, table)).unwrap()
}
