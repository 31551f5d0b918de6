use std::hash::{Hash, Hasher};
use std::sync::Arc;

use arrow_schema::{DataType, Field, Schema};
use strum_macros::Display;

use crate::catalog::QualifiedName;

pub type TableId = u64;
pub type PartitionId = u64;
pub type TableRef = Arc<TableDesc>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum TableKind {
    #[strum(serialize = "OLAP table")]
    Olap,
    #[strum(serialize = "external table")]
    External,
    #[strum(serialize = "view")]
    View,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColumnDesc {
    name: String,
    data_type: DataType,
    nullable: bool,
    is_key: bool,
}

impl ColumnDesc {
    pub fn new<S: Into<String>>(name: S, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
            is_key: false,
        }
    }

    pub fn key<S: Into<String>>(name: S, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: false,
            is_key: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_key(&self) -> bool {
        self.is_key
    }
}

impl From<&Field> for ColumnDesc {
    fn from(field: &Field) -> Self {
        ColumnDesc::new(field.name(), field.data_type().clone(), field.is_nullable())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PartitionDesc {
    id: PartitionId,
    name: String,
    temporary: bool,
}

impl PartitionDesc {
    pub fn new<S: Into<String>>(id: PartitionId, name: S) -> Self {
        Self {
            id,
            name: name.into(),
            temporary: false,
        }
    }

    pub fn temporary<S: Into<String>>(id: PartitionId, name: S) -> Self {
        Self {
            id,
            name: name.into(),
            temporary: true,
        }
    }

    pub fn id(&self) -> PartitionId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }
}

/// Resolved table handle.
///
/// Two handles are the same table iff their ids are equal.
#[derive(Clone, Debug)]
pub struct TableDesc {
    id: TableId,
    name: QualifiedName,
    kind: TableKind,
    columns: Vec<ColumnDesc>,
    partitions: Vec<PartitionDesc>,
    temp_partitions: Vec<PartitionDesc>,
    partial_update: bool,
}

impl TableDesc {
    pub fn new<I>(id: TableId, name: QualifiedName, kind: TableKind, columns: I) -> Self
    where
        I: IntoIterator<Item = ColumnDesc>,
    {
        Self {
            id,
            name,
            kind,
            columns: columns.into_iter().collect(),
            partitions: vec![],
            temp_partitions: vec![],
            partial_update: false,
        }
    }

    /// Builds an OLAP table from an arrow schema. The first `key_count` fields become key columns.
    pub fn from_schema(id: TableId, name: QualifiedName, schema: &Schema, key_count: usize) -> Self {
        let columns = schema.fields().iter().enumerate().map(|(idx, field)| {
            if idx < key_count {
                ColumnDesc::key(field.name(), field.data_type().clone())
            } else {
                ColumnDesc::new(field.name(), field.data_type().clone(), field.is_nullable())
            }
        });
        TableDesc::new(id, name, TableKind::Olap, columns)
    }

    pub fn with_partitions<I: IntoIterator<Item = PartitionDesc>>(mut self, partitions: I) -> Self {
        for p in partitions {
            if p.is_temporary() {
                self.temp_partitions.push(p);
            } else {
                self.partitions.push(p);
            }
        }
        self
    }

    pub fn with_partial_update(mut self, partial_update: bool) -> Self {
        self.partial_update = partial_update;
        self
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn columns(&self) -> &[ColumnDesc] {
        &self.columns
    }

    pub fn key_columns(&self) -> impl Iterator<Item = &ColumnDesc> {
        self.columns.iter().filter(|c| c.is_key())
    }

    pub fn column(&self, name: &str, case_sensitive: bool) -> Option<&ColumnDesc> {
        self.columns.iter().find(|c| {
            if case_sensitive {
                c.name() == name
            } else {
                c.name().eq_ignore_ascii_case(name)
            }
        })
    }

    /// Partition names are case insensitive. `temporary` selects the namespace searched.
    pub fn partition(&self, name: &str, temporary: bool) -> Option<&PartitionDesc> {
        let partitions = if temporary {
            &self.temp_partitions
        } else {
            &self.partitions
        };
        partitions
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    pub fn supports_partial_update(&self) -> bool {
        self.partial_update
    }

    pub fn schema(&self) -> Schema {
        Schema::new(
            self.columns
                .iter()
                .map(|c| Field::new(c.name(), c.data_type().clone(), c.nullable()))
                .collect::<Vec<_>>(),
        )
    }
}

impl PartialEq for TableDesc {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TableDesc {}

impl Hash for TableDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
