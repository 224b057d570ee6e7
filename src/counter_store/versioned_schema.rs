pub struct Table {
    pub name: &'static str,
    pub schema: &'static str,
    pub indices: &'static [&'static str],
}

const COUNTERS_TABLE_V_0: Table = Table {
    name: "counters",
    schema: "CREATE TABLE counters (tbl TEXT NOT NULL, field TEXT NOT NULL, count INTEGER NOT NULL DEFAULT 0, PRIMARY KEY (tbl, field));",
    indices: &["CREATE INDEX counters_tbl_index ON counters (tbl);"],
};
const ENTRIES_TABLE_V_0: Table = Table {
    name: "entries",
    schema: "CREATE TABLE entries (tbl TEXT NOT NULL, field TEXT NOT NULL, value TEXT NOT NULL, created INTEGER DEFAULT (cast(strftime('%s','now') as int)), PRIMARY KEY (tbl, field));",
    indices: &["CREATE INDEX entries_tbl_index ON entries (tbl);"],
};

pub struct VersionedSchema {
    pub version: u32,
    pub tables: &'static [Table],
}

pub const VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[COUNTERS_TABLE_V_0, ENTRIES_TABLE_V_0],
}];
