//! Shared test utilities: a recording fake connection and a small hotel schema.

use std::io::Write;

use serde_json::{json, Value};
use tempfile::NamedTempFile;

use crate::commands::Execute;
use crate::db::{Connection, DbError, DbErrorKind, RowSet, SERVER_VERSION_SQL};
use crate::schema::sql;

/// Create a temporary file containing the given content.
///
/// Used to hand JSON descriptors to commands that read `--spec` files.
pub fn create_temp_json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

#[derive(Debug)]
struct Canned {
    sql: String,
    params: Option<Vec<String>>,
    rows: RowSet,
}

/// In-memory [`Connection`] that records every statement.
///
/// Queries return canned rows matched by statement text (and optionally by
/// parameters); unknown queries return no rows. Statements registered with
/// [`MockConnection::fail_on`] fail with the given error kind.
#[derive(Debug, Default)]
pub struct MockConnection {
    canned: Vec<Canned>,
    failures: Vec<(String, DbErrorKind)>,
    statements: Vec<String>,
    params: Vec<Vec<String>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default().with_server_version(160004)
    }

    pub fn with_server_version(self, version: u32) -> Self {
        let rows = RowSet::new(&["server_version_num"]).with_row(vec![json!(version.to_string())]);
        self.with_rows(SERVER_VERSION_SQL, rows)
    }

    /// Answer `sql` with `rows` whatever the parameters.
    pub fn with_rows(mut self, sql: &str, rows: RowSet) -> Self {
        self.canned.retain(|c| !(c.sql == sql && c.params.is_none()));
        self.canned.push(Canned {
            sql: sql.to_string(),
            params: None,
            rows,
        });
        self
    }

    /// Answer `sql` with `rows` only when called with exactly `params`.
    pub fn with_rows_for(mut self, sql: &str, params: &[&str], rows: RowSet) -> Self {
        self.canned.push(Canned {
            sql: sql.to_string(),
            params: Some(params.iter().map(|p| p.to_string()).collect()),
            rows,
        });
        self
    }

    pub fn fail_on(mut self, sql: &str, kind: DbErrorKind) -> Self {
        self.failures.push((sql.to_string(), kind));
        self
    }

    /// Every statement seen so far, transaction markers included.
    pub fn statements(&self) -> Vec<String> {
        self.statements.clone()
    }

    /// Parameters of every statement, parallel to [`MockConnection::statements`].
    pub fn params(&self) -> Vec<Vec<String>> {
        self.params.clone()
    }

    /// Statements other than catalog reads and transaction markers.
    pub fn writes(&self) -> Vec<String> {
        self.statements
            .iter()
            .filter(|s| !s.starts_with("SELECT") && !matches!(s.as_str(), "BEGIN" | "COMMIT" | "ROLLBACK"))
            .cloned()
            .collect()
    }

    fn record(&mut self, sql: &str, params: &[String]) -> Result<(), DbError> {
        self.statements.push(sql.to_string());
        self.params.push(params.to_vec());
        match self.failures.iter().find(|(s, _)| s == sql) {
            Some((_, kind)) => Err(DbError::execution(*kind, sql, "simulated failure")),
            None => Ok(()),
        }
    }

    fn lookup(&self, sql: &str, params: &[String]) -> RowSet {
        let exact = self
            .canned
            .iter()
            .find(|c| c.sql == sql && c.params.as_deref() == Some(params));
        let any = || self.canned.iter().find(|c| c.sql == sql && c.params.is_none());
        exact.or_else(any).map(|c| c.rows.clone()).unwrap_or_default()
    }
}

impl Connection for MockConnection {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    fn query(&mut self, sql: &str, params: &[String]) -> Result<RowSet, DbError> {
        self.record(sql, params)?;
        Ok(self.lookup(sql, params))
    }

    fn execute(&mut self, sql: &str, params: &[String]) -> Result<u64, DbError> {
        self.record(sql, params)?;
        Ok(0)
    }

    fn batch(&mut self, sql: &str) -> Result<(), DbError> {
        self.record(sql, &[])
    }
}

// =============================================================================
// Hotel schema fixture
// =============================================================================

const COLUMN_FIELDS: &[&str] = &[
    "name",
    "declared_type",
    "nullable",
    "default_expression",
    "max_length",
    "type_kind",
    "type_name",
    "enum_labels",
];

const CONSTRAINT_FIELDS: &[&str] = &[
    "name",
    "kind",
    "columns",
    "ref_schema",
    "ref_table",
    "ref_columns",
    "on_delete",
    "on_update",
    "definition",
];

fn column(name: &str, declared: &str, nullable: bool, default: Value, max_len: Value, kind: &str, type_name: &str) -> Vec<Value> {
    vec![json!(name), json!(declared), json!(nullable), default, max_len, json!(kind), json!(type_name), Value::Null]
}

fn local_constraint(name: &str, kind: &str, columns: &[&str], definition: &str) -> Vec<Value> {
    vec![json!(name), json!(kind), json!(columns), Value::Null, Value::Null, json!([]), json!(" "), json!(" "), json!(definition)]
}

fn rooms_columns() -> RowSet {
    let mut comfort = column("comfort", "comfort_level", false, json!("'standard'::comfort_level"), Value::Null, "e", "comfort_level");
    comfort[7] = json!(["standard", "semi_lux", "lux"]);
    RowSet::new(COLUMN_FIELDS)
        .with_row(column("id", "integer", false, json!("nextval('rooms_id_seq'::regclass)"), Value::Null, "b", "int4"))
        .with_row(column("room_number", "character varying(10)", false, Value::Null, json!(10), "b", "varchar"))
        .with_row(comfort)
        .with_row(column("price", "numeric(10,2)", true, Value::Null, Value::Null, "b", "numeric"))
        .with_row(column("tags", "text[]", true, Value::Null, Value::Null, "b", "_text"))
}

fn rooms_constraints() -> RowSet {
    RowSet::new(CONSTRAINT_FIELDS)
        .with_row(local_constraint("rooms_price_check", "c", &["price"], "CHECK ((price > (0)::numeric))"))
        .with_row(local_constraint("rooms_pkey", "p", &["id"], "PRIMARY KEY (id)"))
        .with_row(local_constraint("rooms_room_number_key", "u", &["room_number"], "UNIQUE (room_number)"))
}

fn stays_columns() -> RowSet {
    RowSet::new(COLUMN_FIELDS)
        .with_row(column("id", "integer", false, json!("nextval('stays_id_seq'::regclass)"), Value::Null, "b", "int4"))
        .with_row(column("room_id", "integer", false, Value::Null, Value::Null, "b", "int4"))
        .with_row(column("guest", "text", false, Value::Null, Value::Null, "b", "text"))
        .with_row(column("check_in", "date", false, Value::Null, Value::Null, "b", "date"))
        .with_row(column("check_out", "date", true, Value::Null, Value::Null, "b", "date"))
        .with_row(column("nights", "integer", true, Value::Null, Value::Null, "b", "int4"))
        .with_row(column("paid", "boolean", false, json!("false"), Value::Null, "b", "bool"))
}

fn stays_constraints() -> RowSet {
    RowSet::new(CONSTRAINT_FIELDS)
        .with_row(local_constraint("stays_nights_check", "c", &["nights"], "CHECK ((nights > 0))"))
        .with_row(vec![
            json!("stays_room_id_fkey"),
            json!("f"),
            json!(["room_id"]),
            json!("public"),
            json!("rooms"),
            json!(["id"]),
            json!("c"),
            json!("a"),
            json!("FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE CASCADE"),
        ])
        .with_row(local_constraint("stays_pkey", "p", &["id"], "PRIMARY KEY (id)"))
}

fn user_types() -> RowSet {
    RowSet::new(&["name", "kind", "labels", "field_names", "field_types"])
        .with_row(vec![json!("address"), json!("c"), json!([]), json!(["city", "zip"]), json!(["text", "character varying(10)"])])
        .with_row(vec![json!("comfort_level"), json!("e"), json!(["standard", "semi_lux", "lux"]), json!([]), json!([])])
}

/// Fake connection answering catalog reads for `public.rooms` and `public.stays`.
///
/// `rooms(id integer pk, room_number varchar(10) unique, comfort comfort_level,
/// price numeric(10,2) check > 0, tags text[])` and `stays(id integer pk,
/// room_id integer fk -> rooms.id on delete cascade, guest text, check_in date,
/// check_out date, nights integer check > 0, paid boolean)`.
pub fn hotel_connection() -> MockConnection {
    MockConnection::new()
        .with_rows(
            sql::LIST_TABLES,
            RowSet::new(&["table_name"])
                .with_row(vec![json!("rooms")])
                .with_row(vec![json!("stays")]),
        )
        .with_rows_for(sql::TABLE_COLUMNS, &["public", "rooms"], rooms_columns())
        .with_rows_for(sql::TABLE_CONSTRAINTS, &["public", "rooms"], rooms_constraints())
        .with_rows_for(sql::TABLE_COLUMNS, &["public", "stays"], stays_columns())
        .with_rows_for(sql::TABLE_CONSTRAINTS, &["public", "stays"], stays_constraints())
        .with_rows(sql::USER_TYPES, user_types())
}

/// Execute a command against a connection and return the result.
pub fn execute_cmd<C: Execute>(
    cmd: C,
    conn: &mut dyn Connection,
) -> Result<C::Output, Box<dyn std::error::Error>> {
    cmd.execute(conn, crate::db::DEFAULT_SCHEMA)
}
