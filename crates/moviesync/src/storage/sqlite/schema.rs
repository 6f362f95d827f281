//! SQL statement builders.
//!
//! Every table has a locally assigned `row_id` surrogate key and a `UNIQUE`
//! natural `id` column. Statements are built from a table name and its column
//! list so one store implementation serves every entity type. Pure string
//! building, no I/O.

/// Column name and SQL type declaration.
pub type Column = (&'static str, &'static str);

fn column_names(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|n| format!("?{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `CREATE TABLE IF NOT EXISTS` with the surrogate key prepended.
pub fn create_table(table: &str, columns: &[Column]) -> String {
    let definitions = columns
        .iter()
        .map(|(name, kind)| format!("    {name} {kind}"))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n    row_id INTEGER PRIMARY KEY AUTOINCREMENT,\n{definitions}\n);"
    )
}

/// Insert that replaces every column of an existing row with the same `id`.
///
/// The surrogate `row_id` is kept on conflict.
pub fn upsert(table: &str, columns: &[Column]) -> String {
    let assignments = columns
        .iter()
        .filter(|(name, _)| *name != "id")
        .map(|(name, _)| format!("{name} = excluded.{name}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "INSERT INTO {table} ({}) VALUES ({}) ON CONFLICT(id) DO UPDATE SET {assignments}",
        column_names(columns),
        placeholders(columns.len()),
    )
}

/// Full-table select. Without an explicit order rows come back in insertion
/// order. `paginated` appends `LIMIT ?1 OFFSET ?2`.
pub fn select_all(
    table: &str,
    columns: &[Column],
    order_by: Option<&str>,
    paginated: bool,
) -> String {
    let mut sql = format!(
        "SELECT {} FROM {table} ORDER BY {}",
        column_names(columns),
        order_by.unwrap_or("row_id ASC"),
    );
    if paginated {
        sql.push_str(" LIMIT ?1 OFFSET ?2");
    }
    sql
}

pub fn select_by_id(table: &str, columns: &[Column]) -> String {
    format!(
        "SELECT {} FROM {table} WHERE id = ?1",
        column_names(columns)
    )
}

/// Update of every non-id column. Parameters follow column order, so `id`
/// binds wherever it appears in `columns`.
pub fn update_by_id(table: &str, columns: &[Column]) -> String {
    let mut id_param = 1;
    let assignments = columns
        .iter()
        .enumerate()
        .filter_map(|(index, (name, _))| {
            if *name == "id" {
                id_param = index + 1;
                None
            } else {
                Some(format!("{name} = ?{}", index + 1))
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("UPDATE {table} SET {assignments} WHERE id = ?{id_param}")
}

pub fn delete_by_id(table: &str) -> String {
    format!("DELETE FROM {table} WHERE id = ?1")
}

pub fn delete_all(table: &str) -> String {
    format!("DELETE FROM {table}")
}
