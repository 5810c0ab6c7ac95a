use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rusqlite::{Connection, params};

use super::document::decode_document;

pub(crate) struct OrderStore {
    connection: Connection,
}

impl OrderStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        let connection = Connection::open(db_path)
            .with_context(|| format!("failed to open {}", db_path.display()))?;
        configure_connection(&connection)?;
        Ok(Self { connection })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let connection =
            Connection::open_in_memory().context("failed to open in-memory database")?;
        connection
            .pragma_update(None, "foreign_keys", "ON")
            .context("failed to enable foreign key enforcement")?;
        Ok(Self { connection })
    }

    // Only a clean "not there" answer from sqlite_master counts as
    // schema-missing; any probe error propagates instead of triggering a
    // bootstrap.
    pub fn schema_exists(&self) -> Result<bool> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'order'",
                [],
                |row| row.get(0),
            )
            .context("failed to probe for storefront schema")?;
        Ok(count > 0)
    }

    // order_details rows follow their parent on delete (single-unit
    // semantics between the two tables).
    pub fn bootstrap(&self) -> Result<()> {
        self.connection
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS \"order\" (
                  order_id INTEGER PRIMARY KEY AUTOINCREMENT,
                  order_date TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS order_details (
                  order_detail_id INTEGER PRIMARY KEY AUTOINCREMENT,
                  quantity INTEGER NOT NULL,
                  item_description TEXT,
                  order_id INTEGER DEFAULT NULL,
                  FOREIGN KEY (order_id)
                    REFERENCES \"order\" (order_id) ON DELETE CASCADE
                );

                CREATE INDEX IF NOT EXISTS idx_order_details_order ON order_details(order_id);
                ",
            )
            .context("failed to create storefront schema")
    }

    // One transaction per order: the order row and every detail row commit
    // together or not at all. Returns the generated order id and the number
    // of detail rows written.
    pub fn add_order(
        &mut self,
        order_date: NaiveDateTime,
        document: &str,
    ) -> Result<(i64, usize)> {
        let items = decode_document(document)?;
        if items.is_empty() {
            bail!("refusing to persist an order with no line items");
        }

        let tx = self
            .connection
            .transaction()
            .context("failed to start order transaction")?;

        tx.execute(
            "INSERT INTO \"order\"(order_date) VALUES(?1)",
            params![order_date],
        )
        .context("failed to insert order row")?;
        let order_id = tx.last_insert_rowid();

        let mut inserted = 0_usize;
        {
            let mut statement = tx
                .prepare(
                    "INSERT INTO order_details(quantity, item_description, order_id)
                     VALUES(?1, ?2, ?3)",
                )
                .context("failed to prepare detail insert")?;

            for item in &items {
                statement
                    .execute(params![item.quantity, item.description, order_id])
                    .with_context(|| {
                        format!("failed to insert detail row for order {order_id}")
                    })?;
                inserted += 1;
            }
        }

        tx.commit().context("failed to commit order transaction")?;
        Ok((order_id, inserted))
    }

    pub fn count_orders(&self) -> Result<i64> {
        query_count(&self.connection, "SELECT COUNT(*) FROM \"order\"")
    }

    pub fn count_details(&self) -> Result<i64> {
        query_count(&self.connection, "SELECT COUNT(*) FROM order_details")
    }

    #[cfg(test)]
    pub fn delete_order(&self, order_id: i64) -> Result<usize> {
        self.connection
            .execute("DELETE FROM \"order\" WHERE order_id = ?1", params![order_id])
            .with_context(|| format!("failed to delete order {order_id}"))
    }
}

fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    connection
        .pragma_update(None, "foreign_keys", "ON")
        .context("failed to enable foreign key enforcement")?;
    Ok(())
}

fn query_count(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}
