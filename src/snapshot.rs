use std::path::Path;

use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

use crate::stats::unix_now;
use crate::store::StoreInner;

// Every save appends rows under a fresh saveID; consumers recover the
// latest snapshot by joining on the largest lastsave.
const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS typeStore(
    ID INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    dbID INTEGER NOT NULL,
    key TEXT NOT NULL,
    typ TEXT NOT NULL,
    saveID TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS kvStore(
    ID INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    dbID INTEGER NOT NULL,
    key TEXT NOT NULL,
    val TEXT NOT NULL,
    saveID TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS setStore(
    ID INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    dbID INTEGER NOT NULL,
    key TEXT NOT NULL,
    val TEXT NOT NULL,
    saveID TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS listStore(
    ID INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
    dbID INTEGER NOT NULL,
    key TEXT NOT NULL,
    elemIndex INTEGER NOT NULL,
    val TEXT NOT NULL,
    saveID TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS lastsave(
    saveID TEXT NOT NULL PRIMARY KEY,
    lastsave INTEGER NOT NULL
);
";

/// Serializes every database into the snapshot store, tagged by a freshly
/// generated save identifier. The caller holds the engine lock for the
/// duration, so the rows form a point-in-time consistent view. Returns the
/// wall-clock seconds recorded in the lastsave table.
pub fn write_snapshot(store: &StoreInner, path: &Path) -> rusqlite::Result<i64> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(CREATE_TABLES)?;

    let save_id = Uuid::new_v4().to_string();
    let tx = conn.transaction()?;
    {
        let mut type_rows =
            tx.prepare("INSERT INTO typeStore(dbID, key, typ, saveID) VALUES (?1, ?2, ?3, ?4)")?;
        let mut kv_rows =
            tx.prepare("INSERT INTO kvStore(dbID, key, val, saveID) VALUES (?1, ?2, ?3, ?4)")?;
        let mut set_rows =
            tx.prepare("INSERT INTO setStore(dbID, key, val, saveID) VALUES (?1, ?2, ?3, ?4)")?;
        let mut list_rows = tx.prepare(
            "INSERT INTO listStore(dbID, key, elemIndex, val, saveID) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        for (db_id, db) in store.databases().enumerate() {
            let db_id = db_id as i64;
            for (key, typ) in db.type_entries() {
                type_rows.execute(params![db_id, key.as_ref(), typ.as_str(), save_id])?;
            }
            for (key, value) in db.string_entries() {
                kv_rows.execute(params![db_id, key.as_ref(), value.as_ref(), save_id])?;
            }
            for (key, members) in db.set_entries() {
                for member in members {
                    set_rows.execute(params![db_id, key.as_ref(), member.as_ref(), save_id])?;
                }
            }
            for (key, elements) in db.list_entries() {
                for (index, element) in elements.iter().enumerate() {
                    list_rows.execute(params![
                        db_id,
                        key.as_ref(),
                        index as i64,
                        element.as_ref(),
                        save_id
                    ])?;
                }
            }
        }
    }

    let saved_at = unix_now();
    tx.execute(
        "INSERT INTO lastsave(saveID, lastsave) VALUES (?1, ?2)",
        params![save_id, saved_at],
    )?;
    tx.commit()?;

    info!(%save_id, "snapshot written");
    Ok(saved_at)
}
