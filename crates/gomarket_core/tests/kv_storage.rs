use gomarket_core::db::migrations::{latest_version, schema_version};
use gomarket_core::db::{open_db, open_db_in_memory};
use gomarket_core::{
    CartStore, DecrementPolicy, KeyValueStore, KvCartRepository, NewCartItem,
    SqliteKeyValueStore, StorageError, DEFAULT_CART_STORAGE_KEY,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert!(SqliteKeyValueStore::try_new(conn).is_ok());
}

#[test]
fn reopening_same_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.db");

    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn recorded_version_without_kv_table_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stale.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(err, StorageError::MissingTable));
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        StorageError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unmigrated_connection_is_rejected() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteKeyValueStore::try_new(conn).err().unwrap();
    assert!(matches!(err, StorageError::MissingTable));
}

#[test]
fn sqlite_store_upserts_and_removes() {
    let store = SqliteKeyValueStore::try_new(open_db_in_memory().unwrap()).unwrap();

    assert_eq!(store.get("slot").unwrap(), None);
    store.set("slot", "[]").unwrap();
    store.set("slot", "[1]").unwrap();
    assert_eq!(store.get("slot").unwrap().as_deref(), Some("[1]"));

    store.remove("slot").unwrap();
    store.remove("slot").unwrap();
    assert_eq!(store.get("slot").unwrap(), None);
}

#[test]
fn cart_survives_database_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.db");

    {
        let kv = SqliteKeyValueStore::try_new(open_db(&path).unwrap()).unwrap();
        let store = CartStore::open(
            KvCartRepository::new(kv, DEFAULT_CART_STORAGE_KEY),
            DecrementPolicy::FloorAtOne,
        );
        store.add_to_cart(NewCartItem::new("A", "Shirt", "u", 10.0)).unwrap();
        store.add_to_cart(NewCartItem::new("A", "Shirt", "u", 10.0)).unwrap();
        store.add_to_cart(NewCartItem::new("B", "Cap", "u", 5.0)).unwrap();
    }

    let kv = SqliteKeyValueStore::try_new(open_db(&path).unwrap()).unwrap();
    let raw = kv.get(DEFAULT_CART_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["id"], "A");
    assert_eq!(json[0]["image_url"], "u");
    assert_eq!(json[0]["quantity"], 2);

    let store = CartStore::open(
        KvCartRepository::new(kv, DEFAULT_CART_STORAGE_KEY),
        DecrementPolicy::FloorAtOne,
    );
    let products = store.products();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].quantity, 2);
    assert_eq!(products[1].id, "B");
}
