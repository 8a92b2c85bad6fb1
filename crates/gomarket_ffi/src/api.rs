//! FFI cart API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the process-wide cart store to Dart via FRB.
//! - Translate core results into flat response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Cart calls made before `cart_init` fail fast with `cart_not_initialized`.
//! - Storage failures never surface here; the core logs and absorbs them.

use gomarket_core::db::open_db;
use gomarket_core::{
    core_version as core_version_inner, default_log_level as default_log_level_inner,
    init_logging as init_logging_inner, ping as ping_inner, CartChange, CartConfig, CartItem,
    CartServiceError, CartStore, KvCartRepository, NewCartItem, SqliteKeyValueStore,
};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const CART_DB_FILE_NAME: &str = "gomarket_cart.sqlite3";
const DB_PATH_ENV: &str = "GOMARKET_DB_PATH";

type SharedCartStore = CartStore<KvCartRepository<SqliteKeyValueStore>>;

static CART: OnceLock<CartHandle> = OnceLock::new();

struct CartHandle {
    db_path: PathBuf,
    store: SharedCartStore,
}

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Suggested log level for the current build (`debug` or `info`).
#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    default_log_level_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One cart line as seen by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

/// Response envelope shared by every cart call.
#[derive(Debug, Clone, PartialEq)]
pub struct CartResponse {
    /// Whether the call was accepted.
    pub ok: bool,
    /// Cart lines after the call (current lines on failure when available).
    pub products: Vec<CartLine>,
    /// Badge count: sum of quantities.
    pub total_quantity: u64,
    /// Sum of `price * quantity`.
    pub subtotal: f64,
    /// Store revision; changes whenever the cart changes.
    pub revision: u64,
    /// Whether this call changed the cart.
    pub changed: bool,
    /// Stable machine-readable code on failure
    /// (`cart_not_initialized|item_not_found|invalid_item`).
    pub error_code: Option<String>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

impl CartResponse {
    fn from_change(change: CartChange, message: impl Into<String>) -> Self {
        let mut response = Self::listing(change.revision, &change.products, message);
        response.changed = change.changed;
        response
    }

    fn listing(revision: u64, products: &[CartItem], message: impl Into<String>) -> Self {
        Self {
            ok: true,
            products: products.iter().map(to_cart_line).collect(),
            total_quantity: products.iter().map(|item| u64::from(item.quantity)).sum(),
            subtotal: products.iter().map(CartItem::line_total).sum(),
            revision,
            changed: false,
            error_code: None,
            message: message.into(),
        }
    }

    fn failure(error_code: &str, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            products: Vec::new(),
            total_quantity: 0,
            subtotal: 0.0,
            revision: 0,
            changed: false,
            error_code: Some(error_code.to_string()),
            message: message.into(),
        }
    }
}

/// Opens cart storage and hydrates the process-wide cart store.
///
/// Path resolution: `db_path` argument, then `GOMARKET_DB_PATH`, then a
/// temp-dir default.
///
/// # FFI contract
/// - Idempotent for the same `db_path`, or when `db_path` is `None`.
/// - A later call naming a different `db_path` is rejected; the first store
///   stays active.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_init(db_path: Option<String>) -> String {
    let requested = explicit_db_path(db_path.as_deref());
    if let Some(active) = CART.get() {
        return confirm_active(active, requested.as_deref());
    }

    let db_path = resolve_db_path(db_path);
    let store = match build_store(&db_path) {
        Ok(store) => store,
        Err(err) => {
            error!("event=cart_init module=ffi status=error error={err}");
            return err;
        }
    };
    info!(
        "event=cart_init module=ffi status=ok policy={} items={}",
        store.policy().as_str(),
        store.products().len()
    );

    // A concurrent init may have won the slot; compare against whichever
    // store is active.
    let _ = CART.set(CartHandle {
        db_path: db_path.clone(),
        store,
    });
    match CART.get() {
        Some(active) => confirm_active(active, Some(db_path.as_path())),
        None => "cart store unavailable after init".to_string(),
    }
}

/// Returns current cart lines.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_products() -> CartResponse {
    run_cart_op(active_store(), "cart_products", |store| {
        let snapshot = store.snapshot();
        Ok(CartResponse::listing(
            snapshot.revision,
            &snapshot.products,
            "Cart loaded.",
        ))
    })
}

/// Adds one unit of a product; a new product starts at quantity 1.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_add(id: String, title: String, image_url: String, price: f64) -> CartResponse {
    let item = NewCartItem::new(id.trim(), title, image_url, price);
    run_cart_op(active_store(), "cart_add", move |store| {
        store
            .add_to_cart(item)
            .map(|change| CartResponse::from_change(change, "Added to cart."))
    })
}

/// Adds one unit to an existing cart line.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_increment(id: String) -> CartResponse {
    run_cart_op(active_store(), "cart_increment", |store| {
        store
            .increment(id.trim())
            .map(|change| CartResponse::from_change(change, "Quantity increased."))
    })
}

/// Removes one unit from an existing cart line.
///
/// At quantity 1 the configured decrement policy decides (default: no-op).
#[flutter_rust_bridge::frb(sync)]
pub fn cart_decrement(id: String) -> CartResponse {
    run_cart_op(active_store(), "cart_decrement", |store| {
        store.decrement(id.trim()).map(|change| {
            let message = if change.changed {
                "Quantity decreased."
            } else {
                "Quantity unchanged."
            };
            CartResponse::from_change(change, message)
        })
    })
}

/// Removes a cart line regardless of quantity.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_remove(id: String) -> CartResponse {
    run_cart_op(active_store(), "cart_remove", |store| {
        store
            .remove(id.trim())
            .map(|change| CartResponse::from_change(change, "Removed from cart."))
    })
}

/// Empties the cart.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_clear() -> CartResponse {
    run_cart_op(active_store(), "cart_clear", |store| {
        Ok(CartResponse::from_change(store.clear(), "Cart cleared."))
    })
}

fn run_cart_op(
    store: Option<&SharedCartStore>,
    op: &'static str,
    f: impl FnOnce(&SharedCartStore) -> Result<CartResponse, CartServiceError>,
) -> CartResponse {
    let Some(store) = store else {
        error!("event=cart_call module=ffi status=error op={op} error_code=cart_not_initialized");
        return CartResponse::failure(
            "cart_not_initialized",
            format!("{op} called before cart_init"),
        );
    };

    match f(store) {
        Ok(response) => response,
        Err(err) => {
            let code = match err {
                CartServiceError::ItemNotFound(_) => "item_not_found",
                CartServiceError::Validation(_) => "invalid_item",
            };
            info!("event=cart_call module=ffi status=rejected op={op} error_code={code}");
            let snapshot = store.snapshot();
            let mut response = CartResponse::listing(
                snapshot.revision,
                &snapshot.products,
                format!("{op} failed: {err}"),
            );
            response.ok = false;
            response.error_code = Some(code.to_string());
            response
        }
    }
}

fn active_store() -> Option<&'static SharedCartStore> {
    CART.get().map(|handle| &handle.store)
}

fn confirm_active(active: &CartHandle, requested: Option<&Path>) -> String {
    match requested {
        Some(path) if path != active.db_path => {
            warn!("event=cart_init module=ffi status=rejected reason=db_path_mismatch");
            format!(
                "cart already initialized at `{}`; refusing to switch to `{}`",
                active.db_path.display(),
                path.display()
            )
        }
        _ => String::new(),
    }
}

fn build_store(db_path: &Path) -> Result<SharedCartStore, String> {
    let config = CartConfig::from_env().map_err(|err| format!("cart config invalid: {err}"))?;
    let conn = open_db(db_path).map_err(|err| format!("cart DB open failed: {err}"))?;
    let kv = SqliteKeyValueStore::try_new(conn)
        .map_err(|err| format!("cart storage init failed: {err}"))?;
    Ok(CartStore::open(
        KvCartRepository::new(kv, config.storage_key),
        config.decrement_policy,
    ))
}

fn explicit_db_path(raw: Option<&str>) -> Option<PathBuf> {
    raw.map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(PathBuf::from)
}

fn resolve_db_path(explicit: Option<String>) -> PathBuf {
    explicit_db_path(explicit.as_deref())
        .or_else(|| explicit_db_path(std::env::var(DB_PATH_ENV).ok().as_deref()))
        .unwrap_or_else(|| std::env::temp_dir().join(CART_DB_FILE_NAME))
}

fn to_cart_line(item: &CartItem) -> CartLine {
    CartLine {
        id: item.id.clone(),
        title: item.title.clone(),
        image_url: item.image_url.clone(),
        price: item.price,
        quantity: item.quantity,
    }
}
