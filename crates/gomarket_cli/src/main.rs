//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `gomarket_core` linkage without the Flutter/FFI runtime.
//! - Run one deterministic cart round over in-memory storage.

use gomarket_core::{
    CartRepository, CartStore, DecrementPolicy, KvCartRepository, MemoryKeyValueStore,
    NewCartItem, DEFAULT_CART_STORAGE_KEY,
};

fn main() {
    println!("gomarket_core ping={}", gomarket_core::ping());
    println!("gomarket_core version={}", gomarket_core::core_version());

    let storage = MemoryKeyValueStore::new();
    let store = CartStore::open(
        KvCartRepository::new(&storage, DEFAULT_CART_STORAGE_KEY),
        DecrementPolicy::default(),
    );
    let item = NewCartItem::new("smoke-1", "Smoke item", "", 1.0);
    let outcome = store
        .add_to_cart(item.clone())
        .and_then(|_| store.add_to_cart(item))
        .and_then(|_| store.decrement("smoke-1"));

    match outcome {
        Ok(change) => println!(
            "cart smoke revision={} items={} total_quantity={}",
            change.revision,
            change.products.len(),
            store.total_quantity()
        ),
        Err(err) => println!("cart smoke failed: {err}"),
    }

    let reloaded = store
        .repository()
        .load_cart()
        .map(|items| items.map_or(0, |items| items.len()));
    match reloaded {
        Ok(count) => println!("cart smoke persisted_items={count}"),
        Err(err) => println!("cart smoke reload failed: {err}"),
    }
}
