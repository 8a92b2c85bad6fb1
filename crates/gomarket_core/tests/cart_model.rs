use gomarket_core::model::cart_item::validate_cart_list;
use gomarket_core::{CartItem, CartItemValidationError, NewCartItem};

#[test]
fn cart_item_serializes_with_storefront_field_names() {
    let item = NewCartItem::new("42", "Backpack", "https://cdn.example.com/42.png", 199.9)
        .into_cart_item();

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["id"], "42");
    assert_eq!(json["title"], "Backpack");
    assert_eq!(json["image_url"], "https://cdn.example.com/42.png");
    assert_eq!(json["price"], 199.9);
    assert_eq!(json["quantity"], 1);

    let decoded: CartItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn add_request_ignores_incoming_quantity() {
    let request: NewCartItem = serde_json::from_str(
        r#"{"id":"1","title":"Mug","image_url":"u","price":12.5,"quantity":7}"#,
    )
    .unwrap();

    assert_eq!(request.into_cart_item().quantity, 1);
}

#[test]
fn persisted_zero_quantity_is_invalid() {
    let items: Vec<CartItem> = serde_json::from_str(
        r#"[{"id":"1","title":"Mug","image_url":"u","price":12.5,"quantity":0}]"#,
    )
    .unwrap();

    assert_eq!(
        validate_cart_list(&items),
        Err(CartItemValidationError::ZeroQuantity("1".to_string()))
    );
}
