//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! Every mutation answers with a fragment plus an `HX-Trigger: cart-updated`
//! header so badges and totals elsewhere on the page refresh themselves.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use shopfront_cart::CartSnapshot;
use shopfront_core::{CartItem, Price, ProductId, format_money};
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::UseCart;

/// HTMX event fired after any cart change.
const CART_UPDATED_TRIGGER: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub price: String,
    pub line_price: String,
    /// Empty when the item has no image.
    pub image_url: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: i64,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            quantity: item.quantity,
            price: item.price.to_string(),
            line_price: format_money(item.line_total()),
            image_url: item.image_url.clone().unwrap_or_default(),
        }
    }
}

impl From<&CartSnapshot> for CartView {
    fn from(cart: &CartSnapshot) -> Self {
        Self {
            items: cart.items.iter().map(CartItemView::from).collect(),
            subtotal: cart.formatted_total.clone(),
            item_count: cart.item_count,
        }
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Add to cart form data.
///
/// Catalog pages post the product's display data along with its id; the
/// cart keeps the price given here for as long as the line exists.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub id: String,
    pub name: String,
    pub price: String,
    pub quantity: Option<i64>,
    pub image_url: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub id: String,
}

fn parse_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

impl AddToCartForm {
    fn into_item(self) -> Result<CartItem> {
        let id = parse_id(&self.id)?;
        let name = self.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("name cannot be empty".to_string()));
        }
        let price = Price::parse(&self.price).map_err(|e| AppError::BadRequest(e.to_string()))?;

        let mut item = CartItem::new(id, name, price, self.quantity.unwrap_or(1));
        item.image_url = self.image_url.filter(|url| !url.trim().is_empty());
        Ok(item)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(
    ext = "html",
    source = r##"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Your cart</title>
  <script src="https://unpkg.com/htmx.org@2.0.4"></script>
</head>
<body>
  <header>
    <a href="/cart">Cart (<span id="cart-count" hx-get="/cart/count" hx-trigger="cart-updated from:body" hx-swap="outerHTML">{{ cart.item_count }}</span>)</a>
  </header>
  <main id="cart">
    {{ items_html|safe }}
  </main>
</body>
</html>
"##
)]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub items_html: String,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(
    ext = "html",
    source = r##"{% if cart.items.is_empty() %}
<p class="cart-empty">Your cart is empty.</p>
{% else %}
<ul class="cart-items">
  {% for item in cart.items %}
  <li class="cart-item" data-id="{{ item.id }}">
    {% if !item.image_url.is_empty() %}<img src="{{ item.image_url }}" alt="{{ item.name }}">{% endif %}
    <span class="cart-item-name">{{ item.name }}</span>
    <span class="cart-item-price">{{ item.price }}</span>
    <form hx-post="/cart/update" hx-target="#cart">
      <input type="hidden" name="id" value="{{ item.id }}">
      <input type="number" name="quantity" min="1" value="{{ item.quantity }}">
      <button type="submit">Update</button>
    </form>
    <span class="cart-item-total">{{ item.line_price }}</span>
    <form hx-post="/cart/remove" hx-target="#cart">
      <input type="hidden" name="id" value="{{ item.id }}">
      <button type="submit">Remove</button>
    </form>
  </li>
  {% endfor %}
</ul>
<p class="cart-subtotal">Subtotal: <strong>{{ cart.subtotal }}</strong></p>
<form method="post" action="/checkout"><button type="submit">Checkout</button></form>
{% endif %}
"##
)]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(
    ext = "html",
    source = r##"<span id="cart-count" hx-get="/cart/count" hx-trigger="cart-updated from:body" hx-swap="outerHTML">{{ count }}</span>"##
)]
pub struct CartCountTemplate {
    pub count: i64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(cart))]
pub async fn show(UseCart(cart): UseCart) -> Result<CartShowTemplate> {
    let view = CartView::from(&cart.snapshot());
    let items_html = CartItemsTemplate { cart: view.clone() }
        .render()
        .map_err(|e| AppError::Internal(format!("failed to render cart items: {e}")))?;

    Ok(CartShowTemplate {
        cart: view,
        items_html,
    })
}

/// Cart items fragment (HTMX).
#[instrument(skip(cart))]
pub async fn items(UseCart(cart): UseCart) -> CartItemsTemplate {
    CartItemsTemplate {
        cart: CartView::from(&cart.snapshot()),
    }
}

/// Get cart count badge (HTMX).
#[instrument(skip(cart))]
pub async fn count(UseCart(cart): UseCart) -> CartCountTemplate {
    CartCountTemplate {
        count: cart.item_count(),
    }
}

/// Add item to cart (HTMX).
///
/// Returns the updated count badge with an HTMX trigger so the rest of the
/// page can refresh.
#[instrument(skip(cart))]
pub async fn add(UseCart(cart): UseCart, Form(form): Form<AddToCartForm>) -> Result<Response> {
    let item = form.into_item()?;
    let id = item.id.to_string();

    let outcome = cart.dispatch().add_to_cart(item)?;
    add_breadcrumb("cart", "Added item", Some(&[("product_id", id.as_str())]));
    tracing::info!(product_id = %id, outcome = ?outcome, "Item added to cart");

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response())
}

/// Update cart item quantity (HTMX).
#[instrument(skip(cart))]
pub async fn update(
    UseCart(cart): UseCart,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = parse_id(&form.id)?;
    cart.dispatch().update_quantity(&id, form.quantity)?;

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            cart: CartView::from(&cart.snapshot()),
        },
    )
        .into_response())
}

/// Remove item from cart (HTMX).
#[instrument(skip(cart))]
pub async fn remove(
    UseCart(cart): UseCart,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = parse_id(&form.id)?;
    cart.dispatch().remove_from_cart(&id);
    add_breadcrumb("cart", "Removed item", Some(&[("product_id", form.id.as_str())]));

    Ok((
        AppendHeaders([CART_UPDATED_TRIGGER]),
        CartItemsTemplate {
            cart: CartView::from(&cart.snapshot()),
        },
    )
        .into_response())
}

/// Hand the cart to the payment flow.
///
/// Answers with the checkout summary the payment request is built from. An
/// empty cart is sent back to the cart page.
#[instrument(skip(cart))]
pub async fn checkout(UseCart(cart): UseCart) -> Response {
    if cart.snapshot().is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let summary = cart.dispatch().checkout();
    tracing::info!(
        lines = summary.items.len(),
        total = %summary.formatted_total,
        "Checkout started"
    );
    Json(summary).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn form(price: &str, quantity: Option<i64>) -> AddToCartForm {
        AddToCartForm {
            id: "p1".to_string(),
            name: " Shoe ".to_string(),
            price: price.to_string(),
            quantity,
            image_url: Some(String::new()),
        }
    }

    #[test]
    fn test_add_form_defaults_quantity_to_one() {
        let item = form("49.99", None).into_item().unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.name, "Shoe");
        assert_eq!(item.price, Price::from_cents(4999));
        assert_eq!(item.image_url, None);
    }

    #[test]
    fn test_add_form_rejects_bad_input() {
        assert!(matches!(
            form("free", Some(1)).into_item(),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            form("-5", Some(1)).into_item(),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            form("79228162514264337593543950335", Some(2)).into_item(),
            Err(AppError::BadRequest(_))
        ));

        let mut blank = form("1", None);
        blank.id = "  ".to_string();
        assert!(matches!(blank.into_item(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_item_view_formatting() {
        let item =
            CartItem::new(7_i64, "Hat", Price::from_cents(123_450), 2).with_image("/h.jpg");
        let view = CartItemView::from(&item);
        assert_eq!(view.id, "7");
        assert_eq!(view.price, "$1,234.50");
        assert_eq!(view.line_price, "$2,469.00");
        assert_eq!(view.image_url, "/h.jpg");
    }

    #[test]
    fn test_items_template_escapes_names() {
        let item = CartItem::new("p1", "<b>Shoe</b>", Price::from_cents(100), 1);
        let view = CartView {
            items: vec![CartItemView::from(&item)],
            subtotal: "$1.00".to_string(),
            item_count: 1,
        };
        let html = CartItemsTemplate { cart: view }.render().unwrap();
        assert!(html.contains("&#60;b&#62;Shoe") || html.contains("&lt;b&gt;Shoe"));
        assert!(html.contains("Subtotal: <strong>$1.00</strong>"));
    }

    #[test]
    fn test_item_forms_target_cart_container() {
        let item = CartItem::new("p1", "Shoe", Price::from_cents(100), 1);
        let view = CartView {
            items: vec![CartItemView::from(&item)],
            subtotal: "$1.00".to_string(),
            item_count: 1,
        };
        let html = CartItemsTemplate { cart: view }.render().unwrap();
        assert!(html.contains(r##"<form hx-post="/cart/update" hx-target="#cart">"##));
        assert!(html.contains(r##"<form hx-post="/cart/remove" hx-target="#cart">"##));
        assert!(html.contains(r#"<input type="hidden" name="id" value="p1">"#));
    }

    #[test]
    fn test_page_embeds_items_in_cart_container() {
        let view = CartView {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            item_count: 0,
        };
        let page = CartShowTemplate {
            cart: view,
            items_html: "<p>items</p>".to_string(),
        }
        .render()
        .unwrap();
        assert!(page.contains(r#"<main id="cart">"#));
        assert!(page.contains("<p>items</p>"));
        assert!(page.contains(r#"hx-trigger="cart-updated from:body""#));
    }

    #[test]
    fn test_empty_items_template() {
        let view = CartView {
            items: Vec::new(),
            subtotal: "$0.00".to_string(),
            item_count: 0,
        };
        let html = CartItemsTemplate { cart: view }.render().unwrap();
        assert!(html.contains("Your cart is empty."));
    }
}
