//! Cart commands.

use std::sync::Arc;

use rocketshoes_cart::{Cart, CartOperation, Notice, ProductId, SetQuantity};
use tracing::info;

use super::{CliCart, CommandError};

/// Add one unit of a product.
///
/// # Errors
///
/// Returns the cart failure together with its user notice.
pub async fn add(cart: &CliCart, product_id: ProductId) -> Result<Arc<Cart>, CommandError> {
    let updated = cart
        .add(product_id)
        .await
        .map_err(|source| failure(CartOperation::Add, source))?;

    info!(
        %product_id,
        amount = updated.amount_of(product_id),
        "Added to cart"
    );
    Ok(updated)
}

/// Remove a product.
///
/// # Errors
///
/// Returns the cart failure together with its user notice.
pub fn remove(cart: &CliCart, product_id: ProductId) -> Result<Arc<Cart>, CommandError> {
    let updated = cart
        .remove(product_id)
        .map_err(|source| failure(CartOperation::Remove, source))?;

    info!(%product_id, "Removed from cart");
    Ok(updated)
}

/// Set a product's quantity.
///
/// # Errors
///
/// Returns the cart failure together with its user notice.
pub async fn set(
    cart: &CliCart,
    product_id: ProductId,
    amount: i64,
) -> Result<Arc<Cart>, CommandError> {
    let updated = cart
        .set_quantity(SetQuantity { product_id, amount })
        .await
        .map_err(|source| failure(CartOperation::UpdateAmount, source))?;

    info!(%product_id, amount, "Quantity updated");
    Ok(updated)
}

/// Write the cart to stdout as pretty JSON.
///
/// # Errors
///
/// Returns an error if the cart cannot be encoded.
#[allow(clippy::print_stdout)] // stdout is the command's output channel
pub fn print(cart: &Cart) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(cart)?);
    info!(
        products = cart.len(),
        units = cart.total_quantity(),
        "Cart summary"
    );
    Ok(())
}

fn failure(operation: CartOperation, source: rocketshoes_cart::CartError) -> CommandError {
    CommandError::Cart {
        notice: Notice::for_failure(operation, &source),
        source,
    }
}
