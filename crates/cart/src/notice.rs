//! User-facing failure notices.
//!
//! The cart manager only returns typed errors. Consumers that show transient
//! messages (toasts, status lines) map a failed operation to a [`Notice`]
//! here so every front end uses the same four failure classes.

use crate::error::CartError;

/// Cart operation that produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

/// Distinguishable failure classes shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Requested quantity is more than the store has.
    OutOfStock,
    /// Adding a product failed for any other reason.
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a product's quantity failed for any other reason.
    UpdateFailed,
}

impl Notice {
    /// Select the notice for a failed operation.
    #[must_use]
    pub const fn for_failure(operation: CartOperation, error: &CartError) -> Self {
        match (operation, error) {
            (CartOperation::Add | CartOperation::UpdateAmount, CartError::OutOfStock { .. }) => {
                Self::OutOfStock
            }
            (CartOperation::Add, _) => Self::AddFailed,
            (CartOperation::Remove, _) => Self::RemoveFailed,
            (CartOperation::UpdateAmount, _) => Self::UpdateFailed,
        }
    }

    /// Message text for display.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::OutOfStock => "Requested quantity is out of stock",
            Self::AddFailed => "Could not add the product",
            Self::RemoveFailed => "Could not remove the product",
            Self::UpdateFailed => "Could not change the product quantity",
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use rocketshoes_core::ProductId;

    use super::*;
    use crate::catalog::CatalogError;

    fn out_of_stock() -> CartError {
        CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 6,
            available: 5,
        }
    }

    fn transport() -> CartError {
        CartError::Transport(CatalogError::Api {
            status: 503,
            message: String::new(),
        })
    }

    #[test]
    fn test_out_of_stock_wins_for_add_and_update() {
        assert_eq!(
            Notice::for_failure(CartOperation::Add, &out_of_stock()),
            Notice::OutOfStock
        );
        assert_eq!(
            Notice::for_failure(CartOperation::UpdateAmount, &out_of_stock()),
            Notice::OutOfStock
        );
    }

    #[test]
    fn test_generic_failures_by_operation() {
        assert_eq!(
            Notice::for_failure(CartOperation::Add, &transport()),
            Notice::AddFailed
        );
        assert_eq!(
            Notice::for_failure(CartOperation::Remove, &CartError::NotFound(ProductId::new(2))),
            Notice::RemoveFailed
        );
        assert_eq!(
            Notice::for_failure(CartOperation::UpdateAmount, &CartError::InvalidAmount(0)),
            Notice::UpdateFailed
        );
        assert_eq!(
            Notice::for_failure(CartOperation::UpdateAmount, &transport()),
            Notice::UpdateFailed
        );
    }

    #[test]
    fn test_messages_are_distinct() {
        let messages = [
            Notice::OutOfStock.message(),
            Notice::AddFailed.message(),
            Notice::RemoveFailed.message(),
            Notice::UpdateFailed.message(),
        ];
        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
