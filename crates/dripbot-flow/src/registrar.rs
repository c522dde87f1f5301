// SPDX-FileCopyrightText: 2026 Dripbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order registration and token generation.

use rand::Rng;
use tracing::info;

use dripbot_core::{CustomerOrder, DripbotError, OrderDate, OrderId, OrderStore, UserId};

const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const TOKEN_LEN: usize = 8;

/// Generates a random 8-character uppercase alphanumeric order token.
///
/// Uniqueness is not guaranteed here; [`register`] retries against the
/// store until the token does not collide.
pub fn generate_order_id() -> OrderId {
    let mut rng = rand::thread_rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect();
    OrderId::new(token)
}

/// Registers (or re-registers) an order date for a user.
///
/// Upserts the customer row wholesale with a freshly generated unique
/// order id and `is_paid = true`. Marking the order paid on registration
/// is a documented policy choice -- callers needing different payment
/// semantics must use the payment toggle, not this method.
///
/// Token collisions are resolved by regenerating; with a 36^8 token space
/// the expected number of retries is effectively zero.
pub async fn register(
    store: &dyn OrderStore,
    user_id: UserId,
    order_date: OrderDate,
) -> Result<OrderId, DripbotError> {
    let order_id = loop {
        let candidate = generate_order_id();
        if store.order_by_order_id(&candidate).await?.is_none() {
            break candidate;
        }
    };

    let order = CustomerOrder {
        user_id,
        order_id: order_id.clone(),
        order_date,
        is_paid: true,
        created_at: chrono::Utc::now().format("%d.%m.%Y %H:%M").to_string(),
    };
    store.upsert_order(&order).await?;

    info!(user_id = user_id.0, order_id = %order_id, date = %order_date, "order registered");
    Ok(order_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dripbot_test_utils::MockStore;
    use std::collections::HashSet;

    #[test]
    fn generated_tokens_have_the_right_shape() {
        for _ in 0..200 {
            let id = generate_order_id();
            assert_eq!(id.as_str().len(), 8);
            assert!(id
                .as_str()
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn distinct_users_get_distinct_tokens() {
        let store = MockStore::new();
        let date = OrderDate::parse("25.11.2025").unwrap();
        let mut seen = HashSet::new();
        for user in 1..=50 {
            let id = register(&store, UserId(user), date).await.unwrap();
            assert!(seen.insert(id.as_str().to_string()), "token collision");
        }
        assert_eq!(store.orders().await.len(), 50);
    }

    #[tokio::test]
    async fn reregistration_overwrites_and_resets_paid() {
        let store = MockStore::new();
        let first_date = OrderDate::parse("25.11.2025").unwrap();
        let second_date = OrderDate::parse("01.12.2025").unwrap();

        let first_id = register(&store, UserId(9), first_date).await.unwrap();
        store.set_paid(&first_id, false).await.unwrap();

        let second_id = register(&store, UserId(9), second_date).await.unwrap();
        assert_ne!(first_id, second_id);

        let order = store.order_by_user(UserId(9)).await.unwrap().unwrap();
        assert_eq!(order.order_id, second_id);
        assert_eq!(order.order_date, second_date);
        assert!(order.is_paid, "re-registration resets the paid flag");
    }

    #[tokio::test]
    async fn persistence_failure_surfaces_as_storage_error() {
        let store = MockStore::new();
        store.set_failing(true).await;
        let err = register(&store, UserId(1), OrderDate::parse("25.11.2025").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DripbotError::Storage { .. }));
    }
}
