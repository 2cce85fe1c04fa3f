// SPDX-FileCopyrightText: 2026 Patchbay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contract resolution for an authenticated event.
//!
//! An event with zero bound contracts is a valid, auditable outcome: the
//! caller must still persist the received event before answering
//! "no contracts".

use patchbay_core::PatchbayError;
use patchbay_core::traits::RelayStore;
use patchbay_core::types::EventContract;

/// Load the dispatch-eligible contracts for an event, in ascending tier
/// order.
pub async fn resolve_contracts(
    store: &dyn RelayStore,
    event_id: i64,
) -> Result<Vec<EventContract>, PatchbayError> {
    let contracts = store.resolve_contracts(event_id).await?;
    tracing::debug!(event_id, count = contracts.len(), "contracts resolved");
    Ok(contracts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::types::SecurityType;
    use patchbay_test_utils::MemoryStore;

    fn contract(id: i64, exec_order: i64) -> EventContract {
        EventContract {
            contract_id: id,
            contract_name: format!("contract-{id}"),
            exec_order,
            event_id: 1,
            event_identifier: "order-created".to_string(),
            action_id: id,
            action_name: format!("action-{id}"),
            call_template: "00|.|11".to_string(),
            security_type: SecurityType::Custom,
            token_template: None,
        }
    }

    #[tokio::test]
    async fn returns_contracts_in_store_order() {
        let store = MemoryStore::new();
        store.set_contracts(1, vec![contract(1, 0), contract(2, 1)]);

        let contracts = resolve_contracts(&store, 1).await.unwrap();
        assert_eq!(contracts.len(), 2);
        assert_eq!(contracts[0].contract_id, 1);
    }

    #[tokio::test]
    async fn unknown_event_resolves_empty() {
        let store = MemoryStore::new();
        let contracts = resolve_contracts(&store, 404).await.unwrap();
        assert!(contracts.is_empty());
    }
}
