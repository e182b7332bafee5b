use storefront_core::{Order, OrderId, OrderStatus};
use storefront_engine::{EngineError, MutationEngine, OrderMutations};

fn order(id: &str, status: OrderStatus) -> Order {
    Order::placed(id, "wallet-1", "merchant-1", 1_000).with_status(status)
}

fn statuses(engine: &MutationEngine<Order>) -> Vec<(String, OrderStatus)> {
    engine
        .iter()
        .map(|o| (o.id.to_string(), o.status))
        .collect()
}

// ============================================================================
// Order list scenarios
// ============================================================================

#[test]
fn update_status_changes_only_target() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = MutationEngine::from_items(vec![
        order("A", OrderStatus::Pending),
        order("B", OrderStatus::Pending),
    ])?;

    engine.update_status(&OrderId::from("A"), OrderStatus::Confirmed)?;

    assert_eq!(
        statuses(&engine),
        vec![
            ("A".to_string(), OrderStatus::Confirmed),
            ("B".to_string(), OrderStatus::Pending),
        ]
    );
    Ok(())
}

#[test]
fn revert_restores_pre_batch_list() -> Result<(), Box<dyn std::error::Error>> {
    let original = vec![
        order("A", OrderStatus::Pending),
        order("B", OrderStatus::Pending),
    ];
    let mut engine = MutationEngine::from_items(original.clone())?;

    engine.update_status(&OrderId::from("A"), OrderStatus::Confirmed)?;
    let discarded = engine.revert_update();

    assert_eq!(discarded, 1);
    assert_eq!(engine.get_all(), original);
    assert!(!engine.has_pending());
    Ok(())
}

#[test]
fn update_of_unknown_id_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let original = vec![order("A", OrderStatus::Pending)];
    let mut engine = MutationEngine::from_items(original.clone())?;

    let result = engine.update_status(&OrderId::from("Z"), OrderStatus::Confirmed);

    match result {
        Err(EngineError::EntityNotFound(id)) => assert_eq!(id, "Z"),
        other => panic!("expected EntityNotFound, got {other:?}"),
    }
    assert_eq!(engine.get_all(), original);
    assert!(!engine.has_pending());
    Ok(())
}

#[test]
fn add_then_remove_restores_list() -> Result<(), Box<dyn std::error::Error>> {
    let original = vec![
        order("A", OrderStatus::Pending),
        order("B", OrderStatus::Confirmed),
    ];
    let mut engine = MutationEngine::from_items(original.clone())?;

    engine.add_item(order("C", OrderStatus::Pending))?;
    assert_eq!(engine.len(), 3);
    assert_eq!(engine.get_all()[2].id, OrderId::from("C"));

    engine.remove_item(OrderId::from("C"))?;
    assert_eq!(engine.get_all(), original);
    Ok(())
}

#[test]
fn set_items_replaces_wholesale() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = MutationEngine::from_items(vec![order("A", OrderStatus::Pending)])?;
    engine.update_status(&OrderId::from("A"), OrderStatus::Cancelled)?;

    let fetched = vec![order("X", OrderStatus::Confirmed)];
    let discarded = engine.set_items(fetched.clone())?;

    assert_eq!(discarded, 1);
    assert_eq!(engine.get_all(), fetched);
    // The refetched list is the new baseline: nothing left to revert.
    assert_eq!(engine.revert_update(), 0);
    assert_eq!(engine.get_all(), fetched);
    Ok(())
}

// ============================================================================
// List invariants
// ============================================================================

#[test]
fn set_items_rejects_duplicate_ids() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = MutationEngine::from_items(vec![order("A", OrderStatus::Pending)])?;
    let result = engine.set_items(vec![
        order("X", OrderStatus::Pending),
        order("X", OrderStatus::Confirmed),
    ]);
    assert!(matches!(result, Err(EngineError::Store(_))));
    assert_eq!(engine.get_all(), vec![order("A", OrderStatus::Pending)]);
    Ok(())
}

#[test]
fn repeated_update_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = MutationEngine::from_items(vec![order("A", OrderStatus::Pending)])?;
    let id = OrderId::from("A");

    engine.update_status(&id, OrderStatus::Processing)?;
    let once = engine.get_all();
    engine.update_status(&id, OrderStatus::Processing)?;

    assert_eq!(engine.get_all(), once);
    assert_eq!(engine.get(&id).map(|o| o.status), Some(OrderStatus::Processing));
    Ok(())
}

#[test]
fn update_keeps_position_and_remove_keeps_order() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = MutationEngine::from_items(vec![
        order("A", OrderStatus::Pending),
        order("B", OrderStatus::Pending),
        order("C", OrderStatus::Pending),
        order("D", OrderStatus::Pending),
    ])?;

    engine.update_status(&OrderId::from("C"), OrderStatus::Completed)?;
    engine.remove_item(OrderId::from("B"))?;
    engine.add_item(order("E", OrderStatus::Pending))?;

    let ids: Vec<String> = engine.iter().map(|o| o.id.to_string()).collect();
    assert_eq!(ids, ["A", "C", "D", "E"]);
    assert_eq!(
        engine.get(&OrderId::from("C")).map(|o| o.status),
        Some(OrderStatus::Completed)
    );
    Ok(())
}

#[test]
fn revert_undoes_mixed_batch() -> Result<(), Box<dyn std::error::Error>> {
    let original = vec![
        order("A", OrderStatus::Pending),
        order("B", OrderStatus::Confirmed),
        order("C", OrderStatus::Processing),
    ];
    let mut engine = MutationEngine::from_items(original.clone())?;

    engine.update_status(&OrderId::from("A"), OrderStatus::Cancelled)?;
    engine.remove_item(OrderId::from("B"))?;
    engine.add_item(order("D", OrderStatus::Pending))?;
    engine.update_notes(&OrderId::from("D"), Some("rush".into()))?;
    engine.update_tracking_number(&OrderId::from("C"), Some("1Z".into()))?;

    assert_eq!(engine.revert_update(), 5);
    assert_eq!(engine.get_all(), original);
    Ok(())
}

#[test]
fn commit_all_makes_batch_the_new_baseline() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = MutationEngine::from_items(vec![order("A", OrderStatus::Pending)])?;
    engine.update_status(&OrderId::from("A"), OrderStatus::Confirmed)?;
    engine.add_item(order("B", OrderStatus::Pending))?;

    assert_eq!(engine.commit_all(), 2);
    let committed = engine.get_all();

    engine.update_status(&OrderId::from("B"), OrderStatus::Cancelled)?;
    engine.revert_update();
    assert_eq!(engine.get_all(), committed);
    Ok(())
}
