use std::collections::BTreeSet;

use proptest::prelude::*;
use proptest::sample::Index;
use storefront_core::{Entity, MutationId, Order, OrderChange, OrderId, OrderStatus};
use storefront_engine::{Confirmation, MutationEngine, OrderMutations};

#[derive(Debug, Clone)]
enum Step {
    Update(String, OrderStatus),
    Add(String),
    Remove(String),
}

fn status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Pending),
        Just(OrderStatus::Confirmed),
        Just(OrderStatus::Processing),
        Just(OrderStatus::Completed),
        Just(OrderStatus::Cancelled),
    ]
}

fn order(id: &str, status: OrderStatus) -> Order {
    Order::placed(id, "wallet", "merchant", 100).with_status(status)
}

/// Lists with unique ids, in arbitrary order.
fn orders() -> impl Strategy<Value = Vec<Order>> {
    prop::collection::btree_set("[a-h]", 0..8)
        .prop_flat_map(|ids| {
            let n = ids.len();
            (
                Just(ids.into_iter().collect::<Vec<_>>()).prop_shuffle(),
                prop::collection::vec(status(), n),
            )
        })
        .prop_map(|(ids, statuses)| {
            ids.iter()
                .zip(statuses)
                .map(|(id, s)| order(id, s))
                .collect()
        })
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        prop_oneof![
            ("[a-j]", status()).prop_map(|(id, s)| Step::Update(id, s)),
            "[g-l]".prop_map(Step::Add),
            "[a-l]".prop_map(Step::Remove),
        ],
        0..24,
    )
}

/// What `step` does to a plain Vec: the sequential reference.
fn apply_model(model: &mut Vec<Order>, step: &Step) {
    match step {
        Step::Update(id, s) => {
            if let Some(o) = model.iter_mut().find(|o| o.id.as_str() == id) {
                *o = o.merge(&OrderChange::Status(*s));
            }
        }
        Step::Add(id) => {
            if !model.iter().any(|o| o.id.as_str() == id) {
                model.push(order(id, OrderStatus::Pending));
            }
        }
        Step::Remove(id) => model.retain(|o| o.id.as_str() != id),
    }
}

/// Apply `step` to both the engine and the model. Returns the token when
/// the engine accepted it.
fn apply(
    engine: &mut MutationEngine<Order>,
    model: &mut Vec<Order>,
    step: &Step,
) -> Option<MutationId> {
    let result = match step {
        Step::Update(id, s) => engine.update_status(&OrderId::from(id.as_str()), *s),
        Step::Add(id) => engine.add_item(order(id, OrderStatus::Pending)),
        Step::Remove(id) => engine.remove_item(OrderId::from(id.as_str())),
    };
    apply_model(model, step);
    result.ok()
}

/// Deterministic in-place shuffle driven by a generated seed.
fn shuffle<T>(items: &mut [T], seed: u64) {
    for i in (1..items.len()).rev() {
        let j = (seed.rotate_left(i as u32) % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}

proptest! {
    #[test]
    fn replaced_lists_have_unique_ids_in_given_order(orders in orders()) {
        let engine = MutationEngine::from_items(orders.clone()).unwrap();
        let ids: BTreeSet<OrderId> = engine.iter().map(|o| o.id.clone()).collect();
        prop_assert_eq!(ids.len(), engine.len());
        prop_assert_eq!(engine.get_all(), orders);
    }

    #[test]
    fn repeated_update_is_idempotent(orders in orders(), pick in any::<Index>(), s in status()) {
        prop_assume!(!orders.is_empty());
        let id = orders[pick.index(orders.len())].id.clone();
        let mut engine = MutationEngine::from_items(orders).unwrap();

        engine.update_status(&id, s).unwrap();
        let once = engine.get_all();
        engine.update_status(&id, s).unwrap();
        prop_assert_eq!(engine.get_all(), once);
        prop_assert_eq!(engine.get(&id).map(|o| o.status), Some(s));
    }

    #[test]
    fn update_of_missing_id_is_noop(orders in orders(), s in status()) {
        let mut engine = MutationEngine::from_items(orders.clone()).unwrap();
        prop_assert!(engine.update_status(&OrderId::from("zz"), s).is_err());
        prop_assert_eq!(engine.get_all(), orders);
        prop_assert!(!engine.has_pending());
    }

    #[test]
    fn add_then_remove_round_trips(orders in orders()) {
        let mut engine = MutationEngine::from_items(orders.clone()).unwrap();
        engine.add_item(order("new", OrderStatus::Pending)).unwrap();
        engine.remove_item(OrderId::from("new")).unwrap();
        prop_assert_eq!(engine.get_all(), orders);
    }

    #[test]
    fn live_list_tracks_sequential_model(orders in orders(), steps in steps()) {
        let mut engine = MutationEngine::from_items(orders.clone()).unwrap();
        let mut model = orders;
        for step in &steps {
            apply(&mut engine, &mut model, step);
            prop_assert_eq!(engine.get_all(), model.clone());
        }
    }

    #[test]
    fn revert_restores_exact_prior_state(orders in orders(), steps in steps()) {
        let mut engine = MutationEngine::from_items(orders.clone()).unwrap();
        let mut model = orders.clone();
        for step in &steps {
            apply(&mut engine, &mut model, step);
        }
        engine.revert_update();
        prop_assert_eq!(engine.get_all(), orders);
        prop_assert!(!engine.store().has_baseline());
    }

    #[test]
    fn rolling_back_every_token_in_any_order_restores_state(
        orders in orders(),
        steps in steps(),
        seed in any::<u64>(),
    ) {
        let mut engine = MutationEngine::from_items(orders.clone()).unwrap();
        let mut model = orders.clone();
        let mut tokens: Vec<_> = steps
            .iter()
            .filter_map(|step| apply(&mut engine, &mut model, step))
            .collect();

        shuffle(&mut tokens, seed);
        for token in tokens {
            engine.rollback(token).unwrap();
        }
        prop_assert_eq!(engine.get_all(), orders);
        prop_assert!(!engine.has_pending());
    }

    #[test]
    fn acknowledging_in_any_order_matches_sequential_model(
        orders in orders(),
        steps in steps(),
        seed in any::<u64>(),
    ) {
        let mut engine = MutationEngine::from_items(orders.clone()).unwrap();
        let mut model = orders;
        let mut tokens: Vec<_> = steps
            .iter()
            .filter_map(|step| apply(&mut engine, &mut model, step))
            .collect();

        shuffle(&mut tokens, seed);
        for token in tokens {
            engine.commit(token, Confirmation::Acknowledged).unwrap();
            // Arrival order never changes what the list shows.
            prop_assert_eq!(engine.get_all(), model.clone());
        }
        prop_assert!(!engine.has_pending());
        prop_assert!(!engine.store().has_baseline());
    }

    #[test]
    fn mixed_settlement_matches_replay_of_survivors(
        orders in orders(),
        steps in steps(),
        seed in any::<u64>(),
        keep in prop::collection::vec(any::<bool>(), 24),
    ) {
        let mut engine = MutationEngine::from_items(orders.clone()).unwrap();
        let mut scratch = orders.clone();
        let mut issued: Vec<(usize, MutationId)> = steps
            .iter()
            .enumerate()
            .filter_map(|(i, step)| apply(&mut engine, &mut scratch, step).map(|t| (i, t)))
            .collect();

        // Only the steps whose writes the backend accepted survive.
        let mut expected = orders;
        for (i, _) in &issued {
            if keep[*i] {
                apply_model(&mut expected, &steps[*i]);
            }
        }

        shuffle(&mut issued, seed);
        for (i, token) in issued {
            if keep[i] {
                engine.commit(token, Confirmation::Acknowledged).unwrap();
            } else {
                engine.rollback(token).unwrap();
            }
        }
        prop_assert_eq!(engine.get_all(), expected);
        prop_assert!(!engine.has_pending());
    }
}
