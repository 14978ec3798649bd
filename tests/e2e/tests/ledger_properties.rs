//! Entry point compared against a reference model of the switch rule

use guard_e2e_tests::{addr, Harness};
use proptest::prelude::*;
use std::collections::HashMap;
use types::Address;

#[derive(Debug, Clone)]
struct Step {
    epoch: u64,
    from: u64,
    to: u64,
    amount: u64,
}

fn step() -> impl Strategy<Value = Step> {
    (0u64..3, 1u64..6, 1u64..6, 0u64..3).prop_map(|(epoch, from, to, amount)| Step {
        epoch,
        from,
        to,
        amount,
    })
}

/// (sent, received) per (account, epoch)
type Model = HashMap<(Address, u64), (bool, bool)>;

fn model_transfer(model: &mut Model, step: &Step) -> bool {
    if step.amount == 0 || step.from == step.to {
        return true;
    }
    let (from, to) = (addr(step.from), addr(step.to));
    let sender = model.get(&(from, step.epoch)).copied().unwrap_or_default();
    let receiver = model.get(&(to, step.epoch)).copied().unwrap_or_default();
    if sender.1 || receiver.0 {
        return false;
    }
    model.entry((from, step.epoch)).or_default().0 = true;
    model.entry((to, step.epoch)).or_default().1 = true;
    true
}

proptest! {
    #[test]
    fn prop_guard_matches_model(steps in prop::collection::vec(step(), 1..60)) {
        let mut h = Harness::new();
        let mut model = Model::new();

        for step in &steps {
            let expected = model_transfer(&mut model, step);
            let actual = h.transfer(step.epoch, addr(step.from), addr(step.to), step.amount);
            prop_assert_eq!(actual.is_ok(), expected, "step {:?}", step);
        }

        for ((account, epoch), (sent, received)) in &model {
            let flags = h.flags(*account, *epoch);
            prop_assert_eq!(flags.contains(types::Direction::Sent), *sent);
            prop_assert_eq!(flags.contains(types::Direction::Received), *received);
        }
    }
}
