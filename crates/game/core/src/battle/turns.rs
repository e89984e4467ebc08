//! Turn ordering.

use crate::stats::{Actor, Uid};

/// Living combatants in acting order: `agi` descending, then `uid` ascending.
///
/// A living `leader` always acts first, whatever its speed. The order is
/// total, so equal speeds never depend on roster order.
pub fn turn_order<'a>(
    combatants: impl IntoIterator<Item = &'a Actor>,
    leader: Option<Uid>,
) -> Vec<Uid> {
    let mut living: Vec<&Actor> = combatants
        .into_iter()
        .filter(|actor| actor.is_alive())
        .collect();
    living.sort_by(|a, b| {
        let leads = |actor: &Actor| Some(actor.uid()) == leader;
        leads(b)
            .cmp(&leads(a))
            .then_with(|| b.stats().agi.cmp(&a.stats().agi))
            .then_with(|| a.uid().cmp(&b.uid()))
    });
    living.into_iter().map(Actor::uid).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{actor, services};

    #[test]
    fn faster_first_uid_breaks_ties() {
        let services = services();
        let hero = actor(&services, "hero", 4, 1); // agi 20
        let pixie_a = actor(&services, "pixie", 3, 1); // agi 15
        let pixie_b = actor(&services, "pixie", 1, 1); // agi 15
        let mut goblin = actor(&services, "goblin", 2, 1); // agi 5

        assert_eq!(
            turn_order([&goblin, &pixie_a, &hero, &pixie_b], None),
            vec![Uid(4), Uid(1), Uid(3), Uid(2)]
        );

        goblin.take_damage(100);
        assert_eq!(turn_order([&goblin, &hero], None), vec![Uid(4)]);
    }

    #[test]
    fn leader_opens_every_round_while_standing() {
        let services = services();
        let hero = actor(&services, "hero", 4, 1);
        let mut goblin = actor(&services, "goblin", 2, 1);

        assert_eq!(
            turn_order([&hero, &goblin], Some(Uid(2))),
            vec![Uid(2), Uid(4)]
        );

        goblin.take_damage(100);
        assert_eq!(turn_order([&hero, &goblin], Some(Uid(2))), vec![Uid(4)]);
    }
}
