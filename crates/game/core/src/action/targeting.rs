//! Default target selection for each [`TargetPattern`].

use crate::env::{RollContext, RollStream, TargetPattern};
use crate::stats::{Actor, Uid};

/// Living members of the front row, falling back to the back row when the
/// front row is empty.
pub fn front_row(side: &[Actor], row_size: usize) -> Vec<Uid> {
    let living = || side.iter().filter(|actor| actor.is_alive());
    let front: Vec<Uid> = living()
        .filter(|actor| actor.slot() < row_size)
        .map(Actor::uid)
        .collect();
    if front.is_empty() {
        living().map(Actor::uid).collect()
    } else {
        front
    }
}

/// Chooses targets for `pattern` from the subject's point of view.
///
/// `friends` is the subject's own side (including the subject), `foes` the
/// opposing side. Returns an empty list when nothing qualifies.
pub fn select_targets(
    pattern: TargetPattern,
    subject: &Actor,
    friends: &[Actor],
    foes: &[Actor],
    row_size: usize,
    rolls: &mut RollStream<'_>,
) -> Vec<Uid> {
    let living = |side: &[Actor]| -> Vec<Uid> {
        side.iter()
            .filter(|actor| actor.is_alive())
            .map(Actor::uid)
            .collect()
    };

    match pattern {
        TargetPattern::User => vec![subject.uid()],
        TargetPattern::AllySingle => friends
            .iter()
            .filter(|actor| actor.is_alive())
            .min_by(|a, b| {
                a.hp_ratio()
                    .total_cmp(&b.hp_ratio())
                    .then(a.uid().cmp(&b.uid()))
            })
            .map(Actor::uid)
            .into_iter()
            .collect(),
        TargetPattern::AllyAll => living(friends),
        TargetPattern::AllyFallen => friends
            .iter()
            .find(|actor| !actor.is_alive())
            .map(Actor::uid)
            .into_iter()
            .collect(),
        TargetPattern::EnemySingle => {
            let candidates = living(foes);
            if candidates.is_empty() {
                return candidates;
            }
            let pick = rolls.index(subject.uid().0, RollContext::Target, candidates.len());
            vec![candidates[pick]]
        }
        TargetPattern::EnemyAll => living(foes),
        TargetPattern::EnemyRow => front_row(foes, row_size),
    }
}
