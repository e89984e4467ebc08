/// Encounter state machine phases.
///
/// ```text
/// INIT -> ALLY_TURN <-> ENEMY_TURN -> RESOLVING -> CHECK_END -> {WIN, LOSE, FLEE}
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattlePhase {
    Init,
    AllyTurn,
    EnemyTurn,
    Resolving,
    CheckEnd,
    Win,
    Lose,
    Flee,
}

impl BattlePhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::Lose | Self::Flee)
    }

    pub const fn is_turn(self) -> bool {
        matches!(self, Self::AllyTurn | Self::EnemyTurn)
    }

    pub const fn outcome(self) -> Option<BattleOutcome> {
        match self {
            Self::Win => Some(BattleOutcome::Win),
            Self::Lose => Some(BattleOutcome::Lose),
            Self::Flee => Some(BattleOutcome::Flee),
            _ => None,
        }
    }
}

/// Terminal result of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BattleOutcome {
    Win,
    Lose,
    Flee,
}

impl BattleOutcome {
    pub const fn phase(self) -> BattlePhase {
        match self {
            Self::Win => BattlePhase::Win,
            Self::Lose => BattlePhase::Lose,
            Self::Flee => BattlePhase::Flee,
        }
    }
}

/// Side of the encounter an actor fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    pub const fn opposite(self) -> Side {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }

    pub const fn turn_phase(self) -> BattlePhase {
        match self {
            Side::Ally => BattlePhase::AllyTurn,
            Side::Enemy => BattlePhase::EnemyTurn,
        }
    }
}
