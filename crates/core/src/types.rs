use serde::{Deserialize, Serialize};

use crate::error::{ActionError, SimError};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

/// Sixteen-way compass direction. Sector 0 is north and sectors advance clockwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dir {
    N,
    Nne,
    Ne,
    Ene,
    E,
    Ese,
    Se,
    Sse,
    S,
    Ssw,
    Sw,
    Wsw,
    W,
    Wnw,
    Nw,
    Nnw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Wall,
    Ground,
    Door,
    Foliage,
    HoledWall,
    Tree,
    Barrel,
}

impl Terrain {
    pub fn is_passable(self) -> bool {
        !matches!(self, Terrain::Wall | Terrain::HoledWall)
    }

    pub fn is_flammable(self) -> bool {
        matches!(self, Terrain::Foliage | Terrain::Door | Terrain::Tree | Terrain::Barrel)
    }

    pub fn is_wall_like(self) -> bool {
        matches!(self, Terrain::Wall | Terrain::HoledWall)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CloudKind {
    Fog,
    Night,
    Fire,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    Swift,
    Slow,
    Lit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonsterStatus {
    Confused,
    Paralysed,
    Slow,
}

/// Stable index into the monster list. Dead monsters keep their slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonsterIdx(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Guard,
    Hound,
    Digger,
}

impl MonsterKind {
    pub fn delay(self) -> u32 {
        match self {
            MonsterKind::Guard => 10,
            MonsterKind::Hound => 5,
            MonsterKind::Digger => 20,
        }
    }

    pub fn max_hp(self) -> i32 {
        match self {
            MonsterKind::Guard => 6,
            MonsterKind::Hound => 4,
            MonsterKind::Digger => 8,
        }
    }

    pub fn damage(self) -> i32 {
        match self {
            MonsterKind::Guard | MonsterKind::Digger => 2,
            MonsterKind::Hound => 1,
        }
    }

    /// Diggers path through walls and leave ground behind.
    pub fn tunnels(self) -> bool {
        matches!(self, MonsterKind::Digger)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterState {
    Resting,
    Wandering,
    Hunting,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Move(Dir),
    Wait,
    Rest,
    Explore,
    TravelTo(Pos),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoMode {
    Explore,
    Travel { target: Pos },
    Rest { remaining: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    Quit,
    Death,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEvent {
    PlayerMoved { to: Pos },
    PlayerWaited,
    PlayerAttacked { monster: MonsterIdx, damage: i32 },
    PlayerHit { monster: MonsterIdx, damage: i32, hp_left: i32 },
    MonsterKilled { monster: MonsterIdx },
    MonsterNoticed { monster: MonsterIdx },
    MonsterHeardNoise { monster: MonsterIdx, origin: Pos },
    WallDug { monster: MonsterIdx, pos: Pos },
    DoorNoise { pos: Pos },
    AutoStarted { mode: AutoMode },
    AutoFinished,
    AutoInterrupted { monster: Option<MonsterIdx> },
    ActionFailed { error: ActionError },
    PlayerStatusStarted { status: PlayerStatus },
    PlayerStatusEnded { status: PlayerStatus },
    MonsterStatusStarted { monster: MonsterIdx, status: MonsterStatus },
    MonsterStatusEnded { monster: MonsterIdx, status: MonsterStatus },
    CloudDissipated { pos: Pos, kind: CloudKind },
    FireSpread { pos: Pos },
    BurntOut { pos: Pos },
    TemporaryWallRaised { pos: Pos },
    TemporaryWallExpired { pos: Pos },
    MapRevealed { cells: usize },
    RunEnded { outcome: RunOutcome },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdvanceStopReason {
    AwaitingInput,
    BudgetExhausted,
    QueueEmpty,
    Finished(RunOutcome),
    EngineFailure(SimError),
}

#[derive(Clone, Debug)]
pub struct AdvanceResult {
    pub processed_events: u32,
    pub stop_reason: AdvanceStopReason,
}
