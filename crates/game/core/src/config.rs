/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Grace delay between a win being detected and the advance signal firing.
    pub advance_delay_ms: u64,
    /// Move count a cheated level is raised to (at least).
    pub cheat_move_floor: u32,
    /// Elapsed time a cheated level is raised to (at least).
    pub cheat_time_floor_ms: u64,
    /// Period of the elapsed-time readout while a level is in play.
    pub clock_tick_ms: u64,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ADVANCE_DELAY_MS: u64 = 800;
    pub const DEFAULT_CHEAT_MOVE_FLOOR: u32 = 50;
    pub const DEFAULT_CHEAT_TIME_FLOOR_MS: u64 = 60_000;
    pub const DEFAULT_CLOCK_TICK_MS: u64 = 100;

    pub fn new() -> Self {
        Self {
            advance_delay_ms: Self::DEFAULT_ADVANCE_DELAY_MS,
            cheat_move_floor: Self::DEFAULT_CHEAT_MOVE_FLOOR,
            cheat_time_floor_ms: Self::DEFAULT_CHEAT_TIME_FLOOR_MS,
            clock_tick_ms: Self::DEFAULT_CLOCK_TICK_MS,
        }
    }

    pub fn with_advance_delay_ms(mut self, advance_delay_ms: u64) -> Self {
        self.advance_delay_ms = advance_delay_ms;
        self
    }

    pub fn with_cheat_floors(mut self, moves: u32, time_ms: u64) -> Self {
        self.cheat_move_floor = moves;
        self.cheat_time_floor_ms = time_ms;
        self
    }

    pub fn with_clock_tick_ms(mut self, clock_tick_ms: u64) -> Self {
        self.clock_tick_ms = clock_tick_ms;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
