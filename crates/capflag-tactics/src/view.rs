//! Read-only world view handed to tactical policies.
//!
//! Policies never hold references into the match; the engine assembles a
//! fresh `WorldView` from borrowed slices each decision tick. Situational
//! queries (intruder lists, extremal enemies) live here so the behavior
//! and policy code reads declaratively.

use capflag_core::enums::TeamColor;
use capflag_core::field::Field;
use capflag_core::types::Vec2;

/// One team's observable state, arrays indexed by stable agent index.
#[derive(Debug, Clone, Copy)]
pub struct TeamSight<'a> {
    pub color: TeamColor,
    pub speed: f64,
    pub positions: &'a [Vec2],
    pub velocities: &'a [Vec2],
    pub azimuths: &'a [f64],
    pub alive: &'a [bool],
    pub tagged: &'a [bool],
    pub has_flag: &'a [bool],
}

/// One flag set's observable state.
#[derive(Debug, Clone, Copy)]
pub struct FlagSight<'a> {
    pub positions: &'a [Vec2],
    pub captured: &'a [bool],
}

/// Everything a policy may consult when deciding for its team.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    pub field: &'a Field,
    pub own: TeamSight<'a>,
    pub enemy: TeamSight<'a>,
    pub own_flags: FlagSight<'a>,
    pub enemy_flags: FlagSight<'a>,
    /// Red-team sophistication knob, 1..=5.
    pub difficulty: u8,
}

impl WorldView<'_> {
    /// Number of agents on the deciding team.
    pub fn n_agents(&self) -> usize {
        self.own.positions.len()
    }

    /// Whether one of our agents stands in our home territory.
    pub fn in_own_territory(&self, agent_idx: usize) -> bool {
        self.field
            .in_territory(self.own.color, self.own.positions[agent_idx])
    }

    /// Whether one of our agents stands in the enemy's territory.
    pub fn in_enemy_territory(&self, agent_idx: usize) -> bool {
        self.field
            .in_territory(self.own.color.opponent(), self.own.positions[agent_idx])
    }

    /// Enemy agents currently standing in our home territory, tagged or not.
    pub fn enemies_in_territory(&self) -> Vec<usize> {
        (0..self.enemy.positions.len())
            .filter(|&idx| {
                self.field
                    .in_territory(self.own.color, self.enemy.positions[idx])
            })
            .collect()
    }

    /// Untagged enemy agents currently standing in our home territory.
    pub fn untagged_enemies_in_territory(&self) -> Vec<usize> {
        self.enemies_in_territory()
            .into_iter()
            .filter(|&idx| !self.enemy.tagged[idx])
            .collect()
    }

    /// Tagged enemy agents currently standing in our home territory.
    pub fn tagged_enemies_in_territory(&self) -> Vec<usize> {
        self.enemies_in_territory()
            .into_iter()
            .filter(|&idx| self.enemy.tagged[idx])
            .collect()
    }

    /// The live, untagged enemy closest to our first flag.
    pub fn closest_enemy_to_own_flag(&self) -> Option<usize> {
        let flag = *self.own_flags.positions.first()?;
        self.live_untagged_enemies()
            .min_by(|&a, &b| {
                let da = self.enemy.positions[a].distance(flag);
                let db = self.enemy.positions[b].distance(flag);
                da.total_cmp(&db)
            })
    }

    /// The live, untagged enemy highest up the field.
    pub fn highest_enemy(&self) -> Option<usize> {
        self.live_untagged_enemies()
            .max_by(|&a, &b| self.enemy.positions[a].y.total_cmp(&self.enemy.positions[b].y))
    }

    /// The live, untagged enemy lowest down the field.
    pub fn lowest_enemy(&self) -> Option<usize> {
        self.live_untagged_enemies()
            .min_by(|&a, &b| self.enemy.positions[a].y.total_cmp(&self.enemy.positions[b].y))
    }

    /// The enemy agent carrying our flag, if any.
    pub fn enemy_flag_holder(&self) -> Option<usize> {
        (0..self.enemy.positions.len()).find(|&idx| self.enemy.has_flag[idx])
    }

    fn live_untagged_enemies(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.enemy.positions.len())
            .filter(|&idx| self.enemy.alive[idx] && !self.enemy.tagged[idx])
    }
}
