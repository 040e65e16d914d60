//! Snapshot assembly: converting live team/flag state to and from the
//! keyed `MatchSnapshot` record consumed by external adapters.

use capflag_core::state::{FlagState, TeamState};

use crate::flags::FlagSet;
use crate::team::Team;

pub fn team_state(team: &Team) -> TeamState {
    TeamState {
        positions: team.positions.clone(),
        velocities: team.velocities.clone(),
        azimuths: team.azimuths.clone(),
        accelerations: team.accelerations.clone(),
        alive: team.alive.clone(),
        tagged: team.tagged.clone(),
        has_flag: team.has_flag.clone(),
    }
}

/// Overwrite a team's state from a snapshot. The snapshot must come from a
/// match with the same agent count; extra entries on either side are
/// ignored.
pub fn apply_team_state(team: &mut Team, state: &TeamState) {
    copy_into(&mut team.positions, &state.positions);
    copy_into(&mut team.velocities, &state.velocities);
    copy_into(&mut team.azimuths, &state.azimuths);
    copy_into(&mut team.accelerations, &state.accelerations);
    copy_into(&mut team.alive, &state.alive);
    copy_into(&mut team.tagged, &state.tagged);
    copy_into(&mut team.has_flag, &state.has_flag);
}

pub fn flag_state(flags: &FlagSet) -> FlagState {
    FlagState {
        positions: flags.positions.clone(),
        captured: flags.captured.clone(),
    }
}

pub fn apply_flag_state(flags: &mut FlagSet, state: &FlagState) {
    copy_into(&mut flags.positions, &state.positions);
    copy_into(&mut flags.captured, &state.captured);
}

fn copy_into<T: Copy>(dst: &mut [T], src: &[T]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d = *s;
    }
}
