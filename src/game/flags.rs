//! Movement intent flags and the flag-set lifecycle

use crate::game::player::Player;

/// Degrees of rotation applied per tick while a rotate flag is active
pub const ROTATION_SPEED: f32 = 5.0;
/// World units travelled per tick while a move flag is active
pub const MOVEMENT_SPEED: f32 = 5.0;

/// A movement intent currently active on a character.
///
/// Flags are stateless and shared: every character holding `MoveForward`
/// gets the same behavior. Each variant applies one constant-magnitude
/// kinematic step per tick; the frame delta does not scale the step, so the
/// packet stream stays identical across clients running at the same tick
/// rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    MoveForward,
    MoveBackward,
    RotateLeft,
    RotateRight,
}

impl Flag {
    /// Apply one kinematic step to `player` and emit the matching state
    /// packet. Move flags read the rotation current at this call.
    pub fn apply(self, player: &mut Player) {
        match self {
            Flag::MoveForward => {
                player.move_forward();
                player.send_location_packet();
            }
            Flag::MoveBackward => {
                player.move_back();
                player.send_location_packet();
            }
            Flag::RotateLeft => {
                player.rotate_left();
                player.send_rotation_packet();
            }
            Flag::RotateRight => {
                player.rotate_right();
                player.send_rotation_packet();
            }
        }
    }
}

/// An entity that holds a flag set and reconciles it each tick.
///
/// Key releases land between ticks, so removal is deferred: `flag_to_remove`
/// only schedules, and `process_flags` reaps the scheduled set before
/// applying what remains. The set of flags applied on a given tick is
/// therefore well-defined regardless of how edges interleave with frames.
pub trait Flaggable {
    /// Activate a flag. Idempotent; also cancels a removal scheduled for
    /// the same flag, so the last edge in an inter-tick window wins.
    fn flag(&mut self, flag: Flag);

    /// Schedule a flag to leave the active set at the next tick boundary.
    /// Idempotent; scheduling a flag that is not active is a no-op at reap
    /// time.
    fn flag_to_remove(&mut self, flag: Flag);

    /// Reap scheduled removals, then apply every remaining active flag once.
    fn process_flags(&mut self);
}
