//! Concrete monster types
//!
//! Each type is a stateless unit struct implementing
//! [`crate::monster::Behavior`], registered as a `static` shared by all
//! its instances. These three cover the seam's range: a melee bruiser,
//! a ranged skirmisher with a custom task, and a squad-forming flocker.

pub mod flockling;
pub mod shambler;
pub mod stalker;

use crate::core::types::Classify;
use crate::monster::Behavior;

/// Stand-in for a player avatar
///
/// Never thinks; exists so monsters have something to classify as
/// `Player` and so the sensing cull has an observer to check against.
pub struct PlayerProxy;

/// Shared descriptor for all player proxies
pub static PLAYER_PROXY: PlayerProxy = PlayerProxy;

impl Behavior for PlayerProxy {
    fn name(&self) -> &'static str {
        "player"
    }

    fn classify(&self) -> Classify {
        Classify::Player
    }

    fn autonomous(&self) -> bool {
        false
    }

    fn max_health(&self) -> f32 {
        100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_proxy_never_thinks() {
        assert!(!PLAYER_PROXY.autonomous());
        assert_eq!(PLAYER_PROXY.classify(), Classify::Player);
    }
}
