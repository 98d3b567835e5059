//! Hand sides and `/user/...` path helpers

use serde::{Deserialize, Serialize};
use std::fmt;

pub const LEFT_HAND: &str = "/user/hand/left";
pub const RIGHT_HAND: &str = "/user/hand/right";

/// Hand side of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Index into per-hand arrays
    pub const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Top level user path of this hand
    pub const fn user_path(self) -> &'static str {
        match self {
            Side::Left => LEFT_HAND,
            Side::Right => RIGHT_HAND,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "Left"),
            Side::Right => write!(f, "Right"),
        }
    }
}

/// Derives the hand from a path prefix. Anything but the two hand paths (gamepad,
/// head, ...) has no side.
pub fn side_of(path: &str) -> Option<Side> {
    if path.starts_with(LEFT_HAND) {
        Some(Side::Left)
    } else if path.starts_with(RIGHT_HAND) {
        Some(Side::Right)
    } else {
        None
    }
}

/// Splits a full hand path into its side and the component suffix,
/// e.g. `/user/hand/left/input/trigger/value` -> (Left, `/input/trigger/value`)
pub fn split_hand_path(path: &str) -> Option<(Side, &str)> {
    let side = side_of(path)?;
    Some((side, &path[side.user_path().len()..]))
}

/// Concatenates an optional subaction path with an action's bound path
///
/// A separator is inserted only when neither side of the join provides one.
pub fn join_action_path(subaction_path: &str, bound_path: &str) -> String {
    let mut path = String::with_capacity(subaction_path.len() + bound_path.len() + 1);
    path.push_str(subaction_path);

    if !path.is_empty() && !path.ends_with('/') && !bound_path.starts_with('/') {
        path.push('/');
    }

    path.push_str(bound_path);
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_comes_from_prefix() {
        assert_eq!(side_of("/user/hand/left/input/trigger/value"), Some(Side::Left));
        assert_eq!(side_of("/user/hand/right"), Some(Side::Right));
        assert_eq!(side_of("/user/gamepad/input/a/click"), None);
        assert_eq!(side_of(""), None);
    }

    #[test]
    fn split_returns_component_suffix() {
        let (side, suffix) = split_hand_path("/user/hand/right/output/haptic").unwrap();
        assert_eq!(side, Side::Right);
        assert_eq!(suffix, "/output/haptic");
        assert!(split_hand_path("/user/head/input/volume_up/click").is_none());
    }

    #[test]
    fn join_inserts_separator_when_missing() {
        assert_eq!(join_action_path("/user/hand/left", "input/x"), "/user/hand/left/input/x");
        assert_eq!(join_action_path("/user/hand/left/", "input/x"), "/user/hand/left/input/x");
        assert_eq!(
            join_action_path("", "/user/hand/right/input/a/click"),
            "/user/hand/right/input/a/click"
        );
        assert_eq!(
            join_action_path("/user/hand/left", "/user/hand/left/input/x/click"),
            "/user/hand/left/user/hand/left/input/x/click"
        );
    }
}
