//! Generation error taxonomy.
//!
//! Structural impossibilities (a leaf too small for a room) and no-path
//! conditions are resolved locally by skipping; only a broken invariant
//! between the topology graph and the physical door actors is fatal.

use thiserror::Error;

/// Fatal level-generation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    #[error("no door actor at mandatory connector {connector} position ({x}, {y})")]
    MissingDoor { connector: u32, x: i32, y: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_door_display() {
        let err = GenError::MissingDoor {
            connector: 3,
            x: 10,
            y: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("connector 3"));
        assert!(msg.contains("(10, 4)"));
    }
}
