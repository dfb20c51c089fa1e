//! Validation Module - Structural checks at every mutation boundary
//! =================================================================
//!
//! Pure functions that either hand back the value they were given or fail
//! with the matching [`GameError`]. The game calls them on every add,
//! remove, move and lookup rather than once at startup, so an agent that
//! was corrupted after registration is caught at the next operation that
//! touches it.

use crate::agent::Agent;
use crate::board::{BoardSize, Position};
use crate::error::{GameError, GameResult};
use crate::state::{State, Value};
use std::time::Duration;

// =============================================================================
// AGENTS
// =============================================================================

/// Checks the agent contract: a name, and a glyph for displayed agents.
pub fn validate_agent(agent: &Agent) -> GameResult<&Agent> {
    if agent.name().is_empty() {
        return Err(GameError::invalid_agent("agent must have a name"));
    }
    if agent.display && agent.character.is_none() {
        return Err(GameError::invalid_agent(format!(
            "agent {} is displayed and must have a character",
            agent.name()
        )));
    }
    validate_agent_name(agent.name())?;
    Ok(agent)
}

/// Names are registry keys and must be non-empty.
pub fn validate_agent_name(name: &str) -> GameResult<&str> {
    if name.is_empty() || name.chars().any(char::is_control) {
        return Err(GameError::InvalidAgentName(name.to_string()));
    }
    Ok(name)
}

// =============================================================================
// POSITIONS
// =============================================================================

/// Accepts exactly a two-element tuple of integers that fit a coordinate.
pub fn validate_position(value: &Value) -> GameResult<Position> {
    let Value::Tuple(items) = value else {
        return Err(GameError::InvalidPosition(format!(
            "position is {}, but must be a tuple",
            value.describe()
        )));
    };
    match items.as_slice() {
        [Value::Int(x), Value::Int(y)] => {
            let x = i32::try_from(*x)
                .map_err(|_| GameError::InvalidPosition(format!("x coordinate {x} is out of range")))?;
            let y = i32::try_from(*y)
                .map_err(|_| GameError::InvalidPosition(format!("y coordinate {y} is out of range")))?;
            Ok(Position::new(x, y))
        }
        _ => Err(GameError::InvalidPosition(format!(
            "position is {value}, must be a tuple of two integers"
        ))),
    }
}

impl TryFrom<&Value> for Position {
    type Error = GameError;

    fn try_from(value: &Value) -> GameResult<Self> {
        validate_position(value)
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Every state value must be immutable: scalars or tuples of immutables.
pub fn validate_state(state: State) -> GameResult<State> {
    for (key, value) in &state {
        validate_state_value(key, value)?;
    }
    Ok(state)
}

pub(crate) fn validate_state_value(key: &str, value: &Value) -> GameResult<()> {
    if !value.is_immutable() {
        return Err(GameError::invalid_state(format!(
            "state must be immutable, but state[{key}] is {}",
            value.describe()
        )));
    }
    Ok(())
}

// =============================================================================
// CONFIGURATION
// =============================================================================

pub fn validate_board_size(board_size: BoardSize) -> GameResult<BoardSize> {
    if board_size.width == 0 || board_size.height == 0 {
        return Err(GameError::invalid_config(format!(
            "board must have at least one cell, got {}x{}",
            board_size.width, board_size.height
        )));
    }
    Ok(board_size)
}

pub fn validate_framerate(framerate: f64) -> GameResult<f64> {
    if !framerate.is_finite() || framerate <= 0.0 {
        return Err(GameError::invalid_config(format!(
            "framerate must be a positive number, got {framerate}"
        )));
    }
    // The tick interval must fit a Duration
    if Duration::try_from_secs_f64(1.0 / framerate).is_err() {
        return Err(GameError::invalid_config(format!(
            "framerate {framerate} is too low to schedule"
        )));
    }
    Ok(framerate)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn state(entries: Vec<(&str, Value)>) -> State {
        entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_state_with_list_is_rejected() {
        let bad = state(vec![
            ("score", Value::from((1, 2))),
            ("bad", Value::List(vec![Value::Int(1), Value::Int(2)])),
        ]);
        let err = validate_state(bad).unwrap_err();
        assert!(matches!(err, GameError::InvalidState(ref msg) if msg.contains("state[bad]")));
    }

    #[test]
    fn test_state_with_nested_tuple_is_accepted() {
        let good = state(vec![("score", Value::Int(0)), ("pos", Value::from((1, (2, 3))))]);
        let validated = validate_state(good.clone()).unwrap();
        assert_eq!(validated, good);
    }

    #[test]
    fn test_state_with_map_is_rejected() {
        let bad = state(vec![("inventory", Value::Map(BTreeMap::new()))]);
        assert!(validate_state(bad).is_err());
    }

    #[test]
    fn test_displayed_agent_needs_character() {
        let mut agent = Agent::new("ship", (0, 0));
        assert!(matches!(validate_agent(&agent), Err(GameError::InvalidAgent(_))));

        agent.character = Some('^');
        assert!(validate_agent(&agent).is_ok());

        let hidden = Agent::hidden("spawner");
        assert!(validate_agent(&hidden).is_ok());
    }

    #[test]
    fn test_agent_without_name_is_invalid() {
        let agent = Agent::new("", (0, 0)).with_character('x');
        assert!(matches!(validate_agent(&agent), Err(GameError::InvalidAgent(_))));
    }

    #[test]
    fn test_agent_name_validation() {
        assert_eq!(validate_agent_name("asteroid 3").unwrap(), "asteroid 3");
        assert!(matches!(validate_agent_name(""), Err(GameError::InvalidAgentName(_))));
        assert!(validate_agent_name("bad\nname").is_err());
    }

    #[test]
    fn test_position_validation() {
        assert_eq!(validate_position(&Value::from((3, 4))).unwrap(), Position::new(3, 4));
        assert_eq!(Position::try_from(&Value::from((-1, 0))).unwrap(), Position::new(-1, 0));

        let three = Value::Tuple(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(matches!(validate_position(&three), Err(GameError::InvalidPosition(_))));

        let floats = Value::from((1.0, 2.0));
        assert!(validate_position(&floats).is_err());

        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert!(validate_position(&list).is_err());

        let huge = Value::from((i64::MAX, 0i64));
        assert!(validate_position(&huge).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(validate_board_size(BoardSize::new(10, 5)).is_ok());
        assert!(validate_board_size(BoardSize::new(0, 5)).is_err());
        assert_eq!(validate_framerate(24.0).unwrap(), 24.0);
        assert!(validate_framerate(0.0).is_err());
        assert!(validate_framerate(f64::NAN).is_err());
        assert!(validate_framerate(f64::INFINITY).is_err());
        assert!(matches!(validate_framerate(1e-30), Err(GameError::InvalidConfig(_))));
        assert!(validate_framerate(1e-3).is_ok());
    }
}
