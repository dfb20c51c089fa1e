//! Game - the authoritative world and turn loop.
//!
//! ```text
//!   Game::new ──► render layout ──► ┌─────────── tick ───────────┐
//!                                   │ clock.next_tick (pacing)   │
//!                                   │ input: resize / keys / ^C  │
//!                                   │ play_turn, by agent name   │
//!                                   │ render frame               │
//!                                   └────────────┬───────────────┘
//!                                                ▼
//!                                    end() / error ──► terminal restored
//! ```

use crate::agent::{Agent, Behavior};
use crate::board::{BoardSize, Position};
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::display::{InputEvent, Keystroke, Screen, TerminalScreen};
use crate::error::{GameError, GameResult};
use crate::registry::AgentRegistry;
use crate::state::{State, Value};
use crate::validation::{validate_agent, validate_agent_name, validate_state, validate_state_value};
use crate::view::View;
use retro_env::{GameContext, TokioContext};
use tracing::{debug, info};

/// One `Game::log` message and the turn it was written on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub turn: u64,
    pub message: String,
}

pub struct Game {
    registry: AgentRegistry,
    state: State,
    config: GameConfig,
    clock: Clock,
    turn_number: u64,
    log_messages: Vec<LogEntry>,
    ended: bool,
}

impl Game {
    /// Builds a game, registering each agent through [`Game::add_agent`].
    pub fn new(
        agents: impl IntoIterator<Item = Agent>,
        state: State,
        config: GameConfig,
    ) -> GameResult<Self> {
        let config = config.validate()?;
        let mut game = Self {
            registry: AgentRegistry::new(),
            state: validate_state(state)?,
            clock: Clock::from_framerate(config.framerate),
            config,
            turn_number: 0,
            log_messages: Vec::new(),
            ended: false,
        };
        for agent in agents {
            game.add_agent(agent)?;
        }
        Ok(game)
    }

    // =========================================================================
    // REGISTRY
    // =========================================================================

    pub fn add_agent(&mut self, agent: Agent) -> GameResult<()> {
        validate_agent(&agent)?;
        if self.registry.contains(agent.name()) {
            return Err(GameError::AgentAlreadyExists(agent.name().to_string()));
        }
        if !self.on_board(agent.position()) {
            return Err(GameError::illegal_move(agent.name(), agent.position()));
        }
        debug!(agent = agent.name(), position = %agent.position(), "agent added");
        self.registry
            .insert(agent)
            .map_err(|agent| GameError::AgentAlreadyExists(agent.name().to_string()))
    }

    /// Removes an agent and hands it back.
    pub fn remove_agent_by_name(&mut self, name: &str) -> GameResult<Agent> {
        validate_agent_name(name)?;
        let agent = self
            .registry
            .remove(name)
            .ok_or_else(|| GameError::AgentNotFound(name.to_string()))?;
        debug!(agent = name, "agent removed");
        Ok(agent)
    }

    pub fn get_agent_by_name(&self, name: &str) -> GameResult<&Agent> {
        validate_agent_name(name)?;
        self.registry
            .get(name)
            .ok_or_else(|| GameError::AgentNotFound(name.to_string()))
    }

    /// Mutable access to an agent's cosmetic fields (glyph, colour, z).
    pub fn get_agent_by_name_mut(&mut self, name: &str) -> GameResult<&mut Agent> {
        validate_agent_name(name)?;
        self.registry
            .get_mut(name)
            .ok_or_else(|| GameError::AgentNotFound(name.to_string()))
    }

    /// Agents at a cell in arrival order; empty for a vacant cell.
    pub fn get_agents_by_position(&self, position: impl Into<Position>) -> Vec<&Agent> {
        self.registry.at(position.into())
    }

    pub fn is_empty(&self, position: impl Into<Position>) -> bool {
        self.registry.is_vacant(position.into())
    }

    /// The only way an agent changes cell once registered. On failure
    /// nothing is modified.
    pub fn move_agent(&mut self, name: &str, position: impl Into<Position>) -> GameResult<()> {
        let position = position.into();
        let agent = self.get_agent_by_name(name)?;
        validate_agent(agent)?;
        if !self.on_board(position) {
            return Err(GameError::illegal_move(name, position));
        }
        let from = agent.position();
        self.registry.relocate(name, position);
        debug!(agent = name, %from, to = %position, "agent moved");
        Ok(())
    }

    pub fn on_board(&self, position: impl Into<Position>) -> bool {
        self.config.board_size.contains(position.into())
    }

    /// All agents in ascending name order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.registry.iter()
    }

    pub fn agent_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    // =========================================================================
    // STATE & LOG
    // =========================================================================

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_value(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Replaces the value of an existing key. New keys are refused: the
    /// shape of the state is fixed at construction.
    pub fn update_state(&mut self, key: &str, value: impl Into<Value>) -> GameResult<()> {
        let value = value.into();
        validate_state_value(key, &value)?;
        let slot = self
            .state
            .get_mut(key)
            .ok_or_else(|| GameError::invalid_state(format!("unknown state key {key}")))?;
        *slot = value;
        Ok(())
    }

    pub fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(turn = self.turn_number, "{}", message);
        self.log_messages.push(LogEntry {
            turn: self.turn_number,
            message,
        });
    }

    pub fn log_messages(&self) -> &[LogEntry] {
        &self.log_messages
    }

    pub fn turn_number(&self) -> u64 {
        self.turn_number
    }

    pub fn board_size(&self) -> BoardSize {
        self.config.board_size
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Stops the session once the current agent returns.
    pub fn end(&mut self) {
        if !self.ended {
            info!(turn = self.turn_number, "game ended");
        }
        self.ended = true;
    }

    pub fn is_over(&self) -> bool {
        self.ended
    }

    // =========================================================================
    // TURNS
    // =========================================================================

    /// Runs every agent's turn once, in ascending name order.
    ///
    /// Agents added during the turn first play on the next one; agents
    /// removed earlier in the turn are skipped.
    pub fn play_turn(&mut self) -> GameResult<()> {
        self.dispatch(|behavior, name, game| behavior.play_turn(name, game))
    }

    /// Offers a keystroke to every agent, in ascending name order.
    pub fn handle_keystroke(&mut self, key: &Keystroke) -> GameResult<()> {
        self.dispatch(|behavior, name, game| behavior.handle_keystroke(key, name, game))
    }

    fn dispatch<F>(&mut self, mut call: F) -> GameResult<()>
    where
        F: FnMut(&mut dyn Behavior, &str, &mut Game) -> GameResult<()>,
    {
        for name in self.registry.names() {
            if self.ended {
                break;
            }
            let Some(mut behavior) = self.registry.get_mut(&name).and_then(Agent::take_behavior) else {
                continue;
            };
            let outcome = call(behavior.as_mut(), &name, self);
            // An agent that removed itself loses its behaviour with it
            if let Some(agent) = self.registry.get_mut(&name) {
                agent.restore_behavior(behavior);
            }
            outcome?;
        }
        Ok(())
    }

    // =========================================================================
    // SESSION
    // =========================================================================

    /// Runs the game loop until [`Game::end`] is called or something fails.
    pub async fn play<Ctx, S>(&mut self, ctx: &Ctx, screen: &mut S) -> GameResult<()>
    where
        Ctx: GameContext + ?Sized,
        S: Screen,
    {
        let view = View::new(self.config.board_size, self.config.debug);
        info!(
            agents = self.agent_count(),
            framerate = self.config.framerate,
            "session started"
        );
        view.check_terminal_size(screen.size()?)?;
        screen.present(|buf| view.render_layout(buf))?;

        while !self.ended {
            self.turn_number = self.clock.next_tick(ctx).await;

            for event in screen.poll_events()? {
                match event {
                    InputEvent::Resize(width, height) => {
                        debug!(width, height, "terminal resized");
                        // Leaves the last frame on screen if the new size cannot fit
                        view.check_terminal_size(screen.size()?)?;
                        screen.present(|buf| view.render_layout(buf))?;
                    }
                    InputEvent::Key(key) => self.handle_keystroke(&key)?,
                    InputEvent::Interrupt => {
                        info!("interrupted");
                        self.end();
                    }
                }
                if self.ended {
                    break;
                }
            }
            if self.ended {
                break;
            }

            self.play_turn()?;
            if self.ended {
                break;
            }
            screen.present(|buf| view.render(self, buf))?;
        }

        info!(turn = self.turn_number, "session finished");
        Ok(())
    }

    /// Plays in the real terminal at real speed. The terminal is restored
    /// on every exit path.
    pub async fn play_in_terminal(&mut self) -> GameResult<()> {
        let ctx = TokioContext::new();
        let mut screen = TerminalScreen::open()?;
        self.play(&ctx, &mut screen).await
    }
}
