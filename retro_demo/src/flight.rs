//! The flight game: one ship, a hidden spawner, and asteroids.
//!
//! ```text
//!   spawner ──(rng)──► "asteroid N" at (x, 0)
//!   asteroid: falls one row on even turns, removed at the bottom
//!   ship:     ← / → while the target cell is free, explodes otherwise
//! ```

use rand::Rng;
use retro_core::{
    Agent, Behavior, Game, GameConfig, GameResult, GameRng, KeyCode, Keystroke, Position, State,
    Value,
};
use tracing::{debug, info};

pub const SHIP: &str = "ship";
pub const SPAWNER: &str = "spawner";
pub const SCORE: &str = "score";

/// Spawn odds are `turn` in 1001, so the field thickens as the game goes on.
const SPAWN_ODDS: u64 = 1000;

/// Board and pace of the classic game.
pub fn flight_config() -> GameConfig {
    GameConfig::default().with_board_size((25, 25))
}

/// Sets up a fresh game: the ship centred on the bottom row, the spawner,
/// and a zero score.
pub fn new_game(config: GameConfig, rng: GameRng) -> GameResult<Game> {
    let size = config.board_size;
    let start = Position::new(i32::from(size.width / 2), i32::from(size.height) - 1);
    let ship = Agent::new(SHIP, start)
        .with_character('^')
        .with_color("lightcyan")
        .with_z(1)
        .with_behavior(Spaceship);
    let spawner = Agent::hidden(SPAWNER).with_behavior(AsteroidSpawner::new(rng));

    let mut state = State::new();
    state.insert(SCORE.to_string(), Value::Int(0));
    Game::new(vec![ship, spawner], state, config)
}

pub fn score(game: &Game) -> i64 {
    game.state_value(SCORE).and_then(Value::as_int).unwrap_or(0)
}

fn explode(game: &mut Game) -> GameResult<()> {
    let ship = game.get_agent_by_name_mut(SHIP)?;
    ship.character = Some('*');
    ship.color = Some("red".to_string());
    info!(turn = game.turn_number(), "ship destroyed");
    game.end();
    Ok(())
}

// =============================================================================
// SHIP
// =============================================================================

/// Steered with the left and right arrow keys.
pub struct Spaceship;

impl Behavior for Spaceship {
    fn handle_keystroke(&mut self, key: &Keystroke, name: &str, game: &mut Game) -> GameResult<()> {
        let dx = match key.code {
            KeyCode::Left => -1,
            KeyCode::Right => 1,
            _ => return Ok(()),
        };
        let target = game.get_agent_by_name(name)?.position().offset(dx, 0);
        if !game.on_board(target) {
            return Ok(());
        }
        if game.is_empty(target) {
            game.move_agent(name, target)
        } else {
            explode(game)
        }
    }
}

// =============================================================================
// ASTEROIDS
// =============================================================================

pub struct Asteroid;

impl Asteroid {
    /// A new asteroid agent, shaded for its row.
    pub fn agent(name: impl Into<String>, position: Position, board_height: u16) -> Agent {
        Agent::new(name, position)
            .with_character('O')
            .with_color(shade(position.y, board_height))
            .with_behavior(Asteroid)
    }
}

/// Asteroids darken as they fall.
fn shade(y: i32, board_height: u16) -> &'static str {
    let depth = f64::from(y) / f64::from(board_height);
    if depth < 0.2 {
        "lightcyan"
    } else if depth < 0.4 {
        "cyan"
    } else if depth < 0.6 {
        "lightblue"
    } else {
        "blue"
    }
}

impl Behavior for Asteroid {
    fn play_turn(&mut self, name: &str, game: &mut Game) -> GameResult<()> {
        if game.turn_number() % 2 != 0 {
            return Ok(());
        }
        let height = game.board_size().height;
        let position = game.get_agent_by_name(name)?.position();
        game.get_agent_by_name_mut(name)?.color = Some(shade(position.y, height).to_string());

        if position.y >= i32::from(height) - 1 {
            game.remove_agent_by_name(name)?;
            return Ok(());
        }
        let next = position.offset(0, 1);
        let ship = game.get_agent_by_name(SHIP).ok().map(Agent::position);
        if ship == Some(next) {
            explode(game)
        } else {
            game.move_agent(name, next)
        }
    }
}

// =============================================================================
// SPAWNER
// =============================================================================

/// Hidden agent that keeps score and drops new asteroids on the top row.
pub struct AsteroidSpawner {
    rng: GameRng,
}

impl AsteroidSpawner {
    pub fn new(rng: GameRng) -> Self {
        Self { rng }
    }

    fn should_spawn(&mut self, turn: u64) -> bool {
        self.rng.gen_range(0..=SPAWN_ODDS) < turn
    }
}

impl Behavior for AsteroidSpawner {
    fn play_turn(&mut self, _name: &str, game: &mut Game) -> GameResult<()> {
        game.update_state(SCORE, score(game) + 1)?;

        let turn = game.turn_number();
        if self.should_spawn(turn) {
            let size = game.board_size();
            let x = self.rng.gen_range(0..i32::from(size.width));
            let name = format!("asteroid {turn}");
            debug!(%name, x, "asteroid spawned");
            game.add_agent(Asteroid::agent(name, Position::new(x, 0), size.height))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use retro_core::{HeadlessScreen, InputEvent, SimContext};

    /// Ends the game once `turn` has been played by every agent before it.
    struct Ender {
        turn: u64,
    }

    impl Behavior for Ender {
        fn play_turn(&mut self, _name: &str, game: &mut Game) -> GameResult<()> {
            if game.turn_number() == self.turn {
                game.end();
            }
            Ok(())
        }
    }

    fn ender(turn: u64) -> Agent {
        Agent::hidden("ender").with_behavior(Ender { turn })
    }

    fn small_config() -> GameConfig {
        GameConfig::default().with_board_size((10, 6))
    }

    fn ship_at(x: i32, y: i32) -> Agent {
        Agent::new(SHIP, (x, y)).with_character('^').with_behavior(Spaceship)
    }

    async fn run(game: &mut Game, screen: &mut HeadlessScreen) {
        let ctx = SimContext::new(7);
        game.play(&ctx, screen).await.unwrap();
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(Keystroke::new(code))
    }

    #[test]
    fn test_new_game_layout() {
        let game = new_game(flight_config(), GameRng::seed_from_u64(1)).unwrap();
        assert_eq!(game.get_agent_by_name(SHIP).unwrap().position(), Position::new(12, 24));
        assert!(!game.get_agent_by_name(SPAWNER).unwrap().display);
        assert_eq!(score(&game), 0);
    }

    #[tokio::test]
    async fn test_ship_steers_and_stays_on_board() {
        let mut screen = HeadlessScreen::new(12, 14);
        screen.schedule_event(1, key(KeyCode::Left));
        screen.schedule_event(1, key(KeyCode::Left));
        screen.schedule_event(2, key(KeyCode::Right));
        screen.schedule_event(2, key(KeyCode::Up));
        let mut game = Game::new(vec![ship_at(1, 5), ender(3)], State::new(), small_config()).unwrap();

        run(&mut game, &mut screen).await;

        assert_eq!(game.get_agent_by_name(SHIP).unwrap().position(), Position::new(1, 5));
    }

    #[tokio::test]
    async fn test_ship_explodes_steering_into_asteroid() {
        let mut screen = HeadlessScreen::new(12, 14);
        screen.schedule_event(1, key(KeyCode::Right));
        let rock = Agent::new("rock", (4, 5)).with_character('O');
        let mut game = Game::new(vec![ship_at(3, 5), rock, ender(10)], State::new(), small_config()).unwrap();

        run(&mut game, &mut screen).await;

        let ship = game.get_agent_by_name(SHIP).unwrap();
        assert_eq!(ship.character, Some('*'));
        assert_eq!(ship.position(), Position::new(3, 5));
        assert_eq!(game.turn_number(), 1);
    }

    #[tokio::test]
    async fn test_asteroid_falls_on_even_turns() {
        let mut screen = HeadlessScreen::new(12, 14);
        let rock = Asteroid::agent("asteroid 0", Position::new(3, 0), 6);
        let mut game = Game::new(vec![ship_at(0, 5), rock, ender(4)], State::new(), small_config()).unwrap();

        run(&mut game, &mut screen).await;

        assert_eq!(game.get_agent_by_name("asteroid 0").unwrap().position(), Position::new(3, 3));
        assert_eq!(game.get_agent_by_name("asteroid 0").unwrap().color.as_deref(), Some("cyan"));
    }

    #[tokio::test]
    async fn test_asteroid_leaves_at_bottom() {
        let mut screen = HeadlessScreen::new(12, 14);
        let rock = Asteroid::agent("asteroid 0", Position::new(3, 5), 6);
        let mut game = Game::new(vec![ship_at(0, 5), rock, ender(1)], State::new(), small_config()).unwrap();

        run(&mut game, &mut screen).await;

        assert!(game.get_agent_by_name("asteroid 0").is_err());
        assert!(game.is_empty((3, 5)));
    }

    #[tokio::test]
    async fn test_asteroid_destroys_ship() {
        let mut screen = HeadlessScreen::new(12, 14);
        let rock = Asteroid::agent("asteroid 0", Position::new(4, 3), 6);
        let mut game = Game::new(vec![ship_at(4, 5), rock, ender(50)], State::new(), small_config()).unwrap();

        run(&mut game, &mut screen).await;

        assert!(game.is_over());
        assert_eq!(game.turn_number(), 2);
        assert_eq!(game.get_agent_by_name(SHIP).unwrap().character, Some('*'));
        assert_eq!(game.get_agent_by_name("asteroid 0").unwrap().position(), Position::new(4, 4));
    }

    fn spawner_game(seed: u64, turns: u64) -> Game {
        let spawner = Agent::hidden(SPAWNER).with_behavior(AsteroidSpawner::new(GameRng::seed_from_u64(seed)));
        let mut state = State::new();
        state.insert(SCORE.to_string(), Value::Int(0));
        // "ender" sorts before "spawner", so the last turn is not scored
        Game::new(vec![spawner, ender(turns)], state, GameConfig::default().with_board_size((10, 200))).unwrap()
    }

    fn field(game: &Game) -> Vec<(String, Position)> {
        game.agents()
            .filter(|agent| agent.name().starts_with("asteroid"))
            .map(|agent| (agent.name().to_string(), agent.position()))
            .collect()
    }

    #[tokio::test]
    async fn test_spawner_scores_every_turn() {
        let mut game = spawner_game(3, 400);
        let mut screen = HeadlessScreen::new(12, 208);

        run(&mut game, &mut screen).await;

        assert_eq!(score(&game), 400);
        let field = field(&game);
        assert!(!field.is_empty());
        for (_, position) in &field {
            assert!(game.on_board(*position));
        }
    }

    #[tokio::test]
    async fn test_spawner_is_deterministic_per_seed() {
        let mut first = spawner_game(11, 300);
        let mut second = spawner_game(11, 300);
        run(&mut first, &mut HeadlessScreen::new(12, 208)).await;
        run(&mut second, &mut HeadlessScreen::new(12, 208)).await;
        assert_eq!(field(&first), field(&second));
    }
}
