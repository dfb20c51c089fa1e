//! View - board placement, layout borders and agent compositing.
//!
//! The drawn frame is an outer box around the board, split by a horizontal
//! divider above the state panel, with an optional debug panel on the
//! right:
//!
//! ```text
//! ╔═════════╦═══════════╗
//! ║  board  ║   debug   ║
//! ║         ║    log    ║
//! ╠═════════╣           ║
//! ║  state  ║           ║
//! ╚═════════╩═══════════╝
//! ```
//!
//! The frame is centred in the terminal on both axes.

use crate::agent::Agent;
use crate::board::BoardSize;
use crate::error::{GameError, GameResult};
use crate::game::Game;
use crate::graph::Graph;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Paragraph, Widget},
};
use std::str::FromStr;
use tracing::warn;

pub struct View {
    board_size: BoardSize,
    debug: bool,
}

impl View {
    /// Left and right border columns
    pub const BORDER_X: u16 = 2;
    /// Top border, divider and bottom border rows
    pub const BORDER_Y: u16 = 3;
    pub const STATE_HEIGHT: u16 = 5;
    /// Debug panel width including its right border
    pub const DEBUG_WIDTH: u16 = 20;

    pub fn new(board_size: BoardSize, debug: bool) -> Self {
        Self { board_size, debug }
    }

    /// Terminal (width, height) needed for the whole frame.
    pub fn required_size(&self) -> (u16, u16) {
        let panel = if self.debug { Self::DEBUG_WIDTH } else { 0 };
        let width = self
            .board_size
            .width
            .saturating_add(Self::BORDER_X)
            .saturating_add(panel);
        let height = self
            .board_size
            .height
            .saturating_add(Self::BORDER_Y)
            .saturating_add(Self::STATE_HEIGHT);
        (width, height)
    }

    pub fn check_terminal_size(&self, area: Rect) -> GameResult<()> {
        let (width_needed, height_needed) = self.required_size();
        if area.width < width_needed || area.height < height_needed {
            warn!(
                "terminal {}x{} cannot fit {}x{}",
                area.width, area.height, width_needed, height_needed
            );
            return Err(GameError::TerminalTooSmall {
                width: area.width,
                width_needed,
                height: area.height,
                height_needed,
            });
        }
        Ok(())
    }

    /// Top-left corner of the outer frame.
    pub fn frame_origin(&self, area: Rect) -> (u16, u16) {
        let (width, height) = self.required_size();
        (
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
        )
    }

    /// Screen cell of board position (0, 0).
    pub fn board_origin(&self, area: Rect) -> (u16, u16) {
        let (x, y) = self.frame_origin(area);
        (x + 1, y + 1)
    }

    /// Builds the border graph for a terminal of the given size.
    pub fn layout_graph(&self, area: Rect) -> GameResult<Graph> {
        self.check_terminal_size(area)?;
        let (width, height) = self.required_size();
        let (left, top) = self.frame_origin(area);
        let right = left + width - 1;
        let bottom = top + height - 1;
        let divider = top + self.board_size.height + 1;

        let mut graph = Graph::new();
        let top_left = graph.add_vertex(left, top);
        let divider_left = graph.add_vertex(left, divider);
        let bottom_left = graph.add_vertex(left, bottom);
        let top_right = graph.add_vertex(right, top);
        let bottom_right = graph.add_vertex(right, bottom);

        if self.debug {
            let column = left + self.board_size.width + 1;
            let top_mid = graph.add_vertex(column, top);
            let divider_mid = graph.add_vertex(column, divider);
            let bottom_mid = graph.add_vertex(column, bottom);
            graph.connect_path(&[
                top_left,
                top_mid,
                top_right,
                bottom_right,
                bottom_mid,
                bottom_left,
                divider_left,
                top_left,
            ])?;
            graph.connect_path(&[top_mid, divider_mid, bottom_mid])?;
            graph.connect(divider_left, divider_mid)?;
        } else {
            let divider_right = graph.add_vertex(right, divider);
            graph.connect_path(&[
                top_left,
                top_right,
                divider_right,
                bottom_right,
                bottom_left,
                divider_left,
                top_left,
            ])?;
            graph.connect(divider_left, divider_right)?;
        }
        Ok(graph)
    }

    /// Clears the buffer and draws the borders. Fails before drawing
    /// anything when the terminal is too small.
    pub fn render_layout(&self, buf: &mut Buffer) -> GameResult<()> {
        let graph = self.layout_graph(buf.area)?;
        buf.reset();
        graph.draw(buf);
        Ok(())
    }

    /// Draws the layout, the agents, and the side panels.
    pub fn render(&self, game: &Game, buf: &mut Buffer) -> GameResult<()> {
        self.render_layout(buf)?;
        let area = buf.area;
        self.draw_agents(game.agents(), area, buf);
        self.draw_state(game, area, buf);
        if self.debug {
            self.draw_log(game, area, buf);
        }
        Ok(())
    }

    fn draw_agents<'a>(&self, agents: impl Iterator<Item = &'a Agent>, area: Rect, buf: &mut Buffer) {
        let (ox, oy) = self.board_origin(area);
        let mut visible: Vec<&Agent> = agents.filter(|agent| agent.display).collect();
        // Stable: equal z keeps name order
        visible.sort_by_key(|agent| agent.z);

        for agent in visible {
            let Some(character) = agent.character else {
                continue;
            };
            let position = agent.position();
            let (Ok(dx), Ok(dy)) = (u16::try_from(position.x), u16::try_from(position.y)) else {
                continue;
            };
            if let Some(cell) = buf.cell_mut((ox + dx, oy + dy)) {
                cell.set_char(character);
                if let Some(color) = agent.color.as_deref().and_then(|name| Color::from_str(name).ok()) {
                    cell.set_fg(color);
                }
            }
        }
    }

    fn state_panel(&self, area: Rect) -> Rect {
        let (left, top) = self.frame_origin(area);
        Rect::new(
            left + 1,
            top + self.board_size.height + 2,
            self.board_size.width,
            Self::STATE_HEIGHT,
        )
    }

    fn debug_panel(&self, area: Rect) -> Rect {
        let (left, top) = self.frame_origin(area);
        let (_, height) = self.required_size();
        Rect::new(
            left + self.board_size.width + 2,
            top + 1,
            Self::DEBUG_WIDTH - 1,
            height - 2,
        )
    }

    fn draw_state(&self, game: &Game, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = game
            .state()
            .iter()
            .map(|(key, value)| Line::from(format!("{key}: {value}")))
            .collect();
        Paragraph::new(lines).render(self.state_panel(area), buf);
    }

    fn draw_log(&self, game: &Game, area: Rect, buf: &mut Buffer) {
        let panel = self.debug_panel(area);
        let messages = game.log_messages();
        let skip = messages.len().saturating_sub(usize::from(panel.height));
        let lines: Vec<Line> = messages[skip..]
            .iter()
            .map(|entry| Line::from(format!("{}: {}", entry.turn, entry.message)))
            .collect();
        Paragraph::new(lines)
            .style(Style::default().fg(Color::DarkGray))
            .render(panel, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(buf: &Buffer) -> Vec<String> {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_required_size() {
        assert_eq!(View::new(BoardSize::new(10, 5), false).required_size(), (12, 13));
        assert_eq!(View::new(BoardSize::new(10, 5), true).required_size(), (32, 13));
    }

    #[test]
    fn test_too_small_reports_dimensions() {
        let view = View::new(BoardSize::new(10, 5), false);
        let err = view.check_terminal_size(Rect::new(0, 0, 11, 40)).unwrap_err();
        match err {
            GameError::TerminalTooSmall {
                width,
                width_needed,
                height,
                height_needed,
            } => {
                assert_eq!((width, width_needed), (11, 12));
                assert_eq!((height, height_needed), (40, 13));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_too_small_leaves_buffer_untouched() {
        let view = View::new(BoardSize::new(10, 5), false);
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 4));
        buf.set_string(0, 0, "keep", Style::default());
        assert!(view.render_layout(&mut buf).is_err());
        assert_eq!(rows(&buf)[0], "keep");
    }

    #[test]
    fn test_layout_without_debug() {
        let view = View::new(BoardSize::new(3, 2), false);
        let mut buf = Buffer::empty(Rect::new(0, 0, 5, 10));
        view.render_layout(&mut buf).unwrap();
        let rows = rows(&buf);
        assert_eq!(rows[0], "╔═══╗");
        assert_eq!(rows[1], "║   ║");
        assert_eq!(rows[2], "║   ║");
        assert_eq!(rows[3], "╠═══╣");
        for row in &rows[4..9] {
            assert_eq!(row, "║   ║");
        }
        assert_eq!(rows[9], "╚═══╝");
    }

    #[test]
    fn test_layout_with_debug_panel() {
        let view = View::new(BoardSize::new(2, 1), true);
        let (width, height) = view.required_size();
        assert_eq!((width, height), (24, 9));
        let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
        view.render_layout(&mut buf).unwrap();
        let rows = rows(&buf);
        let inner = " ".repeat(19);
        let fill = "═".repeat(19);
        assert_eq!(rows[0], format!("╔══╦{fill}╗"));
        assert_eq!(rows[1], format!("║  ║{inner}║"));
        assert_eq!(rows[2], format!("╠══╣{inner}║"));
        assert_eq!(rows[3], format!("║  ║{inner}║"));
        assert_eq!(rows[8], format!("╚══╩{fill}╝"));
    }

    #[test]
    fn test_frame_is_centered() {
        let view = View::new(BoardSize::new(3, 2), false);
        let area = Rect::new(0, 0, 9, 14);
        assert_eq!(view.frame_origin(area), (2, 2));
        assert_eq!(view.board_origin(area), (3, 3));

        let graph = view.layout_graph(area).unwrap();
        let top_left = &graph.vertices()[0];
        assert_eq!((top_left.x, top_left.y), (2, 2));
    }

    #[test]
    fn test_debug_frame_is_centered() {
        let view = View::new(BoardSize::new(2, 1), true);
        let area = Rect::new(0, 0, 30, 13);
        assert_eq!(view.frame_origin(area), (3, 2));
        assert_eq!(view.board_origin(area), (4, 3));

        let mut buf = Buffer::empty(area);
        view.render_layout(&mut buf).unwrap();
        let rows = rows(&buf);
        assert_eq!(rows[1], " ".repeat(30));
        assert!(rows[2].starts_with("   ╔══╦═"), "{}", rows[2]);
        assert!(rows[2].ends_with("╗   "), "{}", rows[2]);
        assert!(rows[10].starts_with("   ╚══╩═"), "{}", rows[10]);
    }

    #[test]
    fn test_agent_colours_and_hidden_agents() {
        use crate::{Agent, GameConfig, State};

        let agents = vec![
            Agent::new("a", (1, 0)).with_character('a').with_color("red"),
            Agent::new("b", (0, 0)).with_character('b').with_color("not a colour"),
            Agent::hidden("c").with_character('c').with_position((1, 0)).with_z(5),
        ];
        let config = GameConfig::default().with_board_size((2, 1));
        let game = Game::new(agents, State::new(), config).unwrap();
        let view = View::new(BoardSize::new(2, 1), false);
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 9));

        view.render(&game, &mut buf).unwrap();

        let red = buf.cell((2, 1)).unwrap();
        assert_eq!(red.symbol(), "a");
        assert_eq!(red.fg, Color::Red);
        let plain = buf.cell((1, 1)).unwrap();
        assert_eq!(plain.symbol(), "b");
        assert_eq!(plain.fg, Color::Reset);
    }
}
