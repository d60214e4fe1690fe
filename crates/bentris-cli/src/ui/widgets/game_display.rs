use std::time::Duration;

use bentris_engine::{Game, GamePhase};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{GridDisplay, StatsDisplay, color, style};

/// Playfield with a stats panel on its left, plus a banner once the game is
/// over.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    game: &'a Game,
    elapsed: Duration,
}

impl<'a> GameDisplay<'a> {
    pub fn new(game: &'a Game, elapsed: Duration) -> Self {
        Self { game, elapsed }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = match self.game.phase() {
            GamePhase::NotStarted | GamePhase::Running => color::WHITE,
            GamePhase::Ended => color::RED,
        };

        let frame = self.game.frame();
        let grid = GridDisplay::new(&frame).block(
            Block::bordered()
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let stats = StatsDisplay::new(self.game.stats(), self.elapsed).block(
            Block::bordered()
                .title(Line::from("STATS").centered())
                .padding(Padding::horizontal(1))
                .border_style(border_style)
                .style(style::DEFAULT),
        );

        let [left_column, center_column] = Layout::horizontal([
            Constraint::Length(stats.width()),
            Constraint::Length(grid.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);
        let [stats_area] = Layout::vertical([Constraint::Length(stats.height())]).areas(left_column);
        let [grid_area] = Layout::vertical([Constraint::Length(grid.height())]).areas(center_column);

        let grid_width = grid.width();
        stats.render(stats_area, buf);
        grid.render(grid_area, buf);

        if self.game.phase().is_ended() {
            let style = Style::new().fg(color::WHITE).bg(color::RED);
            let block = Block::new().style(style);
            let text = Text::styled("GAME OVER!!", style).centered();
            let area = grid_area.centered(Constraint::Length(grid_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
