use std::{iter, time::Duration};

use bentris_engine::GameStats;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct StatsDisplay<'a> {
    stats: &'a GameStats,
    elapsed: Duration,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(stats: &'a GameStats, elapsed: Duration) -> Self {
        Self {
            stats,
            elapsed,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    #[expect(clippy::cast_possible_truncation)]
    pub fn height(&self) -> u16 {
        ROWS.len() as u16 + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = fn(&GameStats, Duration) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(|stats, _| stats.score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(|_, elapsed| {
        format!(
            "{:0}:{:0>2}.{:0>2}",
            elapsed.as_secs() / 60,
            elapsed.as_secs() % 60,
            elapsed.subsec_millis() / 10
        )
    }),
    Row::Empty,
    Row::LabelValue("PIECES:", |stats, _| stats.landed_pieces().to_string()),
    Row::LabelValue("ROWS:", |stats, _| stats.total_cleared_rows().to_string()),
    Row::Empty,
    Row::LabelValue("1 ROW:", |stats, _| {
        stats.row_clear_histogram()[1].to_string()
    }),
    Row::LabelValue("2 ROWS:", |stats, _| {
        stats.row_clear_histogram()[2].to_string()
    }),
    Row::LabelValue("3 ROWS:", |stats, _| {
        stats.row_clear_histogram()[3].to_string()
    }),
    Row::LabelValue("4 ROWS:", |stats, _| {
        stats.row_clear_histogram()[4].to_string()
    }),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(self.stats, self.elapsed), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(self.stats, self.elapsed), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
