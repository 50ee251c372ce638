//! Draw target that rasterizes frames into terminal cells with ratatui.

use crate::core::geometry::{Rect as ViewRect, Viewport};
use crate::session::{DrawCommand, DrawTarget, SurfaceGate};
use crate::sprites::{Accessory, SpriteId};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::sync::{Arc, Mutex, PoisonError};

const COIN_SPIN: [char; 4] = ['o', 'O', '0', '|'];
const RAINBOW: [Color; 6] = [
    Color::Red,
    Color::LightRed,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Magenta,
];
const LOG_BROWN: Color = Color::Rgb(139, 90, 43);
const TOAST_CRUST: Color = Color::Rgb(210, 160, 80);

/// Smallest terminal the game will draw into.
pub const MIN_COLS: u16 = 24;
pub const MIN_ROWS: u16 = 12;

pub fn fits(cols: u16, rows: u16) -> bool {
    cols >= MIN_COLS && rows >= MIN_ROWS
}

/// Play area inside the border and above the controls line, as
/// `(x, y, width, height)` in cells. Matches the layout in [`render_frame`].
pub fn play_area(cols: u16, rows: u16) -> (u16, u16, u16, u16) {
    (1, 1, cols.saturating_sub(2), rows.saturating_sub(3))
}

/// A message shown over the playfield until cleared, e.g. the game-over
/// prompt. Clones share the same text.
#[derive(Debug, Clone, Default)]
pub struct Banner(Arc<Mutex<Option<String>>>);

impl Banner {
    pub fn set(&self, text: impl Into<String>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.into());
    }

    pub fn clear(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn get(&self) -> Option<String> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

/// Owns the terminal. Frames are drawn from whichever thread presents.
pub struct TerminalTarget<B: Backend> {
    terminal: Terminal<B>,
    viewport: Viewport,
    gate: SurfaceGate,
    banner: Banner,
    pending: Vec<DrawCommand>,
}

impl<B: Backend> TerminalTarget<B> {
    pub fn new(terminal: Terminal<B>, viewport: Viewport, gate: SurfaceGate, banner: Banner) -> Self {
        Self {
            terminal,
            viewport,
            gate,
            banner,
            pending: Vec::new(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend + Send> DrawTarget for TerminalTarget<B> {
    fn acquire(&mut self) -> bool {
        self.pending.clear();
        self.gate.wait_ready()
    }

    fn draw(&mut self, command: &DrawCommand) {
        self.pending.push(command.clone());
    }

    fn present(&mut self) {
        let commands = std::mem::take(&mut self.pending);
        let viewport = self.viewport;
        let banner = self.banner.get();
        if let Err(e) = self
            .terminal
            .draw(|frame| render_frame(frame, &commands, viewport, banner.as_deref()))
        {
            tracing::warn!("terminal draw failed: {}", e);
        }
    }
}

/// Render one composed frame into the whole terminal.
pub fn render_frame(
    frame: &mut Frame,
    commands: &[DrawCommand],
    viewport: Viewport,
    banner: Option<&str>,
) {
    let area = frame.size();
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Flappy Cow ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(1)])
        .split(inner);
    let play_area = chunks[0];

    let mut canvas = Canvas::new(play_area.width, play_area.height, viewport);
    let mut tutorial = false;
    for command in commands {
        match command {
            DrawCommand::Sprite {
                sprite: SpriteId::Tutorial,
                ..
            } => tutorial = true,
            DrawCommand::Sprite {
                sprite,
                rect,
                row,
                col,
            } => canvas.sprite(*sprite, *rect, *row, *col),
            DrawCommand::Text { text, x, y, .. } => canvas.text(text, *x, *y),
        }
    }
    frame.render_widget(Paragraph::new(canvas.into_lines()), play_area);

    render_controls(frame, chunks[1]);

    if tutorial {
        render_overlay(
            frame,
            play_area,
            "Get Ready!",
            &[
                "Flap to stay airborne",
                "Fly between the spider and the log",
                "",
                "[Space] Flap  [P] Pause",
            ],
        );
    }
    if let Some(text) = banner {
        let lines: Vec<&str> = text.lines().collect();
        if let Some((title, rest)) = lines.split_first() {
            render_overlay(frame, play_area, title, rest);
        }
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    if area.height < 1 {
        return;
    }
    let controls = [
        ("[Space]", "Flap"),
        ("[P]", "Pause"),
        ("[R]", "Revive"),
        ("[Q]", "Quit"),
    ];
    let mut spans = Vec::new();
    for (i, (key, action)) in controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::White)));
        spans.push(Span::styled(
            format!(" {}", action),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

/// A small bordered box centered in `area`.
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, lines: &[&str]) {
    let longest = lines
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0) as u16;
    let width = (longest + 4).min(area.width);
    let height = (lines.len() as u16 + 4).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut text = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    text.extend(lines.iter().map(|l| {
        Line::from(Span::styled(
            l.to_string(),
            Style::default().fg(Color::White),
        ))
    }));
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

/// Glyph and color used to fill a sprite's cells. `None` leaves them blank.
fn glyph(sprite: SpriteId, row: u32, col: u32) -> Option<(char, Color)> {
    match sprite {
        SpriteId::Background | SpriteId::Tutorial => None,
        SpriteId::Spider => Some(('▒', Color::DarkGray)),
        SpriteId::WoodLog => Some(('█', LOG_BROWN)),
        SpriteId::Cow if row == 3 => Some(('x', Color::Red)),
        SpriteId::Cow => Some(('█', Color::White)),
        SpriteId::NyanCat if row == 1 => Some(('x', Color::Red)),
        SpriteId::NyanCat => Some(('█', Color::Magenta)),
        SpriteId::Rainbow => Some(('≈', RAINBOW[0])),
        SpriteId::Accessory(Accessory::Scumbag) => Some(('~', Color::Gray)),
        SpriteId::Accessory(Accessory::Sir) => Some(('^', Color::Black)),
        SpriteId::Accessory(Accessory::Sunglasses) => Some(('=', Color::Black)),
        SpriteId::Accessory(Accessory::Mask) => Some(('#', Color::LightBlue)),
        SpriteId::Coin => Some((COIN_SPIN[(col % 4) as usize], Color::Yellow)),
        SpriteId::Virus => Some(('*', Color::Green)),
        SpriteId::Toast => Some(('▤', TOAST_CRUST)),
        SpriteId::Frontground => Some(('▀', Color::Green)),
        SpriteId::PauseButton => Some(('‖', Color::White)),
    }
}

/// A cell grid in viewport coordinates.
struct Canvas {
    width: u16,
    height: u16,
    scale_x: f64,
    scale_y: f64,
    cells: Vec<(char, Color)>,
}

impl Canvas {
    fn new(width: u16, height: u16, viewport: Viewport) -> Self {
        Self {
            width,
            height,
            scale_x: width as f64 / viewport.width,
            scale_y: height as f64 / viewport.height,
            cells: vec![(' ', Color::Reset); width as usize * height as usize],
        }
    }

    /// Cell bounds covered by `rect`, clipped to the grid. At least one cell
    /// wide and tall when any part is visible.
    fn cell_bounds(&self, rect: ViewRect) -> Option<(u16, u16, u16, u16)> {
        let x0 = (rect.x * self.scale_x).floor();
        let y0 = (rect.y * self.scale_y).floor();
        let x1 = (rect.right() * self.scale_x).ceil().max(x0 + 1.0);
        let y1 = (rect.bottom() * self.scale_y).ceil().max(y0 + 1.0);
        let clip = |v: f64, max: u16| v.clamp(0.0, max as f64) as u16;
        let (x0, x1) = (clip(x0, self.width), clip(x1, self.width));
        let (y0, y1) = (clip(y0, self.height), clip(y1, self.height));
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    fn put(&mut self, x: u16, y: u16, cell: (char, Color)) {
        let index = y as usize * self.width as usize + x as usize;
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = cell;
        }
    }

    fn sprite(&mut self, sprite: SpriteId, rect: ViewRect, row: u32, col: u32) {
        let Some((ch, color)) = glyph(sprite, row, col) else {
            return;
        };
        let Some((x0, y0, x1, y1)) = self.cell_bounds(rect) else {
            return;
        };
        // Accessories sit on the top row of the cow.
        let y1 = match sprite {
            SpriteId::Accessory(_) => y0 + 1,
            _ => y1,
        };
        for y in y0..y1 {
            let color = match sprite {
                SpriteId::Rainbow => RAINBOW[(y - y0) as usize % RAINBOW.len()],
                _ => color,
            };
            for x in x0..x1 {
                self.put(x, y, (ch, color));
            }
        }
    }

    fn text(&mut self, text: &str, x: f64, y: f64) {
        let row = (y * self.scale_y).floor().max(0.0) as u16;
        let start = (x * self.scale_x).floor().max(0.0) as u16;
        if row >= self.height {
            return;
        }
        for (i, ch) in text.chars().enumerate() {
            let col = start as usize + i;
            if col >= self.width as usize {
                break;
            }
            self.put(col as u16, row, (ch, Color::White));
        }
    }

    /// One line per row; runs of the same color share a span.
    fn into_lines(self) -> Vec<Line<'static>> {
        let width = self.width.max(1) as usize;
        self.cells
            .chunks(width)
            .take(self.height as usize)
            .map(|row| {
                let mut spans = Vec::new();
                let mut run = String::new();
                let mut run_color = Color::Reset;
                for &(ch, color) in row {
                    if color != run_color && !run.is_empty() {
                        spans.push(Span::styled(
                            std::mem::take(&mut run),
                            Style::default().fg(run_color),
                        ));
                    }
                    run_color = color;
                    run.push(ch);
                }
                if !run.is_empty() {
                    spans.push(Span::styled(run, Style::default().fg(run_color)));
                }
                Line::from(spans)
            })
            .collect()
    }
}
