//! The card stack widget.
//!
//! Cards are painted straight into the buffer, back to front, each through
//! its [`CardTransform`]: scaled about its centre, then translated.  The
//! front card's tilt is drawn as a per-row horizontal shear.  Everything is
//! clipped to the widget area, so a card flung past the edge simply slides
//! out of view.
//!
//! Rendering also measures: the widget reports the viewport width and the
//! card size to the [`CardStack`] before drawing, so offsets, ratios and the
//! swipe bound always match what is on screen.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Paragraph, StatefulWidget, Widget},
};

use super::theme::Theme;
use crate::core::{CardStack, CardTransform, ItemProvider, StackGeometry, SwipeDirection};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;
const MAX_CARD_WIDTH: u16 = 52;
const MAX_CARD_HEIGHT: u16 = 14;
/// `|ratio|` past which the front card shows which way it will go.
const VERDICT_RATIO: f32 = 0.25;

/// Something that can be drawn on a card face.
pub trait CardView {
    fn title(&self) -> &str;

    /// Free text below the title; wrapped to the card width.
    fn body(&self) -> &str {
        ""
    }
}

/// Renders the visible cards of a deck.  The [`CardStack`] is the state.
pub struct CardStackWidget<'a, P> {
    provider: &'a P,
    block: Option<Block<'a>>,
    empty_message: &'a str,
}

impl<'a, P> CardStackWidget<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            block: None,
            empty_message: "No more cards",
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Shown centred once the deck is exhausted.
    pub fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }
}

impl<P> StatefulWidget for CardStackWidget<'_, P>
where
    P: ItemProvider,
    P::Item: CardView,
{
    type State = CardStack;

    fn render(self, area: Rect, buf: &mut Buffer, stack: &mut CardStack) {
        let area = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if area.is_empty() {
            return;
        }

        let slot = card_slot(area, &stack.config().geometry);
        stack.on_size_changed(u32::from(area.width));
        stack.on_card_measured(f32::from(slot.width), f32::from(slot.height));

        let cards = stack.visible_cards(self.provider);
        if cards.is_empty() {
            let row = Rect {
                y: area.y + area.height / 2,
                height: 1,
                ..area
            };
            Paragraph::new(Line::styled(self.empty_message, Theme::hint_style()))
                .alignment(Alignment::Center)
                .render(row, buf);
            return;
        }

        let ratio = stack.state().ratio();
        let mut canvas = Canvas { buf, clip: area };
        for card in cards {
            let Some(item) = self.provider.content_at(card.index) else {
                continue;
            };
            let look = if card.position == 0 {
                Look::front(ratio)
            } else {
                Look::behind()
            };
            paint_card(&mut canvas, slot, &stack.transform(card.position), item, &look);
        }
    }
}

/// Resting rectangle of the front card inside `area`.
///
/// Leaves room at the sides for the tilt and below for the stacked cards
/// peeking out, then caps the size so wide terminals still get a card shape.
pub fn card_slot(area: Rect, geometry: &StackGeometry) -> Rect {
    let unit = geometry.translate_unit.max(0.0);
    let pad_x = ((unit.ceil() as u16).saturating_mul(2)).max(1);
    let pad_y = (unit * geometry.visible_item_count as f32).ceil() as u16;

    let width = area
        .width
        .saturating_sub(pad_x.saturating_mul(2))
        .min(MAX_CARD_WIDTH);
    let height = area
        .height
        .saturating_sub(pad_y.saturating_mul(2))
        .min(MAX_CARD_HEIGHT);

    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + area.height.saturating_sub(height + pad_y) / 2,
        width,
        height,
    }
}

// ───── painting ─────

struct Look {
    border: Style,
    title: Style,
    body: Style,
    verdict: Option<(&'static str, Style)>,
}

impl Look {
    fn front(ratio: f32) -> Self {
        let verdict = (ratio.abs() >= VERDICT_RATIO).then(|| {
            match SwipeDirection::from_offset(ratio) {
                SwipeDirection::Right => (" KEEP ", Theme::keep_style()),
                SwipeDirection::Left => (" PASS ", Theme::pass_style()),
            }
        });
        Self {
            border: verdict.map_or_else(Theme::card_border_style, |(_, style)| style),
            title: Theme::card_title_style(),
            body: Theme::card_body_style(),
            verdict,
        }
    }

    fn behind() -> Self {
        Self {
            border: Theme::back_card_style(),
            title: Theme::back_card_style(),
            body: Theme::back_card_style(),
            verdict: None,
        }
    }
}

/// Clipped cell writer over a buffer.
struct Canvas<'b> {
    buf: &'b mut Buffer,
    clip: Rect,
}

impl Canvas<'_> {
    fn put(&mut self, x: i32, y: i32, ch: char, style: Style) {
        let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
            return;
        };
        let pos = Position::new(x, y);
        if !self.clip.contains(pos) {
            return;
        }
        if let Some(cell) = self.buf.cell_mut(pos) {
            cell.set_char(ch).set_style(style);
        }
    }
}

fn paint_card<T: CardView>(
    canvas: &mut Canvas<'_>,
    slot: Rect,
    transform: &CardTransform,
    item: &T,
    look: &Look,
) {
    let w = f32::from(slot.width) * transform.scale_x;
    let h = f32::from(slot.height) * transform.scale_y;
    let cols = w.round() as i32;
    let rows = h.round() as i32;
    if cols < 2 || rows < 2 {
        return;
    }

    let left = f32::from(slot.x) + (f32::from(slot.width) - w) / 2.0 + transform.translation_x;
    let top = (f32::from(slot.y) + (f32::from(slot.height) - h) / 2.0 + transform.translation_y)
        .round() as i32;
    let shear = transform.rotation.to_radians().tan() * CELL_ASPECT;

    let text_width = (cols - 4).max(0) as usize;
    let lines = face_lines(item, text_width, (rows - 2) as usize, look);
    let verdict: Vec<char> = look
        .verdict
        .map(|(label, _)| label.chars().collect())
        .unwrap_or_default();

    for row in 0..rows {
        // Rows above the centre lean right for a clockwise tilt.
        let dy = row as f32 + 0.5 - h / 2.0;
        let x0 = (left - dy * shear).round() as i32;
        let y = top + row;

        for col in 0..cols {
            let (ch, style) = if row == 0 || row == rows - 1 {
                let (first, last) = if row == 0 { ('╭', '╮') } else { ('╰', '╯') };
                if col == 0 {
                    (first, look.border)
                } else if col == cols - 1 {
                    (last, look.border)
                } else if row == 0 && col >= 2 && ((col - 2) as usize) < verdict.len() {
                    let style = look.verdict.map_or(look.border, |(_, style)| style);
                    (verdict[(col - 2) as usize], style)
                } else {
                    ('─', look.border)
                }
            } else if col == 0 || col == cols - 1 {
                ('│', look.border)
            } else {
                lines
                    .get((row - 1) as usize)
                    .and_then(|(text, style)| {
                        let i = usize::try_from(col - 2).ok()?;
                        (i < text_width).then(|| text.get(i).map(|&c| (c, *style)))?
                    })
                    .unwrap_or((' ', look.body))
            };
            canvas.put(x0 + col, y, ch, style);
        }
    }
}

/// Title, a blank line, then the wrapped body, cut to `max_rows`.
fn face_lines<T: CardView>(
    item: &T,
    width: usize,
    max_rows: usize,
    look: &Look,
) -> Vec<(Vec<char>, Style)> {
    let mut lines = vec![(item.title().chars().collect(), look.title)];
    let body = wrap(item.body(), width);
    if !body.is_empty() {
        lines.push((Vec::new(), look.body));
        lines.extend(body.into_iter().map(|l| (l.chars().collect(), look.body)));
    }
    lines.truncate(max_rows);
    lines
}

/// Greedy word wrap.  Words longer than `width` are left whole and get
/// clipped when painted.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    if width == 0 {
        return out;
    }
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_len = 0;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if line_len > 0 && line_len + 1 + word_len > width {
                out.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }
        out.push(line);
    }
    out
}
