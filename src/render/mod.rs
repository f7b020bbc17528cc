//! Paints a [`Popout`] document into a ratatui [`Buffer`].
//!
//! One viewport unit is one cell. Flow content is painted first, then the
//! positioned layers (the trigger and the window shells) in ascending
//! z-order, so the topmost window always wins.

pub mod decorator;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};

pub use decorator::{OpenStepDecorator, WindowChrome, WindowDecorator};

use crate::constants::{CLASS_PLACEHOLDER, CLASS_PLACEHOLDER_LABEL, CLASS_TRIGGER};
use crate::dom::{Document, NodeId};
use crate::geometry::{ViewportRect, rect_contains};
use crate::manager::Popout;
use crate::window::FloatingWindow;

/// A buffer region addressed in viewport coordinates, with a clip rect.
pub struct Canvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    clip: ViewportRect,
}

impl<'a> Canvas<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        let area = area.intersection(buf.area);
        Self {
            buf,
            area,
            clip: ViewportRect {
                top: 0,
                left: 0,
                width: i32::from(area.width),
                height: i32::from(area.height),
            },
        }
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn clip(&self) -> ViewportRect {
        self.clip
    }

    /// Narrow the clip to `rect`, returning the previous clip.
    pub fn push_clip(&mut self, rect: ViewportRect) -> ViewportRect {
        let previous = self.clip;
        self.clip = intersect(previous, rect);
        previous
    }

    pub fn restore_clip(&mut self, clip: ViewportRect) {
        self.clip = clip;
    }

    fn cell_position(&self, left: i32, top: i32) -> Option<(u16, u16)> {
        if !rect_contains(self.clip, left, top) {
            return None;
        }
        let x = u16::try_from(left).ok()?.checked_add(self.area.x)?;
        let y = u16::try_from(top).ok()?.checked_add(self.area.y)?;
        Some((x, y))
    }

    pub fn put(&mut self, left: i32, top: i32, ch: char, style: Style) {
        if let Some(pos) = self.cell_position(left, top)
            && let Some(cell) = self.buf.cell_mut(pos)
        {
            cell.set_char(ch);
            cell.set_style(style);
        }
    }

    pub fn print(&mut self, left: i32, top: i32, text: &str, style: Style) {
        for (x, ch) in (left..).zip(text.chars()) {
            self.put(x, top, ch, style);
        }
    }

    pub fn fill(&mut self, rect: ViewportRect, style: Style) {
        let rect = intersect(self.clip, rect);
        for y in rect.top..rect.bottom() {
            for x in rect.left..rect.right() {
                self.put(x, y, ' ', style);
            }
        }
    }
}

fn intersect(a: ViewportRect, b: ViewportRect) -> ViewportRect {
    let left = a.left.max(b.left);
    let top = a.top.max(b.top);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    ViewportRect {
        top,
        left,
        width: (right - left).max(0),
        height: (bottom - top).max(0),
    }
}

fn inset(rect: ViewportRect, by: i32) -> ViewportRect {
    ViewportRect {
        top: rect.top + by,
        left: rect.left + by,
        width: (rect.width - 2 * by).max(0),
        height: (rect.height - 2 * by).max(0),
    }
}

/// Greedy word wrap. Words longer than `width` are split.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            loop {
                let needed = if len == 0 {
                    word.len()
                } else {
                    len + 1 + word.len()
                };
                if needed <= width {
                    if len > 0 {
                        line.push(' ');
                        len += 1;
                    }
                    line.extend(word.iter());
                    len += word.len();
                    break;
                }
                if len > 0 {
                    lines.push(std::mem::take(&mut line));
                    len = 0;
                    continue;
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
        }
        lines.push(line);
    }
    lines
}

fn has_frame(doc: &Document, node: NodeId) -> bool {
    let border = doc.computed_style(node, "border");
    !border.is_empty() && border != "none" && !border.starts_with('0')
}

#[derive(Debug)]
pub struct Renderer {
    decorator: Box<dyn WindowDecorator>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_decorator(Box::new(OpenStepDecorator))
    }

    pub fn with_decorator(decorator: Box<dyn WindowDecorator>) -> Self {
        Self { decorator }
    }

    pub fn render(&self, popout: &Popout, area: Rect, buf: &mut Buffer) {
        let doc = popout.document();
        let mut canvas = Canvas::new(buf, area);

        for &child in doc.children(doc.body()) {
            if !doc.is_fixed(child) {
                paint_node(&mut canvas, doc, child);
            }
        }

        let focused = popout.paint_order().last().copied();
        for layer in doc.positioned_layers() {
            if let Some(window) = popout.window_for_shell(layer) {
                self.paint_window(&mut canvas, doc, window, focused == Some(window.id()));
            } else if doc.element(layer).is_ok_and(|el| el.has_class(CLASS_TRIGGER)) {
                let rect = doc.client_rect(layer);
                canvas.fill(rect, Style::default().bg(Color::Gray));
                canvas.put(
                    rect.left,
                    rect.top,
                    '⧉',
                    Style::default().fg(Color::Black).bg(Color::Gray),
                );
            }
        }
    }

    fn paint_window(
        &self,
        canvas: &mut Canvas<'_>,
        doc: &Document,
        window: &FloatingWindow,
        focused: bool,
    ) {
        let chrome = WindowChrome {
            outer: doc.client_rect(window.shell()),
            title_bar: doc.client_rect(window.title_bar()),
            close_button: doc.client_rect(window.close_button()),
            resize_handle: doc.client_rect(window.resize_handle()),
            title: window.name(),
            focused,
        };
        let clip = canvas.push_clip(chrome.outer);
        self.decorator.render_window(canvas, &chrome);

        canvas.push_clip(doc.client_rect(window.content_container()));
        paint_node(canvas, doc, window.target());
        canvas.restore_clip(intersect(clip, chrome.outer));

        self.decorator.render_resize_handle(canvas, &chrome);
        canvas.restore_clip(clip);
    }
}

/// Paint `node` and its flow descendants.
fn paint_node(canvas: &mut Canvas<'_>, doc: &Document, node: NodeId) {
    if !doc.is_displayed(node) {
        return;
    }
    let Ok(el) = doc.element(node) else {
        return;
    };
    if el.has_class(CLASS_PLACEHOLDER) {
        paint_placeholder(canvas, doc, node);
        return;
    }

    let rect = doc.client_rect(node);
    let framed = has_frame(doc, node);
    if framed {
        paint_frame(canvas, rect, ['┌', '┐', '└', '┘', '─', '│'], Style::default());
    }
    if let Some(text) = el.text() {
        let inner = if framed { inset(rect, 1) } else { rect };
        let clip = canvas.push_clip(inner);
        let width = usize::try_from(inner.width).unwrap_or_default();
        for (y, line) in (inner.top..inner.bottom()).zip(wrap(text, width)) {
            canvas.print(inner.left, y, &line, Style::default());
        }
        canvas.restore_clip(clip);
    }
    for &child in doc.children(node) {
        if !doc.is_fixed(child) {
            paint_node(canvas, doc, child);
        }
    }
}

fn paint_placeholder(canvas: &mut Canvas<'_>, doc: &Document, placeholder: NodeId) {
    let rect = doc.client_rect(placeholder);
    let style = Style::default().fg(Color::DarkGray);
    paint_frame(canvas, rect, ['┌', '┐', '└', '┘', '╌', '╎'], style);

    let label = doc
        .children(placeholder)
        .iter()
        .copied()
        .find(|&n| doc.element(n).is_ok_and(|el| el.has_class(CLASS_PLACEHOLDER_LABEL)))
        .and_then(|n| doc.element(n).ok())
        .and_then(|el| el.text());
    if let Some(label) = label {
        let inner = inset(rect, 1);
        let text: String = label
            .chars()
            .take(usize::try_from(inner.width).unwrap_or_default())
            .collect();
        let len = i32::try_from(text.chars().count()).unwrap_or(inner.width);
        let clip = canvas.push_clip(inner);
        canvas.print(
            inner.left + (inner.width - len) / 2,
            inner.top + inner.height / 2,
            &text,
            style,
        );
        canvas.restore_clip(clip);
    }
}

/// Corners clockwise from top-left, then the horizontal and vertical edge.
fn paint_frame(canvas: &mut Canvas<'_>, rect: ViewportRect, glyphs: [char; 6], style: Style) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let [top_left, top_right, bottom_left, bottom_right, horizontal, vertical] = glyphs;
    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    for x in rect.left + 1..right {
        canvas.put(x, rect.top, horizontal, style);
        canvas.put(x, bottom, horizontal, style);
    }
    for y in rect.top + 1..bottom {
        canvas.put(rect.left, y, vertical, style);
        canvas.put(right, y, vertical, style);
    }
    canvas.put(rect.left, rect.top, top_left, style);
    canvas.put(right, rect.top, top_right, style);
    canvas.put(rect.left, bottom, bottom_left, style);
    canvas.put(right, bottom, bottom_right, style);
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::PopoutConfig;
    use crate::dom::{LayoutBox, Viewport};

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn notes_page() -> (Popout, NodeId) {
        let mut doc = Document::new();
        *doc.viewport_mut() = Viewport::new(40, 14);
        let panel = doc.create_text_element("div", "hello world");
        doc.append_child(doc.body(), panel).unwrap();
        doc.set_layout(panel, LayoutBox::new(2, 2, 20, 3), None)
            .unwrap();
        (Popout::new(doc, PopoutConfig::terminal()), panel)
    }

    fn draw(popout: &Popout) -> Buffer {
        let area = Rect::new(0, 0, 40, 14);
        let mut buf = Buffer::empty(area);
        Renderer::new().render(popout, area, &mut buf);
        buf
    }

    #[test]
    fn wrap_breaks_on_words_and_splits_long_ones() {
        assert_eq!(wrap("alpha beta gamma", 10), vec!["alpha beta", "gamma"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("one\n\ntwo", 8), vec!["one", "", "two"]);
        assert!(wrap("anything", 0).is_empty());
    }

    #[test]
    fn flow_text_is_painted_at_its_box() {
        let (popout, _) = notes_page();
        let buf = draw(&popout);
        assert!(row(&buf, 2).starts_with("  hello world"));
    }

    #[test]
    fn floating_window_is_decorated() {
        let (mut popout, panel) = notes_page();
        popout.open(panel, "Notes").unwrap();
        let buf = draw(&popout);

        // Shell spans rows 1..=6 and columns 2..=23.
        assert_eq!(buf[(2, 1)].symbol(), "┌");
        assert_eq!(buf[(23, 1)].symbol(), "┐");
        assert_eq!(buf[(2, 6)].symbol(), "└");
        assert!(row(&buf, 2).contains("Notes"));
        assert_eq!(buf[(21, 2)].symbol(), "×");
        assert!(row(&buf, 3).starts_with("  │hello world"));
        assert_eq!(buf[(22, 5)].symbol(), "◢");
    }

    #[test]
    fn placeholder_shows_when_window_moves_away() {
        let (mut popout, panel) = notes_page();
        popout.open(panel, "Notes").unwrap();
        let now = Instant::now();
        popout.pointer_down(10, 2, now).unwrap();
        popout.pointer_move(10, 8, now).unwrap();
        popout.pointer_up(10, 8, now).unwrap();

        let buf = draw(&popout);
        assert_eq!(buf[(2, 2)].symbol(), "┌");
        assert_eq!(buf[(3, 2)].symbol(), "╌");
        assert!(row(&buf, 3).contains("Notes"));
        assert_eq!(buf[(2, 7)].symbol(), "┌");
    }

    #[test]
    fn visible_trigger_is_painted() {
        let (mut popout, panel) = notes_page();
        popout.bind(panel, "Notes").unwrap();
        popout.pointer_move(4, 2, Instant::now()).unwrap();
        let buf = draw(&popout);
        assert_eq!(buf[(21, 2)].symbol(), "⧉");
    }
}
