use ratatui::style::{Color, Modifier, Style};

use super::Canvas;
use crate::geometry::ViewportRect;

/// Viewport geometry of one window's chrome, read from the document.
#[derive(Debug, Clone, Copy)]
pub struct WindowChrome<'a> {
    pub outer: ViewportRect,
    pub title_bar: ViewportRect,
    pub close_button: ViewportRect,
    pub resize_handle: ViewportRect,
    pub title: &'a str,
    /// Topmost window.
    pub focused: bool,
}

pub trait WindowDecorator: std::fmt::Debug {
    /// Clear the shell and draw its border, title bar and close button.
    fn render_window(&self, canvas: &mut Canvas<'_>, chrome: &WindowChrome<'_>);

    /// Drawn after the content so the grip stays visible over it.
    fn render_resize_handle(&self, canvas: &mut Canvas<'_>, chrome: &WindowChrome<'_>) {
        let handle = chrome.resize_handle;
        if handle.width > 0 && handle.height > 0 {
            canvas.put(
                handle.right() - 1,
                handle.bottom() - 1,
                '◢',
                Style::default().fg(Color::DarkGray),
            );
        }
    }
}

#[derive(Debug, Default)]
pub struct OpenStepDecorator;

impl WindowDecorator for OpenStepDecorator {
    fn render_window(&self, canvas: &mut Canvas<'_>, chrome: &WindowChrome<'_>) {
        let focused_header_style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        let normal_header_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        let border_style = Style::default().fg(Color::DarkGray).bg(Color::Reset);

        let header_style = if chrome.focused {
            focused_header_style
        } else {
            normal_header_style
        };

        let outer = chrome.outer;
        if outer.width < 2 || outer.height < 2 {
            return;
        }
        canvas.fill(outer, Style::default());

        // Header background and title
        let header = chrome.title_bar;
        canvas.fill(header, header_style);
        let title_width = (chrome.close_button.left - header.left).clamp(0, header.width);
        let title: String = chrome
            .title
            .chars()
            .take(usize::try_from(title_width).unwrap_or_default())
            .collect();
        let title_len = i32::try_from(title.chars().count()).unwrap_or(title_width);
        let start = header.left + (title_width - title_len) / 2;
        let middle = header.top + header.height / 2;
        canvas.print(start, middle, &title, header_style);

        let close = chrome.close_button;
        if close.width > 0 && close.height > 0 {
            canvas.put(close.left, close.top, '×', header_style);
        }

        // Borders
        let right = outer.right() - 1;
        let bottom = outer.bottom() - 1;
        for x in outer.left + 1..right {
            canvas.put(x, outer.top, '─', border_style);
            canvas.put(x, bottom, '─', border_style);
        }
        for y in outer.top + 1..bottom {
            canvas.put(outer.left, y, '│', border_style);
            canvas.put(right, y, '│', border_style);
        }
        canvas.put(outer.left, outer.top, '┌', border_style);
        canvas.put(right, outer.top, '┐', border_style);
        canvas.put(outer.left, bottom, '└', border_style);
        canvas.put(right, bottom, '┘', border_style);
    }
}
