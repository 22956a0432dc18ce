#[cfg(test)]
#[path = "gallery_view_test.rs"]
mod tests;

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;

use crate::domain::models::ItemStatus;
use crate::domain::models::ItemView;
use crate::domain::models::Snapshot;

pub struct GalleryView {}

fn marker(status: &ItemStatus) -> (&'static str, Color) {
    match status {
        ItemStatus::Pending => return ("…", Color::Yellow),
        ItemStatus::Succeeded(_) => return ("✓", Color::Green),
        ItemStatus::Failed(_) => return ("✗", Color::Red),
    }
}

fn detail(view: &ItemView) -> Option<Line<'static>> {
    match &view.status {
        ItemStatus::Pending => return None,
        ItemStatus::Succeeded(image) => {
            return Some(Line::from(Span::styled(
                format!("     image ready ({})", image.mime_type),
                Style::default().fg(Color::DarkGray),
            )));
        }
        ItemStatus::Failed(message) => {
            return Some(Line::from(Span::styled(
                format!("     {message}"),
                Style::default().fg(Color::Red),
            )));
        }
    }
}

impl GalleryView {
    /// One block per dish in extraction order. Dishes without an image yet
    /// keep their slot so nothing shifts around while results land.
    pub fn lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
        let mut lines = vec![];

        for (idx, view) in snapshot.items.iter().enumerate() {
            let (symbol, color) = marker(&view.status);
            lines.push(Line::from(vec![
                Span::styled(format!("{symbol} "), Style::default().fg(color)),
                Span::styled(
                    format!("{}. {}", idx + 1, view.item.headline()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));

            if let Some(description) = &view.item.description {
                lines.push(Line::from(format!("     {description}")));
            }

            if let Some(line) = detail(view) {
                lines.push(line);
            }
        }

        return lines;
    }
}
