//! Browser screen - list and search memos

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::catalog::CatalogEntry;

/// Browser screen state
pub struct BrowserScreen {
    entries: Vec<CatalogEntry>,
    state: ListState,
    search_mode: bool,
    search_query: String,
    filtered_indices: Vec<usize>,
}

impl BrowserScreen {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut state = ListState::default();
        if !entries.is_empty() {
            state.select(Some(0));
        }

        let filtered_indices = (0..entries.len()).collect();

        Self {
            entries,
            state,
            search_mode: false,
            search_query: String::new(),
            filtered_indices,
        }
    }

    /// Replace the catalog after a rescan, keeping the search filter
    pub fn set_entries(&mut self, entries: Vec<CatalogEntry>) {
        self.entries = entries;
        self.apply_filter();
    }

    pub fn draw(&mut self, frame: &mut Frame, area: Rect, status: Option<&str>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Min(5),    // List
                Constraint::Length(3), // Help
            ])
            .split(area);

        // Search bar
        let search_style = if self.search_mode {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let search_text = if self.search_mode {
            format!("Search: {}█", self.search_query)
        } else if self.search_query.is_empty() {
            "Press [/] to search".to_string()
        } else {
            format!("Search: {}", self.search_query)
        };

        let search = Paragraph::new(search_text)
            .style(search_style)
            .block(Block::default().borders(Borders::ALL).title(" Search "));
        frame.render_widget(search, chunks[0]);

        // Memo list
        let items: Vec<ListItem> = self
            .filtered_indices
            .iter()
            .map(|&i| {
                let entry = &self.entries[i];
                ListItem::new(Line::from(vec![
                    Span::styled(
                        truncate(&entry.title, 30),
                        Style::default().fg(Color::White),
                    ),
                    Span::raw(" "),
                    Span::styled(entry.date_label(), Style::default().fg(Color::DarkGray)),
                    Span::raw(" "),
                    Span::styled(entry.duration_label(), Style::default().fg(Color::Cyan)),
                    Span::raw(" "),
                    Span::styled(entry.size_label(), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" Memos ({}) ", self.filtered_indices.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        frame.render_stateful_widget(list, chunks[1], &mut self.state);

        // Help bar, replaced by the status line when one is pending
        let help = if let Some(status) = status {
            Paragraph::new(Span::styled(status, Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Center)
        } else {
            Paragraph::new(Line::from(vec![
                Span::styled(" ↑/↓ ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::raw(" Navigate  "),
                Span::styled(" Enter ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::raw(" Play  "),
                Span::styled(" r ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::raw(" Record  "),
                Span::styled(" / ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::raw(" Search  "),
                Span::styled(" x ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::raw(" Delete  "),
                Span::styled(" q ", Style::default().fg(Color::Black).bg(Color::Cyan)),
                Span::raw(" Quit"),
            ]))
            .alignment(Alignment::Center)
        };
        frame.render_widget(help, chunks[2]);
    }

    pub fn next(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.filtered_indices.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.filtered_indices.is_empty() {
            return;
        }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.filtered_indices.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn selected(&self) -> Option<&CatalogEntry> {
        self.state
            .selected()
            .and_then(|i| self.filtered_indices.get(i))
            .map(|&i| &self.entries[i])
    }

    pub fn start_search(&mut self) {
        self.search_mode = true;
    }

    pub fn in_search(&self) -> bool {
        self.search_mode
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if !self.search_mode {
            return;
        }

        match key {
            KeyCode::Char(c) => {
                self.search_query.push(c);
                self.apply_filter();
            }
            KeyCode::Backspace => {
                self.search_query.pop();
                self.apply_filter();
            }
            KeyCode::Enter | KeyCode::Esc => {
                self.search_mode = false;
            }
            _ => {}
        }
    }

    fn apply_filter(&mut self) {
        if self.search_query.is_empty() {
            self.filtered_indices = (0..self.entries.len()).collect();
        } else {
            let query = self.search_query.to_lowercase();
            self.filtered_indices = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.title.to_lowercase().contains(&query))
                .map(|(i, _)| i)
                .collect();
        }

        // Reset selection
        if !self.filtered_indices.is_empty() {
            self.state.select(Some(0));
        } else {
            self.state.select(None);
        }
    }
}

// Counts chars, not bytes, so multibyte titles never split mid-character
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn truncate_pads_short_titles_to_column_width() {
        assert_eq!(truncate("memo", 8), "memo    ");
    }

    #[test]
    fn truncate_handles_multibyte_titles() {
        let title = "€".repeat(31);
        assert_eq!(truncate(&title, 30), format!("{}...", "€".repeat(27)));
    }
}
