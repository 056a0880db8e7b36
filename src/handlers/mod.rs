//! Routes one line of input to the matching [`App`] operation.

use crate::app::App;
use crate::error::LookupError;
use crate::models::ContentVariant;
use lazy_static::lazy_static;
use log::{error, info, warn};
use regex::Regex;
use std::path::Path;

lazy_static! {
    static ref TOGGLE: Regex = Regex::new(r"^toggle\s+(\d+)$").unwrap();
    static ref VIEW: Regex = Regex::new(r"^view\s+(\d+)\s+(\w+)$").unwrap();
    static ref PICK: Regex = Regex::new(r"^pick\s+(\d+)$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    Search(String),
    Toggle(usize),
    SwitchView(usize, ContentVariant),
    Open(String),
    Suggest(String),
    Pick(usize),
    Up,
    Down,
    Select,
    Url,
    Quit,
}

impl Interaction {
    /// `None` for blank lines and commands with bad arguments.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        match line {
            "quit" | "exit" => return Some(Interaction::Quit),
            "up" => return Some(Interaction::Up),
            "down" => return Some(Interaction::Down),
            "select" => return Some(Interaction::Select),
            "url" => return Some(Interaction::Url),
            _ => {}
        }

        if let Some(caps) = TOGGLE.captures(line) {
            return caps[1].parse().ok().map(Interaction::Toggle);
        }
        if let Some(caps) = PICK.captures(line) {
            return caps[1].parse().ok().map(Interaction::Pick);
        }
        if let Some(caps) = VIEW.captures(line) {
            let index = caps[1].parse().ok()?;
            return match caps[2].parse() {
                Ok(variant) => Some(Interaction::SwitchView(index, variant)),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            };
        }

        if let Some(rest) = line.strip_prefix("open ") {
            return Some(Interaction::Open(rest.trim().to_string()));
        }
        if let Some(rest) = line.strip_prefix("suggest ") {
            return Some(Interaction::Suggest(rest.to_string()));
        }
        if let Some(rest) = line.strip_prefix("search ") {
            return Some(Interaction::Search(rest.trim().to_string()));
        }
        Some(Interaction::Search(line.to_string()))
    }
}

/// Applies `interaction`. Searches write the loading page to `page` before
/// waiting on their results. Returns false when the session should end.
pub async fn handle_interaction(app: &mut App, interaction: Interaction, page: &Path) -> bool {
    info!("Received interaction: {:?}", interaction);

    let ticket = match interaction {
        Interaction::Search(text) => Some(app.begin_search(&text)),
        Interaction::Open(query_string) => app.begin_restore(&query_string),
        Interaction::Select => {
            let text = app.committed_text();
            Some(app.begin_search(&text))
        }
        Interaction::Pick(index) => match app.picked_text(index) {
            Some(text) => Some(app.begin_search(&text)),
            None => {
                warn!("No suggestion #{} to pick", index);
                None
            }
        },
        Interaction::Toggle(index) => {
            if !app.toggle(index) {
                warn!("No result #{} to toggle", index);
            }
            None
        }
        Interaction::SwitchView(index, variant) => {
            // absent variants are a no-op
            if !app.switch_view(index, variant) {
                info!("Result #{} has no {} view", index, variant);
            }
            None
        }
        Interaction::Suggest(text) => {
            let items = app.suggest(&text).to_vec();
            print_suggestions(&items, app.suggestions().selected());
            None
        }
        Interaction::Down => {
            app.highlight_next();
            print_suggestions(app.suggestions().items(), app.suggestions().selected());
            None
        }
        Interaction::Up => {
            app.highlight_previous();
            print_suggestions(app.suggestions().items(), app.suggestions().selected());
            None
        }
        Interaction::Url => {
            println!("{}", app.nav().to_query_string());
            None
        }
        Interaction::Quit => return false,
    };

    if let Some(ticket) = ticket {
        if let Err(e) = publish(app, page).await {
            error!("Failed to write loading page: {}", e);
        }
        app.finish(ticket).await;
    }

    true
}

/// Writes the current page to `path`.
pub async fn publish(app: &App, path: &Path) -> Result<(), LookupError> {
    tokio::fs::write(path, app.html())
        .await
        .map_err(|source| LookupError::Io {
            path: path.display().to_string(),
            source,
        })?;
    info!("Wrote {} (state: {})", path.display(), app.nav().to_query_string());
    Ok(())
}

fn print_suggestions(items: &[String], selected: Option<usize>) {
    for (i, item) in items.iter().enumerate() {
        let marker = if Some(i) == selected { ">" } else { " " };
        println!("{} {}", marker, item);
    }
}
