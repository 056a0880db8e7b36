//! Application state: the loaded catalog, the current view and the
//! navigation state, all driven from one task.
//!
//! Searches are tagged with a generation number when they begin. Only the
//! latest generation may replace the view, so a slow search finishing after
//! a newer one is dropped.

use crate::models::ContentVariant;
use crate::nav::NavigationState;
use crate::render::{ResultView, View, page};
use crate::resolver::{Catalog, Resolution, Resolver};
use crate::suggest::Suggestions;
use log::{debug, error, info};
use std::sync::Arc;
use tokio::sync::watch;

pub type CatalogReceiver = watch::Receiver<Option<Arc<Catalog>>>;

/// A search that has begun but not yet been applied to the view.
#[derive(Debug)]
pub struct Ticket {
    generation: u64,
    query: String,
    toggles: Option<Vec<bool>>,
}

pub struct App {
    resolver: Resolver,
    catalog: CatalogReceiver,
    view: View,
    nav: NavigationState,
    suggestions: Suggestions,
    typed: String,
    generation: u64,
}

impl App {
    pub fn new(resolver: Resolver, catalog: CatalogReceiver) -> Self {
        Self {
            resolver,
            catalog,
            view: View::Loading,
            nav: NavigationState::default(),
            suggestions: Suggestions::default(),
            typed: String::new(),
            generation: 0,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn nav(&self) -> &NavigationState {
        &self.nav
    }

    pub fn suggestions(&self) -> &Suggestions {
        &self.suggestions
    }

    pub fn html(&self) -> String {
        page::page_html(&self.view, self.nav.query.as_deref())
    }

    /// Starts a search for text the user entered and shows the loading
    /// view. Any stored toggles belong to the previous results and are
    /// dropped.
    pub fn begin_search(&mut self, text: &str) -> Ticket {
        self.suggestions.clear();
        self.begin(text.trim().to_string(), None)
    }

    /// Starts a search for `q` with the stored toggles driving disclosure.
    /// Without a `q` the default view is shown and there is nothing to
    /// finish.
    pub fn begin_restore(&mut self, query_string: &str) -> Option<Ticket> {
        let state = NavigationState::parse(query_string);
        match state.search_term() {
            Some(term) => {
                let term = term.trim().to_string();
                Some(self.begin(term, state.toggles))
            }
            None => {
                self.generation += 1;
                self.nav = NavigationState::default();
                self.view = View::Default;
                None
            }
        }
    }

    /// Resolves a begun search once the catalog is ready and applies it.
    pub async fn finish(&mut self, ticket: Ticket) -> bool {
        let catalog = self.ready().await;
        let resolution = self.resolver.resolve(&catalog, &ticket.query).await;
        self.complete(ticket, resolution)
    }

    fn begin(&mut self, query: String, toggles: Option<Vec<bool>>) -> Ticket {
        self.generation += 1;
        self.view = View::Loading;
        debug!("Search #{} for '{}'", self.generation, query);
        Ticket {
            generation: self.generation,
            query,
            toggles,
        }
    }

    /// Applies a finished search. Returns false when a newer search has
    /// begun since, in which case nothing changes.
    pub fn complete(&mut self, ticket: Ticket, resolution: Resolution) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale search #{} for '{}' (latest is #{})",
                ticket.generation, ticket.query, self.generation
            );
            return false;
        }

        let results = ResultView::new(resolution, ticket.toggles.as_deref());
        info!("'{}' matched {} ballot(s)", ticket.query, results.len());
        // restored toggles are rewritten as what was actually rendered
        let toggles = ticket.toggles.as_ref().map(|_| results.toggles());

        self.view = if results.is_empty() {
            View::Empty
        } else {
            View::Results(results)
        };
        self.nav = NavigationState {
            query: Some(ticket.query),
            toggles,
        };
        true
    }

    /// Waits for the catalog to be published. Searches issued before the
    /// data is loaded park here and run once it arrives.
    async fn ready(&mut self) -> Arc<Catalog> {
        match self.catalog.wait_for(Option::is_some).await {
            Ok(catalog) => catalog.as_ref().map(Arc::clone).unwrap_or_default(),
            Err(_) => {
                error!("Catalog loader stopped without publishing; searching an empty catalog");
                Arc::default()
            }
        }
    }

    /// Flips result `index` and records the whole toggle vector.
    pub fn toggle(&mut self, index: usize) -> bool {
        let View::Results(results) = &mut self.view else {
            return false;
        };
        match results.on_toggle(index) {
            Some(toggles) => {
                self.nav.toggles = Some(toggles);
                true
            }
            None => false,
        }
    }

    pub fn switch_view(&mut self, index: usize, variant: ContentVariant) -> bool {
        match &mut self.view {
            View::Results(results) => results.on_tab_switch(index, variant),
            _ => false,
        }
    }

    /// Refreshes suggestions for partially typed input. Before the catalog
    /// is loaded there is nothing to suggest.
    pub fn suggest(&mut self, input: &str) -> &[String] {
        self.typed = input.to_string();
        let catalog = self.catalog.borrow().clone();
        match catalog {
            Some(catalog) => self.suggestions.update(&catalog.labels, input),
            None => self.suggestions.clear(),
        }
        self.suggestions.items()
    }

    pub fn highlight_next(&mut self) {
        self.suggestions.down();
    }

    pub fn highlight_previous(&mut self) {
        self.suggestions.up();
    }

    /// The highlighted suggestion, or the typed text when nothing is
    /// highlighted.
    pub fn committed_text(&mut self) -> String {
        self.suggestions
            .commit()
            .unwrap_or_else(|| self.typed.clone())
    }

    /// Label of suggestion `index`, as clicking it would choose.
    pub fn picked_text(&mut self, index: usize) -> Option<String> {
        self.suggestions.pick(index)
    }
}
