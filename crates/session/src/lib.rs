//! Page-level coordinator.
//!
//! `Session` is the single owner of the mutable UI state (filter states,
//! selection, draft, current page). Everything else reads it. Commands are
//! applied strictly in the order they are passed to [`Session::apply`].

use std::sync::Arc;

use catalog::{Catalog, Lesson, MapAsset};
use foundation::ids::{AssetId, LessonId, UserId};
use query::{
    EngineOptions, FacetGroup, FacetKey, FilterState, QueryEngine, Scope, SearchSuggestion, SortBy,
};
use runtime::{EventBus, NavCommand, Page, Router, Sequenced, Ticket, TicketGate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod draft;
pub mod selection;

pub use draft::*;
pub use selection::*;

/// Which page's filter state a command addresses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterTarget {
    Lessons,
    Map,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Navigate(NavCommand),
    SetQuery(FilterTarget, String),
    ToggleThematic(FilterTarget),
    SetScope(Scope),
    ToggleFacet(FacetKey, String),
    SetSort(SortBy),
    ResetFilters(FilterTarget),
    ToggleSelection(AssetId),
    SelectAll(Vec<AssetId>),
    DeselectAll(Vec<AssetId>),
    ClearSelection,
    OpenLesson(LessonId),
    CloseLesson,
    /// Start a lesson draft from the current selection and go to Create.
    ComposeFromSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Navigated { from: Page, to: Page },
    FiltersChanged(FilterTarget),
    SelectionChanged { len: usize },
    LessonOpened(LessonId),
    LessonClosed,
    DraftStarted { assets: usize },
}

/// Serializable view of the session's mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub page: Page,
    pub lessons: FilterState,
    pub map: FilterState,
    pub selection: SelectionSet,
    pub open_lesson: Option<LessonId>,
    pub draft: Option<LessonDraft>,
}

/// A query issued against the session's current filter state.
///
/// Only the most recently issued query per target may be completed; older
/// ones resolve to `None`.
#[derive(Debug, Clone)]
pub struct PendingQuery {
    pub ticket: Ticket,
    pub target: FilterTarget,
    state: FilterState,
}

pub struct Session {
    catalog: Arc<Catalog>,
    engine: QueryEngine,
    router: Router,
    lessons: FilterState,
    map: FilterState,
    selection: SelectionSet,
    open_lesson: Option<LessonId>,
    draft: Option<LessonDraft>,
    lesson_gate: TicketGate,
    map_gate: TicketGate,
    events: EventBus<SessionEvent>,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, current_user: UserId) -> Self {
        Self::with_options(catalog, current_user, EngineOptions::default())
    }

    pub fn with_options(catalog: Arc<Catalog>, current_user: UserId, options: EngineOptions) -> Self {
        let engine = QueryEngine::new(&catalog, current_user, options);
        Self {
            catalog,
            engine,
            router: Router::default(),
            lessons: FilterState::default(),
            map: FilterState::default(),
            selection: SelectionSet::new(),
            open_lesson: None,
            draft: None,
            lesson_gate: TicketGate::new(),
            map_gate: TicketGate::new(),
            events: EventBus::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn page(&self) -> Page {
        self.router.current()
    }

    pub fn filter(&self, target: FilterTarget) -> &FilterState {
        match target {
            FilterTarget::Lessons => &self.lessons,
            FilterTarget::Map => &self.map,
        }
    }

    fn filter_mut(&mut self, target: FilterTarget) -> &mut FilterState {
        match target {
            FilterTarget::Lessons => &mut self.lessons,
            FilterTarget::Map => &mut self.map,
        }
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn open_lesson(&self) -> Option<&Lesson> {
        self.open_lesson
            .as_ref()
            .and_then(|id| self.catalog.lesson(id))
    }

    pub fn draft(&self) -> Option<&LessonDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut LessonDraft> {
        self.draft.as_mut()
    }

    /// Swaps in a new catalog; the search index is rebuilt only if the
    /// content changed. Facet selections that no longer exist are dropped.
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) {
        self.engine.refresh(&catalog);
        self.catalog = catalog;
        let groups = self.engine.lesson_facets(&self.catalog);
        self.lessons.retain_known(&groups);
    }

    pub fn events(&self) -> &[Sequenced<SessionEvent>] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<Sequenced<SessionEvent>> {
        self.events.drain()
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            page: self.page(),
            lessons: self.lessons.clone(),
            map: self.map.clone(),
            selection: self.selection.clone(),
            open_lesson: self.open_lesson.clone(),
            draft: self.draft.clone(),
        }
    }

    pub fn state_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.state())
    }

    pub fn apply_all(&mut self, commands: impl IntoIterator<Item = Command>) {
        for cmd in commands {
            self.apply(cmd);
        }
    }

    /// Applies one command. Returns `true` if any state changed.
    pub fn apply(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Navigate(nav) => self.navigate(nav),
            Command::SetQuery(target, query) => {
                let state = self.filter_mut(target);
                if state.query == query {
                    return false;
                }
                state.query = query;
                self.filters_changed(target)
            }
            Command::ToggleThematic(target) => {
                let state = self.filter_mut(target);
                state.thematic = !state.thematic;
                self.filters_changed(target)
            }
            Command::SetScope(scope) => {
                if self.map.scope == scope {
                    return false;
                }
                self.map.scope = scope;
                self.filters_changed(FilterTarget::Map)
            }
            Command::ToggleFacet(key, value) => {
                let groups = self.engine.lesson_facets(&self.catalog);
                if !self.lessons.toggle_facet(&groups, key, &value) {
                    warn!(facet = key.as_str(), %value, "ignoring unknown facet value");
                    return false;
                }
                self.filters_changed(FilterTarget::Lessons)
            }
            Command::SetSort(sort) => {
                if self.lessons.sort == sort {
                    return false;
                }
                self.lessons.sort = sort;
                self.filters_changed(FilterTarget::Lessons)
            }
            Command::ResetFilters(target) => {
                let state = self.filter_mut(target);
                let before = state.clone();
                state.reset();
                if *state == before {
                    return false;
                }
                self.filters_changed(target)
            }
            Command::ToggleSelection(id) => {
                if self.catalog.asset(&id).is_none() {
                    warn!(asset = %id, "ignoring selection of unknown asset");
                    return false;
                }
                self.selection.toggle(id);
                self.selection_changed()
            }
            Command::SelectAll(ids) => {
                let known = ids.into_iter().filter(|id| self.catalog.asset(id).is_some());
                if self.selection.select_all(known.collect::<Vec<_>>()) == 0 {
                    return false;
                }
                self.selection_changed()
            }
            Command::DeselectAll(ids) => {
                if self.selection.deselect_all(&ids) == 0 {
                    return false;
                }
                self.selection_changed()
            }
            Command::ClearSelection => self.clear_selection(),
            Command::OpenLesson(id) => {
                if self.catalog.lesson(&id).is_none() {
                    warn!(lesson = %id, "ignoring unknown lesson");
                    return false;
                }
                self.open_lesson = Some(id.clone());
                self.events.emit(SessionEvent::LessonOpened(id));
                true
            }
            Command::CloseLesson => {
                if self.open_lesson.take().is_none() {
                    return false;
                }
                self.events.emit(SessionEvent::LessonClosed);
                true
            }
            Command::ComposeFromSelection => {
                let draft = LessonDraft::from_selection(&self.selection);
                let assets = draft.asset_ids.len();
                self.draft = Some(draft);
                self.events.emit(SessionEvent::DraftStarted { assets });
                self.navigate(NavCommand::to(Page::Create));
                true
            }
        }
    }

    fn navigate(&mut self, cmd: NavCommand) -> bool {
        let nav = self.router.dispatch(cmd);
        if let Some(tag) = nav.tag.clone() {
            self.lessons.query = tag;
            self.lessons.thematic = false;
            self.filters_changed(FilterTarget::Lessons);
        }
        if nav.left(Page::Map) {
            self.clear_selection();
        }
        if nav.from == nav.to {
            return nav.tag.is_some();
        }
        self.events.emit(SessionEvent::Navigated {
            from: nav.from,
            to: nav.to,
        });
        true
    }

    fn clear_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        self.selection_changed()
    }

    fn filters_changed(&mut self, target: FilterTarget) -> bool {
        let state = self.filter(target);
        debug!(?target, query = %state.query, thematic = state.thematic, "filters changed");
        self.events.emit(SessionEvent::FiltersChanged(target));
        true
    }

    fn selection_changed(&mut self) -> bool {
        let len = self.selection.len();
        debug!(len, "selection changed");
        self.events.emit(SessionEvent::SelectionChanged { len });
        true
    }

    /// Snapshot the current filter state of `target` under a fresh ticket.
    pub fn issue_query(&mut self, target: FilterTarget) -> PendingQuery {
        let ticket = match target {
            FilterTarget::Lessons => self.lesson_gate.issue(),
            FilterTarget::Map => self.map_gate.issue(),
        };
        PendingQuery {
            ticket,
            target,
            state: self.filter(target).clone(),
        }
    }

    pub fn complete_lessons(&self, pending: &PendingQuery) -> Option<Vec<&Lesson>> {
        if pending.target != FilterTarget::Lessons {
            return None;
        }
        let results = self.engine.lessons(&self.catalog, &pending.state);
        self.lesson_gate.accept(pending.ticket, results)
    }

    pub fn complete_assets(&self, pending: &PendingQuery) -> Option<Vec<&MapAsset>> {
        if pending.target != FilterTarget::Map {
            return None;
        }
        let results = self.engine.assets(&self.catalog, &pending.state);
        self.map_gate.accept(pending.ticket, results)
    }

    pub fn lessons(&self) -> Vec<&Lesson> {
        self.engine.lessons(&self.catalog, &self.lessons)
    }

    pub fn assets(&self) -> Vec<&MapAsset> {
        self.engine.assets(&self.catalog, &self.map)
    }

    pub fn lesson_facets(&self) -> Vec<FacetGroup> {
        self.engine.lesson_facets(&self.catalog)
    }

    pub fn suggestions(&self, query: &str) -> Vec<SearchSuggestion> {
        self.engine.suggestions(&self.catalog, query)
    }

    pub fn selected_assets(&self) -> Vec<&MapAsset> {
        self.selection.selected_objects(&self.catalog)
    }
}
