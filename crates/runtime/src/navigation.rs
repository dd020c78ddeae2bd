use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    #[default]
    Home,
    Map,
    Lessons,
    Create,
    About,
}

impl Page {
    pub const ALL: [Page; 5] = [Page::Home, Page::Map, Page::Lessons, Page::Create, Page::About];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Map => "Map",
            Page::Lessons => "Lessons",
            Page::Create => "Create",
            Page::About => "About",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Page::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Number-key shortcuts `1`..`5`.
    pub fn from_shortcut(key: char) -> Option<Self> {
        let n = key.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| Page::ALL.get(i).copied())
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to change page. The target is kept as raw text so unknown
/// targets can be resolved (to the fallback) rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavCommand {
    pub target: String,
    /// Pre-seeds the Lessons query when arriving from a tag click.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl NavCommand {
    pub fn to(page: Page) -> Self {
        Self {
            target: page.as_str().to_string(),
            tag: None,
        }
    }

    pub fn raw(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            tag: None,
        }
    }

    pub fn lessons_tagged(tag: impl Into<String>) -> Self {
        Self {
            target: Page::Lessons.as_str().to_string(),
            tag: Some(tag.into()),
        }
    }
}

/// Outcome of dispatching a [`NavCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub from: Page,
    pub to: Page,
    pub tag: Option<String>,
    /// True when the requested target was unknown and `to` is the fallback.
    pub fell_back: bool,
}

impl Navigation {
    pub fn left(&self, page: Page) -> bool {
        self.from == page && self.to != page
    }
}

/// Resolves navigation commands against the fixed page set.
#[derive(Debug, Clone)]
pub struct Router {
    current: Page,
    fallback: Page,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Page::Home)
    }
}

impl Router {
    pub fn new(start: Page) -> Self {
        Self {
            current: start,
            fallback: Page::Home,
        }
    }

    pub fn current(&self) -> Page {
        self.current
    }

    pub fn dispatch(&mut self, cmd: NavCommand) -> Navigation {
        let from = self.current;
        let (to, fell_back) = match Page::parse(&cmd.target) {
            Some(p) => (p, false),
            None => {
                warn!(target = %cmd.target, fallback = %self.fallback, "unknown page");
                (self.fallback, true)
            }
        };
        // Tags only mean something to the Lessons page.
        let tag = cmd
            .tag
            .filter(|t| to == Page::Lessons && !t.trim().is_empty());
        self.current = to;
        debug!(%from, %to, ?tag, "navigated");
        Navigation {
            from,
            to,
            tag,
            fell_back,
        }
    }
}
