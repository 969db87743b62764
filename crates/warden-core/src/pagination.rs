//! List-view navigation: numbered pages or opaque cursors.
//!
//! Some endpoints page by number and report a total; others return a `next`
//! cursor and nothing else. [`Paging`] lets a list view drive either through
//! the same [`Navigation`] commands.

use serde::{Deserialize, Serialize};

/// Default rows per page in list views.
pub const DEFAULT_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
  First,
  Previous,
  Next,
}

// ─── Numbered pages ──────────────────────────────────────────────────────────

/// A 1-based page over a list of known length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
  pub page:     u32,
  pub per_page: u32,
  pub total:    u64,
}

impl Default for PageWindow {
  fn default() -> Self { Self::new(DEFAULT_PER_PAGE) }
}

impl PageWindow {
  pub fn new(per_page: u32) -> Self {
    Self {
      page:     1,
      per_page: per_page.max(1),
      total:    0,
    }
  }

  /// Number of pages; an empty list still has one (empty) page.
  pub fn page_count(&self) -> u32 {
    let per_page = u64::from(self.per_page.max(1));
    let pages = self.total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
  }

  /// Zero-based index of the first row on the current page.
  pub fn offset(&self) -> u64 {
    u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
  }

  pub fn has_previous(&self) -> bool { self.page > 1 }

  pub fn has_next(&self) -> bool { self.page < self.page_count() }

  /// Move to `page`, clamped into `1..=page_count()`.
  pub fn go_to(self, page: u32) -> Self {
    Self {
      page: page.clamp(1, self.page_count()),
      ..self
    }
  }

  pub fn next(self) -> Self { self.go_to(self.page.saturating_add(1)) }

  pub fn previous(self) -> Self { self.go_to(self.page.saturating_sub(1)) }

  pub fn first(self) -> Self { self.go_to(1) }

  /// Apply a new total from a response. The page is clamped, so deleting the
  /// last row of the last page steps back one page.
  pub fn with_total(self, total: u64) -> Self {
    Self { total, ..self }.go_to(self.page)
  }

  /// Change the page size; the view returns to the first page.
  pub fn with_per_page(self, per_page: u32) -> Self {
    Self {
      page: 1,
      per_page: per_page.max(1),
      ..self
    }
  }

  /// 1-based inclusive row range shown on this page, `None` when empty.
  pub fn visible_range(&self) -> Option<(u64, u64)> {
    if self.total == 0 {
      return None;
    }
    let start = self.offset() + 1;
    let end = (self.offset() + u64::from(self.per_page)).min(self.total);
    (start <= end).then_some((start, end))
  }
}

// ─── Cursors ─────────────────────────────────────────────────────────────────

/// Cursor bookkeeping for forward-only APIs.
///
/// `current` is the cursor sent to fetch the page on screen (`None` for the
/// first page), `next` is what the last response offered, and `previous`
/// remembers every cursor already visited so the view can step back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorTrail {
  previous: Vec<Option<String>>,
  current:  Option<String>,
  next:     Option<String>,
}

impl CursorTrail {
  pub fn new() -> Self { Self::default() }

  /// The cursor to request for the page on screen.
  pub fn current(&self) -> Option<&str> { self.current.as_deref() }

  /// 1-based position in the trail.
  pub fn page_number(&self) -> usize { self.previous.len() + 1 }

  /// Store the `next` cursor returned alongside the current page.
  pub fn record_response(&mut self, next: Option<String>) {
    self.next = next.filter(|c| !c.is_empty());
  }

  pub fn has_next(&self) -> bool { self.next.is_some() }

  pub fn has_previous(&self) -> bool { !self.previous.is_empty() }

  pub fn advance(&mut self) -> bool {
    let Some(next) = self.next.take() else {
      return false;
    };
    self.previous.push(self.current.replace(next));
    true
  }

  pub fn back(&mut self) -> bool {
    let Some(prev) = self.previous.pop() else {
      return false;
    };
    self.current = prev;
    self.next = None;
    true
  }

  /// Return to the first page, e.g. after the search text or a filter
  /// changes.
  pub fn reset(&mut self) { *self = Self::default(); }
}

// ─── Either ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Paging {
  Page(PageWindow),
  Cursor(CursorTrail),
}

impl Paging {
  /// Apply a navigation command. Returns whether the view moved.
  pub fn navigate(&mut self, nav: Navigation) -> bool {
    match self {
      Self::Page(window) => {
        let before = window.page;
        *window = match nav {
          Navigation::First => window.first(),
          Navigation::Previous => window.previous(),
          Navigation::Next => window.next(),
        };
        window.page != before
      }
      Self::Cursor(trail) => match nav {
        Navigation::Next => trail.advance(),
        Navigation::Previous => trail.back(),
        Navigation::First => {
          let moved = trail.has_previous();
          trail.reset();
          moved
        }
      },
    }
  }

  pub fn has_next(&self) -> bool {
    match self {
      Self::Page(w) => w.has_next(),
      Self::Cursor(t) => t.has_next(),
    }
  }

  pub fn has_previous(&self) -> bool {
    match self {
      Self::Page(w) => w.has_previous(),
      Self::Cursor(t) => t.has_previous(),
    }
  }
}
