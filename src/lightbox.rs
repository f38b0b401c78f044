//! Lightbox navigation state machine.
//!
//! Two states: closed, or open on a photo index. Open transitions move
//! between neighbouring indices with bounds checking (edge moves are
//! no-ops), and every transition into an open index re-encodes that index
//! in the shareable location so the state survives a fresh load or a shared
//! link. Closing clears the encoding and reports which index was last
//! viewed so the grid can scroll it into view — once.
//!
//! Keyboard input goes through a plain key-to-transition table rather than
//! any UI event mechanism; keys are bound only while open. The direction
//! value is purely a hint for the enter/exit animation of the displayed
//! image and carries no other semantics.
//!
//! The generator drives this machine to compute the prev/next links baked
//! into photo pages, and the embedded `nav.js` mirrors the same table and
//! bounds rules in the browser.

/// Animation hint: which way the displayed image should slide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Backward,
    #[default]
    None,
    Forward,
}

impl Direction {
    fn from_delta(from: usize, to: usize) -> Self {
        match to.cmp(&from) {
            std::cmp::Ordering::Less => Direction::Backward,
            std::cmp::Ordering::Equal => Direction::None,
            std::cmp::Ordering::Greater => Direction::Forward,
        }
    }
}

/// Keyboard signals the lightbox understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowRight,
    ArrowLeft,
    Escape,
}

/// Abstract navigation intents, decoupled from their triggers — the same
/// transition fires from a key press, a pointer on a nav zone, or a close
/// button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Next,
    Previous,
    Close,
}

/// The key-to-transition table. Consulted only while open; while closed
/// every key is a no-op.
pub const KEY_BINDINGS: &[(Key, Transition)] = &[
    (Key::ArrowRight, Transition::Next),
    (Key::ArrowLeft, Transition::Previous),
    (Key::Escape, Transition::Close),
];

/// Look up the transition bound to a key.
pub fn transition_for(key: Key) -> Transition {
    KEY_BINDINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, t)| *t)
        .expect("every Key has a binding")
}

/// A shareable location identifier: either it encodes an open photo index
/// or it doesn't. The platform owns history semantics; this is just the
/// bidirectional mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub photo: Option<usize>,
}

impl Location {
    pub fn closed() -> Self {
        Self { photo: None }
    }

    pub fn open(index: usize) -> Self {
        Self {
            photo: Some(index),
        }
    }

    /// Parse a location string. Accepts the query form used for shallow
    /// updates (`?photo=3`, `photo=3`) and the detail page path form
    /// (`/p/3`, `/p/3.html`). Anything else means no photo is open.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(query) = raw.strip_prefix('?').or(Some(raw))
            && let Some(value) = query.strip_prefix("photo=")
            && let Ok(index) = value.parse::<usize>()
        {
            return Self::open(index);
        }
        if let Some(rest) = raw.strip_prefix("/p/") {
            let stem = rest.strip_suffix(".html").unwrap_or(rest);
            if let Ok(index) = stem.parse::<usize>() {
                return Self::open(index);
            }
        }
        Self::closed()
    }

    /// Encode back to the shallow query form (`?photo=3`, or empty when
    /// closed).
    pub fn encode(&self) -> String {
        match self.photo {
            Some(index) => format!("?photo={index}"),
            None => String::new(),
        }
    }
}

/// Which photo is open, and the animation hint for how we got there.
///
/// Owned by the page-level controller; the lightbox itself only reads the
/// state and emits transitions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    open_index: Option<usize>,
    direction: Direction,
}

impl NavigationState {
    pub fn closed() -> Self {
        Self::default()
    }

    /// Recover state from a location, e.g. on initial load of a shared
    /// link. An encoded index outside the listing stays closed — that page
    /// is a not-found outcome, not an open lightbox.
    pub fn from_location(location: Location, len: usize) -> Self {
        let mut state = Self::closed();
        if let Some(index) = location.photo {
            state.open(index, len);
        }
        state
    }

    /// The location this state should be encoded as.
    pub fn location(&self) -> Location {
        Location {
            photo: self.open_index,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open_index.is_some()
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open_index
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Open photo `index`. Out-of-bounds indices are ignored. Opening from
    /// an already-open state recomputes the direction from the index delta;
    /// opening from closed carries no direction.
    pub fn open(&mut self, index: usize, len: usize) {
        if index >= len {
            return;
        }
        self.direction = match self.open_index {
            Some(current) => Direction::from_delta(current, index),
            None => Direction::None,
        };
        self.open_index = Some(index);
    }

    /// Advance to the next photo. No-op while closed or at the last index.
    pub fn next(&mut self, len: usize) {
        if let Some(current) = self.open_index
            && current + 1 < len
        {
            self.open_index = Some(current + 1);
            self.direction = Direction::Forward;
        }
    }

    /// Step back to the previous photo. No-op while closed or at index 0.
    pub fn previous(&mut self) {
        if let Some(current) = self.open_index
            && current > 0
        {
            self.open_index = Some(current - 1);
            self.direction = Direction::Backward;
        }
    }

    /// Close the lightbox. Returns the index that was open so the owning
    /// page can record it as the last-viewed photo.
    pub fn close(&mut self) -> Option<usize> {
        let last_viewed = self.open_index.take();
        self.direction = Direction::None;
        last_viewed
    }

    /// Apply an abstract transition. Returns the last-viewed index when the
    /// transition was a close.
    pub fn apply(&mut self, transition: Transition, len: usize) -> Option<usize> {
        match transition {
            Transition::Next => {
                self.next(len);
                None
            }
            Transition::Previous => {
                self.previous();
                None
            }
            Transition::Close => self.close(),
        }
    }

    /// Feed a keyboard signal through the binding table.
    ///
    /// Returns the transition that fired, or `None` while closed (keys are
    /// only bound while a photo is open).
    pub fn handle_key(&mut self, key: Key, len: usize) -> Option<Transition> {
        if !self.is_open() {
            return None;
        }
        let transition = transition_for(key);
        self.apply(transition, len);
        Some(transition)
    }
}

/// Prev/next neighbours of a photo index, as the state machine would walk
/// them. Used by the generator to bake navigation links into photo pages;
/// `None` at a boundary means the corresponding control is omitted.
pub fn neighbors(index: usize, len: usize) -> (Option<usize>, Option<usize>) {
    let mut state = NavigationState::closed();
    state.open(index, len);

    let mut forward = state;
    forward.next(len);
    let next = forward.open_index().filter(|&i| i != index);

    let mut backward = state;
    backward.previous();
    let previous = backward.open_index().filter(|&i| i != index);

    (previous, next)
}

/// Per-visit tracker for the one-shot "scroll back to the last viewed
/// photo" behaviour.
///
/// Closing the lightbox records an index here; the grid consumes it at most
/// once, and only on a visit where the location encodes no photo (if one is
/// encoded, the lightbox is about to re-open and scrolling underneath it
/// would be wasted work). The flag is explicit state, not inferred from the
/// render cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Session {
    last_viewed: Option<usize>,
    has_scrolled_to_last_viewed: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the index reported by [`NavigationState::close`].
    pub fn record_close(&mut self, index: usize) {
        self.last_viewed = Some(index);
        self.has_scrolled_to_last_viewed = false;
    }

    pub fn last_viewed(&self) -> Option<usize> {
        self.last_viewed
    }

    /// The index to scroll into view, at most once per recorded close.
    pub fn take_scroll_target(&mut self, location: Location) -> Option<usize> {
        if location.photo.is_some() || self.has_scrolled_to_last_viewed {
            return None;
        }
        let target = self.last_viewed?;
        self.has_scrolled_to_last_viewed = true;
        Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEN: usize = 5;

    #[test]
    fn starts_closed() {
        let state = NavigationState::closed();
        assert!(!state.is_open());
        assert_eq!(state.direction(), Direction::None);
        assert_eq!(state.location(), Location::closed());
    }

    #[test]
    fn open_then_next() {
        let mut state = NavigationState::closed();
        state.open(2, LEN);
        assert_eq!(state.open_index(), Some(2));
        assert_eq!(state.direction(), Direction::None);

        state.next(LEN);
        assert_eq!(state.open_index(), Some(3));
        assert_eq!(state.direction(), Direction::Forward);
        assert_eq!(state.location().encode(), "?photo=3");
    }

    #[test]
    fn previous_at_zero_is_noop() {
        let mut state = NavigationState::closed();
        state.open(0, LEN);

        state.previous();
        assert_eq!(state.open_index(), Some(0));
        assert_eq!(state.direction(), Direction::None);
    }

    #[test]
    fn next_at_last_index_is_noop() {
        let mut state = NavigationState::closed();
        state.open(LEN - 1, LEN);

        state.next(LEN);
        assert_eq!(state.open_index(), Some(LEN - 1));
    }

    #[test]
    fn previous_sets_backward_direction() {
        let mut state = NavigationState::closed();
        state.open(3, LEN);
        state.previous();

        assert_eq!(state.open_index(), Some(2));
        assert_eq!(state.direction(), Direction::Backward);
    }

    #[test]
    fn open_out_of_bounds_stays_closed() {
        let mut state = NavigationState::closed();
        state.open(LEN, LEN);
        assert!(!state.is_open());
    }

    #[test]
    fn open_from_open_recomputes_direction_from_delta() {
        let mut state = NavigationState::closed();
        state.open(4, LEN);
        state.open(1, LEN);
        assert_eq!(state.direction(), Direction::Backward);

        state.open(3, LEN);
        assert_eq!(state.direction(), Direction::Forward);
    }

    #[test]
    fn close_reports_last_viewed() {
        let mut state = NavigationState::closed();
        state.open(2, LEN);
        state.next(LEN);

        assert_eq!(state.close(), Some(3));
        assert!(!state.is_open());
        assert_eq!(state.location().encode(), "");
    }

    // =========================================================================
    // Keyboard binding tests
    // =========================================================================

    #[test]
    fn keys_are_noops_while_closed() {
        let mut state = NavigationState::closed();

        assert_eq!(state.handle_key(Key::ArrowRight, LEN), None);
        assert_eq!(state.handle_key(Key::Escape, LEN), None);
        assert!(!state.is_open());
    }

    #[test]
    fn arrow_keys_navigate_while_open() {
        let mut state = NavigationState::closed();
        state.open(1, LEN);

        assert_eq!(
            state.handle_key(Key::ArrowRight, LEN),
            Some(Transition::Next)
        );
        assert_eq!(state.open_index(), Some(2));

        assert_eq!(
            state.handle_key(Key::ArrowLeft, LEN),
            Some(Transition::Previous)
        );
        assert_eq!(state.open_index(), Some(1));
    }

    #[test]
    fn escape_closes() {
        let mut state = NavigationState::closed();
        state.open(1, LEN);

        assert_eq!(state.handle_key(Key::Escape, LEN), Some(Transition::Close));
        assert!(!state.is_open());
    }

    #[test]
    fn every_key_has_a_binding() {
        for key in [Key::ArrowRight, Key::ArrowLeft, Key::Escape] {
            // transition_for panics on a missing binding
            let _ = transition_for(key);
        }
    }

    // =========================================================================
    // Location mapping tests
    // =========================================================================

    #[test]
    fn location_roundtrip() {
        let loc = Location::open(7);
        assert_eq!(loc.encode(), "?photo=7");
        assert_eq!(Location::parse("?photo=7"), loc);
        assert_eq!(Location::parse("photo=7"), loc);
    }

    #[test]
    fn location_parses_detail_page_paths() {
        assert_eq!(Location::parse("/p/3"), Location::open(3));
        assert_eq!(Location::parse("/p/3.html"), Location::open(3));
    }

    #[test]
    fn location_garbage_means_closed() {
        assert_eq!(Location::parse(""), Location::closed());
        assert_eq!(Location::parse("/"), Location::closed());
        assert_eq!(Location::parse("?photo=abc"), Location::closed());
        assert_eq!(Location::parse("/p/last"), Location::closed());
    }

    #[test]
    fn state_recovered_from_location_on_load() {
        let state = NavigationState::from_location(Location::parse("?photo=2"), LEN);
        assert_eq!(state.open_index(), Some(2));

        // Encoded index beyond the listing is a not-found page, not an open
        // lightbox
        let state = NavigationState::from_location(Location::parse("?photo=99"), LEN);
        assert!(!state.is_open());
    }

    // =========================================================================
    // Neighbor computation (used by the generator)
    // =========================================================================

    #[test]
    fn neighbors_in_the_middle() {
        assert_eq!(neighbors(2, LEN), (Some(1), Some(3)));
    }

    #[test]
    fn neighbors_at_boundaries() {
        assert_eq!(neighbors(0, LEN), (None, Some(1)));
        assert_eq!(neighbors(LEN - 1, LEN), (Some(LEN - 2), None));
        assert_eq!(neighbors(0, 1), (None, None));
    }

    // =========================================================================
    // One-shot scroll tracking
    // =========================================================================

    #[test]
    fn scroll_target_consumed_once() {
        let mut session = Session::new();
        let mut state = NavigationState::closed();
        state.open(3, LEN);
        session.record_close(state.close().unwrap());

        assert_eq!(session.take_scroll_target(Location::closed()), Some(3));
        // Second visit: already consumed
        assert_eq!(session.take_scroll_target(Location::closed()), None);
    }

    #[test]
    fn no_scroll_while_location_encodes_a_photo() {
        let mut session = Session::new();
        session.record_close(2);

        assert_eq!(session.take_scroll_target(Location::open(2)), None);
        // Still available once the lightbox actually closes
        assert_eq!(session.take_scroll_target(Location::closed()), Some(2));
    }

    #[test]
    fn reclosing_rearms_the_scroll() {
        let mut session = Session::new();
        session.record_close(1);
        assert_eq!(session.take_scroll_target(Location::closed()), Some(1));

        session.record_close(4);
        assert_eq!(session.take_scroll_target(Location::closed()), Some(4));
    }

    #[test]
    fn no_scroll_without_a_recorded_close() {
        let mut session = Session::new();
        assert_eq!(session.take_scroll_target(Location::closed()), None);
    }
}
