//! Scroll-driven "load more" trigger.
//!
//! The trigger does not track whether a fetch is running. It is handed the
//! [`LoadingState`] owned by the feed state and flips it when it fires, so
//! there is exactly one flag deciding whether another page may be requested.

/// Whether a page fetch is outstanding. `Idle` is the armed state of the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
}

impl LoadingState {
    pub fn is_loading(self) -> bool {
        self == LoadingState::Loading
    }

    pub fn start_loading(&mut self) {
        *self = LoadingState::Loading;
    }

    /// Re-arm the trigger. Called once per completed fetch.
    pub fn stop_loading(&mut self) {
        *self = LoadingState::Idle;
    }
}

/// Scroll geometry of the item column, in rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollPosition {
    pub scroll_top: usize,
    pub scroll_height: usize,
    pub client_height: usize,
}

impl ScrollPosition {
    /// Rows between the bottom of the viewport and the end of the content.
    pub fn distance_to_bottom(&self) -> usize {
        self.scroll_height
            .saturating_sub(self.scroll_top.saturating_add(self.client_height))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollTrigger {
    proximity: usize,
}

impl ScrollTrigger {
    pub fn new(proximity: usize) -> Self {
        Self { proximity }
    }

    pub fn proximity(&self) -> usize {
        self.proximity
    }

    pub fn set_proximity(&mut self, proximity: usize) {
        self.proximity = proximity;
    }

    pub fn is_near_bottom(&self, position: ScrollPosition) -> bool {
        position.distance_to_bottom() <= self.proximity
    }

    /// Returns true, and moves `loading` to `Loading`, when the position is
    /// within the proximity threshold and no fetch is outstanding.
    pub fn notify_scroll_position(
        &self,
        position: ScrollPosition,
        loading: &mut LoadingState,
    ) -> bool {
        if loading.is_loading() || !self.is_near_bottom(position) {
            return false;
        }
        loading.start_loading();
        true
    }
}
