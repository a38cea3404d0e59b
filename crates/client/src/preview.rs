//! Hover preview state of a video card.

/// Whether a card is idle, playing its preview reel, or hovering after the
/// reel failed to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreviewState {
    #[default]
    Idle,
    Hovering,
    PreviewFailed,
}

/// What the card's media slot renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShownMedia<'a> {
    Thumbnail(&'a str),
    Preview(&'a str),
}

impl PreviewState {
    /// Pointer entered the card. A new hover always retries the preview.
    pub fn mouse_enter(self) -> Self {
        PreviewState::Hovering
    }

    pub fn mouse_leave(self) -> Self {
        PreviewState::Idle
    }

    /// The preview video reported a load error. Ignored unless hovering.
    pub fn preview_error(self) -> Self {
        match self {
            PreviewState::Hovering => PreviewState::PreviewFailed,
            other => other,
        }
    }

    /// Only a live hover plays the reel; a failed reel falls back to the
    /// static thumbnail.
    pub fn shown<'a>(self, thumbnail_url: &'a str, preview_url: &'a str) -> ShownMedia<'a> {
        match self {
            PreviewState::Hovering => ShownMedia::Preview(preview_url),
            PreviewState::Idle | PreviewState::PreviewFailed => ShownMedia::Thumbnail(thumbnail_url),
        }
    }
}
