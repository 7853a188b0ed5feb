//! Sprite animation clips and the per-agent animation cursor.

use roost_types::{AgentKind, Animation};

/// A looping sequence of sprite frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    /// Frame indices in play order.
    pub frames: &'static [u32],
    /// Time each frame stays on screen.
    pub frame_ms: u32,
}

impl Clip {
    const fn new(frames: &'static [u32], frame_ms: u32) -> Self {
        Self { frames, frame_ms }
    }
}

/// Frame shown while an adult sits on an egg or lays.
pub const SITTING_FRAME: u32 = 10;

/// The clip for `animation` on a sprite sheet of `kind`, if that sheet has one.
pub const fn clip(kind: AgentKind, animation: Animation) -> Option<Clip> {
    match (kind, animation) {
        (AgentKind::Adult, Animation::Idle) | (AgentKind::Juvenile, Animation::Idle) => {
            Some(Clip::new(&[0, 1], 500))
        }
        (AgentKind::Adult, Animation::Walking) => Some(Clip::new(&[2, 3, 4, 5], 150)),
        (AgentKind::Adult, Animation::Pecking) => Some(Clip::new(&[6, 7], 300)),
        (AgentKind::Adult, Animation::Jumping) => Some(Clip::new(&[8, 9], 100)),
        (AgentKind::Adult, Animation::Sitting) => Some(Clip::new(&[SITTING_FRAME], 1000)),
        (AgentKind::Juvenile, Animation::Walking) => Some(Clip::new(&[2, 3], 150)),
        (AgentKind::Juvenile, Animation::Pecking) => Some(Clip::new(&[4, 5], 300)),
        (AgentKind::Juvenile, Animation::Running) => Some(Clip::new(&[2, 3], 100)),
        (AgentKind::Juvenile, Animation::Riding) => Some(Clip::new(&[1], 1000)),
        _ => None,
    }
}

/// Which clip is playing, the frame on screen, and time spent on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationCursor {
    kind: AgentKind,
    clip: Animation,
    frame: u32,
    frame_elapsed_ms: f64,
}

impl AnimationCursor {
    /// Start on the idle clip.
    pub const fn new(kind: AgentKind) -> Self {
        Self {
            kind,
            clip: Animation::Idle,
            frame: 0,
            frame_elapsed_ms: 0.0,
        }
    }

    /// The clip currently playing.
    pub const fn clip(&self) -> Animation {
        self.clip
    }

    /// The frame on screen.
    pub const fn frame(&self) -> u32 {
        self.frame
    }

    /// Switch clips. Re-selecting the playing clip does not restart it.
    ///
    /// Clips the sprite sheet lacks keep the current frame.
    pub fn set(&mut self, animation: Animation) {
        if self.clip == animation {
            return;
        }
        self.clip = animation;
        if let Some(first) = clip(self.kind, animation).and_then(|c| c.frames.first().copied()) {
            self.frame = first;
        }
        self.frame_elapsed_ms = 0.0;
    }

    /// Force a frame and restart its timer.
    pub const fn reset_to(&mut self, frame: u32) {
        self.frame = frame;
        self.frame_elapsed_ms = 0.0;
    }

    /// Advance the clip by `elapsed_ms`.
    ///
    /// A sitting adult is pinned to [`SITTING_FRAME`]. A frame that is not
    /// part of the playing clip wraps to the clip's first frame.
    pub fn advance(&mut self, elapsed_ms: f64, sitting: bool) {
        if sitting && self.clip == Animation::Sitting {
            self.frame = SITTING_FRAME;
            return;
        }
        let Some(clip) = clip(self.kind, self.clip) else {
            return;
        };
        self.frame_elapsed_ms += elapsed_ms;
        if self.frame_elapsed_ms < f64::from(clip.frame_ms) {
            return;
        }
        self.frame_elapsed_ms = 0.0;
        let next = clip
            .frames
            .iter()
            .position(|&f| f == self.frame)
            .map_or(0, |index| index.saturating_add(1));
        let wrapped = next.checked_rem(clip.frames.len()).unwrap_or(0);
        if let Some(&frame) = clip.frames.get(wrapped) {
            self.frame = frame;
        }
    }
}
