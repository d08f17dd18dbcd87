use gstreamer as gst;

/// Playback state as reported by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaybackState {
    Playing,
    Paused,
    Stopped,
}

impl PlaybackState {
    /// Maps a pipeline state onto a playback state.
    ///
    /// `READY` and `VOID_PENDING` are transitional and have no playback state.
    pub fn from_gst(state: gst::State) -> Option<Self> {
        match state {
            gst::State::Playing => Some(PlaybackState::Playing),
            gst::State::Paused => Some(PlaybackState::Paused),
            gst::State::Null => Some(PlaybackState::Stopped),
            _ => None,
        }
    }
}

/// A single observable flag that changed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Playing(bool),
    Paused(bool),
    Stopped(bool),
}

/// The three observable playback flags. At most one is set at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub playing: bool,
    pub paused: bool,
    pub stopped: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            playing: false,
            paused: false,
            stopped: true,
        }
    }
}

impl Flags {
    /// Updates the flags to match `state`, returning the flags that actually changed
    /// in the order playing, paused, stopped.
    pub fn apply(&mut self, state: PlaybackState) -> Vec<Change> {
        let next = Flags {
            playing: state == PlaybackState::Playing,
            paused: state == PlaybackState::Paused,
            stopped: state == PlaybackState::Stopped,
        };

        let mut changes = Vec::with_capacity(3);
        if self.playing != next.playing {
            changes.push(Change::Playing(next.playing));
        }
        if self.paused != next.paused {
            changes.push(Change::Paused(next.paused));
        }
        if self.stopped != next.stopped {
            changes.push(Change::Stopped(next.stopped));
        }

        *self = next;
        changes
    }

    pub fn state(&self) -> PlaybackState {
        if self.playing {
            PlaybackState::Playing
        } else if self.paused {
            PlaybackState::Paused
        } else {
            PlaybackState::Stopped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped() {
        let flags = Flags::default();
        assert_eq!(flags.state(), PlaybackState::Stopped);
        assert!(!flags.playing && !flags.paused && flags.stopped);
    }

    #[test]
    fn maps_only_three_states() {
        assert_eq!(
            PlaybackState::from_gst(gst::State::Playing),
            Some(PlaybackState::Playing)
        );
        assert_eq!(
            PlaybackState::from_gst(gst::State::Paused),
            Some(PlaybackState::Paused)
        );
        assert_eq!(
            PlaybackState::from_gst(gst::State::Null),
            Some(PlaybackState::Stopped)
        );
        assert_eq!(PlaybackState::from_gst(gst::State::Ready), None);
        assert_eq!(PlaybackState::from_gst(gst::State::VoidPending), None);
    }

    #[test]
    fn playing_from_stopped_reports_two_changes() {
        let mut flags = Flags::default();
        let changes = flags.apply(PlaybackState::Playing);
        assert_eq!(changes, vec![Change::Playing(true), Change::Stopped(false)]);
        assert!(flags.playing && !flags.paused && !flags.stopped);
    }

    #[test]
    fn pause_then_stop() {
        let mut flags = Flags::default();
        flags.apply(PlaybackState::Playing);

        let changes = flags.apply(PlaybackState::Paused);
        assert_eq!(changes, vec![Change::Playing(false), Change::Paused(true)]);

        let changes = flags.apply(PlaybackState::Stopped);
        assert_eq!(changes, vec![Change::Paused(false), Change::Stopped(true)]);
        assert_eq!(flags, Flags::default());
    }

    #[test]
    fn same_state_is_silent() {
        let mut flags = Flags::default();
        assert!(flags.apply(PlaybackState::Stopped).is_empty());
        flags.apply(PlaybackState::Paused);
        assert!(flags.apply(PlaybackState::Paused).is_empty());
    }

    #[test]
    fn never_more_than_one_flag() {
        let mut flags = Flags::default();
        for state in [
            PlaybackState::Paused,
            PlaybackState::Playing,
            PlaybackState::Stopped,
            PlaybackState::Playing,
            PlaybackState::Paused,
        ] {
            flags.apply(state);
            let set = [flags.playing, flags.paused, flags.stopped]
                .iter()
                .filter(|f| **f)
                .count();
            assert_eq!(set, 1);
            assert_eq!(flags.state(), state);
        }
    }
}
