use crate::settings::{self, Settings};
use crate::state::{Change, Flags, PlaybackState};
use crate::timer::DelayTimer;
use crate::Error;
use gstreamer as gst;
use gstreamer::prelude::*;
use iced::{window, Task};
use log::{debug, error, warn};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Something observers of a [`Player`] should hear about.
#[derive(Debug, Clone)]
pub enum Event {
    PlayingChanged(bool),
    PausedChanged(bool),
    StoppedChanged(bool),
    /// A user-facing explanation of why the pipeline could not be built.
    MessageBox(String),
    EndOfStream,
    Error(glib::Error),
}

impl From<Change> for Event {
    fn from(change: Change) -> Self {
        match change {
            Change::Playing(v) => Event::PlayingChanged(v),
            Change::Paused(v) => Event::PausedChanged(v),
            Change::Stopped(v) => Event::StoppedChanged(v),
        }
    }
}

pub(crate) struct Internal {
    pub(crate) settings: Settings,

    pub(crate) pipeline_string: String,
    pub(crate) current_pipeline_string: String,
    pub(crate) pipeline: Option<gst::Pipeline>,
    pub(crate) bus: Option<gst::Bus>,

    pub(crate) video_sink: Option<gst::Element>,
    // the sink actually linked into `pipeline`, which may differ from `video_sink`
    pub(crate) attached_sink: Option<gst::Element>,

    pub(crate) flags: Flags,
    pub(crate) play_timer: DelayTimer,
    pub(crate) stop_timer: DelayTimer,

    pub(crate) events: VecDeque<Event>,
}

impl Internal {
    fn new(settings: Settings) -> Self {
        Internal {
            settings,
            pipeline_string: String::new(),
            current_pipeline_string: String::new(),
            pipeline: None,
            bus: None,
            video_sink: None,
            attached_sink: None,
            flags: Flags::default(),
            play_timer: DelayTimer::new(),
            stop_timer: DelayTimer::new(),
            events: VecDeque::new(),
        }
    }

    /// Rebuilds the pipeline if the configured description changed since the last build.
    pub(crate) fn initialize(&mut self) {
        if self.pipeline_string.is_empty() || self.pipeline_string == self.current_pipeline_string
        {
            return;
        }

        self.current_pipeline_string.clear();
        self.teardown();

        let description = self.pipeline_string.clone();
        match self.build(&description) {
            Ok((pipeline, sink)) => {
                debug!("built pipeline `{description}`");
                self.bus = pipeline.bus();
                self.pipeline = Some(pipeline);
                self.attached_sink = Some(sink);
                self.current_pipeline_string = description;
            }
            Err(err) => {
                warn!("cannot build pipeline `{description}`: {err}");
                self.events
                    .push_back(Event::MessageBox(message_box_text(&err, &description)));
            }
        }
    }

    fn build(&self, description: &str) -> Result<(gst::Pipeline, gst::Element), Error> {
        let pipeline = gst::parse::launch(description)?
            .downcast::<gst::Pipeline>()
            .map_err(|_| Error::Cast)?;

        let src = pipeline
            .find_unlinked_pad(gst::PadDirection::Src)
            .ok_or(Error::UnlinkedPad)?;
        let element = src.parent_element().ok_or(Error::PadParent)?;
        let sink = self.video_sink.clone().ok_or(Error::NoSink)?;

        if element.find_property("caps").is_some() {
            let caps = gst::Caps::from_str(&self.settings.caps)
                .map_err(|_| Error::Caps(self.settings.caps.clone()))?;
            element.set_property("caps", &caps);
        } else {
            warn!(
                "element `{}` has no caps property, leaving its format alone",
                element.name()
            );
        }

        if sink.find_property("sync").is_some() {
            sink.set_property("sync", self.settings.sync);
        }

        pipeline.add(&sink)?;
        if let Err(err) = element.link(&sink) {
            // hand the sink back so it can join the next pipeline
            if let Err(err) = pipeline.remove(&sink) {
                warn!("cannot detach video sink after failed link: {err}");
            }
            return Err(err.into());
        }

        Ok((pipeline, sink))
    }

    fn teardown(&mut self) {
        self.stop();

        if let Some(pipeline) = self.pipeline.take() {
            if let Some(sink) = self.attached_sink.take() {
                if let Err(err) = pipeline.remove(&sink) {
                    warn!("cannot detach video sink: {err}");
                }
            }
        }
        self.bus = None;
    }

    pub(crate) fn play(&mut self) -> bool {
        self.initialize();

        let Some(pipeline) = &self.pipeline else {
            return false;
        };
        match pipeline.set_state(gst::State::Playing) {
            Ok(_) => true,
            Err(err) => {
                error!("cannot start pipeline: {err}");
                false
            }
        }
    }

    pub(crate) fn pause(&mut self) {
        if let Some(pipeline) = &self.pipeline {
            if let Err(err) = pipeline.set_state(gst::State::Paused) {
                error!("cannot pause pipeline: {err}");
            }
        }
    }

    pub(crate) fn stop(&mut self) {
        let Some(pipeline) = &self.pipeline else {
            return;
        };
        if let Err(err) = pipeline.set_state(gst::State::Null) {
            error!("cannot stop pipeline: {err}");
        }

        // NULL is reached synchronously and the bus is flushed on the way down,
        // so its state-changed message never arrives
        let state = pipeline.current_state();

        // anything still queued describes the pipeline before it stopped
        if let Some(bus) = &self.bus {
            let mut stale = 0;
            while bus.pop().is_some() {
                stale += 1;
            }
            if stale > 0 {
                debug!("dropped {stale} bus messages queued before stop");
            }
        }

        self.sync_state(state);
    }

    fn sync_state(&mut self, state: gst::State) {
        if let Some(state) = PlaybackState::from_gst(state) {
            let changes = self.flags.apply(state);
            self.events.extend(changes.into_iter().map(Event::from));
        }
    }

    pub(crate) fn handle_message(&mut self, message: &gst::Message) {
        match message.view() {
            gst::MessageView::Eos(_) => {
                debug!("end of stream");
                self.events.push_back(Event::EndOfStream);
                self.stop();
            }
            gst::MessageView::Error(err) => {
                error!(
                    "bus returned an error from {:?}: {} ({:?})",
                    err.src().map(|s| s.path_string()),
                    err.error(),
                    err.debug()
                );
                self.events.push_back(Event::Error(err.error()));
                self.stop();
            }
            gst::MessageView::StateChanged(changed) => {
                let from_pipeline = match (&self.pipeline, changed.src()) {
                    (Some(pipeline), Some(src)) => src == pipeline.upcast_ref::<gst::Object>(),
                    _ => false,
                };
                if from_pipeline {
                    self.sync_state(changed.current());
                }
            }
            _ => {}
        }
    }

    pub(crate) fn poll(&mut self, now: Instant) -> Vec<Event> {
        if self.stop_timer.fire(now) {
            self.stop();
        }
        if self.play_timer.fire(now) {
            self.play();
        }

        // one at a time, so a stop triggered by a message discards the rest
        if let Some(bus) = self.bus.clone() {
            while let Some(message) = bus.pop() {
                self.handle_message(&message);
            }
        }

        self.events.drain(..).collect()
    }

    /// Whether the bus or a timer may still produce events.
    pub(crate) fn is_live(&self) -> bool {
        let running = self.pipeline.as_ref().is_some_and(|pipeline| {
            pipeline.current_state() != gst::State::Null
                || pipeline.pending_state() != gst::State::VoidPending
        });

        running
            || self.play_timer.is_armed()
            || self.stop_timer.is_armed()
            || !self.events.is_empty()
    }
}

fn toggled_mode(mode: window::Mode) -> window::Mode {
    match mode {
        window::Mode::Fullscreen => window::Mode::Windowed,
        _ => window::Mode::Fullscreen,
    }
}

fn message_box_text(err: &Error, description: &str) -> String {
    match err {
        Error::Glib(_) | Error::Cast => {
            format!("Failed to create the pipeline '{description}'!")
        }
        Error::UnlinkedPad => format!(
            "The pipeline string has no unlinked video source element, cannot link pipeline. String = {description}"
        ),
        _ => format!("Failed to link the pipeline '{description}': {err}"),
    }
}

/// Play/pause/stop control over a GStreamer pipeline built from a launch description.
///
/// The pipeline is built lazily on [`Player::play`] and rebuilt only when the description
/// changes. Its single unlinked source pad is linked to the video sink given with
/// [`Player::set_video_sink`]. Bus messages are turned into [`Event`]s by [`Player::poll`],
/// which the [`PlayerView`](crate::PlayerView) widget calls on every redraw.
pub struct Player(pub(crate) RefCell<Internal>);

impl Drop for Player {
    fn drop(&mut self) {
        self.0.get_mut().stop();
    }
}

impl Player {
    /// Creates a player without a pipeline. Initializes GStreamer if needed.
    pub fn new(settings: Settings) -> Result<Self, Error> {
        gst::init()?;
        Ok(Player(RefCell::new(Internal::new(settings))))
    }

    /// Creates a player decoding the media at `uri` into `video_sink`.
    pub fn from_uri(
        uri: &url::Url,
        video_sink: gst::Element,
        settings: Settings,
    ) -> Result<Self, Error> {
        let mut player = Self::new(settings)?;
        player.set_pipeline_string(settings::uri_pipeline(uri));
        player.set_video_sink(video_sink);
        Ok(player)
    }

    /// Set the launch description. Takes effect on the next [`Player::play`].
    pub fn set_pipeline_string(&mut self, description: impl Into<String>) {
        self.0.get_mut().pipeline_string = description.into();
    }

    pub fn pipeline_string(&self) -> String {
        self.0.borrow().pipeline_string.clone()
    }

    /// Set the element that consumes decoded video.
    /// A pipeline linked to a previous sink is rebuilt on the next [`Player::play`].
    pub fn set_video_sink(&mut self, sink: gst::Element) {
        let inner = self.0.get_mut();
        if inner.attached_sink.as_ref() != Some(&sink) {
            inner.current_pipeline_string.clear();
        }
        inner.video_sink = Some(sink);
    }

    pub fn video_sink(&self) -> Option<gst::Element> {
        self.0.borrow().video_sink.clone()
    }

    /// Builds the pipeline if needed and starts it.
    /// Returns `false` if there is no pipeline to start.
    pub fn play(&mut self) -> bool {
        self.0.get_mut().play()
    }

    pub fn pause(&mut self) {
        self.0.get_mut().pause();
    }

    pub fn stop(&mut self) {
        self.0.get_mut().stop();
    }

    /// Sends end-of-stream into the pipeline so muxers can finish writing.
    pub fn send_eos(&mut self) -> bool {
        self.0
            .get_mut()
            .pipeline
            .as_ref()
            .is_some_and(|pipeline| pipeline.send_event(gst::event::Eos::new()))
    }

    /// Calls [`Player::play`] once `delay` has elapsed.
    pub fn schedule_play(&mut self, delay: Duration) {
        self.0.get_mut().play_timer.start(delay, Instant::now());
    }

    /// Calls [`Player::stop`] once `delay` has elapsed.
    pub fn schedule_stop(&mut self, delay: Duration) {
        self.0.get_mut().stop_timer.start(delay, Instant::now());
    }

    pub fn cancel_timers(&mut self) {
        let inner = self.0.get_mut();
        inner.play_timer.cancel();
        inner.stop_timer.cancel();
    }

    /// Switches the window `id` between fullscreen and windowed mode,
    /// based on the mode the window is actually in.
    pub fn toggle_fullscreen<Message>(&self, id: window::Id) -> Task<Message>
    where
        Message: Send + 'static,
    {
        window::mode(id).then(move |mode| window::set_mode(id, toggled_mode(mode)))
    }

    pub fn playing(&self) -> bool {
        self.0.borrow().flags.playing
    }

    pub fn paused(&self) -> bool {
        self.0.borrow().flags.paused
    }

    pub fn stopped(&self) -> bool {
        self.0.borrow().flags.stopped
    }

    pub fn state(&self) -> PlaybackState {
        self.0.borrow().flags.state()
    }

    pub fn settings(&self) -> Settings {
        self.0.borrow().settings.clone()
    }

    /// Get the underlying GStreamer pipeline, if one is built.
    pub fn pipeline(&self) -> Option<gst::Pipeline> {
        self.0.borrow().pipeline.clone()
    }

    /// Fires due timers, drains the bus and returns everything observers should see.
    pub fn poll(&self, now: Instant) -> Vec<Event> {
        self.0.borrow_mut().poll(now)
    }
}
