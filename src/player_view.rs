use crate::player::{Event, Player};
use iced::{
    advanced::{self, layout, renderer, widget, Widget},
    Element,
};
use std::marker::PhantomData;

/// Widget which keeps a [`Player`] in step with the UI loop and relays its events as messages.
///
/// The video itself is rendered by the player's video sink; this widget only reserves space
/// for it and drains the pipeline bus on every redraw.
pub struct PlayerView<'a, Message, Theme = iced::Theme, Renderer = iced::Renderer>
where
    Renderer: advanced::Renderer,
{
    player: &'a Player,
    width: iced::Length,
    height: iced::Length,
    background: iced::Color,
    on_playing_changed: Option<Box<dyn Fn(bool) -> Message + 'a>>,
    on_paused_changed: Option<Box<dyn Fn(bool) -> Message + 'a>>,
    on_stopped_changed: Option<Box<dyn Fn(bool) -> Message + 'a>>,
    on_message_box: Option<Box<dyn Fn(String) -> Message + 'a>>,
    on_end_of_stream: Option<Message>,
    on_error: Option<Box<dyn Fn(&glib::Error) -> Message + 'a>>,
    _phantom: PhantomData<(Theme, Renderer)>,
}

impl<'a, Message, Theme, Renderer> PlayerView<'a, Message, Theme, Renderer>
where
    Renderer: advanced::Renderer,
{
    /// Creates a new view for a given player.
    pub fn new(player: &'a Player) -> Self {
        PlayerView {
            player,
            width: iced::Length::Fill,
            height: iced::Length::Fill,
            background: iced::Color::BLACK,
            on_playing_changed: None,
            on_paused_changed: None,
            on_stopped_changed: None,
            on_message_box: None,
            on_end_of_stream: None,
            on_error: None,
            _phantom: Default::default(),
        }
    }

    /// Sets the width of the `PlayerView` boundaries.
    pub fn width(self, width: impl Into<iced::Length>) -> Self {
        PlayerView {
            width: width.into(),
            ..self
        }
    }

    /// Sets the height of the `PlayerView` boundaries.
    pub fn height(self, height: impl Into<iced::Length>) -> Self {
        PlayerView {
            height: height.into(),
            ..self
        }
    }

    /// Sets the color filling the area behind the video.
    pub fn background(self, background: impl Into<iced::Color>) -> Self {
        PlayerView {
            background: background.into(),
            ..self
        }
    }

    /// Message to send when the `playing` flag changes.
    pub fn on_playing_changed<F>(self, on_playing_changed: F) -> Self
    where
        F: 'a + Fn(bool) -> Message,
    {
        PlayerView {
            on_playing_changed: Some(Box::new(on_playing_changed)),
            ..self
        }
    }

    /// Message to send when the `paused` flag changes.
    pub fn on_paused_changed<F>(self, on_paused_changed: F) -> Self
    where
        F: 'a + Fn(bool) -> Message,
    {
        PlayerView {
            on_paused_changed: Some(Box::new(on_paused_changed)),
            ..self
        }
    }

    /// Message to send when the `stopped` flag changes.
    pub fn on_stopped_changed<F>(self, on_stopped_changed: F) -> Self
    where
        F: 'a + Fn(bool) -> Message,
    {
        PlayerView {
            on_stopped_changed: Some(Box::new(on_stopped_changed)),
            ..self
        }
    }

    /// Message to send when the pipeline could not be built.
    /// The string is meant to be shown to the user as is.
    pub fn on_message_box<F>(self, on_message_box: F) -> Self
    where
        F: 'a + Fn(String) -> Message,
    {
        PlayerView {
            on_message_box: Some(Box::new(on_message_box)),
            ..self
        }
    }

    /// Message to send when the stream ends.
    pub fn on_end_of_stream(self, on_end_of_stream: Message) -> Self {
        PlayerView {
            on_end_of_stream: Some(on_end_of_stream),
            ..self
        }
    }

    pub fn on_error<F>(self, on_error: F) -> Self
    where
        F: 'a + Fn(&glib::Error) -> Message,
    {
        PlayerView {
            on_error: Some(Box::new(on_error)),
            ..self
        }
    }

    fn message(&self, event: Event) -> Option<Message>
    where
        Message: Clone,
    {
        match event {
            Event::PlayingChanged(v) => self.on_playing_changed.as_ref().map(|f| f(v)),
            Event::PausedChanged(v) => self.on_paused_changed.as_ref().map(|f| f(v)),
            Event::StoppedChanged(v) => self.on_stopped_changed.as_ref().map(|f| f(v)),
            Event::MessageBox(text) => self.on_message_box.as_ref().map(|f| f(text)),
            Event::EndOfStream => self.on_end_of_stream.clone(),
            Event::Error(err) => self.on_error.as_ref().map(|f| f(&err)),
        }
    }
}

impl<'a, Message, Theme, Renderer> Widget<Message, Theme, Renderer>
    for PlayerView<'a, Message, Theme, Renderer>
where
    Message: Clone,
    Renderer: advanced::Renderer,
{
    fn size(&self) -> iced::Size<iced::Length> {
        iced::Size {
            width: self.width,
            height: self.height,
        }
    }

    fn layout(
        &mut self,
        _tree: &mut widget::Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::Node::new(limits.resolve(self.width, self.height, iced::Size::ZERO))
    }

    fn draw(
        &self,
        _tree: &widget::Tree,
        renderer: &mut Renderer,
        _theme: &Theme,
        _style: &renderer::Style,
        layout: advanced::Layout<'_>,
        _cursor: advanced::mouse::Cursor,
        _viewport: &iced::Rectangle,
    ) {
        renderer.fill_quad(
            renderer::Quad {
                bounds: layout.bounds(),
                ..renderer::Quad::default()
            },
            self.background,
        );
    }

    fn update(
        &mut self,
        _state: &mut widget::Tree,
        event: &iced::Event,
        _layout: advanced::Layout<'_>,
        _cursor: advanced::mouse::Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn advanced::Clipboard,
        shell: &mut advanced::Shell<'_, Message>,
        _viewport: &iced::Rectangle,
    ) {
        if let iced::Event::Window(iced::window::Event::RedrawRequested(now)) = event {
            for event in self.player.poll(*now) {
                if let Some(message) = self.message(event) {
                    shell.publish(message);
                }
            }

            let inner = self.player.0.borrow();
            if inner.is_live() {
                if let Some(next) = now.checked_add(inner.settings.poll_interval) {
                    shell.request_redraw_at(next);
                }
            }
        }
    }
}

impl<'a, Message, Theme, Renderer> From<PlayerView<'a, Message, Theme, Renderer>>
    for Element<'a, Message, Theme, Renderer>
where
    Message: 'a + Clone,
    Theme: 'a,
    Renderer: 'a + advanced::Renderer,
{
    fn from(player_view: PlayerView<'a, Message, Theme, Renderer>) -> Self {
        Self::new(player_view)
    }
}
