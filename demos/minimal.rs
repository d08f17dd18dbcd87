use gstreamer as gst;
use iced::{
    mouse,
    widget::{Button, Column, Container, Row, Text, TextInput},
    window, Element, Subscription, Task,
};
use iced_gst_player::{Player, PlayerView, Settings};
use std::time::Duration;

fn main() -> iced::Result {
    iced::application(App::default, App::update, App::view)
        .title("Iced GStreamer Player")
        .subscription(App::subscription)
        .run()
}

#[derive(Clone, Debug)]
enum Message {
    PipelineEdited(String),
    Play,
    Pause,
    Stop,
    PlayLater,
    StopLater,
    ToggleFullscreen,
    PlayingChanged(bool),
    PausedChanged(bool),
    StoppedChanged(bool),
    MessageBox(String),
    DismissMessage,
    EndOfStream,
    WindowSeen(window::Id),
}

struct App {
    player: Player,
    pipeline: String,
    playing: bool,
    paused: bool,
    stopped: bool,
    message_box: Option<String>,
    window: Option<window::Id>,
}

impl Default for App {
    fn default() -> Self {
        let pipeline = "videotestsrc pattern=ball ! videoconvert ! capsfilter".to_owned();

        let mut player = Player::new(Settings::default()).unwrap();
        player.set_video_sink(
            gst::ElementFactory::make("autovideosink")
                .name("video")
                .build()
                .unwrap(),
        );
        player.set_pipeline_string(pipeline.clone());

        App {
            player,
            pipeline,
            playing: false,
            paused: false,
            stopped: true,
            message_box: None,
            window: None,
        }
    }
}

impl App {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PipelineEdited(pipeline) => {
                self.pipeline = pipeline;
                self.player.set_pipeline_string(self.pipeline.clone());
            }
            Message::Play => {
                self.player.play();
            }
            Message::Pause => self.player.pause(),
            Message::Stop => self.player.stop(),
            Message::PlayLater => self.player.schedule_play(Duration::from_secs(2)),
            Message::StopLater => self.player.schedule_stop(Duration::from_secs(5)),
            Message::ToggleFullscreen => {
                if let Some(window) = self.window {
                    return self.player.toggle_fullscreen(window);
                }
            }
            Message::PlayingChanged(playing) => self.playing = playing,
            Message::PausedChanged(paused) => self.paused = paused,
            Message::StoppedChanged(stopped) => self.stopped = stopped,
            Message::MessageBox(text) => self.message_box = Some(text),
            Message::DismissMessage => self.message_box = None,
            Message::EndOfStream => println!("end of stream"),
            Message::WindowSeen(id) => self.window = Some(id),
        }
        Task::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::event::listen_with(|event, _status, id| match event {
            iced::Event::Window(window::Event::Opened { .. })
            | iced::Event::Window(window::Event::Focused)
            | iced::Event::Mouse(mouse::Event::ButtonPressed(_)) => Some(Message::WindowSeen(id)),
            _ => None,
        })
    }

    fn view(&self) -> Element<'_, Message> {
        let state = if self.playing {
            "playing"
        } else if self.paused {
            "paused"
        } else if self.stopped {
            "stopped"
        } else {
            "changing"
        };

        let mut column = Column::new().push(
            Container::new(
                PlayerView::new(&self.player)
                    .on_playing_changed(Message::PlayingChanged)
                    .on_paused_changed(Message::PausedChanged)
                    .on_stopped_changed(Message::StoppedChanged)
                    .on_message_box(Message::MessageBox)
                    .on_end_of_stream(Message::EndOfStream),
            )
            .width(iced::Length::Fill)
            .height(iced::Length::Fill),
        );

        if let Some(text) = &self.message_box {
            column = column.push(
                Row::new()
                    .spacing(5)
                    .padding(10)
                    .push(Text::new(text.clone()).width(iced::Length::Fill))
                    .push(Button::new(Text::new("OK")).on_press(Message::DismissMessage)),
            );
        }

        column
            .push(
                Container::new(
                    TextInput::new("pipeline description", &self.pipeline)
                        .on_input(Message::PipelineEdited),
                )
                .padding(iced::Padding::new(5.0).left(10.0).right(10.0)),
            )
            .push(
                Row::new()
                    .spacing(5)
                    .align_y(iced::alignment::Vertical::Center)
                    .padding(iced::Padding::new(10.0).top(0.0))
                    .push(Button::new(Text::new("Play")).on_press(Message::Play))
                    .push(Button::new(Text::new("Pause")).on_press(Message::Pause))
                    .push(Button::new(Text::new("Stop")).on_press(Message::Stop))
                    .push(Button::new(Text::new("Play in 2s")).on_press(Message::PlayLater))
                    .push(Button::new(Text::new("Stop in 5s")).on_press(Message::StopLater))
                    .push(
                        Button::new(Text::new("Fullscreen"))
                            .on_press(Message::ToggleFullscreen),
                    )
                    .push(
                        Text::new(state)
                            .width(iced::Length::Fill)
                            .align_x(iced::alignment::Horizontal::Right),
                    ),
            )
            .into()
    }
}
