use std::time::Duration;

/// Caps forced onto the element feeding the video sink unless configured otherwise.
pub const DEFAULT_CAPS: &str = "video/x-raw, format=I420";

/// Configuration for a [`Player`](crate::Player).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub(crate) caps: String,
    pub(crate) sync: bool,
    pub(crate) poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            caps: DEFAULT_CAPS.to_owned(),
            sync: false,
            poll_interval: Duration::from_millis(16),
        }
    }
}

impl Settings {
    /// Sets the caps applied to the element owning the pipeline's unlinked source pad.
    pub fn caps(self, caps: impl Into<String>) -> Self {
        Settings {
            caps: caps.into(),
            ..self
        }
    }

    /// Sets the `sync` property of the video sink.
    /// Live sources usually want this off so frames are shown as soon as they arrive.
    pub fn sync(self, sync: bool) -> Self {
        Settings { sync, ..self }
    }

    /// Sets how often the bus is drained while a pipeline or timer is live.
    pub fn poll_interval(self, poll_interval: Duration) -> Self {
        Settings {
            poll_interval,
            ..self
        }
    }

    pub fn caps_str(&self) -> &str {
        &self.caps
    }

    pub fn sink_sync(&self) -> bool {
        self.sync
    }

    pub fn interval(&self) -> Duration {
        self.poll_interval
    }
}

/// Launch description decoding `uri` into raw video, ending in an unlinked `capsfilter`.
pub fn uri_pipeline(uri: &url::Url) -> String {
    format!(
        "uridecodebin uri=\"{}\" ! videoconvert ! videoscale ! capsfilter",
        uri.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.caps_str(), "video/x-raw, format=I420");
        assert!(!settings.sink_sync());
        assert_eq!(settings.interval(), Duration::from_millis(16));
    }

    #[test]
    fn builder_overrides() {
        let settings = Settings::default()
            .caps("video/x-raw, format=NV12")
            .sync(true)
            .poll_interval(Duration::from_millis(40));
        assert_eq!(settings.caps_str(), "video/x-raw, format=NV12");
        assert!(settings.sink_sync());
        assert_eq!(settings.interval(), Duration::from_millis(40));
    }

    #[test]
    fn uri_pipeline_ends_in_capsfilter() {
        let uri = url::Url::parse("file:///tmp/clip.mp4").unwrap();
        let launch = uri_pipeline(&uri);
        assert!(launch.starts_with("uridecodebin uri=\"file:///tmp/clip.mp4\""));
        assert!(launch.ends_with("! capsfilter"));
    }
}
