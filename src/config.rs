//! Settings document parsing.
//!
//! The settings file is XML rooted at `<MSAMultiVideoPlayer>`. Values are read
//! into raw strings first and then coerced explicitly, so a typo such as
//! `autoplay="yes please"` is reported instead of silently becoming `true`.

use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use serde::Deserialize;
use thiserror::Error;

pub const ROOT_TAG: &str = "MSAMultiVideoPlayer";
pub const VIDEOS_TAG: &str = "videos";

const DEFAULT_TRIGGER: char = 'p';
const DEFAULT_FPS: u32 = 60;
const MAX_FPS: u32 = 240;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not load {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Unreadable settings document: {0}")]
    De(#[from] quick_xml::DeError),

    #[error("settings.xml missing '{0}' tag")]
    MissingTag(&'static str),
}

/// A single field of a `<video>` record that could not be coerced.
#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("'{field}' is not a flag: {value:?}")]
    Flag { field: &'static str, value: String },

    #[error("'{field}' is not a finite number: {value:?}")]
    Number { field: &'static str, value: String },
}

/// Display rectangle. A zero width or height means "use the clip's native size".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `0xRRGGBB`, `#RRGGBB` or bare `RRGGBB`.
    pub fn parse_hex(raw: &str) -> Option<Rgb> {
        let raw = raw.trim();
        let hex = raw
            .strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .or_else(|| raw.strip_prefix('#'))
            .unwrap_or(raw);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some(Rgb {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub background: Rgb,
    pub vsync: bool,
    pub fps: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            background: Rgb::default(),
            vsync: true,
            fps: DEFAULT_FPS,
        }
    }
}

/// One `<video>` element after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub file: PathBuf,
    pub autoplay: bool,
    pub looping: bool,
    pub trigger: char,
    pub volume: f32,
    pub rect: Rect,
}

impl Default for VideoRecord {
    fn default() -> Self {
        VideoRecord {
            file: PathBuf::new(),
            autoplay: true,
            looping: true,
            trigger: DEFAULT_TRIGGER,
            volume: 1.0,
            rect: Rect::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub display: DisplaySettings,
    pub videos: Vec<VideoRecord>,
}

impl Settings {
    /// Read and parse a settings file.
    pub fn load(path: &Path) -> Result<Settings, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Settings::parse(&content)
    }

    /// Parse a settings document. Missing top-level tags are fatal; bad
    /// individual records are logged and skipped.
    pub fn parse(xml: &str) -> Result<Settings, ConfigError> {
        if root_tag(xml)?.as_deref() != Some(ROOT_TAG) {
            return Err(ConfigError::MissingTag(ROOT_TAG));
        }

        let document: DocumentXml = quick_xml::de::from_str(xml)?;
        let videos = document
            .videos
            .into_iter()
            .next()
            .ok_or(ConfigError::MissingTag(VIDEOS_TAG))?;
        let display = document
            .settings
            .into_iter()
            .next()
            .unwrap_or_default()
            .into_display();

        let mut records = Vec::with_capacity(videos.items.len());
        for (i, raw) in videos.items.into_iter().enumerate() {
            match raw.into_record() {
                Ok(record) => records.push(record),
                Err(e) => log::error!("Skipping video #{}: {}", i, e),
            }
        }

        log::info!(
            "Settings parsed: {} video(s), bgcolor={:?}, vsync={}, fps={}",
            records.len(),
            display.background,
            display.vsync,
            display.fps
        );

        Ok(Settings {
            display,
            videos: records,
        })
    }
}

/// Name of the document's root element, if any.
fn root_tag(xml: &str) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = quick_xml::Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(Some(String::from_utf8_lossy(e.name().as_ref()).into_owned()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

// Raw document shape. Every value is accepted either as an attribute or as a
// child element holding text. Repeated elements are read from the first
// occurrence; unrelated elements in between are ignored.

#[derive(Debug, Deserialize)]
struct DocumentXml {
    #[serde(default)]
    settings: Vec<SettingsXml>,
    #[serde(default)]
    videos: Vec<VideosXml>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsXml {
    #[serde(rename = "@bgcolor", default)]
    bgcolor_attr: Option<String>,
    #[serde(default)]
    bgcolor: Vec<String>,
    #[serde(rename = "@vsync", default)]
    vsync_attr: Option<String>,
    #[serde(default)]
    vsync: Vec<String>,
    #[serde(rename = "@fps", default)]
    fps_attr: Option<String>,
    #[serde(default)]
    fps: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VideosXml {
    #[serde(rename = "video", default)]
    items: Vec<VideoXml>,
}

#[derive(Debug, Default, Deserialize)]
struct VideoXml {
    #[serde(rename = "@file", default)]
    file_attr: Option<String>,
    #[serde(default)]
    file: Vec<String>,
    #[serde(rename = "@autoplay", default)]
    autoplay_attr: Option<String>,
    #[serde(default)]
    autoplay: Vec<String>,
    #[serde(rename = "@loop", default)]
    loop_attr: Option<String>,
    #[serde(rename = "loop", default)]
    looping: Vec<String>,
    #[serde(rename = "@trigger", default)]
    trigger_attr: Option<String>,
    #[serde(default)]
    trigger: Vec<String>,
    #[serde(rename = "@volume", default)]
    volume_attr: Option<String>,
    #[serde(default)]
    volume: Vec<String>,
    #[serde(default)]
    position: Vec<PositionXml>,
}

#[derive(Debug, Default, Deserialize)]
struct PositionXml {
    #[serde(rename = "@left", default)]
    left: Option<String>,
    #[serde(rename = "@top", default)]
    top: Option<String>,
    #[serde(rename = "@width", default)]
    width: Option<String>,
    #[serde(rename = "@height", default)]
    height: Option<String>,
}

impl SettingsXml {
    fn into_display(self) -> DisplaySettings {
        let defaults = DisplaySettings::default();

        let background = match first(self.bgcolor_attr, self.bgcolor) {
            Some(raw) => Rgb::parse_hex(&raw).unwrap_or_else(|| {
                log::warn!("Invalid bgcolor {:?}, using black", raw);
                defaults.background
            }),
            None => defaults.background,
        };

        let vsync = match first(self.vsync_attr, self.vsync) {
            Some(raw) => parse_flag("vsync", &raw).unwrap_or_else(|e| {
                log::warn!("{}, using {}", e, defaults.vsync);
                defaults.vsync
            }),
            None => defaults.vsync,
        };

        let fps = match first(self.fps_attr, self.fps) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(fps) if (1..=MAX_FPS).contains(&fps) => fps,
                Ok(fps) => {
                    let clamped = fps.clamp(1, MAX_FPS);
                    log::warn!("fps {} out of range, clamped to {}", fps, clamped);
                    clamped
                }
                Err(_) => {
                    log::warn!("Invalid fps {:?}, using {}", raw, defaults.fps);
                    defaults.fps
                }
            },
            None => defaults.fps,
        };

        DisplaySettings {
            background,
            vsync,
            fps,
        }
    }
}

impl VideoXml {
    fn into_record(self) -> Result<VideoRecord, RecordError> {
        let defaults = VideoRecord::default();

        let file = first(self.file_attr, self.file)
            .map(|f| PathBuf::from(f.trim()))
            .unwrap_or_default();

        let autoplay = match first(self.autoplay_attr, self.autoplay) {
            Some(raw) => parse_flag("autoplay", &raw)?,
            None => defaults.autoplay,
        };

        let looping = match first(self.loop_attr, self.looping) {
            Some(raw) => parse_flag("loop", &raw)?,
            None => defaults.looping,
        };

        let trigger = match first(self.trigger_attr, self.trigger) {
            Some(raw) => parse_trigger(&raw),
            None => defaults.trigger,
        };

        let volume = match first(self.volume_attr, self.volume) {
            Some(raw) => {
                let volume = parse_number("volume", &raw)?;
                if !(0.0..=1.0).contains(&volume) {
                    let clamped = volume.clamp(0.0, 1.0);
                    log::warn!("volume {} out of range, clamped to {}", volume, clamped);
                    clamped
                } else {
                    volume
                }
            }
            None => defaults.volume,
        };

        let position = self.position.into_iter().next().unwrap_or_default();
        let rect = Rect::new(
            optional_number("left", position.left)?,
            optional_number("top", position.top)?,
            non_negative("width", optional_number("width", position.width)?),
            non_negative("height", optional_number("height", position.height)?),
        );

        Ok(VideoRecord {
            file,
            autoplay,
            looping,
            trigger,
            volume,
            rect,
        })
    }
}

/// Attribute value if present, otherwise the first child element's text.
fn first(attr: Option<String>, elements: Vec<String>) -> Option<String> {
    attr.or_else(|| elements.into_iter().next())
}

fn parse_flag(field: &'static str, raw: &str) -> Result<bool, RecordError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(RecordError::Flag {
            field,
            value: raw.to_string(),
        }),
    }
}

fn parse_number(field: &'static str, raw: &str) -> Result<f32, RecordError> {
    match raw.trim().parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RecordError::Number {
            field,
            value: raw.to_string(),
        }),
    }
}

fn optional_number(field: &'static str, raw: Option<String>) -> Result<f32, RecordError> {
    raw.map_or(Ok(0.0), |raw| parse_number(field, &raw))
}

fn non_negative(field: &str, value: f32) -> f32 {
    if value < 0.0 {
        log::warn!("{} {} is negative, using native size", field, value);
        0.0
    } else {
        value
    }
}

/// `SPACE` is the space bar, anything else binds its first character.
fn parse_trigger(raw: &str) -> char {
    if raw == "SPACE" {
        return ' ';
    }
    match raw.chars().next() {
        Some(c) => c,
        None => {
            log::warn!("Empty trigger, falling back to '{}'", DEFAULT_TRIGGER);
            DEFAULT_TRIGGER
        }
    }
}
