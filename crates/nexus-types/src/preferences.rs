//! User preferences: display theme and text-to-speech voice.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Display theme for the chat view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("invalid theme: '{other}' (expected light or dark)")),
        }
    }
}

/// Prebuilt speech-synthesis voices offered for playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Voice {
    #[default]
    Kore,
    Puck,
    Zephyr,
    Charon,
}

impl Voice {
    pub const ALL: [Voice; 4] = [Voice::Kore, Voice::Puck, Voice::Zephyr, Voice::Charon];

    /// Voice identifier understood by the speech API.
    pub fn name(self) -> &'static str {
        match self {
            Voice::Kore => "Kore",
            Voice::Puck => "Puck",
            Voice::Zephyr => "Zephyr",
            Voice::Charon => "Charon",
        }
    }

    /// Short description of the voice's character.
    pub fn tone(self) -> &'static str {
        match self {
            Voice::Kore => "Firm",
            Voice::Puck => "Upbeat",
            Voice::Zephyr => "Bright",
            Voice::Charon => "Informative",
        }
    }

    /// Display label, e.g. "Kore (Firm)".
    pub fn label(self) -> String {
        format!("{} ({})", self.name(), self.tone())
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Voice::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Voice::ALL.iter().map(|v| v.name()).collect();
                format!("invalid voice: '{wanted}' (expected one of {})", names.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(" Light ".parse::<Theme>().unwrap(), Theme::Light);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_voice_parse_case_insensitive() {
        assert_eq!("zephyr".parse::<Voice>().unwrap(), Voice::Zephyr);
        assert_eq!("CHARON".parse::<Voice>().unwrap(), Voice::Charon);
        let err = "Aoede".parse::<Voice>().unwrap_err();
        assert!(err.contains("Kore, Puck, Zephyr, Charon"));
    }

    #[test]
    fn test_voice_label() {
        assert_eq!(Voice::Puck.label(), "Puck (Upbeat)");
        assert_eq!(Voice::default(), Voice::Kore);
    }
}
