// src/persona/mod.rs
// Personality text for the assistant. Only the default persona ships;
// the enum leaves room for command-based switching later.

pub mod default;

pub use default::{APOLOGY_LINE, DEFAULT_PERSONA_PROMPT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaOverlay {
    Default,
}

impl PersonaOverlay {
    /// System prompt for this persona overlay.
    pub fn prompt(&self) -> &'static str {
        match self {
            PersonaOverlay::Default => DEFAULT_PERSONA_PROMPT,
        }
    }

    /// Neutral, in-character line sent when an exchange fails outright.
    pub fn apology(&self) -> &'static str {
        match self {
            PersonaOverlay::Default => APOLOGY_LINE,
        }
    }
}

impl std::fmt::Display for PersonaOverlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PersonaOverlay::Default => "default",
            }
        )
    }
}

impl std::str::FromStr for PersonaOverlay {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(PersonaOverlay::Default),
            _ => Err(()),
        }
    }
}
