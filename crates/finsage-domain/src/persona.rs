//! Personas select the tone and depth of generated guidance.

use serde::{Deserialize, Serialize};

/// Who the assistant is talking to.
///
/// Each persona maps to a fixed tone clause and a fixed depth clause used
/// during prompt assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Student,
    Professional,
}

impl Persona {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "student" => Some(Self::Student),
            "professional" | "pro" => Some(Self::Professional),
            _ => None,
        }
    }

    /// Tone clause injected into the prompt preamble.
    pub fn tone(&self) -> &'static str {
        match self {
            Self::Student => {
                "Clear, friendly, simple. Define financial terms in plain English and give short examples."
            }
            Self::Professional => {
                "Concise, professional, data-forward. Use precise terminology and include numeric examples where helpful."
            }
        }
    }

    /// Depth clause: how much structure the answer should carry.
    pub fn depth(&self) -> &'static str {
        match self {
            Self::Student => {
                "Provide practical steps a student can follow and a short sample monthly budget table."
            }
            Self::Professional => {
                "Provide trade-offs and a recommended allocation by percentage if relevant."
            }
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::Student
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Professional => write!(f, "professional"),
        }
    }
}
