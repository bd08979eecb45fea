//! Domain types for representing a slide deck.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An ordered sequence of slides, rendered one output slide per entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Title of the first slide, used as the document title.
    pub fn title(&self) -> Option<&str> {
        self.slides.first().map(|s| s.title.as_str())
    }

    /// Total number of bullets across all slides.
    pub fn bullet_count(&self) -> usize {
        self.slides.iter().map(|s| s.bullets.len()).sum()
    }
}

impl From<Vec<Slide>> for Deck {
    fn from(slides: Vec<Slide>) -> Self {
        Self { slides }
    }
}

/// One page of the deck: a title and an ordered bullet list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    pub title: String,
    pub bullets: Vec<String>,
}

impl Slide {
    /// Create a slide with the given title and no bullets.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            bullets: Vec::new(),
        }
    }

    /// Builder-style bullet addition.
    pub fn with_bullet(mut self, text: impl Into<String>) -> Self {
        self.bullets.push(text.into());
        self
    }

    /// Append a bullet.
    pub fn add_bullet(&mut self, text: impl Into<String>) {
        self.bullets.push(text.into());
    }
}

/// Where the structured slide description comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideSource {
    /// Split the prompt locally on line-prefix heuristics.
    #[default]
    Heuristic,
    /// Ask the remote language model for slide XML.
    Model,
}

impl SlideSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heuristic => "heuristic",
            Self::Model => "model",
        }
    }
}

impl FromStr for SlideSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Ok(Self::Heuristic),
            "model" => Ok(Self::Model),
            other => Err(Error::UnknownSource(other.to_string())),
        }
    }
}

impl fmt::Display for SlideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A drafted deck together with the slide XML that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub source: SlideSource,
    pub deck: Deck,
    pub xml: String,
}
