//! Category accents
//!
//! Each category tab has its own accent colour. The accent is handed to the listing renderer
//! as a plain value; nothing in the cart or catalog knows about it.

use shopfront::catalog::Category;
use tabled::settings::Color;

const RESET: &str = "\x1b[0m";

/// Accent colour of a category tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Accent {
    ansi: &'static str,
}

impl Accent {
    /// Accent used for `category`.
    pub(crate) fn for_category(category: Category) -> Self {
        match category {
            Category::Grocery => Self { ansi: "\x1b[1;32m" },
            Category::Electronics => Self { ansi: "\x1b[1;34m" },
            Category::Health => Self { ansi: "\x1b[1;35m" },
        }
    }

    /// Table colour for headings.
    pub(crate) fn color(self) -> Color {
        Color::new(self.ansi, RESET)
    }

    /// Wrap `text` in the accent.
    pub(crate) fn paint(self, text: &str) -> String {
        format!("{}{text}{RESET}", self.ansi)
    }
}
