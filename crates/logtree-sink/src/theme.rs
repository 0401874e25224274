//! Console colour themes for level labels.

use std::collections::HashMap;

/// 24-bit colour.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Background and foreground colour pair applied to a level label.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Theme {
    /// Background colour.
    pub bg: Rgb,
    /// Foreground colour.
    pub fg: Rgb,
}

impl Theme {
    /// Creates a theme from background and foreground colours.
    #[must_use]
    pub const fn new(bg: Rgb, fg: Rgb) -> Self {
        Self { bg, fg }
    }
}

const BLACK: Rgb = Rgb(0, 0, 0);

const DEFAULT_PALETTE: [(&str, Theme); 8] = [
    ("NONE", Theme::new(Rgb(255, 255, 255), BLACK)),
    ("TRACE", Theme::new(Rgb(255, 255, 200), BLACK)),
    ("DEBUG", Theme::new(Rgb(200, 255, 200), BLACK)),
    ("LOG", Theme::new(Rgb(230, 230, 230), BLACK)),
    ("INFO", Theme::new(Rgb(200, 255, 255), BLACK)),
    ("WARN", Theme::new(Rgb(255, 180, 0), BLACK)),
    ("ERROR", Theme::new(Rgb(255, 130, 130), BLACK)),
    ("FATAL", Theme::new(Rgb(255, 0, 0), Rgb(255, 255, 255))),
];

/// Mapping from upper-case level name to its [`Theme`].
///
/// Levels without an entry render plainly. [`ThemeTable::default`] carries
/// the palette for the baseline ladder; [`ThemeTable::empty`] disables colour
/// entirely.
///
/// ```
/// use logtree_sink::ThemeTable;
///
/// let themes = ThemeTable::default();
/// assert!(themes.get("warn").is_some());
/// assert!(themes.get("AUDIT").is_none());
/// assert!(ThemeTable::empty().is_empty());
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThemeTable {
    themes: HashMap<String, Theme>,
}

impl ThemeTable {
    /// Creates a table without any theme.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            themes: HashMap::new(),
        }
    }

    /// Registers or replaces the theme for `level`.
    pub fn insert(&mut self, level: &str, theme: Theme) -> Option<Theme> {
        self.themes.insert(level.to_ascii_uppercase(), theme)
    }

    /// Returns the theme registered for `level`, ignoring case.
    #[must_use]
    pub fn get(&self, level: &str) -> Option<&Theme> {
        self.themes.get(&level.to_ascii_uppercase())
    }

    /// Reports whether no theme is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    /// Decorates `text` with the theme of `level`, or returns it unchanged.
    #[must_use]
    pub fn apply(&self, level: &str, text: &str) -> String {
        match self.get(level) {
            Some(theme) => colorize(text, theme),
            None => text.to_owned(),
        }
    }
}

impl Default for ThemeTable {
    fn default() -> Self {
        let themes = DEFAULT_PALETTE
            .iter()
            .map(|(name, theme)| ((*name).to_owned(), *theme))
            .collect();
        Self { themes }
    }
}

/// Wraps `text` in a 24-bit background/foreground SGR sequence and resets
/// the terminal attributes afterwards.
///
/// ```
/// use logtree_sink::{Rgb, Theme, colorize};
///
/// let theme = Theme::new(Rgb(255, 0, 0), Rgb(255, 255, 255));
/// let painted = colorize("[FATAL]", &theme);
/// assert!(painted.starts_with("\x1b[48;2;255;0;0;38;2;255;255;255m"));
/// assert!(painted.contains("[FATAL]"));
/// ```
#[must_use]
pub fn colorize(text: &str, theme: &Theme) -> String {
    let Rgb(br, bg, bb) = theme.bg;
    let Rgb(fr, fg, fb) = theme.fg;
    format!("\x1b[48;2;{br};{bg};{bb};38;2;{fr};{fg};{fb}m{text}\x1b[0m")
}
