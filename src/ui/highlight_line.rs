use std::path::Path;

use log::warn;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
};
use syntect::{
    easy::HighlightLines,
    highlighting::{FontStyle, Style as SyntectStyle, Theme, ThemeSet},
    parsing::{SyntaxReference, SyntaxSet},
};

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Syntax definitions plus the one theme the session renders with.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme: Theme,
    theme_name: String,
}

impl Highlighter {
    /// Unknown theme names fall back to [`DEFAULT_THEME`].
    pub fn new(theme_name: &str) -> Self {
        let mut themes = ThemeSet::load_defaults().themes;
        let (theme_name, theme) = match themes.remove(theme_name) {
            Some(theme) => (theme_name, theme),
            None => {
                warn!("unknown theme {theme_name:?}, using {DEFAULT_THEME}");
                (DEFAULT_THEME, themes.remove(DEFAULT_THEME).unwrap_or_default())
            }
        };

        Self {
            syntax_set: SyntaxSet::load_defaults_nonewlines(),
            theme,
            theme_name: theme_name.to_string(),
        }
    }

    pub fn theme_name(&self) -> &str {
        &self.theme_name
    }

    pub fn syntax_for_file(&self, filename: &str) -> Option<&SyntaxReference> {
        let extension = Path::new(filename).extension()?.to_str()?;
        let extension = match extension {
            // No TypeScript grammar ships by default.
            "ts" | "tsx" | "jsx" | "mjs" | "cjs" => "js",
            "cc" | "cxx" | "hpp" => "cpp",
            other => other,
        };
        self.syntax_set.find_syntax_by_extension(extension)
    }

    /// Foreground-only spans for one line; the caller owns backgrounds.
    pub fn highlight(&self, content: &str, syntax: Option<&SyntaxReference>) -> Vec<Span<'static>> {
        let Some(syntax) = syntax else {
            return vec![Span::raw(content.to_string())];
        };

        let mut lines = HighlightLines::new(syntax, &self.theme);
        match lines.highlight_line(content, &self.syntax_set) {
            Ok(ranges) => ranges
                .into_iter()
                .map(|(style, text)| Span::styled(text.to_string(), syntect_style_to_ratatui(style)))
                .collect(),
            Err(err) => {
                warn!("highlighting failed: {err}");
                vec![Span::raw(content.to_string())]
            }
        }
    }
}

fn syntect_style_to_ratatui(syntect_style: SyntectStyle) -> Style {
    let fg = syntect_style.foreground;
    let mut style = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));

    for (font, modifier) in [
        (FontStyle::BOLD, Modifier::BOLD),
        (FontStyle::ITALIC, Modifier::ITALIC),
        (FontStyle::UNDERLINE, Modifier::UNDERLINED),
    ] {
        if syntect_style.font_style.contains(font) {
            style = style.add_modifier(modifier);
        }
    }

    style
}
