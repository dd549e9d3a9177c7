//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! `ChatRenderer` combines `termimad` for prose and `syntect` for fenced
//! code. The skin and highlighting theme follow the light/dark preference.

use console::style;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::crossterm::style::Color;
use termimad::MadSkin;

use nexus_types::chat::{Citation, Message, Role};
use nexus_types::preferences::Theme;

pub struct ChatRenderer {
    theme: Theme,
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            skin: Self::skin_for(theme),
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch skins in place.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.skin = Self::skin_for(theme);
    }

    fn skin_for(theme: Theme) -> MadSkin {
        let (mut skin, accent) = match theme {
            Theme::Dark => (MadSkin::default_dark(), Color::Cyan),
            Theme::Light => (MadSkin::default_light(), Color::DarkBlue),
        };
        skin.bold.set_fg(accent);
        skin.headers[0].set_fg(accent);
        skin.headers[1].set_fg(accent);
        skin.inline_code.set_fg(match theme {
            Theme::Dark => Color::Yellow,
            Theme::Light => Color::DarkMagenta,
        });
        skin
    }

    fn code_theme_name(&self) -> &'static str {
        match self.theme {
            Theme::Dark => "base16-ocean.dark",
            Theme::Light => "InspiredGitHub",
        }
    }

    /// Render a complete markdown reply.
    ///
    /// Code fences with a language tag are highlighted via syntect; everything
    /// else is rendered through termimad.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") && !in_code_block {
                in_code_block = true;
                code_lang = line.trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if line.starts_with("```") && in_code_block {
                in_code_block = false;
                output.push_str(&self.highlight_code(&code_buf, &code_lang));
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                output.push_str(&self.skin.term_text(line).to_string());
            }
        }

        // Unclosed fence
        if in_code_block && !code_buf.is_empty() {
            output.push_str(&self.highlight_code(&code_buf, &code_lang));
        }

        output
    }

    /// Print one log entry with its speaker label.
    pub fn print_message(&self, message: &Message, model_label: &str) {
        match message.role {
            Role::User => {
                println!("  {} {}", style("You >").green().bold(), message.text);
            }
            Role::Model => {
                println!("  {}", style(model_label).cyan().bold());
                println!("  {}", self.render_final(&message.text).trim());
                self.print_sources(&message.sources);
            }
        }
        println!();
    }

    /// Numbered list of web sources under a reply.
    pub fn print_sources(&self, sources: &[Citation]) {
        if sources.is_empty() {
            return;
        }
        println!();
        println!("  {}", style("Sources").dim().bold());
        for (i, source) in sources.iter().enumerate() {
            println!(
                "  {} {} {}",
                style(format!("[{}]", i + 1)).dim(),
                source.title,
                style(&source.uri).dim().underlined()
            );
        }
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let mut output = String::new();
        output.push_str(&format!("  {}\n", style(format!("--- {lang} ---")).dim()));

        let Some(theme) = self.theme_set.themes.get(self.code_theme_name()) else {
            for line in code.lines() {
                output.push_str(&format!("  {line}\n"));
            }
            return output;
        };
        let mut h = HighlightLines::new(syntax, theme);

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}
