use inksac::prelude::*;

use crate::core::commands::lookup;

#[derive(Debug, Clone, Copy)]
pub struct SyntaxHighlighter {
    color_support: ColorSupport,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxHighlighter {
    pub fn new() -> Self {
        let support = check_color_support().unwrap_or(ColorSupport::NoColor);
        Self {
            color_support: support,
        }
    }

    /// A highlighter that never emits escape codes.
    pub fn plain() -> Self {
        Self {
            color_support: ColorSupport::NoColor,
        }
    }

    fn enabled(&self) -> bool {
        !matches!(self.color_support, ColorSupport::NoColor)
    }

    /// Colour the command word by whether it names a builtin, and flags
    /// after it.
    pub fn highlight_command(&self, input: &str) -> String {
        if !self.enabled() {
            return input.to_string();
        }

        let mut parts: Vec<String> = input.split_whitespace().map(String::from).collect();
        if parts.is_empty() {
            return input.to_string();
        }

        let command_color = if lookup(&parts[0]).is_some() {
            Color::Cyan
        } else {
            Color::Red
        };
        let command_style = Style::builder().foreground(command_color).bold().build();
        parts[0] = parts[0].clone().style(command_style).to_string();

        let flag_style = Style::builder().foreground(Color::Yellow).build();
        for part in parts.iter_mut().skip(1) {
            if part.starts_with('-') {
                *part = part.clone().style(flag_style).to_string();
            }
        }

        let mut highlighted = parts.join(" ");
        if input.ends_with(char::is_whitespace) {
            highlighted.push(' ');
        }
        highlighted
    }

    pub fn highlight_error(&self, error: &str) -> String {
        if !self.enabled() {
            return error.to_string();
        }

        let error_style = Style::builder().foreground(Color::Red).bold().build();
        error.style(error_style).to_string()
    }

    pub fn highlight_notice(&self, message: &str) -> String {
        if !self.enabled() {
            return message.to_string();
        }

        let notice_style = Style::builder().foreground(Color::Green).build();
        message.style(notice_style).to_string()
    }
}
