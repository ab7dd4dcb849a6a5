//! Color helpers for the build report. One function per palette entry so
//! report lines read as `bright_yellow(number)` rather than style chains.

use console::style;

pub fn bright_yellow(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().yellow()
}

pub fn bright_green(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().green()
}

pub fn bright_red(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().red()
}

pub fn bright_blue(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).bright().blue()
}

pub fn green(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).green()
}

pub fn red(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).red()
}

pub fn cyan(text: impl std::fmt::Display) -> console::StyledObject<String> {
    style(text.to_string()).cyan()
}
