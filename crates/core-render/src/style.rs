//! Cell styling: syntax category plus attribute flags, and the color theme.

use bitflags::bitflags;
use core_syntax::Category;
use crossterm::style::Color;

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001; // selection and status row
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Style {
    pub category: Category,
    pub flags: CellFlags,
}

impl Style {
    pub const PLAIN: Style = Style {
        category: Category::Default,
        flags: CellFlags::empty(),
    };

    pub const REVERSED: Style = Style {
        category: Category::Default,
        flags: CellFlags::REVERSE,
    };

    pub fn with_category(category: Category) -> Self {
        Self {
            category,
            flags: CellFlags::empty(),
        }
    }

    pub fn reversed(mut self) -> Self {
        self.flags |= CellFlags::REVERSE;
        self
    }
}

/// Foreground color for a category; `None` keeps the terminal default.
pub fn foreground(category: Category) -> Option<Color> {
    match category {
        Category::Default => None,
        Category::Keyword => Some(Color::Yellow),
        Category::Type => Some(Color::Green),
        Category::Preprocessor => Some(Color::Magenta),
        Category::Comment => Some(Color::DarkGrey),
        Category::String => Some(Color::Cyan),
        Category::Number => Some(Color::Red),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_keeps_category() {
        let s = Style::with_category(Category::String).reversed();
        assert_eq!(s.category, Category::String);
        assert!(s.flags.contains(CellFlags::REVERSE));
        assert_eq!(foreground(Category::Default), None);
    }
}
