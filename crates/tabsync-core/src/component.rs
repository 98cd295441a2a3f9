//! Chat components and their host-native renderings
//!
//! [`TabComponent`] is the rich text value higher layers hand to the
//! tablist. Backends never see it directly: a [`ComponentRenderer`] turns it
//! into the host's own text type, which the adapters then carry around as a
//! [`TextHandle`] so that later writes can be recognised by identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::player::ClientVersion;

/// Legacy formatting escape character
pub const LEGACY_ESCAPE: char = '§';

/// The sixteen legacy chat colors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChatColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl ChatColor {
    /// Legacy format code following the escape character
    pub fn code(self) -> char {
        match self {
            ChatColor::Black => '0',
            ChatColor::DarkBlue => '1',
            ChatColor::DarkGreen => '2',
            ChatColor::DarkAqua => '3',
            ChatColor::DarkRed => '4',
            ChatColor::DarkPurple => '5',
            ChatColor::Gold => '6',
            ChatColor::Gray => '7',
            ChatColor::DarkGray => '8',
            ChatColor::Blue => '9',
            ChatColor::Green => 'a',
            ChatColor::Aqua => 'b',
            ChatColor::Red => 'c',
            ChatColor::LightPurple => 'd',
            ChatColor::Yellow => 'e',
            ChatColor::White => 'f',
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A node of a chat component tree, serialized in the JSON chat format
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TabComponent {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ChatColor>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<TabComponent>,
}

impl TabComponent {
    /// Plain text component without styling
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// The empty component, used for "no header" / "no footer"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: ChatColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Append a child component
    pub fn append(mut self, child: TabComponent) -> Self {
        self.extra.push(child);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.extra.iter().all(TabComponent::is_empty)
    }

    /// Flatten into legacy text with in-band escape codes.
    ///
    /// Each node emits its own color, then bold/italic codes, then its text,
    /// then its children in order.
    pub fn to_legacy_text(&self) -> String {
        let mut out = String::new();
        self.write_legacy(&mut out);
        out
    }

    fn write_legacy(&self, out: &mut String) {
        if let Some(color) = self.color {
            out.push(LEGACY_ESCAPE);
            out.push(color.code());
        }
        if self.bold {
            out.push(LEGACY_ESCAPE);
            out.push('l');
        }
        if self.italic {
            out.push(LEGACY_ESCAPE);
            out.push('o');
        }
        out.push_str(&self.text);
        for child in &self.extra {
            child.write_legacy(out);
        }
    }

    /// Text content without any formatting
    pub fn to_plain_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.extra {
            out.push_str(&child.to_plain_text());
        }
        out
    }

    /// Serialize into the JSON chat format
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

impl fmt::Display for TabComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_plain_text())
    }
}

impl From<&str> for TabComponent {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

/// Shared handle to a host-native text object.
///
/// Two handles are the same text only if they come from the same write;
/// equal content rendered twice yields two different handles.
#[derive(Debug)]
pub struct TextHandle<T>(Arc<T>);

impl<T> TextHandle<T> {
    pub fn new(text: T) -> Self {
        Self(Arc::new(text))
    }

    /// Identity comparison
    pub fn same_as(&self, other: &TextHandle<T>) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for TextHandle<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for TextHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

/// Identity comparison over optional display names; two absent names match
pub fn same_text<T>(a: Option<&TextHandle<T>>, b: Option<&TextHandle<T>>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.same_as(b),
        _ => false,
    }
}

/// Turns components into a backend's native text form
pub trait ComponentRenderer: Send + Sync {
    /// Host-native text type
    type Output: Send + Sync + 'static;

    /// Render for a client of the given version; `None` means the rendering
    /// is unusable and the caller falls back to no display name
    fn render(&self, component: &TabComponent, version: ClientVersion) -> Option<Self::Output>;
}

/// Renderer for hosts whose text API takes flat legacy strings
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyTextRenderer;

impl ComponentRenderer for LegacyTextRenderer {
    type Output = String;

    fn render(&self, component: &TabComponent, _version: ClientVersion) -> Option<String> {
        Some(component.to_legacy_text())
    }
}

/// Renderer for hosts that accept structured component trees
#[derive(Debug, Default, Clone, Copy)]
pub struct RichComponentRenderer;

impl ComponentRenderer for RichComponentRenderer {
    type Output = serde_json::Value;

    fn render(&self, component: &TabComponent, _version: ClientVersion) -> Option<serde_json::Value> {
        serde_json::to_value(component).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_text() {
        let component = TabComponent::text("[Admin] ")
            .with_color(ChatColor::Red)
            .bold()
            .append(TabComponent::text("alice").with_color(ChatColor::White));
        assert_eq!(component.to_legacy_text(), "§c§l[Admin] §falice");
    }

    #[test]
    fn test_plain_text() {
        let component = TabComponent::text("a").append(TabComponent::text("b").italic());
        assert_eq!(component.to_plain_text(), "ab");
        assert_eq!(component.to_string(), "ab");
    }

    #[test]
    fn test_empty_component() {
        assert!(TabComponent::empty().is_empty());
        assert!(TabComponent::empty().append(TabComponent::empty()).is_empty());
        assert!(!TabComponent::text("x").is_empty());
        assert_eq!(TabComponent::empty().to_legacy_text(), "");
    }

    #[test]
    fn test_json_chat_format() {
        let component = TabComponent::text("Hi").with_color(ChatColor::DarkRed);
        let json = component.to_json();
        assert_eq!(json, serde_json::json!({"text": "Hi", "color": "dark_red"}));

        let parsed: TabComponent =
            serde_json::from_str(r#"{"text":"x","bold":true,"extra":[{"text":"y"}]}"#).unwrap();
        assert!(parsed.bold);
        assert_eq!(parsed.extra.len(), 1);
    }

    #[test]
    fn test_text_handle_identity() {
        let a = TextHandle::new("Blue".to_string());
        let b = TextHandle::new("Blue".to_string());
        assert!(a.same_as(&a.clone()));
        assert!(!a.same_as(&b));
        assert_eq!(*a, *b);
    }

    #[test]
    fn test_same_text() {
        let a = TextHandle::new(1u8);
        assert!(same_text::<u8>(None, None));
        assert!(same_text(Some(&a), Some(&a.clone())));
        assert!(!same_text(Some(&a), None));
        assert!(!same_text(None, Some(&a)));
    }

    #[test]
    fn test_renderers() {
        let component = TabComponent::text("Red").with_color(ChatColor::Red);
        let version = ClientVersion::new(20, 4);
        assert_eq!(
            LegacyTextRenderer.render(&component, version),
            Some("§cRed".to_string())
        );
        assert_eq!(
            RichComponentRenderer.render(&component, version),
            Some(serde_json::json!({"text": "Red", "color": "red"}))
        );
    }
}
