//! Rich card (Discord embed) and file upload values sent by the bot.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Author block shown above a card title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct CardAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Footer line of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct CardFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// A rich message card. Serializes to the Discord embed object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RichCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<CardAuthor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<CardFooter>,
}

#[allow(missing_docs)]
impl RichCard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn with_author(
        mut self,
        name: impl Into<String>,
        icon_url: Option<String>,
        url: Option<String>,
    ) -> Self {
        self.author = Some(CardAuthor {
            name: name.into(),
            icon_url,
            url,
        });
        self
    }

    #[must_use]
    pub fn with_footer(mut self, text: impl Into<String>, icon_url: Option<String>) -> Self {
        self.footer = Some(CardFooter {
            text: text.into(),
            icon_url,
        });
        self
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn color(&self) -> Option<u32> {
        self.color
    }

    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    #[must_use]
    pub const fn author(&self) -> Option<&CardAuthor> {
        self.author.as_ref()
    }

    #[must_use]
    pub const fn footer(&self) -> Option<&CardFooter> {
        self.footer.as_ref()
    }
}

/// A file uploaded alongside a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    filename: String,
    content_type: String,
    data: Bytes,
}

#[allow(missing_docs)]
impl FileUpload {
    #[must_use]
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_card_serializes_as_embed() {
        let card = RichCard::new()
            .with_title("Hello")
            .with_color(0x2f_31_36)
            .with_timestamp(Utc.timestamp_opt(0, 0).unwrap())
            .with_author("spez", None, Some("https://www.reddit.com/u/spez".into()))
            .with_footer("On r/test", None);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["color"], 0x2f_31_36);
        assert_eq!(json["timestamp"], "1970-01-01T00:00:00Z");
        assert_eq!(json["author"]["name"], "spez");
        assert!(json["author"].get("icon_url").is_none());
        assert_eq!(json["footer"]["text"], "On r/test");
        assert!(json.get("description").is_none());
    }
}
