//! Transport-neutral replies produced by the dialogue controller.

/// How a reply's text should be interpreted by the chat client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    /// Limited HTML (`<b>`, `<code>`); dynamic values must be escaped.
    Html,
}

/// A button that sends `callback` back to the bot when pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub callback: String,
}

impl Button {
    pub fn new(label: impl Into<String>, callback: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback: callback.into(),
        }
    }
}

/// Inline keyboard attached below a message, one button per row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Builds a keyboard with one button per row.
    pub fn column(buttons: impl IntoIterator<Item = Button>) -> Self {
        Self {
            rows: buttons.into_iter().map(|button| vec![button]).collect(),
        }
    }

    /// All callback payloads, in display order.
    pub fn callbacks(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flatten()
            .map(|button| button.callback.as_str())
            .collect()
    }
}

/// One outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    pub text: String,
    /// When set, the reply is sent as a photo with `text` as its caption.
    pub photo: Option<Vec<u8>>,
    pub keyboard: Option<Keyboard>,
    pub format: TextFormat,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn photo(image: Vec<u8>, caption: impl Into<String>) -> Self {
        Self {
            text: caption.into(),
            photo: Some(image),
            ..Default::default()
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn with_format(mut self, format: TextFormat) -> Self {
        self.format = format;
        self
    }
}

/// Escapes text for inclusion in an HTML-formatted reply.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
