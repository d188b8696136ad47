//! The recognized text fields of the registration form and the notification
//! message built from them.

use crate::submission::Submission;

/// Value shown in the notification for a field that was not submitted.
pub const MISSING_VALUE: &str = "N/A";

/// First line of every notification message.
pub const MESSAGE_HEADING: &str = "🚨 ទម្រង់ថ្មីបានបំពេញ! 🚨";

/// A text field the notification message reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    /// Multipart field name.
    pub name: &'static str,
    /// Label printed in front of the value.
    pub label: &'static str,
}

/// The seven recognized text fields, in message order.
pub const FORM_FIELDS: [FormField; 7] = [
    FormField {
        name: "khmerName",
        label: "ឈ្មោះ (ខ្មែរ)",
    },
    FormField {
        name: "englishName",
        label: "Name (អង់គ្លេស)",
    },
    FormField {
        name: "birthplace",
        label: "ទីកន្លែងកំណើត",
    },
    FormField {
        name: "gender",
        label: "ភេទ",
    },
    FormField {
        name: "dob",
        label: "ថ្ងៃ ខែ ឆ្នាំកំណើត",
    },
    FormField {
        name: "nationality",
        label: "សញ្ជាតិ",
    },
    FormField {
        name: "currentAddress",
        label: "បច្ចុប្បន្នស្នាក់នៅ",
    },
];

/// Build the notification text for a submission.
///
/// Each recognized field contributes one `label: value` line. The value is
/// the first one submitted for that name; absent or empty values render as
/// [`MISSING_VALUE`]. Values are HTML-escaped because the message is sent
/// with the `HTML` parse mode.
pub fn format_notification(submission: &Submission) -> String {
    let mut text = String::with_capacity(512);
    text.push_str(MESSAGE_HEADING);
    text.push_str("\n\n");

    for (i, field) in FORM_FIELDS.iter().enumerate() {
        if i > 0 {
            text.push('\n');
        }
        let value = submission
            .first_value(field.name)
            .filter(|v| !v.is_empty())
            .map_or_else(|| MISSING_VALUE.to_owned(), escape_html);
        text.push_str(field.label);
        text.push_str(": ");
        text.push_str(&value);
    }

    text
}

/// Escape the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}
