//! Line-item note for gift-card purchases.

/// Separator between note parts.
const SEPARATOR: &str = " | ";

/// Composes `For: <recipient> | From: <sender> | Message: <message>`.
///
/// Parts are trimmed and empty parts are omitted along with their separator.
/// Returns `None` when every part is empty.
///
/// # Example
///
/// ```rust
/// use square_giftcard::checkout::compose_gift_card_note;
///
/// let note = compose_gift_card_note(Some("Jane"), Some("John"), Some(""));
/// assert_eq!(note.as_deref(), Some("For: Jane | From: John"));
/// assert_eq!(compose_gift_card_note(None, None, None), None);
/// ```
#[must_use]
pub fn compose_gift_card_note(
    recipient: Option<&str>,
    sender: Option<&str>,
    message: Option<&str>,
) -> Option<String> {
    let parts: Vec<String> = [("For", recipient), ("From", sender), ("Message", message)]
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| format!("{label}: {v}"))
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(SEPARATOR))
    }
}
