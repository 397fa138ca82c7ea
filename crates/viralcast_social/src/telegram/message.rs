//! Rendering posts as Telegram HTML messages.

use viralcast_core::Post;

/// Maximum caption length Telegram accepts on a photo.
pub const CAPTION_LIMIT: usize = 1024;

/// Appended to a shortened caption when the full text follows separately.
pub const FULL_TEXT_POINTER: &str = "(Full text below 👇)";

/// Escapes the characters Telegram's HTML parse mode treats as markup.
///
/// # Examples
///
/// ```
/// use viralcast_social::escape_html;
///
/// assert_eq!(escape_html("R&D <beta>"), "R&amp;D &lt;beta&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Full message: bold hook, body, italic trigger, call to action, hashtags.
pub fn render_message(post: &Post) -> String {
    format!(
        "<b>{}</b>\n\n{}\n\n<i>{}</i>\n\n{}\n\n{}",
        escape_html(&post.hook),
        escape_html(&post.content),
        escape_html(&post.emotional_trigger),
        escape_html(&post.cta),
        escape_html(&post.hashtag_line()),
    )
}

/// Photo caption for `post`.
///
/// Returns the full message when it fits [`CAPTION_LIMIT`], otherwise the hook,
/// the call to action and [`FULL_TEXT_POINTER`], with hook and call to action
/// cut short so the caption itself fits. The flag tells whether the full text
/// still has to be sent as its own message.
pub fn render_caption(post: &Post) -> (String, bool) {
    let full = render_message(post);
    if full.chars().count() <= CAPTION_LIMIT {
        return (full, false);
    }

    let frame = "<b></b>\n\n\n\n".chars().count() + FULL_TEXT_POINTER.chars().count();
    let room = CAPTION_LIMIT.saturating_sub(frame);
    let cta = escape_truncated(&post.cta, room / 2);
    let hook = escape_truncated(&post.hook, room - cta.chars().count());

    let short = format!("<b>{}</b>\n\n{}\n\n{}", hook, cta, FULL_TEXT_POINTER);
    (short, true)
}

/// Escapes `text`, keeping at most `limit` characters of output.
///
/// Cuts between source characters so no entity is split, and marks a cut
/// with a trailing ellipsis.
fn escape_truncated(text: &str, limit: usize) -> String {
    let escaped = escape_html(text);
    if escaped.chars().count() <= limit {
        return escaped;
    }

    let budget = limit.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let piece = escape_html(c.encode_utf8(&mut [0; 4]));
        let width = piece.chars().count();
        if used + width > budget {
            break;
        }
        out.push_str(&piece);
        used += width;
    }
    if limit > 0 {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use viralcast_core::PostStatus;

    fn post(content: &str) -> Post {
        Post {
            id: "p1".to_string(),
            created_at: chrono::Utc::now(),
            scheduled_for: None,
            hook: "Chairs <3".to_string(),
            content: content.to_string(),
            emotional_trigger: "nostalgia".to_string(),
            cta: "Share it".to_string(),
            hashtags: vec!["design".to_string(), "#chairs".to_string()],
            image_prompt: "a chair".to_string(),
            image: None,
            status: PostStatus::Draft,
            channel_id: "@design".to_string(),
        }
    }

    #[test]
    fn test_render_message_layout() {
        assert_eq!(
            render_message(&post("Bauhaus & beyond")),
            "<b>Chairs &lt;3</b>\n\nBauhaus &amp; beyond\n\n<i>nostalgia</i>\n\nShare it\n\n#design #chairs"
        );
    }

    #[test]
    fn test_short_post_keeps_full_caption() {
        let p = post("short body");
        let (caption, split) = render_caption(&p);
        assert!(!split);
        assert_eq!(caption, render_message(&p));
    }

    #[test]
    fn test_long_post_is_split() {
        let (caption, split) = render_caption(&post(&"x".repeat(CAPTION_LIMIT)));
        assert!(split);
        assert_eq!(caption, format!("<b>Chairs &lt;3</b>\n\nShare it\n\n{}", FULL_TEXT_POINTER));
    }

    #[test]
    fn test_limit_counts_characters() {
        // Multi-byte characters count once each.
        let p = post(&"ж".repeat(900));
        assert!(render_message(&p).len() > CAPTION_LIMIT);
        assert!(!render_caption(&p).1);
    }

    #[test]
    fn test_shortened_caption_fits_limit() {
        let mut p = post(&"x".repeat(CAPTION_LIMIT));
        p.hook = "H&".repeat(CAPTION_LIMIT);
        p.cta = "C".repeat(CAPTION_LIMIT);

        let (caption, split) = render_caption(&p);
        assert!(split);
        assert!(caption.chars().count() <= CAPTION_LIMIT);
        assert!(caption.starts_with("<b>H&amp;H"));
        assert!(caption.ends_with(FULL_TEXT_POINTER));
        assert!(caption.contains("…</b>"));
        assert!(!caption.contains("&am…"));
    }

    #[test]
    fn test_long_hook_leaves_room_for_cta() {
        let mut p = post(&"x".repeat(CAPTION_LIMIT));
        p.hook = "h".repeat(2 * CAPTION_LIMIT);

        let (caption, _) = render_caption(&p);
        assert!(caption.chars().count() <= CAPTION_LIMIT);
        assert!(caption.contains("\n\nShare it\n\n"));
    }

    #[test]
    fn test_escape_truncated_never_splits_entities() {
        assert_eq!(escape_truncated("a&b", 10), "a&amp;b");
        assert_eq!(escape_truncated("a&b", 5), "a…");
        assert_eq!(escape_truncated("abcdef", 4), "abc…");
        assert_eq!(escape_truncated("abc", 0), "");
    }
}
