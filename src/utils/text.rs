//! Text helpers shared by the extractor, the writer and the downloader.

use regex::Regex;

/// Strips every character outside the allow-list: Latin and Cyrillic letters
/// (including ёЁ), digits, `.-+=?!/\`, space and newline.
///
/// Statement text and attachment filenames go through the same filter, so a
/// filename never contains anything the statement could not.
pub fn sanitize(text: &str) -> String {
    let allowed = Regex::new(r"[^a-zA-Zа-яА-Я0-9ёЁ.\-+=?!/\\ \n]").unwrap();
    allowed.replace_all(text, "").into_owned()
}

/// Collapses runs of spaces into one space.
pub fn collapse_spaces(text: &str) -> String {
    let runs = Regex::new(r" +").unwrap();
    runs.replace_all(text, " ").into_owned()
}

/// Greedy word wrap at `width` columns, each emitted line prefixed with
/// `prefix`. Existing newlines are treated as plain whitespace.
pub fn wrap(text: &str, width: usize, prefix: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::from(prefix);
    let mut empty = true;

    for word in text.split_whitespace() {
        let candidate = line.chars().count() + 1 + word.chars().count();
        if !empty && candidate > width {
            lines.push(std::mem::replace(&mut line, String::from(prefix)));
            empty = true;
        }
        if !empty {
            line.push(' ');
        }
        line.push_str(word);
        empty = false;
    }
    if !empty || lines.is_empty() {
        lines.push(line);
    }
    lines.join("\n")
}

/// Russian plural suffix for "файл": 1 файл, 2 файла, 5 файлов.
pub fn file_suffix(count: usize) -> &'static str {
    if !(10..=20).contains(&count) {
        match count % 10 {
            1 => return "",
            2..=4 => return "а",
            _ => {}
        }
    }
    "ов"
}

/// Truncates long text for log lines.
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_allowed_characters() {
        assert_eq!(
            sanitize("Найдите x+y=2, если f(x)=1/2?!"),
            "Найдите x+y=2 если fx=1/2?!"
        );
    }

    #[test]
    fn sanitize_strips_markup_leftovers_and_emoji() {
        assert_eq!(sanitize("<b>жирный</b> 💶 текст"), "bжирныйb  текст");
        assert_eq!(sanitize("a\nb"), "a\nb");
    }

    #[test]
    fn collapse_spaces_leaves_single_spaces() {
        assert_eq!(collapse_spaces("a   b  c"), "a b c");
    }

    #[test]
    fn wrap_respects_width_and_prefix() {
        let wrapped = wrap("один два три четыре", 10, "# ");
        for line in wrapped.lines() {
            assert!(line.starts_with("# "));
            assert!(line.chars().count() <= 12);
        }
        assert_eq!(wrapped.lines().count(), 3);
    }

    #[test]
    fn wrap_of_empty_text_is_bare_prefix() {
        assert_eq!(wrap("", 120, "# "), "# ");
    }

    #[test]
    fn file_suffix_declension() {
        assert_eq!(file_suffix(1), "");
        assert_eq!(file_suffix(3), "а");
        assert_eq!(file_suffix(5), "ов");
        assert_eq!(file_suffix(11), "ов");
        assert_eq!(file_suffix(21), "");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("абвгд", 3), "абв...");
        assert_eq!(truncate("аб", 3), "аб");
    }
}
