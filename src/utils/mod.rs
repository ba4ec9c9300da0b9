pub mod math;

/// Round half away from zero to 2 decimals
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First `max_chars` characters of `text`, on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_hundredths() {
        assert_eq!(round2(66.66666), 66.67);
        assert_eq!(round2(0.125 * 100.0), 12.5);
        assert_eq!(round2(0.0), 0.0);
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("naïve bayes", 3), "naï");
        assert_eq!(truncate_chars("short", 80), "short");
        assert_eq!(truncate_chars("", 5), "");
    }
}
