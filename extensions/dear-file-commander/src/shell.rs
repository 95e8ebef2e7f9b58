//! POSIX shell quoting for expanded command lines.

use std::borrow::Cow;

fn is_safe_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"_@%+=:,./-".contains(&b)
}

/// Quote one word for a POSIX shell.
///
/// Words made only of safe characters are returned unchanged; anything else is
/// single-quoted, with embedded `'` written as `'\''`.
pub fn quote(word: &str) -> Cow<'_, str> {
    if word.is_empty() {
        return Cow::Borrowed("''");
    }
    if word.bytes().all(is_safe_byte) {
        return Cow::Borrowed(word);
    }
    Cow::Owned(format!("'{}'", word.replace('\'', "'\\''")))
}

/// Quote each word and join them with single spaces.
pub fn quote_join<'a, I>(words: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    words
        .into_iter()
        .map(quote)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_words_are_untouched() {
        assert_eq!(quote("a.txt"), "a.txt");
        assert_eq!(quote("/tmp/x-1,2"), "/tmp/x-1,2");
    }

    #[test]
    fn unsafe_words_are_single_quoted() {
        assert_eq!(quote("my file"), "'my file'");
        assert_eq!(quote("it's"), "'it'\\''s'");
        assert_eq!(quote("$HOME"), "'$HOME'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn join_quotes_each_word() {
        assert_eq!(quote_join(["a", "b c"]), "a 'b c'");
        assert_eq!(quote_join(Vec::<&str>::new()), "");
    }
}
