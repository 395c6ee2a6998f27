//! Field-name casing for query keys.
//!
//! [`to_kebab_case`] turns a camelCase or PascalCase identifier into the
//! lowercase, hyphen-separated form used for query parameter keys. It applies
//! two scans that behave like the substitutions `(.)([A-Z][a-z]+)` → `$1-$2`
//! followed by `([a-z0-9])([A-Z])` → `$1-$2`, each taking leftmost
//! non-overlapping matches, and then lowercases the result.
//!
//! Runs of capitals are handled on a best-effort basis: `HTTPStatus` becomes
//! `http-status`, but a trailing acronym such as `userIDS` only splits once.

/// Convert an identifier to hyphenated lowercase.
///
/// ```
/// use http_utils_core::casing::to_kebab_case;
///
/// assert_eq!(to_kebab_case("SomeQueryParam"), "some-query-param");
/// assert_eq!(to_kebab_case("already-cased"), "already-cased");
/// ```
#[must_use]
pub fn to_kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let chars = split_before_capitalized_words(&chars);
    let chars = split_lower_upper_boundaries(&chars);
    chars.into_iter().collect::<String>().to_lowercase()
}

/// First pass: a hyphen before each capitalized word that follows any character.
fn split_before_capitalized_words(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + chars.len() / 2);
    let mut i = 0;

    while i < chars.len() {
        let lead = chars[i];
        match capitalized_word_end(chars, i + 1) {
            Some(end) if lead != '\n' => {
                out.push(lead);
                out.push('-');
                out.extend_from_slice(&chars[i + 1..end]);
                i = end;
            }
            _ => {
                out.push(lead);
                i += 1;
            }
        }
    }

    out
}

/// End index (exclusive) of an `[A-Z][a-z]+` run starting at `start`.
fn capitalized_word_end(chars: &[char], start: usize) -> Option<usize> {
    if !chars.get(start)?.is_ascii_uppercase() {
        return None;
    }
    let lowercase = chars[start + 1..]
        .iter()
        .take_while(|c| c.is_ascii_lowercase())
        .count();
    (lowercase > 0).then_some(start + 1 + lowercase)
}

/// Second pass: a hyphen between a lowercase letter or digit and a following capital.
fn split_lower_upper_boundaries(chars: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + chars.len() / 2);
    let mut i = 0;

    while i < chars.len() {
        let lead = chars[i];
        let boundary = (lead.is_ascii_lowercase() || lead.is_ascii_digit())
            && chars.get(i + 1).is_some_and(char::is_ascii_uppercase);

        out.push(lead);
        if boundary {
            out.push('-');
            out.push(chars[i + 1]);
            i += 2;
        } else {
            i += 1;
        }
    }

    out
}
