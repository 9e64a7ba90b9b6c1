use std::sync::OnceLock;

use rand::distributions::Uniform;
use rand::Rng;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Length of the random suffix appended to generated slugs
const SUFFIX_LEN: usize = 5;

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

fn non_word_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("non-word pattern is valid"))
}

/// Lowercase, strip diacritics, hyphenate whitespace and drop anything that
/// is not an ASCII word character or a hyphen.
///
/// Letters without a decomposition (such as `đ`) are dropped, not folded.
pub fn slugify(input: &str) -> String {
    let stripped: String = input
        .to_lowercase()
        .nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect();
    let hyphenated = whitespace_runs().replace_all(&stripped, "-");
    non_word_runs().replace_all(&hyphenated, "").into_owned()
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(Uniform::new_inclusive(b'a', b'z'))
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect()
}

/// Slug for a new article: the title plus a short random suffix so two
/// articles with the same title do not collide.
pub fn generate_slug(title: &str) -> String {
    slugify(&format!("{}-{}", title, random_suffix()))
}
