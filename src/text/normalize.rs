use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Ordered contraction repairs for spoken-word captions. Entries are applied
/// sequentially on the evolving string, so later entries may act on text a
/// previous entry already touched.
static CONTRACTIONS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bi\s+", "I "),
        (r"\bim\b", "I'm"),
        (r"\bid\b", "I'd"),
        (r"\bive\b", "I've"),
        (r"\byoure\b", "you're"),
        (r"\byouve\b", "you've"),
        (r"\bhes\b", "he's"),
        (r"\bshes\b", "she's"),
        (r"\bits\b", "it's"),
        (r"\btheyre\b", "they're"),
        (r"\btheyve\b", "they've"),
        (r"\bweve\b", "we've"),
        (r"\bwere\b", "we're"),
        (r"\bdont\b", "don't"),
        (r"\bwont\b", "won't"),
        (r"\bcant\b", "can't"),
        (r"\bisnt\b", "isn't"),
        (r"\bwasnt\b", "wasn't"),
        (r"\barent\b", "aren't"),
        (r"\bdidnt\b", "didn't"),
        (r"\bdoesnt\b", "doesn't"),
        (r"\bhavent\b", "haven't"),
        (r"\bhasnt\b", "hasn't"),
        (r"\bhadnt\b", "hadn't"),
        (r"\bwouldnt\b", "wouldn't"),
        (r"\bshouldnt\b", "shouldn't"),
        (r"\bcouldnt\b", "couldn't"),
        (r"\bthats\b", "that's"),
        (r"\bwhats\b", "what's"),
        (r"\bwheres\b", "where's"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(&format!("(?i){pattern}")).unwrap(),
            replacement,
        )
    })
    .collect()
});

static SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.!?])").unwrap());
static PUNCT_GLUED_TO_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"([,.!?])(\w)").unwrap());

/// Clean one block of raw caption text: collapse whitespace, repair common
/// contractions, and reattach punctuation to the preceding word.
///
/// Pure and idempotent; normalizing already-normalized text is a no-op.
pub fn normalize(text: &str) -> String {
    let mut text = WHITESPACE_RUNS
        .replace_all(text, " ")
        .trim()
        .to_string();

    for (pattern, replacement) in CONTRACTIONS.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }

    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    PUNCT_GLUED_TO_WORD
        .replace_all(&text, "$1 $2")
        .into_owned()
}
