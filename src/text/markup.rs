use once_cell::sync::Lazy;
use regex::Regex;

/// A document section ready for the styled renderer: a display heading plus
/// a markup body the reconstruction rules have repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderableSection {
    pub heading: String,
    pub markup_body: String,
}

/// One named repair step. Rules run strictly in table order; later rules see
/// the text earlier rules produced.
pub struct ReconstructionRule {
    pub name: &'static str,
    run: fn(&str) -> String,
}

impl ReconstructionRule {
    pub fn apply(&self, text: &str) -> String {
        (self.run)(text)
    }
}

/// The standalone page-header string the basic renderer stamps on every
/// page. Text copied back out of those documents carries it mid-prose, so
/// the reconstruction pass removes it again.
pub const HEADER_ARTIFACT: &str = "Transcript Press";

static HEADER_ARTIFACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*Transcript Press\s*").unwrap());
static PART_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(Part \d+:.*?)$").unwrap());
static TAKEAWAYS_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(Learnings and Actionable Takeaways)$").unwrap());
static LETTERED_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^([A-Z]\..*?)$").unwrap());
static INLINE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"( \d+\. )").unwrap());
static INLINE_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"( \* )").unwrap());
static JAMMED_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\S) (\d+\.)").unwrap());
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").unwrap());

fn strip_bom(text: &str) -> String {
    text.replace('\u{feff}', "")
}

fn strip_header_artifact(text: &str) -> String {
    HEADER_ARTIFACT_RE.replace_all(text, "\n").trim().to_string()
}

fn part_headings(text: &str) -> String {
    PART_HEADING.replace_all(text, "### $1").into_owned()
}

fn takeaways_heading(text: &str) -> String {
    TAKEAWAYS_HEADING
        .replace_all(text, "\n---\n## $1")
        .into_owned()
}

fn lettered_headings(text: &str) -> String {
    LETTERED_HEADING.replace_all(text, "### $1").into_owned()
}

fn ascii_bullets(text: &str) -> String {
    text.replace('\u{2022}', "*")
}

fn split_inline_numbered(text: &str) -> String {
    INLINE_NUMBERED.replace_all(text, "\n$1").into_owned()
}

fn split_inline_bullets(text: &str) -> String {
    INLINE_BULLET.replace_all(text, "\n$1").into_owned()
}

fn split_jammed_numbered(text: &str) -> String {
    JAMMED_NUMBERED.replace_all(text, "$1\n$2").into_owned()
}

fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUNS.replace_all(text, "\n\n").into_owned()
}

/// The repair table, in application order. Ordering is load-bearing: the
/// lettered-heading rule must not see lines the part-heading rule already
/// prefixed, and the blank-line collapse must run after every rule that
/// inserts line breaks.
pub static RULES: &[ReconstructionRule] = &[
    ReconstructionRule {
        name: "strip_bom",
        run: strip_bom,
    },
    ReconstructionRule {
        name: "strip_header_artifact",
        run: strip_header_artifact,
    },
    ReconstructionRule {
        name: "part_headings",
        run: part_headings,
    },
    ReconstructionRule {
        name: "takeaways_heading",
        run: takeaways_heading,
    },
    ReconstructionRule {
        name: "lettered_headings",
        run: lettered_headings,
    },
    ReconstructionRule {
        name: "ascii_bullets",
        run: ascii_bullets,
    },
    ReconstructionRule {
        name: "split_inline_numbered",
        run: split_inline_numbered,
    },
    ReconstructionRule {
        name: "split_inline_bullets",
        run: split_inline_bullets,
    },
    ReconstructionRule {
        name: "split_jammed_numbered",
        run: split_jammed_numbered,
    },
    ReconstructionRule {
        name: "collapse_blank_lines",
        run: collapse_blank_lines,
    },
];

/// Run the full repair table over one block of text.
pub fn apply_rules(text: &str) -> String {
    let repaired = RULES
        .iter()
        .fold(text.to_string(), |text, rule| rule.apply(&text));
    repaired.trim().to_string()
}

/// Repair a title + body pair into a renderable section.
///
/// The title line travels through the repair table with the body, then the
/// first line is split back off as the display heading (dropping the
/// "Video: " prefix the pipeline adds). Best-effort: the output is markedly
/// more renderable, not guaranteed to be perfectly formed.
pub fn reconstruct(title: &str, content: &str) -> RenderableSection {
    let combined = format!("{title}\n{content}");
    let repaired = apply_rules(&combined);

    let (first_line, rest) = repaired
        .split_once('\n')
        .unwrap_or((repaired.as_str(), ""));

    RenderableSection {
        heading: first_line.replace("Video: ", "").trim().to_string(),
        markup_body: rest.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static ReconstructionRule {
        RULES
            .iter()
            .find(|rule| rule.name == name)
            .unwrap_or_else(|| panic!("no rule named {name}"))
    }

    #[test]
    fn test_part_lines_become_level_three_headers() {
        assert_eq!(
            apply_rules("Part 1: Intro\nsome text"),
            "### Part 1: Intro\nsome text"
        );
    }

    #[test]
    fn test_takeaways_line_gets_rule_and_level_two_header() {
        let output = apply_rules("intro text\nLearnings and Actionable Takeaways\nmore");
        assert!(
            output.contains("---\n## Learnings and Actionable Takeaways"),
            "got: {output}"
        );
    }

    #[test]
    fn test_lettered_lines_become_level_three_headers() {
        let output = apply_rules("A. Core Philosophy\nbody");
        assert_eq!(output, "### A. Core Philosophy\nbody");
    }

    #[test]
    fn test_unicode_bullets_become_asterisks() {
        assert_eq!(rule("ascii_bullets").apply("\u{2022} item"), "* item");
    }

    #[test]
    fn test_inline_numbered_lists_split() {
        let output = rule("split_inline_numbered").apply("first point 2. second point");
        assert_eq!(output, "first point\n 2. second point");
    }

    #[test]
    fn test_inline_bullets_split() {
        let output = rule("split_inline_bullets").apply("machine. * Foundational idea");
        assert_eq!(output, "machine.\n * Foundational idea");
    }

    #[test]
    fn test_jammed_numbered_lists_split() {
        let output = rule("split_jammed_numbered").apply("Funnel: 2. Create content");
        assert_eq!(output, "Funnel:\n2. Create content");
    }

    #[test]
    fn test_blank_runs_collapse() {
        assert_eq!(
            rule("collapse_blank_lines").apply("a\n\n\n\nb"),
            "a\n\nb"
        );
    }

    #[test]
    fn test_bom_and_artifact_removed() {
        let input = format!("lead\u{feff}ing {HEADER_ARTIFACT} trailing");
        let output = apply_rules(&input);
        assert!(!output.contains('\u{feff}'));
        assert!(!output.contains(HEADER_ARTIFACT));
        assert!(output.contains("leading"));
        assert!(output.contains("trailing"));
    }

    #[test]
    fn test_content_is_never_dropped() {
        let input = "Part 2: Growth\nIdeas 1. first 2. second \u{2022} third\n\n\nA. Wrap";
        let output = apply_rules(input);

        let visible = |text: &str| {
            text.chars()
                .filter(|c| !c.is_whitespace() && *c != '\u{2022}' && *c != '*')
                .count()
        };
        assert!(
            visible(&output) >= visible(input),
            "output lost visible characters:\n{output}"
        );
    }

    #[test]
    fn test_reconstruct_splits_title_line() {
        let section = reconstruct("Video: How to Ship", "Part 1: Intro\nbody text");
        assert_eq!(section.heading, "How to Ship");
        assert_eq!(section.markup_body, "### Part 1: Intro\nbody text");
    }

    #[test]
    fn test_reconstruct_with_empty_body() {
        let section = reconstruct("Video: Title Only", "");
        assert_eq!(section.heading, "Title Only");
        assert_eq!(section.markup_body, "");
    }
}
