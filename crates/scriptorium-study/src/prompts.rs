//! Prompt templates for commentary generation

use crate::commentary::Commentary;
use crate::passage::{StudyPassage, Verse};
use scriptorium_canon::{Canon, Testament};
use std::fmt::Write as _;

/// System prompt for every commentary request
pub const SYSTEM_PROMPT: &str = "You are a careful Bible study companion. \
Write clear, faithful commentary on the verse you are given, reading it in the context of its passage. \
Earlier commentary on this passage may be provided: build on it, \
do not repeat what it already says, and point out connections where they help.";

/// Extra instruction when JSON output is requested
pub const STRUCTURED_INSTRUCTIONS: &str = "Respond with JSON containing a one-paragraph summary, \
a list of titled sections, the key themes and a short practical application.";

/// Extra instruction when markdown output is requested
pub const MARKDOWN_INSTRUCTIONS: &str =
    "Respond in markdown with short sections under level-3 headings.";

/// User prompt for one verse
///
/// Previous commentaries are rendered in the order given.
#[must_use]
pub fn user_prompt(verse: &Verse, passage: &StudyPassage, previous: &[Commentary]) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "## Verse\n\n{}: {}", verse.reference, verse.text);
    if let Some(testament) = testament_of(&verse.reference) {
        let _ = writeln!(prompt, "\n({} Testament)", capitalized(testament));
    }

    let _ = write!(prompt, "\n## Passage");
    if let Some(title) = &passage.title {
        let _ = write!(prompt, ": {title}");
    }
    prompt.push_str("\n\n");
    for v in &passage.verses {
        let _ = writeln!(prompt, "- {}: {}", v.reference, v.text);
    }

    if !previous.is_empty() {
        prompt.push_str("\n## Earlier commentary\n");
        for commentary in previous {
            let _ = write!(
                prompt,
                "\n### {}\n\n{}\n",
                commentary.verse_ref,
                commentary.commentary.to_markdown()
            );
        }
    }

    let _ = write!(prompt, "\nWrite commentary on {}.", verse.reference);
    prompt
}

fn testament_of(reference: &str) -> Option<Testament> {
    let canon = Canon::passage_lookup();
    canon
        .resolve(reference)
        .and_then(|r| canon.testament(&r.book))
}

fn capitalized(testament: Testament) -> &'static str {
    match testament {
        Testament::Old => "Old",
        Testament::New => "New",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::CommentaryPayload;

    fn passage() -> StudyPassage {
        StudyPassage::new(vec![
            Verse::new("Psalm 23:1", "The LORD is my shepherd; I shall not want."),
            Verse::new("Psalm 23:2", "He maketh me to lie down in green pastures."),
        ])
        .with_title("Psalm 23")
    }

    #[test]
    fn prompt_without_context() {
        let passage = passage();
        let prompt = user_prompt(&passage.verses[0], &passage, &[]);

        assert!(prompt.starts_with("## Verse\n\nPsalm 23:1: The LORD is my shepherd"));
        assert!(prompt.contains("(Old Testament)"));
        assert!(prompt.contains("## Passage: Psalm 23"));
        assert!(prompt.contains("- Psalm 23:2: He maketh me"));
        assert!(!prompt.contains("Earlier commentary"));
        assert!(prompt.ends_with("Write commentary on Psalm 23:1."));
    }

    #[test]
    fn prompt_renders_previous_in_given_order() {
        let passage = passage();
        let previous = vec![
            Commentary::new("Psalm 23:1", CommentaryPayload::Markdown("SHEPHERD".into()), 1),
            Commentary::new("Psalm 23:0", CommentaryPayload::Markdown("TITLE".into()), 2),
        ];
        let prompt = user_prompt(&passage.verses[1], &passage, &previous);

        let first = prompt.find("SHEPHERD").unwrap();
        let second = prompt.find("TITLE").unwrap();
        assert!(first < second);
        assert!(prompt.contains("### Psalm 23:1"));
    }

    #[test]
    fn prompt_omits_testament_for_unresolved() {
        let verse = Verse::new("Odes 1:1", "text");
        let passage = StudyPassage::new(vec![verse.clone()]);
        let prompt = user_prompt(&verse, &passage, &[]);
        assert!(!prompt.contains("Testament)"));
        assert!(prompt.contains("## Passage\n\n- Odes 1:1: text"));
    }
}
