//! Commit message text manipulation.
//!
//! These routines mirror git's own handling of commit message files:
//! comment lines start with `#`, a scissors line separates the message
//! from the diff appended by `git commit --verbose`, and trailers live
//! in the final paragraph of the message body.

use std::sync::LazyLock;

use regex::Regex;

use crate::changeid::ChangeId;

/// The scissors line emitted by `git commit --verbose` and
/// `commit.cleanup=scissors`. Everything below it is discarded by git.
const SCISSORS_LINE: &str = "# ------------------------ >8 ------------------------";

static CHANGE_ID_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^change-id:[ \t]*(\w+)[ \t]*$").unwrap()
});

static TRAILER_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9-]*:[ \t]").unwrap()
});

fn is_comment(line: &str) -> bool {
    line.starts_with('#')
}

fn is_trailer_line(line: &str) -> bool {
    TRAILER_LINE_RE.is_match(line)
}

/// Split a commit message into the editable content and the verbose diff.
///
/// The diff starts at the scissors line, but git places the scissors at
/// the end of the comment block it belongs to, so the split point walks
/// back over the contiguous comment lines directly above it. The second
/// half keeps its leading newline so the two halves concatenate back to
/// the original text.
pub fn split_verbose(text: &str) -> (&str, &str) {
    let mut block_start: Option<usize> = None;
    let mut pos = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.strip_suffix('\n').unwrap_or(line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        if is_comment(trimmed) {
            if block_start.is_none() {
                block_start = Some(pos);
            }
            if trimmed == SCISSORS_LINE {
                let start = block_start.unwrap_or(pos);
                return if start == 0 {
                    ("", text)
                } else {
                    (&text[..start - 1], &text[start - 1..])
                };
            }
        } else {
            block_start = None;
        }
        pos += line.len();
    }
    (text, "")
}

/// Remove comment lines, the way `git stripspace --strip-comments` does.
pub fn strip_comments(text: &str) -> String {
    let kept: Vec<&str> = text.lines().filter(|line| !is_comment(line)).collect();
    kept.join("\n")
}

/// Normalize whitespace like `git stripspace`: trim trailing whitespace
/// from every line, collapse runs of blank lines into one, and drop
/// blank lines at the start and end. The result carries no trailing
/// newline.
pub fn stripspace(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut blank_run = false;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run = true;
            continue;
        }
        if blank_run && !out.is_empty() {
            out.push("");
        }
        blank_run = false;
        out.push(line);
    }
    out.join("\n")
}

/// Find and remove the first `Change-Id:` line in the message content.
///
/// Matching is case-insensitive and accepts any word-shaped value, so
/// identifiers written by older tools are recognized and preserved
/// verbatim rather than regenerated. Comment lines never match.
pub fn extract_change_id(content: &str) -> (String, Option<String>) {
    let mut found = None;
    let mut kept: Vec<&str> = Vec::new();
    for line in content.lines() {
        if found.is_none() {
            if let Some(caps) = CHANGE_ID_LINE_RE.captures(line) {
                found = Some(caps[1].to_string());
                continue;
            }
        }
        kept.push(line);
    }
    (kept.join("\n"), found)
}

/// Returns the final paragraph of the comment-stripped content when it
/// forms a trailer block. The first paragraph never counts as one, so a
/// lone `Key: value` subject line stays a subject.
fn trailing_trailer_block(content: &str) -> Option<Vec<&str>> {
    let body: Vec<&str> = content.lines().filter(|line| !is_comment(line)).collect();
    let end = body.iter().rposition(|line| !line.trim().is_empty())? + 1;
    let body = &body[..end];
    let start = body.iter().rposition(|line| line.trim().is_empty())? + 1;
    let block = &body[start..];
    if !block.is_empty() && block.iter().all(|line| is_trailer_line(line)) {
        Some(block.to_vec())
    } else {
        None
    }
}

fn is_wellformed_change_id_line(line: &str) -> bool {
    line.strip_prefix("Change-Id: ")
        .is_some_and(|value| ChangeId::is_valid(value.trim_end()))
}

/// Check whether the content already carries a canonical `Change-Id`
/// trailer: a `Change-Id: I<40 hex>` line inside the trailer block.
/// Case variants and short identifiers fail this check and get
/// rewritten into canonical form instead.
pub fn has_change_id_trailer(content: &str) -> bool {
    trailing_trailer_block(content)
        .is_some_and(|block| block.iter().any(|line| is_wellformed_change_id_line(line)))
}

/// Insert a trailer line into the message content.
///
/// The line joins an existing trailer block or opens a new blank-separated
/// paragraph after the last body line. A comment block at the end of the
/// message (the `git commit` template) stays at the end, after the trailer.
/// Body lines are preserved byte for byte. Content without any body line
/// reduces to the trailer alone, ahead of whatever comments were there.
pub fn append_trailer(content: &str, trailer: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let Some(last_body) = lines
        .iter()
        .rposition(|line| !line.trim().is_empty() && !is_comment(line))
    else {
        let tail: Vec<&str> = lines
            .iter()
            .copied()
            .skip_while(|line| line.trim().is_empty())
            .collect();
        return if tail.is_empty() {
            trailer.to_string()
        } else {
            format!("{trailer}\n\n{}", tail.join("\n"))
        };
    };

    let head = lines[..=last_body].join("\n");
    let sep = if trailing_trailer_block(&head).is_some() {
        "\n"
    } else {
        "\n\n"
    };
    let mut out = format!("{head}{sep}{trailer}");

    let tail: Vec<&str> = lines[last_body + 1..]
        .iter()
        .copied()
        .skip_while(|line| line.trim().is_empty())
        .collect();
    if !tail.is_empty() {
        out.push_str("\n\n");
        out.push_str(&tail.join("\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERBOSE_MESSAGE_LINES: &[&str] = &[
        "Rework the widget cache",
        "",
        "The cache now keys entries by tree hash so repeated lookups ",
        "stay stable across rebases. Entries expire after an hour.",
        "# Please enter the commit message for your changes. Lines starting",
        "# with '#' will be ignored, and an empty message aborts the commit.",
        "#",
        "# On branch main",
        "# Your branch is up to date with 'origin/main'.",
        "#",
        "# Changes to be committed:",
        "#   modified:   src/cache.rs",
        "#",
        "# ------------------------ >8 ------------------------",
        "# Do not modify or remove the line above.",
        "# Everything below it will be ignored.",
        "diff --git a/src/cache.rs b/src/cache.rs",
        "index 2d81f4b..9c1e7aa 100644",
        "--- a/src/cache.rs",
        "+++ b/src/cache.rs",
        "@@ -10,6 +10,9 @@ impl Cache {",
        "...",
    ];

    fn verbose_message() -> String {
        VERBOSE_MESSAGE_LINES.join("\n")
    }

    fn verbose_content() -> String {
        VERBOSE_MESSAGE_LINES[..4].join("\n")
    }

    fn verbose_diff() -> String {
        format!("\n{}", VERBOSE_MESSAGE_LINES[4..].join("\n"))
    }

    const FULL_ID: &str = "I0102030405060708090001020304050607080900";

    #[test]
    fn split_verbose_walks_back_over_comment_block() {
        let message = verbose_message();
        let (content, verbose) = split_verbose(&message);
        assert_eq!(content, verbose_content());
        assert_eq!(verbose, verbose_diff());
    }

    #[test]
    fn split_verbose_halves_reassemble() {
        let message = verbose_message();
        let (content, verbose) = split_verbose(&message);
        assert_eq!(format!("{content}{verbose}"), message);
    }

    #[test]
    fn split_verbose_without_scissors_keeps_everything() {
        let text = "A summary line\n\nBody text with no diff below.\n";
        let (content, verbose) = split_verbose(text);
        assert_eq!(content, text);
        assert_eq!(verbose, "");
    }

    #[test]
    fn split_verbose_with_leading_scissors_has_no_content() {
        let text = format!("{SCISSORS_LINE}\ndiff --git a/x b/x\n");
        let (content, verbose) = split_verbose(&text);
        assert_eq!(content, "");
        assert_eq!(verbose, text);
    }

    #[test]
    fn split_verbose_ignores_scissors_outside_comment_position() {
        // A non-comment line between the comments and the scissors breaks
        // the block, so only the scissors line itself moves.
        let text = "Subject\n# note\nplain line\n# ------------------------ >8 ------------------------\ndiff";
        let (content, verbose) = split_verbose(text);
        assert_eq!(content, "Subject\n# note\nplain line");
        assert!(verbose.starts_with("\n# ---"));
    }

    #[test]
    fn extract_change_id_is_case_insensitive() {
        for key in ["Change-Id", "CHANGE-ID", "change-id"] {
            let message = format!("Foo\n{key}: I12345abcde");
            let (rest, id) = extract_change_id(&message);
            assert_eq!(id.as_deref(), Some("I12345abcde"), "key: {key}");
            assert_eq!(rest, "Foo");
        }
    }

    #[test]
    fn extract_change_id_reports_absence() {
        let (rest, id) = extract_change_id("No\nChange-Id\nTag");
        assert_eq!(id, None);
        assert_eq!(rest, "No\nChange-Id\nTag");
    }

    #[test]
    fn extract_change_id_ignores_comment_lines() {
        let (rest, id) = extract_change_id("Subject\n# Change-Id: Iaaaa");
        assert_eq!(id, None);
        assert_eq!(rest, "Subject\n# Change-Id: Iaaaa");
    }

    #[test]
    fn extract_change_id_takes_first_match_only() {
        let (rest, id) = extract_change_id("Subject\nChange-Id: Iaaa\nChange-Id: Ibbb");
        assert_eq!(id.as_deref(), Some("Iaaa"));
        assert_eq!(rest, "Subject\nChange-Id: Ibbb");
    }

    #[test]
    fn stripspace_trims_trailing_whitespace() {
        assert_eq!(stripspace("Subject   \n\nBody\t\n"), "Subject\n\nBody");
    }

    #[test]
    fn stripspace_collapses_blank_runs() {
        assert_eq!(stripspace("a\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn stripspace_drops_leading_and_trailing_blanks() {
        assert_eq!(stripspace("\n\na\n\n"), "a");
    }

    #[test]
    fn stripspace_of_whitespace_is_empty() {
        assert_eq!(stripspace("  \n\t\n"), "");
    }

    #[test]
    fn strip_comments_removes_hash_lines() {
        assert_eq!(strip_comments("a\n# b\nc"), "a\nc");
    }

    #[test]
    fn trailer_detected_in_final_block() {
        let message = format!("Subject\n\nChange-Id: {FULL_ID}");
        assert!(has_change_id_trailer(&message));
    }

    #[test]
    fn trailer_detected_among_other_trailers() {
        let message =
            format!("Subject\n\nSigned-off-by: Dev <dev@example.com>\nChange-Id: {FULL_ID}");
        assert!(has_change_id_trailer(&message));
    }

    #[test]
    fn trailer_survives_trailing_comment_block() {
        let message = format!("Subject\n\nChange-Id: {FULL_ID}\n\n# comment line\n");
        assert!(has_change_id_trailer(&message));
    }

    #[test]
    fn short_id_is_not_well_formed() {
        assert!(!has_change_id_trailer("Subject\n\nChange-Id: I12345abcde"));
    }

    #[test]
    fn lowercase_key_is_not_well_formed() {
        let message = format!("Subject\n\nchange-id: {FULL_ID}");
        assert!(!has_change_id_trailer(&message));
    }

    #[test]
    fn id_glued_to_body_is_not_a_trailer() {
        let message = format!("Subject\n\nBody line.\nChange-Id: {FULL_ID}");
        assert!(!has_change_id_trailer(&message));
    }

    #[test]
    fn subject_only_message_has_no_trailer_block() {
        assert!(!has_change_id_trailer(&format!("Change-Id: {FULL_ID}")));
    }

    #[test]
    fn append_trailer_opens_new_block() {
        assert_eq!(
            append_trailer("Fix typo", "Change-Id: Iabc"),
            "Fix typo\n\nChange-Id: Iabc"
        );
    }

    #[test]
    fn append_trailer_joins_existing_block() {
        let content = "Subject\n\nSigned-off-by: Dev <dev@example.com>";
        assert_eq!(
            append_trailer(content, "Change-Id: Iabc"),
            "Subject\n\nSigned-off-by: Dev <dev@example.com>\nChange-Id: Iabc"
        );
    }

    #[test]
    fn append_trailer_lands_before_trailing_comments() {
        let content = "Fix typo\n\n# Please enter the commit message.\n# Lines starting";
        assert_eq!(
            append_trailer(content, "Change-Id: Iabc"),
            "Fix typo\n\nChange-Id: Iabc\n\n# Please enter the commit message.\n# Lines starting"
        );
    }

    #[test]
    fn append_trailer_drops_trailing_blank_lines() {
        assert_eq!(
            append_trailer("Fix typo\n\n\n", "Change-Id: Iabc"),
            "Fix typo\n\nChange-Id: Iabc"
        );
    }

    #[test]
    fn append_trailer_without_a_body_is_just_the_trailer() {
        assert_eq!(append_trailer("", "Change-Id: Iabc"), "Change-Id: Iabc");
        assert_eq!(append_trailer("\n\n", "Change-Id: Iabc"), "Change-Id: Iabc");
    }

    #[test]
    fn append_trailer_without_a_body_keeps_comments_trailing() {
        assert_eq!(
            append_trailer("# note\n", "Change-Id: Iabc"),
            "Change-Id: Iabc\n\n# note"
        );
        assert_eq!(
            append_trailer("\n# note", "Change-Id: Iabc"),
            "Change-Id: Iabc\n\n# note"
        );
    }

    #[test]
    fn append_trailer_preserves_body_bytes() {
        let content = verbose_content();
        let out = append_trailer(&content, "Change-Id: Iabc");
        assert!(out.starts_with(&content));
    }
}
