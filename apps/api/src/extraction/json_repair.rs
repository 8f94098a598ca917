//! Tolerant JSON extraction — recovers a JSON object or array from raw model output.
//!
//! Model output is rarely pure JSON: it arrives wrapped in prose, fenced in
//! ```json blocks, followed by explanations, or cut off mid-string. The extractor
//! scans for the first balanced `{...}` / `[...]` candidate with an explicit state
//! machine (delimiter stack, in-string flag, escape flag), parses it, and on failure
//! runs a short, fixed sequence of textual repairs before giving up.
//!
//! The input text is never modified; repairs operate on an owned copy of the candidate.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonExtractError {
    #[error("no JSON object or array found in completion text")]
    NoJsonFound,

    #[error("JSON candidate ({} bytes) could not be parsed even after repair", .candidate.len())]
    UnrecoverableJson { candidate: String },
}

/// A textual repair applied to a candidate before it parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repair {
    CloseString,
    CloseDelimiters,
    StripTrailingCommas,
    NormalizeQuotes,
}

/// Repairs in the order they are attempted. Each one builds on the previous result.
///
/// Candidate selection only treats `"` as a string delimiter, so a bracket inside a
/// single-quoted string ends the candidate before `NormalizeQuotes` ever runs.
/// Truncation inside an object key or a bare literal (`tr`, `nul`, `1e`) is not
/// completed either; such candidates are reported as unrecoverable.
const REPAIR_SEQUENCE: [Repair; 4] = [
    Repair::CloseString,
    Repair::CloseDelimiters,
    Repair::StripTrailingCommas,
    Repair::NormalizeQuotes,
];

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedJson {
    pub value: Value,
    /// Byte offset just past the candidate in the input text.
    pub consumed: usize,
    /// Repairs that were needed, in application order. Empty for clean JSON.
    pub repairs: Vec<Repair>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Brace,
    Bracket,
}

impl Delimiter {
    fn closer(self) -> char {
        match self {
            Delimiter::Brace => '}',
            Delimiter::Bracket => ']',
        }
    }
}

/// Scanner state for one extraction call.
#[derive(Debug, Default, Clone)]
struct ParseState {
    pos: usize,
    stack: Vec<Delimiter>,
    in_string: bool,
    escaped: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Closed,
}

impl ParseState {
    /// Advances the state by one character. Returns `Closed` when the outermost
    /// delimiter has just been closed.
    fn feed(&mut self, pos: usize, c: char) -> Step {
        self.pos = pos;

        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == '"' {
                self.in_string = false;
            }
            return Step::Continue;
        }

        match c {
            '"' => self.in_string = true,
            '{' => self.stack.push(Delimiter::Brace),
            '[' => self.stack.push(Delimiter::Bracket),
            '}' | ']' => {
                // A mismatched closer still closes the innermost open delimiter.
                if self.stack.pop().is_some() && self.stack.is_empty() {
                    return Step::Closed;
                }
            }
            _ => {}
        }
        Step::Continue
    }

    /// Closers needed to balance the open stack, innermost first.
    fn pending_closers(&self) -> String {
        self.stack.iter().rev().map(|d| d.closer()).collect()
    }
}

enum Candidate<'a> {
    /// The outermost delimiter closed at byte offset `end` (exclusive).
    Balanced { text: &'a str, end: usize },
    /// Input ran out with delimiters still open.
    Truncated { text: &'a str },
}

/// Locates the first JSON object or array in `text` and parses it, repairing
/// common model-output malformations when a plain parse fails.
pub fn extract_json(text: &str) -> Result<ExtractedJson, JsonExtractError> {
    let start = text
        .find(|c: char| c == '{' || c == '[')
        .ok_or(JsonExtractError::NoJsonFound)?;

    let (candidate, consumed) = match scan_candidate(text, start) {
        Candidate::Balanced { text, end } => (text, end),
        Candidate::Truncated { text: rest } => (trim_trailing_fence(rest), text.len()),
    };

    if let Ok(value) = serde_json::from_str::<Value>(candidate) {
        return Ok(ExtractedJson {
            value,
            consumed,
            repairs: Vec::new(),
        });
    }

    let mut working = candidate.to_string();
    let mut applied = Vec::new();

    for repair in REPAIR_SEQUENCE {
        let repaired = match repair {
            Repair::CloseString => close_unterminated_string(&working),
            Repair::CloseDelimiters => close_open_delimiters(&working),
            Repair::StripTrailingCommas => strip_trailing_commas(&working),
            Repair::NormalizeQuotes => normalize_single_quotes(&working),
        };
        let Some(repaired) = repaired else {
            continue;
        };

        working = repaired;
        applied.push(repair);

        if let Ok(value) = serde_json::from_str::<Value>(&working) {
            return Ok(ExtractedJson {
                value,
                consumed,
                repairs: applied,
            });
        }
    }

    Err(JsonExtractError::UnrecoverableJson {
        candidate: candidate.to_string(),
    })
}

fn scan_candidate(text: &str, start: usize) -> Candidate<'_> {
    let mut state = ParseState::default();
    for (offset, c) in text[start..].char_indices() {
        if state.feed(start + offset, c) == Step::Closed {
            let end = state.pos + c.len_utf8();
            return Candidate::Balanced {
                text: &text[start..end],
                end,
            };
        }
    }
    Candidate::Truncated {
        text: &text[start..],
    }
}

/// Runs the scanner over the whole of `text` without stopping at the first close.
fn scan_all(text: &str) -> ParseState {
    let mut state = ParseState::default();
    for (pos, c) in text.char_indices() {
        state.feed(pos, c);
    }
    state
}

/// Truncated output often still carries the closing code fence of a ```json block.
fn trim_trailing_fence(text: &str) -> &str {
    let trimmed = text.trim_end();
    match trimmed.strip_suffix("```") {
        Some(rest) => rest.trim_end(),
        None => trimmed,
    }
}

/// Closes a string left open at end of input.
///
/// Trailing `}`/`]` characters that exactly close the open delimiters are treated
/// as structure rather than string content, so `{"a": "xyz}` becomes `{"a": "xyz"}`.
fn close_unterminated_string(text: &str) -> Option<String> {
    let state = scan_all(text);
    if !state.in_string {
        return None;
    }

    let mut body = text.trim_end();
    if state.escaped {
        body = body.strip_suffix('\\').unwrap_or(body);
    }

    let expected = state.pending_closers();
    let run_len = body
        .chars()
        .rev()
        .take_while(|c| *c == '}' || *c == ']')
        .count();

    // Closers are ASCII, so char counts are byte counts here.
    let structural = (1..=run_len.min(expected.len()))
        .rev()
        .find(|&k| {
            let suffix = &body[body.len() - k..];
            suffix == &expected[..k]
        })
        .unwrap_or(0);

    let split = body.len() - structural;
    let content = body[..split].trim_end();
    Some(format!("{content}\"{}", &body[split..]))
}

/// Appends the closers needed to balance every still-open delimiter.
fn close_open_delimiters(text: &str) -> Option<String> {
    let state = scan_all(text);
    if state.stack.is_empty() || state.in_string {
        return None;
    }
    Some(format!("{}{}", text.trim_end(), state.pending_closers()))
}

/// Removes commas that directly precede a closing `}` or `]`, ignoring string contents.
fn strip_trailing_commas(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut removed = false;

    for (pos, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = text[pos + 1..].chars().find(|n| !n.is_whitespace());
                if matches!(next, Some('}') | Some(']')) {
                    removed = true;
                } else {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }

    removed.then_some(out)
}

/// Rewrites single-quoted strings as double-quoted JSON strings.
fn normalize_single_quotes(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    let mut in_double = false;
    let mut escaped = false;
    let mut changed = false;

    while let Some(c) = chars.next() {
        if in_double {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_double = false;
            }
            out.push(c);
            continue;
        }

        match c {
            '"' => {
                in_double = true;
                out.push(c);
            }
            '\'' => {
                changed = true;
                out.push('"');
                while let Some(inner) = chars.next() {
                    match inner {
                        '\'' => break,
                        '\\' => match chars.next() {
                            Some('\'') => out.push('\''),
                            Some(other) => {
                                out.push('\\');
                                out.push(other);
                            }
                            None => {}
                        },
                        '"' => out.push_str("\\\""),
                        other => out.push(other),
                    }
                }
                out.push('"');
            }
            _ => out.push(c),
        }
    }

    changed.then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_object_parses_without_repairs() {
        let extracted = extract_json(r#"{"jobTitle": "Backend Engineer", "maxCandidates": 10}"#)
            .unwrap();
        assert_eq!(
            extracted.value,
            json!({"jobTitle": "Backend Engineer", "maxCandidates": 10})
        );
        assert!(extracted.repairs.is_empty());
    }

    #[test]
    fn test_object_surrounded_by_prose() {
        let text = "Sure! Here is the analysis you asked for:\n\
            {\"skills\": [\"Rust\", \"SQL\"], \"gpa\": 3.8, \"remote\": true, \"notes\": null}\n\
            Let me know if you need anything else.";
        let extracted = extract_json(text).unwrap();
        assert_eq!(
            extracted.value,
            json!({"skills": ["Rust", "SQL"], "gpa": 3.8, "remote": true, "notes": null})
        );
    }

    #[test]
    fn test_fenced_block_matches_unfenced() {
        let raw = r#"{"a": {"b": [1, 2, {"c": "d"}]}}"#;
        let fenced = format!("```json\n{raw}\n```");
        assert_eq!(
            extract_json(&fenced).unwrap().value,
            extract_json(raw).unwrap().value
        );
    }

    #[test]
    fn test_first_of_two_objects_wins() {
        let text = r#"{"first": 1} and then {"second": 2}"#;
        let extracted = extract_json(text).unwrap();
        assert_eq!(extracted.value, json!({"first": 1}));
        assert_eq!(extracted.consumed, r#"{"first": 1}"#.len());
    }

    #[test]
    fn test_consumed_is_byte_offset_past_candidate() {
        let text = "Résumé → {\"name\": \"José\"} trailing";
        let extracted = extract_json(text).unwrap();
        let expected_end = text.find('}').unwrap() + 1;
        assert_eq!(extracted.consumed, expected_end);
        assert_eq!(&text[expected_end..], " trailing");
    }

    #[test]
    fn test_closing_brace_inside_string_does_not_end_scan() {
        let text = r#"{"template": "use {name} and [list]}", "ok": true} tail }"#;
        let extracted = extract_json(text).unwrap();
        assert_eq!(
            extracted.value,
            json!({"template": "use {name} and [list]}", "ok": true})
        );
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let text = r#"{"quote": "she said \"ship it\" {now}", "path": "C:\\tmp\\"}"#;
        let extracted = extract_json(text).unwrap();
        assert_eq!(extracted.value["quote"], "she said \"ship it\" {now}");
        assert_eq!(extracted.value["path"], "C:\\tmp\\");
    }

    #[test]
    fn test_deeply_nested_structure() {
        let text = r#"{"a": [{"b": [[{"c": {"d": [1, [2, [3]]]}}]]}]}"#;
        let extracted = extract_json(text).unwrap();
        assert_eq!(extracted.value["a"][0]["b"][0][0]["c"]["d"][1][1][0], 3);
    }

    #[test]
    fn test_empty_object_and_array_payloads() {
        assert_eq!(extract_json("{}").unwrap().value, json!({}));
        assert_eq!(extract_json("result: []").unwrap().value, json!([]));
    }

    #[test]
    fn test_top_level_array() {
        let extracted = extract_json("Skills: [\"Rust\", 3, false, null] done").unwrap();
        assert_eq!(extracted.value, json!(["Rust", 3, false, null]));
    }

    #[test]
    fn test_no_json_found() {
        assert_eq!(
            extract_json("I could not analyze this resume, sorry.").unwrap_err(),
            JsonExtractError::NoJsonFound
        );
        assert_eq!(extract_json("").unwrap_err(), JsonExtractError::NoJsonFound);
    }

    #[test]
    fn test_trailing_comma_before_brace_is_stripped() {
        let extracted = extract_json(r#"{"a": 1, "b": [1, 2,], }"#).unwrap();
        assert_eq!(extracted.value, json!({"a": 1, "b": [1, 2]}));
        assert_eq!(extracted.repairs, vec![Repair::StripTrailingCommas]);
    }

    #[test]
    fn test_comma_inside_string_is_preserved() {
        let extracted = extract_json(r#"{"a": "x, }", "b": 2,}"#).unwrap();
        assert_eq!(extracted.value, json!({"a": "x, }", "b": 2}));
    }

    #[test]
    fn test_truncated_string_with_balanced_closer() {
        let extracted = extract_json(r#"{"jobTitle": "Backend Eng}"#).unwrap();
        assert_eq!(extracted.value, json!({"jobTitle": "Backend Eng"}));
        assert_eq!(extracted.repairs, vec![Repair::CloseString]);
    }

    #[test]
    fn test_truncated_mid_string_closes_string_and_delimiters() {
        let text = r#"Here you go: {"skills": ["Rust", "Kubern"#;
        let extracted = extract_json(text).unwrap();
        assert_eq!(extracted.value, json!({"skills": ["Rust", "Kubern"]}));
        assert_eq!(
            extracted.repairs,
            vec![Repair::CloseString, Repair::CloseDelimiters]
        );
        assert_eq!(extracted.consumed, text.len());
    }

    #[test]
    fn test_truncated_after_comma_needs_all_structural_repairs() {
        let extracted = extract_json("```json\n{\"a\": [1, 2,\n```").unwrap();
        assert_eq!(extracted.value, json!({"a": [1, 2]}));
        assert_eq!(
            extracted.repairs,
            vec![Repair::CloseDelimiters, Repair::StripTrailingCommas]
        );
    }

    #[test]
    fn test_dangling_escape_is_dropped() {
        let extracted = extract_json(r#"{"a": "line\"#).unwrap();
        assert_eq!(extracted.value, json!({"a": "line"}));
    }

    #[test]
    fn test_single_quoted_strings_are_normalized() {
        let extracted = extract_json("{'name': 'O\\'Brien', 'quote': 'say \"hi\"'}").unwrap();
        assert_eq!(
            extracted.value,
            json!({"name": "O'Brien", "quote": "say \"hi\""})
        );
        assert_eq!(extracted.repairs, vec![Repair::NormalizeQuotes]);
    }

    #[test]
    fn test_unrecoverable_reports_candidate() {
        let err = extract_json(r#"prefix {"a": nope} suffix"#).unwrap_err();
        assert_eq!(
            err,
            JsonExtractError::UnrecoverableJson {
                candidate: r#"{"a": nope}"#.to_string()
            }
        );
    }

    #[test]
    fn test_mismatched_closer_is_unrecoverable() {
        let err = extract_json(r#"{"a": [1, 2}"#).unwrap_err();
        assert!(matches!(err, JsonExtractError::UnrecoverableJson { .. }));
    }

    #[test]
    fn test_bracket_inside_single_quoted_string_ends_candidate() {
        let err = extract_json("{'a': '}', 'b': 2}").unwrap_err();
        assert_eq!(
            err,
            JsonExtractError::UnrecoverableJson {
                candidate: "{'a': '}".to_string()
            }
        );
    }

    #[test]
    fn test_truncated_key_is_unrecoverable() {
        let err = extract_json(r#"{"a": 1, "b"#).unwrap_err();
        assert_eq!(
            err,
            JsonExtractError::UnrecoverableJson {
                candidate: r#"{"a": 1, "b"#.to_string()
            }
        );
    }

    #[test]
    fn test_truncated_bare_literal_is_unrecoverable() {
        let err = extract_json(r#"{"a": 1.5, "b": tr"#).unwrap_err();
        assert_eq!(
            err,
            JsonExtractError::UnrecoverableJson {
                candidate: r#"{"a": 1.5, "b": tr"#.to_string()
            }
        );
    }

    #[test]
    fn test_round_trip_is_stable() {
        let inputs = [
            "prose {\"a\": [1, 2.5, true, null, {\"b\": \"c\"}]} prose",
            "```json\n{\"title\": \"Dev\", \"tags\": [\"x\",],}\n```",
            "{\"name\": \"truncat",
        ];
        for input in inputs {
            let first = extract_json(input).unwrap().value;
            let serialized = serde_json::to_string(&first).unwrap();
            let second = extract_json(&serialized).unwrap();
            assert_eq!(second.value, first, "input: {input}");
            assert!(second.repairs.is_empty());
        }
    }

    #[test]
    fn test_input_text_is_left_untouched() {
        let text = String::from("{\"a\": 1,}");
        let before = text.clone();
        let _ = extract_json(&text);
        assert_eq!(text, before);
    }
}
