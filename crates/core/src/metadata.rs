//! Generation-metadata parsing.
//!
//! Generated images carry a text blob of the form:
//!
//! ```text
//! a red fox, sitting in snow
//! Negative prompt: blurry, low quality
//! Steps: 20, Sampler: "Euler a", Seed: 42, Size: 512x512
//! ```
//!
//! Parsing happens once at ingestion; the structured result is stored on
//! the entry and never re-derived on read.

use std::collections::HashMap;

/// Parameter keys that mark the start of the generation-parameter section.
const PARAM_MARKERS: [&str; 5] = ["Steps:", "Sampler:", "Seed:", "Size:", "Model:"];

/// Structured form of a raw metadata blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMetadata {
    /// Prompt text (lines before the negative-prompt marker).
    pub prompt: String,
    /// Prompt split on commas, trimmed and lowercased, for tag counting.
    pub prompt_words: Vec<String>,
    /// Negative prompt text.
    pub negative_prompt: String,
    /// Key/value generation parameters.
    pub generation_params: HashMap<String, String>,
}

/// Split a comma-delimited `Key: value` blob into a map.
///
/// Commas inside double-quoted values do not split; a piece without a
/// colon is malformed and dropped silently. One pair of surrounding quotes
/// is stripped from values.
#[must_use]
pub fn parse_parameter_blob(blob: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();

    for piece in split_outside_quotes(blob) {
        let Some((key, value)) = piece.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        params.insert(key.to_string(), strip_quotes(value.trim()).to_string());
    }

    params
}

/// Split on commas that are not inside a double-quoted span.
fn split_outside_quotes(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                pieces.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);

    pieces
}

/// Strip one pair of surrounding double quotes, if present.
fn strip_quotes(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Comma-delimited words of a prompt, trimmed and lowercased.
///
/// Feeds the common-tag aggregator and the group listing payload.
#[must_use]
pub fn prompt_words(prompt: &str) -> Vec<String> {
    prompt
        .lines()
        .flat_map(|line| line.split(','))
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

/// Parse a full raw metadata blob into its structured form.
///
/// Lines before `Negative prompt:` are the prompt. The negative prompt
/// runs until a line carrying one of the known parameter markers; that
/// line and everything after it feed [`parse_parameter_blob`].
#[must_use]
pub fn parse_metadata(raw: &str) -> ParsedMetadata {
    if raw.is_empty() {
        return ParsedMetadata::default();
    }

    #[derive(PartialEq)]
    enum Section {
        Prompt,
        NegativePrompt,
        Params,
    }

    let mut prompt_lines: Vec<&str> = Vec::new();
    let mut negative_lines: Vec<&str> = Vec::new();
    let mut generation_params = HashMap::new();
    let mut section = Section::Prompt;

    for line in raw.lines() {
        if let Some(rest) = line.strip_prefix("Negative prompt:") {
            section = Section::NegativePrompt;
            let rest = rest.trim();
            if !rest.is_empty() {
                negative_lines.push(rest);
            }
            continue;
        }

        match section {
            Section::Prompt => {
                if !line.trim().is_empty() {
                    prompt_lines.push(line.trim());
                }
            }
            Section::NegativePrompt => {
                if PARAM_MARKERS.iter().any(|m| line.contains(m)) {
                    section = Section::Params;
                    generation_params.extend(parse_parameter_blob(line));
                } else if !line.trim().is_empty() {
                    negative_lines.push(line.trim());
                }
            }
            Section::Params => {
                generation_params.extend(parse_parameter_blob(line));
            }
        }
    }

    let prompt = prompt_lines.join("\n");

    ParsedMetadata {
        prompt_words: prompt_words(&prompt),
        prompt,
        negative_prompt: negative_lines.join("\n"),
        generation_params,
    }
}
