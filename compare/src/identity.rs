//! Best-effort name heuristic for the advisory "logic analysis" tag.
//!
//! Strictly metadata attached after scoring; never feeds back into the score.

/// Same extracted name but the pair scored below the medium band.
pub const TAG_SAME_PERSON_MISMATCH: &str = "same-person-mismatch";

/// Different extracted names but the pair scored at or above the medium band.
pub const TAG_DIFFERENT_PERSON_HIGH: &str = "different-person-high-similarity";

/// Extracts a person-name token from a file name.
///
/// Looks for a run of 2-4 CJK characters first (e.g. "胡亚军1.wav" ->
/// "胡亚军"), then for an ASCII alphabetic run of at least 2 characters
/// (spaces allowed, e.g. "Anna Smith_2.wav" -> "Anna Smith"). Returns `None`
/// when neither pattern matches; callers treat that as "no tag".
pub fn extract_name(file_name: &str) -> Option<String> {
    let stem = file_name
        .rsplit_once('.')
        .map(|(s, _)| s)
        .unwrap_or(file_name);

    // CJK run first; longer runs keep their first 4 characters.
    let mut run = String::new();
    for ch in stem.chars() {
        if ('\u{4e00}'..='\u{9fff}').contains(&ch) {
            if run.chars().count() < 4 {
                run.push(ch);
            }
        } else if run.chars().count() >= 2 {
            break;
        } else {
            run.clear();
        }
    }
    if run.chars().count() >= 2 {
        return Some(run);
    }

    // ASCII alphabetic run, spaces allowed inside.
    let mut run = String::new();
    for ch in stem.chars() {
        if ch.is_ascii_alphabetic() || ch == ' ' {
            run.push(ch);
        } else if run.trim().len() >= 2 {
            break;
        } else {
            run.clear();
        }
    }
    let run = run.trim();
    if run.len() >= 2 {
        return Some(run.to_string());
    }

    None
}

/// Classifies a successful pair against the name heuristic.
///
/// `medium` is the band cutoff the tags key on. Returns `None` when either
/// name cannot be parsed or the combination is unremarkable.
pub fn analyze_pair(
    file1: &str,
    file2: &str,
    score: f64,
    medium: f64,
) -> Option<&'static str> {
    let name1 = extract_name(file1)?;
    let name2 = extract_name(file2)?;

    if name1 == name2 && score < medium {
        return Some(TAG_SAME_PERSON_MISMATCH);
    }
    if name1 != name2 && score >= medium {
        return Some(TAG_DIFFERENT_PERSON_HIGH);
    }
    None
}
