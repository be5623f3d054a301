/// Fuzzy skill comparison: case-insensitive substring containment in either direction.
///
/// Strings are compared as given. An empty string is contained in every skill, so
/// callers that accept user input drop blank skills before they get here.
#[inline]
pub fn skill_matches(candidate_skill: &str, required_skill: &str) -> bool {
    let candidate = candidate_skill.to_lowercase();
    let required = required_skill.to_lowercase();

    candidate.contains(&required) || required.contains(&candidate)
}

/// Calculate the skill overlap score (0-1) and the required skills that were matched
///
/// The denominator is the larger of the two skill lists (and at least 1), so a
/// candidate with many unrelated skills scores lower than one with a tight match.
pub fn skill_overlap(required: &[String], candidate: &[String]) -> (f64, Vec<String>) {
    let matched: Vec<String> = required
        .iter()
        .filter(|req| candidate.iter().any(|skill| skill_matches(skill, req)))
        .cloned()
        .collect();

    let denominator = required.len().max(candidate.len()).max(1) as f64;

    (matched.len() as f64 / denominator, matched)
}
