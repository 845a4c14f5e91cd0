//! Pure answer grading. No storage, no clocks.

use std::collections::BTreeSet;

use crate::error::ApiError;
use crate::models::Question;

/// Rejects selections that point outside the question's option list.
/// Out-of-range indices are a caller error, not something to silently
/// drop before grading.
pub fn validate_selection(question: &Question, selected: &[usize]) -> Result<(), ApiError> {
    let len = question.option_count();
    if let Some(&bad) = selected.iter().find(|&&index| index >= len) {
        return Err(ApiError::validation(
            "selected_answers",
            format!("index {} out of range (question has {} options)", bad, len),
        ));
    }
    Ok(())
}

/// Set equality between the submitted indices and the correct ones.
/// Submission order is irrelevant and duplicates collapse; multi-select
/// is all-or-nothing, no partial credit.
pub fn grade(question: &Question, selected: &[usize]) -> bool {
    let expected: BTreeSet<usize> = question.correct_answer.iter().copied().collect();
    let submitted: BTreeSet<usize> = selected.iter().copied().collect();
    expected == submitted
}
