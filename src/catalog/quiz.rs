// src/catalog/quiz.rs

use crate::models::{lesson::Quiz, progress::QuizGrade};

/// Grades answers given in question order.
///
/// Matching is strict string equality with the expected answer; a missing
/// answer counts as wrong.
pub fn grade_quiz(quiz: &Quiz, answers: &[String]) -> QuizGrade {
    let results: Vec<bool> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| answers.get(i).is_some_and(|a| *a == q.correct_answer))
        .collect();

    let total = results.len();
    let correct = results.iter().filter(|ok| **ok).count();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };

    QuizGrade {
        correct,
        total,
        accuracy,
        results,
    }
}
