//! Arithmetic puzzles that unlock extra generations

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// Inline message shown for a wrong answer
pub const MISMATCH_MESSAGE: &str = "Incorrect answer, please try again.";

/// Why a puzzle submission was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleError {
    /// Nothing was typed
    #[error("Answer cannot be empty")]
    EmptyAnswer,
    /// The answer does not match
    #[error("{}", MISMATCH_MESSAGE)]
    Mismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Subtract,
    Multiply,
}

impl Operator {
    const ALL: [Operator; 3] = [Operator::Add, Operator::Subtract, Operator::Multiply];

    fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
        }
    }
}

/// A question and its expected answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    /// Text shown to the user, e.g. "What is 3 + 4?"
    pub question: String,
    /// Expected answer as a decimal string
    pub answer: String,
}

impl Puzzle {
    /// Generate a puzzle with the thread-local RNG
    pub fn random() -> Self {
        generate(&mut rand::thread_rng())
    }

    /// Whether `submitted` solves the puzzle
    pub fn check(&self, submitted: &str) -> bool {
        submitted.trim().to_lowercase() == self.answer
    }
}

/// Generate a puzzle with the given RNG
///
/// Subtraction operands are drawn so the result is never negative.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Puzzle {
    let op = *Operator::ALL
        .choose(rng)
        .unwrap_or(&Operator::Add);

    let (a, b): (i64, i64) = match op {
        Operator::Add => (rng.gen_range(1..=20), rng.gen_range(1..=20)),
        Operator::Subtract => {
            let a = rng.gen_range(5..=24);
            (a, rng.gen_range(1..=a))
        }
        Operator::Multiply => (rng.gen_range(2..=11), rng.gen_range(2..=11)),
    };

    let result = match op {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
        Operator::Multiply => a * b,
    };

    Puzzle {
        question: format!("What is {} {} {}?", a, op.symbol(), b),
        answer: result.to_string(),
    }
}

/// State of an open puzzle dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleDialog {
    /// The puzzle being asked
    pub puzzle: Puzzle,
    /// Answer typed so far
    pub answer: String,
    /// Inline error from the last submission
    pub error: Option<String>,
}

impl PuzzleDialog {
    /// Open a dialog for `puzzle`
    pub fn new(puzzle: Puzzle) -> Self {
        Self {
            puzzle,
            answer: String::new(),
            error: None,
        }
    }

    /// Replace the typed answer; clears any previous error
    pub fn set_answer(&mut self, answer: String) {
        self.answer = answer;
        self.error = None;
    }

    /// Whether the submit button should be enabled
    pub fn can_submit(&self) -> bool {
        !self.answer.trim().is_empty()
    }

    /// Check the typed answer
    pub fn submit(&mut self) -> Result<(), PuzzleError> {
        if !self.can_submit() {
            return Err(PuzzleError::EmptyAnswer);
        }
        if self.puzzle.check(&self.answer) {
            self.error = None;
            Ok(())
        } else {
            self.error = Some(MISMATCH_MESSAGE.to_string());
            Err(PuzzleError::Mismatch)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn parse_question(question: &str) -> (i64, char, i64) {
        let body = question
            .strip_prefix("What is ")
            .and_then(|q| q.strip_suffix('?'))
            .expect("question format");
        let parts: Vec<&str> = body.split(' ').collect();
        assert_eq!(parts.len(), 3, "unexpected question: {}", question);
        (
            parts[0].parse().unwrap(),
            parts[1].chars().next().unwrap(),
            parts[2].parse().unwrap(),
        )
    }

    #[test]
    fn test_thousand_puzzles_hold_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..1000 {
            let puzzle = generate(&mut rng);
            let (a, op, b) = parse_question(&puzzle.question);
            let answer: i64 = puzzle.answer.parse().expect("answer is an integer");
            seen.insert(op);

            match op {
                '+' => {
                    assert!((1..=20).contains(&a) && (1..=20).contains(&b));
                    assert_eq!(answer, a + b);
                }
                '-' => {
                    assert!((5..=24).contains(&a));
                    assert!((1..=a).contains(&b));
                    assert!(answer >= 0);
                    assert_eq!(answer, a - b);
                }
                '*' => {
                    assert!((2..=11).contains(&a) && (2..=11).contains(&b));
                    assert_eq!(answer, a * b);
                }
                other => panic!("unexpected operator {}", other),
            }
        }

        assert_eq!(seen.len(), 3, "all operators should appear");
    }

    #[test]
    fn test_check_normalizes_input() {
        let puzzle = Puzzle {
            question: "What is 2 + 2?".to_string(),
            answer: "4".to_string(),
        };
        assert!(puzzle.check("4"));
        assert!(puzzle.check("  4\n"));
        assert!(!puzzle.check("5"));
        assert!(!puzzle.check("four"));
        assert!(!puzzle.check("04"));
    }

    #[test]
    fn test_dialog_mismatch_keeps_dialog_state() {
        let mut dialog = PuzzleDialog::new(Puzzle {
            question: "What is 3 * 3?".to_string(),
            answer: "9".to_string(),
        });

        assert_eq!(dialog.submit(), Err(PuzzleError::EmptyAnswer));
        assert!(dialog.error.is_none());

        dialog.set_answer("8".to_string());
        assert_eq!(dialog.submit(), Err(PuzzleError::Mismatch));
        assert_eq!(dialog.error.as_deref(), Some(MISMATCH_MESSAGE));

        dialog.set_answer("9".to_string());
        assert!(dialog.error.is_none());
        assert_eq!(dialog.submit(), Ok(()));
    }
}
