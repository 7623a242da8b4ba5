use crate::models::{ClassLabel, ClassificationOutcome, Operator, Trial, Verdict};

/// Scores a classification against the operation that was prompted.
///
/// Only the class of the prompted operator counts as correct. Detecting the
/// other operation is scored the same as an unrecognized label.
pub fn evaluate(trial: &Trial, outcome: &ClassificationOutcome) -> Verdict {
    let matched = match (outcome.label, trial.operator) {
        (ClassLabel::AdditionClass, Operator::Add) => Some(Operator::Add),
        (ClassLabel::SubtractionClass, Operator::Subtract) => Some(Operator::Subtract),
        _ => None,
    };

    match matched {
        Some(operator) => Verdict {
            is_correct: true,
            computed_result: Some(operator.apply(trial.operand_a, trial.operand_b)),
        },
        None => Verdict {
            is_correct: false,
            computed_result: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(label: ClassLabel) -> ClassificationOutcome {
        ClassificationOutcome { label }
    }

    #[test]
    fn matching_label_yields_exact_result_for_every_operand_pair() {
        for a in 1..=9 {
            for b in 1..=9 {
                let add = evaluate(
                    &Trial::new(a, b, Operator::Add),
                    &outcome(ClassLabel::AdditionClass),
                );
                assert_eq!(
                    add,
                    Verdict {
                        is_correct: true,
                        computed_result: Some(a + b)
                    }
                );

                let sub = evaluate(
                    &Trial::new(a, b, Operator::Subtract),
                    &outcome(ClassLabel::SubtractionClass),
                );
                assert_eq!(
                    sub,
                    Verdict {
                        is_correct: true,
                        computed_result: Some(a - b)
                    }
                );
            }
        }
    }

    #[test]
    fn seven_minus_three() {
        let verdict = evaluate(
            &Trial::new(7, 3, Operator::Subtract),
            &outcome(ClassLabel::SubtractionClass),
        );
        assert!(verdict.is_correct);
        assert_eq!(verdict.computed_result, Some(4));
    }

    #[test]
    fn other_operation_is_blanket_incorrect() {
        let verdict = evaluate(
            &Trial::new(2, 5, Operator::Add),
            &outcome(ClassLabel::SubtractionClass),
        );
        assert_eq!(
            verdict,
            Verdict {
                is_correct: false,
                computed_result: None
            }
        );
    }

    #[test]
    fn unrecognized_has_no_result() {
        let verdict = evaluate(
            &Trial::new(4, 4, Operator::Subtract),
            &outcome(ClassLabel::Unrecognized),
        );
        assert!(!verdict.is_correct);
        assert_eq!(verdict.computed_result, None);
    }
}
