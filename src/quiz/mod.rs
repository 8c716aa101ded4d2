use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuizQuestion {
    pub fn new(question: String, options: Vec<String>, answer: String) -> Self {
        Self {
            question,
            options,
            answer,
        }
    }

    pub fn check(&self, selected: &str) -> AnswerOutcome {
        if selected.trim() == self.answer {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect {
                correct_answer: self.answer.clone(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect { correct_answer: String },
}

impl AnswerOutcome {
    pub fn message(&self) -> String {
        match self {
            AnswerOutcome::Correct => "Correct! 🎉".to_string(),
            AnswerOutcome::Incorrect { correct_answer } => {
                format!("Incorrect. The correct answer is: {}", correct_answer)
            }
        }
    }
}

/// Fixed question bank; a question is drawn fresh every time the quiz is opened.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct QuizPool {
    pub questions: Vec<QuizQuestion>,
}

impl QuizPool {
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        Self { questions }
    }

    pub fn random_question(&self) -> Option<&QuizQuestion> {
        self.pick_with(&mut rand::thread_rng())
    }

    pub fn pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&QuizQuestion> {
        self.questions.choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn pool() -> QuizPool {
        QuizPool::new(vec![
            QuizQuestion::new(
                "What is the function of a diode?".to_string(),
                vec![
                    "Amplify signals".to_string(),
                    "Allow current in one direction".to_string(),
                ],
                "Allow current in one direction".to_string(),
            ),
            QuizQuestion::new(
                "Which component amplifies signals?".to_string(),
                vec!["Resistor".to_string(), "Transistor".to_string()],
                "Transistor".to_string(),
            ),
        ])
    }

    #[test]
    fn every_question_is_eventually_drawn() {
        let pool = pool();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [0usize; 2];
        for _ in 0..200 {
            let question = pool.pick_with(&mut rng).unwrap();
            let index = pool.questions.iter().position(|q| q == question).unwrap();
            seen[index] += 1;
            assert_eq!(question.check(&question.answer), AnswerOutcome::Correct);
        }
        assert!(seen.iter().all(|&count| count > 0), "{:?}", seen);
    }

    #[test]
    fn empty_pool_draws_nothing() {
        assert!(QuizPool::default().random_question().is_none());
    }

    #[test]
    fn wrong_answer_names_the_correct_one() {
        let pool = pool();
        let outcome = pool.questions[1].check("Resistor");
        assert_eq!(
            outcome.message(),
            "Incorrect. The correct answer is: Transistor"
        );
        assert_eq!(pool.questions[1].check(" Transistor ").message(), "Correct! 🎉");
    }
}
