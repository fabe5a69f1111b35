//! Question answering over source documents.
//!
//! Every question is asked against every document. Answers that decline to
//! answer or cannot be parsed are normalized to [`NO_ANSWER`]; the remaining
//! answers can be split into atomic facts for comparison with summaries.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::dataset::{Document, Question};
use crate::error::Result;
use crate::facts::FactExtractor;
use crate::llm::prompts::qa_prompt;
use crate::llm::{first_completions, user_conversation, GenerationService, SamplingParams};

/// Canonical reply for questions the text does not answer.
pub const NO_ANSWER: &str = "no answer";

/// The answer to one question on one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub doc_id: String,
    pub cluster_id: String,
    pub question: String,
    /// The answer, or [`NO_ANSWER`] for declined and unparsable responses.
    pub reference_answer: String,
}

impl AnswerRecord {
    pub fn is_answered(&self) -> bool {
        self.reference_answer != NO_ANSWER
    }
}

/// One atomic fact of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerFactRecord {
    pub doc_id: String,
    pub cluster_id: String,
    pub question: String,
    pub sent_id: usize,
    pub sent: String,
    pub fact: String,
}

/// Answers questions from documents with a generation service.
pub struct QuestionAnswerer<'a> {
    generator: &'a dyn GenerationService,
    params: SamplingParams,
}

impl<'a> QuestionAnswerer<'a> {
    /// Temperature 0.7, up to 512 tokens per answer.
    pub fn new(generator: &'a dyn GenerationService) -> Self {
        Self {
            generator,
            params: SamplingParams::new(0.7, 512),
        }
    }

    pub fn with_params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    /// Answer every question on every document, document-major.
    pub fn answer(&self, documents: &[Document], questions: &[Question]) -> Result<Vec<AnswerRecord>> {
        let pairs: Vec<(&Document, &Question)> = documents
            .iter()
            .flat_map(|doc| questions.iter().map(move |q| (doc, q)))
            .collect();
        info!("answering {} question/document pairs", pairs.len());

        let prompts: Vec<_> = pairs
            .iter()
            .map(|(doc, q)| user_conversation(qa_prompt(&doc.text, &q.question)))
            .collect();
        let responses = first_completions(self.generator.generate(&prompts, &self.params)?);

        Ok(pairs
            .into_iter()
            .zip(responses)
            .map(|((doc, q), response)| {
                let reference_answer = match response.as_deref().and_then(parse_answer) {
                    Some(a) if !is_non_answer(&a) => a,
                    _ => NO_ANSWER.to_string(),
                };
                AnswerRecord {
                    doc_id: doc.doc_id.clone(),
                    cluster_id: q.cluster_id.clone(),
                    question: q.question.clone(),
                    reference_answer,
                }
            })
            .collect())
    }
}

/// Split answered records into atomic facts.
pub fn answer_facts(
    extractor: &FactExtractor<'_>,
    answers: &[AnswerRecord],
) -> Result<Vec<AnswerFactRecord>> {
    let answered: Vec<&AnswerRecord> = answers.iter().filter(|a| a.is_answered()).collect();
    let texts: Vec<&str> = answered
        .iter()
        .map(|a| a.reference_answer.as_str())
        .collect();

    Ok(extractor
        .extract_texts(&texts)?
        .into_iter()
        .flat_map(|sf| {
            let record = answered[sf.text_index];
            sf.facts.into_iter().map(move |fact| AnswerFactRecord {
                doc_id: record.doc_id.clone(),
                cluster_id: record.cluster_id.clone(),
                question: record.question.clone(),
                sent_id: sf.sent_id,
                sent: sf.sent.clone(),
                fact,
            })
        })
        .collect())
}

/// The text after `Answer:`, or `None` if the marker is missing.
pub fn parse_answer(response: &str) -> Option<String> {
    let response = response.trim();
    match response.find("Answer:") {
        Some(ix) => Some(response[ix + "Answer:".len()..].trim().to_string()),
        None => {
            warn!(response = %response, "failed to parse answer");
            None
        }
    }
}

/// Whether an answer declines to answer.
pub fn is_non_answer(answer: &str) -> bool {
    let lower = answer.trim().to_lowercase();
    if lower.is_empty() {
        return true;
    }
    if lower.starts_with("yes") {
        return false;
    }
    ["the text", "no mention", NO_ANSWER]
        .iter()
        .any(|phrase| lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockGenerator;

    #[test]
    fn test_parse_answer() {
        assert_eq!(
            parse_answer("Question: What?\nAnswer: 54 patients.").as_deref(),
            Some("54 patients.")
        );
        assert_eq!(parse_answer("I don't know"), None);
    }

    #[test]
    fn test_is_non_answer() {
        assert!(is_non_answer(""));
        assert!(is_non_answer("No answer"));
        assert!(is_non_answer("There is no mention of funding."));
        assert!(is_non_answer("The text does not say."));
        assert!(!is_non_answer("Yes, the text confirms it."));
        assert!(!is_non_answer("54 patients."));
    }

    #[test]
    fn test_answer_pairs_and_normalizes() {
        let mock = MockGenerator::with_responses([
            "Question: Q1\nAnswer: 54 patients.",
            "Question: Q2\nAnswer: The text does not mention it.",
            "garbled",
            "Answer: Yes.",
        ]);
        let docs = vec![Document::new("d1", "Text one."), Document::new("d2", "Text two.")];
        let questions = vec![Question::new("0", "Q1?"), Question::new("1", "Q2?")];

        let answers = QuestionAnswerer::new(&mock).answer(&docs, &questions).unwrap();
        assert_eq!(answers.len(), 4);
        assert_eq!(answers[0].reference_answer, "54 patients.");
        assert_eq!(answers[1].reference_answer, NO_ANSWER);
        assert_eq!(answers[2].doc_id, "d2");
        // Unparsable responses are written as non-answers.
        assert_eq!(answers[2].reference_answer, NO_ANSWER);
        assert_eq!(answers[3].cluster_id, "1");
        assert!(answers[0].is_answered());
        assert!(!answers[1].is_answered());
        assert!(!answers[2].is_answered());
    }

    #[test]
    fn test_answer_facts_only_for_answered() {
        let answers = vec![
            AnswerRecord {
                doc_id: "d1".into(),
                cluster_id: "0".into(),
                question: "Q?".into(),
                reference_answer: NO_ANSWER.into(),
            },
            AnswerRecord {
                doc_id: "d2".into(),
                cluster_id: "1".into(),
                question: "R?".into(),
                reference_answer: "It was small.".into(),
            },
        ];
        let mock = MockGenerator::with_responses([r#"["The study was small."]"#]);
        let facts = answer_facts(&FactExtractor::new(&mock), &answers).unwrap();

        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].doc_id, "d2");
        assert_eq!(facts[0].cluster_id, "1");
        assert_eq!(facts[0].fact, "The study was small.");
    }
}
