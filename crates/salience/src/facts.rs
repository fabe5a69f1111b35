//! Atomic fact extraction.
//!
//! Texts are split into sentences and every sentence is rewritten by the
//! model into a list of atomic facts with a few-shot prompt.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::dataset::Document;
use crate::error::Result;
use crate::llm::prompts::fact_extraction_prompt;
use crate::llm::{first_completions, repair_json, user_conversation, GenerationService, SamplingParams};
use crate::text::{RuleSegmenter, SentenceSegmenter};

/// One fact of one sentence of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    pub doc_id: String,
    pub sent_id: usize,
    pub sent: String,
    pub fact: String,
}

/// Facts of one sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceFacts {
    /// Position of the source text in the input.
    pub text_index: usize,
    pub sent_id: usize,
    pub sent: String,
    pub facts: Vec<String>,
}

/// Extracts atomic facts sentence by sentence.
pub struct FactExtractor<'a> {
    generator: &'a dyn GenerationService,
    segmenter: Box<dyn SentenceSegmenter>,
    params: SamplingParams,
}

impl<'a> FactExtractor<'a> {
    /// Greedy decoding with up to 1024 tokens per sentence.
    pub fn new(generator: &'a dyn GenerationService) -> Self {
        Self {
            generator,
            segmenter: Box::new(RuleSegmenter::new()),
            params: SamplingParams::new(0.0, 1024),
        }
    }

    pub fn with_segmenter(mut self, segmenter: impl SentenceSegmenter + 'static) -> Self {
        self.segmenter = Box::new(segmenter);
        self
    }

    pub fn with_params(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    /// Facts of every sentence of every text, in one generation batch.
    pub fn extract_texts(&self, texts: &[&str]) -> Result<Vec<SentenceFacts>> {
        let mut sentences = Vec::new();
        for (text_index, text) in texts.iter().enumerate() {
            for (sent_id, sent) in self.segmenter.segment(text)?.into_iter().enumerate() {
                sentences.push((text_index, sent_id, sent));
            }
        }
        info!("extracting facts from {} sentences", sentences.len());

        let prompts: Vec<_> = sentences
            .iter()
            .map(|(_, _, sent)| user_conversation(fact_extraction_prompt(sent)))
            .collect();
        let responses = first_completions(self.generator.generate(&prompts, &self.params)?);

        Ok(sentences
            .into_iter()
            .zip(responses)
            .map(|((text_index, sent_id, sent), response)| SentenceFacts {
                text_index,
                sent_id,
                sent,
                facts: response.map(|r| parse_facts(&r)).unwrap_or_default(),
            })
            .collect())
    }

    /// One record per fact for a set of documents.
    pub fn extract_documents(&self, documents: &[Document]) -> Result<Vec<FactRecord>> {
        let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
        let sentence_facts = self.extract_texts(&texts)?;

        Ok(sentence_facts
            .into_iter()
            .flat_map(|sf| {
                let doc_id = documents[sf.text_index].doc_id.clone();
                sf.facts.into_iter().map(move |fact| FactRecord {
                    doc_id: doc_id.clone(),
                    sent_id: sf.sent_id,
                    sent: sf.sent.clone(),
                    fact,
                })
            })
            .collect())
    }
}

/// Facts from a response: a list of strings, or the raw response as a
/// single fact when it is anything else.
pub fn parse_facts(response: &str) -> Vec<String> {
    match repair_json(response) {
        Ok(Value::Array(items)) if items.iter().all(Value::is_string) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => {
            warn!(response = %response, "failed to parse facts");
            vec![response.trim().to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockGenerator;

    #[test]
    fn test_parse_facts() {
        assert_eq!(
            parse_facts(r#"["A was done.", "B was found."]"#),
            vec!["A was done.", "B was found."]
        );
        assert_eq!(
            parse_facts("Output:\n['A was done.', 'B was found.']"),
            vec!["A was done.", "B was found."]
        );
        assert_eq!(parse_facts("I cannot split this."), vec!["I cannot split this."]);
        assert_eq!(parse_facts("[1, 2]"), vec!["[1, 2]"]);
    }

    #[test]
    fn test_extract_documents_one_row_per_fact() {
        let mock = MockGenerator::with_responses([
            r#"["The trial enrolled patients.", "There were 54 patients."]"#,
            r#"["Half received a supplement."]"#,
            r#"["The study was short."]"#,
        ]);
        let docs = vec![
            Document::new("d1", "The trial enrolled 54 patients. Half received a supplement."),
            Document::new("d2", "The study was short."),
        ];

        let records = FactExtractor::new(&mock).extract_documents(&docs).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].doc_id, "d1");
        assert_eq!(records[1].sent_id, 0);
        assert_eq!(records[1].fact, "There were 54 patients.");
        assert_eq!(records[2].sent_id, 1);
        assert_eq!(records[2].sent, "Half received a supplement.");
        assert_eq!(records[3].doc_id, "d2");

        let prompt = &mock.received()[0][0].content;
        assert!(prompt.ends_with("Sentence: The trial enrolled 54 patients.\nOutput:"));
    }
}
