//! Prompt templates for LLM interactions.

use std::fmt::Write;

/// Build the question importance rating prompt.
///
/// Questions are listed with 1-based positions; the response format asks the
/// model to echo each position and question so the answer can be checked.
pub fn rating_prompt(
    task: &str,
    questions: &[&str],
    length_constraint: &str,
    with_rationale: bool,
) -> String {
    let mut question_list = String::new();
    for (i, question) in questions.iter().enumerate() {
        let _ = writeln!(question_list, "{}. {}", i + 1, question);
    }

    let (rationale_instruction, rationale_field) = if with_rationale {
        (
            "\nFor each rating, please provide a brief (1-sentence) rationale explaining your \
             decision or highlighting any considerations or uncertainties you had.\n",
            "\n        \"rationale\": \"[your one-sentence rationale for the rating]\",",
        )
    } else {
        ("", "")
    };

    format!(
        r#"## Task
{task} The summary length is constrained, requiring you to think about what content to prioritize. Ask yourself: what are some key questions you want the summary to answer? Your task is to rate the relative importance of a list of questions that the summary could answer.

## Questions
Here is the list of questions you should evaluate.

{question_list}
## Rating
Please use the following scale, going from least important to most important.

1 - Least important; I would exclude this information from a summary.
2 - Low importance; I would include this information if there is room.
3 - Medium importance; I would probably include this information.
4 - High importance; I would definitely include this information.
5 - Most important; One of the first questions to be answered in the summary.
{rationale_instruction}
Important considerations:
- Use the full scale (1-5) to express relative importance.
- {length_constraint}
- Make sure to rate all given questions.

Please respond as a valid JSON list with following format:

[
    {{
        "id": "[the question number]",
        "question": "[repeat the exact question]",{rationale_field}
        "rating": "[your numeric rating, 1-5]"
    }}
]"#
    )
}

/// Build the abstractive summarization prompt for a document.
pub fn summary_prompt(text: &str, length_target: usize) -> String {
    format!(
        r#"## Document
{text}

## Instruction
Please summarize the above document. Use up to {length_target} words. Respond exactly in following JSON format:

{{
    "summary": "(the {length_target} words summary)"
}}"#
    )
}

/// Build the abstractive summarization prompt for a meeting transcript.
pub fn meeting_summary_prompt(text: &str, length_target: usize) -> String {
    format!(
        r#"## Meeting Transcript
{text}

## Instruction
Please summarize the above meeting transcript. Use up to {length_target} words. Respond exactly in following JSON format:

{{
    "summary": "(the {length_target} words summary)"
}}"#
    )
}

/// Worked examples for splitting a sentence into atomic facts.
const FACT_EXAMPLES: &[(&str, &[&str])] = &[
    (
        "Protein-rich nutrition is necessary for wound healing after surgery.",
        &[
            "Protein-rich nutrition is necessary for wound healing.",
            "Wound healing occurs after surgery.",
        ],
    ),
    (
        "A prospective study was planned with the approval of our institutional review board.",
        &[
            "A prospective study was planned.",
            "The study was approved by our institutional review board.",
        ],
    ),
    (
        "There were 27 patients in the control group who were fed with only normal diet.",
        &[
            "There were 27 patients in the control group.",
            "The control group was fed with only normal diet.",
        ],
    ),
    (
        "Patients who were malnourished, diabetic or who had undergone bronchoplastic procedures or neoadjuvant therapy were excluded from the study.",
        &[
            "Patients who were malnourished were excluded from the study.",
            "Patients who were diabetic were excluded from the study.",
            "Patients who had undergone bronchoplastic procedures were excluded from the study.",
            "Patients who had undergone neoadjuvant therapy were excluded from the study.",
        ],
    ),
    (
        "Complications developed in 12 patients (44.4 %) in the control group compared to 6 patients in the nutrition group (p = 0.049).",
        &[
            "Complications developed in 12 patients (44.4 %) in the control group.",
            "Complications developed in 6 patients in the nutrition group.",
            "The difference in complication rates between the control group and nutrition groups was statistically significant (p = 0.049).",
        ],
    ),
];

/// Build the few-shot prompt that splits one sentence into atomic facts.
pub fn fact_extraction_prompt(sentence: &str) -> String {
    let mut prompt = String::from(
        "You split sentences into a list of facts that we explicitly know from the sentence. \
         Make each fact as atomic as possible.\n\n",
    );

    for (example, facts) in FACT_EXAMPLES {
        let _ = writeln!(prompt, "Sentence: {}\nOutput:\n[", example);
        for (i, fact) in facts.iter().enumerate() {
            let sep = if i + 1 < facts.len() { "," } else { "" };
            let _ = writeln!(prompt, "    \"{}\"{}", fact, sep);
        }
        prompt.push_str("]\n\n");
    }

    let _ = write!(
        prompt,
        "Here is a new sentence. Please split it into a list of facts that we explicitly know \
         from the sentence. Make each fact as atomic as possible. Output the facts as a JSON \
         list of strings. Only output the list, nothing more.\n\nSentence: {}\nOutput:",
        sentence
    );
    prompt
}

/// Build the question generation prompt over a batch of multi-length summaries.
///
/// Each document is a list of `(length, summary)` pairs.
pub fn question_generation_prompt(documents: &[Vec<(usize, String)>], genre_topic: &str) -> String {
    let mut dataset = String::new();
    for (i, document) in documents.iter().enumerate() {
        let _ = writeln!(dataset, "## Document {}\n", i + 1);
        for (length, text) in document {
            let _ = writeln!(dataset, "### Summary {} words\n{}\n", length, text);
        }
    }

    let lengths: Vec<usize> = documents
        .first()
        .map(|doc| doc.iter().map(|(length, _)| *length).collect())
        .unwrap_or_default();
    let length_list = lengths
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let format_keys = lengths
        .iter()
        .map(|l| {
            format!(
                "    \"questions_{}_words\": [\n        {{\n            \"question\": \"\",\n            \"example_answer\": \"\"\n        }}\n    ]",
                l
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        r#"Your task is to analyze summaries of different lengths within a given genre. Your goal is to create question-answer pairs that capture the essence of information typically included in various summary lengths. Below is the dataset where each document was summarized in {count} different lengths.

# Dataset

{dataset}
# Genre
The genre of the documents: {genre_topic}

# Task
Each text in the dataset has been summarized in {count} different lengths (in {length_list} words). Your task is to analyze the summaries and identify the types of information typically included at each summary length. To do this, please proceed as follows:

1. Carefully read the summaries, paying attention to what information is included or omitted.
2. For each summary length, create a set of question-answer pairs that represent typical information included at this length. The questions should be general enough to apply to many documents in this genre, while the answers will naturally be different across documents.

Important guidelines:
- Ensure that your questions are relevant to the genre and capture information that would be commonly found in texts of this type.
- It is really important that the questions are answerable with most documents in this genre, not just with the ones presented here! To this end, state a prototypical answer to each question.
- The questions should be unique to each length. That means, do not repeat a question if it is already sufficiently covered at the shorter length.
- Start with question words (What, How, Why, Which) rather than 'Can you'
- Make the topic the grammatical subject of a question.
- Keep the questions concise and focused.
- Create at least 3-5 questions for each summary length.

Structure your response as a valid json object with the following format:

{{
{format_keys}
}}"#,
        count = lengths.len(),
    )
}

/// Build the question answering prompt.
pub fn qa_prompt(text: &str, question: &str) -> String {
    format!(
        r#"Answer the following question given the text. If the question cannot be answered with the text, reply "no answer".

## Text
{text}

## Question
{question}

First, carefully read and analyze both the text and the question. Then provide the answer. Please follow these guidelines:
- If the question cannot be answered, reply with "no answer"
- Use only information explicitly stated in or directly implied by the text
- Do not include any external knowledge or personal opinions
- Aim for concise answers that include all important points relevant to the question

Please use this format for your response:
Question: [restate the question exactly]
Answer: [the answer based on the text or "no answer"]"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_prompt_numbers_questions() {
        let prompt = rating_prompt(
            "You are an expert.",
            &["What was studied?", "Who took part?"],
            "Space is limited.",
            true,
        );
        assert!(prompt.contains("1. What was studied?\n2. Who took part?"));
        assert!(prompt.contains("- Space is limited."));
        assert!(prompt.contains("\"rationale\""));
    }

    #[test]
    fn test_rating_prompt_without_rationale() {
        let prompt = rating_prompt("Task.", &["Q?"], "Limited.", false);
        assert!(!prompt.contains("rationale"));
        assert!(prompt.contains("\"rating\""));
    }

    #[test]
    fn test_summary_prompts_mention_length() {
        assert!(summary_prompt("Doc.", 50).contains("Use up to 50 words"));
        assert!(meeting_summary_prompt("Doc.", 10).contains("## Meeting Transcript"));
    }

    #[test]
    fn test_fact_prompt_ends_with_sentence() {
        let prompt = fact_extraction_prompt("The trial ended early.");
        assert!(prompt.ends_with("Sentence: The trial ended early.\nOutput:"));
        assert!(prompt.contains("\"Wound healing occurs after surgery.\"\n]"));
    }

    #[test]
    fn test_question_generation_prompt_lists_lengths() {
        let docs = vec![vec![(10, "Short.".to_string()), (20, "Longer.".to_string())]];
        let prompt = question_generation_prompt(&docs, "Meeting transcripts.");
        assert!(prompt.contains("### Summary 20 words\nLonger."));
        assert!(prompt.contains("\"questions_10_words\""));
        assert!(prompt.contains("(in 10, 20 words)"));
        assert!(prompt.contains("The genre of the documents: Meeting transcripts."));
    }

    #[test]
    fn test_qa_prompt() {
        let prompt = qa_prompt("Body.", "What happened?");
        assert!(prompt.contains("## Question\nWhat happened?"));
        assert!(prompt.ends_with("\"no answer\"]"));
    }
}
