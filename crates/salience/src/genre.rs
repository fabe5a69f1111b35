//! Document genres and summary-length constraints used in prompts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SalienceError;

/// Genre of a document collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    /// Randomized controlled trials from PubMed.
    #[serde(rename = "pubmed-sample")]
    Pubmed,
    /// Discussion sections of astrophysics papers.
    AstroPh,
    /// Related work sections of NLP papers.
    CsCl,
    /// Meeting transcripts.
    #[serde(rename = "qmsum-generic")]
    Qmsum,
}

impl Genre {
    pub const ALL: [Genre; 4] = [Genre::Pubmed, Genre::AstroPh, Genre::CsCl, Genre::Qmsum];

    /// Dataset name, as used on the command line and in output paths.
    pub fn name(&self) -> &'static str {
        match self {
            Genre::Pubmed => "pubmed-sample",
            Genre::AstroPh => "astro-ph",
            Genre::CsCl => "cs-cl",
            Genre::Qmsum => "qmsum-generic",
        }
    }

    /// Short description of the genre for question generation.
    pub fn topic(&self) -> &'static str {
        match self {
            Genre::Pubmed => "Randomized controlled trials (RCT) in the clinical domain.",
            Genre::AstroPh => "Discussion section in astrophysics papers.",
            Genre::CsCl => "Related work section in NLP papers.",
            Genre::Qmsum => "Meeting transcripts.",
        }
    }

    /// Task description that opens the rating prompt.
    pub fn task(&self) -> &'static str {
        match self {
            Genre::Pubmed => {
                "You are a research expert in randomized controlled trials (RCTs). Imagine you are \
                 asked to summarize a paper describing the results of an RCT for a typical reader \
                 in this field. The summary should provide enough context to stand alone, since \
                 the reader will only see your summary and no other parts of the paper."
            }
            Genre::AstroPh => {
                "You are a research expert in astrophysics. Imagine you are asked to summarize \
                 the discussion section of an astrophysics paper for a typical reader in this \
                 field. The summary should provide enough context to stand alone, since the \
                 reader will only see your summary and no other parts of the paper."
            }
            Genre::CsCl => {
                "You are a research expert in natural language processing (NLP). Imagine you are \
                 asked to summarize the related work section of an NLP paper for a typical reader \
                 in this field. The summary should provide enough context to stand alone, since \
                 the reader will only see your summary and no other parts of the paper."
            }
            Genre::Qmsum => {
                "You are an expert in communications and meetings. Imagine you are asked to \
                 summarize a meeting transcript (e.g., research group meetings) for a typical \
                 reader of these texts. The summary should provide enough context to stand alone, \
                 since the reader will only see your summary and not the full meeting transcript."
            }
        }
    }

    /// Whether documents are meeting transcripts rather than articles.
    pub fn is_meeting(&self) -> bool {
        matches!(self, Genre::Qmsum)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = SalienceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pubmed" | "pubmed-sample" => Ok(Genre::Pubmed),
            "astro-ph" => Ok(Genre::AstroPh),
            "cs-cl" => Ok(Genre::CsCl),
            "qmsum" | "qmsum-generic" => Ok(Genre::Qmsum),
            other => Err(SalienceError::Config(format!("Unknown genre: {}", other))),
        }
    }
}

/// Summary length the rater is asked to keep in mind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LengthConstraint {
    /// Exactly this many words.
    Words(usize),
    /// Limited, without a number.
    Generic,
}

impl LengthConstraint {
    /// Constraints rated by default, from longest to the generic one.
    pub const DEFAULT: [LengthConstraint; 6] = [
        LengthConstraint::Words(200),
        LengthConstraint::Words(100),
        LengthConstraint::Words(50),
        LengthConstraint::Words(20),
        LengthConstraint::Words(10),
        LengthConstraint::Generic,
    ];

    /// Key used in output file names (`10w`, `generic`).
    pub fn key(&self) -> String {
        match self {
            LengthConstraint::Words(n) => format!("{}w", n),
            LengthConstraint::Generic => "generic".to_string(),
        }
    }

    /// Reminder sentence for the rating prompt.
    pub fn render(&self) -> String {
        let limit = match self {
            LengthConstraint::Words(n) => format!(" to exactly {} words", n),
            LengthConstraint::Generic => String::new(),
        };
        format!(
            "Remember that space in the summary is limited{}, so not everything can be \
             included, and you CANNOT rate all questions as 5.",
            limit
        )
    }
}

impl fmt::Display for LengthConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for LengthConstraint {
    type Err = SalienceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if s == "generic" {
            return Ok(LengthConstraint::Generic);
        }
        s.strip_suffix('w')
            .unwrap_or(&s)
            .parse()
            .map(LengthConstraint::Words)
            .map_err(|_| SalienceError::Config(format!("Invalid length constraint: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genre_names_round_trip() {
        for genre in Genre::ALL {
            assert_eq!(genre.name().parse::<Genre>().unwrap(), genre);
        }
        assert_eq!("pubmed".parse::<Genre>().unwrap(), Genre::Pubmed);
        assert!("poetry".parse::<Genre>().is_err());
    }

    #[test]
    fn test_genre_serde_uses_dataset_names() {
        assert_eq!(
            serde_json::to_string(&Genre::Qmsum).unwrap(),
            "\"qmsum-generic\""
        );
        assert_eq!(serde_json::to_string(&Genre::CsCl).unwrap(), "\"cs-cl\"");
    }

    #[test]
    fn test_length_constraint_render() {
        assert_eq!(
            LengthConstraint::Words(50).render(),
            "Remember that space in the summary is limited to exactly 50 words, so not \
             everything can be included, and you CANNOT rate all questions as 5."
        );
        assert!(LengthConstraint::Generic
            .render()
            .starts_with("Remember that space in the summary is limited, so"));
    }

    #[test]
    fn test_length_constraint_parse() {
        assert_eq!(
            "10w".parse::<LengthConstraint>().unwrap(),
            LengthConstraint::Words(10)
        );
        assert_eq!(
            "200".parse::<LengthConstraint>().unwrap(),
            LengthConstraint::Words(200)
        );
        assert_eq!(
            "Generic".parse::<LengthConstraint>().unwrap(),
            LengthConstraint::Generic
        );
        assert!("long".parse::<LengthConstraint>().is_err());
        assert_eq!(LengthConstraint::Words(20).key(), "20w");
    }
}
