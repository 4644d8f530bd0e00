//! Gemini `generateContent` request and response bodies

use serde::{Deserialize, Serialize};

/// Output modalities the model may answer with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Image,
    Text,
}

/// Inline binary content, base64-encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

/// One content part: text, inline data, or (in responses) something we ignore
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    #[must_use]
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    #[must_use]
    pub fn inline_data<M: Into<String>, D: Into<String>>(mime_type: M, data: D) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<Modality>,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl Candidate {
    /// Parts of this candidate, empty when the content was withheld
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        self.content
            .as_ref()
            .map_or(&[][..], |content| content.parts.as_slice())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    #[serde(default)]
    pub candidates_token_count: Option<u32>,
    #[serde(default)]
    pub total_token_count: Option<u32>,
}

/// Response body of `generateContent`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// First inline-data part across all candidates, in order
    #[must_use]
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .iter()
            .flat_map(Candidate::parts)
            .find_map(|part| part.inline_data.as_ref())
    }

    /// Text of the first candidate: its text parts concatenated and trimmed
    ///
    /// `None` when there is no candidate or the text is blank.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let joined: String = candidate
            .parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let trimmed = joined.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::inline_data("image/jpeg", "AAAA"),
                    Part::text("remove it"),
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![Modality::Image, Modality::Text],
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        {"inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}},
                        {"text": "remove it"}
                    ]
                }],
                "generationConfig": {"responseModalities": ["IMAGE", "TEXT"]}
            })
        );
    }

    #[test]
    fn test_response_parsing_ignores_unknown_fields() {
        let body = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        {"text": "Here you go"},
                        {"inlineData": {"mimeType": "image/png", "data": "QUJD"}},
                        {"thoughtSignature": "opaque"}
                    ]
                },
                "finishReason": "STOP",
                "index": 0
            }],
            "usageMetadata": {"promptTokenCount": 10, "totalTokenCount": 20},
            "modelVersion": "gemini-2.5-flash-image-preview"
        });

        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.first_inline_data().unwrap().data, "QUJD");
        assert_eq!(response.text().as_deref(), Some("Here you go"));
        assert_eq!(
            response.usage_metadata.unwrap().total_token_count,
            Some(20)
        );
    }

    #[test]
    fn test_empty_response_parsing() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
        assert!(response.first_inline_data().is_none());
        assert!(response.text().is_none());
    }

    #[test]
    fn test_candidate_without_content() {
        let body = json!({
            "candidates": [{"finishReason": "SAFETY"}],
            "promptFeedback": {"blockReason": "SAFETY"}
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert!(response.candidates[0].parts().is_empty());
        assert!(response.text().is_none());
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn test_text_concatenates_and_trims() {
        let response = GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: None,
                    parts: vec![Part::text("  Sorry, "), Part::text("I can't.  ")],
                }),
                finish_reason: None,
            }],
            ..Default::default()
        };
        assert_eq!(response.text().as_deref(), Some("Sorry, I can't."));
    }

    #[test]
    fn test_image_found_in_later_candidate() {
        let response = GenerateContentResponse {
            candidates: vec![
                Candidate {
                    content: Some(Content {
                        role: None,
                        parts: vec![Part::text("no image here")],
                    }),
                    finish_reason: None,
                },
                Candidate {
                    content: Some(Content {
                        role: None,
                        parts: vec![Part::inline_data("image/png", "Wk9P")],
                    }),
                    finish_reason: None,
                },
            ],
            ..Default::default()
        };
        assert_eq!(response.first_inline_data().unwrap().data, "Wk9P");
    }
}
