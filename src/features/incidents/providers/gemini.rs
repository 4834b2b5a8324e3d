use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

use crate::features::incidents::models::{AddressBundle, ImageUpload};
use crate::features::incidents::providers::{DescriptionProvider, LocationProvider, ProviderError};

const MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiAddress {
    #[serde(default)]
    place_name: String,
    #[serde(default)]
    full_address: String,
    #[serde(default)]
    nearest_landmark: String,
    #[serde(default)]
    area: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    taluk: String,
    #[serde(default)]
    district: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    pincode: String,
    #[serde(default)]
    country: String,
}

/// Strip markdown code fences the model sometimes wraps JSON in
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .trim()
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

/// AI-semantic provider. One client serves both capabilities: structured
/// address synthesis from coordinates and vision-based photo description.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    async fn generate(&self, parts: serde_json::Value) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, MODEL, self.api_key
        );
        let body = json!({ "contents": [{ "parts": parts }] });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Transport(format!(
                "gemini returned status {}",
                response.status()
            )));
        }

        let data: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let text = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ProviderError::Empty);
        }
        Ok(text)
    }
}

#[async_trait]
impl LocationProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AddressBundle, ProviderError> {
        let prompt = format!(
            r#"You are a location intelligence system. Convert the following GPS coordinates into a detailed address.

Coordinates:
- Latitude: {latitude}
- Longitude: {longitude}

Provide a JSON response with the following structure (use empty strings if information is not available):
{{
  "place_name": "Main place name or landmark",
  "full_address": "Complete formatted address",
  "nearest_landmark": "Nearest point of interest, building, or landmark",
  "area": "Area, neighborhood, or locality name",
  "city": "City name",
  "taluk": "Taluk or subdistrict name (if in India)",
  "district": "District name",
  "state": "State or province name",
  "pincode": "Postal/ZIP code",
  "country": "Country name"
}}

IMPORTANT:
- Return ONLY valid JSON, no additional text
- Use Indian administrative divisions if coordinates are in India
- Identify the nearest landmark (hospital, school, park, building, etc.)
- Be specific and accurate with location details"#
        );

        tracing::debug!("Reverse geocoding (gemini): {},{}", latitude, longitude);

        let text = self.generate(json!([{ "text": prompt }])).await?;
        let parsed: GeminiAddress = serde_json::from_str(strip_code_fences(&text))
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        // A bundle without a full address is not usable downstream
        if parsed.full_address.is_empty() {
            return Err(ProviderError::Empty);
        }

        Ok(AddressBundle {
            place_name: parsed.place_name,
            full_address: parsed.full_address,
            nearest_landmark: parsed.nearest_landmark,
            area: parsed.area,
            city: parsed.city,
            taluk: parsed.taluk,
            district: parsed.district,
            state: parsed.state,
            pincode: parsed.pincode,
            country: parsed.country,
        })
    }
}

#[async_trait]
impl DescriptionProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini-vision"
    }

    async fn describe(
        &self,
        image: &ImageUpload,
        category: &str,
        reporter_note: Option<&str>,
    ) -> Result<String, ProviderError> {
        let prompt = format!(
            "Analyze this emergency incident photo. Category: {}. \n\
             Description: {}.\n\n\
             Provide a brief, factual description of what you see in the image \
             (e.g., accident/fire/flood/electrical issue). \n\
             Keep it short (1-2 sentences) and focus on visible evidence.",
            if category.is_empty() { "Unknown" } else { category },
            reporter_note.filter(|n| !n.is_empty()).unwrap_or("No description provided")
        );

        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
        let parts = json!([
            { "text": prompt },
            {
                "inline_data": {
                    "mime_type": image.content_type,
                    "data": encoded
                }
            }
        ]);

        let text = self.generate(parts).await?;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn address_parses_with_missing_fields_as_empty() {
        let parsed: GeminiAddress = serde_json::from_str(
            r#"{"full_address": "MG Road, Bengaluru", "city": "Bengaluru"}"#,
        )
        .unwrap();
        assert_eq!(parsed.full_address, "MG Road, Bengaluru");
        assert_eq!(parsed.city, "Bengaluru");
        assert_eq!(parsed.pincode, "");
        assert_eq!(parsed.taluk, "");
    }

    #[test]
    fn candidate_text_extracts_from_first_part() {
        let data: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"hello"}]}}]}"#,
        )
        .unwrap();
        let text = data
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text);
        assert_eq!(text.as_deref(), Some("hello"));
    }
}
