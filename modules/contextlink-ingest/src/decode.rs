//! Typed projections of raw dataset payloads.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::PipelineError;

/// A Facebook group post as produced by the groups scraper actor.
///
/// Every field is optional on the wire: absent or `null` values decode to
/// empty. A field that is present with the wrong type is a decode error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedSocialPost {
    #[serde(rename = "inputUrl", default, deserialize_with = "null_as_default")]
    pub group_url: String,
    #[serde(rename = "url", default, deserialize_with = "null_as_default")]
    pub permalink: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_elements_as_default")]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: AttachmentImage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttachmentImage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub width: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub height: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uri: String,
}

impl DecodedSocialPost {
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Attachments that actually carry an image URI.
    pub fn images(&self) -> impl Iterator<Item = &AttachmentImage> {
        self.attachments
            .iter()
            .map(|a| &a.image)
            .filter(|img| !img.uri.is_empty())
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A `null` list decodes empty and each `null` element decodes to its default.
fn null_elements_as_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let elements = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(elements.into_iter().map(Option::unwrap_or_default).collect())
}

/// Re-encode a generic payload and decode it as a [`DecodedSocialPost`].
pub fn decode_social_post(payload: &Value) -> Result<DecodedSocialPost, PipelineError> {
    let bytes = serde_json::to_vec(payload)
        .map_err(|e| PipelineError::Decode(format!("failed to encode raw content: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| PipelineError::Decode(format!("failed to decode social post: {e}")))
}
