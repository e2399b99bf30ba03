// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Ollama Embedding Adapter
//
// Anti-Corruption Layer for a sentence-transformers model served by Ollama.
// One POST /api/embed per encode call; inputs are batched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Encoder, EncoderError};

pub struct OllamaEncoder {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEncoder {
    pub fn new(endpoint: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            model,
        }
    }
}

#[async_trait]
impl Encoder for OllamaEncoder {
    async fn encode(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EncoderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/api/embed", self.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest {
                model: &self.model,
                input: texts,
            })
            .send()
            .await
            .map_err(|e| EncoderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EncoderError::Provider(format!("HTTP {}: {}", status, error_text)));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EncoderError::Provider(format!("Failed to parse response: {}", e)))?;

        if body.embeddings.len() != texts.len() {
            return Err(EncoderError::Shape {
                expected: texts.len(),
                actual: body.embeddings.len(),
            });
        }

        Ok(body.embeddings)
    }

    fn dimensions(&self) -> Option<usize> {
        None
    }

    fn model(&self) -> &str {
        &self.model
    }
}
