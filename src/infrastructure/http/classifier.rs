use crate::domain::ports::ConfirmationClassifier;
use crate::error::{ReconcileError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const CHAT_COMPLETIONS_URL: &str = "https://api.x.ai/v1/chat/completions";

const SYSTEM_PROMPT: &str = "Você é um assistente que verifica se uma mensagem \
indica que um aluno preencheu uma ficha de matrícula. Responda com um JSON: \
`{ \"confirmed\": true }` se a mensagem confirmar o preenchimento, ou \
`{ \"confirmed\": false }` se não confirmar. Exemplo de mensagens \
confirmatórias: 'Ficha preenchida', 'Inscrição concluída', 'Já enviei a \
ficha'. Ignore mensagens irrelevantes.";

#[derive(Debug, Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Verdict {
    confirmed: bool,
}

/// Confirmation classifier backed by a chat-completions model.
pub struct GrokClassifier {
    client: reqwest::Client,
    api_key: String,
}

impl GrokClassifier {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl ConfirmationClassifier for GrokClassifier {
    async fn classify(&self, text: &str) -> Result<bool> {
        let payload = json!({
            "model": "grok-beta",
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": text }
            ],
            "temperature": 0.2,
            "max_tokens": 50
        });

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ReconcileError::Classifier(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ReconcileError::Classifier(format!(
                "API returned {}",
                response.status()
            )));
        }

        let completion: Completion = response
            .json()
            .await
            .map_err(|e| ReconcileError::Classifier(e.to_string()))?;
        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or_else(|| ReconcileError::Classifier("empty completion".to_string()))?;

        let verdict: Verdict = serde_json::from_str(content)
            .map_err(|e| ReconcileError::Classifier(format!("unparseable verdict: {e}")))?;
        Ok(verdict.confirmed)
    }
}
