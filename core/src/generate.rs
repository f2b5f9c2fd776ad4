use anyhow::Result;

/// Text-generation backend: turns a prompt into an answer.
pub trait Generator: Send + Sync {
    fn ask(&self, prompt: &str) -> Result<String>;
}

/// Offline generator answering from a fixed keyword table.
pub struct MockGenerator {
    responses: Vec<(&'static str, &'static str)>,
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self {
            responses: vec![
                ("привет", "Привет! Я работаю в тестовом режиме без подключения к модели."),
                ("rag", "RAG (Retrieval-Augmented Generation) ищет релевантные документы в базе знаний перед генерацией ответа."),
                ("deepseek", "DeepSeek is a text generation model."),
                ("openrouter", "OpenRouter routes requests to many hosted models."),
            ],
        }
    }
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Generator for MockGenerator {
    fn ask(&self, prompt: &str) -> Result<String> {
        let lowered = prompt.to_lowercase();
        for (keyword, response) in &self.responses {
            if lowered.contains(keyword) {
                return Ok((*response).to_string());
            }
        }
        Ok(format!("Received: '{lowered}'. A configured model would answer this."))
    }
}
